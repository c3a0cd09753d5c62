//! Domain services - the operations handlers call, built on the ports.

mod posts;
mod users;

pub use posts::PostService;
pub use users::{Registration, UserService};
