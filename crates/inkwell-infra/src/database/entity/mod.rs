//! SeaORM entities.

pub mod log_record;
pub mod post;
pub mod user;
