//! Domain entities - the core business objects.

mod log_record;
mod post;
mod user;

pub use log_record::{InfoType, LevelFilter, LogQuery, LogRecord, SortField, SortOrder};
pub use post::{FieldChange, Post, PostChanges, PostDraft};
pub use user::User;
