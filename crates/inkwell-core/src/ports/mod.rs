//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod log_sink;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use log_sink::{LogSink, SinkError};
pub use repository::{BaseRepository, LogRepository, PostRepository, UserRepository};
