use async_trait::async_trait;

use crate::domain::LogRecord;
use crate::error::RepoError;

/// A destination audit records are delivered to (file, console, database...).
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Short name used when reporting delivery failures.
    fn name(&self) -> &'static str;

    /// A failing critical sink fails the call that emitted the record.
    fn is_critical(&self) -> bool {
        false
    }

    /// Deliver one record.
    async fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Log sink errors.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}
