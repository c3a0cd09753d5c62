//! Audit pipeline: canonical messages and the fan-out logger that delivers them.

mod logger;
mod templates;

pub use logger::{AuditError, AuditLogger, SinkFailure};
pub use templates::{AuditEvent, RequestContext};
