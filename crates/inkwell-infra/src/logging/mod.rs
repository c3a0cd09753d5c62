//! Audit log sinks: the destinations `AuditLogger` fans records out to.

mod console;
mod file;
mod store;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use store::StoreSink;
