use async_trait::async_trait;

use inkwell_core::domain::{InfoType, LogRecord};
use inkwell_core::ports::{LogSink, SinkError};

/// Re-emits audit records as `tracing` events under the `audit` target,
/// so they reach the console through the installed subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

#[async_trait]
impl LogSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let file = record.log_file.as_str();
        match record.info_type {
            InfoType::Info => tracing::info!(target: "audit", log_file = file, "{}", record.message),
            InfoType::Warning => {
                tracing::warn!(target: "audit", log_file = file, "{}", record.message)
            }
            InfoType::Error | InfoType::Critical => {
                tracing::error!(target: "audit", log_file = file, info_type = %record.info_type, "{}", record.message)
            }
        }
        Ok(())
    }
}
