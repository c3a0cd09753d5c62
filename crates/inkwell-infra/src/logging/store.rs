use std::sync::Arc;

use async_trait::async_trait;

use inkwell_core::domain::LogRecord;
use inkwell_core::ports::{LogRepository, LogSink, SinkError};

/// Persists audit records through a [`LogRepository`]. Critical: if the store
/// cannot take a record, the call that emitted it fails.
#[derive(Clone)]
pub struct StoreSink {
    logs: Arc<dyn LogRepository>,
}

impl StoreSink {
    pub fn new(logs: Arc<dyn LogRepository>) -> Self {
        Self { logs }
    }
}

#[async_trait]
impl LogSink for StoreSink {
    fn name(&self) -> &'static str {
        "store"
    }

    fn is_critical(&self) -> bool {
        true
    }

    async fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.logs.create(record.clone()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inkwell_core::audit::AuditLogger;
    use inkwell_core::domain::{InfoType, LevelFilter, LogQuery};

    use super::*;
    use crate::database::InMemoryLogRepository;

    #[tokio::test]
    async fn test_records_land_in_the_store() {
        let logs = Arc::new(InMemoryLogRepository::new());
        let sink = StoreSink::new(logs.clone());

        sink.write(&LogRecord::new("app.log", InfoType::Warning, "careful", Utc::now()))
            .await
            .unwrap();

        let stored = logs.query(&LogQuery::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].info_type, InfoType::Warning);
        assert_eq!(stored[0].message, "careful");
    }

    #[tokio::test]
    async fn test_logger_stamps_source_on_stored_record() {
        let logs = Arc::new(InMemoryLogRepository::new());
        let logger = AuditLogger::new("logging/inkwell.log", LevelFilter::Info)
            .with_sink(Arc::new(StoreSink::new(logs.clone())));

        logger.info("hello").await.unwrap();

        let stored = logs.query(&LogQuery::default()).await.unwrap();
        assert_eq!(stored[0].log_file, "logging/inkwell.log");
    }
}
