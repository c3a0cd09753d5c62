//! Fan-out audit logger.
//!
//! One call produces one [`LogRecord`] which is handed to every configured sink.
//! Sinks are tried independently: a failing sink never keeps the record from the others.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use super::AuditEvent;
use crate::domain::{InfoType, LevelFilter, LogRecord};
use crate::ports::LogSink;

/// A sink that could not take a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkFailure {
    pub sink: &'static str,
    pub error: String,
}

/// One or more critical sinks failed. Every other sink was still attempted.
#[derive(Debug, thiserror::Error)]
#[error("audit delivery failed: {}", DisplayFailures(.failures))]
pub struct AuditError {
    pub failures: Vec<SinkFailure>,
}

struct DisplayFailures<'a>(&'a [SinkFailure]);

impl fmt::Display for DisplayFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.sink, failure.error)?;
        }
        Ok(())
    }
}

/// Audit logging context. Built once at startup and passed to whoever emits events.
#[derive(Clone)]
pub struct AuditLogger {
    source: String,
    min_level: LevelFilter,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl AuditLogger {
    /// `source` is stored on every record as its `log_file`.
    pub fn new(source: impl Into<String>, min_level: LevelFilter) -> Self {
        Self {
            source: source.into(),
            min_level,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Render `event` through the template catalog and log it at the event's level.
    pub async fn record(&self, event: AuditEvent<'_>) -> Result<(), AuditError> {
        self.log(event.level(), event.to_string()).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Result<(), AuditError> {
        self.log(InfoType::Info, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<(), AuditError> {
        self.log(InfoType::Error, message).await
    }

    /// Filter once, stamp once, then deliver to every sink.
    pub async fn log(&self, level: InfoType, message: impl Into<String>) -> Result<(), AuditError> {
        if !self.min_level.allows(level) {
            return Ok(());
        }

        let record = LogRecord::new(self.source.clone(), level, message, Utc::now());

        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.write(&record).await {
                if sink.is_critical() {
                    failures.push(SinkFailure {
                        sink: sink.name(),
                        error: e.to_string(),
                    });
                } else {
                    tracing::warn!(sink = sink.name(), error = %e, "Audit sink failed");
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AuditError { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ports::SinkError;

    struct RecordingSink {
        name: &'static str,
        critical: bool,
        fail: bool,
        records: Mutex<Vec<LogRecord>>,
    }

    impl RecordingSink {
        fn new(name: &'static str, critical: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                critical,
                fail,
                records: Mutex::new(Vec::new()),
            })
        }

        fn records(&self) -> Vec<LogRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogSink for RecordingSink {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_critical(&self) -> bool {
            self.critical
        }

        async fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Io("disk full".to_string()));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_every_sink_gets_the_same_record() {
        let file = RecordingSink::new("file", false, false);
        let store = RecordingSink::new("store", true, false);
        let logger = AuditLogger::new("logging/app.log", LevelFilter::Info)
            .with_sink(file.clone())
            .with_sink(store.clone());

        logger.info("hello").await.unwrap();

        let from_file = file.records();
        let from_store = store.records();
        assert_eq!(from_file.len(), 1);
        assert_eq!(from_file, from_store);
        assert_eq!(from_file[0].log_file, "logging/app.log");
        assert_eq!(from_file[0].info_type, InfoType::Info);
    }

    #[tokio::test]
    async fn test_filtered_calls_reach_no_sink() {
        let store = RecordingSink::new("store", true, false);
        let logger = AuditLogger::new("app.log", LevelFilter::Error).with_sink(store.clone());

        logger.info("ignored").await.unwrap();
        logger.error("kept").await.unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "kept");
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_starve_others() {
        let broken_file = RecordingSink::new("file", false, true);
        let store = RecordingSink::new("store", true, false);
        let logger = AuditLogger::new("app.log", LevelFilter::All)
            .with_sink(broken_file)
            .with_sink(store.clone());

        assert!(logger.info("still stored").await.is_ok());
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_critical_failure_reported_after_other_sinks_ran() {
        let broken_store = RecordingSink::new("store", true, true);
        let file = RecordingSink::new("file", false, false);
        let logger = AuditLogger::new("app.log", LevelFilter::All)
            .with_sink(broken_store)
            .with_sink(file.clone());

        let err = logger.error("boom").await.unwrap_err();

        assert_eq!(file.records().len(), 1);
        assert_eq!(
            err.failures,
            vec![SinkFailure {
                sink: "store",
                error: "I/O error: disk full".to_string(),
            }]
        );
        assert_eq!(
            err.to_string(),
            "audit delivery failed: store: I/O error: disk full"
        );
    }
}
