use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use inkwell_core::domain::LogRecord;
use inkwell_core::ports::{LogSink, SinkError};

/// Appends audit records to a text file, one line each:
/// `2024-07-07 12:00:00 [INFO]: message`.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories if needed.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        tracing::info!(path = %path.display(), "Audit log file opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_line(record: &LogRecord) -> String {
        format!(
            "{} [{}]: {}\n",
            record.date_and_time.format("%Y-%m-%d %H:%M:%S"),
            record.info_type,
            record.message
        )
    }
}

#[async_trait]
impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = Self::format_line(record);

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SinkError::Io(e.to_string()))?;
        file.flush().await.map_err(|e| SinkError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use inkwell_core::domain::InfoType;

    use super::*;

    #[tokio::test]
    async fn test_appends_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging").join("inkwell.log");
        let at = Utc.with_ymd_and_hms(2024, 7, 7, 12, 30, 5).unwrap();

        let sink = FileSink::open(&path).await.unwrap();
        sink.write(&LogRecord::new("inkwell.log", InfoType::Info, "first", at))
            .await
            .unwrap();
        sink.write(&LogRecord::new("inkwell.log", InfoType::Error, "second", at))
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(sink.path()).await.unwrap();
        assert_eq!(
            contents,
            "2024-07-07 12:30:05 [INFO]: first\n2024-07-07 12:30:05 [ERROR]: second\n"
        );
    }

    #[tokio::test]
    async fn test_reopening_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        FileSink::open(&path)
            .await
            .unwrap()
            .write(&LogRecord::new("audit.log", InfoType::Info, "before", at))
            .await
            .unwrap();
        FileSink::open(&path)
            .await
            .unwrap()
            .write(&LogRecord::new("audit.log", InfoType::Info, "after", at))
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
