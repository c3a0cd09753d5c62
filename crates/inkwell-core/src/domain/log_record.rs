use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest message a log record keeps, in characters.
pub const MAX_MESSAGE_CHARS: usize = 512;

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InfoType {
    Info,
    Warning,
    Error,
    Critical,
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::Info => "INFO",
            InfoType::Warning => "WARNING",
            InfoType::Error => "ERROR",
            InfoType::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(InfoType::Info),
            "WARNING" => Ok(InfoType::Warning),
            "ERROR" => Ok(InfoType::Error),
            "CRITICAL" => Ok(InfoType::Critical),
            other => Err(format!("unknown info type: {other}")),
        }
    }
}

/// Minimum level an audit call must reach to be forwarded to any sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Debug,
    Info,
    Error,
}

impl LevelFilter {
    pub fn allows(&self, level: InfoType) -> bool {
        match self {
            LevelFilter::All | LevelFilter::Debug => true,
            LevelFilter::Info => level >= InfoType::Info,
            LevelFilter::Error => level >= InfoType::Error,
        }
    }

    /// Parse a configured level. Anything unrecognised lets every record through.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "INFO" => LevelFilter::Info,
            "ERROR" => LevelFilter::Error,
            "DEBUG" => LevelFilter::Debug,
            _ => LevelFilter::All,
        }
    }
}

/// One persisted audit event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: Uuid,
    pub log_file: String,
    pub info_type: InfoType,
    pub message: String,
    pub date_and_time: DateTime<Utc>,
}

impl LogRecord {
    /// Build a record, truncating the message to [`MAX_MESSAGE_CHARS`].
    pub fn new(
        log_file: impl Into<String>,
        info_type: InfoType,
        message: impl Into<String>,
        date_and_time: DateTime<Utc>,
    ) -> Self {
        let mut message = message.into();
        if let Some((cut, _)) = message.char_indices().nth(MAX_MESSAGE_CHARS) {
            message.truncate(cut);
        }

        Self {
            id: Uuid::new_v4(),
            log_file: log_file.into(),
            info_type,
            message,
            date_and_time,
        }
    }
}

/// Field the log listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    LogFile,
    InfoType,
    Message,
    #[default]
    DateAndTime,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::LogFile => "log_file",
            SortField::InfoType => "info_type",
            SortField::Message => "message",
            SortField::DateAndTime => "date_and_time",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "log_file" => Ok(SortField::LogFile),
            "info_type" => Ok(SortField::InfoType),
            "message" => Ok(SortField::Message),
            "date_and_time" => Ok(SortField::DateAndTime),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Only "asc" sorts ascending; any other value means descending.
    pub fn parse(value: &str) -> Self {
        if value == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Parameters of a log listing: case-insensitive substring filter plus ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub search: String,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl LogQuery {
    /// Does `record` pass the substring filter?
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.search.is_empty()
            || record
                .message
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Sort `records` in place according to this query.
    pub fn sort(&self, records: &mut [LogRecord]) {
        records.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::LogFile => a.log_file.cmp(&b.log_file),
                SortField::InfoType => a.info_type.as_str().cmp(b.info_type.as_str()),
                SortField::Message => a.message.cmp(&b.message),
                SortField::DateAndTime => a.date_and_time.cmp(&b.date_and_time),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_level_filter() {
        assert!(LevelFilter::Info.allows(InfoType::Info));
        assert!(LevelFilter::Info.allows(InfoType::Critical));
        assert!(!LevelFilter::Error.allows(InfoType::Warning));
        assert!(LevelFilter::Error.allows(InfoType::Error));
        assert!(LevelFilter::All.allows(InfoType::Info));
        assert_eq!(LevelFilter::parse("error"), LevelFilter::Error);
        assert_eq!(LevelFilter::parse("verbose"), LevelFilter::All);
    }

    #[test]
    fn test_message_truncated_to_limit() {
        let record = LogRecord::new("app.log", InfoType::Info, "ü".repeat(600), Utc::now());
        assert_eq!(record.message.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_query_filters_case_insensitively_and_sorts() {
        let now = Utc::now();
        let mut records = vec![
            LogRecord::new("app.log", InfoType::Info, "User A has logged in", now),
            LogRecord::new("app.log", InfoType::Error, "boom", now + TimeDelta::seconds(1)),
            LogRecord::new("app.log", InfoType::Info, "user b HAS LOGGED IN", now + TimeDelta::seconds(2)),
        ];

        let query = LogQuery {
            search: "Logged".to_string(),
            ..Default::default()
        };
        records.retain(|r| query.matches(r));
        query.sort(&mut records);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "user b HAS LOGGED IN");

        let ascending = LogQuery {
            order: SortOrder::Asc,
            ..query
        };
        ascending.sort(&mut records);
        assert_eq!(records[0].message, "User A has logged in");
    }

    #[test]
    fn test_parse_sort_params() {
        assert_eq!("info_type".parse::<SortField>(), Ok(SortField::InfoType));
        assert!("password".parse::<SortField>().is_err());
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }
}
