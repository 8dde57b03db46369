//! Log record and entry types shared across the consumer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log record.
///
/// Serialized in UPPERCASE to match the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// All levels, most urgent first.
    pub const ALL: [Self; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// The wire spelling of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Self::Error),
            "WARN" => Ok(Self::Warn),
            "INFO" => Ok(Self::Info),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A log record as delivered on the wire. Carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogRecord {
    /// The log line content.
    pub message: String,
    /// ISO-8601 timestamp assigned by the producer.
    pub timestamp: String,
    /// Severity reported by the producer.
    #[serde(rename = "log_level")]
    pub level: LogLevel,
}

/// A decoded entry held in history, identified by a client-side id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Locally generated id, unique within one buffer's lifetime.
    pub id: String,
    /// The log line content.
    pub message: String,
    /// ISO-8601 timestamp assigned by the producer.
    pub timestamp: String,
    /// Severity reported by the producer.
    #[serde(rename = "log_level")]
    pub level: LogLevel,
}

impl LogEntry {
    /// Promote a wire record to an entry with a freshly assigned id.
    pub fn from_record(record: RawLogRecord) -> Self {
        Self {
            id: next_entry_id(),
            message: record.message,
            timestamp: record.timestamp,
            level: record.level,
        }
    }
}

/// Entry ids combine the arrival clock with a random suffix; collisions
/// within one buffer lifetime are negligible.
fn next_entry_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"ERROR\"");
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"DEBUG\"");
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn record_matches_wire_shape() {
        let json = r#"{"message":"server started","timestamp":"2026-01-01T00:00:00Z","log_level":"INFO"}"#;
        let record: RawLogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.message, "server started");
        assert_eq!(record.level, LogLevel::Info);
    }

    #[test]
    fn record_with_unknown_level_is_rejected() {
        let json = r#"{"message":"x","timestamp":"t","log_level":"TRACE"}"#;
        assert!(serde_json::from_str::<RawLogRecord>(json).is_err());
    }

    #[test]
    fn entry_keeps_wire_field_name_for_level() {
        let entry = LogEntry {
            id: "1".to_string(),
            message: "m".to_string(),
            timestamp: "t".to_string(),
            level: LogLevel::Warn,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"log_level\":\"WARN\""));
    }

    #[test]
    fn assigned_ids_are_distinct() {
        let record = RawLogRecord {
            message: "m".to_string(),
            timestamp: "t".to_string(),
            level: LogLevel::Info,
        };
        let ids: HashSet<String> = (0..100)
            .map(|_| LogEntry::from_record(record.clone()).id)
            .collect();
        assert_eq!(ids.len(), 100);
    }
}
