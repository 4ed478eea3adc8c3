//! Log domain types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An append-only audit record attached to a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLogEntry {
    pub id: i64,
    pub job_id: i64,
    /// Free-form tag. The engine writes the `LogLevel` values, but any
    /// text already stored is read back unchanged.
    pub level: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Levels the engine records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_string_form() {
        assert_eq!(LogLevel::Warning.to_string(), "warning");
        assert_eq!(
            serde_json::to_value(LogLevel::Error).unwrap(),
            serde_json::json!("error")
        );
    }
}
