//! Log DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::log::JobLogEntry;

/// A log entry as shown alongside a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<JobLogEntry> for LogLine {
    fn from(entry: JobLogEntry) -> Self {
        LogLine {
            level: entry.level,
            message: entry.message,
            created_at: entry.created_at,
        }
    }
}
