//! Repository Module
//!
//! Data access layer for the orchestrator: the job store.
//! Every state transition runs as a single SQLite transaction whose first
//! statement is the conditional write, so concurrent callers serialize on
//! the database write lock instead of racing a read-then-write.

use chrono::{DateTime, SecondsFormat, Utc};
use nova_core::domain::job::JobStatus;

pub mod job;
pub mod log;

// Re-export for convenience
pub use job as job_repository;
pub use log as log_repository;

/// Job store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("job {job_id} is not {expected}")]
    InvalidTransition { job_id: i64, expected: JobStatus },

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("job task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Fixed-width RFC 3339 form, so text order matches time order.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_fixed_width_utc() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let late = early + chrono::Duration::microseconds(1);

        assert_eq!(timestamp(early), "2024-01-02T03:04:05.000000Z");
        assert_eq!(timestamp(early).len(), timestamp(late).len());
        assert!(timestamp(early) < timestamp(late));
    }
}
