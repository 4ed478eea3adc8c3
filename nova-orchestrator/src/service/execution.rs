//! Execution service
//!
//! The capability a claimed job is run through. The engine only sees
//! success or an [`ExecutionError`]; what a job actually does is up to the
//! injected implementation.

use nova_core::domain::job::Job;
use serde_json::Value;
use tracing::debug;

/// Failure raised while executing a job's payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ExecutionError(pub String);

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Service trait for executing a claimed job
///
/// Called on a blocking thread after the claim has committed, so
/// implementations may block.
pub trait JobExecutor: Send + Sync {
    fn execute(&self, job: &Job) -> Result<(), ExecutionError>;
}

/// Stand-in executor.
///
/// Succeeds unless the payload carries `"fail": true` or
/// `"should_fail": true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedExecutor;

impl SimulatedExecutor {
    pub const FAILURE_MESSAGE: &'static str = "Simulated job failure";

    pub fn new() -> Self {
        Self
    }
}

impl JobExecutor for SimulatedExecutor {
    fn execute(&self, job: &Job) -> Result<(), ExecutionError> {
        let requested_failure = ["fail", "should_fail"]
            .iter()
            .any(|key| job.payload.get(*key) == Some(&Value::Bool(true)));

        if requested_failure {
            return Err(ExecutionError::new(Self::FAILURE_MESSAGE));
        }

        debug!("Simulated execution of {} job {}", job.job_type, job.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nova_core::domain::job::{JobStatus, Payload};
    use serde_json::json;

    fn job_with(payload: serde_json::Value) -> Job {
        let now = Utc::now();
        Job {
            id: 1,
            job_type: "test".to_string(),
            payload: payload.as_object().cloned().unwrap_or_else(Payload::new),
            status: JobStatus::Running,
            created_at: now,
            updated_at: now,
            started_at: Some(now),
            finished_at: None,
            attempt_count: 0,
            last_error: None,
        }
    }

    #[test]
    fn test_succeeds_by_default() {
        let executor = SimulatedExecutor::new();
        assert!(executor.execute(&job_with(json!({"source": "crm"}))).is_ok());
        assert!(executor.execute(&job_with(json!({}))).is_ok());
    }

    #[test]
    fn test_fails_on_request() {
        let executor = SimulatedExecutor::new();
        let expected = Err(ExecutionError::new("Simulated job failure"));

        assert_eq!(executor.execute(&job_with(json!({"fail": true}))), expected);
        assert_eq!(executor.execute(&job_with(json!({"should_fail": true}))), expected);
    }

    #[test]
    fn test_only_literal_true_fails() {
        let executor = SimulatedExecutor::new();

        assert!(executor.execute(&job_with(json!({"fail": false}))).is_ok());
        assert!(executor.execute(&job_with(json!({"fail": "true"}))).is_ok());
        assert!(executor.execute(&job_with(json!({"fail": 1}))).is_ok());
    }
}
