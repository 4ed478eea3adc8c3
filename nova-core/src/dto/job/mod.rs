//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobStatus, Payload};
use crate::dto::log::LogLine;

/// Request to enqueue a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: Payload,
}

/// Rejected job creation request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("job type must not be empty")]
    EmptyType,
}

impl CreateJob {
    /// Checks the structural rules serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.job_type.trim().is_empty() {
            return Err(ValidationError::EmptyType);
        }
        Ok(())
    }
}

/// Job representation including its audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub logs: Vec<LogLine>,
}

/// Query parameters accepted by the job listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
}
