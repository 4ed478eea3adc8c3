//! Job Service
//!
//! Business logic for the job lifecycle. Everything except `process_next`
//! delegates straight to the repository.

use std::sync::Arc;

use nova_core::domain::job::{Job, JobStatus, Payload};
use nova_core::domain::log::JobLogEntry;
use sqlx::SqlitePool;
use tokio::task::JoinError;
use tracing::{Instrument, debug, error, info, info_span, trace, warn};

use crate::repository::{StoreError, job_repository, log_repository};
use crate::service::execution::JobExecutor;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Result of asking for a retry
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome {
    Requeued(Job),
    /// The job does not exist or is not `failed`. Nothing was changed.
    Refused,
}

/// The job engine. Cheap to clone; clones share the pool and executor.
#[derive(Clone)]
pub struct JobService {
    pool: SqlitePool,
    executor: Arc<dyn JobExecutor>,
}

impl JobService {
    pub fn new(pool: SqlitePool, executor: Arc<dyn JobExecutor>) -> Self {
        Self { pool, executor }
    }

    /// Enqueue a new job
    pub async fn create_job(&self, job_type: &str, payload: &Payload) -> Result<Job> {
        let job = job_repository::create(&self.pool, job_type, payload).await?;

        info!("Job created: {} ({})", job.id, job.job_type);

        Ok(job)
    }

    /// List all jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        job_repository::list_all(&self.pool).await
    }

    /// List jobs in one status, newest first
    pub async fn list_jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>> {
        job_repository::find_by_status(&self.pool, status).await
    }

    pub async fn get_job(&self, id: i64) -> Result<Option<Job>> {
        job_repository::find_by_id(&self.pool, id).await
    }

    pub async fn get_job_logs(&self, id: i64) -> Result<Vec<JobLogEntry>> {
        log_repository::find_by_job(&self.pool, id).await
    }

    /// Re-queue a failed job
    pub async fn retry_job(&self, id: i64) -> Result<RetryOutcome> {
        match job_repository::retry(&self.pool, id).await? {
            Some(job) => {
                info!("Job {} re-queued", id);
                Ok(RetryOutcome::Requeued(job))
            }
            None => {
                debug!("Retry of job {} refused", id);
                Ok(RetryOutcome::Refused)
            }
        }
    }

    /// Claim the oldest queued job and run it to a terminal state.
    ///
    /// Returns `Ok(false)` without side effects when nothing is queued.
    /// Execution failures are recorded on the job, not returned; only
    /// storage faults surface as `Err`.
    ///
    /// The work runs on its own task, so dropping the returned future (a
    /// disconnected tick client, a timeout) does not strand the claimed job
    /// in `running`.
    pub async fn process_next(&self) -> Result<bool> {
        let service = self.clone();
        tokio::spawn(async move { service.claim_and_run().await }).await?
    }

    async fn claim_and_run(&self) -> Result<bool> {
        trace!("Looking for next queued job…");

        let Some(job) = job_repository::claim_next_queued(&self.pool).await? else {
            return Ok(false);
        };

        let span = info_span!("job", job.id = %job.id, job.type = %job.job_type);
        self.run_claimed(job).instrument(span).await?;

        Ok(true)
    }

    async fn run_claimed(&self, job: Job) -> Result<()> {
        debug!("Running job…");

        let job_id = job.id;
        let executor = Arc::clone(&self.executor);
        let outcome = tokio::task::spawn_blocking(move || executor.execute(&job)).await;

        match outcome {
            Ok(Ok(())) => {
                job_repository::mark_succeeded(&self.pool, job_id).await?;
                info!("Job succeeded");
            }
            Ok(Err(failure)) => {
                warn!("Job failed: {failure}");
                job_repository::mark_failed(&self.pool, job_id, &failure.to_string()).await?;
            }
            Err(join_error) => {
                let message = fault_message(join_error);
                error!("{message}");
                job_repository::mark_failed(&self.pool, job_id, &message).await?;
            }
        }

        Ok(())
    }
}

fn fault_message(error: JoinError) -> String {
    match error.try_into_panic() {
        Ok(panic) => {
            if let Some(message) = panic.downcast_ref::<&str>() {
                format!("Job execution panicked: {message}")
            } else if let Some(message) = panic.downcast_ref::<String>() {
                format!("Job execution panicked: {message}")
            } else {
                "Job execution panicked".to_string()
            }
        }
        Err(error) => format!("Job execution was aborted: {error}"),
    }
}
