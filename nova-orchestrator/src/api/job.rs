//! Job API Handlers
//!
//! HTTP endpoints for job lifecycle management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use nova_core::domain::job::Job;
use nova_core::dto::job::{CreateJob, JobDetail, ListJobsQuery};
use nova_core::dto::log::LogLine;

use crate::api::error::{ApiError, ApiResult};
use crate::service::{JobService, RetryOutcome};

// =============================================================================
// Job Lifecycle Endpoints
// =============================================================================

/// POST /jobs
/// Enqueue a new job
pub async fn create_job(
    State(service): State<JobService>,
    Json(req): Json<CreateJob>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    req.validate()?;

    tracing::info!("Creating job of type: {}", req.job_type);

    let job = service.create_job(&req.job_type, &req.payload).await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs
/// List jobs, newest first, optionally filtered by `?status=`
pub async fn list_jobs(
    State(service): State<JobService>,
    Query(params): Query<ListJobsQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    let jobs = match params.status {
        Some(status) => {
            tracing::debug!("Listing {} jobs", status);
            service.list_jobs_by_status(status).await?
        }
        None => {
            tracing::debug!("Listing all jobs");
            service.list_jobs().await?
        }
    };

    Ok(Json(jobs))
}

/// GET /jobs/{id}
/// Get job details including its log
pub async fn get_job(
    State(service): State<JobService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<JobDetail>> {
    tracing::debug!("Getting job: {}", id);

    let job = find_job(&service, id).await?;
    let logs = service
        .get_job_logs(id)
        .await?
        .into_iter()
        .map(LogLine::from)
        .collect();

    Ok(Json(JobDetail { job, logs }))
}

/// POST /jobs/{id}/retry
/// Re-queue a failed job
pub async fn retry_job(
    State(service): State<JobService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Job>> {
    tracing::info!("Retrying job: {}", id);

    match service.retry_job(id).await? {
        RetryOutcome::Requeued(job) => Ok(Json(job)),
        RetryOutcome::Refused => Err(ApiError::BadRequest(
            "Only failed jobs can be retried".to_string(),
        )),
    }
}

// =============================================================================
// Log Endpoints
// =============================================================================

/// GET /jobs/{id}/logs
/// Get all logs for a job, oldest first
pub async fn get_job_logs(
    State(service): State<JobService>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<LogLine>>> {
    tracing::debug!("Getting logs for job: {}", id);

    // Verify job exists first
    find_job(&service, id).await?;

    let logs = service
        .get_job_logs(id)
        .await?
        .into_iter()
        .map(LogLine::from)
        .collect();

    Ok(Json(logs))
}

async fn find_job(service: &JobService, id: i64) -> ApiResult<Job> {
    service
        .get_job(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", id)))
}
