//! Job Repository
//!
//! Persistence and state transitions for jobs. Each transition is guarded by
//! the expected source status in its `WHERE` clause; a transition that
//! matches no row is refused and leaves no log entry behind.

use chrono::Utc;
use nova_core::domain::job::{Job, JobStatus, Payload};
use nova_core::domain::log::LogLevel;
use sqlx::SqlitePool;

use super::{StoreError, log_repository, timestamp};

/// Create a new queued job and its "queued" log entry
pub async fn create(pool: &SqlitePool, job_type: &str, payload: &Payload) -> Result<Job, StoreError> {
    let payload = serde_json::to_string(payload)?;
    let now = timestamp(Utc::now());

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (type, payload, status, created_at, updated_at)
        VALUES (?1, ?2, 'queued', ?3, ?3)
        RETURNING id, type, payload, status, created_at, updated_at,
                  started_at, finished_at, attempt_count, last_error
        "#,
    )
    .bind(job_type)
    .bind(payload)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    log_repository::append(&mut tx, row.id, LogLevel::Info, "Job queued").await?;
    tx.commit().await?;

    Job::try_from(row)
}

/// List all jobs, newest first
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Job>, StoreError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, type, payload, status, created_at, updated_at,
               started_at, finished_at, attempt_count, last_error
        FROM jobs
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Job::try_from).collect()
}

/// List jobs in one status, newest first
pub async fn find_by_status(pool: &SqlitePool, status: JobStatus) -> Result<Vec<Job>, StoreError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, type, payload, status, created_at, updated_at,
               started_at, finished_at, attempt_count, last_error
        FROM jobs
        WHERE status = ?1
        ORDER BY id DESC
        "#,
    )
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Job::try_from).collect()
}

/// Find a job by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Job>, StoreError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, type, payload, status, created_at, updated_at,
               started_at, finished_at, attempt_count, last_error
        FROM jobs
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Job::try_from).transpose()
}

/// Atomically claim the oldest queued job.
///
/// Selection and the `queued -> running` update are one statement, so two
/// concurrent callers can never both receive the same job.
pub async fn claim_next_queued(pool: &SqlitePool) -> Result<Option<Job>, StoreError> {
    let now = timestamp(Utc::now());

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = 'running',
            started_at = ?1,
            updated_at = ?1,
            last_error = NULL
        WHERE id = (
            SELECT id FROM jobs
            WHERE status = 'queued'
            ORDER BY id ASC
            LIMIT 1
        )
          AND status = 'queued'
        RETURNING id, type, payload, status, created_at, updated_at,
                  started_at, finished_at, attempt_count, last_error
        "#,
    )
    .bind(&now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Ok(None);
    };

    log_repository::append(&mut tx, row.id, LogLevel::Info, "Job started").await?;
    tx.commit().await?;

    Job::try_from(row).map(Some)
}

/// Transition `running -> succeeded`
pub async fn mark_succeeded(pool: &SqlitePool, job_id: i64) -> Result<Job, StoreError> {
    let now = timestamp(Utc::now());

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = 'succeeded',
            finished_at = ?1,
            updated_at = ?1,
            attempt_count = attempt_count + 1,
            last_error = NULL
        WHERE id = ?2 AND status = 'running'
        RETURNING id, type, payload, status, created_at, updated_at,
                  started_at, finished_at, attempt_count, last_error
        "#,
    )
    .bind(&now)
    .bind(job_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Err(StoreError::InvalidTransition {
            job_id,
            expected: JobStatus::Running,
        });
    };

    log_repository::append(&mut tx, job_id, LogLevel::Info, "Job completed").await?;
    tx.commit().await?;

    Job::try_from(row)
}

/// Transition `running -> failed`, recording `message` as the last error
pub async fn mark_failed(pool: &SqlitePool, job_id: i64, message: &str) -> Result<Job, StoreError> {
    let now = timestamp(Utc::now());

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = 'failed',
            finished_at = ?1,
            updated_at = ?1,
            attempt_count = attempt_count + 1,
            last_error = ?2
        WHERE id = ?3 AND status = 'running'
        RETURNING id, type, payload, status, created_at, updated_at,
                  started_at, finished_at, attempt_count, last_error
        "#,
    )
    .bind(&now)
    .bind(message)
    .bind(job_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Err(StoreError::InvalidTransition {
            job_id,
            expected: JobStatus::Running,
        });
    };

    log_repository::append(
        &mut tx,
        job_id,
        LogLevel::Error,
        &format!("Job failed: {}", message),
    )
    .await?;
    tx.commit().await?;

    Job::try_from(row)
}

/// Transition `failed -> queued`.
///
/// Returns `None` without touching anything when the job is missing or not
/// failed. `attempt_count` is kept.
pub async fn retry(pool: &SqlitePool, job_id: i64) -> Result<Option<Job>, StoreError> {
    let now = timestamp(Utc::now());

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = 'queued',
            updated_at = ?1,
            started_at = NULL,
            finished_at = NULL,
            last_error = NULL
        WHERE id = ?2 AND status = 'failed'
        RETURNING id, type, payload, status, created_at, updated_at,
                  started_at, finished_at, attempt_count, last_error
        "#,
    )
    .bind(&now)
    .bind(job_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Ok(None);
    };

    log_repository::append(&mut tx, job_id, LogLevel::Info, "Job retried").await?;
    tx.commit().await?;

    Job::try_from(row).map(Some)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: i64,
    #[sqlx(rename = "type")]
    job_type: String,
    payload: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    started_at: Option<chrono::DateTime<chrono::Utc>>,
    finished_at: Option<chrono::DateTime<chrono::Utc>>,
    attempt_count: u32,
    last_error: Option<String>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|e| StoreError::CorruptRecord(format!("job {}: {}", row.id, e)))?;

        let payload = serde_json::from_str::<Payload>(&row.payload)
            .map_err(|e| StoreError::CorruptRecord(format!("job {} payload: {}", row.id, e)))?;

        Ok(Job {
            id: row.id,
            job_type: row.job_type,
            payload,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            started_at: row.started_at,
            finished_at: row.finished_at,
            attempt_count: row.attempt_count,
            last_error: row.last_error,
        })
    }
}
