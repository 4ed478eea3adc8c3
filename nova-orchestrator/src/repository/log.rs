//! Log Repository
//!
//! Append-only storage for job audit entries.

use nova_core::domain::log::{JobLogEntry, LogLevel};
use sqlx::{SqliteConnection, SqlitePool};

use super::{StoreError, timestamp};

/// Append one entry inside the caller's transaction
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    job_id: i64,
    level: LogLevel,
    message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO job_logs (job_id, level, message, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(job_id)
    .bind(level.as_str())
    .bind(message)
    .bind(timestamp(chrono::Utc::now()))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Get all log entries for a job, oldest first
pub async fn find_by_job(pool: &SqlitePool, job_id: i64) -> Result<Vec<JobLogEntry>, StoreError> {
    let rows = sqlx::query_as::<_, LogRow>(
        r#"
        SELECT id, job_id, level, message, created_at
        FROM job_logs
        WHERE job_id = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(JobLogEntry::from).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct LogRow {
    id: i64,
    job_id: i64,
    level: String,
    message: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<LogRow> for JobLogEntry {
    fn from(row: LogRow) -> Self {
        JobLogEntry {
            id: row.id,
            job_id: row.job_id,
            level: row.level,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_pool;
    use crate::repository::job_repository;
    use nova_core::domain::job::Payload;

    #[tokio::test]
    async fn test_unknown_levels_read_back_verbatim() {
        let pool = temp_pool().await;
        let job = job_repository::create(&pool, "sync", &Payload::new())
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        sqlx::query(
            "INSERT INTO job_logs (job_id, level, message, created_at) VALUES (?1, 'notice', 'Operator note', ?2)",
        )
        .bind(job.id)
        .bind(timestamp(chrono::Utc::now()))
        .execute(&mut *conn)
        .await
        .unwrap();
        append(&mut conn, job.id, LogLevel::Warning, "Slow start")
            .await
            .unwrap();

        let logs = find_by_job(&pool, job.id).await.unwrap();
        let levels: Vec<_> = logs.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(levels, vec!["info", "notice", "warning"]);
        assert_eq!(logs[1].message, "Operator note");
    }
}
