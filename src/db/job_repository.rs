use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::JobRow;
use crate::tracker::models::{Job, JobId, JobStatus};
use crate::tracker::repository::{FetchError, JobRepository, UpdateError};

impl From<sqlx::Error> for FetchError {
    fn from(err: sqlx::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<sqlx::Error> for UpdateError {
    fn from(err: sqlx::Error) -> Self {
        UpdateError::Transport(err.to_string())
    }
}

/// Job repository backed by the `jobs` table
#[derive(Clone)]
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn list(&self) -> Result<Vec<Job>, FetchError> {
        debug!("Listing jobs");

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, company, title, url, deadline_raw, deadline_date,
                   status, memo, created_at, updated_at
            FROM jobs
            ORDER BY deadline_date ASC NULLS LAST, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} job rows", rows.len());
        rows.into_iter().map(Job::try_from).collect()
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), UpdateError> {
        debug!("Updating job {}: status={}", id, status);

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(UpdateError::NotFound(id));
        }
        Ok(())
    }

    async fn update_memo(&self, id: JobId, memo: &str) -> Result<(), UpdateError> {
        debug!("Updating job {}: memo ({} chars)", id, memo.chars().count());

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET memo = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(memo)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(UpdateError::NotFound(id));
        }
        Ok(())
    }
}
