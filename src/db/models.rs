use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::tracker::models::{Job, JobId, JobStatus};
use crate::tracker::repository::FetchError;

/// Database representation of a job with all fields
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub company: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub deadline_raw: Option<String>,
    pub deadline_date: Option<NaiveDate>,
    pub status: String,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = FetchError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let id = JobId(row.id);
        let status: JobStatus = row.status.parse().map_err(|e| FetchError::InvalidRecord {
            id,
            reason: format!("{}", e),
        })?;

        Ok(Job {
            id,
            company: row.company,
            title: row.title,
            url: row.url,
            deadline_raw: row.deadline_raw,
            deadline_date: row.deadline_date,
            status,
            memo: row.memo.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: &str, memo: Option<&str>) -> JobRow {
        let stamp = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        JobRow {
            id: 11,
            company: Some("Acme".to_string()),
            title: None,
            url: Some("https://jobs.example.com/11".to_string()),
            deadline_raw: Some("10/20 18:00".to_string()),
            deadline_date: NaiveDate::from_ymd_opt(2026, 10, 20),
            status: status.to_string(),
            memo: memo.map(str::to_string),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn row_converts_into_job() {
        let job = Job::try_from(row("서류통과", None)).unwrap();
        assert_eq!(job.id, JobId(11));
        assert_eq!(job.status, JobStatus::ScreenPassed);
        assert_eq!(job.memo, "");
        assert_eq!(job.title, None);
    }

    #[test]
    fn unknown_status_is_an_invalid_record() {
        match Job::try_from(row("done", Some("x"))) {
            Err(FetchError::InvalidRecord { id, .. }) => assert_eq!(id, JobId(11)),
            other => panic!("expected invalid record, got {:?}", other),
        }
    }
}
