use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt;

use super::models::{Job, JobId, JobStatus};

/// Loading the job collection failed
#[derive(Debug)]
pub enum FetchError {
    /// The store could not be reached or rejected the query
    Transport(String),

    /// A record came back that does not fit the job model
    InvalidRecord { id: JobId, reason: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Failed to fetch jobs: {}", msg),
            FetchError::InvalidRecord { id, reason } => {
                write!(f, "Invalid job record {}: {}", id, reason)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// A single-field mutation failed
#[derive(Debug)]
pub enum UpdateError {
    /// No record with this id exists in the store
    NotFound(JobId),

    /// The store could not be reached or rejected the write
    Transport(String),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::NotFound(id) => write!(f, "Job not found: {}", id),
            UpdateError::Transport(msg) => write!(f, "Failed to update job: {}", msg),
        }
    }
}

impl std::error::Error for UpdateError {}

/// Remote store holding the job records
#[async_trait]
pub trait JobRepository: Send + Sync + 'static {
    /// All jobs, ordered as [`order_jobs`] orders them
    async fn list(&self) -> Result<Vec<Job>, FetchError>;

    /// Set the status and refresh `updated_at`
    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), UpdateError>;

    /// Set the memo and refresh `updated_at`
    async fn update_memo(&self, id: JobId, memo: &str) -> Result<(), UpdateError>;
}

/// Deadline ascending with missing deadlines last, then newest first
pub fn compare_jobs(a: &Job, b: &Job) -> Ordering {
    let by_deadline = match (a.deadline_date, b.deadline_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_deadline.then_with(|| b.created_at.cmp(&a.created_at))
}

/// Stable sort into list order
pub fn order_jobs(jobs: &mut [Job]) {
    jobs.sort_by(compare_jobs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn job(id: i64, deadline: Option<(u32, u32)>, created_hour: u32) -> Job {
        let created = Utc.with_ymd_and_hms(2026, 9, 1, created_hour, 0, 0).unwrap();
        Job {
            id: JobId(id),
            company: None,
            title: None,
            url: None,
            deadline_raw: None,
            deadline_date: deadline.and_then(|(m, d)| NaiveDate::from_ymd_opt(2026, m, d)),
            status: JobStatus::Pending,
            memo: String::new(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn orders_by_deadline_then_newest_with_missing_deadlines_last() {
        let mut jobs = vec![
            job(1, None, 1),
            job(2, Some((10, 20)), 1),
            job(3, Some((10, 15)), 1),
            job(4, None, 5),
            job(5, Some((10, 20)), 9),
            job(6, Some((10, 15)), 3),
        ];
        order_jobs(&mut jobs);
        let ids: Vec<i64> = jobs.iter().map(|job| job.id.0).collect();
        assert_eq!(ids, vec![6, 3, 5, 2, 4, 1]);
    }

    #[test]
    fn errors_display_their_cause() {
        assert_eq!(UpdateError::NotFound(JobId(7)).to_string(), "Job not found: 7");
        let err = FetchError::InvalidRecord {
            id: JobId(3),
            reason: "unknown job status: \"done\"".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid job record 3: unknown job status: \"done\"");
    }
}
