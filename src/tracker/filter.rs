use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::deadline::{days_until, URGENT_WINDOW_DAYS};
use super::models::{Job, JobStatus, UnknownStatus};

/// Status selector value: every status, or exactly one
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: JobStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

fn within_urgent_window(job: &Job, today: NaiveDate) -> bool {
    job.deadline_date
        .map(|deadline| (0..=URGENT_WINDOW_DAYS).contains(&days_until(deadline, today)))
        .unwrap_or(false)
}

/// Keep the jobs matching both the status filter and, when `urgent_only` is
/// set, the urgent window. Input order is preserved.
pub fn apply_filters<'a>(
    jobs: &'a [Job],
    status_filter: StatusFilter,
    urgent_only: bool,
    today: NaiveDate,
) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| status_filter.matches(job.status))
        .filter(|job| !urgent_only || within_urgent_window(job, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::models::JobId;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn job(id: i64, status: JobStatus, offset_days: Option<i64>) -> Job {
        let stamp = Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap();
        Job {
            id: JobId(id),
            company: Some(format!("company-{}", id)),
            title: Some("Backend Engineer".to_string()),
            url: Some(format!("https://jobs.example.com/{}", id)),
            deadline_raw: offset_days.map(|d| format!("+{} days", d)),
            deadline_date: offset_days.map(|d| today() + Duration::days(d)),
            status,
            memo: String::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn ids(jobs: &[&Job]) -> Vec<i64> {
        jobs.iter().map(|job| job.id.0).collect()
    }

    fn sample() -> Vec<Job> {
        vec![
            job(1, JobStatus::Pending, Some(2)),
            job(2, JobStatus::Applied, Some(10)),
            job(3, JobStatus::Pending, Some(-1)),
            job(4, JobStatus::Hired, None),
            job(5, JobStatus::Applied, Some(0)),
            job(6, JobStatus::Pending, Some(3)),
            job(7, JobStatus::Pending, Some(4)),
        ]
    }

    #[test]
    fn no_filters_returns_everything_in_order() {
        let jobs = sample();
        let filtered = apply_filters(&jobs, StatusFilter::All, false, today());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn urgent_only_keeps_jobs_due_within_three_days() {
        let jobs = vec![
            job(1, JobStatus::Pending, Some(2)),
            job(2, JobStatus::Applied, Some(10)),
        ];
        let filtered = apply_filters(&jobs, StatusFilter::All, true, today());
        assert_eq!(ids(&filtered), vec![1]);

        let jobs = sample();
        let filtered = apply_filters(&jobs, StatusFilter::All, true, today());
        assert_eq!(ids(&filtered), vec![1, 5, 6]);
    }

    #[test]
    fn status_filter_keeps_exact_matches() {
        let jobs = sample();
        let filtered = apply_filters(&jobs, StatusFilter::Only(JobStatus::Applied), false, today());
        assert_eq!(ids(&filtered), vec![2, 5]);
    }

    #[test]
    fn filters_compose_by_conjunction() {
        let jobs = sample();
        let filtered = apply_filters(&jobs, StatusFilter::Only(JobStatus::Pending), true, today());
        assert_eq!(ids(&filtered), vec![1, 6]);

        let filtered = apply_filters(&jobs, StatusFilter::Only(JobStatus::Hired), true, today());
        assert!(filtered.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let jobs = sample();
        let filter = StatusFilter::Only(JobStatus::Pending);
        let once: Vec<Job> = apply_filters(&jobs, filter, true, today())
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, filter, true, today());
        assert_eq!(ids(&twice), once.iter().map(|job| job.id.0).collect::<Vec<_>>());
    }

    #[test]
    fn status_filter_parses_all_and_statuses() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "지원완료".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(JobStatus::Applied))
        );
        assert!("ALL".parse::<StatusFilter>().is_err());

        let json = serde_json::to_string(&StatusFilter::Only(JobStatus::Hired)).unwrap();
        assert_eq!(json, "\"최종합격\"");
        let parsed: StatusFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, StatusFilter::All);
    }
}
