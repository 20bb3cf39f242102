use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a job record, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application status of a posting
///
/// The serialized form is the value stored in the `jobs.status` column.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "대기")]
    Pending,
    #[serde(rename = "지원완료")]
    Applied,
    #[serde(rename = "서류통과")]
    ScreenPassed,
    #[serde(rename = "최종합격")]
    Hired,
    #[serde(rename = "불합격")]
    Rejected,
}

impl JobStatus {
    /// Every status, in the order the status selector lists them
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Applied,
        JobStatus::ScreenPassed,
        JobStatus::Hired,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "대기",
            JobStatus::Applied => "지원완료",
            JobStatus::ScreenPassed => "서류통과",
            JobStatus::Hired => "최종합격",
            JobStatus::Rejected => "불합격",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five status values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job status: {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A tracked job posting as held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub company: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Deadline text as it appeared in the posting
    pub deadline_raw: Option<String>,
    pub deadline_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub memo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
