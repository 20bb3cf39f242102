use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::tracker::{JobStatus, StatusFilter};

/// Longest memo accepted from the dashboard
pub const MAX_MEMO_CHARS: u64 = 2000;

/// Body of `PUT /dashboard/filters`
///
/// Leaving out `urgent_only` changes the status filter alone.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct FiltersInput {
    pub status: StatusFilter,
    #[serde(default)]
    pub urgent_only: Option<bool>,
}

/// Body of `PUT /dashboard/jobs/{id}/status`
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct StatusInput {
    pub status: JobStatus,
}

/// Body of `PUT /dashboard/jobs/{id}/memo`
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MemoInput {
    #[validate(length(max = MAX_MEMO_CHARS, message = "Memo must be at most 2000 characters"))]
    pub memo: String,
}

/// Acknowledgement for commands handed to the sync controller
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub message: String,
}

impl AcceptedResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
