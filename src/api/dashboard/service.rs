use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use tracing::{error, info};

use crate::api::validation::ErrorResponse;
use crate::tracker::controller::{Command, ControllerClosed, ControllerHandle, Snapshot};
use crate::tracker::{JobId, JobStatus, StatusFilter};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// The sync controller task is no longer accepting commands
    ControllerUnavailable,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ControllerUnavailable => write!(f, "Sync controller unavailable"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ControllerClosed> for ServiceError {
    fn from(_: ControllerClosed) -> Self {
        ServiceError::ControllerUnavailable
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ControllerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::ControllerUnavailable => {
                error!("Dashboard request rejected: sync controller unavailable");
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: "Service unavailable".to_string(),
                    fields: serde_json::json!({"message": "Sync controller is not running"}),
                })
            }
        }
    }
}

/// Dashboard operations, forwarded to the sync controller
pub struct DashboardService {
    handle: ControllerHandle,
}

impl DashboardService {
    pub fn new(handle: ControllerHandle) -> Self {
        Self { handle }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.handle.snapshot()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_closed()
    }

    pub async fn reload(&self) -> Result<(), ServiceError> {
        info!("Service: Reload requested");
        Ok(self.handle.send(Command::Reload).await?)
    }

    pub async fn set_filters(&self, status_filter: StatusFilter, urgent_only: bool) -> Result<(), ServiceError> {
        info!("Service: Filters set to status={}, urgent_only={}", status_filter, urgent_only);
        Ok(self
            .handle
            .send(Command::SetFilters {
                status_filter,
                urgent_only,
            })
            .await?)
    }

    pub async fn set_status_filter(&self, status_filter: StatusFilter) -> Result<(), ServiceError> {
        info!("Service: Status filter set to {}", status_filter);
        Ok(self.handle.send(Command::SetStatusFilter(status_filter)).await?)
    }

    pub async fn toggle_urgent_only(&self) -> Result<(), ServiceError> {
        Ok(self.handle.send(Command::ToggleUrgentOnly).await?)
    }

    pub async fn change_status(&self, id: JobId, status: JobStatus) -> Result<(), ServiceError> {
        info!("Service: Status of job {} changed to {}", id, status);
        Ok(self.handle.send(Command::StatusChanged { id, status }).await?)
    }

    pub async fn change_memo(&self, id: JobId, memo: String) -> Result<(), ServiceError> {
        info!("Service: Memo of job {} committed", id);
        Ok(self.handle.send(Command::MemoChanged { id, memo }).await?)
    }

    pub async fn dismiss_notices(&self) -> Result<(), ServiceError> {
        Ok(self.handle.send(Command::DismissNotices).await?)
    }
}
