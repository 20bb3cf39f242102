use actix_web::{
    HttpResponse, Responder, delete, get, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use super::dto::{AcceptedResponse, FiltersInput, MemoInput, StatusInput};
use super::service::{DashboardService, ServiceError};
use crate::tracker::JobId;

/// Current snapshot: phase, filters, rendered rows and pending notices
#[get("")]
async fn get_dashboard(service: Data<DashboardService>) -> impl Responder {
    HttpResponse::Ok().json(service.snapshot())
}

#[post("/reload")]
async fn reload(service: Data<DashboardService>) -> Result<HttpResponse, ServiceError> {
    service.reload().await?;
    Ok(HttpResponse::Accepted().json(AcceptedResponse::new("Reload started")))
}

#[put("/filters")]
async fn set_filters(
    service: Data<DashboardService>,
    input: Json<FiltersInput>,
) -> Result<HttpResponse, ServiceError> {
    let FiltersInput { status, urgent_only } = input.into_inner();
    match urgent_only {
        Some(urgent_only) => service.set_filters(status, urgent_only).await?,
        None => service.set_status_filter(status).await?,
    }
    Ok(HttpResponse::Accepted().json(AcceptedResponse::new("Filters applied")))
}

#[post("/filters/urgent/toggle")]
async fn toggle_urgent(service: Data<DashboardService>) -> Result<HttpResponse, ServiceError> {
    service.toggle_urgent_only().await?;
    Ok(HttpResponse::Accepted().json(AcceptedResponse::new("Urgent filter toggled")))
}

#[put("/jobs/{id}/status")]
async fn change_status(
    service: Data<DashboardService>,
    path: Path<i64>,
    input: Json<StatusInput>,
) -> Result<HttpResponse, ServiceError> {
    let id = JobId(path.into_inner());
    service.change_status(id, input.into_inner().status).await?;
    Ok(HttpResponse::Accepted().json(AcceptedResponse::new("Status update submitted")))
}

/// Memo commit, sent by the dashboard when the memo input loses focus
#[put("/jobs/{id}/memo")]
async fn change_memo(
    service: Data<DashboardService>,
    path: Path<i64>,
    input: Json<MemoInput>,
) -> Result<HttpResponse, ServiceError> {
    let id = JobId(path.into_inner());
    service.change_memo(id, input.into_inner().memo).await?;
    Ok(HttpResponse::Accepted().json(AcceptedResponse::new("Memo update submitted")))
}

#[delete("/notices")]
async fn dismiss_notices(service: Data<DashboardService>) -> Result<HttpResponse, ServiceError> {
    service.dismiss_notices().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn dashboard_config(config: &mut ServiceConfig) {
    config.service(
        scope("dashboard")
            .service(get_dashboard)
            .service(reload)
            .service(set_filters)
            .service(toggle_urgent)
            .service(change_status)
            .service(change_memo)
            .service(dismiss_notices),
    );
}
