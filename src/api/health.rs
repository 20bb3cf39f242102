use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

use crate::api::dashboard::DashboardService;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    controller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn controller_state(service: &DashboardService) -> String {
    let state = if service.is_running() { "running" } else { "stopped" };
    state.to_string()
}

/// Health check endpoint
///
/// Checks database connectivity and that the sync controller is still running.
#[get("/health")]
async fn health_check(
    pool: web::Data<Pool<Postgres>>,
    service: web::Data<DashboardService>,
) -> impl Responder {
    let controller = controller_state(&service);
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) if service.is_running() => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            controller,
            error: None,
        }),
        Ok(_) => {
            error!("Health check failed: sync controller stopped");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "connected".to_string(),
                controller,
                error: Some("Sync controller is not running".to_string()),
            })
        }
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                controller,
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Readiness check endpoint
///
/// Returns 503 while the store is unreachable; recovers when it returns.
#[get("/ready")]
async fn readiness_check(
    pool: web::Data<Pool<Postgres>>,
    service: web::Data<DashboardService>,
) -> impl Responder {
    let controller = controller_state(&service);
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            database: "connected".to_string(),
            controller,
            error: None,
        }),
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready".to_string(),
                database: "disconnected".to_string(),
                controller,
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// Liveness check endpoint. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        controller: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn liveness_needs_no_dependencies() {
        let app = test::init_service(App::new().configure(health_config)).await;
        let req = test::TestRequest::get().uri("/live").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "alive");
        assert!(body.get("error").is_none());
    }
}
