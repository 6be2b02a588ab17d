use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready
pub async fn readiness(db: web::Data<Arc<DatabaseConnection>>) -> HttpResponse {
    let is_ready = db.ping().await.is_ok();

    let status_code = if is_ready {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(serde_json::json!({
        "status": if is_ready { "ready" } else { "not_ready" },
        "database": if is_ready { "connected" } else { "disconnected" },
    }))
}

/// GET /health/live
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
    }))
}
