use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "invoice-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The service has no external dependencies; once it is up it is ready.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}
