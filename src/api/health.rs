//! Service banner and health check - public routes.

use super::AppState;
use axum::{Json, Router, routing::get};
use serde::Serialize;

/// Banner and health routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health))
}

/// Response of `GET /`
#[derive(Debug, Serialize)]
pub struct Banner {
    message: &'static str,
    version: &'static str,
}

/// Response of `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "출석 관리 시스템 API 서버",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
