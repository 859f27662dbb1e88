//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /` — service banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Medicine Information API",
    })
}

/// `GET /health` — connection check.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
