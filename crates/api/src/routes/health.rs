//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — always `{"status":"ok"}` while the process serves requests.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
