use crate::api::schemas::health::HealthResponse;
use axum::{Json, response::IntoResponse};

/// Liveness check: always `{"ok": true}` while the process is serving.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { ok: true })
}
