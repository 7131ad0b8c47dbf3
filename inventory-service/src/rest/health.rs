//! Health and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::AppState;

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Readiness probe; verifies the store is reachable
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready" })),
            )
        }
    }
}
