/// Health check API routes
use crate::{jobs::HealthStatus, state::AppState};
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<HealthStatus>,
}

/// GET /api/health - Health check endpoint
///
/// Reports `degraded` while the storage monitor sees failing pings.
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let storage = match &app_state.health {
        Some(monitor) => Some(monitor.status().await),
        None => None,
    };

    let status = match &storage {
        Some(storage) if !storage.healthy => "degraded",
        _ => "ok",
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    })
}
