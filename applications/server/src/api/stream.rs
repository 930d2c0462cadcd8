/// Audio stream resolution API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamQuery {
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub stream_url: String,
}

/// GET /api/stream?videoId= - Resolve a playable audio URL
pub async fn stream(
    State(app_state): State<AppState>,
    Query(params): Query<StreamQuery>,
) -> Result<Json<StreamResponse>> {
    let video_id = params
        .video_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServerError::BadRequest("videoId is required".to_string()))?;

    let stream_url = app_state.resolver.stream_url(video_id).await?;
    tracing::debug!(video_id, "Resolved stream URL");

    Ok(Json(StreamResponse { stream_url }))
}
