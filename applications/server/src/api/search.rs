/// Track search API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use relay_core::Track;
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 25;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/search?query= - Search for tracks
pub async fn search(
    State(app_state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Track>>> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServerError::BadRequest("query is required".to_string()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let tracks = app_state.resolver.search(query, limit).await?;

    Ok(Json(tracks))
}
