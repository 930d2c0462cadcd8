/// Saved playlist API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use relay_core::{NewPlaylist, Playlist};

/// POST /api/playlists - Save a playlist for a user
pub async fn create(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<NewPlaylist>, JsonRejection>,
) -> Result<Json<Playlist>> {
    let Json(draft) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    let draft = draft
        .normalized()
        .ok_or_else(|| ServerError::BadRequest("userId and name are required".to_string()))?;

    let playlist = app_state.playlists.create_playlist(draft).await?;
    tracing::info!(user_id = %playlist.user_id, id = playlist.id, "Saved playlist");

    Ok(Json(playlist))
}

/// GET /api/playlists/:user_id - A user's playlists, oldest first
pub async fn list(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.playlists.playlists_for_user(user_id.trim()).await?;
    Ok(Json(playlists))
}
