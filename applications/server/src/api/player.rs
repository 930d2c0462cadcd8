/// Player state API routes
///
/// Query-string routes (`/player/position?chatId=..&position=..`) serve the
/// web app's polling and slider controls; path routes
/// (`/player/:chat_id/pause`) serve bot commands and callback buttons. Both
/// funnel into `PlayerStateManager::execute`.
use crate::{
    error::{Result, ServerError},
    services::video_id,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use relay_core::{PlayerRecord, ResolveError, Track};
use relay_player::{Command, Operation, PlayerError, RawParams};
use serde::Deserialize;

/// Body of `play` and `queue` requests
///
/// Either a resolved track or a free-text query / video URL to resolve.
#[derive(Debug, Default, Deserialize)]
pub struct TrackRequest {
    pub track: Option<Track>,
    pub query: Option<String>,
}

type PlayerResponse = Json<Option<PlayerRecord>>;
type TrackPayload = std::result::Result<Json<TrackRequest>, JsonRejection>;

async fn dispatch(app_state: &AppState, op: Operation, raw: RawParams) -> Result<PlayerResponse> {
    let command = Command::parse(op, raw)?;
    tracing::debug!(chat_id = %command.chat_id(), %op, "Dispatching player command");

    let record = app_state.manager.execute(command).await?;
    Ok(Json(record))
}

/// Unwrap a play/queue body, reporting malformed JSON as a validation error
fn track_request(payload: TrackPayload) -> Result<TrackRequest> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| PlayerError::validation(rejection.body_text()).into())
}

fn path_params(chat_id: String) -> RawParams {
    RawParams {
        chat_id: Some(chat_id),
        ..RawParams::default()
    }
}

/// Resolve the track named by a play/queue request
///
/// A `track` in the body is used as-is; a `query` that looks like a video id
/// or URL is resolved directly, anything else goes through search and takes
/// the first hit.
async fn resolve_track(app_state: &AppState, request: TrackRequest) -> Result<Option<Track>> {
    if let Some(track) = request.track {
        return Ok(Some(track));
    }

    let Some(query) = request.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(None);
    };

    let track = if video_id::extract(query).is_some() {
        app_state.resolver.resolve(query).await?
    } else {
        app_state
            .resolver
            .search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServerError::Resolve(ResolveError::NotFound(query.to_string())))?
    };

    Ok(Some(track))
}

/// GET /api/player/state?chatId= - Current record, created on first access
pub async fn state(
    State(app_state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::GetOrCreate, raw).await
}

/// GET /api/player/position?chatId=&position= - Report playback position
pub async fn position(
    State(app_state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::UpdatePosition, raw).await
}

/// GET /api/player/seek?chatId=&position= - Seek within the current track
pub async fn seek(
    State(app_state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::UpdatePosition, raw).await
}

/// GET /api/player/volume?chatId=&volume=
pub async fn volume(
    State(app_state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::SetVolume, raw).await
}

/// GET /api/player/speed?chatId=&speed=
pub async fn speed(
    State(app_state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::SetPlaybackSpeed, raw).await
}

/// POST /api/player/:chat_id/play - Replace the current track and start it
pub async fn play(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
    payload: TrackPayload,
) -> Result<PlayerResponse> {
    let request = track_request(payload)?;
    let mut raw = path_params(chat_id);
    raw.track = resolve_track(&app_state, request).await?;
    dispatch(&app_state, Operation::Play, raw).await
}

/// POST /api/player/:chat_id/queue - Append a track to the queue
pub async fn enqueue(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
    payload: TrackPayload,
) -> Result<PlayerResponse> {
    let request = track_request(payload)?;
    let mut raw = path_params(chat_id);
    raw.track = resolve_track(&app_state, request).await?;
    dispatch(&app_state, Operation::Enqueue, raw).await
}

/// POST /api/player/:chat_id/pause
pub async fn pause(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::Pause, path_params(chat_id)).await
}

/// POST /api/player/:chat_id/resume
pub async fn resume(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::Resume, path_params(chat_id)).await
}

/// POST /api/player/:chat_id/stop
pub async fn stop(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::Stop, path_params(chat_id)).await
}

/// POST /api/player/:chat_id/end - Delete the session; responds with `null`
pub async fn end(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::End, path_params(chat_id)).await
}

/// POST /api/player/:chat_id/skip - Advance to the next queued track
pub async fn skip(
    State(app_state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<PlayerResponse> {
    dispatch(&app_state, Operation::SkipNext, path_params(chat_id)).await
}
