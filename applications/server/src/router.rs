/// HTTP router
use crate::{api, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the `/api` router over shared state
pub fn create_router(app_state: AppState) -> Router {
    let player_routes = Router::new()
        // Polled by the web app, parameters in the query string
        .route("/state", get(api::player::state))
        .route("/position", get(api::player::position))
        .route("/seek", get(api::player::seek))
        .route("/volume", get(api::player::volume))
        .route("/speed", get(api::player::speed))
        // Bot commands and inline buttons
        .route("/:chat_id/play", post(api::player::play))
        .route("/:chat_id/queue", post(api::player::enqueue))
        .route("/:chat_id/pause", post(api::player::pause))
        .route("/:chat_id/resume", post(api::player::resume))
        .route("/:chat_id/stop", post(api::player::stop))
        .route("/:chat_id/end", post(api::player::end))
        .route("/:chat_id/skip", post(api::player::skip));

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/search", get(api::search::search))
        .route("/stream", get(api::stream::stream))
        .route("/playlists", post(api::playlists::create))
        .route("/playlists/:user_id", get(api::playlists::list))
        .nest("/player", player_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
