/// Common test utilities and fixtures
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use relay_core::{MediaResolver, ResolveError, Track};
use relay_player::PlayerStateManager;
use relay_server::{create_router, state::AppState};
use relay_storage::MemoryPlayerStore;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Resolver over a fixed catalogue
pub struct FakeResolver {
    catalogue: Vec<Track>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self {
            catalogue: vec![fixtures::song(), fixtures::other_song()],
        }
    }
}

#[async_trait]
impl MediaResolver for FakeResolver {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ResolveError> {
        let query = query.to_lowercase();
        Ok(self
            .catalogue
            .iter()
            .filter(|track| track.title.to_lowercase().contains(&query))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn resolve(&self, reference: &str) -> Result<Track, ResolveError> {
        let id = relay_server::services::video_id::extract(reference)
            .ok_or_else(|| ResolveError::invalid_input(reference))?;
        self.catalogue
            .iter()
            .find(|track| track.id == id)
            .cloned()
            .ok_or(ResolveError::NotFound(id))
    }

    async fn stream_url(&self, track_id: &str) -> Result<String, ResolveError> {
        if track_id == fixtures::BROKEN_ID {
            return Err(ResolveError::tool("yt-dlp exited with status 1"));
        }
        Ok(format!("https://media.example/{track_id}.webm"))
    }
}

/// Router over an in-memory store and the fake resolver
pub fn create_test_app() -> (Router, Arc<MemoryPlayerStore>) {
    let store = Arc::new(MemoryPlayerStore::new());
    let manager = Arc::new(PlayerStateManager::new(store.clone()));
    let app_state = AppState::new(manager, Arc::new(FakeResolver::new()), store.clone());
    (create_router(app_state), store)
}

/// Send a request and decode the JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    send(app, Method::POST, uri, body).await
}

/// Test tracks
pub mod fixtures {
    use relay_core::Track;

    pub const SONG_ID: &str = "dQw4w9WgXcQ";
    pub const OTHER_ID: &str = "9bZkp7q19f0";
    pub const BROKEN_ID: &str = "xxxxxxxxxxx";

    pub fn song() -> Track {
        Track::new(SONG_ID, "Never Gonna Give You Up", "Rick Astley", 213.0)
    }

    pub fn other_song() -> Track {
        Track::new(OTHER_ID, "Gangnam Style", "PSY", 252.0)
    }
}
