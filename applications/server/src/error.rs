/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::{ResolveError, StoreError};
use relay_player::PlayerError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("Media resolver error: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<relay_storage::StorageError> for ServerError {
    fn from(err: relay_storage::StorageError) -> Self {
        ServerError::Storage(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Player(err) => match err {
                PlayerError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                PlayerError::NoActiveTrack(_) | PlayerError::EmptyQueue(_) => {
                    (StatusCode::CONFLICT, err.to_string())
                }
                PlayerError::StorageUnavailable(ref msg) => {
                    tracing::error!("Player storage unavailable: {}", msg);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Storage unavailable".to_string(),
                    )
                }
            },
            ServerError::Resolve(err) => match err {
                ResolveError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                ResolveError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                ref other => {
                    tracing::error!("Media resolver error: {:?}", other);
                    (StatusCode::BAD_GATEWAY, "Media resolver error".to_string())
                }
            },
            ServerError::Store(err) => {
                tracing::error!("Playlist storage error: {}", err);
                match err {
                    StoreError::Corrupt { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                    ),
                    StoreError::Unavailable(_) | StoreError::Timeout(_) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Storage unavailable".to_string(),
                    ),
                }
            }
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
