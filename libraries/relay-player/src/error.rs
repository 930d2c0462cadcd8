//! Error types for player state management

use relay_core::{ChatId, StoreError};
use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Malformed input parameters
    #[error("Invalid parameter: {0}")]
    Validation(String),

    /// Operation needs a loaded track
    #[error("No active track in chat {0}")]
    NoActiveTrack(ChatId),

    /// Nothing to skip to
    #[error("No tracks in queue to skip to in chat {0}")]
    EmptyQueue(ChatId),

    /// Persistence layer unreachable
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl PlayerError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the caller can recover without operator action
    ///
    /// Validation and domain failures leave the record untouched and can be
    /// reported straight back to the user; storage failures cannot.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<StoreError> for PlayerError {
    fn from(err: StoreError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
