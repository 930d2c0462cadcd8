//! Core error types shared across the relay
use std::time::Duration;
use thiserror::Error;

/// Result type alias for persistence operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure reported by a `PlayerStore` implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not be reached or rejected the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded
    #[error("Corrupt stored record {chat_id}: {reason}")]
    Corrupt {
        /// Key of the row that failed to decode
        chat_id: String,
        /// Decoding failure
        reason: String,
    },

    /// The backend did not answer in time
    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a corrupt record error
    pub fn corrupt(chat_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            chat_id: chat_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Failure reported by a `MediaResolver` implementation
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Query, id or URL could not be interpreted
    #[error("Invalid media reference: {0}")]
    InvalidInput(String),

    /// Nothing matched the reference
    #[error("No media found for: {0}")]
    NotFound(String),

    /// External extraction tool failed
    #[error("Extractor failed: {0}")]
    Tool(String),

    /// I/O errors (spawning the extractor)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Extractor output could not be parsed
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl ResolveError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a tool failure error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }
}
