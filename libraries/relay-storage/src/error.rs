/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row could not be mapped to a record
    #[error("Invalid row for chat {chat_id}: {reason}")]
    InvalidRow { chat_id: String, reason: String },

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create an invalid row error
    pub fn invalid_row(chat_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            chat_id: chat_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for relay_core::StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidRow { chat_id, reason } => Self::corrupt(chat_id, reason),
            other => Self::unavailable(other.to_string()),
        }
    }
}
