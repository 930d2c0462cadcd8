//! Persistence adapter trait

use crate::error::StoreResult;
use crate::types::{ChatId, NewPlaylist, PlayerRecord, Playlist};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable key-value store holding one `PlayerRecord` per chat
///
/// Implementations are passive: they carry no business logic and never
/// retry. Every failure surfaces as a `StoreError`.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Load the record for a chat, `None` if absent
    async fn get(&self, chat_id: &ChatId) -> StoreResult<Option<PlayerRecord>>;

    /// Insert or replace the record keyed by `record.chat_id`
    async fn put(&self, record: &PlayerRecord) -> StoreResult<()>;

    /// Remove the record for a chat
    ///
    /// Returns whether a record existed.
    async fn delete(&self, chat_id: &ChatId) -> StoreResult<bool>;

    /// Cheap liveness probe used by the health monitor
    async fn ping(&self) -> StoreResult<()>;

    /// Delete every record last updated before `cutoff`
    ///
    /// Returns the number of records removed.
    async fn reap_stale(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;
}

/// Per-user saved playlists
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Store a normalized draft and return it with its assigned id
    async fn create_playlist(&self, draft: NewPlaylist) -> StoreResult<Playlist>;

    /// Every playlist saved by `user_id`, oldest first
    async fn playlists_for_user(&self, user_id: &str) -> StoreResult<Vec<Playlist>>;
}
