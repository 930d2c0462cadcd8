use crate::{players, playlists};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_core::{
    ChatId, NewPlaylist, PlayerRecord, PlayerStore, Playlist, PlaylistStore, StoreResult,
};
use sqlx::SqlitePool;

/// `SQLite`-backed player store
#[derive(Clone)]
pub struct SqlitePlayerStore {
    pool: SqlitePool,
}

impl SqlitePlayerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerStore for SqlitePlayerStore {
    async fn get(&self, chat_id: &ChatId) -> StoreResult<Option<PlayerRecord>> {
        Ok(players::get(&self.pool, chat_id).await?)
    }

    async fn put(&self, record: &PlayerRecord) -> StoreResult<()> {
        Ok(players::upsert(&self.pool, record).await?)
    }

    async fn delete(&self, chat_id: &ChatId) -> StoreResult<bool> {
        Ok(players::delete(&self.pool, chat_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn reap_stale(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        Ok(players::delete_updated_before(&self.pool, cutoff).await?)
    }
}

#[async_trait]
impl PlaylistStore for SqlitePlayerStore {
    async fn create_playlist(&self, draft: NewPlaylist) -> StoreResult<Playlist> {
        Ok(playlists::create(&self.pool, draft).await?)
    }

    async fn playlists_for_user(&self, user_id: &str) -> StoreResult<Vec<Playlist>> {
        Ok(playlists::list_for_user(&self.pool, user_id).await?)
    }
}
