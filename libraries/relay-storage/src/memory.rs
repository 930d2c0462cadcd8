//! Process-local player store
//!
//! Holds records and playlists behind async locks. Used by tests and by the
//! `memory` storage backend for local development; records do not survive a
//! restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_core::{
    ChatId, NewPlaylist, PlayerRecord, PlayerStore, Playlist, PlaylistStore, StoreError,
    StoreResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryPlayerStore {
    records: RwLock<HashMap<ChatId, PlayerRecord>>,
    playlists: RwLock<Vec<Playlist>>,
    last_playlist_id: AtomicI64,
    offline: AtomicBool,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend going away (or coming back)
    ///
    /// While offline every operation fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("memory store is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn get(&self, chat_id: &ChatId) -> StoreResult<Option<PlayerRecord>> {
        self.check_online()?;
        Ok(self.records.read().await.get(chat_id).cloned())
    }

    async fn put(&self, record: &PlayerRecord) -> StoreResult<()> {
        self.check_online()?;
        self.records
            .write()
            .await
            .insert(record.chat_id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, chat_id: &ChatId) -> StoreResult<bool> {
        self.check_online()?;
        Ok(self.records.write().await.remove(chat_id).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    async fn reap_stale(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        self.check_online()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.updated_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}

#[async_trait]
impl PlaylistStore for MemoryPlayerStore {
    async fn create_playlist(&self, draft: NewPlaylist) -> StoreResult<Playlist> {
        self.check_online()?;
        let id = self.last_playlist_id.fetch_add(1, Ordering::SeqCst) + 1;
        let playlist = draft.into_playlist(id);
        self.playlists.write().await.push(playlist.clone());
        Ok(playlist)
    }

    async fn playlists_for_user(&self, user_id: &str) -> StoreResult<Vec<Playlist>> {
        self.check_online()?;
        Ok(self
            .playlists
            .read()
            .await
            .iter()
            .filter(|playlist| playlist.user_id == user_id)
            .cloned()
            .collect())
    }
}
