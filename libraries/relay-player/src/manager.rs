//! Player state manager - the single authority over player records
//!
//! Every mutating operation runs the same cycle under the chat's lock:
//! load (or create) the record, compute the next record with a pure
//! transition, and commit it with one `put` only if it differs. Failed
//! transitions commit nothing.

use crate::{
    command::Command,
    error::{PlayerError, Result},
    locks::ChatLocks,
    transitions,
};
use chrono::{DateTime, Utc};
use relay_core::types::now;
use relay_core::{ChatId, PlayerRecord, PlayerStore, StoreError, Track};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Upper bound on a single persistence call
    pub storage_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(5),
        }
    }
}

/// Owns all player-record transitions
///
/// Operations on the same chat are serialized; operations on different chats
/// proceed independently.
pub struct PlayerStateManager {
    store: Arc<dyn PlayerStore>,
    locks: ChatLocks,
    config: ManagerConfig,
}

impl PlayerStateManager {
    /// Create a manager over a store with default configuration
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    pub fn with_config(store: Arc<dyn PlayerStore>, config: ManagerConfig) -> Self {
        Self {
            store,
            locks: ChatLocks::new(),
            config,
        }
    }

    /// Underlying store, for collaborators such as the health monitor
    pub fn store(&self) -> &Arc<dyn PlayerStore> {
        &self.store
    }

    /// Number of chats with an operation in flight
    pub fn active_chats(&self) -> usize {
        self.locks.active()
    }

    /// Return the chat's record, creating the default one if absent
    pub async fn get_or_create(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.mutate(chat_id, "getOrCreate", |record| Ok(record.clone()))
            .await
    }

    /// Alias of `get_or_create` used by polling clients
    pub async fn state(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.get_or_create(chat_id).await
    }

    /// Start `track` from the beginning, replacing the queue
    pub async fn play(&self, chat_id: &ChatId, track: Track) -> Result<PlayerRecord> {
        self.mutate(chat_id, "play", |record| {
            Ok(transitions::play(record, track))
        })
        .await
    }

    pub async fn pause(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.mutate(chat_id, "pause", |record| Ok(transitions::pause(record)))
            .await
    }

    /// Resume playback
    ///
    /// # Errors
    /// `NoActiveTrack` if nothing is loaded; the record is left unchanged.
    pub async fn resume(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.mutate(chat_id, "resume", transitions::resume).await
    }

    /// Stop and rewind, keeping the track and queue
    pub async fn stop(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.mutate(chat_id, "stop", |record| Ok(transitions::stop(record)))
            .await
    }

    /// End the session, deleting the record
    pub async fn end(&self, chat_id: &ChatId) -> Result<()> {
        validate_chat(chat_id)?;
        let _guard = self.locks.lock(chat_id).await;

        let existed = self.storage(self.store.delete(chat_id)).await?;
        tracing::debug!(chat_id = %chat_id, existed, "Session ended");
        Ok(())
    }

    /// Delete every record last updated before `cutoff`
    ///
    /// Runs as one bulk store call without taking chat locks. A mutation
    /// that loaded a record before the delete still commits it afterwards,
    /// so the record comes back with a fresh `updated_at`. Reads that change
    /// nothing never refresh `updated_at`, so a chat that is only polled
    /// expires on schedule.
    pub async fn reap_stale(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let removed = self.storage(self.store.reap_stale(cutoff)).await?;
        if removed > 0 {
            tracing::info!(removed, %cutoff, "Reaped stale player records");
        }
        Ok(removed)
    }

    /// Set the position, clamped to the loaded track's duration
    ///
    /// Does nothing if no track is loaded.
    pub async fn update_position(
        &self,
        chat_id: &ChatId,
        position: f64,
    ) -> Result<PlayerRecord> {
        self.mutate(chat_id, "updatePosition", |record| {
            transitions::update_position(record, position)
        })
        .await
    }

    /// Set the volume, clamped to 0-100
    pub async fn set_volume(&self, chat_id: &ChatId, volume: i64) -> Result<PlayerRecord> {
        self.mutate(chat_id, "setVolume", |record| {
            Ok(transitions::set_volume(record, volume))
        })
        .await
    }

    /// Set the playback speed, clamped to 0.5-2.0
    pub async fn set_playback_speed(
        &self,
        chat_id: &ChatId,
        speed: f64,
    ) -> Result<PlayerRecord> {
        self.mutate(chat_id, "setPlaybackSpeed", |record| {
            transitions::set_playback_speed(record, speed)
        })
        .await
    }

    /// Append a track to the queue
    pub async fn enqueue(&self, chat_id: &ChatId, track: Track) -> Result<PlayerRecord> {
        self.mutate(chat_id, "enqueue", |record| {
            Ok(transitions::enqueue(record, track))
        })
        .await
    }

    /// Drop the queue head and play the next entry
    ///
    /// # Errors
    /// `EmptyQueue` if fewer than two entries are queued.
    pub async fn skip_next(&self, chat_id: &ChatId) -> Result<PlayerRecord> {
        self.mutate(chat_id, "skipNext", transitions::skip_next).await
    }

    /// Run a validated dispatcher command
    ///
    /// Returns `None` for `End`, the resulting record otherwise.
    pub async fn execute(&self, command: Command) -> Result<Option<PlayerRecord>> {
        let record = match command {
            Command::GetOrCreate { chat_id } => self.get_or_create(&chat_id).await?,
            Command::Play { chat_id, track } => self.play(&chat_id, track).await?,
            Command::Pause { chat_id } => self.pause(&chat_id).await?,
            Command::Resume { chat_id } => self.resume(&chat_id).await?,
            Command::Stop { chat_id } => self.stop(&chat_id).await?,
            Command::End { chat_id } => {
                self.end(&chat_id).await?;
                return Ok(None);
            }
            Command::UpdatePosition { chat_id, position } => {
                self.update_position(&chat_id, position).await?
            }
            Command::SetVolume { chat_id, volume } => self.set_volume(&chat_id, volume).await?,
            Command::SetPlaybackSpeed { chat_id, speed } => {
                self.set_playback_speed(&chat_id, speed).await?
            }
            Command::Enqueue { chat_id, track } => self.enqueue(&chat_id, track).await?,
            Command::SkipNext { chat_id } => self.skip_next(&chat_id).await?,
        };
        Ok(Some(record))
    }

    async fn mutate<F>(
        &self,
        chat_id: &ChatId,
        op: &'static str,
        transition: F,
    ) -> Result<PlayerRecord>
    where
        F: FnOnce(&PlayerRecord) -> Result<PlayerRecord>,
    {
        validate_chat(chat_id)?;
        let _guard = self.locks.lock(chat_id).await;

        let (current, created) = match self.storage(self.store.get(chat_id)).await? {
            Some(record) => (record, false),
            None => (PlayerRecord::new(chat_id.clone()), true),
        };

        let mut next = match transition(&current) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(chat_id = %chat_id, op, error = %err, "Transition rejected");
                if created {
                    self.storage(self.store.put(&current)).await?;
                }
                return Err(err);
            }
        };

        if next == current {
            if created {
                self.storage(self.store.put(&current)).await?;
                tracing::debug!(chat_id = %chat_id, op, "Player created");
            }
            return Ok(current);
        }

        next.updated_at = now().max(current.updated_at);
        self.storage(self.store.put(&next)).await?;
        tracing::debug!(
            chat_id = %chat_id,
            op,
            is_playing = next.is_playing,
            position = next.position,
            volume = next.volume,
            speed = next.playback_speed,
            queue_len = next.queue.len(),
            "Player updated"
        );

        Ok(next)
    }

    async fn storage<T>(
        &self,
        call: impl Future<Output = std::result::Result<T, StoreError>>,
    ) -> Result<T> {
        let timeout = self.config.storage_timeout;
        let outcome = tokio::time::timeout(timeout, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(timeout)));

        outcome.map_err(|err| {
            tracing::error!(error = %err, "Player store call failed");
            PlayerError::from(err)
        })
    }
}

fn validate_chat(chat_id: &ChatId) -> Result<()> {
    if chat_id.as_str().trim().is_empty() {
        return Err(PlayerError::validation("chatId is required"));
    }
    Ok(())
}
