//! Concurrency contract: same-chat serialization, cross-chat independence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_core::{ChatId, PlayerRecord, PlayerStore, StoreResult, Track};
use relay_player::{ManagerConfig, PlayerError, PlayerStateManager};
use relay_storage::MemoryPlayerStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Store that widens the read-modify-write window
///
/// Reads for chats listed in `slow_chats` are delayed by `delay`, giving
/// interleaved writers every chance to lose updates.
struct SlowStore {
    inner: MemoryPlayerStore,
    delay: Duration,
    slow_chats: HashSet<String>,
}

impl SlowStore {
    fn new(delay: Duration, slow_chats: &[&str]) -> Self {
        Self {
            inner: MemoryPlayerStore::new(),
            delay,
            slow_chats: slow_chats.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

#[async_trait]
impl PlayerStore for SlowStore {
    async fn get(&self, chat_id: &ChatId) -> StoreResult<Option<PlayerRecord>> {
        if self.slow_chats.contains(chat_id.as_str()) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.get(chat_id).await
    }

    async fn put(&self, record: &PlayerRecord) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.put(record).await
    }

    async fn delete(&self, chat_id: &ChatId) -> StoreResult<bool> {
        self.inner.delete(chat_id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn reap_stale(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        self.inner.reap_stale(cutoff).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_volume_sets_keep_a_submitted_value() {
    let store = Arc::new(SlowStore::new(Duration::from_millis(2), &["42"]));
    let manager = Arc::new(PlayerStateManager::new(store));
    let chat = ChatId::new("42");

    let volumes: Vec<i64> = (0..32).map(|i| i * 7 - 20).collect();
    let handles: Vec<_> = volumes
        .iter()
        .map(|&volume| {
            let manager = Arc::clone(&manager);
            let chat = chat.clone();
            tokio::spawn(async move { manager.set_volume(&chat, volume).await })
        })
        .collect();

    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert!(record.volume <= 100);
    }

    let allowed: HashSet<u8> = volumes
        .iter()
        .map(|v| u8::try_from((*v).clamp(0, 100)).unwrap())
        .collect();
    let final_volume = manager.get_or_create(&chat).await.unwrap().volume;
    assert!(allowed.contains(&final_volume));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enqueues_are_not_lost() {
    let store = Arc::new(SlowStore::new(Duration::from_millis(1), &["42"]));
    let manager = Arc::new(PlayerStateManager::new(store));
    let chat = ChatId::new("42");

    let handles: Vec<_> = (0..25)
        .map(|i| {
            let manager = Arc::clone(&manager);
            let chat = chat.clone();
            tokio::spawn(async move {
                let track = Track::new(format!("track{i:02}"), "Song", "Artist", 60.0);
                manager.enqueue(&chat, track).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = manager.get_or_create(&chat).await.unwrap();
    assert_eq!(record.queue.len(), 25);
    let ids: HashSet<_> = record.queue.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_position_and_volume_updates_both_land() {
    let store = Arc::new(SlowStore::new(Duration::from_millis(5), &["42"]));
    let manager = Arc::new(PlayerStateManager::new(store));
    let chat = ChatId::new("42");
    manager
        .play(&chat, Track::new("abc123", "Song", "Artist", 180.0))
        .await
        .unwrap();

    let bot = {
        let manager = Arc::clone(&manager);
        let chat = chat.clone();
        tokio::spawn(async move { manager.set_volume(&chat, 15).await })
    };
    let web = {
        let manager = Arc::clone(&manager);
        let chat = chat.clone();
        tokio::spawn(async move { manager.update_position(&chat, 95.0).await })
    };
    bot.await.unwrap().unwrap();
    web.await.unwrap().unwrap();

    let record = manager.get_or_create(&chat).await.unwrap();
    assert_eq!(record.volume, 15);
    assert_eq!(record.position, 95.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_chat_does_not_block_other_chats() {
    let store = Arc::new(SlowStore::new(Duration::from_secs(2), &["slow"]));
    let manager = Arc::new(PlayerStateManager::new(store));

    let slow = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.pause(&ChatId::new("slow")).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let fast = tokio::time::timeout(
        Duration::from_millis(500),
        manager.set_volume(&ChatId::new("fast"), 70),
    )
    .await;

    assert!(fast.is_ok(), "unrelated chat waited on another chat's lock");
    assert_eq!(fast.unwrap().unwrap().volume, 70);
    slow.abort();
}

#[tokio::test]
async fn hung_store_times_out_as_storage_unavailable() {
    let store = Arc::new(SlowStore::new(Duration::from_secs(60), &["42"]));
    let manager = PlayerStateManager::with_config(
        store,
        ManagerConfig {
            storage_timeout: Duration::from_millis(30),
        },
    );

    let err = manager.pause(&ChatId::new("42")).await.unwrap_err();
    assert!(matches!(err, PlayerError::StorageUnavailable(_)));
}
