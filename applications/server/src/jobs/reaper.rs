/// Stale player record reaper
use relay_core::types::now;
use relay_player::PlayerStateManager;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct RecordReaper {
    manager: Arc<PlayerStateManager>,
    ttl: Duration,
    interval: Duration,
}

impl RecordReaper {
    pub fn new(manager: Arc<PlayerStateManager>, ttl: Duration, interval: Duration) -> Self {
        Self {
            manager,
            ttl,
            interval,
        }
    }

    /// Delete records idle for longer than the TTL
    pub async fn reap_once(&self) -> relay_player::Result<u64> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        let cutoff = now()
            .checked_sub_signed(ttl)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
        self.manager.reap_stale(cutoff).await
    }

    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(ttl = ?self.ttl, interval = ?self.interval, "Record reaper started");
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.reap_once().await {
                        tracing::error!("Record reaping failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("Record reaper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{ChatId, PlayerRecord, PlayerStore};
    use relay_storage::MemoryPlayerStore;

    #[tokio::test]
    async fn reap_once_removes_only_expired_records() {
        let store = Arc::new(MemoryPlayerStore::new());
        let mut stale = PlayerRecord::new(ChatId::new("stale"));
        stale.updated_at = now() - chrono::Duration::days(2);
        store.put(&stale).await.unwrap();
        store.put(&PlayerRecord::new(ChatId::new("fresh"))).await.unwrap();

        let manager = Arc::new(PlayerStateManager::new(store.clone()));
        let reaper = RecordReaper::new(
            manager,
            Duration::from_secs(86_400),
            Duration::from_secs(3600),
        );

        assert_eq!(reaper.reap_once().await.unwrap(), 1);
        assert!(store.get(&ChatId::new("stale")).await.unwrap().is_none());
        assert!(store.get(&ChatId::new("fresh")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn offline_store_reports_storage_error() {
        let store = Arc::new(MemoryPlayerStore::new());
        store.set_offline(true);
        let reaper = RecordReaper::new(
            Arc::new(PlayerStateManager::new(store)),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );

        assert!(matches!(
            reaper.reap_once().await,
            Err(relay_player::PlayerError::StorageUnavailable(_))
        ));
    }
}
