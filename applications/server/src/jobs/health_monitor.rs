/// Periodic storage health check
use chrono::{DateTime, Utc};
use relay_core::PlayerStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Latest view of storage health, as exposed on `/api/health`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub healthy: bool,
    pub last_ok: Option<DateTime<Utc>>,
    pub latency_ms: Option<u64>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

pub struct HealthMonitor {
    store: Arc<dyn PlayerStore>,
    interval: Duration,
    timeout: Duration,
    max_failures: u32,
    status: RwLock<HealthStatus>,
}

impl HealthMonitor {
    pub fn new(
        store: Arc<dyn PlayerStore>,
        interval: Duration,
        timeout: Duration,
        max_failures: u32,
    ) -> Self {
        Self {
            store,
            interval,
            timeout,
            max_failures,
            status: RwLock::new(HealthStatus {
                healthy: true,
                ..HealthStatus::default()
            }),
        }
    }

    pub async fn status(&self) -> HealthStatus {
        self.status.read().await.clone()
    }

    /// Ping the store once and record the outcome
    ///
    /// Returns `true` once the consecutive failure limit has been reached.
    pub async fn check_once(&self) -> bool {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.store.ping()).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(format!("ping timed out after {:?}", self.timeout)),
        };

        let mut status = self.status.write().await;
        match outcome {
            Ok(()) => {
                if status.consecutive_failures > 0 {
                    tracing::info!(
                        failures = status.consecutive_failures,
                        "Storage connection recovered"
                    );
                }
                *status = HealthStatus {
                    healthy: true,
                    last_ok: Some(Utc::now()),
                    latency_ms: Some(started.elapsed().as_millis() as u64),
                    consecutive_failures: 0,
                    last_error: None,
                };
                false
            }
            Err(error) => {
                status.consecutive_failures += 1;
                status.healthy = false;
                tracing::warn!(
                    failures = status.consecutive_failures,
                    max_failures = self.max_failures,
                    error = %error,
                    "Storage ping failed"
                );
                status.last_error = Some(error);
                status.consecutive_failures >= self.max_failures
            }
        }
    }

    /// Ping on every tick until cancelled or the failure limit is hit,
    /// in which case `shutdown` is cancelled
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        tracing::info!(interval = ?self.interval, "Storage health monitor started");
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if self.check_once().await {
                        tracing::error!(
                            failures = self.max_failures,
                            "Storage unreachable, shutting down"
                        );
                        shutdown.cancel();
                        break;
                    }
                }
            }
        }

        tracing::info!("Storage health monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_storage::MemoryPlayerStore;

    fn monitor(store: Arc<MemoryPlayerStore>, max_failures: u32) -> Arc<HealthMonitor> {
        Arc::new(HealthMonitor::new(
            store,
            Duration::from_millis(10),
            Duration::from_secs(1),
            max_failures,
        ))
    }

    #[tokio::test]
    async fn successful_ping_resets_failures() {
        let store = Arc::new(MemoryPlayerStore::new());
        let monitor = monitor(store.clone(), 3);

        store.set_offline(true);
        assert!(!monitor.check_once().await);
        assert_eq!(monitor.status().await.consecutive_failures, 1);

        store.set_offline(false);
        assert!(!monitor.check_once().await);

        let status = monitor.status().await;
        assert!(status.healthy);
        assert_eq!(status.consecutive_failures, 0);
        assert!(status.last_ok.is_some());
    }

    #[tokio::test]
    async fn repeated_failures_cancel_shutdown_token() {
        let store = Arc::new(MemoryPlayerStore::new());
        store.set_offline(true);
        let monitor = monitor(store, 2);
        let shutdown = CancellationToken::new();

        tokio::time::timeout(Duration::from_secs(5), monitor.clone().run(shutdown.clone()))
            .await
            .unwrap();

        assert!(shutdown.is_cancelled());
        let status = monitor.status().await;
        assert!(!status.healthy);
        assert_eq!(status.consecutive_failures, 2);
    }

    #[tokio::test]
    async fn cancelled_monitor_exits() {
        let monitor = monitor(Arc::new(MemoryPlayerStore::new()), 3);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(5), monitor.run(shutdown))
            .await
            .unwrap();
    }
}
