/// Shared application state
use crate::jobs::HealthMonitor;
use relay_core::{MediaResolver, PlaylistStore};
use relay_player::PlayerStateManager;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<PlayerStateManager>,
    pub resolver: Arc<dyn MediaResolver>,
    pub playlists: Arc<dyn PlaylistStore>,
    pub health: Option<Arc<HealthMonitor>>,
}

impl AppState {
    pub fn new(
        manager: Arc<PlayerStateManager>,
        resolver: Arc<dyn MediaResolver>,
        playlists: Arc<dyn PlaylistStore>,
    ) -> Self {
        Self {
            manager,
            resolver,
            playlists,
            health: None,
        }
    }

    /// Attach the storage health monitor reported on `/api/health`
    #[must_use]
    pub fn with_health(mut self, health: Arc<HealthMonitor>) -> Self {
        self.health = Some(health);
        self
    }
}
