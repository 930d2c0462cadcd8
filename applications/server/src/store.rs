/// Player store construction from configuration
use crate::{
    config::{StorageBackend, StorageSettings},
    error::Result,
};
use relay_core::{PlayerStore, PlaylistStore};
use relay_storage::{MemoryPlayerStore, SqlitePlayerStore};
use std::path::Path;
use std::sync::Arc;

/// Both store roles, backed by the same database
#[derive(Clone)]
pub struct Stores {
    pub players: Arc<dyn PlayerStore>,
    pub playlists: Arc<dyn PlaylistStore>,
}

impl Stores {
    fn shared<S: PlayerStore + PlaylistStore + 'static>(store: S) -> Self {
        let store = Arc::new(store);
        Self {
            players: store.clone(),
            playlists: store,
        }
    }
}

/// Open the configured backend, running migrations for SQLite
pub async fn open_store(settings: &StorageSettings) -> Result<Stores> {
    match settings.backend {
        StorageBackend::Sqlite => {
            ensure_parent_dir(&settings.database_url).await?;
            let pool = relay_storage::create_pool(&settings.database_url).await?;
            relay_storage::run_migrations(&pool).await?;
            tracing::info!("Database connected: {}", settings.database_url);
            Ok(Stores::shared(SqlitePlayerStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory player store, state is lost on restart");
            Ok(Stores::shared(MemoryPlayerStore::new()))
        }
    }
}

/// Create the directory holding an on-disk SQLite file
async fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;

    #[tokio::test]
    async fn sqlite_backend_creates_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("relay.db");
        let settings = StorageSettings {
            backend: StorageBackend::Sqlite,
            database_url: format!("sqlite://{}", db_path.display()),
            op_timeout_ms: 1000,
        };

        let stores = open_store(&settings).await.unwrap();

        stores.players.ping().await.unwrap();
        assert!(stores.playlists.playlists_for_user("7").await.unwrap().is_empty());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn memory_backend_needs_no_setup() {
        let settings = StorageSettings {
            backend: StorageBackend::Memory,
            database_url: String::new(),
            op_timeout_ms: 1000,
        };

        open_store(&settings).await.unwrap().players.ping().await.unwrap();
    }

    #[tokio::test]
    async fn unopenable_database_is_a_storage_error() {
        // A directory cannot be opened as a database file
        let dir = tempfile::tempdir().unwrap();
        let settings = StorageSettings {
            backend: StorageBackend::Sqlite,
            database_url: format!("sqlite://{}", dir.path().display()),
            op_timeout_ms: 1000,
        };

        let result = open_store(&settings).await;

        assert!(matches!(result, Err(ServerError::Storage(_))));
    }
}
