//! Chat Player Relay Storage
//!
//! Persistence adapters for per-chat player records and per-user playlists.
//!
//! This crate provides two implementations of `PlayerStore` and `PlaylistStore`:
//!
//! - **`SqlitePlayerStore`**: durable `SQLite` storage, one row per chat
//! - **`MemoryPlayerStore`**: process-local map for tests and development
//!
//! # Example
//!
//! ```rust,no_run
//! use relay_storage::{create_pool, run_migrations, SqlitePlayerStore};
//! use relay_core::{ChatId, PlayerStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://relay.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqlitePlayerStore::new(pool);
//! let record = store.get(&ChatId::new("42")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod sqlite;

// Vertical slices
pub mod players;
pub mod playlists;

pub use error::StorageError;
pub use memory::MemoryPlayerStore;
pub use sqlite::SqlitePlayerStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://relay.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
