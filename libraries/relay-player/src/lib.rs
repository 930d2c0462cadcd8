//! Chat Player Relay - Player State Management
//!
//! The single authority for reading and mutating per-chat player records.
//!
//! This crate provides:
//! - `PlayerStateManager`: atomic, idempotent transitions (play, pause,
//!   resume, stop, end, position, volume, speed, enqueue, skip)
//! - Per-chat serialization without a global lock
//! - Bounds enforcement (position, volume, speed) on every commit
//! - Coercion of loosely-typed dispatcher input into typed `Command`s
//!
//! # Architecture
//!
//! `relay-player` depends only on `relay-core`. Persistence is injected as an
//! `Arc<dyn PlayerStore>`; the manager never retries a failed store call.
//!
//! # Example
//!
//! ```rust,no_run
//! use relay_player::PlayerStateManager;
//! use relay_core::{ChatId, PlayerStore, Track};
//! use std::sync::Arc;
//!
//! # async fn example(store: Arc<dyn PlayerStore>) -> relay_player::Result<()> {
//! let manager = PlayerStateManager::new(store);
//! let chat = ChatId::new("42");
//!
//! let record = manager
//!     .play(&chat, Track::new("abc123", "Song", "Artist", 180.0))
//!     .await?;
//! assert!(record.is_playing);
//!
//! let record = manager.update_position(&chat, 190.0).await?;
//! assert_eq!(record.position, 180.0);
//!
//! manager.end(&chat).await?;
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
mod locks;
mod manager;
pub mod params;
pub mod transitions;

// Public exports
pub use command::{Command, Operation, RawParams};
pub use error::{PlayerError, Result};
pub use manager::{ManagerConfig, PlayerStateManager};
