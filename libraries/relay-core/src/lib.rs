//! Chat Player Relay Core
//!
//! Transport-agnostic domain types, collaborator traits and error handling
//! shared by the storage layer, the player state manager and the server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlayerRecord`, `ChatId`, `Playlist`
//! - **Collaborator Traits**: `PlayerStore` and `PlaylistStore` (persistence),
//!   `MediaResolver` (search/extraction)
//! - **Error Handling**: `StoreError` and `ResolveError`
//!
//! # Example
//!
//! ```rust
//! use relay_core::types::{ChatId, PlayerRecord, Track};
//!
//! let chat = ChatId::new("42");
//! let record = PlayerRecord::new(chat.clone());
//! assert!(record.current_track.is_none());
//! assert_eq!(record.volume, 50);
//!
//! let track = Track::new("abc123", "Song", "Artist", 180.0);
//! assert_eq!(track.duration, 180.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ResolveError, StoreError, StoreResult};
pub use storage::{PlayerStore, PlaylistStore};
pub use traits::MediaResolver;
pub use types::{ChatId, NewPlaylist, PlayerRecord, Playlist, Track};
