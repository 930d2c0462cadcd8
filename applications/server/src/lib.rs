//! Chat Player Relay Server Library
//!
//! HTTP dispatcher, media resolver and housekeeping jobs around the
//! per-chat player state manager.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{ServerConfig, StorageBackend};
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::YtDlpResolver;
pub use state::AppState;
