//! Collaborator traits consumed by the relay
use crate::error::ResolveError;
use crate::types::Track;
use async_trait::async_trait;

/// Resolves user input to track descriptors and playable streams
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Search for tracks matching a free-text query
    ///
    /// # Errors
    /// Returns an error if the query is empty or the backend fails
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ResolveError>;

    /// Resolve a video id or URL to a single track
    ///
    /// # Errors
    /// Returns `InvalidInput` if no id can be extracted from `reference`
    async fn resolve(&self, reference: &str) -> Result<Track, ResolveError>;

    /// Direct audio stream URL for a track id
    async fn stream_url(&self, track_id: &str) -> Result<String, ResolveError>;
}
