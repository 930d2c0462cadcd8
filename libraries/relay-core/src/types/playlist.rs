/// Saved track lists owned by a user
use super::{now, Track};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named list of tracks saved by a user
///
/// Playlists are keyed by the Telegram user who saved them, not by chat, and
/// live outside any player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Store-assigned identifier
    pub id: i64,

    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Tracks in saved order
    pub tracks: Vec<Track>,

    /// When the playlist was saved
    pub created_at: DateTime<Utc>,
}

/// A playlist that has not been stored yet
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Tracks in saved order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl NewPlaylist {
    /// Create a playlist draft
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            tracks,
        }
    }

    /// Trim the owner and name and sanitize track durations
    ///
    /// Returns `None` if the owner or name is blank.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let user_id = self.user_id.trim().to_string();
        let name = self.name.trim().to_string();
        if user_id.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self {
            user_id,
            name,
            tracks: self.tracks.into_iter().map(Track::sanitized).collect(),
        })
    }

    /// Stored form of this draft
    pub fn into_playlist(self, id: i64) -> Playlist {
        Playlist {
            id,
            user_id: self.user_id,
            name: self.name,
            tracks: self.tracks,
            created_at: now(),
        }
    }
}
