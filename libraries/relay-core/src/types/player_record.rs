/// Per-chat playback state document
use super::{ChatId, Track};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted volume
pub const MIN_VOLUME: u8 = 0;
/// Highest accepted volume
pub const MAX_VOLUME: u8 = 100;
/// Volume of a freshly created record
pub const DEFAULT_VOLUME: u8 = 50;

/// Slowest accepted playback speed
pub const MIN_SPEED: f64 = 0.5;
/// Fastest accepted playback speed
pub const MAX_SPEED: f64 = 2.0;
/// Playback speed of a freshly created record
pub const DEFAULT_SPEED: f64 = 1.0;

/// Current time at millisecond precision
///
/// Records are persisted with millisecond timestamps, so every timestamp is
/// truncated up front to keep stored and in-memory records identical.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Playback state for one chat
///
/// Invariants after every manager operation:
/// - `0 <= position <= current_track.duration` (0 when no track is loaded)
/// - `volume` within `MIN_VOLUME..=MAX_VOLUME`
/// - `playback_speed` within `MIN_SPEED..=MAX_SPEED`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// Chat this record belongs to
    pub chat_id: ChatId,

    /// Track being played, if any
    pub current_track: Option<Track>,

    /// Upcoming playback order; the head is the current track after `play`
    pub queue: Vec<Track>,

    /// Transport state
    pub is_playing: bool,

    /// Position in seconds
    pub position: f64,

    /// Volume level (0-100)
    pub volume: u8,

    /// Playback rate multiplier
    pub playback_speed: f64,

    /// When the record was first created
    pub created_at: DateTime<Utc>,

    /// Last mutation
    pub updated_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create the default record for a chat
    pub fn new(chat_id: ChatId) -> Self {
        Self::created_at(chat_id, now())
    }

    /// Create the default record with an explicit creation time
    pub fn created_at(chat_id: ChatId, at: DateTime<Utc>) -> Self {
        Self {
            chat_id,
            current_track: None,
            queue: Vec::new(),
            is_playing: false,
            position: 0.0,
            volume: DEFAULT_VOLUME,
            playback_speed: DEFAULT_SPEED,
            created_at: at,
            updated_at: at,
        }
    }

    /// Whether a track is loaded
    pub fn has_track(&self) -> bool {
        self.current_track.is_some()
    }

    /// Duration of the loaded track in seconds
    pub fn track_duration(&self) -> Option<f64> {
        self.current_track.as_ref().map(|t| t.duration)
    }

    /// Whether the record still carries the defaults of a fresh session
    pub fn is_pristine(&self) -> bool {
        self.current_track.is_none()
            && self.queue.is_empty()
            && !self.is_playing
            && self.position == 0.0
            && self.volume == DEFAULT_VOLUME
            && self.playback_speed == DEFAULT_SPEED
    }
}
