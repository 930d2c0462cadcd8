/// Track descriptor produced by the media resolver
use serde::{Deserialize, Serialize};

/// Immutable metadata for a playable item
///
/// `id` is the opaque external identifier (for YouTube, the 11-character
/// video id). `duration` is in seconds and never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// External identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist or channel name
    #[serde(default)]
    pub artist: String,

    /// Duration in seconds
    #[serde(default)]
    pub duration: f64,

    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: String,
}

impl Track {
    /// Create a track without a thumbnail
    ///
    /// Negative or non-finite durations are stored as 0.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration: sanitize_duration(duration),
            thumbnail: String::new(),
        }
    }

    /// Attach a thumbnail URL
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Copy of this track with the duration forced into range
    ///
    /// Tracks arriving over the wire bypass `new`, so callers normalise them
    /// before handing them to the player.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.duration = sanitize_duration(self.duration);
        self
    }
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_nan_durations_become_zero() {
        assert_eq!(Track::new("a", "t", "x", -5.0).duration, 0.0);
        assert_eq!(Track::new("a", "t", "x", f64::NAN).duration, 0.0);
        assert_eq!(Track::new("a", "t", "x", f64::INFINITY).duration, 0.0);
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let track: Track = serde_json::from_str(r#"{"id":"abc123","title":"Song"}"#).unwrap();
        assert_eq!(track.id, "abc123");
        assert_eq!(track.artist, "");
        assert_eq!(track.duration, 0.0);
    }

    #[test]
    fn sanitized_fixes_wire_durations() {
        let track: Track =
            serde_json::from_str(r#"{"id":"a","title":"t","duration":-3}"#).unwrap();
        assert_eq!(track.sanitized().duration, 0.0);
    }
}
