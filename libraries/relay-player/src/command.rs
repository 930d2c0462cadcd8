//! Named operations as accepted from the dispatcher

use crate::error::{PlayerError, Result};
use crate::params;
use relay_core::{ChatId, Track};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Operation names understood by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetOrCreate,
    Play,
    Pause,
    Resume,
    Stop,
    End,
    UpdatePosition,
    SetVolume,
    SetPlaybackSpeed,
    Enqueue,
    SkipNext,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::GetOrCreate,
        Operation::Play,
        Operation::Pause,
        Operation::Resume,
        Operation::Stop,
        Operation::End,
        Operation::UpdatePosition,
        Operation::SetVolume,
        Operation::SetPlaybackSpeed,
        Operation::Enqueue,
        Operation::SkipNext,
    ];

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetOrCreate => "getOrCreate",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::End => "end",
            Self::UpdatePosition => "updatePosition",
            Self::SetVolume => "setVolume",
            Self::SetPlaybackSpeed => "setPlaybackSpeed",
            Self::Enqueue => "enqueue",
            Self::SkipNext => "skipNext",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = PlayerError;

    /// Accepts the canonical names plus the short route aliases
    /// (`state`, `position`, `seek`, `volume`, `speed`, `queue`, `skip`, `next`)
    fn from_str(s: &str) -> Result<Self> {
        let op = match s {
            "getOrCreate" | "state" => Self::GetOrCreate,
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "stop" => Self::Stop,
            "end" => Self::End,
            "updatePosition" | "position" | "seek" => Self::UpdatePosition,
            "setVolume" | "volume" => Self::SetVolume,
            "setPlaybackSpeed" | "speed" => Self::SetPlaybackSpeed,
            "enqueue" | "queue" => Self::Enqueue,
            "skipNext" | "skip" | "next" => Self::SkipNext,
            other => {
                return Err(PlayerError::validation(format!(
                    "unknown operation {other:?}"
                )))
            }
        };
        Ok(op)
    }
}

/// Untyped parameters as they arrive from a query string or JSON body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParams {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub track: Option<Track>,
}

/// A validated manager call
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetOrCreate { chat_id: ChatId },
    Play { chat_id: ChatId, track: Track },
    Pause { chat_id: ChatId },
    Resume { chat_id: ChatId },
    Stop { chat_id: ChatId },
    End { chat_id: ChatId },
    UpdatePosition { chat_id: ChatId, position: f64 },
    SetVolume { chat_id: ChatId, volume: i64 },
    SetPlaybackSpeed { chat_id: ChatId, speed: f64 },
    Enqueue { chat_id: ChatId, track: Track },
    SkipNext { chat_id: ChatId },
}

impl Command {
    /// Validate raw parameters for an operation
    pub fn parse(op: Operation, raw: RawParams) -> Result<Self> {
        let chat_id = params::chat_id(raw.chat_id.as_deref())?;
        let command = match op {
            Operation::GetOrCreate => Self::GetOrCreate { chat_id },
            Operation::Play => Self::Play {
                chat_id,
                track: params::track(raw.track)?,
            },
            Operation::Pause => Self::Pause { chat_id },
            Operation::Resume => Self::Resume { chat_id },
            Operation::Stop => Self::Stop { chat_id },
            Operation::End => Self::End { chat_id },
            Operation::UpdatePosition => Self::UpdatePosition {
                chat_id,
                position: params::position(raw.position.as_deref())?,
            },
            Operation::SetVolume => Self::SetVolume {
                chat_id,
                volume: params::volume(raw.volume.as_deref())?,
            },
            Operation::SetPlaybackSpeed => Self::SetPlaybackSpeed {
                chat_id,
                speed: params::speed(raw.speed.as_deref())?,
            },
            Operation::Enqueue => Self::Enqueue {
                chat_id,
                track: params::track(raw.track)?,
            },
            Operation::SkipNext => Self::SkipNext { chat_id },
        };
        Ok(command)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::GetOrCreate { .. } => Operation::GetOrCreate,
            Self::Play { .. } => Operation::Play,
            Self::Pause { .. } => Operation::Pause,
            Self::Resume { .. } => Operation::Resume,
            Self::Stop { .. } => Operation::Stop,
            Self::End { .. } => Operation::End,
            Self::UpdatePosition { .. } => Operation::UpdatePosition,
            Self::SetVolume { .. } => Operation::SetVolume,
            Self::SetPlaybackSpeed { .. } => Operation::SetPlaybackSpeed,
            Self::Enqueue { .. } => Operation::Enqueue,
            Self::SkipNext { .. } => Operation::SkipNext,
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        match self {
            Self::GetOrCreate { chat_id }
            | Self::Play { chat_id, .. }
            | Self::Pause { chat_id }
            | Self::Resume { chat_id }
            | Self::Stop { chat_id }
            | Self::End { chat_id }
            | Self::UpdatePosition { chat_id, .. }
            | Self::SetVolume { chat_id, .. }
            | Self::SetPlaybackSpeed { chat_id, .. }
            | Self::Enqueue { chat_id, .. }
            | Self::SkipNext { chat_id } => chat_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(chat: &str) -> RawParams {
        RawParams {
            chat_id: Some(chat.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn every_canonical_name_round_trips() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn route_aliases_map_to_operations() {
        assert_eq!("seek".parse::<Operation>().unwrap(), Operation::UpdatePosition);
        assert_eq!("speed".parse::<Operation>().unwrap(), Operation::SetPlaybackSpeed);
        assert!("rewind".parse::<Operation>().is_err());
    }

    #[test]
    fn parse_coerces_numeric_strings() {
        let mut params = raw("42");
        params.volume = Some("120".to_string());
        let command = Command::parse(Operation::SetVolume, params).unwrap();
        assert_eq!(
            command,
            Command::SetVolume {
                chat_id: ChatId::new("42"),
                volume: 120
            }
        );
    }

    #[test]
    fn parse_rejects_missing_chat_and_bad_numbers() {
        assert!(matches!(
            Command::parse(Operation::Pause, RawParams::default()),
            Err(PlayerError::Validation(_))
        ));

        let mut params = raw("42");
        params.position = Some("soon".to_string());
        assert!(matches!(
            Command::parse(Operation::UpdatePosition, params),
            Err(PlayerError::Validation(_))
        ));
    }

    #[test]
    fn query_string_shape_deserializes() {
        let params: RawParams =
            serde_json::from_str(r#"{"chatId":"42","position":"12.5"}"#).unwrap();
        let command = Command::parse(Operation::UpdatePosition, params).unwrap();
        assert_eq!(command.chat_id().as_str(), "42");
        assert_eq!(command.operation(), Operation::UpdatePosition);
    }
}
