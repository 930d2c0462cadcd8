//! Coercion of loosely-typed dispatcher input
//!
//! Query strings and callback payloads carry every value as text. These
//! helpers turn them into typed values, rejecting anything non-numeric with
//! `PlayerError::Validation` before the manager sees it. Range clamping is
//! left to the manager.

use crate::error::{PlayerError, Result};
use relay_core::{ChatId, Track};

/// Validate a chat identifier
pub fn chat_id(raw: Option<&str>) -> Result<ChatId> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(ChatId::new(id)),
        _ => Err(PlayerError::validation("chatId is required")),
    }
}

/// Parse a position in seconds
pub fn position(raw: Option<&str>) -> Result<f64> {
    finite("position", raw)
}

/// Parse a playback speed multiplier
pub fn speed(raw: Option<&str>) -> Result<f64> {
    finite("speed", raw)
}

/// Parse a volume level
///
/// Fractional input is rounded to the nearest integer.
pub fn volume(raw: Option<&str>) -> Result<i64> {
    let text = required("volume", raw)?;
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }
    // Saturating float-to-int cast; the manager clamps afterwards.
    finite("volume", Some(text)).map(|value| value.round() as i64)
}

/// Require a track payload
pub fn track(raw: Option<Track>) -> Result<Track> {
    let track = raw.ok_or_else(|| PlayerError::validation("track is required"))?;
    if track.id.trim().is_empty() {
        return Err(PlayerError::validation("track.id is required"));
    }
    Ok(track.sanitized())
}

fn required<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(PlayerError::validation(format!("{name} is required"))),
    }
}

fn finite(name: &str, raw: Option<&str>) -> Result<f64> {
    let text = required(name, raw)?;
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PlayerError::validation(format!(
            "{name} must be a number, got {text:?}"
        ))),
    }
}
