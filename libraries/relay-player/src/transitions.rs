//! Pure state transitions
//!
//! Each function takes the current record and returns the record that should
//! be committed. None of them touch `updated_at`; the manager stamps it only
//! when the result differs from the input, which is what makes repeated
//! identical calls no-ops.

use crate::error::{PlayerError, Result};
use relay_core::types::{PlayerRecord, Track, MAX_SPEED, MAX_VOLUME, MIN_SPEED, MIN_VOLUME};

/// Clamp a volume request into range
pub fn clamp_volume(volume: i64) -> u8 {
    let clamped = volume.clamp(i64::from(MIN_VOLUME), i64::from(MAX_VOLUME));
    u8::try_from(clamped).unwrap_or(MAX_VOLUME)
}

/// Clamp a speed request into range
pub fn clamp_speed(speed: f64) -> f64 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Clamp a position request against a track duration
pub fn clamp_position(position: f64, duration: f64) -> f64 {
    position.clamp(0.0, duration.max(0.0))
}

pub fn play(record: &PlayerRecord, track: Track) -> PlayerRecord {
    let track = track.sanitized();
    PlayerRecord {
        current_track: Some(track.clone()),
        queue: vec![track],
        is_playing: true,
        position: 0.0,
        ..record.clone()
    }
}

pub fn pause(record: &PlayerRecord) -> PlayerRecord {
    PlayerRecord {
        is_playing: false,
        ..record.clone()
    }
}

pub fn resume(record: &PlayerRecord) -> Result<PlayerRecord> {
    if !record.has_track() {
        return Err(PlayerError::NoActiveTrack(record.chat_id.clone()));
    }
    Ok(PlayerRecord {
        is_playing: true,
        ..record.clone()
    })
}

pub fn stop(record: &PlayerRecord) -> PlayerRecord {
    PlayerRecord {
        is_playing: false,
        position: 0.0,
        ..record.clone()
    }
}

pub fn update_position(record: &PlayerRecord, position: f64) -> Result<PlayerRecord> {
    if position.is_nan() {
        return Err(PlayerError::validation("position must be a number"));
    }
    let Some(duration) = record.track_duration() else {
        return Ok(record.clone());
    };
    Ok(PlayerRecord {
        position: clamp_position(position, duration),
        ..record.clone()
    })
}

pub fn set_volume(record: &PlayerRecord, volume: i64) -> PlayerRecord {
    PlayerRecord {
        volume: clamp_volume(volume),
        ..record.clone()
    }
}

pub fn set_playback_speed(record: &PlayerRecord, speed: f64) -> Result<PlayerRecord> {
    if speed.is_nan() {
        return Err(PlayerError::validation("speed must be a number"));
    }
    Ok(PlayerRecord {
        playback_speed: clamp_speed(speed),
        ..record.clone()
    })
}

pub fn enqueue(record: &PlayerRecord, track: Track) -> PlayerRecord {
    let mut next = record.clone();
    next.queue.push(track.sanitized());
    next
}

pub fn skip_next(record: &PlayerRecord) -> Result<PlayerRecord> {
    if record.queue.len() <= 1 {
        return Err(PlayerError::EmptyQueue(record.chat_id.clone()));
    }
    let queue = record.queue[1..].to_vec();
    Ok(PlayerRecord {
        current_track: queue.first().cloned(),
        queue,
        is_playing: true,
        position: 0.0,
        ..record.clone()
    })
}
