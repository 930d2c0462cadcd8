//! Player records, one row per chat

use crate::StorageError;
use chrono::{DateTime, TimeZone, Utc};
use relay_core::types::{ChatId, PlayerRecord, Track, MAX_VOLUME};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Get the record for a chat
///
/// Returns `None` if the chat has no record
pub async fn get(pool: &SqlitePool, chat_id: &ChatId) -> Result<Option<PlayerRecord>> {
    let row = sqlx::query(
        "SELECT chat_id, current_track, queue, is_playing, position,
                volume, playback_speed, created_at, updated_at
         FROM players WHERE chat_id = ?",
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| from_row(&r)).transpose()
}

/// Create or replace the record for `record.chat_id`
pub async fn upsert(pool: &SqlitePool, record: &PlayerRecord) -> Result<()> {
    let chat_id = record.chat_id.as_str();
    let current_track = record
        .current_track
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| StorageError::invalid_row(chat_id, e.to_string()))?;
    let queue = serde_json::to_string(&record.queue)
        .map_err(|e| StorageError::invalid_row(chat_id, e.to_string()))?;

    sqlx::query(
        "INSERT INTO players
         (chat_id, current_track, queue, is_playing, position,
          volume, playback_speed, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(chat_id)
         DO UPDATE SET
            current_track = excluded.current_track,
            queue = excluded.queue,
            is_playing = excluded.is_playing,
            position = excluded.position,
            volume = excluded.volume,
            playback_speed = excluded.playback_speed,
            updated_at = excluded.updated_at",
    )
    .bind(&record.chat_id)
    .bind(current_track)
    .bind(queue)
    .bind(record.is_playing)
    .bind(record.position)
    .bind(i64::from(record.volume))
    .bind(record.playback_speed)
    .bind(record.created_at.timestamp_millis())
    .bind(record.updated_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the record for a chat
pub async fn delete(pool: &SqlitePool, chat_id: &ChatId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM players WHERE chat_id = ?")
        .bind(chat_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete records not updated since `cutoff`
pub async fn delete_updated_before(pool: &SqlitePool, cutoff: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM players WHERE updated_at < ?")
        .bind(cutoff.timestamp_millis())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Count stored records
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM players")
        .fetch_one(pool)
        .await?;

    Ok(row.try_get("n")?)
}

fn from_row(row: &SqliteRow) -> Result<PlayerRecord> {
    let chat_id: ChatId = row.try_get("chat_id")?;

    let current_track = row
        .try_get::<Option<String>, _>("current_track")?
        .map(|json| serde_json::from_str::<Track>(&json))
        .transpose()
        .map_err(|e| StorageError::invalid_row(chat_id.as_str(), format!("current_track: {e}")))?;

    let queue_json: String = row.try_get("queue")?;
    let queue: Vec<Track> = serde_json::from_str(&queue_json)
        .map_err(|e| StorageError::invalid_row(chat_id.as_str(), format!("queue: {e}")))?;

    let volume: i64 = row.try_get("volume")?;
    let volume = u8::try_from(volume.clamp(0, i64::from(MAX_VOLUME))).unwrap_or(MAX_VOLUME);

    let created_at = millis_to_datetime(&chat_id, row.try_get("created_at")?)?;
    let updated_at = millis_to_datetime(&chat_id, row.try_get("updated_at")?)?;

    Ok(PlayerRecord {
        current_track,
        queue,
        is_playing: row.try_get("is_playing")?,
        position: row.try_get("position")?,
        volume,
        playback_speed: row.try_get("playback_speed")?,
        created_at,
        updated_at,
        chat_id,
    })
}

fn millis_to_datetime(chat_id: &ChatId, millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StorageError::invalid_row(chat_id.as_str(), format!("timestamp {millis}")))
}
