//! Saved playlists, many rows per user

use crate::StorageError;
use chrono::{TimeZone, Utc};
use relay_core::types::{NewPlaylist, Playlist, Track};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Insert a playlist and return it with its row id
pub async fn create(pool: &SqlitePool, draft: NewPlaylist) -> Result<Playlist> {
    let tracks = serde_json::to_string(&draft.tracks)
        .map_err(|e| StorageError::invalid_row(draft.user_id.as_str(), e.to_string()))?;
    let created_at = relay_core::types::now();

    let result = sqlx::query(
        "INSERT INTO playlists (user_id, name, tracks, created_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&draft.user_id)
    .bind(&draft.name)
    .bind(tracks)
    .bind(created_at.timestamp_millis())
    .execute(pool)
    .await?;

    let mut playlist = draft.into_playlist(result.last_insert_rowid());
    playlist.created_at = created_at;
    Ok(playlist)
}

/// All playlists saved by a user, in creation order
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT id, user_id, name, tracks, created_at
         FROM playlists WHERE user_id = ?
         ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

fn from_row(row: &SqliteRow) -> Result<Playlist> {
    let id: i64 = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let context = format!("{user_id}/playlist {id}");

    let tracks_json: String = row.try_get("tracks")?;
    let tracks: Vec<Track> = serde_json::from_str(&tracks_json)
        .map_err(|e| StorageError::invalid_row(context.as_str(), format!("tracks: {e}")))?;

    let millis: i64 = row.try_get("created_at")?;
    let created_at = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StorageError::invalid_row(context.as_str(), format!("timestamp {millis}")))?;

    Ok(Playlist {
        id,
        name: row.try_get("name")?,
        tracks,
        created_at,
        user_id,
    })
}
