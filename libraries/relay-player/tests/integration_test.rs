//! End-to-end scenarios against the SQLite store

use relay_core::{ChatId, PlayerStore, Track};
use relay_player::{Command, Operation, PlayerError, PlayerStateManager, RawParams};
use relay_storage::SqlitePlayerStore;
use std::sync::Arc;
use tempfile::TempDir;

async fn sqlite_manager() -> (PlayerStateManager, Arc<SqlitePlayerStore>, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("relay.db").display());
    let pool = relay_storage::create_pool(&url).await.unwrap();
    relay_storage::run_migrations(&pool).await.unwrap();

    let store = Arc::new(SqlitePlayerStore::new(pool));
    (PlayerStateManager::new(store.clone()), store, temp_dir)
}

fn song() -> Track {
    Track::new("abc123", "Song", "Artist", 180.0)
}

#[tokio::test]
async fn play_seek_stop_end_scenario() {
    let (manager, store, _dir) = sqlite_manager().await;
    let chat = ChatId::new("42");

    let record = manager.play(&chat, song()).await.unwrap();
    assert_eq!(record.current_track.as_ref().unwrap().id, "abc123");
    assert!(record.is_playing);
    assert_eq!(record.position, 0.0);

    let record = manager.update_position(&chat, 190.0).await.unwrap();
    assert_eq!(record.position, 180.0);

    let record = manager.stop(&chat).await.unwrap();
    assert!(!record.is_playing);
    assert_eq!(record.position, 0.0);
    assert_eq!(record.current_track.as_ref().unwrap().id, "abc123");

    manager.end(&chat).await.unwrap();
    assert!(store.get(&chat).await.unwrap().is_none());

    let fresh = manager.get_or_create(&chat).await.unwrap();
    assert!(fresh.is_pristine());
    assert_eq!(fresh.volume, 50);
    assert_eq!(fresh.playback_speed, 1.0);
}

#[tokio::test]
async fn end_forgets_previous_session_settings() {
    let (manager, _store, _dir) = sqlite_manager().await;
    let chat = ChatId::new("42");

    manager.set_volume(&chat, 90).await.unwrap();
    manager.set_playback_speed(&chat, 1.75).await.unwrap();
    manager.end(&chat).await.unwrap();

    let record = manager.get_or_create(&chat).await.unwrap();
    assert_eq!(record.volume, 50);
    assert_eq!(record.playback_speed, 1.0);
}

#[tokio::test]
async fn queue_survives_pause_and_stop() {
    let (manager, _store, _dir) = sqlite_manager().await;
    let chat = ChatId::new("42");

    manager.play(&chat, song()).await.unwrap();
    manager
        .enqueue(&chat, Track::new("def456", "Next", "Artist", 200.0))
        .await
        .unwrap();
    manager.pause(&chat).await.unwrap();
    let record = manager.stop(&chat).await.unwrap();

    assert_eq!(record.queue.len(), 2);

    let record = manager.skip_next(&chat).await.unwrap();
    assert_eq!(record.current_track.unwrap().id, "def456");
    assert!(record.is_playing);
}

#[tokio::test]
async fn resume_after_pause_keeps_position() {
    let (manager, _store, _dir) = sqlite_manager().await;
    let chat = ChatId::new("42");

    manager.play(&chat, song()).await.unwrap();
    manager.update_position(&chat, 61.5).await.unwrap();
    manager.pause(&chat).await.unwrap();
    let record = manager.resume(&chat).await.unwrap();

    assert!(record.is_playing);
    assert_eq!(record.position, 61.5);
}

#[tokio::test]
async fn skip_with_single_track_leaves_record_unchanged() {
    let (manager, store, _dir) = sqlite_manager().await;
    let chat = ChatId::new("42");
    manager.play(&chat, song()).await.unwrap();
    let before = store.get(&chat).await.unwrap();

    let err = manager.skip_next(&chat).await.unwrap_err();

    assert!(matches!(err, PlayerError::EmptyQueue(_)));
    assert_eq!(store.get(&chat).await.unwrap(), before);
}

#[tokio::test]
async fn dispatcher_commands_drive_the_manager() {
    let (manager, _store, _dir) = sqlite_manager().await;

    let play = Command::parse(
        Operation::Play,
        RawParams {
            chat_id: Some("7".to_string()),
            track: Some(song()),
            ..Default::default()
        },
    )
    .unwrap();
    manager.execute(play).await.unwrap();

    let seek = Command::parse(
        "seek".parse().unwrap(),
        RawParams {
            chat_id: Some("7".to_string()),
            position: Some("42".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let record = manager.execute(seek).await.unwrap().unwrap();

    assert_eq!(record.position, 42.0);
}
