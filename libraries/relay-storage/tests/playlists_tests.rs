//! Integration tests for SQLite playlist storage


use relay_core::types::NewPlaylist;
use relay_core::{PlaylistStore, StoreError};
use test_helpers::{sample_track, TestDb};

#[tokio::test]
async fn created_playlist_is_listed_with_tracks() {
    let db = TestDb::new().await;
    let store = db.store();
    let tracks = vec![sample_track("abc123", 180.0), sample_track("def456", 240.5)];

    let created = store
        .create_playlist(NewPlaylist::new("7", "Road trip", tracks.clone()))
        .await
        .unwrap();
    assert!(created.id > 0);

    let listed = store.playlists_for_user("7").await.unwrap();
    assert_eq!(listed, vec![created]);
    assert_eq!(listed[0].tracks, tracks);
}

#[tokio::test]
async fn listing_is_scoped_to_user_and_ordered() {
    let db = TestDb::new().await;
    let store = db.store();

    for (user, name) in [("7", "First"), ("8", "Elsewhere"), ("7", "Second")] {
        store
            .create_playlist(NewPlaylist::new(user, name, vec![]))
            .await
            .unwrap();
    }

    let names: Vec<_> = store
        .playlists_for_user("7")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["First", "Second"]);
    assert!(store.playlists_for_user("unknown").await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_tracks_json_is_reported_as_corrupt() {
    let db = TestDb::new().await;
    let store = db.store();
    store
        .create_playlist(NewPlaylist::new("7", "Mix", vec![]))
        .await
        .unwrap();

    sqlx::query("UPDATE playlists SET tracks = '{' WHERE user_id = '7'")
        .execute(db.pool())
        .await
        .unwrap();

    let err = store.playlists_for_user("7").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}
