//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! to match production behavior and properly test migrations, constraints, and
//! indexes.

use chorus_core::types::{CreatePlaylist, NewTrack, PlaylistId, UserId};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = chorus_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        chorus_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a playlist owned by the given user
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, owner: &UserId) -> PlaylistId {
    let playlist = chorus_storage::playlists::create(
        pool,
        CreatePlaylist {
            name: name.to_string(),
            description: None,
            owner_id: owner.clone(),
        },
    )
    .await
    .expect("Failed to create test playlist");

    playlist.id
}

/// Test fixture: A track submission with metadata derived from the URI
pub fn new_track(uri: &str) -> NewTrack {
    NewTrack {
        track_uri: uri.to_string(),
        artist: format!("Artist of {uri}"),
        title: format!("Title of {uri}"),
        album: format!("Album of {uri}"),
    }
}

/// Test fixture: URIs of the live tracks at consecutive pages
pub async fn live_uris_in_order(pool: &SqlitePool, playlist_id: &PlaylistId, owner: &UserId) -> Vec<String> {
    let page = chorus_storage::playlist_tracks::list_page(
        pool,
        playlist_id,
        owner,
        chorus_core::Page::new(1, 100).unwrap(),
    )
    .await
    .expect("Failed to list tracks");

    page.items.into_iter().map(|t| t.track_uri).collect()
}
