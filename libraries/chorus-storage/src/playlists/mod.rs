//! Playlists vertical slice: CRUD over soft-deleted playlist rows.
//!
//! Ownership doubles as the visibility check: a playlist owned by someone
//! else is reported exactly like a missing one, so existence never leaks.

use crate::error::{Result, StorageError};
use chorus_core::types::{CreatePlaylist, Playlist, PlaylistId, UpdatePlaylist, UserId};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Create a new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(playlist.owner_id.as_str())
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(now.timestamp())
    .bind(now.timestamp())
    .execute(pool)
    .await?;

    Ok(Playlist {
        id,
        owner_id: playlist.owner_id,
        name: playlist.name,
        description: playlist.description,
        created_at: truncate_to_seconds(now)?,
        updated_at: truncate_to_seconds(now)?,
    })
}

/// Get playlist by ID, visible to its owner only
pub async fn get_by_id(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, name, description, created_at, updated_at
        FROM playlists
        WHERE id = ? AND owner_id = ? AND is_deleted = 0
        "#,
    )
    .bind(id.as_str())
    .bind(owner_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(map_playlist).transpose()
}

/// Get all live playlists owned by a user
pub async fn get_user_playlists(pool: &SqlitePool, owner_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, description, created_at, updated_at
        FROM playlists
        WHERE owner_id = ? AND is_deleted = 0
        ORDER BY updated_at DESC
        "#,
    )
    .bind(owner_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_playlist).collect()
}

/// Update playlist name and description
pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
    update: UpdatePlaylist,
) -> Result<Playlist> {
    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, updated_at = ?
        WHERE id = ? AND owner_id = ? AND is_deleted = 0
        "#,
    )
    .bind(&update.name)
    .bind(&update.description)
    .bind(Utc::now().timestamp())
    .bind(id.as_str())
    .bind(owner_id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", id.as_str()));
    }

    get_by_id(pool, id, owner_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))
}

/// Soft-delete a playlist and cascade over its live tracks
///
/// The cascade is a business rule applied in the same transaction, not a
/// database cascade. The playlist row and every track row survive with
/// their flags set.
pub async fn soft_delete(pool: &SqlitePool, id: &PlaylistId, owner_id: &UserId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET is_deleted = 1, updated_at = ?
        WHERE id = ? AND owner_id = ? AND is_deleted = 0
        "#,
    )
    .bind(Utc::now().timestamp())
    .bind(id.as_str())
    .bind(owner_id.as_str())
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", id.as_str()));
    }

    sqlx::query("UPDATE playlist_tracks SET is_deleted = 1 WHERE playlist_id = ? AND is_deleted = 0")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

fn map_playlist(row: sqlx::sqlite::SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: PlaylistId::new(row.get::<String, _>("id")),
        owner_id: UserId::new(row.get::<String, _>("owner_id")),
        name: row.get("name"),
        description: row.get("description"),
        created_at: timestamp(row.get::<i64, _>("created_at"))?,
        updated_at: timestamp(row.get::<i64, _>("updated_at"))?,
    })
}

pub(crate) fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::InvalidData(format!("invalid timestamp: {secs}")))
}

fn truncate_to_seconds(when: DateTime<Utc>) -> Result<DateTime<Utc>> {
    // Stored at second granularity; return what a re-read would produce.
    timestamp(when.timestamp())
}
