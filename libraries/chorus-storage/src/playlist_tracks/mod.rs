//! Playlist tracks vertical slice: the Track Position Engine applied to
//! `SQLite`.
//!
//! Every write operation here follows the same shape: open one transaction,
//! touch the playlist row first (which takes the database write lock and
//! doubles as the existence/ownership check), read the track snapshot, run
//! the pure engine checks from `chorus-core`, apply the result, commit. Two
//! concurrent writers against the same database therefore never compute from
//! the same snapshot.

use crate::error::{Result, StorageError};
use crate::playlists::timestamp;
use chorus_core::engine;
use chorus_core::types::{NewTrack, Page, PlaylistId, PlaylistTrack, ReorderEntry, TrackPage, UserId};
use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashSet};

/// Offset applied to live rows during the first reorder phase. Keeps them
/// clear of both the 1..=100 band and each other while final positions are
/// written, so the `(playlist_id, position)` key never trips transiently.
const REORDER_SHIFT: i64 = 1000;

/// Snapshot of a playlist's track rows, live and dead
struct TrackSnapshot {
    /// Every position ever used, including soft-deleted rows
    occupied: BTreeSet<u32>,
    /// Positions held by soft-deleted rows
    dead_positions: BTreeSet<u32>,
    /// URIs of live rows
    live_uris: HashSet<String>,
}

impl TrackSnapshot {
    fn live_count(&self) -> u64 {
        self.live_uris.len() as u64
    }
}

/// One page of live tracks ordered ascending by position, plus the total
/// live count. Read-only.
pub async fn list_page(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
    page: Page,
) -> Result<TrackPage> {
    ensure_playlist_visible(pool, playlist_id, owner_id).await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM playlist_tracks WHERE playlist_id = ? AND is_deleted = 0",
    )
    .bind(playlist_id.as_str())
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT position, track_uri, artist, title, album, added_at
        FROM playlist_tracks
        WHERE playlist_id = ? AND is_deleted = 0
        ORDER BY position
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(playlist_id.as_str())
    .bind(i64::from(page.size()))
    .bind(page.offset() as i64)
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| {
            Ok(PlaylistTrack {
                position: row.get::<i64, _>("position") as u32,
                track_uri: row.get("track_uri"),
                artist: row.get("artist"),
                title: row.get("title"),
                album: row.get("album"),
                added_at: timestamp(row.get::<i64, _>("added_at"))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TrackPage {
        items,
        page: page.number(),
        page_size: page.size(),
        total: total as u64,
    })
}

/// Add a batch of tracks after the given 0-based anchor position.
///
/// Runs the capacity guard, the duplicate guard, and the position allocator
/// against a snapshot taken under the write lock, then inserts the batch in
/// submission order. Returns the allocated positions, first submitted track
/// first. The whole batch fails or succeeds together.
pub async fn add_tracks(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
    tracks: &[NewTrack],
    insert_after: u32,
) -> Result<Vec<u32>> {
    let mut tx = pool.begin().await?;
    touch_playlist(&mut *tx, playlist_id, owner_id).await?;

    let snapshot = read_snapshot(&mut *tx, playlist_id).await?;
    engine::check_capacity(snapshot.live_count(), tracks.len())?;
    engine::check_duplicates(&snapshot.live_uris, tracks)?;
    let positions = engine::allocate_positions(
        &snapshot.occupied,
        snapshot.live_count(),
        insert_after,
        tracks.len(),
    )?;

    let added_at = Utc::now().timestamp();
    for (track, position) in tracks.iter().zip(&positions) {
        sqlx::query(
            r#"
            INSERT INTO playlist_tracks
                (playlist_id, position, track_uri, artist, title, album, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist_id.as_str())
        .bind(i64::from(*position))
        .bind(&track.track_uri)
        .bind(&track.artist)
        .bind(&track.title)
        .bind(&track.album)
        .bind(added_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(positions)
}

/// Apply a validated full reordering of the live track set.
///
/// Positions are written in two phases: all live rows are first shifted out
/// of the 1..=100 band, then each row gets its submitted position, matched
/// by URI rather than by prior position. Fails without mutating anything if
/// the submission is not an exact permutation of the live set or targets a
/// dead-held position.
pub async fn reorder(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
    submitted: &[ReorderEntry],
) -> Result<Vec<ReorderEntry>> {
    let mut tx = pool.begin().await?;
    touch_playlist(&mut *tx, playlist_id, owner_id).await?;

    let snapshot = read_snapshot(&mut *tx, playlist_id).await?;
    engine::validate_reorder(&snapshot.live_uris, &snapshot.dead_positions, submitted)?;

    sqlx::query(
        "UPDATE playlist_tracks SET position = position + ? WHERE playlist_id = ? AND is_deleted = 0",
    )
    .bind(REORDER_SHIFT)
    .bind(playlist_id.as_str())
    .execute(&mut *tx)
    .await?;

    for entry in submitted {
        sqlx::query(
            r#"
            UPDATE playlist_tracks
            SET position = ?
            WHERE playlist_id = ? AND track_uri = ? AND is_deleted = 0
            "#,
        )
        .bind(i64::from(entry.position))
        .bind(playlist_id.as_str())
        .bind(&entry.track_uri)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(submitted.to_vec())
}

/// Soft-delete the live track at a position.
///
/// Not-found if the position is empty or the track there is already
/// deleted. The position is never reused afterwards.
pub async fn remove_at_position(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
    position: u32,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    touch_playlist(&mut *tx, playlist_id, owner_id).await?;

    let result = sqlx::query(
        r#"
        UPDATE playlist_tracks
        SET is_deleted = 1
        WHERE playlist_id = ? AND position = ? AND is_deleted = 0
        "#,
    )
    .bind(playlist_id.as_str())
    .bind(i64::from(position))
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Track", format!("position {position}")));
    }

    tx.commit().await?;

    Ok(())
}

/// First statement of every write transaction: bumps `updated_at`, taking
/// the write lock, and reports not-found when the playlist is missing,
/// deleted, or owned by someone else.
async fn touch_playlist(
    tx: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE playlists SET updated_at = ? WHERE id = ? AND owner_id = ? AND is_deleted = 0",
    )
    .bind(Utc::now().timestamp())
    .bind(playlist_id.as_str())
    .bind(owner_id.as_str())
    .execute(tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Playlist", playlist_id.as_str()));
    }

    Ok(())
}

async fn ensure_playlist_visible(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    owner_id: &UserId,
) -> Result<()> {
    let row = sqlx::query(
        "SELECT 1 FROM playlists WHERE id = ? AND owner_id = ? AND is_deleted = 0",
    )
    .bind(playlist_id.as_str())
    .bind(owner_id.as_str())
    .fetch_optional(pool)
    .await?;

    if row.is_none() {
        return Err(StorageError::not_found("Playlist", playlist_id.as_str()));
    }

    Ok(())
}

async fn read_snapshot(
    tx: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<TrackSnapshot> {
    let rows = sqlx::query(
        "SELECT position, track_uri, is_deleted FROM playlist_tracks WHERE playlist_id = ?",
    )
    .bind(playlist_id.as_str())
    .fetch_all(tx)
    .await?;

    let mut snapshot = TrackSnapshot {
        occupied: BTreeSet::new(),
        dead_positions: BTreeSet::new(),
        live_uris: HashSet::new(),
    };

    for row in rows {
        let position = row.get::<i64, _>("position") as u32;
        snapshot.occupied.insert(position);
        if row.get::<i64, _>("is_deleted") == 0 {
            snapshot.live_uris.insert(row.get("track_uri"));
        } else {
            snapshot.dead_positions.insert(position);
        }
    }

    Ok(snapshot)
}
