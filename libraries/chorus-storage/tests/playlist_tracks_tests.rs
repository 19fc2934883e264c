//! Integration tests for the playlist tracks vertical slice
//!
//! Exercises the Track Position Engine against a real SQLite database:
//! first-fit allocation over live and dead positions, the capacity and
//! duplicate guards, full-replace reordering, soft-delete by position, and
//! the paginated projector.

mod common;

use chorus_core::types::{NewTrack, Page, ReorderEntry, UserId};
use chorus_core::EngineError;
use chorus_storage::StorageError;
use common::*;

fn entry(position: u32, uri: &str) -> ReorderEntry {
    ReorderEntry {
        position,
        track_uri: uri.to_string(),
    }
}

#[tokio::test]
async fn test_add_to_empty_playlist_fills_from_one() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Empty", &owner).await;

    let positions = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b")],
        0,
    )
    .await
    .unwrap();

    assert_eq!(positions, vec![1, 2]);
    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await,
        vec!["uri:a", "uri:b"]
    );
}

#[tokio::test]
async fn test_dead_positions_are_never_reallocated() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Graveyard", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b")],
        0,
    )
    .await
    .unwrap();

    // Kill position 2, then insert at the front of free space
    chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 2)
        .await
        .unwrap();

    let positions = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:c")],
        0,
    )
    .await
    .unwrap();

    // Position 2 stays reserved by the dead track
    assert_eq!(positions, vec![3]);
}

#[tokio::test]
async fn test_insert_after_anchor() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Anchored", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b"), new_track("uri:c")],
        0,
    )
    .await
    .unwrap();

    let positions = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:d")],
        1,
    )
    .await
    .unwrap();

    // 2 and 3 are occupied; first free slot past the anchor is 4
    assert_eq!(positions, vec![4]);
}

#[tokio::test]
async fn test_capacity_ceiling_rejects_the_whole_batch() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Full", &owner).await;

    let full_batch: Vec<NewTrack> = (1..=100).map(|i| new_track(&format!("uri:{i}"))).collect();
    let positions =
        chorus_storage::playlist_tracks::add_tracks(pool, &playlist_id, &owner, &full_batch, 0)
            .await
            .unwrap();
    assert_eq!(positions.len(), 100);
    assert_eq!(positions[99], 100);

    let err = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:overflow")],
        0,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        StorageError::Engine(EngineError::CapacityExceeded { .. })
    ));

    // Nothing was inserted
    let page = chorus_storage::playlist_tracks::list_page(
        pool,
        &playlist_id,
        &owner,
        Page::new(1, 100).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 100);
}

#[tokio::test]
async fn test_duplicate_uri_rejects_the_whole_batch() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Dupes", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a")],
        0,
    )
    .await
    .unwrap();

    let err = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:b"), new_track("uri:a")],
        0,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        StorageError::Engine(EngineError::DuplicateTrack { ref uri }) if uri == "uri:a"
    ));

    // The non-duplicate half of the batch was not inserted either
    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await,
        vec!["uri:a"]
    );
}

#[tokio::test]
async fn test_removed_uri_can_be_added_again() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Second Chances", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a")],
        0,
    )
    .await
    .unwrap();
    chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 1)
        .await
        .unwrap();

    // URI uniqueness is scoped to live tracks
    let positions = chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a")],
        0,
    )
    .await
    .unwrap();
    assert_eq!(positions, vec![2]);
}

#[tokio::test]
async fn test_reorder_permutes_by_uri() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Shuffle", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b"), new_track("uri:c")],
        0,
    )
    .await
    .unwrap();

    chorus_storage::playlist_tracks::reorder(
        pool,
        &playlist_id,
        &owner,
        &[entry(3, "uri:a"), entry(1, "uri:b"), entry(2, "uri:c")],
    )
    .await
    .unwrap();

    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await,
        vec!["uri:b", "uri:c", "uri:a"]
    );
}

#[tokio::test]
async fn test_incomplete_reorder_changes_nothing() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Stubborn", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b"), new_track("uri:c")],
        0,
    )
    .await
    .unwrap();

    // Missing uri:c
    let err = chorus_storage::playlist_tracks::reorder(
        pool,
        &playlist_id,
        &owner,
        &[entry(1, "uri:a"), entry(2, "uri:b")],
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Engine(EngineError::CountMismatch { submitted: 2, live: 3 })
    ));

    // Wrong URI set with matching count
    let err = chorus_storage::playlist_tracks::reorder(
        pool,
        &playlist_id,
        &owner,
        &[entry(1, "uri:a"), entry(2, "uri:b"), entry(3, "uri:x")],
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Engine(EngineError::MissingOrExtraItems { .. })
    ));

    // Original order untouched
    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await,
        vec!["uri:a", "uri:b", "uri:c"]
    );
}

#[tokio::test]
async fn test_reorder_rejects_dead_positions() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Haunted", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b"), new_track("uri:c")],
        0,
    )
    .await
    .unwrap();
    chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 2)
        .await
        .unwrap();

    let err = chorus_storage::playlist_tracks::reorder(
        pool,
        &playlist_id,
        &owner,
        &[entry(1, "uri:a"), entry(2, "uri:c")],
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Engine(EngineError::PositionOccupied { position: 2 })
    ));

    // Positions 3 and beyond remain fair game
    chorus_storage::playlist_tracks::reorder(
        pool,
        &playlist_id,
        &owner,
        &[entry(3, "uri:a"), entry(1, "uri:c")],
    )
    .await
    .unwrap();
    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await,
        vec!["uri:c", "uri:a"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_adds_get_distinct_positions() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Contended", &owner).await;

    // Five writers race four-track batches against the same playlist. The
    // touch-first transaction serializes them, so no two batches may compute
    // positions from the same snapshot.
    let mut handles = Vec::new();
    for batch in 0..5 {
        let pool = pool.clone();
        let playlist_id = playlist_id.clone();
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            let tracks: Vec<NewTrack> = (0..4)
                .map(|i| new_track(&format!("uri:{batch}-{i}")))
                .collect();
            chorus_storage::playlist_tracks::add_tracks(&pool, &playlist_id, &owner, &tracks, 0)
                .await
                .unwrap()
        }));
    }

    let mut all_positions = Vec::new();
    for handle in handles {
        all_positions.extend(handle.await.unwrap());
    }

    assert_eq!(all_positions.len(), 20);
    all_positions.sort_unstable();
    all_positions.dedup();
    assert_eq!(all_positions.len(), 20, "concurrent batches shared a position");
    assert_eq!(*all_positions.first().unwrap(), 1);
    assert_eq!(*all_positions.last().unwrap(), 20);

    // No writer clobbered another's rows either
    assert_eq!(
        live_uris_in_order(pool, &playlist_id, &owner).await.len(),
        20
    );
}

#[tokio::test]
async fn test_remove_twice_reports_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Once", &owner).await;

    chorus_storage::playlist_tracks::add_tracks(
        pool,
        &playlist_id,
        &owner,
        &[new_track("uri:a"), new_track("uri:b")],
        0,
    )
    .await
    .unwrap();

    chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 2)
        .await
        .unwrap();

    let err = chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    // An empty position behaves the same way
    let err = chorus_storage::playlist_tracks::remove_at_position(pool, &playlist_id, &owner, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_page_slices_and_repeats() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = UserId::new("user-1");
    let playlist_id = create_test_playlist(pool, "Paged", &owner).await;

    let batch: Vec<NewTrack> = (1..=7).map(|i| new_track(&format!("uri:{i}"))).collect();
    chorus_storage::playlist_tracks::add_tracks(pool, &playlist_id, &owner, &batch, 0)
        .await
        .unwrap();

    let page2 = chorus_storage::playlist_tracks::list_page(
        pool,
        &playlist_id,
        &owner,
        Page::new(2, 3).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(page2.total, 7);
    assert_eq!(page2.page, 2);
    assert_eq!(page2.page_size, 3);
    let uris: Vec<&str> = page2.items.iter().map(|t| t.track_uri.as_str()).collect();
    assert_eq!(uris, vec!["uri:4", "uri:5", "uri:6"]);

    // Idempotent read: same call, same answer
    let again = chorus_storage::playlist_tracks::list_page(
        pool,
        &playlist_id,
        &owner,
        Page::new(2, 3).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(again, page2);

    // A page past the end is empty but still reports the total
    let beyond = chorus_storage::playlist_tracks::list_page(
        pool,
        &playlist_id,
        &owner,
        Page::new(4, 3).unwrap(),
    )
    .await
    .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 7);
}
