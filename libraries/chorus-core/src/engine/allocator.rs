/// Position allocation for incoming track batches
use super::{EngineError, MAX_PLAYLIST_TRACKS};
use std::collections::BTreeSet;

/// Allocate `count` positions for a batch inserted after `insert_after`.
///
/// `occupied` must hold every position ever used in the playlist, including
/// those of soft-deleted tracks; dead positions are never reassigned.
/// `live_count` is the number of live tracks, used only for error reporting
/// since `occupied` overstates it whenever dead positions exist.
/// `insert_after` is 0-based: 0 means "front of free space".
///
/// Returns `count` distinct ascending positions, each greater than
/// `insert_after`, none colliding with `occupied`. First-fit left-to-right
/// scan; the first batch item gets the lowest position. If the scan passes
/// position 100 before every item has a slot, the whole batch fails with a
/// capacity error and nothing is allocated.
pub fn allocate_positions(
    occupied: &BTreeSet<u32>,
    live_count: u64,
    insert_after: u32,
    count: usize,
) -> Result<Vec<u32>, EngineError> {
    let mut taken = occupied.clone();
    let mut positions = Vec::with_capacity(count);
    let mut cursor = insert_after + 1;

    for _ in 0..count {
        while cursor <= MAX_PLAYLIST_TRACKS && taken.contains(&cursor) {
            cursor += 1;
        }
        if cursor > MAX_PLAYLIST_TRACKS {
            return Err(EngineError::CapacityExceeded {
                live: live_count,
                incoming: count as u64,
            });
        }
        positions.push(cursor);
        taken.insert(cursor);
        cursor += 1;
    }

    Ok(positions)
}
