/// Full-replace reorder validation
use super::{EngineError, MAX_PLAYLIST_TRACKS};
use crate::types::ReorderEntry;
use std::collections::{BTreeSet, HashSet};

/// Validate a client-submitted full ordering against the playlist's live set.
///
/// `live_uris` is the current live URI set, `dead_positions` the positions
/// held by soft-deleted tracks. Checks run in order, each with its own
/// failure:
///
/// 1. submitted count equals the live count,
/// 2. submitted URI set equals the live URI set (missing and extra URIs are
///    both reported, sorted),
/// 3. submitted positions are pairwise distinct,
/// 4. submitted positions stay inside 1..=100 and off dead-track positions.
///
/// Check 4 extends the uniqueness invariant to the reorder path: a dead
/// track holds its position against reordering just as it does against
/// insertion. On success the caller updates each track's position matched
/// by URI; nothing is mutated on failure.
pub fn validate_reorder(
    live_uris: &HashSet<String>,
    dead_positions: &BTreeSet<u32>,
    submitted: &[ReorderEntry],
) -> Result<(), EngineError> {
    if submitted.len() as u64 != live_uris.len() as u64 {
        return Err(EngineError::CountMismatch {
            submitted: submitted.len() as u64,
            live: live_uris.len() as u64,
        });
    }

    let submitted_uris: HashSet<&str> = submitted.iter().map(|e| e.track_uri.as_str()).collect();
    let mut missing: Vec<String> = live_uris
        .iter()
        .filter(|uri| !submitted_uris.contains(uri.as_str()))
        .cloned()
        .collect();
    let mut extra: Vec<String> = submitted_uris
        .iter()
        .filter(|uri| !live_uris.contains(**uri))
        .map(|uri| (*uri).to_string())
        .collect();
    // A URI submitted twice collapses in the set; equal counts then force
    // some live URI to go missing, so repeats surface here as well.
    if !missing.is_empty() || !extra.is_empty() || submitted_uris.len() != submitted.len() {
        missing.sort();
        extra.sort();
        return Err(EngineError::MissingOrExtraItems { missing, extra });
    }

    let mut taken: BTreeSet<u32> = BTreeSet::new();
    for entry in submitted {
        if !taken.insert(entry.position) {
            return Err(EngineError::DuplicatePosition {
                position: entry.position,
            });
        }
    }

    for entry in submitted {
        if entry.position == 0 || entry.position > MAX_PLAYLIST_TRACKS {
            return Err(EngineError::PositionOutOfRange {
                position: entry.position,
            });
        }
        if dead_positions.contains(&entry.position) {
            return Err(EngineError::PositionOccupied {
                position: entry.position,
            });
        }
    }

    Ok(())
}
