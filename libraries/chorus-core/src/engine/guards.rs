/// Capacity and duplicate guards for the add-tracks flow
use super::{EngineError, MAX_PLAYLIST_TRACKS};
use crate::types::NewTrack;
use std::collections::HashSet;

/// Reject the batch if it would push the live-track count past the ceiling.
///
/// Advisory: the allocator independently fails when it runs out of slots,
/// so both checks must hold for the invariant to be airtight.
pub fn check_capacity(live_count: u64, batch_size: usize) -> Result<(), EngineError> {
    if live_count + batch_size as u64 > u64::from(MAX_PLAYLIST_TRACKS) {
        return Err(EngineError::CapacityExceeded {
            live: live_count,
            incoming: batch_size as u64,
        });
    }
    Ok(())
}

/// Reject the whole batch if any incoming URI is already live in the
/// playlist or repeats within the batch. The error names the first
/// offending URI in submission order; no partial acceptance.
pub fn check_duplicates(live_uris: &HashSet<String>, batch: &[NewTrack]) -> Result<(), EngineError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(batch.len());
    for track in batch {
        if live_uris.contains(&track.track_uri) || !seen.insert(track.track_uri.as_str()) {
            return Err(EngineError::DuplicateTrack {
                uri: track.track_uri.clone(),
            });
        }
    }
    Ok(())
}
