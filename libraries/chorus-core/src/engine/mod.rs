//! Track Position Engine
//!
//! Pure decision logic for track positions inside a playlist:
//!
//! - [`allocator`] picks positions for an incoming batch (first-fit scan
//!   past every position ever used, live or dead),
//! - [`guards`] enforce the 100-live-track ceiling and live-URI uniqueness,
//! - [`reorder`] validates a client-submitted full ordering against the
//!   current live set before any position is touched.
//!
//! Nothing here performs I/O. The storage layer reads a snapshot of the
//! playlist inside a transaction, runs these functions, and applies the
//! result in the same transaction.

mod allocator;
mod guards;
mod reorder;

pub use allocator::allocate_positions;
pub use guards::{check_capacity, check_duplicates};
pub use reorder::validate_reorder;

use thiserror::Error;

/// Ceiling on live tracks per playlist, and the highest assignable position
pub const MAX_PLAYLIST_TRACKS: u32 = 100;

/// Engine rejections
///
/// Each variant corresponds to one failure reason of the add or reorder
/// flows. The server maps these onto wire error codes and HTTP statuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The playlist cannot hold the incoming batch
    #[error("playlist capacity of {MAX_PLAYLIST_TRACKS} tracks exceeded ({live} live + {incoming} incoming)")]
    CapacityExceeded { live: u64, incoming: u64 },

    /// A batch URI already exists live in the playlist, or repeats in the batch
    #[error("track already in playlist: {uri}")]
    DuplicateTrack { uri: String },

    /// Reorder submission size differs from the live track count
    #[error("reorder submitted {submitted} items but playlist has {live} live tracks")]
    CountMismatch { submitted: u64, live: u64 },

    /// Reorder submission is not the exact live URI set
    #[error("reorder does not match the live track set ({} missing, {} extra)", missing.len(), extra.len())]
    MissingOrExtraItems {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// Two reorder entries claim the same target position
    #[error("duplicate target position: {position}")]
    DuplicatePosition { position: u32 },

    /// A reorder entry targets a position held by a soft-deleted track
    #[error("position {position} is permanently occupied by a removed track")]
    PositionOccupied { position: u32 },

    /// A reorder entry targets a position outside 1..=100
    #[error("position {position} is outside the valid range 1..={MAX_PLAYLIST_TRACKS}")]
    PositionOutOfRange { position: u32 },
}
