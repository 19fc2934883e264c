//! Chorus Core
//!
//! Domain types and the Track Position Engine for the Chorus playlist
//! manager.
//!
//! The engine is pure computation: given a snapshot of a playlist's track
//! state it decides which positions an incoming batch receives, whether a
//! batch violates the capacity or duplicate rules, and whether a submitted
//! reordering is a valid permutation of the live track set. Persistence and
//! transactions live in `chorus-storage`; HTTP concerns live in the server.

pub mod engine;
pub mod types;

pub use engine::{EngineError, MAX_PLAYLIST_TRACKS};
pub use types::{
    CreatePlaylist, NewTrack, Page, Playlist, PlaylistId, PlaylistTrack, ReorderEntry, TrackPage,
    UpdatePlaylist, UserId,
};
