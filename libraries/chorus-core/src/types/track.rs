/// Playlist track domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A track occupying one position of a playlist
///
/// Identity is `(playlist_id, position)`. A soft-deleted track keeps its
/// position forever; positions are never reclaimed or compacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    /// Position in the playlist, 1 to 100
    pub position: u32,

    /// External catalog identifier
    pub track_uri: String,

    /// Artist name
    pub artist: String,

    /// Track title
    pub title: String,

    /// Album name
    pub album: String,

    /// When the track was added to the playlist
    pub added_at: DateTime<Utc>,
}

/// An incoming track to be inserted, position not yet assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrack {
    pub track_uri: String,
    pub artist: String,
    pub title: String,
    pub album: String,
}

/// One entry of a client-submitted full reordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub position: u32,
    pub track_uri: String,
}

/// One page of live tracks, ordered ascending by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<PlaylistTrack>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}
