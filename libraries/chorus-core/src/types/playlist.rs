/// Playlist domain types
use crate::types::{PlaylistId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a playlist name in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Playlist
///
/// Playlists are soft-deleted only; a deleted playlist keeps its row (and its
/// track rows) but is invisible to every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID
    pub owner_id: UserId,

    /// Playlist name (non-empty, at most 100 characters)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}

/// Data for updating an existing playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub name: String,
    pub description: Option<String>,
}
