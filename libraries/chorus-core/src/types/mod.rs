mod ids;
mod page;
mod playlist;
mod track;

pub use ids::{PlaylistId, UserId};
pub use page::{Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use playlist::{CreatePlaylist, Playlist, UpdatePlaylist, MAX_NAME_LENGTH};
pub use track::{NewTrack, PlaylistTrack, ReorderEntry, TrackPage};
