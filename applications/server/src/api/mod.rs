/// API route modules
pub mod health;
pub mod playlist_tracks;
pub mod playlists;

pub(crate) mod validation;
