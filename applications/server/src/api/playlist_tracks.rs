/// Playlist tracks API routes - the HTTP face of the Track Position Engine
use crate::{
    api::validation::FieldErrors,
    error::{ApiError, Result},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::types::{NewTrack, Page, PlaylistId, PlaylistTrack, ReorderEntry};
use chorus_core::MAX_PLAYLIST_TRACKS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTracksQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrackRequest {
    pub track_uri: String,
    pub artist: String,
    pub title: String,
    pub album: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTracksRequest {
    pub tracks: Vec<NewTrackRequest>,
    pub insert_after_position: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntryRequest {
    pub position: u32,
    pub track_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ordered: Vec<ReorderEntryRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackItemResponse {
    pub position: u32,
    pub track_uri: String,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistTrack> for TrackItemResponse {
    fn from(track: PlaylistTrack) -> Self {
        Self {
            position: track.position,
            track_uri: track.track_uri,
            artist: track.artist,
            title: track.title,
            album: track.album,
            added_at: track.added_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPageResponse {
    pub items: Vec<TrackItemResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTracksResponse {
    pub added: usize,
    pub positions: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPositionResponse {
    pub track_uri: String,
    pub position: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResponse {
    pub positions: Vec<ReorderPositionResponse>,
}

impl ListTracksQuery {
    fn validate(self) -> Result<Page> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(chorus_core::types::DEFAULT_PAGE_SIZE);

        let mut errors = FieldErrors::new();
        if page == 0 {
            errors.push("page", "must be at least 1");
        }
        if page_size == 0 || page_size > chorus_core::types::MAX_PAGE_SIZE {
            errors.push("pageSize", "must be between 1 and 100");
        }
        errors.finish()?;

        Page::new(page, page_size)
            .ok_or_else(|| ApiError::validation("invalid page window", None))
    }
}

impl AddTracksRequest {
    fn validate(self) -> Result<(Vec<NewTrack>, u32)> {
        let mut errors = FieldErrors::new();

        if self.tracks.is_empty() {
            errors.push("tracks", "must contain at least one track");
        }
        if self.tracks.len() > MAX_PLAYLIST_TRACKS as usize {
            errors.push(
                "tracks",
                format!("must contain at most {MAX_PLAYLIST_TRACKS} tracks"),
            );
        }

        let insert_after = self.insert_after_position.unwrap_or(0);
        if insert_after > MAX_PLAYLIST_TRACKS {
            errors.push(
                "insertAfterPosition",
                format!("must be between 0 and {MAX_PLAYLIST_TRACKS}"),
            );
        }

        for (index, track) in self.tracks.iter().enumerate() {
            errors.require_non_empty(&format!("tracks[{index}].trackUri"), &track.track_uri);
            errors.require_non_empty(&format!("tracks[{index}].artist"), &track.artist);
            errors.require_non_empty(&format!("tracks[{index}].title"), &track.title);
            errors.require_non_empty(&format!("tracks[{index}].album"), &track.album);
        }

        errors.finish()?;

        let tracks = self
            .tracks
            .into_iter()
            .map(|t| NewTrack {
                track_uri: t.track_uri,
                artist: t.artist,
                title: t.title,
                album: t.album,
            })
            .collect();

        Ok((tracks, insert_after))
    }
}

impl ReorderRequest {
    fn validate(self) -> Result<Vec<ReorderEntry>> {
        let mut errors = FieldErrors::new();

        for (index, entry) in self.ordered.iter().enumerate() {
            errors.require_non_empty(&format!("ordered[{index}].trackUri"), &entry.track_uri);
        }

        errors.finish()?;

        Ok(self
            .ordered
            .into_iter()
            .map(|e| ReorderEntry {
                position: e.position,
                track_uri: e.track_uri,
            })
            .collect())
    }
}

/// GET /api/playlists/:id/tracks
/// Paginated, position-ordered view over the playlist's live tracks
pub async fn list_tracks(
    Path(id): Path<String>,
    Query(query): Query<ListTracksQuery>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<TrackPageResponse>> {
    let page = query.validate()?;
    let playlist_id = PlaylistId::new(id);

    let track_page =
        chorus_storage::playlist_tracks::list_page(&app_state.pool, &playlist_id, auth.user_id(), page)
            .await?;

    Ok(Json(TrackPageResponse {
        items: track_page.items.into_iter().map(Into::into).collect(),
        page: track_page.page,
        page_size: track_page.page_size,
        total: track_page.total,
    }))
}

/// POST /api/playlists/:id/tracks
/// Add a batch of tracks after an optional anchor position
pub async fn add_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTracksRequest>,
) -> Result<(StatusCode, Json<AddTracksResponse>)> {
    let (tracks, insert_after) = req.validate()?;
    let playlist_id = PlaylistId::new(id);

    let positions = chorus_storage::playlist_tracks::add_tracks(
        &app_state.pool,
        &playlist_id,
        auth.user_id(),
        &tracks,
        insert_after,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddTracksResponse {
            added: positions.len(),
            positions,
        }),
    ))
}

/// PUT /api/playlists/:id/tracks
/// Replace the full ordering of the playlist's live tracks
pub async fn reorder_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    let ordered = req.validate()?;
    let playlist_id = PlaylistId::new(id);

    let positions = chorus_storage::playlist_tracks::reorder(
        &app_state.pool,
        &playlist_id,
        auth.user_id(),
        &ordered,
    )
    .await?;

    Ok(Json(ReorderResponse {
        positions: positions
            .into_iter()
            .map(|entry| ReorderPositionResponse {
                track_uri: entry.track_uri,
                position: entry.position,
            })
            .collect(),
    }))
}

/// DELETE /api/playlists/:id/tracks/:position
/// Soft-delete the live track at a position; the position is never reused
pub async fn remove_track(
    Path((id, position)): Path<(String, i64)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    if position < 1 || position > i64::from(MAX_PLAYLIST_TRACKS) {
        return Err(ApiError::validation(
            format!("position must be between 1 and {MAX_PLAYLIST_TRACKS}"),
            None,
        ));
    }

    let playlist_id = PlaylistId::new(id);
    chorus_storage::playlist_tracks::remove_at_position(
        &app_state.pool,
        &playlist_id,
        auth.user_id(),
        position as u32,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
