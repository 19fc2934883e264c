/// Playlists API routes
use crate::{
    api::validation::FieldErrors, error::Result, middleware::AuthenticatedUser, state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chorus_core::types::{
    CreatePlaylist, Playlist, PlaylistId, UpdatePlaylist, MAX_NAME_LENGTH,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id.to_string(),
            name: playlist.name,
            description: playlist.description,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

fn validate_name(errors: &mut FieldErrors, name: &str) {
    errors.require_non_empty("name", name);
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push("name", format!("must be at most {MAX_NAME_LENGTH} characters"));
    }
}

/// GET /api/playlists
/// List the caller's live playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistResponse>>> {
    let playlists = chorus_storage::playlists::get_user_playlists(&app_state.pool, auth.user_id())
        .await?;
    Ok(Json(playlists.into_iter().map(Into::into).collect()))
}

/// POST /api/playlists
/// Create a new playlist
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistResponse>)> {
    let mut errors = FieldErrors::new();
    validate_name(&mut errors, &req.name);
    errors.finish()?;

    let playlist = chorus_storage::playlists::create(
        &app_state.pool,
        CreatePlaylist {
            name: req.name,
            description: req.description,
            owner_id: auth.user_id().clone(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(playlist.into())))
}

/// GET /api/playlists/:id
/// Get playlist details
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistResponse>> {
    let playlist_id = PlaylistId::new(id);
    let playlist =
        chorus_storage::playlists::get_by_id(&app_state.pool, &playlist_id, auth.user_id())
            .await?
            .ok_or_else(|| {
                crate::error::ApiError::NotFound(format!(
                    "Playlist not found: {playlist_id}"
                ))
            })?;

    Ok(Json(playlist.into()))
}

/// PUT /api/playlists/:id
/// Update playlist name and description
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<PlaylistResponse>> {
    let mut errors = FieldErrors::new();
    validate_name(&mut errors, &req.name);
    errors.finish()?;

    let playlist_id = PlaylistId::new(id);
    let playlist = chorus_storage::playlists::update(
        &app_state.pool,
        &playlist_id,
        auth.user_id(),
        UpdatePlaylist {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(playlist.into()))
}

/// DELETE /api/playlists/:id
/// Soft-delete a playlist; its live tracks are soft-deleted with it
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    let playlist_id = PlaylistId::new(id);
    chorus_storage::playlists::soft_delete(&app_state.pool, &playlist_id, auth.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
