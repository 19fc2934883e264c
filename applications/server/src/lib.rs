//! Chorus Server Library
//!
//! HTTP interface of the Chorus playlist manager: typed request/response
//! structs with an explicit validation pass, error mapping to the wire
//! error envelope, and bearer-identity middleware.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{ApiError, Result};
pub use services::auth::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState, auth_service: Arc<AuthService>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(api::health::health));

    // Protected routes (bearer identity required)
    let protected_routes = Router::new()
        // Playlists
        .route("/playlists", get(api::playlists::list_playlists))
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id", put(api::playlists::update_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        // Playlist tracks (Track Position Engine)
        .route("/playlists/:id/tracks", get(api::playlist_tracks::list_tracks))
        .route("/playlists/:id/tracks", post(api::playlist_tracks::add_tracks))
        .route("/playlists/:id/tracks", put(api::playlist_tracks::reorder_tracks))
        .route(
            "/playlists/:id/tracks/:position",
            delete(api::playlist_tracks::remove_track),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
