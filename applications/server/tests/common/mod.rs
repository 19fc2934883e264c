/// Common test utilities and fixtures
use chorus_core::UserId;
use chorus_server::{create_router, services::AuthService, state::AppState};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application wrapper holding the router and its backing database
pub struct TestApp {
    pub app: axum::Router,
    pub auth_service: Arc<AuthService>,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestApp {
    /// Mint a valid bearer token for a caller identity
    pub fn token_for(&self, user_id: &str) -> String {
        self.auth_service
            .create_token(&UserId::new(user_id))
            .expect("Failed to mint test token")
    }
}

/// Create a test app over a real temp-file database with migrations applied
pub async fn create_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = chorus_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    chorus_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let auth_service = Arc::new(AuthService::new("test-secret-key".to_string(), 1));
    let app_state = AppState::new(pool.clone(), Arc::clone(&auth_service));
    let app = create_router(app_state, Arc::clone(&auth_service));

    TestApp {
        app,
        auth_service,
        pool,
        _temp_dir: temp_dir,
    }
}
