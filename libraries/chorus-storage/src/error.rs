/// Storage-specific errors
use chorus_core::EngineError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found (or not visible to the caller)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Track Position Engine rejected the operation
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Corrupt or unrepresentable stored data
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
