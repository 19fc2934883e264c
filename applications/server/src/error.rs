/// Server error types and wire error envelope
///
/// Every error body has the shape `{ "error": { code, message, details? } }`.
/// Engine rejections carry their own codes; store failures are logged and
/// surfaced as a generic internal error, never retried.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chorus_core::EngineError;
use chorus_storage::StorageError;
use serde_json::{json, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Validation failure with per-field details
    pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} not found: {id}"))
            }
            StorageError::Engine(e) => ApiError::Engine(e),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, details)
            }
            ApiError::Engine(err) => engine_response(err),
            ApiError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Storage error".to_string(),
                    None,
                )
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Configuration error".to_string(),
                    None,
                )
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Invalid token".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Map each engine rejection onto its wire code and HTTP status
fn engine_response(err: EngineError) -> (StatusCode, &'static str, String, Option<Value>) {
    let message = err.to_string();
    match err {
        EngineError::CapacityExceeded { live, incoming } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "PLAYLIST_MAX_ITEMS_EXCEEDED",
            message,
            Some(json!({ "live": live, "incoming": incoming })),
        ),
        EngineError::DuplicateTrack { uri } => (
            StatusCode::CONFLICT,
            "DUPLICATE_TRACK",
            message,
            Some(json!({ "trackUri": uri })),
        ),
        EngineError::CountMismatch { submitted, live } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "COUNT_MISMATCH",
            message,
            Some(json!({ "submitted": submitted, "live": live })),
        ),
        EngineError::MissingOrExtraItems { missing, extra } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "MISSING_OR_EXTRA_ITEMS",
            message,
            Some(json!({ "missing": missing, "extra": extra })),
        ),
        EngineError::DuplicatePosition { position } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message,
            Some(json!({ "reason": "DUPLICATE_POSITION", "position": position })),
        ),
        EngineError::PositionOccupied { position } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message,
            Some(json!({ "reason": "POSITION_OCCUPIED", "position": position })),
        ),
        EngineError::PositionOutOfRange { position } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            message,
            Some(json!({ "reason": "POSITION_OUT_OF_RANGE", "position": position })),
        ),
    }
}
