/// Request validation pass
///
/// Every request struct validates itself into either a domain value or a
/// `VALIDATION_ERROR` whose details list the offending fields. Collecting
/// failures per field keeps one request/response cycle per correction round.
use crate::error::ApiError;
use serde_json::{json, Value};

/// Accumulates per-field validation failures for one request
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<Value>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(json!({
            "field": field.into(),
            "message": message.into(),
        }));
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the collected failures into a wire error, or pass
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ApiError::validation(
            "Request validation failed",
            Some(Value::Array(self.errors)),
        ))
    }
}
