//! Request validation plumbing shared by all route handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types validate themselves before any handler logic runs.
pub trait Validate {
    /// Check business-level constraints on an already-deserialized body.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping deserialization failures to 422 and
/// running the type's own validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
