//! # Application Error
//!
//! Maps domain errors to structured HTTP responses with proper status
//! codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use reefstow_model::ModelError;
use reefstow_plan::PlanError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed, including unmet transition guards (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422). Normalized with
    /// `Validation`: syntactically valid HTTP with semantically invalid
    /// content is 422, only malformed framing is 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with the plan's current lifecycle state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error body shape returned by every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error payload.
    pub error: ErrorDetail,
}

/// Inner error payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// HTTP status code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: status.as_u16(),
                message: self.to_string(),
            },
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            // Guard failures surface the unmet precondition text.
            PlanError::TransitionBlocked { reason, .. } => AppError::Validation(reason),
            PlanError::InvalidTransition { .. } | PlanError::PlanLocked { .. } => {
                AppError::Conflict(err.to_string())
            }
            PlanError::DuplicateCell(_) => AppError::Validation(err.to_string()),
            PlanError::Model(e) => e.into(),
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound { .. } => AppError::NotFound(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_failure_maps_to_422_with_reason() {
        let err: AppError = PlanError::TransitionBlocked {
            from: "DRAFT".into(),
            to: "READY_FOR_CAPTAIN".into(),
            reason: "2 unresolved temperature conflicts".into(),
        }
        .into();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "2 unresolved temperature conflicts");
            }
            other => panic!("unexpected mapping: {other}"),
        }
    }

    #[test]
    fn test_locked_plan_maps_to_conflict() {
        let err: AppError = PlanError::PlanLocked {
            status: reefstow_plan::PlanStatus::EmailSent,
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
