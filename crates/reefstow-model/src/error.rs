//! Error types for master-data loading and validation.

use reefstow_core::CoreError;
use thiserror::Error;

/// Errors raised by the master-data layer.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A repository lookup found nothing for the given identifier.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("vessel", "voyage", "booking").
        kind: &'static str,
        /// The identifier that missed.
        id: String,
    },

    /// A vessel layout violated a structural invariant.
    #[error("invalid vessel layout: {0}")]
    Layout(String),

    /// A voyage rotation violated a structural invariant.
    #[error("invalid rotation: {0}")]
    Rotation(String),

    /// A booking violated a structural invariant.
    #[error("invalid booking: {0}")]
    Booking(String),

    /// Error from the foundational crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}
