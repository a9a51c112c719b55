//! Error types for the planning engine.

use thiserror::Error;

use reefstow_model::ModelError;

use crate::plan::PlanStatus;

/// Errors raised by plan mutation and lifecycle operations.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The requested lifecycle transition is not in the state machine.
    #[error("invalid plan transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },

    /// A forward transition is defined but its precondition is unmet
    /// (e.g., unresolved conflicts block the hand-over to the captain).
    #[error("transition from {from} to {to} blocked: {reason}")]
    TransitionBlocked {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// The specific unmet precondition, with counts.
        reason: String,
    },

    /// Placement edits are only permitted in DRAFT, ESTIMATED, and
    /// IN_REVISION.
    #[error("plan is locked for placement edits in state {status}")]
    PlanLocked {
        /// The state that rejected the edit.
        status: PlanStatus,
    },

    /// A position list assigned two pallets to the same cell.
    #[error("duplicate cell assignment: {0}")]
    DuplicateCell(String),

    /// Master-data error surfaced through the plan layer.
    #[error(transparent)]
    Model(#[from] ModelError),
}
