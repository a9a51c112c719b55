//! # Error Types — Shared Error Hierarchy
//!
//! Defines the error types used throughout the Reefstow stack. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Identifier validation fails loudly with the offending input.
//! - State machine errors include the current state, attempted transition,
//!   and rejection reason — a planner reading the message must know exactly
//!   which precondition was unmet.

use thiserror::Error;

/// Top-level error type for the foundational crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An identifier failed its format validation.
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier namespace (e.g., "compartment", "port code").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp failed parsing or violated the UTC-only policy.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An unknown cargo type identifier was supplied.
    #[error("unknown cargo type: {0:?}")]
    UnknownCargoType(String),

    /// Generic input validation failure.
    #[error("validation error: {0}")]
    Validation(String),
}
