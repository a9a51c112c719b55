//! # Route Modules
//!
//! - `plans` — stowage plan lifecycle: creation, placement edits,
//!   cooling-section set-points, lifecycle transitions, and revisions.
//!
//! Health probes live in the crate root so they mount outside the API
//! router.

pub mod plans;
