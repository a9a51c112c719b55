//! # reefstow-plan — The Stowage Planning Engine
//!
//! Everything that turns confirmed bookings and a vessel layout into a
//! validated stowage plan:
//!
//! - [`position`] — pallet-granular cargo positions and the two pure
//!   conversions between flat position lists and aggregate
//!   (booking, compartment) → quantity maps.
//! - [`placement`] — the paint and move/swap gestures as pure functions
//!   over an immutable position snapshot, plus capacity accounting.
//! - [`cooling`] — one temperature per cooling section, validated against
//!   every placed cargo type's tolerance band.
//! - [`overstow`] — discharge-order blocking detection per hold, driven by
//!   the voyage's *effective* rotation.
//! - [`stability`] — the preliminary displacement/GM/trim/list estimate,
//!   always carrying its non-authoritative disclaimer.
//! - [`recompute`] — the full-replace validation pass that rebuilds a
//!   plan's conflict, violation, and stability state from one snapshot.
//! - [`plan`] — the stowage plan itself: position state, section
//!   temperatures, validation report, revision chain, and the lifecycle
//!   state machine from DRAFT through captain review to execution.
//!
//! ## Purity discipline
//!
//! Every detector in this crate is a pure function over data already
//! loaded for one voyage: same snapshot in, same report out, no partial
//! updates. Recomputation may run on every read. The only mutable state
//! is the plan itself, and every mutation path either invalidates the
//! report (edits) or replaces it whole (recompute).

pub mod cooling;
pub mod error;
pub mod overstow;
pub mod placement;
pub mod plan;
pub mod position;
pub mod recompute;
pub mod stability;

pub use cooling::{SectionTemperature, TemperatureConflict};
pub use error::PlanError;
pub use overstow::OverstowViolation;
pub use placement::{CapacityOverage, CellRef, GestureState};
pub use plan::{CaptainResponse, PlanSnapshot, PlanStatus, StowagePlan, TransitionRecord};
pub use position::{CargoPosition, PositionSet};
pub use recompute::{AllocationExcess, ReferentialConflict, ValidationReport};
pub use stability::{StabilityEstimate, STABILITY_DISCLAIMER};
