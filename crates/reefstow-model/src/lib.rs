//! # reefstow-model — Master Data for Stowage Planning
//!
//! The data the planning engine consumes read-only on every computation
//! pass: the vessel's physical compartment layout, the voyage's port
//! rotation, and the confirmed booking list. Master-data CRUD (ports,
//! vessels, services, contracts) lives in external systems; this crate
//! models the snapshot shapes and the repository traits through which the
//! engine reads them.
//!
//! ## Modules
//!
//! - [`vessel`] — holds, compartments, cooling sections, lightship and
//!   stability reference data. Layout invariants are checked at
//!   construction, never downstream.
//! - [`voyage`] — port calls and the *effective rotation*: the engine
//!   resolves POL/POD by port code against a freshly derived sequence on
//!   every run. Cached sequence numbers on bookings are display-only.
//! - [`booking`] — confirmed demand units with cargo type and quantity.
//! - [`repository`] — collaborator boundary: snapshot-read traits plus
//!   in-memory implementations for the API, CLI, and tests.

pub mod booking;
pub mod error;
pub mod repository;
pub mod vessel;
pub mod voyage;

pub use booking::{Booking, ResolvedBooking};
pub use error::ModelError;
pub use repository::{
    BookingRepository, InMemoryBookingRepository, InMemoryVesselRepository,
    InMemoryVoyageRepository, VesselRepository, VoyageRepository,
};
pub use vessel::{
    Compartment, CoolingSection, Hold, Level, Lightship, StabilityLimits, VesselLayout,
};
pub use voyage::{EffectiveRotation, PortCall, PortCallOp, RotationEntry, Voyage};
