//! # reefstow-core — Foundational Types for the Reefstow Stack
//!
//! This crate is the bedrock of the Reefstow stowage-planning stack. It
//! defines the type-system primitives every other crate builds on. Every
//! other crate in the workspace depends on `reefstow-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `VesselId`, `VoyageId`,
//!    `BookingId`, `PlanId`, `CompartmentId`, `CoolingSectionId`, `PortCode`
//!    — all newtypes, the string-backed ones with validated constructors.
//!    No bare strings for identifiers.
//!
//! 2. **Single `CargoType` enum.** One definition of the carriage table,
//!    exhaustive `match` everywhere. Adding a cargo type forces every
//!    consumer to handle its carriage temperature and tolerance band.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision — port-call ETAs compared across feeds
//!    must never differ by timezone representation.
//!
//! 4. **Temperatures are `Celsius`, not `f64`.** Set-points and tolerance
//!    bands cannot be confused with weights or coordinates.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `reefstow-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod cargo;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use cargo::{Celsius, CargoType, TemperatureBand, CARGO_TYPE_COUNT};
pub use error::CoreError;
pub use identity::{
    BookingId, CompartmentId, CoolingSectionId, PlanId, PortCode, VesselId, VoyageId,
};
pub use temporal::Timestamp;
