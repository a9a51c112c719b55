//! # reefstow-cli — Command-Line Interface
//!
//! Provides the `reefstow` binary.
//!
//! ## Subcommands
//!
//! - `reefstow validate` — Run the full validation pass over a plan
//!   bundle (vessel, voyage, bookings, positions) loaded from JSON and
//!   print every conflict, violation, and the stability estimate.
//! - `reefstow rotation` — Print a voyage's effective rotation.
//! - `reefstow serve` — Run the planning API, optionally seeded from a
//!   bundle.
//!
//! ```bash
//! reefstow validate --bundle plans/voyage-2614/
//! reefstow rotation --voyage plans/voyage-2614/voyage.json
//! reefstow serve --port 8080 --bundle plans/voyage-2614/
//! ```

pub mod bundle;
pub mod rotation;
pub mod serve;
pub mod validate;
