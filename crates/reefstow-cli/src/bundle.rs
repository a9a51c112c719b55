//! # Plan Bundles
//!
//! A bundle is the offline, file-based form of everything one validation
//! pass needs: the vessel layout, the voyage, the confirmed bookings,
//! and the plan's positions and section set-points. Bundles come in two
//! shapes:
//!
//! - a directory holding `vessel.json`, `voyage.json`, `bookings.json`,
//!   and optionally `plan.json`;
//! - a single JSON file with the same four top-level keys.
//!
//! Loaded layouts and voyages are re-validated, since serde alone does
//! not enforce their structural invariants.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reefstow_model::{Booking, VesselLayout, Voyage};
use reefstow_plan::{CargoPosition, PlanError, PositionSet, SectionTemperature};

/// The plan portion of a bundle: a flat position list plus section
/// set-point assignments. Both default to empty so a bundle without a
/// `plan.json` validates the empty plan.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    #[serde(default)]
    pub positions: Vec<CargoPosition>,
    #[serde(default)]
    pub section_temperatures: Vec<SectionTemperature>,
}

impl PlanInput {
    /// Build the position snapshot, rejecting duplicate cells.
    pub fn snapshot(&self) -> Result<PositionSet, PlanError> {
        PositionSet::from_positions(self.positions.clone())
    }
}

/// Everything one offline validation run operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBundle {
    pub vessel: VesselLayout,
    pub voyage: Voyage,
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub plan: PlanInput,
}

/// Load a bundle from a directory of JSON files or a single JSON file.
pub fn load_bundle(path: &Path) -> Result<PlanBundle> {
    let bundle = if path.is_dir() {
        load_bundle_dir(path)?
    } else {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read bundle file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse bundle file {}", path.display()))?
    };

    bundle
        .vessel
        .validate()
        .with_context(|| format!("invalid vessel layout in bundle {}", path.display()))?;
    bundle
        .voyage
        .validate()
        .with_context(|| format!("invalid voyage in bundle {}", path.display()))?;

    Ok(bundle)
}

fn load_bundle_dir(dir: &Path) -> Result<PlanBundle> {
    let vessel = load_json(&dir.join("vessel.json"))?;
    let voyage = load_json(&dir.join("voyage.json"))?;
    let bookings = load_json(&dir.join("bookings.json"))?;

    // The plan file is optional: a missing one means an empty plan.
    let plan_path = dir.join("plan.json");
    let plan = if plan_path.exists() {
        load_json(&plan_path)?
    } else {
        PlanInput::default()
    };

    Ok(PlanBundle {
        vessel,
        voyage,
        bookings,
        plan,
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
