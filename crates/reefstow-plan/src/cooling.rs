//! # Cooling Section Allocator
//!
//! One refrigeration unit serves each cooling section, so every
//! compartment in a section runs at the section's single set-point for
//! the whole voyage. The allocator assigns set-points (defaulting from
//! the dominant cargo type's carriage temperature) and validates every
//! placed cargo type against them.
//!
//! Mixed cargo in one section is legitimate exactly when the set-point
//! lies in the intersection of all occupants' tolerance bands. The check
//! below is per cargo type against the set-point, which is equivalent:
//! a set-point inside every band is inside the intersection.
//!
//! Conflicts are advisory — the plan stays editable and saveable. They
//! only block the hand-over to captain review.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reefstow_core::{BookingId, CargoType, Celsius, CoolingSectionId};
use reefstow_model::VesselLayout;

use crate::position::PositionSet;

/// Planner-assigned set-point for one cooling section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemperature {
    /// The section.
    pub section_id: CoolingSectionId,
    /// The assigned carriage temperature.
    pub set_point: Celsius,
}

/// A cargo type placed in a section whose set-point it does not tolerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureConflict {
    /// The compartment holding the incompatible cargo.
    pub compartment_id: reefstow_core::CompartmentId,
    /// The section whose set-point is incompatible.
    pub cooling_section_id: CoolingSectionId,
    /// Human-readable description with the set-point and the band.
    pub description: String,
    /// Bookings of the incompatible cargo type in this compartment.
    pub booking_ids: Vec<BookingId>,
}

/// Derive default set-points: per occupied section, the carriage
/// temperature of the cargo type holding the most pallets.
///
/// Ties break toward the colder carriage temperature — underchilling
/// general cargo is recoverable, overwarming frozen cargo is not.
/// Unoccupied sections get no default.
pub fn default_set_points(
    layout: &VesselLayout,
    snapshot: &PositionSet,
    cargo_of: &BTreeMap<BookingId, CargoType>,
) -> Vec<SectionTemperature> {
    let mut pallets_by_section: BTreeMap<CoolingSectionId, BTreeMap<CargoType, u32>> =
        BTreeMap::new();
    for position in snapshot.positions() {
        let Some(section) = layout.section_of(&position.compartment_id) else {
            continue;
        };
        let Some(cargo) = cargo_of.get(&position.booking_id) else {
            continue;
        };
        *pallets_by_section
            .entry(section.id.clone())
            .or_default()
            .entry(*cargo)
            .or_insert(0) += 1;
    }

    pallets_by_section
        .into_iter()
        .filter_map(|(section_id, counts)| {
            let dominant = counts.into_iter().max_by(|(a_type, a_count), (b_type, b_count)| {
                a_count.cmp(b_count).then_with(|| {
                    // Colder carriage temperature wins the tie.
                    b_type
                        .carriage_temperature()
                        .value()
                        .partial_cmp(&a_type.carriage_temperature().value())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
            })?;
            Some(SectionTemperature {
                section_id,
                set_point: dominant.0.carriage_temperature(),
            })
        })
        .collect()
}

/// Validate every placement against its section's assigned set-point.
///
/// One conflict per (compartment, cargo type) pairing that fails, so a
/// frozen-fish pallet in a banana zone yields exactly one conflict per
/// compartment it occupies, naming the section and all affected bookings.
/// Sections without an assignment are skipped here; the recompute pass
/// assigns defaults before calling in.
pub fn detect_temperature_conflicts(
    layout: &VesselLayout,
    assignments: &[SectionTemperature],
    snapshot: &PositionSet,
    cargo_of: &BTreeMap<BookingId, CargoType>,
) -> Vec<TemperatureConflict> {
    let set_points: BTreeMap<&CoolingSectionId, Celsius> = assignments
        .iter()
        .map(|a| (&a.section_id, a.set_point))
        .collect();

    let mut conflicts = Vec::new();
    for compartment_id in snapshot.occupied_compartments() {
        let Some(section) = layout.section_of(&compartment_id) else {
            // Unknown compartments surface as referential conflicts.
            continue;
        };
        let Some(set_point) = set_points.get(&section.id).copied() else {
            continue;
        };

        // Group this compartment's bookings by cargo type.
        let mut by_cargo: BTreeMap<CargoType, Vec<BookingId>> = BTreeMap::new();
        for booking in snapshot.bookings_in_compartment(&compartment_id) {
            if let Some(cargo) = cargo_of.get(&booking) {
                by_cargo.entry(*cargo).or_default().push(booking);
            }
        }

        for (cargo, booking_ids) in by_cargo {
            let band = cargo.tolerance_band();
            if !band.contains(set_point) {
                conflicts.push(TemperatureConflict {
                    compartment_id: compartment_id.clone(),
                    cooling_section_id: section.id.clone(),
                    description: format!(
                        "{cargo} in {compartment_id} cannot ride at {set_point} (section {} set-point); tolerance {band}",
                        section.id
                    ),
                    booking_ids,
                });
            }
        }
    }
    conflicts
}
