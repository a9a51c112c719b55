//! # Overstow Detector
//!
//! Within one hold, reaching a lower compartment at a discharge port
//! means first clearing every compartment above it — unless the cargo
//! above leaves at that port or earlier. Cargo for a later port stacked
//! over cargo for an earlier port is an overstow violation.
//!
//! Discharge order comes from the voyage's *effective* rotation on every
//! run. Bookings whose POL/POD no longer resolve are reported as
//! referential conflicts by the recompute pass and skipped here, so a
//! cancelled port call can never silently reorder the scan.
//!
//! A compartment can hold several bookings. The blocked side ranks by
//! each occupant's own discharge sequence; the blocking side ranks by its
//! latest-leaving occupant — the conservative reading that flags every
//! physically possible block.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use reefstow_core::{BookingId, CompartmentId};
use reefstow_model::{ResolvedBooking, VesselLayout};

use crate::position::PositionSet;

/// Cargo stacked over earlier-discharging cargo in the same hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverstowViolation {
    /// The upper compartment doing the blocking.
    pub blocking_compartment_id: CompartmentId,
    /// Human-readable description naming both compartments and sequences.
    pub description: String,
    /// Bookings in the lower compartment that cannot be reached.
    pub blocked_booking_ids: Vec<BookingId>,
}

/// Scan every hold for overstow violations.
///
/// One violation per (blocking, blocked) compartment pair with at least
/// one blocked booking. Bookings absent from `resolved` are skipped.
pub fn detect_overstow(
    layout: &VesselLayout,
    snapshot: &PositionSet,
    resolved: &BTreeMap<BookingId, ResolvedBooking>,
) -> Vec<OverstowViolation> {
    let mut violations = Vec::new();

    for hold_no in layout.hold_numbers() {
        let stack = layout.compartments_in_hold_by_depth(hold_no);

        for (upper_idx, upper) in stack.iter().enumerate() {
            // The blocking rank of the upper compartment: when its last
            // occupant leaves.
            let upper_last_discharge = snapshot
                .bookings_in_compartment(&upper.id)
                .into_iter()
                .filter_map(|b| resolved.get(&b))
                .map(|r| r.pod_sequence)
                .max();
            let Some(upper_out) = upper_last_discharge else {
                continue;
            };

            for lower in stack.iter().skip(upper_idx + 1) {
                if lower.level.depth_rank() <= upper.level.depth_rank() {
                    continue;
                }
                let blocked: Vec<(BookingId, u32)> = snapshot
                    .bookings_in_compartment(&lower.id)
                    .into_iter()
                    .filter_map(|b| resolved.get(&b).map(|r| (b, r.pod_sequence)))
                    .filter(|(_, pod)| *pod < upper_out)
                    .collect();
                if blocked.is_empty() {
                    continue;
                }

                let earliest_blocked = blocked.iter().map(|(_, pod)| *pod).min().unwrap_or(0);
                violations.push(OverstowViolation {
                    blocking_compartment_id: upper.id.clone(),
                    description: format!(
                        "hold {hold_no}: {} discharges at seq {upper_out} and blocks {} cargo due at seq {earliest_blocked}",
                        upper.id, lower.id
                    ),
                    blocked_booking_ids: blocked.into_iter().map(|(b, _)| b).collect(),
                });
            }
        }
    }
    violations
}
