//! # Validation Recompute Pass
//!
//! One pass rebuilds everything the plan knows about its own health:
//! temperature conflicts, overstow violations, capacity overages,
//! referential conflicts, allocation excesses, and the stability
//! estimate. The pass is a pure function of one snapshot — deterministic,
//! order-independent, and it always *replaces* the report whole. There is
//! no incremental patching.
//!
//! When loading any collaborator snapshot fails, the pass aborts before
//! touching the plan: the previous report stays in place and the plan is
//! flagged stale ([`refresh_plan`]). Stale reports block the hand-over to
//! captain review like unresolved conflicts do.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use reefstow_core::{BookingId, CargoType, Timestamp};
use reefstow_model::{
    Booking, BookingRepository, ResolvedBooking, VesselLayout, VesselRepository, Voyage,
    VoyageRepository,
};

use crate::cooling::{self, SectionTemperature, TemperatureConflict};
use crate::error::PlanError;
use crate::overstow::{self, OverstowViolation};
use crate::placement::{self, CapacityOverage};
use crate::plan::StowagePlan;
use crate::position::PositionSet;
use crate::stability::{self, StabilityEstimate};

/// A booking or placement referencing master data that no longer exists:
/// a cancelled POL/POD call, or a compartment absent from the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferentialConflict {
    /// The affected booking.
    pub booking_id: BookingId,
    /// What no longer resolves.
    pub description: String,
}

/// A booking with more pallets placed than it confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationExcess {
    /// The over-placed booking.
    pub booking_id: BookingId,
    /// Pallets placed across all compartments.
    pub placed: u32,
    /// Pallets confirmed on the booking.
    pub confirmed: u32,
}

/// The full validation state of a plan after one recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Cargo placed against an incompatible section set-point.
    pub temperature_conflicts: Vec<TemperatureConflict>,
    /// Later cargo stacked over earlier cargo.
    pub overstow_violations: Vec<OverstowViolation>,
    /// Compartments filled past declared capacity (advisory).
    pub capacity_overages: Vec<CapacityOverage>,
    /// Bookings or placements referencing vanished master data.
    pub referential_conflicts: Vec<ReferentialConflict>,
    /// Bookings placed beyond their confirmed quantity.
    pub allocation_excesses: Vec<AllocationExcess>,
    /// Preliminary stability, disclaimer included.
    pub stability: StabilityEstimate,
    /// When this pass ran.
    pub computed_at: Timestamp,
}

impl ValidationReport {
    /// Whether every review-blocking category is empty.
    ///
    /// Capacity overages are advisory in every state and do not count.
    pub fn is_clean(&self) -> bool {
        self.temperature_conflicts.is_empty()
            && self.overstow_violations.is_empty()
            && self.referential_conflicts.is_empty()
            && self.allocation_excesses.is_empty()
    }

    /// The unmet preconditions, rendered with counts, e.g.
    /// `"2 unresolved temperature conflicts, 1 overstow violation"`.
    /// `None` when clean.
    pub fn blocking_summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        let mut push = |count: usize, singular: &str, plural: &str| {
            if count == 1 {
                parts.push(format!("1 {singular}"));
            } else if count > 1 {
                parts.push(format!("{count} {plural}"));
            }
        };
        push(
            self.temperature_conflicts.len(),
            "unresolved temperature conflict",
            "unresolved temperature conflicts",
        );
        push(
            self.overstow_violations.len(),
            "overstow violation",
            "overstow violations",
        );
        push(
            self.referential_conflicts.len(),
            "referential conflict",
            "referential conflicts",
        );
        push(
            self.allocation_excesses.len(),
            "over-allocated booking",
            "over-allocated bookings",
        );
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Run the full validation pass over already-loaded snapshots.
///
/// Section set-points missing from `assignments` are filled from the
/// dominant-cargo defaults before the temperature check, so painting into
/// an untouched section validates against a sensible set-point instead of
/// nothing.
pub fn recompute(
    layout: &VesselLayout,
    voyage: &Voyage,
    bookings: &[Booking],
    snapshot: &PositionSet,
    assignments: &[SectionTemperature],
) -> ValidationReport {
    let rotation = voyage.effective_rotation();

    let mut resolved: BTreeMap<BookingId, ResolvedBooking> = BTreeMap::new();
    let mut referential_conflicts = Vec::new();
    for booking in bookings {
        match booking.resolve(&rotation) {
            Ok(r) => {
                resolved.insert(booking.id, r);
            }
            Err(e) => referential_conflicts.push(ReferentialConflict {
                booking_id: booking.id,
                description: e.to_string(),
            }),
        }
    }

    let cargo_of: BTreeMap<BookingId, CargoType> =
        bookings.iter().map(|b| (b.id, b.cargo_type)).collect();

    // Placements into compartments the layout does not know.
    for compartment in snapshot.occupied_compartments() {
        if layout.compartment(&compartment).is_none() {
            for booking in snapshot.bookings_in_compartment(&compartment) {
                referential_conflicts.push(ReferentialConflict {
                    booking_id: booking,
                    description: format!("placement references unknown compartment {compartment}"),
                });
            }
        }
    }

    // Fill unassigned sections from the dominant-cargo defaults.
    let mut effective_assignments = assignments.to_vec();
    for default in cooling::default_set_points(layout, snapshot, &cargo_of) {
        if !effective_assignments
            .iter()
            .any(|a| a.section_id == default.section_id)
        {
            effective_assignments.push(default);
        }
    }

    let temperature_conflicts = cooling::detect_temperature_conflicts(
        layout,
        &effective_assignments,
        snapshot,
        &cargo_of,
    );
    let overstow_violations = overstow::detect_overstow(layout, snapshot, &resolved);
    let capacity_overages = placement::capacity_overages(layout, snapshot);

    let mut allocation_excesses = Vec::new();
    for booking in bookings {
        let placed = snapshot.quantity_for_booking(&booking.id);
        if placed > booking.quantity_pallets {
            allocation_excesses.push(AllocationExcess {
                booking_id: booking.id,
                placed,
                confirmed: booking.quantity_pallets,
            });
        }
    }

    let stability = stability::estimate_stability(layout, snapshot, &resolved);

    debug!(
        temperature_conflicts = temperature_conflicts.len(),
        overstow_violations = overstow_violations.len(),
        capacity_overages = capacity_overages.len(),
        referential_conflicts = referential_conflicts.len(),
        allocation_excesses = allocation_excesses.len(),
        "validation pass complete"
    );

    ValidationReport {
        temperature_conflicts,
        overstow_violations,
        capacity_overages,
        referential_conflicts,
        allocation_excesses,
        stability,
        computed_at: Timestamp::now(),
    }
}

/// Load the collaborator snapshots for a plan and apply a fresh report.
///
/// On any read failure the plan's existing report is left untouched and
/// the plan is marked stale; the error propagates to the caller.
pub fn refresh_plan(
    vessel_repo: &dyn VesselRepository,
    voyage_repo: &dyn VoyageRepository,
    booking_repo: &dyn BookingRepository,
    plan: &mut StowagePlan,
) -> Result<(), PlanError> {
    let loaded = (|| {
        let voyage = voyage_repo.voyage(&plan.voyage_id())?;
        let layout = vessel_repo.vessel(&voyage.vessel_id)?;
        let bookings = booking_repo.bookings_for_voyage(&plan.voyage_id())?;
        Ok::<_, reefstow_model::ModelError>((layout, voyage, bookings))
    })();

    let (layout, voyage, bookings) = match loaded {
        Ok(snapshots) => snapshots,
        Err(e) => {
            plan.mark_stale();
            return Err(e.into());
        }
    };

    let report = recompute(
        &layout,
        &voyage,
        &bookings,
        plan.positions(),
        plan.section_temperatures(),
    );
    plan.apply_report(report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reefstow_core::{
        Celsius, CompartmentId, CoolingSectionId, PortCode, VesselId, VoyageId,
    };
    use reefstow_model::{
        Compartment, CoolingSection, Hold, InMemoryBookingRepository, InMemoryVesselRepository,
        InMemoryVoyageRepository, Level, Lightship, PortCall, PortCallOp, StabilityLimits,
    };

    use crate::placement::{apply_paint, CellRef};

    fn cid(s: &str) -> CompartmentId {
        CompartmentId::new(s).unwrap()
    }

    fn sid(s: &str) -> CoolingSectionId {
        CoolingSectionId::new(s).unwrap()
    }

    fn port(code: &str) -> PortCode {
        PortCode::new(code).unwrap()
    }

    fn layout(vessel_id: VesselId) -> VesselLayout {
        let compartment = |id: &str, level: Level| Compartment {
            id: cid(id),
            hold_no: 1,
            level,
            cooling_section: sid("ZONE_1AD"),
            pallet_capacity: 4,
            floor_area_m2: 8.0,
            design_stowage_factor: 0.5,
            historical_stowage_factor: None,
            lcg: 10.0,
            tcg: 0.0,
            vcg: 6.0,
        };
        VesselLayout::new(
            vessel_id,
            "ALBATROSS BAY",
            vec![Hold {
                number: 1,
                compartment_ids: vec![cid("1A"), cid("1D")],
            }],
            vec![compartment("1A", Level::A), compartment("1D", Level::D)],
            vec![CoolingSection {
                id: sid("ZONE_1AD"),
                hold_no: 1,
                compartment_ids: vec![cid("1A"), cid("1D")],
            }],
            Lightship {
                weight_t: 6000.0,
                lcg: 0.0,
                tcg: 0.0,
                vcg: 7.0,
            },
            StabilityLimits {
                min_gm: 0.5,
                max_gm: 3.0,
                max_trim_m: 2.0,
                max_list_deg: 3.0,
                max_draft_m: 9.0,
                km_m: 9.0,
                lcb_m: 0.0,
                mct_tm_per_cm: 110.0,
                tpc_t_per_cm: 18.0,
                lightship_draft_m: 4.2,
            },
        )
        .unwrap()
    }

    fn voyage(vessel_id: VesselId) -> Voyage {
        let call = |seq: u32, code: &str, eta: &str, ops: Vec<PortCallOp>| PortCall {
            sequence: seq,
            port: port(code),
            eta: Timestamp::parse(eta).unwrap(),
            etd: Timestamp::parse(eta).unwrap(),
            ata: None,
            atd: None,
            operations: ops,
            cancelled: false,
            locked: false,
        };
        Voyage {
            id: VoyageId::new(),
            vessel_id,
            service_code: "ECSA-NWC".into(),
            port_calls: vec![
                call(1, "ECGYE", "2026-03-01T06:00:00Z", vec![PortCallOp::Load]),
                call(2, "NLRTM", "2026-03-18T06:00:00Z", vec![PortCallOp::Discharge]),
                call(3, "DEHAM", "2026-03-20T06:00:00Z", vec![PortCallOp::Discharge]),
            ],
        }
    }

    fn booking(voyage_id: VoyageId, cargo: CargoType, qty: u32, pod: &str) -> Booking {
        Booking {
            id: BookingId::new(),
            voyage_id,
            cargo_type: cargo,
            quantity_pallets: qty,
            weight_per_pallet_t: 1.0,
            pol: port("ECGYE"),
            pod: port(pod),
            pol_sequence_at_booking: Some(1),
            pod_sequence_at_booking: None,
        }
    }

    fn paint(set: &PositionSet, compartment: &str, slots: std::ops::Range<u32>, booking: BookingId) -> PositionSet {
        let mut out = set.clone();
        for slot in slots {
            out = apply_paint(
                &out,
                &CellRef {
                    compartment_id: cid(compartment),
                    slot_index: slot,
                },
                booking,
            );
        }
        out
    }

    #[test]
    fn test_clean_plan_reports_clean() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let voyage = voyage(vessel_id);
        let bananas = booking(voyage.id, CargoType::Bananas, 4, "NLRTM");
        let snapshot = paint(&PositionSet::empty(), "1A", 0..4, bananas.id);

        let report = recompute(&layout, &voyage, &[bananas], &snapshot, &[]);
        assert!(report.is_clean());
        assert!(report.blocking_summary().is_none());
        assert_eq!(report.stability.disclaimer, crate::STABILITY_DISCLAIMER);
    }

    #[test]
    fn test_full_replace_not_incremental() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let voyage = voyage(vessel_id);
        let fish = booking(voyage.id, CargoType::FrozenFish, 4, "NLRTM");
        let snapshot = paint(&PositionSet::empty(), "1A", 0..2, fish.id);

        // Frozen fish alone defaults the zone to -18°C: clean.
        let report = recompute(&layout, &voyage, &[fish.clone()], &snapshot, &[]);
        assert!(report.is_clean());

        // A banana set-point creates a conflict; removing it again must
        // clear the report completely.
        let warm = vec![SectionTemperature {
            section_id: sid("ZONE_1AD"),
            set_point: Celsius(13.3),
        }];
        let report = recompute(&layout, &voyage, &[fish.clone()], &snapshot, &warm);
        assert_eq!(report.temperature_conflicts.len(), 1);

        let report = recompute(&layout, &voyage, &[fish], &snapshot, &[]);
        assert!(report.temperature_conflicts.is_empty());
    }

    #[test]
    fn test_blocking_summary_counts() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let voyage = voyage(vessel_id);
        let fish = booking(voyage.id, CargoType::FrozenFish, 4, "NLRTM");
        let bananas = booking(voyage.id, CargoType::Bananas, 4, "DEHAM");
        // Fish below, bananas above: a temperature conflict (shared zone)
        // and an overstow (bananas leave later, stowed on top).
        let snapshot = paint(&PositionSet::empty(), "1D", 0..2, fish.id);
        let snapshot = paint(&snapshot, "1A", 0..2, bananas.id);

        let report = recompute(&layout, &voyage, &[fish, bananas], &snapshot, &[]);
        let summary = report.blocking_summary().unwrap();
        assert!(summary.contains("unresolved temperature conflict"));
        assert!(summary.contains("1 overstow violation"));
    }

    #[test]
    fn test_cancelled_pod_is_referential_conflict() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let mut voyage = voyage(vessel_id);
        let bananas = booking(voyage.id, CargoType::Bananas, 4, "NLRTM");
        let snapshot = paint(&PositionSet::empty(), "1A", 0..2, bananas.id);
        voyage.port_calls[1].cancelled = true;

        let report = recompute(&layout, &voyage, &[bananas.clone()], &snapshot, &[]);
        assert_eq!(report.referential_conflicts.len(), 1);
        assert_eq!(report.referential_conflicts[0].booking_id, bananas.id);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_over_allocation_detected() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let voyage = voyage(vessel_id);
        // Confirmed 3 pallets, painted 5 across two compartments.
        let bananas = booking(voyage.id, CargoType::Bananas, 3, "NLRTM");
        let snapshot = paint(&PositionSet::empty(), "1A", 0..3, bananas.id);
        let snapshot = paint(&snapshot, "1D", 0..2, bananas.id);

        let report = recompute(&layout, &voyage, &[bananas.clone()], &snapshot, &[]);
        assert_eq!(report.allocation_excesses.len(), 1);
        assert_eq!(report.allocation_excesses[0].placed, 5);
        assert_eq!(report.allocation_excesses[0].confirmed, 3);
    }

    #[test]
    fn test_capacity_overage_is_advisory() {
        let vessel_id = VesselId::new();
        let layout = layout(vessel_id);
        let voyage = voyage(vessel_id);
        let bananas = booking(voyage.id, CargoType::Bananas, 10, "NLRTM");
        // Capacity 4, painted 6.
        let snapshot = paint(&PositionSet::empty(), "1A", 0..6, bananas.id);

        let report = recompute(&layout, &voyage, &[bananas], &snapshot, &[]);
        assert_eq!(report.capacity_overages.len(), 1);
        assert_eq!(report.capacity_overages[0].placed, 6);
        // Advisory: does not block review.
        assert!(report.is_clean());
    }

    #[test]
    fn test_refresh_plan_marks_stale_on_read_failure() {
        let vessel_repo = InMemoryVesselRepository::new();
        let voyage_repo = InMemoryVoyageRepository::new();
        let booking_repo = InMemoryBookingRepository::new();

        let mut plan = StowagePlan::new_draft(VoyageId::new());
        assert!(!plan.is_stale());
        let err = refresh_plan(&vessel_repo, &voyage_repo, &booking_repo, &mut plan);
        assert!(err.is_err());
        assert!(plan.is_stale());
        assert!(plan.report().is_none());
    }

    #[test]
    fn test_refresh_plan_applies_report() {
        let vessel_id = VesselId::new();
        let voyage = voyage(vessel_id);
        let voyage_id = voyage.id;

        let mut vessel_repo = InMemoryVesselRepository::new();
        vessel_repo.insert(layout(vessel_id));
        let mut voyage_repo = InMemoryVoyageRepository::new();
        voyage_repo.insert(voyage);
        let booking_repo = InMemoryBookingRepository::new();

        let mut plan = StowagePlan::new_draft(voyage_id);
        refresh_plan(&vessel_repo, &voyage_repo, &booking_repo, &mut plan).unwrap();
        assert!(!plan.is_stale());
        assert!(plan.report().unwrap().is_clean());
    }
}
