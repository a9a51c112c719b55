//! End-to-end planning flow: draft, validate, fix an overstow, dispatch
//! to the captain, handle a rejection through the revision chain, and
//! run the approved plan to completion.

use reefstow_core::{
    BookingId, CargoType, CompartmentId, CoolingSectionId, PortCode, Timestamp, VesselId, VoyageId,
};
use reefstow_model::{
    Booking, Compartment, CoolingSection, Hold, InMemoryBookingRepository,
    InMemoryVesselRepository, InMemoryVoyageRepository, Level, Lightship, PortCall, PortCallOp,
    StabilityLimits, Voyage,
};
use reefstow_plan::recompute::refresh_plan;
use reefstow_plan::{
    CaptainResponse, CellRef, PlanError, PlanStatus, StowagePlan, STABILITY_DISCLAIMER,
};

fn cid(s: &str) -> CompartmentId {
    CompartmentId::new(s).unwrap()
}

fn sid(s: &str) -> CoolingSectionId {
    CoolingSectionId::new(s).unwrap()
}

fn port(s: &str) -> PortCode {
    PortCode::new(s).unwrap()
}

fn cell(compartment: &str, slot: u32) -> CellRef {
    CellRef {
        compartment_id: cid(compartment),
        slot_index: slot,
    }
}

/// One hold, two decks, each with its own cooling section.
fn vessel() -> reefstow_model::VesselLayout {
    let compartment = |id: &str, level: Level, section: &str| Compartment {
        id: cid(id),
        hold_no: 1,
        level,
        cooling_section: sid(section),
        pallet_capacity: 4,
        floor_area_m2: 8.0,
        design_stowage_factor: 0.5,
        historical_stowage_factor: None,
        lcg: 12.0,
        tcg: 0.0,
        vcg: 6.0,
    };
    reefstow_model::VesselLayout::new(
        VesselId::new(),
        "POLAR TRADER",
        vec![Hold {
            number: 1,
            compartment_ids: vec![cid("1A"), cid("1D")],
        }],
        vec![
            compartment("1A", Level::A, "ZONE_1A"),
            compartment("1D", Level::D, "ZONE_1D"),
        ],
        vec![
            CoolingSection {
                id: sid("ZONE_1A"),
                hold_no: 1,
                compartment_ids: vec![cid("1A")],
            },
            CoolingSection {
                id: sid("ZONE_1D"),
                hold_no: 1,
                compartment_ids: vec![cid("1D")],
            },
        ],
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
            call(1, "ECGYE", "2026-04-02T06:00:00Z", vec![PortCallOp::Load]),
            call(2, "NLRTM", "2026-04-19T06:00:00Z", vec![PortCallOp::Discharge]),
            call(3, "DEHAM", "2026-04-21T06:00:00Z", vec![PortCallOp::Discharge]),
        ],
    }
}

fn booking(voyage_id: VoyageId, cargo: CargoType, pod: &str) -> Booking {
    Booking {
        id: BookingId::new(),
        voyage_id,
        cargo_type: cargo,
        quantity_pallets: 4,
        weight_per_pallet_t: 1.0,
        pol: port("ECGYE"),
        pod: port(pod),
        pol_sequence_at_booking: Some(1),
        pod_sequence_at_booking: None,
    }
}

#[test]
fn test_draft_to_completed_with_rejection_cycle() {
    let layout = vessel();
    let vessel_id = layout.vessel_id;
    let voyage = voyage(vessel_id);
    let voyage_id = voyage.id;

    // Bananas ride to Hamburg, frozen fish gets off in Rotterdam.
    let bananas = booking(voyage_id, CargoType::Bananas, "DEHAM");
    let fish = booking(voyage_id, CargoType::FrozenFish, "NLRTM");

    let mut vessels = InMemoryVesselRepository::new();
    vessels.insert(layout);
    let mut voyages = InMemoryVoyageRepository::new();
    voyages.insert(voyage);
    let mut bookings = InMemoryBookingRepository::new();
    bookings.insert(bananas.clone());
    bookings.insert(fish.clone());

    // First cut stows the bananas on top of the fish: the fish discharges
    // first, so the bananas block it.
    let mut plan = StowagePlan::new_draft(voyage_id);
    for slot in 0..4 {
        plan.paint(&cell("1A", slot), bananas.id).unwrap();
        plan.paint(&cell("1D", slot), fish.id).unwrap();
    }

    refresh_plan(&vessels, &voyages, &bookings, &mut plan).unwrap();
    let err = plan
        .try_transition(PlanStatus::ReadyForCaptain, "planner", None)
        .unwrap_err();
    match err {
        PlanError::TransitionBlocked { reason, .. } => {
            assert_eq!(reason, "1 overstow violation");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(plan.status(), PlanStatus::Draft);

    // Swap the decks pallet by pallet: fish up top, bananas below.
    for slot in 0..4 {
        plan.move_or_swap(&cell("1A", slot), &cell("1D", slot)).unwrap();
    }
    assert!(plan.is_stale());

    refresh_plan(&vessels, &voyages, &bookings, &mut plan).unwrap();
    let report = plan.report().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stability.disclaimer, STABILITY_DISCLAIMER);

    // Dispatch; the captain pushes back.
    plan.try_transition(PlanStatus::ReadyForCaptain, "planner", None)
        .unwrap();
    plan.try_transition(PlanStatus::EmailSent, "planner", None)
        .unwrap();
    assert!(plan.email_sent_at().is_some());
    plan.record_captain_response(
        CaptainResponse {
            responder: "Capt. Moreau".into(),
            comments: "Confirm the frozen fish zone set-point before sailing.".into(),
            at: Timestamp::now(),
        },
        false,
    )
    .unwrap();
    assert_eq!(plan.status(), PlanStatus::CaptainRejected);

    // The revision carries the positions forward and is editable again.
    let mut revision = plan.revise().unwrap();
    assert_eq!(revision.revision(), 2);
    assert_eq!(revision.previous_plan_id(), Some(plan.id()));
    assert_eq!(revision.positions(), plan.positions());

    revision
        .set_section_temperature(reefstow_plan::SectionTemperature {
            section_id: sid("ZONE_1A"),
            set_point: reefstow_core::Celsius(-18.0),
        })
        .unwrap();
    refresh_plan(&vessels, &voyages, &bookings, &mut revision).unwrap();
    assert!(revision.report().unwrap().is_clean());

    revision
        .try_transition(PlanStatus::ReadyForCaptain, "planner", None)
        .unwrap();
    revision
        .try_transition(PlanStatus::EmailSent, "planner", None)
        .unwrap();
    revision
        .record_captain_response(
            CaptainResponse {
                responder: "Capt. Moreau".into(),
                comments: "Approved.".into(),
                at: Timestamp::now(),
            },
            true,
        )
        .unwrap();

    revision
        .try_transition(PlanStatus::ReadyForExecution, "planner", None)
        .unwrap();
    revision
        .try_transition(PlanStatus::InExecution, "chief officer", None)
        .unwrap();
    revision
        .try_transition(PlanStatus::Completed, "chief officer", None)
        .unwrap();
    assert!(revision.status().is_terminal());

    // Both plans kept their own audit trails.
    assert_eq!(plan.transition_log().len(), 3);
    assert_eq!(revision.transition_log().len(), 6);

    let snapshot = revision.snapshot();
    assert_eq!(snapshot.positions.len(), 8);
    assert_eq!(
        snapshot.report.unwrap().stability.disclaimer,
        STABILITY_DISCLAIMER
    );
}
