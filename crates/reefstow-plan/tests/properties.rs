//! Property tests over the pure placement core.

use std::collections::BTreeMap;

use proptest::prelude::*;

use reefstow_core::{BookingId, CompartmentId};
use reefstow_plan::position::{aggregate, expand, AggregateQuantities};
use reefstow_plan::{placement, CellRef, PositionSet};

fn compartment_pool() -> Vec<CompartmentId> {
    ["1A", "1B", "2A", "2B"]
        .iter()
        .map(|s| CompartmentId::new(*s).unwrap())
        .collect()
}

/// A small deterministic booking pool; proptest picks indices into it.
fn booking_pool() -> Vec<BookingId> {
    (0..4).map(|_| BookingId::new()).collect()
}

/// Strategy: an occupancy map over a 4-compartment, 8-slot grid.
fn arb_cells() -> impl Strategy<Value = BTreeMap<(usize, u32), usize>> {
    prop::collection::btree_map((0..4usize, 0..8u32), 0..4usize, 0..16)
}

fn snapshot_from(
    cells: &BTreeMap<(usize, u32), usize>,
    compartments: &[CompartmentId],
    bookings: &[BookingId],
) -> PositionSet {
    let mut snapshot = PositionSet::empty();
    for (&(c, slot), &b) in cells {
        let cell = CellRef {
            compartment_id: compartments[c].clone(),
            slot_index: slot,
        };
        snapshot = placement::apply_paint(&snapshot, &cell, bookings[b]);
    }
    snapshot
}

proptest! {
    // The occupied-swap precondition below holds for only a few percent of
    // generated snapshots, so the runner needs a larger discard budget than
    // the default 1024 to collect its cases.
    #![proptest_config(ProptestConfig {
        max_global_rejects: 65536,
        ..ProptestConfig::default()
    })]

    /// expand() then aggregate() reproduces any aggregate assignment.
    #[test]
    fn prop_aggregate_expand_round_trip(
        quantities in prop::collection::btree_map((0..4usize, 0..4usize), 1..20u32, 0..8)
    ) {
        let compartments = compartment_pool();
        let bookings = booking_pool();
        let agg: AggregateQuantities = quantities
            .into_iter()
            .map(|((b, c), qty)| ((bookings[b], compartments[c].clone()), qty))
            .collect();

        let positions = expand(&agg);
        prop_assert_eq!(aggregate(&positions), agg);
    }

    /// Painting the same cell twice with the same booking is a no-op.
    #[test]
    fn prop_paint_is_a_toggle(cells in arb_cells(), c in 0..4usize, slot in 0..8u32, b in 0..4usize) {
        let compartments = compartment_pool();
        let bookings = booking_pool();
        let snapshot = snapshot_from(&cells, &compartments, &bookings);
        let cell = CellRef {
            compartment_id: compartments[c].clone(),
            slot_index: slot,
        };

        let once = placement::apply_paint(&snapshot, &cell, bookings[b]);
        let twice = placement::apply_paint(&once, &cell, bookings[b]);
        // The double stroke lands back where it started unless a *different*
        // booking holds the cell, in which case both strokes are no-ops.
        match snapshot.occupant(&cell) {
            Some(other) if other != bookings[b] => {
                prop_assert_eq!(&once, &snapshot);
                prop_assert_eq!(&twice, &snapshot);
            }
            _ => prop_assert_eq!(&twice, &snapshot),
        }
    }

    /// Applying the same swap twice restores the original snapshot when
    /// both cells are occupied by different bookings.
    #[test]
    fn prop_swap_twice_restores(
        cells in arb_cells(),
        sc in 0..4usize, ss in 0..8u32,
        dc in 0..4usize, ds in 0..8u32,
    ) {
        let compartments = compartment_pool();
        let bookings = booking_pool();
        let snapshot = snapshot_from(&cells, &compartments, &bookings);
        let source = CellRef { compartment_id: compartments[sc].clone(), slot_index: ss };
        let dest = CellRef { compartment_id: compartments[dc].clone(), slot_index: ds };

        let occupied_swap = matches!(
            (snapshot.occupant(&source), snapshot.occupant(&dest)),
            (Some(a), Some(b)) if a != b
        );
        prop_assume!(occupied_swap);

        let once = placement::apply_move_or_swap(&snapshot, &source, &dest);
        let twice = placement::apply_move_or_swap(&once, &source, &dest);
        prop_assert_eq!(&twice, &snapshot);
        prop_assert_eq!(twice.aggregate(), snapshot.aggregate());
    }

    /// A move or swap never creates or destroys pallets.
    #[test]
    fn prop_move_preserves_pallet_count(
        cells in arb_cells(),
        sc in 0..4usize, ss in 0..8u32,
        dc in 0..4usize, ds in 0..8u32,
    ) {
        let compartments = compartment_pool();
        let bookings = booking_pool();
        let snapshot = snapshot_from(&cells, &compartments, &bookings);
        let source = CellRef { compartment_id: compartments[sc].clone(), slot_index: ss };
        let dest = CellRef { compartment_id: compartments[dc].clone(), slot_index: ds };

        let moved = placement::apply_move_or_swap(&snapshot, &source, &dest);
        prop_assert_eq!(moved.positions().len(), snapshot.positions().len());
    }
}
