//! # Cargo Positions — Flat and Aggregate Views
//!
//! Placement is expressed at pallet-position granularity: one
//! [`CargoPosition`] is one pallet of one booking in one slot of one
//! compartment. Persistence and redisplay work on the aggregate view,
//! (booking, compartment) → quantity.
//!
//! The two conversions are separate pure functions with an auditable
//! ordering contract:
//!
//! - [`aggregate`] collapses a flat list into quantities.
//! - [`expand`] rebuilds a flat list from quantities, assigning slot
//!   indices deterministically: compartments in code order, bookings
//!   within a compartment in id order, slots packed from 0.
//!
//! Expansion is allowed to produce a different flat ordering than the one
//! originally painted — slot order carries no meaning — but aggregate
//! counts round-trip exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reefstow_core::{BookingId, CompartmentId};

use crate::error::PlanError;
use crate::placement::CellRef;

/// One pallet of one booking in one compartment slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoPosition {
    /// The booking this pallet belongs to.
    pub booking_id: BookingId,
    /// The compartment holding the pallet.
    pub compartment_id: CompartmentId,
    /// Slot index within the compartment. Unique per compartment in any
    /// valid snapshot; carries no semantic ordering.
    pub slot_index: u32,
}

/// Aggregate view: (booking, compartment) → pallet quantity.
pub type AggregateQuantities = BTreeMap<(BookingId, CompartmentId), u32>;

/// An immutable snapshot of all cargo positions in a plan.
///
/// The invariant — at most one pallet per (compartment, slot) cell — is
/// enforced at construction and preserved by every gesture function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSet {
    positions: Vec<CargoPosition>,
}

impl PositionSet {
    /// The empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from a flat position list.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DuplicateCell`] when two positions claim the
    /// same (compartment, slot) cell.
    pub fn from_positions(mut positions: Vec<CargoPosition>) -> Result<Self, PlanError> {
        positions.sort_by(|a, b| {
            (&a.compartment_id, a.slot_index, a.booking_id)
                .cmp(&(&b.compartment_id, b.slot_index, b.booking_id))
        });
        for pair in positions.windows(2) {
            if pair[0].compartment_id == pair[1].compartment_id
                && pair[0].slot_index == pair[1].slot_index
            {
                return Err(PlanError::DuplicateCell(format!(
                    "{} slot {}",
                    pair[0].compartment_id, pair[0].slot_index
                )));
            }
        }
        Ok(Self { positions })
    }

    /// All positions, in canonical order.
    pub fn positions(&self) -> &[CargoPosition] {
        &self.positions
    }

    /// Number of placed pallets.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The booking occupying a cell, if any.
    pub fn occupant(&self, cell: &CellRef) -> Option<BookingId> {
        self.positions
            .iter()
            .find(|p| p.compartment_id == cell.compartment_id && p.slot_index == cell.slot_index)
            .map(|p| p.booking_id)
    }

    /// Aggregate view of this snapshot.
    pub fn aggregate(&self) -> AggregateQuantities {
        aggregate(&self.positions)
    }

    /// Total pallets placed in one compartment.
    pub fn quantity_in_compartment(&self, compartment: &CompartmentId) -> u32 {
        self.positions
            .iter()
            .filter(|p| p.compartment_id == *compartment)
            .count() as u32
    }

    /// Total pallets placed for one booking across all compartments.
    pub fn quantity_for_booking(&self, booking: &BookingId) -> u32 {
        self.positions
            .iter()
            .filter(|p| p.booking_id == *booking)
            .count() as u32
    }

    /// Bookings with at least one pallet in the given compartment.
    pub fn bookings_in_compartment(&self, compartment: &CompartmentId) -> Vec<BookingId> {
        let mut ids: Vec<BookingId> = self
            .positions
            .iter()
            .filter(|p| p.compartment_id == *compartment)
            .map(|p| p.booking_id)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Compartments with at least one pallet placed.
    pub fn occupied_compartments(&self) -> Vec<CompartmentId> {
        let mut ids: Vec<CompartmentId> = self
            .positions
            .iter()
            .map(|p| p.compartment_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Internal: rebuild from a known-valid position list (gesture
    /// functions uphold the cell invariant themselves).
    pub(crate) fn from_valid(mut positions: Vec<CargoPosition>) -> Self {
        positions.sort_by(|a, b| {
            (&a.compartment_id, a.slot_index, a.booking_id)
                .cmp(&(&b.compartment_id, b.slot_index, b.booking_id))
        });
        Self { positions }
    }
}

/// Collapse a flat position list into aggregate quantities.
pub fn aggregate(positions: &[CargoPosition]) -> AggregateQuantities {
    let mut out = AggregateQuantities::new();
    for p in positions {
        *out.entry((p.booking_id, p.compartment_id.clone())).or_insert(0) += 1;
    }
    out
}

/// Expand aggregate quantities into a deterministic flat position list.
///
/// Slot indices pack from 0 per compartment, bookings in id order. Zero
/// quantities produce no positions.
pub fn expand(aggregates: &AggregateQuantities) -> Vec<CargoPosition> {
    // Regroup by compartment so slots pack densely per compartment.
    let mut by_compartment: BTreeMap<&CompartmentId, Vec<(&BookingId, u32)>> = BTreeMap::new();
    for ((booking, compartment), qty) in aggregates {
        by_compartment.entry(compartment).or_default().push((booking, *qty));
    }

    let mut out = Vec::new();
    for (compartment, mut entries) in by_compartment {
        entries.sort_by_key(|(booking, _)| **booking);
        let mut slot = 0u32;
        for (booking, qty) in entries {
            for _ in 0..qty {
                out.push(CargoPosition {
                    booking_id: *booking,
                    compartment_id: compartment.clone(),
                    slot_index: slot,
                });
                slot += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(s: &str) -> CompartmentId {
        CompartmentId::new(s).unwrap()
    }

    fn pos(booking: BookingId, compartment: &str, slot: u32) -> CargoPosition {
        CargoPosition {
            booking_id: booking,
            compartment_id: cid(compartment),
            slot_index: slot,
        }
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let b1 = BookingId::new();
        let b2 = BookingId::new();
        let result = PositionSet::from_positions(vec![pos(b1, "1A", 0), pos(b2, "1A", 0)]);
        assert!(matches!(result, Err(PlanError::DuplicateCell(_))));
    }

    #[test]
    fn test_aggregate_counts() {
        let b1 = BookingId::new();
        let b2 = BookingId::new();
        let set = PositionSet::from_positions(vec![
            pos(b1, "1A", 0),
            pos(b1, "1A", 1),
            pos(b2, "1A", 2),
            pos(b1, "1B", 0),
        ])
        .unwrap();
        let agg = set.aggregate();
        assert_eq!(agg[&(b1, cid("1A"))], 2);
        assert_eq!(agg[&(b2, cid("1A"))], 1);
        assert_eq!(agg[&(b1, cid("1B"))], 1);
    }

    #[test]
    fn test_expand_is_deterministic_and_packed() {
        let b1 = BookingId::new();
        let b2 = BookingId::new();
        let mut agg = AggregateQuantities::new();
        agg.insert((b1, cid("1A")), 2);
        agg.insert((b2, cid("1A")), 1);

        let flat = expand(&agg);
        assert_eq!(flat.len(), 3);
        // Slots pack 0..3 within the compartment.
        let slots: Vec<u32> = flat.iter().map(|p| p.slot_index).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        // Deterministic: same input, same output.
        assert_eq!(flat, expand(&agg));
    }

    #[test]
    fn test_roundtrip_aggregate_expand_aggregate() {
        let b1 = BookingId::new();
        let b2 = BookingId::new();
        // Sparse, unordered slots as painted by hand.
        let set = PositionSet::from_positions(vec![
            pos(b1, "1A", 7),
            pos(b2, "1A", 3),
            pos(b1, "2B", 0),
            pos(b1, "1A", 12),
        ])
        .unwrap();
        let agg = set.aggregate();
        let reexpanded = expand(&agg);
        assert_eq!(aggregate(&reexpanded), agg);
    }

    #[test]
    fn test_expand_skips_zero_quantities() {
        let b1 = BookingId::new();
        let mut agg = AggregateQuantities::new();
        agg.insert((b1, cid("1A")), 0);
        assert!(expand(&agg).is_empty());
    }

    #[test]
    fn test_occupant_lookup() {
        let b1 = BookingId::new();
        let set = PositionSet::from_positions(vec![pos(b1, "1A", 4)]).unwrap();
        assert_eq!(
            set.occupant(&CellRef {
                compartment_id: cid("1A"),
                slot_index: 4
            }),
            Some(b1)
        );
        assert_eq!(
            set.occupant(&CellRef {
                compartment_id: cid("1A"),
                slot_index: 5
            }),
            None
        );
    }

    #[test]
    fn test_quantity_helpers() {
        let b1 = BookingId::new();
        let b2 = BookingId::new();
        let set = PositionSet::from_positions(vec![
            pos(b1, "1A", 0),
            pos(b1, "1B", 0),
            pos(b2, "1B", 1),
        ])
        .unwrap();
        assert_eq!(set.quantity_for_booking(&b1), 2);
        assert_eq!(set.quantity_in_compartment(&cid("1B")), 2);
        assert_eq!(set.bookings_in_compartment(&cid("1B")).len(), 2);
    }
}
