//! # Placement Gestures — Paint and Move/Swap
//!
//! Two interaction models mutate the same position state, so both are
//! pure functions over an immutable [`PositionSet`] snapshot, committed
//! atomically at gesture end:
//!
//! - **Paint**: the planner selects one booking and paints pallets onto
//!   empty cells of a compartment. Painting a cell the same booking
//!   already occupies clears it (toggle-erase). Painting a cell occupied
//!   by a different booking does nothing — erasing other people's cargo
//!   is a move/swap, not a paint.
//! - **Move/Swap**: the planner grabs a placed pallet and drops it on an
//!   empty cell (relocation) or on another booking's pallet (full swap).
//!   Releasing outside any compartment, or back on the origin, cancels
//!   the gesture.
//!
//! The pending gesture is an explicit tagged value ([`GestureState`]),
//! not a set of mutable flags; [`GestureState::release`] is the single
//! commit point.
//!
//! Capacity is advisory: painting past a compartment's declared capacity
//! is recorded as a [`CapacityOverage`], never hard-blocked. Planners
//! overfill on purpose while shuffling a draft.

use serde::{Deserialize, Serialize};

use reefstow_core::{BookingId, CompartmentId};
use reefstow_model::VesselLayout;

use crate::position::{CargoPosition, PositionSet};

/// A single pallet cell: one slot of one compartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// The compartment.
    pub compartment_id: CompartmentId,
    /// The slot within the compartment.
    pub slot_index: u32,
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.compartment_id, self.slot_index)
    }
}

/// The pending interactive gesture, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureState {
    /// No gesture in progress.
    Idle,
    /// Painting pallets of one booking.
    Painting {
        /// The booking being painted.
        booking: BookingId,
    },
    /// Dragging a pallet picked up from `source`.
    Moving {
        /// The cell the pallet was grabbed from.
        source: CellRef,
    },
}

impl GestureState {
    /// Commit the gesture against `snapshot` at the release target.
    ///
    /// `target: None` means released outside any valid compartment — a
    /// cancelled gesture, returning the snapshot unchanged. The returned
    /// snapshot is the new committed state; the gesture itself ends
    /// regardless.
    pub fn release(&self, snapshot: &PositionSet, target: Option<&CellRef>) -> PositionSet {
        match (self, target) {
            (GestureState::Idle, _) | (_, None) => snapshot.clone(),
            (GestureState::Painting { booking }, Some(cell)) => {
                apply_paint(snapshot, cell, *booking)
            }
            (GestureState::Moving { source }, Some(dest)) => {
                apply_move_or_swap(snapshot, source, dest)
            }
        }
    }
}

/// Apply one paint stroke of `booking` at `cell`.
///
/// - Empty cell → pallet assigned.
/// - Cell occupied by the same booking → toggle-erase.
/// - Cell occupied by another booking → unchanged.
pub fn apply_paint(snapshot: &PositionSet, cell: &CellRef, booking: BookingId) -> PositionSet {
    match snapshot.occupant(cell) {
        None => {
            let mut positions = snapshot.positions().to_vec();
            positions.push(CargoPosition {
                booking_id: booking,
                compartment_id: cell.compartment_id.clone(),
                slot_index: cell.slot_index,
            });
            PositionSet::from_valid(positions)
        }
        Some(occupant) if occupant == booking => {
            let positions = snapshot
                .positions()
                .iter()
                .filter(|p| {
                    !(p.compartment_id == cell.compartment_id && p.slot_index == cell.slot_index)
                })
                .cloned()
                .collect();
            PositionSet::from_valid(positions)
        }
        Some(_) => snapshot.clone(),
    }
}

/// Apply a move (onto an empty cell) or a swap (onto an occupied cell).
///
/// No-ops: `source == dest`, or `source` empty (nothing was grabbed).
pub fn apply_move_or_swap(
    snapshot: &PositionSet,
    source: &CellRef,
    dest: &CellRef,
) -> PositionSet {
    if source == dest {
        return snapshot.clone();
    }
    let Some(moving) = snapshot.occupant(source) else {
        return snapshot.clone();
    };

    let mut positions: Vec<CargoPosition> = Vec::with_capacity(snapshot.len());
    for p in snapshot.positions() {
        let at_source = p.compartment_id == source.compartment_id && p.slot_index == source.slot_index;
        let at_dest = p.compartment_id == dest.compartment_id && p.slot_index == dest.slot_index;
        if at_source {
            // The grabbed pallet lands on the destination cell.
            positions.push(CargoPosition {
                booking_id: moving,
                compartment_id: dest.compartment_id.clone(),
                slot_index: dest.slot_index,
            });
        } else if at_dest {
            // The displaced pallet takes the vacated source cell.
            positions.push(CargoPosition {
                booking_id: p.booking_id,
                compartment_id: source.compartment_id.clone(),
                slot_index: source.slot_index,
            });
        } else {
            positions.push(p.clone());
        }
    }
    PositionSet::from_valid(positions)
}

/// A compartment filled past its declared pallet capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityOverage {
    /// The overfilled compartment.
    pub compartment_id: CompartmentId,
    /// Pallets currently placed.
    pub placed: u32,
    /// Declared pallet capacity.
    pub capacity: u32,
}

/// Advisory over-capacity scan across the whole snapshot.
///
/// Positions referencing compartments absent from the layout are skipped
/// here; the recompute pass reports them as referential conflicts.
pub fn capacity_overages(layout: &VesselLayout, snapshot: &PositionSet) -> Vec<CapacityOverage> {
    snapshot
        .occupied_compartments()
        .into_iter()
        .filter_map(|cid| {
            let compartment = layout.compartment(&cid)?;
            let placed = snapshot.quantity_in_compartment(&cid);
            (placed > compartment.pallet_capacity).then(|| CapacityOverage {
                compartment_id: cid,
                placed,
                capacity: compartment.pallet_capacity,
            })
        })
        .collect()
}
