//! # Repository Collaborator Boundary
//!
//! The planning engine reads master data through these traits as a single
//! snapshot before each computation pass. Persistence technology is the
//! collaborator's business; the in-memory implementations here back the
//! API, the CLI bundle loader, and tests.
//!
//! A failed read aborts the whole recompute pass (the plan keeps its
//! previous report, marked stale) — see the plan crate's recompute module.

use std::collections::HashMap;

use reefstow_core::{VesselId, VoyageId};

use crate::booking::Booking;
use crate::error::ModelError;
use crate::vessel::VesselLayout;
use crate::voyage::Voyage;

/// Read access to vessel compartment layouts.
pub trait VesselRepository {
    /// Fetch the layout snapshot for a vessel.
    fn vessel(&self, id: &VesselId) -> Result<VesselLayout, ModelError>;
}

/// Read access to voyages.
pub trait VoyageRepository {
    /// Fetch the voyage snapshot, port calls included.
    fn voyage(&self, id: &VoyageId) -> Result<Voyage, ModelError>;
}

/// Read access to confirmed bookings.
pub trait BookingRepository {
    /// Fetch every confirmed booking for a voyage.
    fn bookings_for_voyage(&self, id: &VoyageId) -> Result<Vec<Booking>, ModelError>;
}

/// In-memory vessel store.
#[derive(Debug, Default)]
pub struct InMemoryVesselRepository {
    vessels: HashMap<VesselId, VesselLayout>,
}

impl InMemoryVesselRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a layout.
    pub fn insert(&mut self, layout: VesselLayout) {
        self.vessels.insert(layout.vessel_id, layout);
    }
}

impl VesselRepository for InMemoryVesselRepository {
    fn vessel(&self, id: &VesselId) -> Result<VesselLayout, ModelError> {
        self.vessels.get(id).cloned().ok_or(ModelError::NotFound {
            kind: "vessel",
            id: id.to_string(),
        })
    }
}

/// In-memory voyage store.
#[derive(Debug, Default)]
pub struct InMemoryVoyageRepository {
    voyages: HashMap<VoyageId, Voyage>,
}

impl InMemoryVoyageRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a voyage.
    pub fn insert(&mut self, voyage: Voyage) {
        self.voyages.insert(voyage.id, voyage);
    }
}

impl VoyageRepository for InMemoryVoyageRepository {
    fn voyage(&self, id: &VoyageId) -> Result<Voyage, ModelError> {
        self.voyages.get(id).cloned().ok_or(ModelError::NotFound {
            kind: "voyage",
            id: id.to_string(),
        })
    }
}

/// In-memory booking store, grouped by voyage.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    by_voyage: HashMap<VoyageId, Vec<Booking>>,
}

impl InMemoryBookingRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a booking to its voyage.
    pub fn insert(&mut self, booking: Booking) {
        self.by_voyage
            .entry(booking.voyage_id)
            .or_default()
            .push(booking);
    }
}

impl BookingRepository for InMemoryBookingRepository {
    fn bookings_for_voyage(&self, id: &VoyageId) -> Result<Vec<Booking>, ModelError> {
        // An empty booking list is a valid snapshot, not a miss.
        Ok(self.by_voyage.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reefstow_core::{BookingId, CargoType, PortCode};

    #[test]
    fn test_vessel_miss_is_not_found() {
        let repo = InMemoryVesselRepository::new();
        let err = repo.vessel(&VesselId::new()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { kind: "vessel", .. }));
    }

    #[test]
    fn test_bookings_empty_voyage_is_ok() {
        let repo = InMemoryBookingRepository::new();
        assert!(repo.bookings_for_voyage(&VoyageId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_booking_grouping() {
        let mut repo = InMemoryBookingRepository::new();
        let voyage = VoyageId::new();
        for _ in 0..3 {
            repo.insert(Booking {
                id: BookingId::new(),
                voyage_id: voyage,
                cargo_type: CargoType::Citrus,
                quantity_pallets: 100,
                weight_per_pallet_t: 0.9,
                pol: PortCode::new("ZADUR").unwrap(),
                pod: PortCode::new("NLRTM").unwrap(),
                pol_sequence_at_booking: None,
                pod_sequence_at_booking: None,
            });
        }
        assert_eq!(repo.bookings_for_voyage(&voyage).unwrap().len(), 3);
    }
}
