//! # Confirmed Bookings
//!
//! A booking is one confirmed demand unit: so many pallets of one cargo
//! type from a load port to a discharge port. The sequence numbers stored
//! at booking time are display-only — resolution against the current
//! rotation happens per computation pass via [`Booking::resolve`].

use serde::{Deserialize, Serialize};

use reefstow_core::{BookingId, CargoType, PortCode, VoyageId};

use crate::error::ModelError;
use crate::voyage::EffectiveRotation;

/// One confirmed cargo booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// The voyage this booking is confirmed on.
    pub voyage_id: VoyageId,
    /// Cargo type, which fixes the temperature tolerance band.
    pub cargo_type: CargoType,
    /// Confirmed quantity in pallets.
    pub quantity_pallets: u32,
    /// Average weight per pallet, tonnes. Used by the stability estimator.
    pub weight_per_pallet_t: f64,
    /// Port of Loading.
    pub pol: PortCode,
    /// Port of Discharge.
    pub pod: PortCode,
    /// POL sequence captured at booking time. Display-only; never used
    /// for ordering decisions.
    pub pol_sequence_at_booking: Option<u32>,
    /// POD sequence captured at booking time. Display-only.
    pub pod_sequence_at_booking: Option<u32>,
}

/// A booking with POL/POD resolved against the current effective rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedBooking {
    /// The booking identifier.
    pub booking_id: BookingId,
    /// Cargo type.
    pub cargo_type: CargoType,
    /// Confirmed quantity in pallets.
    pub quantity_pallets: u32,
    /// Weight per pallet, tonnes.
    pub weight_per_pallet_t: f64,
    /// Current effective sequence of the load call.
    pub pol_sequence: u32,
    /// Current effective sequence of the discharge call.
    pub pod_sequence: u32,
}

impl Booking {
    /// Resolve POL/POD against the given effective rotation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Booking`] when either port no longer resolves
    /// (call cancelled or removed since booking), when the resolved call
    /// does not perform the required operation, or when loading would not
    /// precede discharge in the current rotation. Callers surface these as
    /// referential conflicts on the plan rather than failing the whole
    /// recompute pass.
    pub fn resolve(&self, rotation: &EffectiveRotation) -> Result<ResolvedBooking, ModelError> {
        let pol = rotation.resolve(&self.pol).ok_or_else(|| {
            ModelError::Booking(format!(
                "booking {}: POL {} is not in the current rotation",
                self.id, self.pol
            ))
        })?;
        let pod = rotation.resolve(&self.pod).ok_or_else(|| {
            ModelError::Booking(format!(
                "booking {}: POD {} is not in the current rotation",
                self.id, self.pod
            ))
        })?;
        if !pol.load {
            return Err(ModelError::Booking(format!(
                "booking {}: POL {} performs no LOAD operation",
                self.id, self.pol
            )));
        }
        if !pod.discharge {
            return Err(ModelError::Booking(format!(
                "booking {}: POD {} performs no DISCHARGE operation",
                self.id, self.pod
            )));
        }
        if pol.sequence >= pod.sequence {
            return Err(ModelError::Booking(format!(
                "booking {}: POL {} (seq {}) does not precede POD {} (seq {})",
                self.id, self.pol, pol.sequence, self.pod, pod.sequence
            )));
        }
        Ok(ResolvedBooking {
            booking_id: self.id,
            cargo_type: self.cargo_type,
            quantity_pallets: self.quantity_pallets,
            weight_per_pallet_t: self.weight_per_pallet_t,
            pol_sequence: pol.sequence,
            pod_sequence: pod.sequence,
        })
    }
}
