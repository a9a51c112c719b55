//! # Voyage & Port Rotation
//!
//! A voyage is one pass of a vessel through a service's port rotation.
//! Port calls carry schedule times (ETA/ETD, actuals once known),
//! operations, and cancellation/lock flags.
//!
//! ## The effective rotation
//!
//! Calls are stored with the sequence numbers they were created with, but
//! schedule edits, cancellations, and resequencing change the real order
//! of operations. The *effective rotation* is derived fresh on demand:
//! active calls sorted by ETA ascending, renumbered from 1. Everything
//! that cares about discharge order — the overstow detector above all —
//! resolves port codes against the effective rotation at computation time
//! and never trusts a sequence number captured earlier.

use serde::{Deserialize, Serialize};

use reefstow_core::{PortCode, Timestamp, VesselId, VoyageId};

use crate::error::ModelError;

/// Cargo operation performed at a port call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortCallOp {
    /// Cargo is loaded at this call.
    Load,
    /// Cargo is discharged at this call.
    Discharge,
}

/// One scheduled call in a voyage's rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortCall {
    /// Sequence number assigned when the call was created. Display-only;
    /// superseded by the effective rotation.
    pub sequence: u32,
    /// UN/LOCODE of the port.
    pub port: PortCode,
    /// Estimated time of arrival.
    pub eta: Timestamp,
    /// Estimated time of departure.
    pub etd: Timestamp,
    /// Actual time of arrival, once recorded.
    pub ata: Option<Timestamp>,
    /// Actual time of departure, once recorded.
    pub atd: Option<Timestamp>,
    /// Operations performed at this call. A call may both load and
    /// discharge.
    pub operations: Vec<PortCallOp>,
    /// Cancelled calls sort last and resolve to no effective sequence.
    pub cancelled: bool,
    /// Locked calls reject schedule edits upstream; planning still reads
    /// them normally.
    pub locked: bool,
}

impl PortCall {
    /// Whether this call discharges cargo.
    pub fn is_discharge(&self) -> bool {
        self.operations.contains(&PortCallOp::Discharge)
    }

    /// Whether this call loads cargo.
    pub fn is_load(&self) -> bool {
        self.operations.contains(&PortCallOp::Load)
    }
}

/// One voyage of one vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voyage {
    /// Voyage identifier.
    pub id: VoyageId,
    /// The vessel performing the voyage.
    pub vessel_id: VesselId,
    /// Service code defining the rotation template (e.g., `ECSA-NWC`).
    pub service_code: String,
    /// Port calls as stored.
    pub port_calls: Vec<PortCall>,
}

/// One entry of the effective rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationEntry {
    /// Effective sequence number, 1-based.
    pub sequence: u32,
    /// Port code.
    pub port: PortCode,
    /// ETA used for ordering.
    pub eta: Timestamp,
    /// Whether cargo discharges at this call.
    pub discharge: bool,
    /// Whether cargo loads at this call.
    pub load: bool,
}

/// The freshly derived rotation of a voyage: active calls by ETA
/// ascending, renumbered from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRotation {
    entries: Vec<RotationEntry>,
}

impl EffectiveRotation {
    /// The ordered entries.
    pub fn entries(&self) -> &[RotationEntry] {
        &self.entries
    }

    /// Resolve a port code to its current effective sequence number.
    ///
    /// A port appearing more than once in the rotation resolves to its
    /// first (earliest-ETA) call. Returns `None` for ports whose calls
    /// are all cancelled or absent — the caller surfaces that as a
    /// referential conflict, never as a silent mis-sort.
    pub fn resolve(&self, port: &PortCode) -> Option<&RotationEntry> {
        self.entries.iter().find(|e| e.port == *port)
    }

    /// Discharge calls in effective order.
    pub fn discharge_calls(&self) -> impl Iterator<Item = &RotationEntry> {
        self.entries.iter().filter(|e| e.discharge)
    }
}

impl Voyage {
    /// Derive the effective rotation (see module docs).
    ///
    /// Ties on ETA break by stored sequence so the result is total and
    /// deterministic.
    pub fn effective_rotation(&self) -> EffectiveRotation {
        let mut active: Vec<&PortCall> =
            self.port_calls.iter().filter(|c| !c.cancelled).collect();
        active.sort_by_key(|c| (c.eta, c.sequence));

        let entries = active
            .iter()
            .enumerate()
            .map(|(i, call)| RotationEntry {
                sequence: (i + 1) as u32,
                port: call.port.clone(),
                eta: call.eta,
                discharge: call.is_discharge(),
                load: call.is_load(),
            })
            .collect();
        EffectiveRotation { entries }
    }

    /// Structural checks run when a voyage snapshot is loaded: at least
    /// one active call, no zero-operation calls.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.port_calls.iter().all(|c| c.cancelled) {
            return Err(ModelError::Rotation(
                "voyage has no active port calls".into(),
            ));
        }
        for call in &self.port_calls {
            if call.operations.is_empty() {
                return Err(ModelError::Rotation(format!(
                    "port call {} ({}) has no operations",
                    call.sequence, call.port
                )));
            }
            if call.etd < call.eta {
                return Err(ModelError::Rotation(format!(
                    "port call {} ({}) departs before it arrives",
                    call.sequence, call.port
                )));
            }
        }
        Ok(())
    }
}
