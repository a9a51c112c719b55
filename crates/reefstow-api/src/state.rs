//! # Application State
//!
//! In-memory stores shared across route handlers, plus the per-plan
//! write serialization that keeps concurrent edits from trampling each
//! other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use reefstow_core::PlanId;
use reefstow_model::{
    InMemoryBookingRepository, InMemoryVesselRepository, InMemoryVoyageRepository,
};
use reefstow_plan::StowagePlan;

/// Shared application state passed to all route handlers.
///
/// Master data (vessels, voyages, bookings) sits behind `RwLock`ed
/// in-memory repositories; plans live in their own map. Every plan
/// mutation additionally takes that plan's entry in `plan_locks`, so a
/// full edit-recompute-writeback cycle runs single-writer per plan while
/// reads and edits of other plans proceed.
#[derive(Clone)]
pub struct AppState {
    pub vessels: Arc<RwLock<InMemoryVesselRepository>>,
    pub voyages: Arc<RwLock<InMemoryVoyageRepository>>,
    pub bookings: Arc<RwLock<InMemoryBookingRepository>>,
    pub plans: Arc<RwLock<HashMap<PlanId, StowagePlan>>>,
    plan_locks: Arc<Mutex<HashMap<PlanId, Arc<Mutex<()>>>>>,
}

impl AppState {
    /// Empty stores.
    pub fn new() -> Self {
        Self {
            vessels: Arc::new(RwLock::new(InMemoryVesselRepository::new())),
            voyages: Arc::new(RwLock::new(InMemoryVoyageRepository::new())),
            bookings: Arc::new(RwLock::new(InMemoryBookingRepository::new())),
            plans: Arc::new(RwLock::new(HashMap::new())),
            plan_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The write-serialization mutex for one plan.
    ///
    /// Entries are created on first use and live for the process; the
    /// plan population is bounded by the voyage schedule.
    pub fn plan_lock(&self, id: PlanId) -> Arc<Mutex<()>> {
        self.plan_locks.lock().entry(id).or_default().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
