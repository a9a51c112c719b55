//! # Preliminary Stability Estimator
//!
//! Aggregates placed cargo weight and stow positions with the vessel's
//! lightship data into an approximate displacement, center of gravity,
//! GM, trim, list, and drafts.
//!
//! **Non-authoritative by contract.** The numbers come from hydrostatic
//! constants read at one representative draft and ignore free-surface
//! corrections, bunkers, and ballast. Every estimate carries
//! [`STABILITY_DISCLAIMER`] verbatim — surfacing an estimate without it
//! is a product defect, and the invariant is tested.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reefstow_core::BookingId;
use reefstow_model::{ResolvedBooking, VesselLayout};

use crate::position::PositionSet;

/// Fixed disclaimer attached to every stability estimate.
pub const STABILITY_DISCLAIMER: &str = "PRELIMINARY ESTIMATE ONLY. These values are computed from \
approximate hydrostatics for planning purposes and are not authoritative. The vessel's master must \
verify stability, trim, and drafts with the approved onboard loading computer before sailing.";

/// The preliminary stability snapshot of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityEstimate {
    /// Lightship plus all placed cargo, tonnes.
    pub displacement_t: f64,
    /// Longitudinal center of gravity, meters from midship.
    pub lcg_m: f64,
    /// Transverse center of gravity, meters from centerline.
    pub tcg_m: f64,
    /// Vertical center of gravity, meters above keel.
    pub vcg_m: f64,
    /// Metacentric height, meters.
    pub gm_m: f64,
    /// Trim, meters; positive by the stern.
    pub trim_m: f64,
    /// List, degrees; positive to starboard.
    pub list_deg: f64,
    /// Forward draft, meters.
    pub draft_fwd_m: f64,
    /// Aft draft, meters.
    pub draft_aft_m: f64,
    /// Mean draft, meters.
    pub draft_mean_m: f64,
    /// Whether every reference limit holds.
    pub within_limits: bool,
    /// One entry per exceeded limit.
    pub warnings: Vec<String>,
    /// Always [`STABILITY_DISCLAIMER`]. Serialized so every consumer of
    /// the snapshot carries it too.
    pub disclaimer: String,
}

/// Compute the preliminary estimate for the given placements.
///
/// Pallet weight comes from each booking's average pallet weight; stow
/// position from the compartment's (lcg, tcg, vcg). Pallets of bookings
/// missing from `resolved`, or in compartments missing from the layout,
/// contribute nothing — those show up as referential conflicts elsewhere.
pub fn estimate_stability(
    layout: &VesselLayout,
    snapshot: &PositionSet,
    resolved: &BTreeMap<BookingId, ResolvedBooking>,
) -> StabilityEstimate {
    let lightship = layout.lightship;
    let limits = layout.limits;

    let mut total_weight = lightship.weight_t;
    let mut moment_l = lightship.weight_t * lightship.lcg;
    let mut moment_t = lightship.weight_t * lightship.tcg;
    let mut moment_v = lightship.weight_t * lightship.vcg;
    let mut cargo_weight = 0.0;

    for position in snapshot.positions() {
        let Some(compartment) = layout.compartment(&position.compartment_id) else {
            continue;
        };
        let Some(booking) = resolved.get(&position.booking_id) else {
            continue;
        };
        let w = booking.weight_per_pallet_t;
        cargo_weight += w;
        total_weight += w;
        moment_l += w * compartment.lcg;
        moment_t += w * compartment.tcg;
        moment_v += w * compartment.vcg;
    }

    let lcg = moment_l / total_weight;
    let tcg = moment_t / total_weight;
    let vcg = moment_v / total_weight;

    let gm = limits.km_m - vcg;

    // Trim from the longitudinal lever against MCT; centimeters to meters.
    let trim_m = total_weight * (lcg - limits.lcb_m) / (limits.mct_tm_per_cm * 100.0);

    // Parallel sinkage over lightship draft from TPC.
    let draft_mean = limits.lightship_draft_m + cargo_weight / (limits.tpc_t_per_cm * 100.0);
    let draft_fwd = draft_mean - trim_m / 2.0;
    let draft_aft = draft_mean + trim_m / 2.0;

    // List only has meaning with positive GM; a non-positive GM is its
    // own warning below.
    let list_deg = if gm > 0.0 {
        (tcg / gm).atan().to_degrees()
    } else {
        0.0
    };

    let mut warnings = Vec::new();
    if gm < limits.min_gm {
        warnings.push(format!(
            "GM {:.2} m below minimum {:.2} m",
            gm, limits.min_gm
        ));
    }
    if gm > limits.max_gm {
        warnings.push(format!(
            "GM {:.2} m above maximum {:.2} m (stiff ship)",
            gm, limits.max_gm
        ));
    }
    if trim_m.abs() > limits.max_trim_m {
        warnings.push(format!(
            "trim {:.2} m exceeds limit {:.2} m",
            trim_m, limits.max_trim_m
        ));
    }
    if list_deg.abs() > limits.max_list_deg {
        warnings.push(format!(
            "list {:.1}\u{00B0} exceeds limit {:.1}\u{00B0}",
            list_deg, limits.max_list_deg
        ));
    }
    let deepest = draft_fwd.max(draft_aft);
    if deepest > limits.max_draft_m {
        warnings.push(format!(
            "draft {:.2} m exceeds maximum {:.2} m",
            deepest, limits.max_draft_m
        ));
    }

    StabilityEstimate {
        displacement_t: total_weight,
        lcg_m: lcg,
        tcg_m: tcg,
        vcg_m: vcg,
        gm_m: gm,
        trim_m,
        list_deg,
        draft_fwd_m: draft_fwd,
        draft_aft_m: draft_aft,
        draft_mean_m: draft_mean,
        within_limits: warnings.is_empty(),
        warnings,
        disclaimer: STABILITY_DISCLAIMER.to_string(),
    }
}
