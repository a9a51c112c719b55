//! # Vessel Compartment Model
//!
//! Static description of a vessel's stowage space: holds numbered bow to
//! stern, each hold a stack of compartments (levels) from deck to keel,
//! each compartment wired to exactly one cooling section.
//!
//! ## Invariants (checked at construction)
//!
//! - Every compartment belongs to exactly one cooling section.
//! - Every cooling section belongs to exactly one hold; its member
//!   compartments all sit in that hold. Cross-level sections are normal,
//!   cross-hold sections do not exist in this model.
//! - Hold and section membership lists agree with the compartments'
//!   back-references.
//!
//! A `VesselLayout` that constructed successfully can be trusted by every
//! downstream detector; none of them re-validate structure.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use reefstow_core::{CompartmentId, CoolingSectionId, VesselId};

use crate::error::ModelError;

/// Compartment level within a hold, ordered deck to keel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// Upper 'tween deck, directly under the hatch.
    Upd,
    /// A deck.
    A,
    /// B deck.
    B,
    /// C deck.
    C,
    /// D deck, deepest level.
    D,
}

impl Level {
    /// Depth rank: 0 at the hatch, increasing toward the keel.
    ///
    /// Accessing a compartment requires clearing every compartment with a
    /// strictly smaller rank in the same hold — the overstow detector's
    /// vertical ordering.
    pub fn depth_rank(&self) -> u8 {
        match self {
            Self::Upd => 0,
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Upd => "UPD",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(s)
    }
}

/// One physical stowage compartment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compartment {
    /// Compartment code from the capacity plan (e.g., `1A`).
    pub id: CompartmentId,
    /// Owning hold number, 1-based from the bow.
    pub hold_no: u8,
    /// Level within the hold.
    pub level: Level,
    /// Back-reference to the one cooling section this compartment is in.
    pub cooling_section: CoolingSectionId,
    /// Nominal capacity in pallets.
    pub pallet_capacity: u32,
    /// Floor area in square meters.
    pub floor_area_m2: f64,
    /// Design stowage factor, pallets per m².
    pub design_stowage_factor: f64,
    /// Stowage factor realized on past voyages, when recorded.
    pub historical_stowage_factor: Option<f64>,
    /// Longitudinal center of the stow position, meters from midship
    /// (positive forward).
    pub lcg: f64,
    /// Transverse center, meters from centerline (positive starboard).
    pub tcg: f64,
    /// Vertical center, meters above keel.
    pub vcg: f64,
}

impl Compartment {
    /// Realistic capacity estimate in pallets.
    ///
    /// Prefers the historical stowage factor over the design factor; falls
    /// back to the nominal pallet capacity when the floor area is unusable
    /// (zero or negative, seen on legacy capacity plans for trunked spaces).
    pub fn effective_capacity(&self) -> u32 {
        if self.floor_area_m2 <= 0.0 {
            return self.pallet_capacity;
        }
        let factor = self
            .historical_stowage_factor
            .unwrap_or(self.design_stowage_factor);
        if factor <= 0.0 {
            return self.pallet_capacity;
        }
        (factor * self.floor_area_m2).floor() as u32
    }
}

/// A group of compartments sharing one refrigeration unit — and therefore
/// one carriage temperature for the whole voyage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoolingSection {
    /// Section code (e.g., `ZONE_1AB`).
    pub id: CoolingSectionId,
    /// The one hold this section's compartments sit in.
    pub hold_no: u8,
    /// Member compartments.
    pub compartment_ids: Vec<CompartmentId>,
}

/// A hold: an ordered stack of compartments served by one hatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    /// Hold number, 1-based from the bow.
    pub number: u8,
    /// Member compartments, in capacity-plan order.
    pub compartment_ids: Vec<CompartmentId>,
}

/// Lightship reference data: the empty vessel's weight and centers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lightship {
    /// Lightship weight in tonnes.
    pub weight_t: f64,
    /// Longitudinal center of gravity, meters from midship.
    pub lcg: f64,
    /// Transverse center of gravity, meters from centerline.
    pub tcg: f64,
    /// Vertical center of gravity, meters above keel.
    pub vcg: f64,
}

/// Stability reference limits and the hydrostatic constants the
/// preliminary estimator needs.
///
/// These are approximations read off the vessel's hydrostatic tables at a
/// representative loaded draft. The estimator that consumes them is
/// explicitly non-authoritative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StabilityLimits {
    /// Minimum acceptable metacentric height, meters.
    pub min_gm: f64,
    /// Maximum acceptable metacentric height, meters (stiff-ship limit).
    pub max_gm: f64,
    /// Maximum acceptable trim, meters (absolute).
    pub max_trim_m: f64,
    /// Maximum acceptable list, degrees (absolute).
    pub max_list_deg: f64,
    /// Maximum draft, meters.
    pub max_draft_m: f64,
    /// Transverse metacenter above keel, meters.
    pub km_m: f64,
    /// Longitudinal center of buoyancy, meters from midship.
    pub lcb_m: f64,
    /// Moment to change trim one centimeter, tonne-meters.
    pub mct_tm_per_cm: f64,
    /// Tonnes per centimeter immersion.
    pub tpc_t_per_cm: f64,
    /// Lightship mean draft, meters.
    pub lightship_draft_m: f64,
}

/// The complete, validated compartment layout of one vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselLayout {
    /// Vessel identifier.
    pub vessel_id: VesselId,
    /// Vessel name.
    pub name: String,
    /// Holds, bow to stern.
    pub holds: Vec<Hold>,
    /// All compartments, keyed by code. BTreeMap keeps iteration
    /// deterministic across recompute passes.
    pub compartments: BTreeMap<CompartmentId, Compartment>,
    /// All cooling sections, keyed by code.
    pub cooling_sections: BTreeMap<CoolingSectionId, CoolingSection>,
    /// Lightship reference data.
    pub lightship: Lightship,
    /// Stability limits and hydrostatic constants.
    pub limits: StabilityLimits,
}

impl VesselLayout {
    /// Assemble and validate a layout.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Layout`] on any structural violation:
    /// duplicate compartments, a compartment referencing a missing or
    /// cross-hold section, or membership lists disagreeing with
    /// back-references.
    pub fn new(
        vessel_id: VesselId,
        name: impl Into<String>,
        holds: Vec<Hold>,
        compartments: Vec<Compartment>,
        cooling_sections: Vec<CoolingSection>,
        lightship: Lightship,
        limits: StabilityLimits,
    ) -> Result<Self, ModelError> {
        let mut compartment_map = BTreeMap::new();
        for c in compartments {
            let id = c.id.clone();
            if compartment_map.insert(id.clone(), c).is_some() {
                return Err(ModelError::Layout(format!("duplicate compartment {id}")));
            }
        }

        let mut section_map = BTreeMap::new();
        for s in cooling_sections {
            let id = s.id.clone();
            if section_map.insert(id.clone(), s).is_some() {
                return Err(ModelError::Layout(format!("duplicate cooling section {id}")));
            }
        }

        let layout = Self {
            vessel_id,
            name: name.into(),
            holds,
            compartments: compartment_map,
            cooling_sections: section_map,
            lightship,
            limits,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Re-run the structural checks, for layouts deserialized from a
    /// snapshot rather than assembled through [`VesselLayout::new`].
    pub fn validate(&self) -> Result<(), ModelError> {
        // The stability estimator divides by these; a zero here would
        // turn the whole estimate into NaN.
        if self.lightship.weight_t <= 0.0 {
            return Err(ModelError::Layout(format!(
                "lightship weight must be positive, got {}",
                self.lightship.weight_t
            )));
        }
        if self.limits.mct_tm_per_cm <= 0.0 {
            return Err(ModelError::Layout(format!(
                "MCT must be positive, got {}",
                self.limits.mct_tm_per_cm
            )));
        }
        if self.limits.tpc_t_per_cm <= 0.0 {
            return Err(ModelError::Layout(format!(
                "TPC must be positive, got {}",
                self.limits.tpc_t_per_cm
            )));
        }

        let hold_numbers: HashSet<u8> = self.holds.iter().map(|h| h.number).collect();
        if hold_numbers.len() != self.holds.len() {
            return Err(ModelError::Layout("duplicate hold number".into()));
        }

        for (id, c) in &self.compartments {
            if !hold_numbers.contains(&c.hold_no) {
                return Err(ModelError::Layout(format!(
                    "compartment {id} references missing hold {}",
                    c.hold_no
                )));
            }
            let section = self.cooling_sections.get(&c.cooling_section).ok_or_else(|| {
                ModelError::Layout(format!(
                    "compartment {id} references missing cooling section {}",
                    c.cooling_section
                ))
            })?;
            if section.hold_no != c.hold_no {
                return Err(ModelError::Layout(format!(
                    "compartment {id} in hold {} belongs to section {} in hold {} (cross-hold sections are not modeled)",
                    c.hold_no, section.id, section.hold_no
                )));
            }
            if !section.compartment_ids.contains(id) {
                return Err(ModelError::Layout(format!(
                    "section {} does not list its member compartment {id}",
                    section.id
                )));
            }
        }

        for (sid, section) in &self.cooling_sections {
            for cid in &section.compartment_ids {
                let member = self.compartments.get(cid).ok_or_else(|| {
                    ModelError::Layout(format!("section {sid} lists missing compartment {cid}"))
                })?;
                if member.cooling_section != *sid {
                    return Err(ModelError::Layout(format!(
                        "compartment {cid} back-references {} but is listed in {sid}",
                        member.cooling_section
                    )));
                }
            }
            if section.compartment_ids.is_empty() {
                return Err(ModelError::Layout(format!("section {sid} has no compartments")));
            }
        }

        for hold in &self.holds {
            for cid in &hold.compartment_ids {
                let member = self.compartments.get(cid).ok_or_else(|| {
                    ModelError::Layout(format!(
                        "hold {} lists missing compartment {cid}",
                        hold.number
                    ))
                })?;
                if member.hold_no != hold.number {
                    return Err(ModelError::Layout(format!(
                        "compartment {cid} back-references hold {} but is listed in hold {}",
                        member.hold_no, hold.number
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up a compartment by code.
    pub fn compartment(&self, id: &CompartmentId) -> Option<&Compartment> {
        self.compartments.get(id)
    }

    /// Look up a cooling section by code.
    pub fn section(&self, id: &CoolingSectionId) -> Option<&CoolingSection> {
        self.cooling_sections.get(id)
    }

    /// The cooling section a compartment belongs to.
    pub fn section_of(&self, id: &CompartmentId) -> Option<&CoolingSection> {
        self.compartments
            .get(id)
            .and_then(|c| self.cooling_sections.get(&c.cooling_section))
    }

    /// Member compartments of a cooling section.
    pub fn compartments_in_section<'a>(
        &'a self,
        section: &CoolingSectionId,
    ) -> impl Iterator<Item = &'a Compartment> + 'a {
        let section = section.clone();
        self.compartments
            .values()
            .filter(move |c| c.cooling_section == section)
    }

    /// Compartments of one hold ordered top to bottom (hatch to keel).
    ///
    /// This is the scan order of the overstow detector.
    pub fn compartments_in_hold_by_depth(&self, hold_no: u8) -> Vec<&Compartment> {
        let mut out: Vec<&Compartment> = self
            .compartments
            .values()
            .filter(|c| c.hold_no == hold_no)
            .collect();
        out.sort_by_key(|c| (c.level.depth_rank(), c.id.clone()));
        out
    }

    /// Hold numbers present in the layout, ascending.
    pub fn hold_numbers(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = self.holds.iter().map(|h| h.number).collect();
        numbers.sort_unstable();
        numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(s: &str) -> CompartmentId {
        CompartmentId::new(s).unwrap()
    }

    fn sid(s: &str) -> CoolingSectionId {
        CoolingSectionId::new(s).unwrap()
    }

    fn compartment(id: &str, hold: u8, level: Level, section: &str) -> Compartment {
        Compartment {
            id: cid(id),
            hold_no: hold,
            level,
            cooling_section: sid(section),
            pallet_capacity: 120,
            floor_area_m2: 200.0,
            design_stowage_factor: 0.6,
            historical_stowage_factor: None,
            lcg: 10.0,
            tcg: 0.0,
            vcg: 6.0,
        }
    }

    fn lightship() -> Lightship {
        Lightship {
            weight_t: 6500.0,
            lcg: -2.0,
            tcg: 0.0,
            vcg: 7.8,
        }
    }

    fn limits() -> StabilityLimits {
        StabilityLimits {
            min_gm: 0.5,
            max_gm: 3.0,
            max_trim_m: 2.0,
            max_list_deg: 3.0,
            max_draft_m: 9.0,
            km_m: 9.2,
            lcb_m: -1.0,
            mct_tm_per_cm: 110.0,
            tpc_t_per_cm: 18.0,
            lightship_draft_m: 4.2,
        }
    }

    fn small_layout() -> VesselLayout {
        VesselLayout::new(
            VesselId::new(),
            "ALBATROSS BAY",
            vec![Hold {
                number: 1,
                compartment_ids: vec![cid("1A"), cid("1B")],
            }],
            vec![
                compartment("1A", 1, Level::A, "ZONE_1AB"),
                compartment("1B", 1, Level::B, "ZONE_1AB"),
            ],
            vec![CoolingSection {
                id: sid("ZONE_1AB"),
                hold_no: 1,
                compartment_ids: vec![cid("1A"), cid("1B")],
            }],
            lightship(),
            limits(),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_layout_constructs() {
        let layout = small_layout();
        assert_eq!(layout.compartments.len(), 2);
        assert_eq!(layout.section_of(&cid("1A")).unwrap().id, sid("ZONE_1AB"));
    }

    #[test]
    fn test_cross_hold_section_rejected() {
        let result = VesselLayout::new(
            VesselId::new(),
            "ALBATROSS BAY",
            vec![
                Hold {
                    number: 1,
                    compartment_ids: vec![cid("1A")],
                },
                Hold {
                    number: 2,
                    compartment_ids: vec![cid("2A")],
                },
            ],
            vec![
                compartment("1A", 1, Level::A, "ZONE_X"),
                // 2A sits in hold 2, but ZONE_X claims hold 1.
                compartment("2A", 2, Level::A, "ZONE_X"),
            ],
            vec![CoolingSection {
                id: sid("ZONE_X"),
                hold_no: 1,
                compartment_ids: vec![cid("1A"), cid("2A")],
            }],
            lightship(),
            limits(),
        );
        assert!(matches!(result, Err(ModelError::Layout(_))));
    }

    #[test]
    fn test_missing_section_rejected() {
        let result = VesselLayout::new(
            VesselId::new(),
            "ALBATROSS BAY",
            vec![Hold {
                number: 1,
                compartment_ids: vec![cid("1A")],
            }],
            vec![compartment("1A", 1, Level::A, "ZONE_GONE")],
            vec![],
            lightship(),
            limits(),
        );
        assert!(matches!(result, Err(ModelError::Layout(_))));
    }

    #[test]
    fn test_section_membership_must_be_bidirectional() {
        let result = VesselLayout::new(
            VesselId::new(),
            "ALBATROSS BAY",
            vec![Hold {
                number: 1,
                compartment_ids: vec![cid("1A"), cid("1B")],
            }],
            vec![
                compartment("1A", 1, Level::A, "ZONE_1AB"),
                compartment("1B", 1, Level::B, "ZONE_1AB"),
            ],
            vec![CoolingSection {
                id: sid("ZONE_1AB"),
                hold_no: 1,
                // 1B is missing from the membership list.
                compartment_ids: vec![cid("1A")],
            }],
            lightship(),
            limits(),
        );
        assert!(matches!(result, Err(ModelError::Layout(_))));
    }

    #[test]
    fn test_compartments_in_section() {
        let layout = small_layout();
        let members: Vec<_> = layout
            .compartments_in_section(&sid("ZONE_1AB"))
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(members, vec![cid("1A"), cid("1B")]);
        assert_eq!(layout.compartments_in_section(&sid("ZONE_9X")).count(), 0);
    }

    #[test]
    fn test_zero_lightship_weight_rejected() {
        let mut layout = small_layout();
        layout.lightship.weight_t = 0.0;
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("lightship weight"));
    }

    #[test]
    fn test_non_positive_hydrostatics_rejected() {
        let mut layout = small_layout();
        layout.limits.mct_tm_per_cm = 0.0;
        assert!(matches!(layout.validate(), Err(ModelError::Layout(_))));

        let mut layout = small_layout();
        layout.limits.tpc_t_per_cm = -1.0;
        assert!(matches!(layout.validate(), Err(ModelError::Layout(_))));
    }

    #[test]
    fn test_depth_order() {
        let layout = small_layout();
        let stack = layout.compartments_in_hold_by_depth(1);
        assert_eq!(stack[0].id, cid("1A"));
        assert_eq!(stack[1].id, cid("1B"));
        assert!(stack[0].level.depth_rank() < stack[1].level.depth_rank());
    }

    #[test]
    fn test_effective_capacity_prefers_historical_factor() {
        let mut c = compartment("1A", 1, Level::A, "ZONE_1AB");
        assert_eq!(c.effective_capacity(), 120); // 0.6 * 200
        c.historical_stowage_factor = Some(0.55);
        assert_eq!(c.effective_capacity(), 110);
    }

    #[test]
    fn test_effective_capacity_falls_back_to_nominal() {
        let mut c = compartment("1A", 1, Level::A, "ZONE_1AB");
        c.floor_area_m2 = 0.0;
        assert_eq!(c.effective_capacity(), c.pallet_capacity);
    }
}
