//! # Cargo Carriage Table — Single Source of Truth
//!
//! Defines the `CargoType` enum with every reefer commodity the fleet
//! carries, each with its standard carriage temperature and acceptance
//! tolerance band. This is the ONE definition used across the stack: the
//! cooling-section allocator, the placement engine, and the API all match
//! on it exhaustively, so adding a commodity forces every consumer to
//! handle its temperatures at compile time.
//!
//! The table is a domain constant. Carriage temperatures come from the
//! carrier's cargo-care manual, not from user input.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// A temperature in degrees Celsius.
///
/// Newtype so set-points cannot be confused with weights or coordinates.
/// Comparisons go through [`Celsius::value`] or [`TemperatureBand`]; the
/// type deliberately implements no arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Celsius(pub f64);

impl Celsius {
    /// The raw degrees value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Celsius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}\u{00B0}C", self.0)
    }
}

/// An inclusive acceptance band for a cargo type's carriage temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBand {
    /// Lowest acceptable carriage temperature.
    pub min: Celsius,
    /// Highest acceptable carriage temperature.
    pub max: Celsius,
}

impl TemperatureBand {
    /// Construct a band; `min` must not exceed `max`.
    pub fn new(min: Celsius, max: Celsius) -> Result<Self, CoreError> {
        if min.0 > max.0 {
            return Err(CoreError::Validation(format!(
                "temperature band min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Whether `t` lies within the band (inclusive at both ends).
    pub fn contains(&self, t: Celsius) -> bool {
        self.min.0 <= t.0 && t.0 <= self.max.0
    }

    /// Intersection of two bands, or `None` when they do not overlap.
    ///
    /// Multiple cargo types may share a cooling section only when the
    /// section's set-point lies in the intersection of all their bands —
    /// this is a set operation, not a pairwise heuristic.
    pub fn intersect(&self, other: &TemperatureBand) -> Option<TemperatureBand> {
        let min = Celsius(self.min.0.max(other.min.0));
        let max = Celsius(self.max.0.min(other.max.0));
        (min.0 <= max.0).then_some(TemperatureBand { min, max })
    }
}

impl std::fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// All reefer cargo types in the carriage table.
///
/// | Type | Carriage | Band |
/// |------|----------|------|
/// | Bananas | 13.3°C | 12.8 .. 14.5 |
/// | FrozenFish | −18.0°C | −25.0 .. −15.0 |
/// | TableGrapes | −1.0°C | −1.5 .. 0.5 |
/// | Citrus | 4.5°C | 3.0 .. 8.0 |
/// | DeciduousFruit | −0.5°C | −1.0 .. 1.5 |
/// | FrozenMeat | −20.0°C | −25.0 .. −18.0 |
/// | Pineapples | 8.0°C | 7.0 .. 10.0 |
/// | GeneralReefer | 2.0°C | 0.0 .. 6.0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoType {
    /// Green bananas, the backbone trade. Chilling injury below 12.8°C.
    Bananas,
    /// Frozen fish (tuna, hake). Hard-frozen carriage.
    FrozenFish,
    /// Table grapes, carried just below freezing under SO2 pads.
    TableGrapes,
    /// Citrus (oranges, lemons); cold-treatment protocols vary by trade.
    Citrus,
    /// Deciduous fruit (apples, pears).
    DeciduousFruit,
    /// Frozen meat quarters and cartons.
    FrozenMeat,
    /// Pineapples; sensitive to chilling below 7°C.
    Pineapples,
    /// Mixed reefer groupage without a dedicated protocol.
    GeneralReefer,
}

/// Total number of cargo types in the carriage table.
pub const CARGO_TYPE_COUNT: usize = 8;

impl CargoType {
    /// Returns all cargo types in canonical order.
    pub fn all() -> &'static [CargoType] {
        &[
            Self::Bananas,
            Self::FrozenFish,
            Self::TableGrapes,
            Self::Citrus,
            Self::DeciduousFruit,
            Self::FrozenMeat,
            Self::Pineapples,
            Self::GeneralReefer,
        ]
    }

    /// The standard carriage set-point for this cargo type.
    ///
    /// Planners inherit this as the default section temperature when the
    /// cargo type dominates a cooling section.
    pub fn carriage_temperature(&self) -> Celsius {
        match self {
            Self::Bananas => Celsius(13.3),
            Self::FrozenFish => Celsius(-18.0),
            Self::TableGrapes => Celsius(-1.0),
            Self::Citrus => Celsius(4.5),
            Self::DeciduousFruit => Celsius(-0.5),
            Self::FrozenMeat => Celsius(-20.0),
            Self::Pineapples => Celsius(8.0),
            Self::GeneralReefer => Celsius(2.0),
        }
    }

    /// The inclusive acceptance band for this cargo type.
    ///
    /// A section set-point outside this band is a temperature conflict for
    /// every placement of this cargo type within the section.
    pub fn tolerance_band(&self) -> TemperatureBand {
        let (min, max) = match self {
            Self::Bananas => (12.8, 14.5),
            Self::FrozenFish => (-25.0, -15.0),
            Self::TableGrapes => (-1.5, 0.5),
            Self::Citrus => (3.0, 8.0),
            Self::DeciduousFruit => (-1.0, 1.5),
            Self::FrozenMeat => (-25.0, -18.0),
            Self::Pineapples => (7.0, 10.0),
            Self::GeneralReefer => (0.0, 6.0),
        };
        TemperatureBand {
            min: Celsius(min),
            max: Celsius(max),
        }
    }

    /// Returns the snake_case string identifier for this cargo type.
    ///
    /// Must match the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bananas => "bananas",
            Self::FrozenFish => "frozen_fish",
            Self::TableGrapes => "table_grapes",
            Self::Citrus => "citrus",
            Self::DeciduousFruit => "deciduous_fruit",
            Self::FrozenMeat => "frozen_meat",
            Self::Pineapples => "pineapples",
            Self::GeneralReefer => "general_reefer",
        }
    }
}

impl std::fmt::Display for CargoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CargoType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bananas" => Ok(Self::Bananas),
            "frozen_fish" => Ok(Self::FrozenFish),
            "table_grapes" => Ok(Self::TableGrapes),
            "citrus" => Ok(Self::Citrus),
            "deciduous_fruit" => Ok(Self::DeciduousFruit),
            "frozen_meat" => Ok(Self::FrozenMeat),
            "pineapples" => Ok(Self::Pineapples),
            "general_reefer" => Ok(Self::GeneralReefer),
            other => Err(CoreError::UnknownCargoType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_count() {
        assert_eq!(CargoType::all().len(), CARGO_TYPE_COUNT);
    }

    #[test]
    fn test_carriage_temperature_within_band() {
        // The default set-point must always be an acceptable set-point.
        for cargo in CargoType::all() {
            let band = cargo.tolerance_band();
            assert!(
                band.contains(cargo.carriage_temperature()),
                "{cargo}: carriage temperature outside its own band"
            );
        }
    }

    #[test]
    fn test_band_contains_inclusive() {
        let band = CargoType::FrozenFish.tolerance_band();
        assert!(band.contains(Celsius(-25.0)));
        assert!(band.contains(Celsius(-15.0)));
        assert!(!band.contains(Celsius(-14.9)));
        assert!(!band.contains(Celsius(13.3)));
    }

    #[test]
    fn test_band_intersection() {
        let grapes = CargoType::TableGrapes.tolerance_band();
        let deciduous = CargoType::DeciduousFruit.tolerance_band();
        let overlap = grapes.intersect(&deciduous).unwrap();
        assert_eq!(overlap.min.0, -1.0);
        assert_eq!(overlap.max.0, 0.5);
    }

    #[test]
    fn test_band_no_intersection() {
        let bananas = CargoType::Bananas.tolerance_band();
        let fish = CargoType::FrozenFish.tolerance_band();
        assert!(bananas.intersect(&fish).is_none());
    }

    #[test]
    fn test_band_rejects_inverted() {
        assert!(TemperatureBand::new(Celsius(5.0), Celsius(-5.0)).is_err());
    }

    #[test]
    fn test_as_str_roundtrip() {
        for cargo in CargoType::all() {
            let parsed: CargoType = cargo.as_str().parse().unwrap();
            assert_eq!(*cargo, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("kiwis".parse::<CargoType>().is_err());
        assert!("BANANAS".parse::<CargoType>().is_err());
        assert!("".parse::<CargoType>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for cargo in CargoType::all() {
            let json = serde_json::to_string(cargo).unwrap();
            assert_eq!(json, format!("\"{}\"", cargo.as_str()));
        }
    }

    #[test]
    fn test_celsius_display() {
        assert_eq!(Celsius(13.3).to_string(), "13.3°C");
        assert_eq!(Celsius(-18.0).to_string(), "-18.0°C");
    }
}
