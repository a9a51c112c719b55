//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the Reefstow stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `BookingId` where a `PlanId` is expected, and a compartment code can
//! never be mistaken for a cooling-section code.
//!
//! Two families:
//!
//! - **UUID-backed** (`VesselId`, `VoyageId`, `BookingId`, `PlanId`) —
//!   system-assigned, random v4.
//! - **String-backed** (`CompartmentId`, `CoolingSectionId`, `PortCode`) —
//!   human-assigned codes from vessel drawings and UN/LOCODE, validated at
//!   construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique identifier for a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VesselId(pub Uuid);

/// Unique identifier for a voyage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoyageId(pub Uuid);

/// Unique identifier for a confirmed cargo booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

/// Unique identifier for a stowage plan (one per revision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub Uuid);

macro_rules! impl_uuid_id {
    ($id:ident, $prefix:literal) => {
        impl $id {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $id {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_uuid_id!(VesselId, "vessel");
impl_uuid_id!(VoyageId, "voyage");
impl_uuid_id!(BookingId, "booking");
impl_uuid_id!(PlanId, "plan");

/// Compartment code from the vessel's capacity plan (e.g., `1A`, `3UPD`).
///
/// Format: leading hold number, then the level code — uppercase ASCII
/// alphanumeric, 2 to 8 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompartmentId(String);

impl CompartmentId {
    /// Validate and construct a compartment code.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        if code.len() < 2 || code.len() > 8 {
            return Err(CoreError::InvalidIdentifier {
                kind: "compartment",
                value: code,
                reason: "length must be 2..=8".into(),
            });
        }
        if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(CoreError::InvalidIdentifier {
                kind: "compartment",
                value: code,
                reason: "must be uppercase ASCII alphanumeric".into(),
            });
        }
        if !code.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidIdentifier {
                kind: "compartment",
                value: code,
                reason: "must start with the hold number".into(),
            });
        }
        Ok(Self(code))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cooling-section code (e.g., `ZONE_1AB`): one refrigeration unit, one
/// shared temperature for a voyage.
///
/// Format: uppercase ASCII alphanumeric with underscores, 3 to 16 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoolingSectionId(String);

impl CoolingSectionId {
    /// Validate and construct a cooling-section code.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        if code.len() < 3 || code.len() > 16 {
            return Err(CoreError::InvalidIdentifier {
                kind: "cooling section",
                value: code,
                reason: "length must be 3..=16".into(),
            });
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(CoreError::InvalidIdentifier {
                kind: "cooling section",
                value: code,
                reason: "must be uppercase ASCII alphanumeric or underscore".into(),
            });
        }
        Ok(Self(code))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CoolingSectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UN/LOCODE port code: exactly 5 uppercase ASCII letters (e.g., `ECGYE`,
/// `NLRTM`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortCode(String);

impl PortCode {
    /// Validate and construct a port code.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        if code.len() != 5 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CoreError::InvalidIdentifier {
                kind: "port code",
                value: code,
                reason: "UN/LOCODE is exactly 5 uppercase ASCII letters".into(),
            });
        }
        Ok(Self(code))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_distinct() {
        let a = BookingId::new();
        let b = BookingId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_prefixes() {
        assert!(VesselId::new().to_string().starts_with("vessel:"));
        assert!(PlanId::new().to_string().starts_with("plan:"));
    }

    #[test]
    fn test_compartment_id_valid() {
        assert!(CompartmentId::new("1A").is_ok());
        assert!(CompartmentId::new("3UPD").is_ok());
        assert!(CompartmentId::new("12D").is_ok());
    }

    #[test]
    fn test_compartment_id_invalid() {
        assert!(CompartmentId::new("a1").is_err()); // lowercase
        assert!(CompartmentId::new("A1").is_err()); // no leading hold number
        assert!(CompartmentId::new("1").is_err()); // too short
        assert!(CompartmentId::new("1A B").is_err()); // whitespace
    }

    #[test]
    fn test_cooling_section_id() {
        assert!(CoolingSectionId::new("ZONE_1AB").is_ok());
        assert!(CoolingSectionId::new("Z1").is_err());
        assert!(CoolingSectionId::new("zone_1ab").is_err());
    }

    #[test]
    fn test_port_code() {
        assert!(PortCode::new("ECGYE").is_ok());
        assert!(PortCode::new("NLRTM").is_ok());
        assert!(PortCode::new("ecgye").is_err());
        assert!(PortCode::new("ECGY").is_err());
        assert!(PortCode::new("ECGYE1").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = CompartmentId::new("1A").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1A\"");
        let back: CompartmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
