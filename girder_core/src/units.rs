//! # Unit Types
//!
//! Type-safe wrappers for the handful of conversions the engine performs at
//! its boundaries. Internally every quantity is a plain `f64` in the bridge
//! unit system below, with the unit spelled out in the field name.
//!
//! ## Internal Unit System
//!
//! - Length: inches (in)
//! - Force: kips
//! - Stress: kips per square inch (ksi)
//! - Moment: kip-inches (kip-in)
//! - Time: days
//!
//! ## Example
//!
//! ```rust
//! use girder_core::units::{Days, Hours, KipFt, KipIn};
//!
//! let hours: Hours = Days(2.0).into();
//! assert_eq!(hours.0, 48.0);
//!
//! let m: KipFt = KipIn(1200.0).into();
//! assert_eq!(m.0, 100.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kip-feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipFt(pub f64);

/// Moment in kip-inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipIn(pub f64);

impl From<KipFt> for KipIn {
    fn from(kft: KipFt) -> Self {
        KipIn(kft.0 * 12.0)
    }
}

impl From<KipIn> for KipFt {
    fn from(kin: KipIn) -> Self {
        KipFt(kin.0 / 12.0)
    }
}

// ============================================================================
// Unit Weight
// ============================================================================

/// Unit weight in pounds per cubic foot
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pcf(pub f64);

/// Unit weight in kips per cubic foot
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kcf(pub f64);

impl From<Pcf> for Kcf {
    fn from(pcf: Pcf) -> Self {
        Kcf(pcf.0 / 1000.0)
    }
}

// ============================================================================
// Time Units
// ============================================================================

/// Time in days
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Days(pub f64);

/// Time in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(pub f64);

impl From<Days> for Hours {
    fn from(d: Days) -> Self {
        Hours(d.0 * 24.0)
    }
}

impl From<Hours> for Days {
    fn from(h: Hours) -> Self {
        Days(h.0 / 24.0)
    }
}

impl Add for Days {
    type Output = Days;
    fn add(self, rhs: Days) -> Days {
        Days(self.0 + rhs.0)
    }
}

impl Sub for Days {
    type Output = Days;
    fn sub(self, rhs: Days) -> Days {
        Days(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversion() {
        let ft = Feet(10.0);
        let inches: Inches = ft.into();
        assert_eq!(inches.0, 120.0);
        let back: Feet = inches.into();
        assert_eq!(back.0, 10.0);
    }

    #[test]
    fn test_time_conversion() {
        let h: Hours = Days(28.0).into();
        assert_eq!(h.0, 672.0);
        assert_eq!((Days(90.0) - Days(28.0)).0, 62.0);
    }

    #[test]
    fn test_unit_weight_conversion() {
        let k: Kcf = Pcf(150.0).into();
        assert!((k.0 - 0.150).abs() < 1e-12);
    }
}
