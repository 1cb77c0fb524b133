//! Prestressing Strand and Reinforcing Bar
//!
//! Properties of the steel that participates in the transformed section and
//! in the strain-compatibility analysis. Standard grades are seeded into
//! [`super::MaterialCatalog::standard`].

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Strand relaxation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrandType {
    #[default]
    LowRelaxation,
    StressRelieved,
}

impl StrandType {
    /// Relaxation constant K in the log-time relaxation equation
    pub fn relaxation_constant(&self) -> f64 {
        match self {
            StrandType::LowRelaxation => 40.0,
            StrandType::StressRelieved => 10.0,
        }
    }

    /// fpy / fpu
    pub fn yield_ratio(&self) -> f64 {
        match self {
            StrandType::LowRelaxation => 0.90,
            StrandType::StressRelieved => 0.85,
        }
    }
}

/// Seven-wire prestressing strand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandMaterial {
    pub name: String,
    pub strand_type: StrandType,
    /// Nominal area of one strand (in^2)
    pub area_in2: f64,
    pub e_ksi: f64,
    pub fpu_ksi: f64,
    /// Strain at which the strand is taken to fracture
    pub fracture_strain: f64,
    /// Nominal diameter; taken from the seven-wire size table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_in: Option<f64>,
}

/// Standard seven-wire sizes, (diameter, area)
const SEVEN_WIRE_SIZES: [(f64, f64); 7] = [
    (0.375, 0.085),
    (0.4375, 0.115),
    (0.5, 0.153),
    (0.52, 0.167),
    (0.6, 0.217),
    (0.62, 0.231),
    (0.7, 0.294),
];

/// Nominal diameter of a seven-wire strand of the given area. Sizes off the
/// table use A = 0.6 d^2.
pub fn seven_wire_diameter_in(area_in2: f64) -> f64 {
    SEVEN_WIRE_SIZES
        .iter()
        .find(|(_, a)| (a - area_in2).abs() <= 0.02 * a)
        .map(|(d, _)| *d)
        .unwrap_or_else(|| (area_in2 / 0.6).sqrt())
}

impl StrandMaterial {
    /// Grade 270 low relaxation strand of the given nominal area
    pub fn grade_270(name: impl Into<String>, area_in2: f64) -> Self {
        StrandMaterial {
            name: name.into(),
            strand_type: StrandType::LowRelaxation,
            area_in2,
            e_ksi: 28_500.0,
            fpu_ksi: 270.0,
            fracture_strain: 0.035,
            diameter_in: None,
        }
    }

    pub fn with_diameter(mut self, diameter_in: f64) -> Self {
        self.diameter_in = Some(diameter_in);
        self
    }

    pub fn nominal_diameter_in(&self) -> f64 {
        self.diameter_in.unwrap_or_else(|| seven_wire_diameter_in(self.area_in2))
    }

    pub fn fpy_ksi(&self) -> f64 {
        self.strand_type.yield_ratio() * self.fpu_ksi
    }

    /// Strand stress for total strain `strain` using the PCI power formula
    /// (Q = 0.031, R = 7.36, K = 1.043), capped at fpu.
    pub fn stress(&self, strain: f64) -> f64 {
        const Q: f64 = 0.031;
        const R: f64 = 7.36;
        const K: f64 = 1.043;
        let e = strain.abs();
        let fpy = self.fpy_ksi();
        let denom = (1.0 + (self.e_ksi * e / (K * fpy)).powf(R)).powf(1.0 / R);
        let f = (self.e_ksi * e * (Q + (1.0 - Q) / denom)).min(self.fpu_ksi);
        f.copysign(strain)
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("area_in2", self.area_in2),
            ("e_ksi", self.e_ksi),
            ("fpu_ksi", self.fpu_ksi),
            ("fracture_strain", self.fracture_strain),
            ("diameter_in", self.diameter_in.unwrap_or(1.0)),
        ] {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.name, field),
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Mild reinforcing bar, elastic-perfectly-plastic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarMaterial {
    pub name: String,
    pub e_ksi: f64,
    pub fy_ksi: f64,
    pub fu_ksi: f64,
    pub fracture_strain: f64,
}

impl RebarMaterial {
    pub fn a615_grade_60() -> Self {
        RebarMaterial {
            name: "A615 Gr 60".to_string(),
            e_ksi: 29_000.0,
            fy_ksi: 60.0,
            fu_ksi: 90.0,
            fracture_strain: 0.06,
        }
    }

    pub fn stress(&self, strain: f64) -> f64 {
        (self.e_ksi * strain).clamp(-self.fy_ksi, self.fy_ksi)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.e_ksi > 0.0) || !(self.fy_ksi > 0.0) {
            return Err(CalcError::invalid_input(
                format!("{}.fy_ksi", self.name),
                self.fy_ksi.to_string(),
                "Modulus and yield strength must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_power_formula_elastic_range() {
        let s = StrandMaterial::grade_270("0.5", 0.153);
        assert_relative_eq!(s.stress(0.005), 0.005 * 28_500.0, max_relative = 0.01);
    }

    #[test]
    fn test_power_formula_capped_at_fpu() {
        let s = StrandMaterial::grade_270("0.5", 0.153);
        assert!(s.stress(0.03) <= 270.0);
        assert!(s.stress(0.03) > 260.0);
        assert!(s.stress(-0.005) < 0.0);
    }

    #[test]
    fn test_rebar_plateau() {
        let r = RebarMaterial::a615_grade_60();
        assert_eq!(r.stress(0.01), 60.0);
        assert_eq!(r.stress(-0.01), -60.0);
        assert_relative_eq!(r.stress(0.001), 29.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nominal_diameter() {
        assert_eq!(StrandMaterial::grade_270("0.5", 0.153).nominal_diameter_in(), 0.5);
        assert_eq!(StrandMaterial::grade_270("0.6", 0.217).nominal_diameter_in(), 0.6);
        assert_eq!(StrandMaterial::grade_270("0.5 special", 0.167).nominal_diameter_in(), 0.52);
        assert_relative_eq!(seven_wire_diameter_in(0.24), 0.4_f64.sqrt(), epsilon = 1e-12);
        let coated = StrandMaterial::grade_270("0.5", 0.153).with_diameter(0.51);
        assert_eq!(coated.nominal_diameter_in(), 0.51);
        assert!(StrandMaterial::grade_270("0.5", 0.153).with_diameter(0.0).validate().is_err());
    }

    #[test]
    fn test_fpy() {
        let s = StrandMaterial::grade_270("0.6", 0.217);
        assert_relative_eq!(s.fpy_ksi(), 243.0, epsilon = 1e-9);
    }
}
