//! Concrete Materials
//!
//! Time-dependent concrete properties. Strength gain follows the ACI 209
//! hyperbolic form and the modulus follows AASHTO LRFD 5.4.2.4, so every
//! property is a function of concrete age rather than a single number.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Kcf, Pcf};

/// Concrete family. Only the aging methods registered for a family may be
/// used with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConcreteType {
    /// Conventional normal or lightweight concrete
    #[default]
    Normal,
    /// Ultra-high performance concrete
    Uhpc,
}

impl ConcreteType {
    pub const ALL: [ConcreteType; 2] = [ConcreteType::Normal, ConcreteType::Uhpc];

    pub fn code(&self) -> &'static str {
        match self {
            ConcreteType::Normal => "NORMAL",
            ConcreteType::Uhpc => "UHPC",
        }
    }
}

/// Curing regime. Drives strength gain constants and the shrinkage time
/// functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CuringType {
    #[default]
    Moist,
    /// Accelerated (steam) curing
    Steam,
}

impl CuringType {
    /// ACI 209 strength gain constants (a in days, b dimensionless)
    pub fn strength_gain_constants(&self) -> (f64, f64) {
        match self {
            CuringType::Moist => (4.0, 0.85),
            CuringType::Steam => (1.0, 0.95),
        }
    }
}

/// Tension and compression parameters specific to UHPC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UhpcProperties {
    /// Effective cracking strength ft,cr (ksi)
    pub ft_cr_ksi: f64,
    /// Crack localization strength ft,loc (ksi)
    pub ft_loc_ksi: f64,
    /// Tensile strain at crack localization
    pub strain_t_loc: f64,
    /// Usable compressive strain
    pub strain_cu: f64,
    /// Reduction factor on ft,loc for design
    pub gamma_u: f64,
}

impl Default for UhpcProperties {
    fn default() -> Self {
        UhpcProperties {
            ft_cr_ksi: 0.75,
            ft_loc_ksi: 0.75,
            strain_t_loc: 0.0025,
            strain_cu: 0.0035,
            gamma_u: 0.85,
        }
    }
}

/// Concrete material definition.
///
/// # Example
///
/// ```rust
/// use girder_core::materials::ConcreteMaterial;
///
/// let girder = ConcreteMaterial::normal("Girder 8 ksi", 8.0, 6.0);
/// assert!(girder.fc_at(1.0) < girder.fc_at(28.0));
/// assert!((girder.fc_at(28.0) - 8.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Catalog key
    pub name: String,

    pub concrete_type: ConcreteType,

    /// Specified 28-day compressive strength f'c (ksi)
    pub fc28_ksi: f64,

    /// Compressive strength at first loading f'ci (ksi)
    pub fci_ksi: f64,

    /// Unit weight used for the modulus (pcf)
    pub unit_weight_pcf: f64,

    /// Aggregate correction factor K1
    #[serde(default = "default_one")]
    pub k1: f64,

    /// Lightweight modification factor lambda
    #[serde(default = "default_one")]
    pub lambda: f64,

    pub curing: CuringType,

    /// Optional 28-day modulus override (ksi). Scaled with sqrt(f'c(t)/f'c).
    #[serde(default)]
    pub ec28_override_ksi: Option<f64>,

    /// Modulus of rupture coefficient (fr = k * lambda * sqrt(f'c), ksi)
    #[serde(default = "default_rupture_coefficient")]
    pub rupture_coefficient: f64,

    #[serde(default)]
    pub uhpc: Option<UhpcProperties>,
}

fn default_one() -> f64 {
    1.0
}

fn default_rupture_coefficient() -> f64 {
    0.24
}

impl ConcreteMaterial {
    /// Moist-cured normal weight concrete at 150 pcf
    pub fn normal(name: impl Into<String>, fc28_ksi: f64, fci_ksi: f64) -> Self {
        ConcreteMaterial {
            name: name.into(),
            concrete_type: ConcreteType::Normal,
            fc28_ksi,
            fci_ksi,
            unit_weight_pcf: 150.0,
            k1: 1.0,
            lambda: 1.0,
            curing: CuringType::Moist,
            ec28_override_ksi: None,
            rupture_coefficient: default_rupture_coefficient(),
            uhpc: None,
        }
    }

    /// UHPC with default tension parameters
    pub fn uhpc(name: impl Into<String>, fc28_ksi: f64, fci_ksi: f64) -> Self {
        ConcreteMaterial {
            concrete_type: ConcreteType::Uhpc,
            unit_weight_pcf: 155.0,
            curing: CuringType::Steam,
            uhpc: Some(UhpcProperties::default()),
            ..ConcreteMaterial::normal(name, fc28_ksi, fci_ksi)
        }
    }

    pub fn with_curing(mut self, curing: CuringType) -> Self {
        self.curing = curing;
        self
    }

    pub fn with_unit_weight(mut self, unit_weight_pcf: f64) -> Self {
        self.unit_weight_pcf = unit_weight_pcf;
        self
    }

    pub fn with_modulus(mut self, ec28_ksi: f64) -> Self {
        self.ec28_override_ksi = Some(ec28_ksi);
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("fc28_ksi", self.fc28_ksi),
            ("fci_ksi", self.fci_ksi),
            ("unit_weight_pcf", self.unit_weight_pcf),
            ("k1", self.k1),
            ("lambda", self.lambda),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.name, field),
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }
        if self.fci_ksi > self.fc28_ksi {
            return Err(CalcError::invalid_input(
                format!("{}.fci_ksi", self.name),
                self.fci_ksi.to_string(),
                "Release strength cannot exceed the 28-day strength",
            ));
        }
        if self.concrete_type == ConcreteType::Uhpc && self.uhpc.is_none() {
            return Err(CalcError::missing_field(format!("{}.uhpc", self.name)));
        }
        Ok(())
    }

    /// Compressive strength at concrete age `age_days` (ksi).
    ///
    /// f'c(t) = t / (a + b t) * f'c28, ACI 209R-92 eq. 2-1.
    pub fn fc_at(&self, age_days: f64) -> f64 {
        if age_days <= 0.0 {
            return 0.0;
        }
        let (a, b) = self.curing.strength_gain_constants();
        let ratio_28 = 28.0 / (a + b * 28.0);
        // normalized so f'c(28) equals the specified strength
        self.fc28_ksi * (age_days / (a + b * age_days)) / ratio_28
    }

    /// Secant modulus at concrete age `age_days` (ksi).
    pub fn ec_at(&self, age_days: f64) -> f64 {
        let fc = self.fc_at(age_days);
        if fc <= 0.0 {
            return 0.0;
        }
        if let Some(ec28) = self.ec28_override_ksi {
            return ec28 * (fc / self.fc28_ksi).sqrt();
        }
        match self.concrete_type {
            ConcreteType::Normal => {
                let wc: Kcf = Pcf(self.unit_weight_pcf).into();
                33_000.0 * self.k1 * wc.0.powf(1.5) * fc.sqrt()
            }
            ConcreteType::Uhpc => 2500.0 * fc.powf(0.33),
        }
    }

    /// Modulus of rupture at the 28-day strength (ksi)
    pub fn modulus_of_rupture(&self) -> f64 {
        match (&self.concrete_type, &self.uhpc) {
            (ConcreteType::Uhpc, Some(u)) => u.ft_cr_ksi,
            _ => self.rupture_coefficient * self.lambda * self.fc28_ksi.sqrt(),
        }
    }

    /// Whitney stress block factor beta1 (AASHTO 5.6.2.2)
    pub fn beta1(&self) -> f64 {
        (0.85 - 0.05 * (self.fc28_ksi - 4.0)).clamp(0.65, 0.85)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strength_gain_hits_specified_strength() {
        let c = ConcreteMaterial::normal("C", 6.0, 4.5);
        assert_relative_eq!(c.fc_at(28.0), 6.0, epsilon = 1e-12);
        assert!(c.fc_at(7.0) < 6.0);
        assert!(c.fc_at(365.0) > 6.0);
        assert_eq!(c.fc_at(0.0), 0.0);
    }

    #[test]
    fn test_modulus_normal_weight() {
        let c = ConcreteMaterial::normal("C", 6.0, 4.5);
        // 33000 * 0.15^1.5 * sqrt(6)
        assert_relative_eq!(c.ec_at(28.0), 4695.98, epsilon = 0.5);
    }

    #[test]
    fn test_modulus_override_scales_with_strength() {
        let c = ConcreteMaterial::normal("C", 6.0, 4.5).with_modulus(5000.0);
        assert_relative_eq!(c.ec_at(28.0), 5000.0, epsilon = 1e-9);
        assert!(c.ec_at(3.0) < 5000.0);
    }

    #[test]
    fn test_beta1_limits() {
        assert_eq!(ConcreteMaterial::normal("a", 4.0, 3.0).beta1(), 0.85);
        assert_relative_eq!(ConcreteMaterial::normal("b", 6.0, 4.0).beta1(), 0.75, epsilon = 1e-12);
        assert_eq!(ConcreteMaterial::normal("c", 12.0, 8.0).beta1(), 0.65);
    }

    #[test]
    fn test_validation() {
        assert!(ConcreteMaterial::normal("ok", 6.0, 4.0).validate().is_ok());
        assert!(ConcreteMaterial::normal("bad", 6.0, 7.0).validate().is_err());
        assert!(ConcreteMaterial::normal("neg", -6.0, 4.0).validate().is_err());
        let mut u = ConcreteMaterial::uhpc("u", 22.0, 14.0);
        assert!(u.validate().is_ok());
        u.uhpc = None;
        assert!(u.validate().is_err());
    }

    #[test]
    fn test_rupture() {
        let c = ConcreteMaterial::normal("C", 6.25, 4.0);
        assert_relative_eq!(c.modulus_of_rupture(), 0.24 * 2.5, epsilon = 1e-12);
    }
}
