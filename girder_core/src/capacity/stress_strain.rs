//! Stress-strain laws used by the strain-compatibility solve
//!
//! Strain is positive in tension, stress likewise.
//!
//! ```text
//!  Whitney block                    UHPC
//!
//!   -0.85f'c ┌──────┐                        ┌──── 0.85f'c plateau to ecu
//!            │      │ eps < -(1-b1)ecu      /
//!            └──────┴──── 0          ────/──────────── strain
//!                                      / ft,cr ─── gu ft,loc ──┐ eps_t,loc
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteMaterial, ConcreteType, RebarMaterial, StrandMaterial};

/// Usable compressive strain of conventional concrete (AASHTO 5.6.2.1)
pub const CONVENTIONAL_CRUSHING_STRAIN: f64 = 0.003;

/// Concrete constitutive law for one capacity region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConcreteLaw {
    /// Rectangular stress block written as a stress-strain curve
    Whitney { fc_ksi: f64, beta1: f64 },
    Uhpc {
        fc_ksi: f64,
        e_ksi: f64,
        ft_cr_ksi: f64,
        ft_loc_ksi: f64,
        gamma_u: f64,
        strain_t_loc: f64,
        strain_cu: f64,
    },
}

impl ConcreteLaw {
    /// Law for a catalog material at its 28-day properties
    pub fn for_material(material: &ConcreteMaterial) -> CalcResult<Self> {
        match material.concrete_type {
            ConcreteType::Normal => Ok(ConcreteLaw::Whitney {
                fc_ksi: material.fc28_ksi,
                beta1: material.beta1(),
            }),
            ConcreteType::Uhpc => {
                let u = material
                    .uhpc
                    .ok_or_else(|| CalcError::missing_field(format!("{}.uhpc", material.name)))?;
                Ok(ConcreteLaw::Uhpc {
                    fc_ksi: material.fc28_ksi,
                    e_ksi: material.ec_at(28.0),
                    ft_cr_ksi: u.ft_cr_ksi,
                    ft_loc_ksi: u.ft_loc_ksi,
                    gamma_u: u.gamma_u,
                    strain_t_loc: u.strain_t_loc,
                    strain_cu: u.strain_cu,
                })
            }
        }
    }

    pub fn is_uhpc(&self) -> bool {
        matches!(self, ConcreteLaw::Uhpc { .. })
    }

    /// Compressive strain limit as a positive magnitude
    pub fn crushing_strain(&self) -> f64 {
        match *self {
            ConcreteLaw::Whitney { .. } => CONVENTIONAL_CRUSHING_STRAIN,
            ConcreteLaw::Uhpc { strain_cu, .. } => strain_cu,
        }
    }

    /// Tensile strain at which the law stops carrying stress, if any
    pub fn localization_strain(&self) -> Option<f64> {
        match *self {
            ConcreteLaw::Whitney { .. } => None,
            ConcreteLaw::Uhpc { strain_t_loc, .. } => Some(strain_t_loc),
        }
    }

    /// Largest stress magnitude the law can reach
    pub fn peak_stress_ksi(&self) -> f64 {
        match *self {
            ConcreteLaw::Whitney { fc_ksi, .. } => 0.85 * fc_ksi,
            ConcreteLaw::Uhpc {
                fc_ksi,
                ft_cr_ksi,
                ft_loc_ksi,
                gamma_u,
                ..
            } => (0.85 * fc_ksi).max(ft_cr_ksi).max(gamma_u * ft_loc_ksi),
        }
    }

    pub fn stress(&self, strain: f64) -> f64 {
        match *self {
            ConcreteLaw::Whitney { fc_ksi, beta1 } => {
                if strain < -(1.0 - beta1) * CONVENTIONAL_CRUSHING_STRAIN {
                    -0.85 * fc_ksi
                } else {
                    0.0
                }
            }
            ConcreteLaw::Uhpc {
                fc_ksi,
                e_ksi,
                ft_cr_ksi,
                ft_loc_ksi,
                gamma_u,
                strain_t_loc,
                ..
            } => {
                if strain < 0.0 {
                    (e_ksi * strain).max(-0.85 * fc_ksi)
                } else if strain <= ft_cr_ksi / e_ksi {
                    e_ksi * strain
                } else if strain <= strain_t_loc {
                    gamma_u * ft_loc_ksi
                } else {
                    0.0
                }
            }
        }
    }
}

/// Constitutive law for a discrete steel element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "material")]
pub enum SteelLaw {
    Strand(StrandMaterial),
    Rebar(RebarMaterial),
}

impl SteelLaw {
    pub fn e_ksi(&self) -> f64 {
        match self {
            SteelLaw::Strand(m) => m.e_ksi,
            SteelLaw::Rebar(m) => m.e_ksi,
        }
    }

    pub fn fracture_strain(&self) -> f64 {
        match self {
            SteelLaw::Strand(m) => m.fracture_strain,
            SteelLaw::Rebar(m) => m.fracture_strain,
        }
    }

    /// Stress at total strain (prestrain included)
    pub fn stress(&self, strain: f64) -> f64 {
        match self {
            SteelLaw::Strand(m) => m.stress(strain),
            SteelLaw::Rebar(m) => m.stress(strain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_whitney_block() {
        let law = ConcreteLaw::for_material(&ConcreteMaterial::normal("C", 8.0, 6.0)).unwrap();
        // beta1 = 0.65 at 8 ksi
        assert_eq!(law.stress(-0.001), 0.0);
        assert_relative_eq!(law.stress(-0.0011), -6.8, epsilon = 1e-12);
        assert_eq!(law.stress(0.001), 0.0);
        assert_eq!(law.crushing_strain(), 0.003);
        assert!(law.localization_strain().is_none());
    }

    #[test]
    fn test_uhpc_tension_branches() {
        let law = ConcreteLaw::for_material(&ConcreteMaterial::uhpc("U", 22.0, 14.0)).unwrap();
        let ConcreteLaw::Uhpc { e_ksi, .. } = law else {
            panic!("expected UHPC law");
        };
        assert_relative_eq!(law.stress(1.0e-4), e_ksi * 1.0e-4, epsilon = 1e-12);
        assert_relative_eq!(law.stress(0.002), 0.85 * 0.75, epsilon = 1e-12);
        assert_eq!(law.stress(0.003), 0.0);
        assert_relative_eq!(law.stress(-0.0035), -0.85 * 22.0, epsilon = 1e-12);
        assert!(law.is_uhpc());
    }

    #[test]
    fn test_steel_laws() {
        let law = SteelLaw::Strand(StrandMaterial::grade_270("S", 0.153));
        // elastic well below yield, capped at fpu
        assert_relative_eq!(law.stress(0.002), 57.0, max_relative = 1e-3);
        assert_eq!(law.stress(0.05), 270.0);
        assert_eq!(law.fracture_strain(), 0.035);
        let bar = SteelLaw::Rebar(RebarMaterial::a615_grade_60());
        assert_eq!(bar.stress(0.01), 60.0);
        assert_relative_eq!(bar.stress(0.001), 29.0, epsilon = 1e-12);
        assert_eq!(bar.e_ksi(), 29_000.0);
    }
}
