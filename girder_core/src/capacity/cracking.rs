//! Cracking moment (AASHTO LRFD 5.6.3.3)
//!
//! ```text
//! Mcr = g3 [ (g1 fr + g2 fcpe) Sbc - Mdnc (Sbc/Sb - 1) ]
//! ```
//!
//! `Sbc` is the section modulus of the section that resists the cracking
//! moment and `Sb` that of the non-composite girder. In negative bending, or
//! where no deck is composite, `Sb = Sbc` and the dead load term drops out.
//!
//! Editions from the 2003 interims through 2010 bound the result below by
//! `Sbc fr`; the 2012 edition dropped the bound along with adding the
//! variability factors. [`CrackingFactors::apply_sbc_fr_limit`] selects it.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Variability factors on the cracking moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackingFactors {
    /// Flexural cracking variability
    pub gamma1: f64,
    /// Prestress variability
    pub gamma2: f64,
    /// Ratio of specified minimum yield to ultimate tensile strength of the reinforcement
    pub gamma3: f64,
    /// Mcr is not taken below Sbc fr
    #[serde(default)]
    pub apply_sbc_fr_limit: bool,
}

impl Default for CrackingFactors {
    fn default() -> Self {
        CrackingFactors {
            gamma1: 1.6,
            gamma2: 1.1,
            gamma3: 1.0,
            apply_sbc_fr_limit: false,
        }
    }
}

impl CrackingFactors {
    /// All factors equal to one with the Sbc fr lower bound, the 2003-2010 form
    pub fn unity() -> Self {
        CrackingFactors {
            gamma1: 1.0,
            gamma2: 1.0,
            gamma3: 1.0,
            apply_sbc_fr_limit: true,
        }
    }

    pub fn with_sbc_fr_limit(mut self, apply: bool) -> Self {
        self.apply_sbc_fr_limit = apply;
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("gamma1", self.gamma1), ("gamma2", self.gamma2), ("gamma3", self.gamma3)] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("cracking.{}", field),
                    value.to_string(),
                    "Cracking factor must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Inputs and result of a cracking moment calculation. Moments and section
/// moduli are magnitudes; `mcr_kipin` carries the sign of the bending sense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackingMomentDetails {
    pub fr_ksi: f64,
    /// Compressive stress from effective prestress at the tension face
    pub fcpe_ksi: f64,
    /// Non-composite dead load moment
    pub mdnc_kipin: f64,
    pub sb_in3: f64,
    pub sbc_in3: f64,
    pub factors: CrackingFactors,
    /// Moment from the cracking formula
    pub mcr_formula_kipin: f64,
    /// Sbc fr, a lower bound only when the factors apply it
    pub mcr_limit_kipin: f64,
    /// Governing cracking moment
    pub mcr_kipin: f64,
}

/// Cracking moment magnitude from the LRFD formula, before the limit is applied
///
/// # Example
///
/// ```rust
/// use girder_core::capacity::cracking::{cracking_moment, CrackingFactors};
///
/// // (fr + fcpe) Sbc - Mdnc (Sbc/Sb - 1)
/// let mcr = cracking_moment(0.6, 2.0, 1000.0, 8000.0, 10000.0, CrackingFactors::unity());
/// assert!((mcr - (2.6 * 10000.0 - 1000.0 * 0.25)).abs() < 1e-9);
/// ```
pub fn cracking_moment(fr_ksi: f64, fcpe_ksi: f64, mdnc_kipin: f64, sb_in3: f64, sbc_in3: f64, factors: CrackingFactors) -> f64 {
    let mut mcr = (factors.gamma1 * fr_ksi + factors.gamma2 * fcpe_ksi) * sbc_in3 + mdnc_kipin;
    if sb_in3 != 0.0 {
        mcr -= mdnc_kipin * sbc_in3 / sb_in3;
    }
    factors.gamma3 * mcr
}

impl CrackingMomentDetails {
    pub fn compute(
        fr_ksi: f64,
        fcpe_ksi: f64,
        mdnc_kipin: f64,
        sb_in3: f64,
        sbc_in3: f64,
        factors: CrackingFactors,
        negative: bool,
    ) -> Self {
        let formula = cracking_moment(fr_ksi, fcpe_ksi, mdnc_kipin, sb_in3, sbc_in3, factors);
        let limit = sbc_in3 * fr_ksi;
        let governing = if factors.apply_sbc_fr_limit { formula.max(limit) } else { formula };
        CrackingMomentDetails {
            fr_ksi,
            fcpe_ksi,
            mdnc_kipin,
            sb_in3,
            sbc_in3,
            factors,
            mcr_formula_kipin: formula,
            mcr_limit_kipin: limit,
            mcr_kipin: if negative { -governing } else { governing },
        }
    }
}

/// Minimum reinforcement check (AASHTO LRFD 5.6.3.3): Mr >= min(1.2 Mcr, 1.33 Mu)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumReinforcement {
    pub mcr_kipin: f64,
    pub mu_kipin: f64,
    pub mr_kipin: f64,
    pub required_kipin: f64,
    pub satisfied: bool,
}

impl MinimumReinforcement {
    pub fn check(mcr_kipin: f64, mu_kipin: f64, mr_kipin: f64) -> Self {
        let required = (1.2 * mcr_kipin.abs()).min(1.33 * mu_kipin.abs());
        MinimumReinforcement {
            mcr_kipin,
            mu_kipin,
            mr_kipin,
            required_kipin: required,
            satisfied: mr_kipin.abs() >= required,
        }
    }
}
