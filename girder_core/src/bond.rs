//! Strand Transfer and Development (AASHTO LRFD 5.9.4.3)
//!
//! A pretensioned strand picks up its effective prestress over the transfer
//! length from the point where bond begins and can develop `fps` only after
//! the development length:
//!
//! ```text
//! lt = 60 db
//! ld = kappa (fps - 2/3 fpe) db       kappa = 1.0 (h <= 24 in), 1.6 (h > 24 in), 2.0 debonded
//! ```
//!
//! Bond begins at the girder ends, or where debonding stops. The bonded
//! length `lpx` at a point is its distance to the nearer start of bond.
//!
//! Two factors follow from `lpx`:
//!
//! - the transfer factor `min(lpx / lt, 1)` scales the prestress force the
//!   time-step analysis carries at the point
//! - the bond factor scales the strand area in strain compatibility
//!
//! ```text
//! lpx <= lt        bond = lpx fpe / (lt fps)
//! lt < lpx <= ld   bond = [fpe + (lpx - lt)(fps - fpe)/(ld - lt)] / fps
//! ld < lpx         bond = 1
//! ```
//!
//! A strand that does not rise above `fpe` at capacity is limited by the
//! transfer factor alone.

use serde::{Deserialize, Serialize};

/// Transfer length in strand diameters for uncoated strand
pub const TRANSFER_LENGTH_DIAMETERS: f64 = 60.0;

/// Member depth above which kappa rises from 1.0 to 1.6
const SHALLOW_MEMBER_DEPTH_IN: f64 = 24.0;

/// Distance from `x_in` to the nearer start of bond. Zero or negative where
/// the strand is not bonded.
pub fn bonded_length_in(x_in: f64, girder_length_in: f64, debond_start_in: f64, debond_end_in: f64) -> f64 {
    let from_start = x_in - debond_start_in;
    let from_end = girder_length_in - debond_end_in - x_in;
    from_start.min(from_end)
}

pub fn transfer_length_in(diameter_in: f64) -> f64 {
    TRANSFER_LENGTH_DIAMETERS * diameter_in
}

/// Fraction of the full prestress force carried at the point
pub fn transfer_factor(bonded_length_in: f64, transfer_length_in: f64) -> f64 {
    if bonded_length_in <= 0.0 {
        0.0
    } else if bonded_length_in >= transfer_length_in {
        1.0
    } else {
        bonded_length_in / transfer_length_in
    }
}

/// kappa in the development length equation
pub fn development_length_factor(member_depth_in: f64, debonded: bool) -> f64 {
    if debonded {
        2.0
    } else if member_depth_in > SHALLOW_MEMBER_DEPTH_IN {
        1.6
    } else {
        1.0
    }
}

/// Development length of a strand and the bond factor it leads to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandDevelopment {
    pub strand: String,
    pub diameter_in: f64,
    pub bonded_length_in: f64,
    pub transfer_length_in: f64,
    pub kappa: f64,
    pub fpe_ksi: f64,
    pub fps_ksi: f64,
    pub development_length_in: f64,
    /// Fraction of the strand area that develops its stress here
    pub bond_factor: f64,
}

impl StrandDevelopment {
    pub fn compute(
        strand: impl Into<String>,
        diameter_in: f64,
        bonded_length_in: f64,
        fpe_ksi: f64,
        fps_ksi: f64,
        kappa: f64,
    ) -> Self {
        let lt = transfer_length_in(diameter_in);
        let ld = kappa * (fps_ksi - 2.0 / 3.0 * fpe_ksi) * diameter_in;
        let lpx = bonded_length_in;

        let factor = if lpx <= 0.0 {
            0.0
        } else if fps_ksi <= fpe_ksi {
            // nothing beyond fpe to develop
            transfer_factor(lpx, lt)
        } else if lpx <= lt {
            lpx * fpe_ksi / (lt * fps_ksi)
        } else if lpx <= ld {
            (fpe_ksi + (lpx - lt) * (fps_ksi - fpe_ksi) / (ld - lt)) / fps_ksi
        } else {
            1.0
        };

        StrandDevelopment {
            strand: strand.into(),
            diameter_in,
            bonded_length_in,
            transfer_length_in: lt,
            kappa,
            fpe_ksi,
            fps_ksi,
            development_length_in: ld,
            bond_factor: factor.clamp(0.0, 1.0),
        }
    }

    pub fn is_fully_developed(&self) -> bool {
        self.bond_factor >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bonded_length_from_nearer_end() {
        assert_eq!(bonded_length_in(60.0, 1200.0, 0.0, 0.0), 60.0);
        assert_eq!(bonded_length_in(1150.0, 1200.0, 0.0, 0.0), 50.0);
        // debonded 72 in at the start
        assert_eq!(bonded_length_in(60.0, 1200.0, 72.0, 0.0), -12.0);
        assert_eq!(bonded_length_in(100.0, 1200.0, 72.0, 0.0), 28.0);
    }

    #[test]
    fn test_transfer_factor() {
        let lt = transfer_length_in(0.5);
        assert_eq!(lt, 30.0);
        assert_eq!(transfer_factor(0.0, lt), 0.0);
        assert_eq!(transfer_factor(-5.0, lt), 0.0);
        assert_relative_eq!(transfer_factor(10.0, lt), 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(transfer_factor(30.0, lt), 1.0);
        assert_eq!(transfer_factor(600.0, lt), 1.0);
    }

    #[test]
    fn test_development_length_and_bond_factor() {
        let (db, fpe, fps) = (0.5, 160.0, 260.0);
        let kappa = development_length_factor(36.0, false);
        assert_eq!(kappa, 1.6);
        assert_eq!(development_length_factor(20.0, false), 1.0);
        assert_eq!(development_length_factor(36.0, true), 2.0);

        // ld = 1.6 (260 - 106.67) 0.5 = 122.67 in
        let mid = StrandDevelopment::compute("S", db, 600.0, fpe, fps, kappa);
        assert_relative_eq!(mid.development_length_in, 1.6 * (fps - 2.0 / 3.0 * fpe) * db, epsilon = 1e-9);
        assert!(mid.is_fully_developed());

        // halfway through transfer the strand develops half of fpe / fps
        let transfer = StrandDevelopment::compute("S", db, 15.0, fpe, fps, kappa);
        assert_relative_eq!(transfer.bond_factor, 0.5 * fpe / fps, epsilon = 1e-12);

        // linear from fpe / fps at lt to one at ld
        let at_lt = StrandDevelopment::compute("S", db, 30.0, fpe, fps, kappa);
        assert_relative_eq!(at_lt.bond_factor, fpe / fps, epsilon = 1e-12);
        let between = StrandDevelopment::compute("S", db, 0.5 * (30.0 + mid.development_length_in), fpe, fps, kappa);
        assert_relative_eq!(between.bond_factor, 0.5 * (fpe / fps + 1.0), epsilon = 1e-9);

        assert_eq!(StrandDevelopment::compute("S", db, -1.0, fpe, fps, kappa).bond_factor, 0.0);

        // strand in the compression zone keeps only the transfer limit
        let compressed = StrandDevelopment::compute("S", db, 15.0, fpe, 120.0, kappa);
        assert_relative_eq!(compressed.bond_factor, 0.5, epsilon = 1e-12);
    }
}
