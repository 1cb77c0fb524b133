//! Intrinsic strand relaxation
//!
//! Relaxation over an interval is computed from the stress at the start of
//! the interval and the elapsed time since stressing (AASHTO LRFD 1998,
//! 5.9.5.4.4):
//!
//! ```text
//! fr = fp * [log(24 t2) - log(24 t1)] / K * (fp / fpy - 0.55)
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::StrandMaterial;
use crate::units::{Days, Hours};

/// Stress ratio fp/fpy below which no relaxation occurs
pub const RELAXATION_THRESHOLD: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelaxationMethod {
    #[default]
    LogTime,
    Ignore,
}

impl RelaxationMethod {
    pub const ALL: [RelaxationMethod; 2] = [RelaxationMethod::LogTime, RelaxationMethod::Ignore];

    pub fn code(&self) -> &'static str {
        match self {
            RelaxationMethod::LogTime => "LOG_TIME",
            RelaxationMethod::Ignore => "IGNORE",
        }
    }

    pub fn from_code(code: &str) -> CalcResult<Self> {
        match code.to_uppercase().replace([' ', '-'], "_").as_str() {
            "LOG_TIME" | "LOGTIME" | "INTRINSIC" => Ok(RelaxationMethod::LogTime),
            "IGNORE" | "NONE" => Ok(RelaxationMethod::Ignore),
            _ => Err(CalcError::invalid_method(code, "No relaxation model registered for this code")),
        }
    }

    /// Relaxation loss (ksi, positive) between `t_start_days` and
    /// `t_end_days`, both measured from stressing, for a strand at `fp_ksi`.
    pub fn loss(&self, strand: &StrandMaterial, fp_ksi: f64, t_start_days: f64, t_end_days: f64) -> f64 {
        match self {
            RelaxationMethod::Ignore => 0.0,
            RelaxationMethod::LogTime => {
                let ratio = fp_ksi / strand.fpy_ksi();
                if ratio < RELAXATION_THRESHOLD {
                    return 0.0;
                }
                let t1: Hours = Days(t_start_days).into();
                let t2: Hours = Days(t_end_days).into();
                // the log form is undefined inside the first hour
                let (t1, t2) = (t1.0.max(1.0), t2.0.max(1.0));
                if t2 <= t1 {
                    return 0.0;
                }
                let k = strand.strand_type.relaxation_constant();
                fp_ksi * (t2.log10() - t1.log10()) / k * (ratio - RELAXATION_THRESHOLD)
            }
        }
    }
}
