//! Shear resistance by the LRFD general procedure (5.7.3.4.2)
//!
//! ```text
//! eps_s = (|Mu|/dv + 0.5 Nu + |Vu - Vp| - Aps fpo) / (Es As + Ep Aps)
//! beta  = 4.8 / (1 + 750 eps_s)
//! theta = 29 + 3500 eps_s                       (degrees)
//! Vc    = 0.0316 beta lambda sqrt(f'c) bv dv
//! Vs    = Av fy dv cot(theta) / s
//! Vn    = min(Vc + Vs + Vp, 0.25 f'c bv dv + Vp)
//! ```

use serde::{Deserialize, Serialize};

/// Largest longitudinal strain the simplified expressions accept
pub const MAX_LONGITUDINAL_STRAIN: f64 = 0.006;
pub const SHEAR_RESISTANCE_FACTOR: f64 = 0.9;

/// Everything the general procedure needs at one section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    pub mu_kipin: f64,
    pub vu_kip: f64,
    /// Tension positive
    pub nu_kip: f64,
    pub vp_kip: f64,
    pub dv_in: f64,
    pub bv_in: f64,
    pub fc_ksi: f64,
    pub lambda: f64,
    /// Prestressing steel on the flexural tension side
    pub aps_in2: f64,
    pub ep_ksi: f64,
    /// 0.7 fpu for bonded strand
    pub fpo_ksi: f64,
    /// Mild steel on the flexural tension side
    pub as_in2: f64,
    pub es_ksi: f64,
    /// Transverse reinforcement
    pub av_in2: f64,
    pub fy_ksi: f64,
    pub spacing_in: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearCapacityDetails {
    pub input: ShearInput,
    pub eps_s: f64,
    pub beta: f64,
    pub theta_deg: f64,
    pub vc_kip: f64,
    pub vs_kip: f64,
    pub vp_kip: f64,
    /// 0.25 f'c bv dv + Vp
    pub vn_max_kip: f64,
    pub vn_kip: f64,
    pub phi: f64,
    pub vr_kip: f64,
}

/// Longitudinal strain at mid-depth, clamped to [0, 0.006]. |Mu| is taken
/// no smaller than |Vu - Vp| dv.
pub fn longitudinal_strain(input: &ShearInput) -> f64 {
    let shear = (input.vu_kip - input.vp_kip).abs();
    let moment = input.mu_kipin.abs().max(shear * input.dv_in);
    let stiffness = input.es_ksi * input.as_in2 + input.ep_ksi * input.aps_in2;
    if stiffness <= 0.0 || input.dv_in <= 0.0 {
        return MAX_LONGITUDINAL_STRAIN;
    }
    let eps = (moment / input.dv_in + 0.5 * input.nu_kip + shear - input.aps_in2 * input.fpo_ksi) / stiffness;
    eps.clamp(0.0, MAX_LONGITUDINAL_STRAIN)
}

/// Vertical component of an inclined prestress force
pub fn vertical_component(force_kip: f64, slope: f64) -> f64 {
    (force_kip * slope / (1.0 + slope * slope).sqrt()).abs()
}

impl ShearCapacityDetails {
    pub fn compute(input: ShearInput) -> Self {
        let eps_s = longitudinal_strain(&input);
        let beta = 4.8 / (1.0 + 750.0 * eps_s);
        let theta_deg = 29.0 + 3500.0 * eps_s;
        let vc = 0.0316 * beta * input.lambda * input.fc_ksi.sqrt() * input.bv_in * input.dv_in;
        let vs = if input.spacing_in > 0.0 {
            input.av_in2 * input.fy_ksi * input.dv_in / theta_deg.to_radians().tan() / input.spacing_in
        } else {
            0.0
        };
        let vn_max = 0.25 * input.fc_ksi * input.bv_in * input.dv_in + input.vp_kip;
        let vn = (vc + vs + input.vp_kip).min(vn_max);
        ShearCapacityDetails {
            input,
            eps_s,
            beta,
            theta_deg,
            vc_kip: vc,
            vs_kip: vs,
            vp_kip: input.vp_kip,
            vn_max_kip: vn_max,
            vn_kip: vn,
            phi: SHEAR_RESISTANCE_FACTOR,
            vr_kip: SHEAR_RESISTANCE_FACTOR * vn,
        }
    }
}
