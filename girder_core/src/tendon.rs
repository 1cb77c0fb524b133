//! # Tendon Friction and Anchor Set
//!
//! Stress along a post-tensioning tendon immediately after seating.
//!
//! ## Friction
//!
//! Measured from the jacking end, with `alpha` the accumulated angular change
//! and `x` the distance along the tendon:
//!
//! ```text
//! fpF(x) = fpj * exp(-(mu * alpha(x) + K * x))
//! ```
//!
//! The path is a list of segments, each with a length and a total angular
//! change spread uniformly along it. Within a segment the friction profile is
//! a single exponential, so every integral below is evaluated in closed form.
//!
//! ## Anchor set
//!
//! Seating the wedges pulls the strand back by `anchor_set_in`. Reverse
//! friction mirrors the friction curve about the stress at the end of the
//! seating zone `La`, found from
//!
//! ```text
//! 2 * integral[0, La] (fpF(x) - fpF(La)) dx = anchor_set * Eps
//! ```
//!
//! When the seating zone would be longer than the tendon the remaining slip
//! is spread as a uniform drop over the full length.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::tendon::{FrictionAndAnchorSetSolver, JackingEnd, TendonInput, TendonPathSegment};
//!
//! let tendon = TendonInput {
//!     name: "Duct 1".to_string(),
//!     duct: 0,
//!     material: "0.6in Gr270 LR".to_string(),
//!     strand_count: 19,
//!     jacking_stress_ksi: 202.5,
//!     jacking_end: JackingEnd::Start,
//!     friction_coefficient: 0.0,
//!     wobble_per_ft: 0.0,
//!     anchor_set_in: 0.375,
//!     path: vec![TendonPathSegment { length_in: 1200.0, angle_change_rad: 0.0 }],
//!     stress_interval: 3,
//!     grout_interval: 4,
//! };
//!
//! let profile = FrictionAndAnchorSetSolver::new(&tendon, 28_500.0).solve().unwrap();
//! let mid = profile.at(600.0);
//! // straight, frictionless: seating loss = Eps * slip / L everywhere
//! assert!((mid.anchor_set_loss_ksi - 28_500.0 * 0.375 / 1200.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::units::{Feet, Inches};

/// Bisection iterations for the seating zone and the crossover point
const MAX_ITERATIONS: usize = 200;

/// Relative convergence tolerance on lengths
const TOLERANCE: f64 = 1.0e-12;

/// End from which the tendon is stressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JackingEnd {
    #[default]
    Start,
    End,
    Both,
}

/// Tendon anchorage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TendonEnd {
    Start,
    End,
}

/// Portion of the tendon path with uniformly distributed angular change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TendonPathSegment {
    pub length_in: f64,
    /// Total angular change over the segment (radians, absolute)
    pub angle_change_rad: f64,
}

/// Post-tensioning duct definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendonInput {
    pub name: String,
    /// Duct index referenced by [`crate::section::TendonPart`]
    pub duct: usize,
    /// Strand material name in the catalog
    pub material: String,
    pub strand_count: u32,
    pub jacking_stress_ksi: f64,
    pub jacking_end: JackingEnd,
    /// Curvature friction coefficient mu
    pub friction_coefficient: f64,
    /// Wobble coefficient K (1/ft)
    pub wobble_per_ft: f64,
    pub anchor_set_in: f64,
    pub path: Vec<TendonPathSegment>,
    pub stress_interval: usize,
    pub grout_interval: usize,
}

impl TendonInput {
    pub fn length_in(&self) -> f64 {
        self.path.iter().map(|s| s.length_in).sum()
    }

    pub fn validate(&self) -> CalcResult<()> {
        let ctx = |field: &str| format!("tendon '{}', duct {}, {}", self.name, self.duct, field);
        if self.path.is_empty() {
            return Err(CalcError::missing_field(ctx("path")));
        }
        for (k, seg) in self.path.iter().enumerate() {
            if !(seg.length_in > 0.0) || seg.angle_change_rad < 0.0 {
                return Err(CalcError::invalid_input(
                    ctx(&format!("path[{}]", k)),
                    format!("{:?}", seg),
                    "Segments need a positive length and a non-negative angle change",
                ));
            }
        }
        for (field, value) in [
            ("friction_coefficient", self.friction_coefficient),
            ("wobble_per_ft", self.wobble_per_ft),
            ("anchor_set_in", self.anchor_set_in),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(CalcError::invalid_input(ctx(field), value.to_string(), "Cannot be negative"));
            }
        }
        if !(self.jacking_stress_ksi > 0.0) {
            return Err(CalcError::invalid_input(
                ctx("jacking_stress_ksi"),
                self.jacking_stress_ksi.to_string(),
                "Jacking stress must be positive",
            ));
        }
        if self.strand_count == 0 {
            return Err(CalcError::invalid_input(ctx("strand_count"), "0", "Tendon has no strands"));
        }
        if self.grout_interval <= self.stress_interval {
            return Err(CalcError::configuration(
                ctx("grout_interval"),
                format!(
                    "Grouting (interval {}) must follow the stressing interval {}",
                    self.grout_interval, self.stress_interval
                ),
            ));
        }
        Ok(())
    }
}

/// Stretch of the tendon with a single exponential friction curve, in the
/// coordinate of one jacking end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct FrictionRun {
    u_start: f64,
    u_end: f64,
    /// Friction stress at `u_start`
    f_start: f64,
    /// Angle accumulated from the jacking end to `u_start`
    alpha_start: f64,
    /// Angle change per inch
    curvature: f64,
    /// Decay rate mu * curvature + K (1/in)
    rate: f64,
}

impl FrictionRun {
    fn stress(&self, u: f64) -> f64 {
        self.f_start * (-self.rate * (u - self.u_start)).exp()
    }

    fn alpha(&self, u: f64) -> f64 {
        self.alpha_start + self.curvature * (u - self.u_start)
    }

    /// Integral of stress from `u_start` to `u`
    fn integral(&self, u: f64) -> f64 {
        let du = u - self.u_start;
        if self.rate.abs() < 1e-15 {
            self.f_start * du
        } else {
            self.f_start * (1.0 - (-self.rate * du).exp()) / self.rate
        }
    }
}

/// Friction profile measured from one jacking end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FrictionCurve {
    runs: Vec<FrictionRun>,
}

impl FrictionCurve {
    fn build(fpj: f64, mu: f64, k_per_in: f64, segments: impl Iterator<Item = TendonPathSegment>) -> Self {
        let mut runs = Vec::new();
        let (mut u, mut f, mut alpha) = (0.0, fpj, 0.0);
        for seg in segments {
            let curvature = seg.angle_change_rad / seg.length_in;
            let run = FrictionRun {
                u_start: u,
                u_end: u + seg.length_in,
                f_start: f,
                alpha_start: alpha,
                curvature,
                rate: mu * curvature + k_per_in,
            };
            f = run.stress(run.u_end);
            alpha += seg.angle_change_rad;
            u = run.u_end;
            runs.push(run);
        }
        FrictionCurve { runs }
    }

    fn run_at(&self, u: f64) -> &FrictionRun {
        self.runs
            .iter()
            .find(|r| u <= r.u_end)
            .unwrap_or_else(|| &self.runs[self.runs.len() - 1])
    }

    fn stress(&self, u: f64) -> f64 {
        self.run_at(u).stress(u)
    }

    fn alpha(&self, u: f64) -> f64 {
        self.run_at(u).alpha(u)
    }

    /// Integral of friction stress from the jacking end to `u`
    fn integral(&self, u: f64) -> f64 {
        let mut total = 0.0;
        for run in &self.runs {
            if u <= run.u_start {
                break;
            }
            total += run.integral(u.min(run.u_end));
        }
        total
    }

    /// Area between the friction curve and its mirror about fpF(la)
    fn seating_area(&self, la: f64) -> f64 {
        2.0 * (self.integral(la) - la * self.stress(la))
    }
}

/// Seating zone at one anchorage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorSetZone {
    pub end: TendonEnd,
    /// Length affected by seating (in)
    pub length_in: f64,
    /// Longest zone possible from this end (tendon length or crossover point)
    pub limit_in: f64,
    /// Friction stress at the end of the zone
    pub friction_stress_at_zone_end_ksi: f64,
    /// Uniform drop when the zone reaches its limit
    pub uniform_drop_ksi: f64,
    /// Seating loss at the anchorage
    pub loss_at_anchor_ksi: f64,
}

impl AnchorSetZone {
    fn loss(&self, friction_stress: f64, u: f64) -> f64 {
        if u > self.length_in {
            0.0
        } else {
            2.0 * (friction_stress - self.friction_stress_at_zone_end_ksi) + self.uniform_drop_ksi
        }
    }
}

/// Stress in the tendon at one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TendonStressAt {
    pub x_in: f64,
    /// Angle accumulated from the governing jacking end
    pub alpha_rad: f64,
    pub friction_loss_ksi: f64,
    pub anchor_set_loss_ksi: f64,
    /// fpj - friction - anchor set
    pub seated_stress_ksi: f64,
}

/// Friction and seating results for one tendon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendonStressProfile {
    pub duct: usize,
    pub length_in: f64,
    pub jacking_stress_ksi: f64,
    pub jacking_end: JackingEnd,
    /// Elongation at jacking before seating (in)
    pub elongation_in: f64,
    /// Start/end boundary for both-end jacking
    pub crossover_in: Option<f64>,
    pub anchor_set: Vec<AnchorSetZone>,
    from_start: FrictionCurve,
    from_end: FrictionCurve,
}

impl TendonStressProfile {
    pub fn anchor_set_zone(&self, end: TendonEnd) -> Option<&AnchorSetZone> {
        self.anchor_set.iter().find(|z| z.end == end)
    }

    /// Stresses at distance `x_in` from the start of the tendon
    pub fn at(&self, x_in: f64) -> TendonStressAt {
        let x = x_in.clamp(0.0, self.length_in);
        let u_end = self.length_in - x;
        let use_start = match self.jacking_end {
            JackingEnd::Start => true,
            JackingEnd::End => false,
            JackingEnd::Both => x <= self.crossover_in.unwrap_or(0.5 * self.length_in),
        };
        let (curve, u, end) = if use_start {
            (&self.from_start, x, TendonEnd::Start)
        } else {
            (&self.from_end, u_end, TendonEnd::End)
        };
        let friction = curve.stress(u);
        let seating = self.anchor_set_zone(end).map(|z| z.loss(friction, u)).unwrap_or(0.0);
        TendonStressAt {
            x_in: x,
            alpha_rad: curve.alpha(u),
            friction_loss_ksi: self.jacking_stress_ksi - friction,
            anchor_set_loss_ksi: seating,
            seated_stress_ksi: friction - seating,
        }
    }
}

/// Solves friction and anchor set for one tendon
pub struct FrictionAndAnchorSetSolver<'a> {
    tendon: &'a TendonInput,
    eps_ksi: f64,
}

impl<'a> FrictionAndAnchorSetSolver<'a> {
    pub fn new(tendon: &'a TendonInput, eps_ksi: f64) -> Self {
        FrictionAndAnchorSetSolver { tendon, eps_ksi }
    }

    pub fn solve(&self) -> CalcResult<TendonStressProfile> {
        let t = self.tendon;
        t.validate()?;
        let length = t.length_in();
        let k_per_in = t.wobble_per_ft / Inches::from(Feet(1.0)).0;
        let mu = t.friction_coefficient;
        let fpj = t.jacking_stress_ksi;

        let from_start = FrictionCurve::build(fpj, mu, k_per_in, t.path.iter().copied());
        let from_end = FrictionCurve::build(fpj, mu, k_per_in, t.path.iter().rev().copied());

        let crossover = match t.jacking_end {
            JackingEnd::Both => Some(crossover_point(&from_start, &from_end, length)),
            _ => None,
        };

        let ends: Vec<(TendonEnd, &FrictionCurve, f64)> = match t.jacking_end {
            JackingEnd::Start => vec![(TendonEnd::Start, &from_start, length)],
            JackingEnd::End => vec![(TendonEnd::End, &from_end, length)],
            JackingEnd::Both => {
                let xc = crossover.unwrap_or(0.5 * length);
                vec![(TendonEnd::Start, &from_start, xc), (TendonEnd::End, &from_end, length - xc)]
            }
        };

        let elongation_in = ends.iter().map(|(_, c, lim)| c.integral(*lim)).sum::<f64>() / self.eps_ksi;
        let target = t.anchor_set_in * self.eps_ksi;

        let mut anchor_set = Vec::with_capacity(ends.len());
        for (end, curve, limit) in ends {
            let zone = self.seating_zone(end, curve, limit, target)?;
            debug!(
                duct = t.duct,
                end = ?end,
                length_in = zone.length_in,
                loss_ksi = zone.loss_at_anchor_ksi,
                "anchor set zone"
            );
            anchor_set.push(zone);
        }

        Ok(TendonStressProfile {
            duct: t.duct,
            length_in: length,
            jacking_stress_ksi: fpj,
            jacking_end: t.jacking_end,
            elongation_in,
            crossover_in: crossover,
            anchor_set,
            from_start,
            from_end,
        })
    }

    fn seating_zone(&self, end: TendonEnd, curve: &FrictionCurve, limit: f64, target: f64) -> CalcResult<AnchorSetZone> {
        let ctx = format!("tendon '{}' {:?} anchorage", self.tendon.name, end);
        let elongation = curve.integral(limit);
        if target >= elongation {
            return Err(CalcError::configuration(
                ctx,
                format!(
                    "Anchor set of {} in exceeds the tendon elongation of {:.4} in",
                    self.tendon.anchor_set_in,
                    elongation / self.eps_ksi
                ),
            ));
        }

        let (length_in, f_la, uniform_drop) = if target <= 0.0 {
            (0.0, curve.stress(0.0), 0.0)
        } else if curve.seating_area(limit) <= target {
            let drop = (target - curve.seating_area(limit)) / limit;
            (limit, curve.stress(limit), drop)
        } else {
            let (mut lo, mut hi) = (0.0, limit);
            for _ in 0..MAX_ITERATIONS {
                let mid = 0.5 * (lo + hi);
                if curve.seating_area(mid) < target {
                    lo = mid;
                } else {
                    hi = mid;
                }
                if hi - lo <= TOLERANCE * limit {
                    break;
                }
            }
            let la = 0.5 * (lo + hi);
            (la, curve.stress(la), 0.0)
        };

        let zone = AnchorSetZone {
            end,
            length_in,
            limit_in: limit,
            friction_stress_at_zone_end_ksi: f_la,
            uniform_drop_ksi: uniform_drop,
            loss_at_anchor_ksi: if length_in > 0.0 {
                2.0 * (curve.stress(0.0) - f_la) + uniform_drop
            } else {
                0.0
            },
        };
        let seated_at_anchor = curve.stress(0.0) - zone.loss_at_anchor_ksi;
        if seated_at_anchor <= 0.0 {
            return Err(CalcError::configuration(
                ctx,
                format!("Seating loss of {:.2} ksi exceeds the jacking stress", zone.loss_at_anchor_ksi),
            ));
        }
        Ok(zone)
    }
}

/// Location where the friction curves from both ends meet
fn crossover_point(from_start: &FrictionCurve, from_end: &FrictionCurve, length: f64) -> f64 {
    let diff = |x: f64| from_start.stress(x) - from_end.stress(length - x);
    let (mut lo, mut hi) = (0.0, length);
    if diff(hi) >= 0.0 {
        return hi;
    }
    if diff(lo) <= 0.0 {
        return lo;
    }
    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if diff(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= TOLERANCE * length {
            break;
        }
    }
    0.5 * (lo + hi)
}
