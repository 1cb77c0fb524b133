//! Strain-compatibility solution of a generalized section
//!
//! The section is a stack of sliced concrete regions plus discrete steel.
//! Plane sections remain plane; with the neutral axis at depth `c` below the
//! compression face, the strain at depth `d` is
//!
//! ```text
//! eps(d) = kappa (d - c)          kappa = eps_limit / (d_limit - c)
//! ```
//!
//! where the limiting fiber `d_limit` sits at the strain limit of the mode
//! being solved. `c` is found by bisection so the net axial force matches
//! the demand.

use serde::{Deserialize, Serialize};

use super::stress_strain::{ConcreteLaw, SteelLaw};
use super::BendingSense;
use crate::errors::{CalcError, CalcResult};
use crate::section::properties::Trapezoid;

const MAX_ITERATIONS: usize = 200;
/// Search window for the neutral axis, in section heights beyond the limiting fiber
const SEARCH_HEIGHTS: f64 = 50.0;
const LIMIT_SLACK: f64 = 1.0e-9;

/// Failure mechanism a solution is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityMode {
    /// Conventional concrete reaches 0.003 at its extreme compression fiber
    ConcreteCrushing,
    UhpcCrushing,
    /// Extreme tension steel reaches its fracture strain
    ReinforcementFracture,
    /// Extreme UHPC tension fiber reaches the localization strain
    UhpcLocalization,
}

impl CapacityMode {
    pub const ALL: [CapacityMode; 4] = [
        CapacityMode::ConcreteCrushing,
        CapacityMode::UhpcCrushing,
        CapacityMode::ReinforcementFracture,
        CapacityMode::UhpcLocalization,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            CapacityMode::ConcreteCrushing => "concrete crushing",
            CapacityMode::UhpcCrushing => "UHPC crushing",
            CapacityMode::ReinforcementFracture => "reinforcement fracture",
            CapacityMode::UhpcLocalization => "UHPC crack localization",
        }
    }
}

impl std::fmt::Display for CapacityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Solved state of the section for one mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSolution {
    /// Depth below the compression face
    pub neutral_axis_depth_in: f64,
    /// Signed curvature, positive for sagging
    pub curvature_per_in: f64,
    pub compression_face_strain: f64,
    pub compression_kip: f64,
    pub tension_kip: f64,
    /// Net axial force reached; differs from the demand by the bisection residual
    pub axial_kip: f64,
    /// Moment about the gross concrete centroid, positive for sagging
    pub moment_kipin: f64,
    /// Depth of the resultant tension steel force
    pub de_in: f64,
    /// Depth of the extreme tension steel
    pub dt_in: f64,
    /// Net tensile strain at `dt_in`, prestrain excluded
    pub net_tensile_strain: f64,
    pub iterations: usize,
    /// No other strain limit is exceeded
    pub limits_respected: bool,
}

/// One equilibrium solution per mode, tagged by the mode that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "solution")]
pub enum ModeSolution {
    ConcreteCrushing(EquilibriumSolution),
    UhpcCrushing(EquilibriumSolution),
    ReinforcementFracture(EquilibriumSolution),
    UhpcLocalization(EquilibriumSolution),
}

impl ModeSolution {
    fn new(mode: CapacityMode, solution: EquilibriumSolution) -> Self {
        match mode {
            CapacityMode::ConcreteCrushing => ModeSolution::ConcreteCrushing(solution),
            CapacityMode::UhpcCrushing => ModeSolution::UhpcCrushing(solution),
            CapacityMode::ReinforcementFracture => ModeSolution::ReinforcementFracture(solution),
            CapacityMode::UhpcLocalization => ModeSolution::UhpcLocalization(solution),
        }
    }

    pub fn mode(&self) -> CapacityMode {
        match self {
            ModeSolution::ConcreteCrushing(_) => CapacityMode::ConcreteCrushing,
            ModeSolution::UhpcCrushing(_) => CapacityMode::UhpcCrushing,
            ModeSolution::ReinforcementFracture(_) => CapacityMode::ReinforcementFracture,
            ModeSolution::UhpcLocalization(_) => CapacityMode::UhpcLocalization,
        }
    }

    pub fn solution(&self) -> &EquilibriumSolution {
        match self {
            ModeSolution::ConcreteCrushing(s)
            | ModeSolution::UhpcCrushing(s)
            | ModeSolution::ReinforcementFracture(s)
            | ModeSolution::UhpcLocalization(s) => s,
        }
    }
}

// ============================================================================
// Section model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ConcreteSlice {
    y_in: f64,
    area_in2: f64,
    region: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct RegionExtent {
    y_top_in: f64,
    y_bottom_in: f64,
    law: ConcreteLaw,
}

/// Bonded steel that strains with the section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelElement {
    pub name: String,
    pub y_in: f64,
    pub area_in2: f64,
    /// Strain locked in before the section is loaded (fpe / Ep)
    pub prestrain: f64,
    pub law: SteelLaw,
}

/// Force that does not depend on section strain (unbonded tendons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantForce {
    pub name: String,
    pub y_in: f64,
    pub force_kip: f64,
}

/// Sliced concrete regions plus discrete steel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralSection {
    regions: Vec<RegionExtent>,
    slices: Vec<ConcreteSlice>,
    steel: Vec<SteelElement>,
    constant: Vec<ConstantForce>,
    gross_area_in2: f64,
    gross_moment_in3: f64,
}

impl GeneralSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slice a trapezoid into `slices` layers, midpoint rule
    pub fn add_region(&mut self, shape: &Trapezoid, law: ConcreteLaw, slices: usize) {
        let region = self.regions.len();
        self.regions.push(RegionExtent {
            y_top_in: shape.y_top_in,
            y_bottom_in: shape.y_bottom_in,
            law,
        });
        let n = slices.max(1);
        let dy = shape.height_in() / n as f64;
        for k in 0..n {
            let y = shape.y_top_in + (k as f64 + 0.5) * dy;
            let area = shape.width_at(y) * dy;
            self.slices.push(ConcreteSlice { y_in: y, area_in2: area, region });
        }
        self.gross_area_in2 += shape.area_in2();
        self.gross_moment_in3 += shape.area_in2() * shape.centroid_in();
    }

    pub fn add_steel(&mut self, element: SteelElement) {
        self.steel.push(element);
    }

    pub fn add_constant_force(&mut self, force: ConstantForce) {
        self.constant.push(force);
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn constant_forces(&self) -> &[ConstantForce] {
        &self.constant
    }

    pub fn steel(&self) -> &[SteelElement] {
        &self.steel
    }

    /// Centroid of the gross concrete, moment reference for capacity
    pub fn centroid_in(&self) -> f64 {
        if self.gross_area_in2 > 0.0 {
            self.gross_moment_in3 / self.gross_area_in2
        } else {
            0.0
        }
    }

    pub fn y_top_in(&self) -> f64 {
        self.regions.iter().map(|r| r.y_top_in).fold(f64::INFINITY, f64::min)
    }

    pub fn y_bottom_in(&self) -> f64 {
        self.regions.iter().map(|r| r.y_bottom_in).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn height_in(&self) -> f64 {
        self.y_bottom_in() - self.y_top_in()
    }

    fn depth(&self, y: f64, sense: BendingSense) -> f64 {
        match sense {
            BendingSense::Positive => y - self.y_top_in(),
            BendingSense::Negative => self.y_bottom_in() - y,
        }
    }

    /// Region faces nearest and farthest from the compression face, as depths
    fn region_depths(&self, region: &RegionExtent, sense: BendingSense) -> (f64, f64) {
        let a = self.depth(region.y_top_in, sense);
        let b = self.depth(region.y_bottom_in, sense);
        (a.min(b), a.max(b))
    }

    /// Limiting fiber depth and the section strain it is pinned to
    fn limiting_fiber(&self, mode: CapacityMode, sense: BendingSense) -> Option<(f64, f64)> {
        match mode {
            CapacityMode::ConcreteCrushing | CapacityMode::UhpcCrushing => {
                let uhpc = mode == CapacityMode::UhpcCrushing;
                self.regions
                    .iter()
                    .filter(|r| r.law.is_uhpc() == uhpc)
                    .map(|r| (self.region_depths(r, sense).0, -r.law.crushing_strain()))
                    .min_by(|a, b| a.0.total_cmp(&b.0))
            }
            CapacityMode::UhpcLocalization => self
                .regions
                .iter()
                .filter_map(|r| r.law.localization_strain().map(|e| (self.region_depths(r, sense).1, e)))
                .max_by(|a, b| a.0.total_cmp(&b.0)),
            CapacityMode::ReinforcementFracture => self
                .steel
                .iter()
                .map(|s| (self.depth(s.y_in, sense), s.law.fracture_strain() - s.prestrain))
                .max_by(|a, b| a.0.total_cmp(&b.0)),
        }
    }

    /// Net axial force for neutral axis `c` and curvature magnitude `kappa`
    fn axial_force(&self, sense: BendingSense, c: f64, kappa: f64) -> f64 {
        let strain = |y: f64| kappa * (self.depth(y, sense) - c);
        let concrete: f64 = self
            .slices
            .iter()
            .map(|s| s.area_in2 * self.regions[s.region].law.stress(strain(s.y_in)))
            .sum();
        let steel: f64 = self
            .steel
            .iter()
            .map(|s| s.area_in2 * s.law.stress(s.prestrain + strain(s.y_in)))
            .sum();
        let constant: f64 = self.constant.iter().map(|f| f.force_kip).sum();
        concrete + steel + constant
    }

    /// Solve for the neutral axis that balances `axial_kip` with the
    /// limiting fiber of `mode` at its strain limit. `Ok(None)` when the
    /// section has nothing the mode applies to.
    pub fn solve(
        &self,
        mode: CapacityMode,
        sense: BendingSense,
        axial_kip: f64,
        context: &str,
    ) -> CalcResult<Option<EquilibriumSolution>> {
        let Some((d_limit, eps_limit)) = self.limiting_fiber(mode, sense) else {
            return Ok(None);
        };
        let ctx = || format!("{}, {}", context, mode);
        let h = self.height_in();
        if !(h > 0.0) || eps_limit == 0.0 {
            return Err(CalcError::non_convergence(ctx(), 0, "Degenerate section or strain limit"));
        }
        let kappa_at = |c: f64| eps_limit / (d_limit - c);
        let residual = |c: f64| self.axial_force(sense, c, kappa_at(c)) - axial_kip;

        // compression limits put the neutral axis below the fiber, tension limits above
        let gap = 1.0e-6 * h;
        let (mut lo, mut hi) = if eps_limit < 0.0 {
            (d_limit + gap, d_limit + SEARCH_HEIGHTS * h)
        } else {
            (d_limit - SEARCH_HEIGHTS * h, d_limit - gap)
        };
        let (mut r_lo, mut r_hi) = (residual(lo), residual(hi));
        if r_lo.signum() == r_hi.signum() {
            return Err(CalcError::non_convergence(
                ctx(),
                0,
                "No neutral axis depth within the section bounds balances the axial demand",
            ));
        }

        // sliced concrete makes the residual a step function, so close on c,
        // keep whichever bracket end balances better and reject the closure
        // when that end is off by more than one slice can explain
        let tolerance = 1.0e-10 * h;
        let mut iterations = 0;
        while hi - lo > tolerance && r_lo != 0.0 && r_hi != 0.0 {
            if iterations == MAX_ITERATIONS {
                return Err(CalcError::non_convergence(
                    ctx(),
                    iterations,
                    "Neutral axis bisection did not close",
                ));
            }
            iterations += 1;
            let mid = 0.5 * (lo + hi);
            let r_mid = residual(mid);
            if r_mid.signum() == r_lo.signum() {
                lo = mid;
                r_lo = r_mid;
            } else {
                hi = mid;
                r_hi = r_mid;
            }
        }
        let (c, r) = if r_lo.abs() <= r_hi.abs() { (lo, r_lo) } else { (hi, r_hi) };
        let allowed = self.closure_tolerance_kip();
        if r.abs() > allowed {
            return Err(CalcError::non_convergence(
                ctx(),
                iterations,
                format!(
                    "Bisection closed on a force jump at c = {:.4} in with {:.3} kip unbalanced (allowed {:.3} kip); refine the capacity slices",
                    c,
                    r.abs(),
                    allowed
                ),
            ));
        }
        Ok(Some(self.state(sense, c, kappa_at(c), iterations)))
    }

    /// Largest residual a closed bracket may leave: half the force one slice
    /// carries at peak stress, the jump a single slice makes entering or
    /// leaving a stepped law
    fn closure_tolerance_kip(&self) -> f64 {
        let peak = self
            .slices
            .iter()
            .map(|s| s.area_in2 * self.regions[s.region].law.peak_stress_ksi())
            .fold(0.0, f64::max);
        0.5 * peak * (1.0 + LIMIT_SLACK) + 1.0e-9
    }

    fn state(&self, sense: BendingSense, c: f64, kappa: f64, iterations: usize) -> EquilibriumSolution {
        let strain_at_depth = |d: f64| kappa * (d - c);
        let strain = |y: f64| strain_at_depth(self.depth(y, sense));
        let yc = self.centroid_in();

        let mut compression = 0.0;
        let mut tension = 0.0;
        let mut moment = 0.0;
        let mut add = |force: f64, y: f64| {
            if force < 0.0 {
                compression += force;
            } else {
                tension += force;
            }
            moment += force * (y - yc);
        };
        for s in &self.slices {
            add(s.area_in2 * self.regions[s.region].law.stress(strain(s.y_in)), s.y_in);
        }
        let mut steel_tension = 0.0;
        let mut steel_tension_depth = 0.0;
        for s in &self.steel {
            let force = s.area_in2 * s.law.stress(s.prestrain + strain(s.y_in));
            if force > 0.0 {
                steel_tension += force;
                steel_tension_depth += force * self.depth(s.y_in, sense);
            }
            add(force, s.y_in);
        }
        for f in &self.constant {
            add(f.force_kip, f.y_in);
        }

        let h = self.height_in();
        let dt = self
            .steel
            .iter()
            .map(|s| self.depth(s.y_in, sense))
            .fold(f64::NEG_INFINITY, f64::max);
        let dt = if dt.is_finite() { dt } else { h };
        let de = if steel_tension > 0.0 {
            steel_tension_depth / steel_tension
        } else {
            dt
        };

        let mut limits_respected = true;
        for r in &self.regions {
            let (near, far) = self.region_depths(r, sense);
            if strain_at_depth(near) < -r.law.crushing_strain() * (1.0 + LIMIT_SLACK) {
                limits_respected = false;
            }
            if let Some(loc) = r.law.localization_strain() {
                if strain_at_depth(far) > loc * (1.0 + LIMIT_SLACK) {
                    limits_respected = false;
                }
            }
        }
        for s in &self.steel {
            if s.prestrain + strain(s.y_in) > s.law.fracture_strain() * (1.0 + LIMIT_SLACK) {
                limits_respected = false;
            }
        }

        EquilibriumSolution {
            neutral_axis_depth_in: c,
            curvature_per_in: match sense {
                BendingSense::Positive => kappa,
                BendingSense::Negative => -kappa,
            },
            compression_face_strain: strain_at_depth(0.0),
            compression_kip: compression,
            tension_kip: tension,
            axial_kip: compression + tension,
            moment_kipin: moment,
            de_in: de,
            dt_in: dt,
            net_tensile_strain: strain_at_depth(dt),
            iterations,
            limits_respected,
        }
    }

    /// Stress in each steel element, in [`Self::steel`] order, at a solved state
    pub fn steel_stresses_ksi(&self, sense: BendingSense, solution: &EquilibriumSolution) -> Vec<f64> {
        let kappa = solution.curvature_per_in.abs();
        let c = solution.neutral_axis_depth_in;
        self.steel
            .iter()
            .map(|s| s.law.stress(s.prestrain + kappa * (self.depth(s.y_in, sense) - c)))
            .collect()
    }

    /// Solve every applicable mode. Failed modes are returned with their error.
    pub fn solve_modes(
        &self,
        sense: BendingSense,
        axial_kip: f64,
        context: &str,
    ) -> (Vec<ModeSolution>, Vec<(CapacityMode, CalcError)>) {
        let mut solved = Vec::new();
        let mut failed = Vec::new();
        for mode in CapacityMode::ALL {
            match self.solve(mode, sense, axial_kip, context) {
                Ok(Some(solution)) => solved.push(ModeSolution::new(mode, solution)),
                Ok(None) => {}
                Err(err) => failed.push((mode, err)),
            }
        }
        (solved, failed)
    }
}

/// Lowest |Mn| among solutions that respect every strain limit. `None` when
/// no solution does, even if some modes converged.
pub fn controlling(solutions: &[ModeSolution]) -> Option<&ModeSolution> {
    solutions
        .iter()
        .filter(|s| s.solution().limits_respected)
        .min_by(|a, b| {
            a.solution()
                .moment_kipin
                .abs()
                .total_cmp(&b.solution().moment_kipin.abs())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteMaterial, RebarMaterial, StrandMaterial};
    use approx::assert_relative_eq;

    /// 12 x 24 rectangle, 4 ksi, three #8 bars at d = 21.5
    fn rc_beam() -> GeneralSection {
        let mut s = GeneralSection::new();
        let law = ConcreteLaw::for_material(&ConcreteMaterial::normal("C", 4.0, 3.0)).unwrap();
        s.add_region(&Trapezoid::rectangle(0.0, 12.0, 24.0), law, 400);
        s.add_steel(SteelElement {
            name: "Bars".to_string(),
            y_in: 21.5,
            area_in2: 2.37,
            prestrain: 0.0,
            law: SteelLaw::Rebar(RebarMaterial::a615_grade_60()),
        });
        s
    }

    #[test]
    fn test_reinforced_beam_matches_whitney() {
        let s = rc_beam();
        let sol = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, 0.0, "test")
            .unwrap()
            .unwrap();
        // a = As fy / (0.85 f'c b), Mn = As fy (d - a/2) about the steel, shifted to the centroid
        let t = 2.37 * 60.0;
        let a = t / (0.85 * 4.0 * 12.0);
        let mn = t * (21.5 - a / 2.0);
        assert_relative_eq!(sol.axial_kip, 0.0, epsilon = 3.0);
        assert_relative_eq!(sol.neutral_axis_depth_in, a / 0.85, max_relative = 0.02);
        assert_relative_eq!(sol.moment_kipin, mn, max_relative = 0.01);
        assert_relative_eq!(sol.compression_face_strain, -0.003, epsilon = 1e-12);
        assert!(sol.net_tensile_strain > 0.005);
        assert!(sol.limits_respected);
    }

    #[test]
    fn test_steel_stress_at_solution() {
        let s = rc_beam();
        let sol = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, 0.0, "test")
            .unwrap()
            .unwrap();
        // under-reinforced: the bars yield
        assert_eq!(s.steel_stresses_ksi(BendingSense::Positive, &sol), vec![60.0]);
    }

    #[test]
    fn test_negative_bending_mirrors() {
        let mut s = GeneralSection::new();
        let law = ConcreteLaw::for_material(&ConcreteMaterial::normal("C", 4.0, 3.0)).unwrap();
        s.add_region(&Trapezoid::rectangle(0.0, 12.0, 24.0), law, 400);
        s.add_steel(SteelElement {
            name: "Top".to_string(),
            y_in: 2.5,
            area_in2: 2.37,
            prestrain: 0.0,
            law: SteelLaw::Rebar(RebarMaterial::a615_grade_60()),
        });
        let neg = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Negative, 0.0, "test")
            .unwrap()
            .unwrap();
        let pos = rc_beam()
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, 0.0, "test")
            .unwrap()
            .unwrap();
        assert_relative_eq!(neg.moment_kipin, -pos.moment_kipin, max_relative = 1e-6);
        assert!(neg.curvature_per_in < 0.0);
    }

    #[test]
    fn test_fracture_mode_and_controlling() {
        let mut s = GeneralSection::new();
        let law = ConcreteLaw::for_material(&ConcreteMaterial::normal("C", 6.0, 4.5)).unwrap();
        s.add_region(&Trapezoid::rectangle(0.0, 48.0, 36.0), law, 200);
        let strand = StrandMaterial::grade_270("S", 0.153);
        s.add_steel(SteelElement {
            name: "Strand".to_string(),
            y_in: 33.0,
            area_in2: 0.153,
            prestrain: 160.0 / strand.e_ksi,
            law: SteelLaw::Strand(strand),
        });
        let (solved, failed) = s.solve_modes(BendingSense::Positive, 0.0, "test");
        assert!(failed.is_empty());
        // no UHPC regions
        assert_eq!(solved.len(), 2);
        let crushing = solved.iter().find(|m| m.mode() == CapacityMode::ConcreteCrushing).unwrap();
        // one strand in a wide section: crushing would need more strain than fracture allows
        assert!(!crushing.solution().limits_respected);
        let governing = controlling(&solved).unwrap();
        assert_eq!(governing.mode(), CapacityMode::ReinforcementFracture);
        assert!(governing.solution().limits_respected);
    }

    #[test]
    fn test_unbalanced_axial_demand_fails() {
        let s = rc_beam();
        let err = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, 1.0e6, "segment 'S1', poi 3")
            .unwrap_err();
        assert_eq!(err.error_code(), "NON_CONVERGENCE");
        assert!(err.to_string().contains("poi 3"));
    }

    /// Plain concrete, `slices` layers per region, regions side by side
    fn stepped_block(regions: usize, slices: usize) -> GeneralSection {
        let mut s = GeneralSection::new();
        let law = ConcreteLaw::for_material(&ConcreteMaterial::normal("C", 4.0, 3.0)).unwrap();
        let width = 12.0 / regions as f64;
        for _ in 0..regions {
            s.add_region(&Trapezoid::rectangle(0.0, width, 24.0), law, slices);
        }
        s
    }

    #[test]
    fn test_closure_within_one_slice_is_accepted() {
        // ten 2.4 in slices of 12 in width, 0.85 * 4 * 28.8 = 97.92 kip each
        let slice = 0.85 * 4.0 * 28.8;
        let s = stepped_block(1, 10);
        let sol = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, -3.25 * slice, "test")
            .unwrap()
            .unwrap();
        // three slices in the block is a quarter slice short, the nearer end
        assert_relative_eq!(sol.axial_kip, -3.0 * slice, epsilon = 1e-6);
        // block edge reaches the fourth slice centre: beta1 c = 8.4
        assert_relative_eq!(sol.neutral_axis_depth_in, 8.4 / 0.85, max_relative = 1e-6);
    }

    #[test]
    fn test_closure_on_a_double_jump_is_rejected() {
        // coincident slices in two regions jump together, 2 x 48.96 kip
        let slice = 0.85 * 4.0 * 14.4;
        let s = stepped_block(2, 10);
        let err = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, -7.0 * slice, "poi 7")
            .unwrap_err();
        assert_eq!(err.error_code(), "NON_CONVERGENCE");
        assert!(err.to_string().contains("force jump"), "{}", err);

        // the same section balances a demand that lands on a step
        let sol = s
            .solve(CapacityMode::ConcreteCrushing, BendingSense::Positive, -6.0 * slice, "poi 7")
            .unwrap()
            .unwrap();
        assert_relative_eq!(sol.axial_kip, -6.0 * slice, epsilon = 1e-6);
    }

    fn solution(moment_kipin: f64, limits_respected: bool) -> EquilibriumSolution {
        EquilibriumSolution {
            neutral_axis_depth_in: 4.0,
            curvature_per_in: 1.0e-4,
            compression_face_strain: -0.003,
            compression_kip: -100.0,
            tension_kip: 100.0,
            axial_kip: 0.0,
            moment_kipin,
            de_in: 30.0,
            dt_in: 32.0,
            net_tensile_strain: 0.01,
            iterations: 40,
            limits_respected,
        }
    }

    #[test]
    fn test_controlling_needs_a_mode_within_limits() {
        let solved = vec![
            ModeSolution::new(CapacityMode::ConcreteCrushing, solution(9_000.0, false)),
            ModeSolution::new(CapacityMode::ReinforcementFracture, solution(7_500.0, false)),
        ];
        assert!(controlling(&solved).is_none());

        let solved = vec![
            ModeSolution::new(CapacityMode::ConcreteCrushing, solution(9_000.0, true)),
            ModeSolution::new(CapacityMode::ReinforcementFracture, solution(7_500.0, false)),
        ];
        let governing = controlling(&solved).unwrap();
        assert_eq!(governing.mode(), CapacityMode::ConcreteCrushing);
        assert_eq!(governing.solution().moment_kipin, 9_000.0);
    }

    #[test]
    fn test_mode_without_material_is_skipped() {
        let s = rc_beam();
        assert!(s
            .solve(CapacityMode::UhpcLocalization, BendingSense::Positive, 0.0, "test")
            .unwrap()
            .is_none());
    }
}
