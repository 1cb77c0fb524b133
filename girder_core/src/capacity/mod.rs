//! # Capacity Analysis
//!
//! Moment, cracking and shear capacity at a point of interest, evaluated
//! against the prestress state the time-step analysis left at a given
//! interval.
//!
//! The generalized section is built from the point's [`CapacitySection`]
//! (trapezoidal concrete regions tied to concrete parts) plus every bonded
//! strand, grouted tendon and active bar, each carrying its effective
//! prestrain. Ungrouted tendons contribute a constant force.
//!
//! Near the girder ends strands are not fully developed. When the girder
//! length is known, the section is first solved fully bonded to find the
//! strand stress `fps`, then each strand area is scaled by its bond factor
//! (see [`crate::bond`]) and the section is solved again.
//!
//! Each failure mode is solved on its own; the controlling mode is the
//! lowest capacity that violates no other strain limit. When every
//! converged mode violates one, the capacity is a `NonConvergence` error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::analysis::run;
//! use girder_core::capacity::{BendingSense, CapacityAnalyzer};
//! use girder_core::loads::LimitState;
//! use girder_core::model::GirderModel;
//!
//! # fn demo(model: &GirderModel) -> girder_core::CalcResult<()> {
//! let results = run(model)?;
//! let analyzer = CapacityAnalyzer::new(model, results.all_details());
//! let last = model.timeline.last_index();
//! let cap = analyzer.analyze(0, last, LimitState::StrengthI, BendingSense::Positive)?;
//! println!("Mr = {:.0} kip-in ({})", cap.moment.mr_kipin, cap.moment.controlling);
//! # Ok(())
//! # }
//! ```

pub mod cracking;
pub mod shear;
pub mod strain_compatibility;
pub mod stress_strain;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::accumulator::{IntervalResult, LossDetails};
use crate::bond::{self, StrandDevelopment};
use crate::errors::{location, CalcError, CalcResult};
use crate::loads::{LimitState, LoadClass};
use crate::model::GirderModel;
use crate::section::properties::Trapezoid;
use crate::section::{PointOfInterest, SectionComponent, TransformedSectionBuilder};
use crate::timeline::ConstructionEvent;
use cracking::{CrackingMomentDetails, MinimumReinforcement};
use shear::{vertical_component, ShearCapacityDetails, ShearInput};
use strain_compatibility::{CapacityMode, ConstantForce, EquilibriumSolution, GeneralSection, ModeSolution, SteelElement};
use stress_strain::{ConcreteLaw, SteelLaw};

// ============================================================================
// Section model input
// ============================================================================

/// Which face is in compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendingSense {
    /// Sagging, compression on top
    Positive,
    /// Hogging, compression on the bottom
    Negative,
}

impl std::fmt::Display for BendingSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BendingSense::Positive => write!(f, "positive"),
            BendingSense::Negative => write!(f, "negative"),
        }
    }
}

/// Trapezoid of concrete belonging to a named concrete part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRegion {
    /// Name of the [`crate::section::ConcretePart`] supplying material and activation
    pub part: String,
    pub shape: Trapezoid,
}

/// Vertical shear reinforcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearReinforcement {
    /// Effective web width
    pub bv_in: f64,
    /// Area of one stirrup set
    pub av_in2: f64,
    pub spacing_in: f64,
    /// Rebar material name in the catalog
    pub material: String,
}

/// Capacity geometry of a point of interest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacitySection {
    pub regions: Vec<ConcreteRegion>,
    #[serde(default)]
    pub shear: Option<ShearReinforcement>,
}

impl CapacitySection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, part: impl Into<String>, shape: Trapezoid) -> Self {
        self.regions.push(ConcreteRegion {
            part: part.into(),
            shape,
        });
        self
    }

    pub fn with_shear(mut self, shear: ShearReinforcement) -> Self {
        self.shear = Some(shear);
        self
    }

    /// Regions must name concrete parts of `poi` and lie within them
    pub fn validate(&self, poi: &PointOfInterest) -> CalcResult<()> {
        let ctx = || location(&poi.segment, None, Some(poi.id));
        if self.regions.is_empty() {
            return Err(CalcError::configuration(ctx(), "Capacity section has no concrete regions"));
        }
        for region in &self.regions {
            region.shape.validate()?;
            let part = poi.concrete_part(&region.part).ok_or_else(|| {
                CalcError::configuration(ctx(), format!("Capacity region refers to unknown part '{}'", region.part))
            })?;
            let slack = 1.0e-6 * part.height_in().max(1.0);
            if region.shape.y_top_in < part.y_top_in - slack || region.shape.y_bottom_in > part.y_bottom_in + slack {
                return Err(CalcError::configuration(
                    ctx(),
                    format!("Capacity region lies outside part '{}'", region.part),
                ));
            }
        }
        if let Some(s) = &self.shear {
            for (field, value) in [("bv_in", s.bv_in), ("spacing_in", s.spacing_in)] {
                if !(value > 0.0) {
                    return Err(CalcError::invalid_input(
                        format!("shear.{}", field),
                        value.to_string(),
                        "Must be positive",
                    ));
                }
            }
            if s.av_in2 < 0.0 {
                return Err(CalcError::invalid_input("shear.av_in2", s.av_in2.to_string(), "Cannot be negative"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Factored demand at the section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityDemand {
    pub mu_kipin: f64,
    pub vu_kip: f64,
    pub nu_kip: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeFailure {
    pub mode: CapacityMode,
    pub reason: String,
}

/// All mode solutions and the one that controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentCapacity {
    pub solutions: Vec<ModeSolution>,
    pub failures: Vec<ModeFailure>,
    pub controlling: CapacityMode,
    pub solution: EquilibriumSolution,
    pub phi: f64,
    pub mn_kipin: f64,
    pub mr_kipin: f64,
}

impl MomentCapacity {
    pub fn mode(&self, mode: CapacityMode) -> Option<&EquilibriumSolution> {
        self.solutions.iter().find(|s| s.mode() == mode).map(ModeSolution::solution)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityDetails {
    pub poi_id: usize,
    pub interval: usize,
    pub limit_state: LimitState,
    pub sense: BendingSense,
    pub section: GeneralSection,
    pub demand: CapacityDemand,
    /// Development of each bonded strand; empty when the girder length is unknown
    pub development: Vec<StrandDevelopment>,
    pub moment: MomentCapacity,
    pub cracking: CrackingMomentDetails,
    pub minimum_reinforcement: MinimumReinforcement,
    pub shear: Option<ShearCapacityDetails>,
}

impl CapacityDetails {
    /// Mr >= |Mu|
    pub fn moment_ok(&self) -> bool {
        self.moment.mr_kipin.abs() >= self.demand.mu_kipin.abs()
    }
}

/// Resistance factor for flexure from the net tensile strain (LRFD 5.5.4.2)
///
/// ```text
/// phi = phi_c + (phi_t - phi_c)(eps_t - 0.002)/(0.005 - 0.002),  phi_c <= phi <= phi_t
/// ```
///
/// `phi_t` is 1.0 for prestressed and 0.9 for reinforced sections; `phi_c` is 0.75.
pub fn flexure_resistance_factor(net_tensile_strain: f64, prestressed: bool) -> f64 {
    const PHI_C: f64 = 0.75;
    const COMPRESSION_LIMIT: f64 = 0.002;
    const TENSION_LIMIT: f64 = 0.005;
    let phi_t = if prestressed { 1.0 } else { 0.9 };
    let phi = PHI_C + (phi_t - PHI_C) * (net_tensile_strain - COMPRESSION_LIMIT) / (TENSION_LIMIT - COMPRESSION_LIMIT);
    phi.clamp(PHI_C, phi_t)
}

// ============================================================================
// Analyzer
// ============================================================================

/// Read-only capacity queries against finalized loss results
pub struct CapacityAnalyzer<'a> {
    model: &'a GirderModel,
    details: &'a [LossDetails],
}

impl<'a> CapacityAnalyzer<'a> {
    pub fn new(model: &'a GirderModel, details: &'a [LossDetails]) -> Self {
        CapacityAnalyzer { model, details }
    }

    pub fn analyze(
        &self,
        poi_id: usize,
        interval: usize,
        limit_state: LimitState,
        sense: BendingSense,
    ) -> CalcResult<CapacityDetails> {
        let ctx = location(&self.model.segment, Some(interval), Some(poi_id));
        let poi = self
            .model
            .poi(poi_id)
            .ok_or_else(|| CalcError::configuration(ctx.clone(), "Unknown point of interest"))?;
        let details = self
            .details
            .iter()
            .find(|d| d.poi_id() == poi_id)
            .ok_or_else(|| CalcError::out_of_order(ctx.clone(), "No loss results for this point of interest"))?;
        let result = details.interval(interval)?;
        let capacity = poi
            .capacity
            .as_ref()
            .ok_or_else(|| CalcError::configuration(ctx.clone(), "No capacity section defined"))?;

        let mut section = self.general_section(poi, capacity, result, &[])?;
        if section.is_empty() {
            return Err(CalcError::configuration(ctx, "No capacity region is active in this interval"));
        }
        let demand = self.demand(poi_id, result, limit_state, sense);

        let mut moment = self.moment_capacity(&section, sense, demand.nu_kip, &ctx)?;
        let development = self.strand_development(poi, result, &section, &moment.solution, sense)?;
        if development.iter().any(|d| !d.is_fully_developed()) {
            section = self.general_section(poi, capacity, result, &development)?;
            let bonded_mn = moment.mn_kipin;
            moment = self.moment_capacity(&section, sense, demand.nu_kip, &ctx)?;
            debug!(
                poi = poi_id,
                interval,
                bonded_mn_kipin = bonded_mn,
                mn_kipin = moment.mn_kipin,
                "strands not fully developed"
            );
        }
        let cracking = self.cracking_moment(poi, details, result, sense)?;
        let minimum_reinforcement = MinimumReinforcement::check(cracking.mcr_kipin, demand.mu_kipin, moment.mr_kipin);
        let shear = match &capacity.shear {
            Some(reinforcement) => Some(self.shear_capacity(poi, result, &section, &moment, reinforcement, sense, demand)?),
            None => None,
        };

        debug!(
            poi = poi_id,
            interval,
            limit_state = %limit_state,
            sense = %sense,
            mode = %moment.controlling,
            mn_kipin = moment.mn_kipin,
            mcr_kipin = cracking.mcr_kipin,
            "capacity solved"
        );

        Ok(CapacityDetails {
            poi_id,
            interval,
            limit_state,
            sense,
            section,
            demand,
            development,
            moment,
            cracking,
            minimum_reinforcement,
            shear,
        })
    }

    /// Every point of interest with a capacity section, in parallel. A
    /// failure at one point does not stop the others.
    pub fn analyze_all(
        &self,
        interval: usize,
        limit_state: LimitState,
        sense: BendingSense,
    ) -> Vec<(usize, CalcResult<CapacityDetails>)> {
        self.model
            .points_of_interest
            .par_iter()
            .filter(|poi| poi.capacity.is_some())
            .map(|poi| (poi.id, self.analyze(poi.id, interval, limit_state, sense)))
            .collect()
    }

    fn general_section(
        &self,
        poi: &PointOfInterest,
        capacity: &CapacitySection,
        result: &IntervalResult,
        development: &[StrandDevelopment],
    ) -> CalcResult<GeneralSection> {
        let materials = &self.model.materials;
        let mut section = GeneralSection::new();
        for region in &capacity.regions {
            let Some(part) = poi.concrete_part(&region.part) else {
                continue;
            };
            if !part.is_active(result.interval) {
                continue;
            }
            let law = ConcreteLaw::for_material(materials.concrete(&part.material)?)?;
            section.add_region(&region.shape, law, self.model.settings.capacity_slices);
        }
        for (part, r) in poi.strands.iter().zip(&result.strands) {
            if !r.bonded {
                continue;
            }
            let material = materials.strand(&part.material)?;
            let bond_factor = development
                .iter()
                .find(|d| d.strand == part.name)
                .map_or(1.0, |d| d.bond_factor);
            section.add_steel(SteelElement {
                name: part.name.clone(),
                y_in: part.centroid_in,
                area_in2: bond_factor * part.area_in2(material),
                prestrain: r.effective_stress_ksi() / material.e_ksi,
                law: SteelLaw::Strand(material.clone()),
            });
        }
        for (part, r) in poi.tendons.iter().zip(&result.tendons) {
            if !r.stressed {
                continue;
            }
            let name = format!("Duct {}", part.duct);
            if r.grouted {
                let input = self.model.tendon(part.duct).ok_or_else(|| {
                    CalcError::configuration(
                        location(&poi.segment, Some(result.interval), Some(poi.id)),
                        format!("Duct {} is not defined", part.duct),
                    )
                })?;
                let material = materials.strand(&input.material)?;
                section.add_steel(SteelElement {
                    name,
                    y_in: part.centroid_in,
                    area_in2: r.area_in2,
                    prestrain: r.effective_stress_ksi() / material.e_ksi,
                    law: SteelLaw::Strand(material.clone()),
                });
            } else {
                section.add_constant_force(ConstantForce {
                    name,
                    y_in: part.centroid_in,
                    force_kip: r.force_kip.total(),
                });
            }
        }
        for (part, r) in poi.rebar.iter().zip(&result.rebar) {
            if !r.active {
                continue;
            }
            section.add_steel(SteelElement {
                name: part.name.clone(),
                y_in: part.centroid_in,
                area_in2: part.area_in2,
                prestrain: 0.0,
                law: SteelLaw::Rebar(materials.rebar(&part.material)?.clone()),
            });
        }
        Ok(section)
    }

    /// Development of each bonded strand, with `fps` taken from the fully
    /// bonded solution
    fn strand_development(
        &self,
        poi: &PointOfInterest,
        result: &IntervalResult,
        section: &GeneralSection,
        solution: &EquilibriumSolution,
        sense: BendingSense,
    ) -> CalcResult<Vec<StrandDevelopment>> {
        if self.model.girder_length_in.is_none() {
            return Ok(Vec::new());
        }
        let stresses = section.steel_stresses_ksi(sense, solution);
        let (top, bottom) = poi
            .girder_parts()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(t, b), p| (t.min(p.y_top_in), b.max(p.y_bottom_in)));
        let depth = bottom - top;

        let mut development = Vec::new();
        for (part, r) in poi.strands.iter().zip(&result.strands) {
            if !r.bonded {
                continue;
            }
            let Some(lpx) = self.model.strand_bonded_length_in(poi, part) else {
                continue;
            };
            let fps = section
                .steel()
                .iter()
                .zip(&stresses)
                .find(|(s, _)| s.name == part.name && matches!(s.law, SteelLaw::Strand(_)))
                .map(|(_, f)| *f);
            let Some(fps) = fps else {
                continue;
            };
            let material = self.model.materials.strand(&part.material)?;
            development.push(StrandDevelopment::compute(
                part.name.clone(),
                material.nominal_diameter_in(),
                lpx,
                r.effective_stress_ksi(),
                fps,
                bond::development_length_factor(depth, part.is_debonded()),
            ));
        }
        Ok(development)
    }

    fn live_load_applies(&self, interval: usize) -> bool {
        self.model
            .timeline
            .event_interval(ConstructionEvent::OpenToTraffic)
            .map_or(false, |open| interval >= open)
    }

    fn demand(&self, poi_id: usize, result: &IntervalResult, limit_state: LimitState, sense: BendingSense) -> CapacityDemand {
        let combination = limit_state.combination();
        let live = if self.live_load_applies(result.interval) {
            self.model.loads.live_load_at(poi_id).copied().unwrap_or_default()
        } else {
            Default::default()
        };
        let live_moment = match sense {
            BendingSense::Positive => live.moment_max_kipin,
            BendingSense::Negative => live.moment_min_kipin,
        };
        CapacityDemand {
            mu_kipin: combination.apply(&result.external_moment_kipin.cumulative, live_moment),
            vu_kip: combination
                .apply(&result.external_shear_kip.cumulative, live.shear_max_kip)
                .abs(),
            nu_kip: combination.apply(&result.external_axial_kip.cumulative, 0.0),
        }
    }

    fn moment_capacity(
        &self,
        section: &GeneralSection,
        sense: BendingSense,
        axial_kip: f64,
        ctx: &str,
    ) -> CalcResult<MomentCapacity> {
        let (solutions, failed) = section.solve_modes(sense, axial_kip, ctx);
        let failures: Vec<ModeFailure> = failed
            .into_iter()
            .map(|(mode, err)| {
                warn!(context = ctx, mode = %mode, error = %err, "capacity mode did not converge");
                ModeFailure {
                    mode,
                    reason: err.to_string(),
                }
            })
            .collect();

        let Some(governing) = strain_compatibility::controlling(&solutions) else {
            let mut reasons: Vec<String> = failures.iter().map(|f| format!("{}: {}", f.mode, f.reason)).collect();
            reasons.extend(
                solutions
                    .iter()
                    .map(|s| format!("{}: converged but exceeds another strain limit", s.mode())),
            );
            let summary = if solutions.is_empty() {
                "No capacity mode reached equilibrium"
            } else {
                "No capacity mode reached equilibrium within every strain limit"
            };
            return Err(CalcError::non_convergence(ctx, 0, format!("{} ({})", summary, reasons.join("; "))));
        };
        let controlling = governing.mode();
        let solution = *governing.solution();
        let prestressed = section.steel().iter().any(|s| matches!(s.law, SteelLaw::Strand(_)))
            || !section.constant_forces().is_empty();
        let phi = flexure_resistance_factor(solution.net_tensile_strain, prestressed);
        Ok(MomentCapacity {
            solutions,
            failures,
            controlling,
            solution,
            phi,
            mn_kipin: solution.moment_kipin,
            mr_kipin: phi * solution.moment_kipin,
        })
    }

    fn cracking_moment(
        &self,
        poi: &PointOfInterest,
        details: &LossDetails,
        result: &IntervalResult,
        sense: BendingSense,
    ) -> CalcResult<CrackingMomentDetails> {
        let ctx = || location(&poi.segment, Some(result.interval), Some(poi.id));
        let active: Vec<_> = poi
            .concrete
            .iter()
            .zip(&result.concrete)
            .filter(|(_, r)| r.active && r.e_ksi > 0.0)
            .collect();
        let girder: Vec<_> = active.iter().filter(|(p, _)| p.kind.is_girder()).copied().collect();
        let Some((reference, reference_result)) = girder.first().copied() else {
            return Err(CalcError::configuration(ctx(), "No girder concrete is active"));
        };
        let e_ref = reference_result.e_ksi;

        let transformed = |parts: &[(&crate::section::ConcretePart, &crate::accumulator::ConcretePartResult)]| {
            parts
                .iter()
                .fold(TransformedSectionBuilder::new(e_ref), |b, (p, r)| {
                    b.with(SectionComponent::new(r.e_ksi, p.area_in2, p.centroid_in, p.inertia_in4))
                })
                .build()
        };
        let composite = transformed(active.as_slice())?;
        let noncomposite = transformed(girder.as_slice())?;

        // tension face and the part it belongs to
        let (face_y, face_part, face_e) = match sense {
            BendingSense::Positive => girder
                .iter()
                .max_by(|a, b| a.0.y_bottom_in.total_cmp(&b.0.y_bottom_in))
                .map(|(p, r)| (p.y_bottom_in, *p, r.e_ksi)),
            BendingSense::Negative => active
                .iter()
                .min_by(|a, b| a.0.y_top_in.total_cmp(&b.0.y_top_in))
                .map(|(p, r)| (p.y_top_in, *p, r.e_ksi)),
        }
        .unwrap_or((reference.y_bottom_in, reference, e_ref));

        let scale = e_ref / face_e;
        let sbc = composite.section_modulus_at(face_y) * scale;
        let sb = match sense {
            BendingSense::Positive => noncomposite.section_modulus_at(face_y),
            BendingSense::Negative => sbc,
        };
        let fr = self.model.materials.concrete(&face_part.material)?.modulus_of_rupture();

        // effective prestress on the non-composite girder
        let fcpe = if face_part.kind.is_girder() {
            let mut forces: Vec<(f64, f64)> = Vec::new();
            for (part, r) in poi.strands.iter().zip(&result.strands) {
                if r.bonded {
                    forces.push((r.force_kip.total(), part.centroid_in));
                }
            }
            for (part, r) in poi.tendons.iter().zip(&result.tendons) {
                if r.stressed {
                    forces.push((r.force_kip.total(), part.centroid_in));
                }
            }
            let (a, yc, i) = (noncomposite.area_in2, noncomposite.centroid_in, noncomposite.inertia_in4);
            forces
                .iter()
                .map(|(p, y)| p / a + p * (y - yc) * (face_y - yc) / i)
                .sum()
        } else {
            0.0
        };

        let composite_interval = self.model.timeline.event_interval(ConstructionEvent::CompositeDeck);
        let mdnc_interval = match composite_interval {
            Some(c) if result.interval >= c && c > 0 => c - 1,
            _ => result.interval,
        };
        let dead = details.cumulative_moment_kipin(mdnc_interval)?;
        let mdnc = dead.class_total(LoadClass::Dc) + dead.class_total(LoadClass::Dw);

        Ok(CrackingMomentDetails::compute(
            fr,
            fcpe,
            mdnc,
            sb,
            sbc,
            self.model.settings.cracking,
            sense == BendingSense::Negative,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn shear_capacity(
        &self,
        poi: &PointOfInterest,
        result: &IntervalResult,
        section: &GeneralSection,
        moment: &MomentCapacity,
        reinforcement: &ShearReinforcement,
        sense: BendingSense,
        demand: CapacityDemand,
    ) -> CalcResult<ShearCapacityDetails> {
        let materials = &self.model.materials;
        let web = poi
            .girder_parts()
            .next()
            .ok_or_else(|| {
                CalcError::configuration(location(&poi.segment, Some(result.interval), Some(poi.id)), "No girder part")
            })
            .and_then(|p| materials.concrete(&p.material))?;
        let stirrups = materials.rebar(&reinforcement.material)?;

        let h = section.height_in();
        let dv = (0.9 * moment.solution.de_in).max(0.72 * h);
        let depth = |y: f64| match sense {
            BendingSense::Positive => y - section.y_top_in(),
            BendingSense::Negative => section.y_bottom_in() - y,
        };

        let (mut aps, mut ep, mut fpo, mut as_, mut es) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for s in section.steel().iter().filter(|s| depth(s.y_in) > 0.5 * h) {
            match &s.law {
                SteelLaw::Strand(m) => {
                    aps += s.area_in2;
                    ep = m.e_ksi;
                    fpo = 0.7 * m.fpu_ksi;
                }
                SteelLaw::Rebar(m) => {
                    as_ += s.area_in2;
                    es = m.e_ksi;
                }
            }
        }

        let strands: f64 = poi
            .strands
            .iter()
            .zip(&result.strands)
            .filter(|(_, r)| r.bonded)
            .map(|(p, r)| vertical_component(r.force_kip.total(), p.slope))
            .sum();
        let tendons: f64 = poi
            .tendons
            .iter()
            .zip(&result.tendons)
            .filter(|(_, r)| r.stressed)
            .map(|(p, r)| vertical_component(r.force_kip.total(), p.slope))
            .sum();

        Ok(ShearCapacityDetails::compute(ShearInput {
            mu_kipin: demand.mu_kipin,
            vu_kip: demand.vu_kip,
            nu_kip: demand.nu_kip,
            vp_kip: strands + tendons,
            dv_in: dv,
            bv_in: reinforcement.bv_in,
            fc_ksi: web.fc28_ksi,
            lambda: web.lambda,
            aps_in2: aps,
            ep_ksi: ep,
            fpo_ksi: fpo,
            as_in2: as_,
            es_ksi: es,
            av_in2: reinforcement.av_in2,
            fy_ksi: stirrups.fy_ksi,
            spacing_in: reinforcement.spacing_in,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::Exposure;
    use crate::section::{ConcretePart, ConcretePartKind};

    fn poi() -> PointOfInterest {
        let part = ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder",
            &[Trapezoid::rectangle(0.0, 12.0, 36.0)],
            Exposure::new(3.0, 70.0, 1.0),
            0.0,
            0,
        )
        .unwrap();
        PointOfInterest::new(1, "S1", 120.0).with_concrete(part)
    }

    #[test]
    fn test_flexure_resistance_factor() {
        assert_eq!(flexure_resistance_factor(0.001, true), 0.75);
        assert_eq!(flexure_resistance_factor(0.01, true), 1.0);
        assert_eq!(flexure_resistance_factor(0.01, false), 0.9);
        assert!((flexure_resistance_factor(0.0035, true) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_section_validation() {
        let p = poi();
        let ok = CapacitySection::new().with_region("Girder", Trapezoid::rectangle(0.0, 12.0, 36.0));
        assert!(ok.validate(&p).is_ok());

        let unknown = CapacitySection::new().with_region("Deck", Trapezoid::rectangle(-8.0, 96.0, 8.0));
        let err = unknown.validate(&p).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION");

        let outside = CapacitySection::new().with_region("Girder", Trapezoid::rectangle(30.0, 12.0, 12.0));
        assert!(outside.validate(&p).is_err());

        assert!(CapacitySection::new().validate(&p).is_err());

        let bad_shear = ok.with_shear(ShearReinforcement {
            bv_in: 6.0,
            av_in2: 0.4,
            spacing_in: 0.0,
            material: "A615 Gr 60".to_string(),
        });
        assert!(bad_shear.validate(&p).is_err());
    }

    #[test]
    fn test_bending_sense_display() {
        assert_eq!(BendingSense::Negative.to_string(), "negative");
    }
}
