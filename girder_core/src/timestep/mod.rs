//! # Time-Step Solver
//!
//! Marches every point of interest through the timeline, one interval at a
//! time, in strict chronological order. Each interval:
//!
//! 1. free creep and shrinkage of every active concrete part, relaxation of
//!    every stressed strand and tendon
//! 2. the forces that would hold those deformations at zero
//! 3. the section is loaded with the negative of those restraints, the
//!    applied loads and any prestress transfer (release, stressing, cutting
//!    temporary strands)
//! 4. the age-adjusted transformed section is solved for incremental strain
//!    and curvature, separately for every product load
//! 5. the response is distributed back to the parts, which keep their own
//!    restraint in their increments
//! 6. internal and external increments must balance, or the run stops
//!
//! ## States
//!
//! ```text
//! Pending ──solve_interval(i)──▶ Solving ──▶ Finalized
//! ```
//!
//! Interval i can only be solved once interval i - 1 is finalized. A failed
//! interval blocks the rest of the chain; the solver has to be rebuilt from
//! the model.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::model::GirderModel;
//! use girder_core::timestep::TimeStepSolver;
//!
//! # fn run(model: &GirderModel) -> girder_core::CalcResult<()> {
//! let mut solver = TimeStepSolver::new(model)?;
//! solver.solve_all()?;
//! let details = solver.finish()?;
//! println!("{} points of interest", details.len());
//! # Ok(())
//! # }
//! ```

pub mod restraint;

use std::collections::HashMap;

use nalgebra::Vector2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::accumulator::{
    ConcretePartResult, EquilibriumCheck, IntervalResult, LiveLoadRange, LossAccumulator, LossDetails,
    RebarResult, RestraintByEffect, StrandResult, TendonFrictionResult, TendonResult, Tracked,
};
use crate::aging::{ConcreteAging, MaterialAgingModel};
use crate::bond;
use crate::errors::{location, CalcError, CalcResult};
use crate::loads::{ByProductLoad, LiveLoadEnvelope, LoadIncrement, ProductLoad};
use crate::materials::{ConcreteMaterial, RebarMaterial, StrandMaterial};
use crate::model::GirderModel;
use crate::section::{
    ConcretePart, PointOfInterest, RebarPart, SectionComponent, StrandPart, TendonPart, TransformedSection,
    TransformedSectionBuilder,
};
use crate::tendon::{FrictionAndAnchorSetSolver, TendonInput, TendonStressProfile};
use crate::timeline::{ConstructionEvent, Interval};
use restraint::{steel_restraint, ConcreteRestraint, FreeDeformation};

/// Processing state of one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalState {
    Pending,
    Solving,
    Finalized,
}

// ============================================================================
// Resolved inputs
// ============================================================================

struct ResolvedConcrete<'a> {
    part: &'a ConcretePart,
    material: &'a ConcreteMaterial,
    aging: ConcreteAging,
}

struct ResolvedStrand<'a> {
    part: &'a StrandPart,
    material: &'a StrandMaterial,
    transfer_factor: f64,
    /// Strand area scaled by the transfer factor
    area_in2: f64,
}

struct ResolvedTendon<'a> {
    part: TendonPart,
    input: &'a TendonInput,
    material: &'a StrandMaterial,
    area_in2: f64,
    seated_stress_ksi: f64,
}

struct ResolvedRebar<'a> {
    part: &'a RebarPart,
    material: &'a RebarMaterial,
}

/// A point of interest with every material reference looked up
struct PoiModel<'a> {
    poi: &'a PointOfInterest,
    concrete: Vec<ResolvedConcrete<'a>>,
    strands: Vec<ResolvedStrand<'a>>,
    tendons: Vec<ResolvedTendon<'a>>,
    rebar: Vec<ResolvedRebar<'a>>,
}

impl<'a> PoiModel<'a> {
    fn resolve(
        model: &'a GirderModel,
        aging: &MaterialAgingModel,
        poi: &'a PointOfInterest,
        profiles: &HashMap<usize, TendonStressProfile>,
    ) -> CalcResult<(Self, Vec<TendonFrictionResult>)> {
        let concrete = poi
            .concrete
            .iter()
            .map(|part| {
                let material = model.materials.concrete(&part.material)?;
                Ok(ResolvedConcrete {
                    part,
                    material,
                    aging: aging.for_concrete(material, part.exposure)?,
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let strands = poi
            .strands
            .iter()
            .map(|part| {
                let material = model.materials.strand(&part.material)?;
                let transfer_factor = model.strand_bonded_length_in(poi, part).map_or(1.0, |lpx| {
                    bond::transfer_factor(lpx, bond::transfer_length_in(material.nominal_diameter_in()))
                });
                Ok(ResolvedStrand {
                    part,
                    material,
                    transfer_factor,
                    area_in2: transfer_factor * part.area_in2(material),
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let mut tendons = Vec::with_capacity(poi.tendons.len());
        let mut friction = Vec::with_capacity(poi.tendons.len());
        for part in &poi.tendons {
            let missing = || {
                CalcError::configuration(
                    location(&poi.segment, None, Some(poi.id)),
                    format!("Duct {} is not defined", part.duct),
                )
            };
            let input = model.tendon(part.duct).ok_or_else(missing)?;
            let profile = profiles.get(&part.duct).ok_or_else(missing)?;
            let material = model.materials.strand(&input.material)?;
            let at_poi = profile.at(poi.x_in);
            friction.push(TendonFrictionResult {
                duct: part.duct,
                name: input.name.clone(),
                elongation_in: profile.elongation_in,
                anchor_set: profile.anchor_set.clone(),
                at_poi,
            });
            tendons.push(ResolvedTendon {
                part: *part,
                input,
                material,
                area_in2: f64::from(input.strand_count) * material.area_in2,
                seated_stress_ksi: at_poi.seated_stress_ksi,
            });
        }

        let rebar = poi
            .rebar
            .iter()
            .map(|part| {
                Ok(ResolvedRebar {
                    part,
                    material: model.materials.rebar(&part.material)?,
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        Ok((
            PoiModel {
                poi,
                concrete,
                strands,
                tendons,
                rebar,
            },
            friction,
        ))
    }
}

// ============================================================================
// Per-interval working state
// ============================================================================

struct ConcreteState {
    e_ksi: f64,
    e_age_adjusted_ksi: f64,
    free: FreeDeformation,
    restraint: ConcreteRestraint,
}

/// Strand or tendon before the section response is added
#[derive(Default)]
struct SteelState {
    in_section: bool,
    stressed: bool,
    e_ksi: f64,
    area_in2: f64,
    centroid_in: f64,
    relaxation_ksi: f64,
    restraint_kip: f64,
    /// Stress change not caused by section strain
    stress_ksi: ByProductLoad,
    /// Force the steel puts on the section (prestress transfer, unbonded relaxation)
    load_kip: ByProductLoad,
}

/// Section response to the interval's loads
struct SectionResponse {
    /// Strain at the top of girder
    strain_top: ByProductLoad,
    curvature: ByProductLoad,
}

impl SectionResponse {
    fn strain_at(&self, y_in: f64) -> ByProductLoad {
        self.strain_top + self.curvature.scale(y_in)
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Interval-by-interval solver for one girder model
pub struct TimeStepSolver<'a> {
    model: &'a GirderModel,
    aging: MaterialAgingModel,
    pois: Vec<PoiModel<'a>>,
    accumulators: Vec<LossAccumulator>,
    states: Vec<IntervalState>,
    failed: Option<usize>,
    loads: HashMap<(usize, usize), LoadIncrement>,
    live_load_from: Option<usize>,
}

impl<'a> TimeStepSolver<'a> {
    /// Validate the model, solve tendon friction and resolve materials.
    /// Every interval starts out `Pending`.
    pub fn new(model: &'a GirderModel) -> CalcResult<Self> {
        model.validate()?;
        let aging = model.aging_model()?;

        let mut profiles = HashMap::new();
        for tendon in &model.tendons {
            let strand = model.materials.strand(&tendon.material)?;
            let profile = FrictionAndAnchorSetSolver::new(tendon, strand.e_ksi).solve()?;
            profiles.insert(tendon.duct, profile);
        }

        let mut pois = Vec::with_capacity(model.points_of_interest.len());
        let mut accumulators = Vec::with_capacity(model.points_of_interest.len());
        for poi in &model.points_of_interest {
            let (resolved, friction) = PoiModel::resolve(model, &aging, poi, &profiles)?;
            accumulators.push(LossAccumulator::new(poi.id, &poi.segment, friction));
            pois.push(resolved);
        }

        Ok(TimeStepSolver {
            model,
            aging,
            pois,
            accumulators,
            states: vec![IntervalState::Pending; model.timeline.len()],
            failed: None,
            loads: model.loads.indexed(),
            live_load_from: model.timeline.event_interval(ConstructionEvent::OpenToTraffic),
        })
    }

    pub fn state(&self, interval: usize) -> Option<IntervalState> {
        self.states.get(interval).copied()
    }

    /// First interval that is not finalized
    pub fn next_interval(&self) -> Option<usize> {
        self.states.iter().position(|s| *s != IntervalState::Finalized)
    }

    pub fn accumulator(&self, poi_id: usize) -> Option<&LossAccumulator> {
        self.pois
            .iter()
            .position(|p| p.poi.id == poi_id)
            .map(|index| &self.accumulators[index])
    }

    /// Solve `interval` at every point of interest
    pub fn solve_interval(&mut self, interval: usize) -> CalcResult<()> {
        let ctx = location(&self.model.segment, Some(interval), None);
        if let Some(failed) = self.failed {
            return Err(CalcError::out_of_order(
                ctx,
                format!("Interval {} failed; rebuild the solver to run the chain again", failed),
            ));
        }
        let next = self
            .next_interval()
            .ok_or_else(|| CalcError::out_of_order(ctx.clone(), "Every interval is already finalized"))?;
        if interval != next {
            return Err(CalcError::out_of_order(
                ctx,
                format!("Interval {} must be finalized first", next),
            ));
        }

        let model = self.model;
        let step = model.timeline.interval(interval)?;
        self.states[interval] = IntervalState::Solving;
        let solved = self
            .pois
            .par_iter()
            .zip(self.accumulators.par_iter())
            .map(|(poi, history)| self.solve_poi(poi, history, step))
            .collect::<CalcResult<Vec<_>>>();

        let results = match solved {
            Ok(results) => results,
            Err(err) => {
                self.failed = Some(interval);
                return Err(err);
            }
        };
        for (accumulator, result) in self.accumulators.iter_mut().zip(results) {
            if let Err(err) = accumulator.append(result) {
                self.failed = Some(interval);
                return Err(err);
            }
        }
        self.states[interval] = IntervalState::Finalized;
        debug!(interval, description = %step.description, "interval finalized");
        Ok(())
    }

    /// Solve every remaining interval in order
    pub fn solve_all(&mut self) -> CalcResult<()> {
        info!(
            segment = %self.model.segment,
            intervals = self.states.len(),
            points_of_interest = self.pois.len(),
            "time-step analysis started"
        );
        while let Some(next) = self.next_interval() {
            self.solve_interval(next)?;
        }
        info!(segment = %self.model.segment, "time-step analysis finished");
        Ok(())
    }

    /// Finalized results, one entry per point of interest
    pub fn finish(self) -> CalcResult<Vec<LossDetails>> {
        if let Some(next) = self.next_interval() {
            return Err(CalcError::out_of_order(
                location(&self.model.segment, Some(next), None),
                "Results requested before every interval was finalized",
            ));
        }
        Ok(self.accumulators.into_iter().map(LossAccumulator::finalize).collect())
    }

    // ------------------------------------------------------------------------

    fn relaxation(&self, strand: &StrandMaterial, fp_ksi: f64, stress_interval: usize, step: &Interval) -> CalcResult<f64> {
        let t0 = self.model.timeline.interval(stress_interval)?.start_days;
        Ok(self
            .aging
            .relaxation_loss(strand, fp_ksi, step.start_days - t0, step.end_days - t0))
    }

    fn strand_state(&self, s: &ResolvedStrand, previous: ByProductLoad, i: usize, step: &Interval) -> CalcResult<SteelState> {
        let part = s.part;
        let mut st = SteelState {
            e_ksi: s.material.e_ksi,
            area_in2: s.area_in2,
            centroid_in: part.centroid_in,
            ..Default::default()
        };
        if i < part.stress_interval {
            return Ok(st);
        }
        st.stressed = part.removal_interval.map_or(true, |r| i < r);

        let mut fp = previous.total();
        if i == part.stress_interval {
            st.stress_ksi[ProductLoad::Prestress] += part.jacking_stress_ksi;
            fp = part.jacking_stress_ksi;
        }

        if part.removal_interval == Some(i) {
            // cutting returns the steel force to the section, column by column
            st.stress_ksi = -previous;
            st.load_kip = previous.scale(s.area_in2);
        } else if part.is_on_bed(i) {
            st.relaxation_ksi = self.relaxation(s.material, fp, part.stress_interval, step)?;
            st.stress_ksi[ProductLoad::Relaxation] -= st.relaxation_ksi;
        } else if part.is_bonded(i) {
            if i == part.release_interval {
                let bed = previous + st.stress_ksi;
                st.load_kip = -bed.scale(s.area_in2);
            }
            st.in_section = true;
            st.relaxation_ksi = self.relaxation(s.material, fp, part.stress_interval, step)?;
            st.restraint_kip = steel_restraint(st.relaxation_ksi, s.area_in2);
            st.stress_ksi[ProductLoad::Relaxation] -= st.relaxation_ksi;
        }
        Ok(st)
    }

    fn tendon_state(&self, t: &ResolvedTendon, previous: ByProductLoad, i: usize, step: &Interval) -> CalcResult<SteelState> {
        let mut st = SteelState {
            e_ksi: t.material.e_ksi,
            area_in2: t.area_in2,
            centroid_in: t.part.centroid_in,
            ..Default::default()
        };
        if i < t.input.stress_interval {
            return Ok(st);
        }
        st.stressed = true;

        let mut fp = previous.total();
        if i == t.input.stress_interval {
            st.stress_ksi[ProductLoad::PostTensioning] += t.seated_stress_ksi;
            st.load_kip[ProductLoad::PostTensioning] -= t.seated_stress_ksi * t.area_in2;
            fp = t.seated_stress_ksi;
        }
        st.relaxation_ksi = self.relaxation(t.material, fp, t.input.stress_interval, step)?;
        st.stress_ksi[ProductLoad::Relaxation] -= st.relaxation_ksi;
        if i >= t.input.grout_interval {
            st.in_section = true;
            st.restraint_kip = steel_restraint(st.relaxation_ksi, t.area_in2);
        } else {
            // unbonded: the force lost by the tendon comes off the anchorages
            st.load_kip[ProductLoad::Relaxation] += st.relaxation_ksi * t.area_in2;
        }
        Ok(st)
    }

    fn solve_poi(&self, pm: &PoiModel, history: &LossAccumulator, step: &Interval) -> CalcResult<IntervalResult> {
        let i = step.index;
        let poi = pm.poi;
        let settings = &self.model.settings;
        let ctx = location(&poi.segment, Some(i), Some(poi.id));
        let previous = history.last();

        // 1-2. free deformations and restraint
        let concrete_states = pm
            .concrete
            .iter()
            .enumerate()
            .map(|(k, c)| {
                if !c.part.is_active(i) {
                    return None;
                }
                let age_mid = c.part.age_at(step.middle_days);
                let e = c.material.ec_at(age_mid);
                let phi = c.aging.creep_coefficient(age_mid, c.part.age_at(step.end_days));
                let ea = ConcreteAging::age_adjusted_modulus(e, phi, settings.aging_coefficient);
                let free = FreeDeformation::compute(
                    c.part,
                    k,
                    &c.aging,
                    history.intervals(),
                    self.model.timeline.intervals(),
                    step,
                );
                let restraint = free.restraint(ea, c.part);
                Some(ConcreteState {
                    e_ksi: e,
                    e_age_adjusted_ksi: ea,
                    free,
                    restraint,
                })
            })
            .collect::<Vec<_>>();

        let strand_states = pm
            .strands
            .iter()
            .enumerate()
            .map(|(k, s)| {
                let prev = previous.map(|p| p.strands[k].stress_ksi.cumulative).unwrap_or_default();
                self.strand_state(s, prev, i, step)
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let tendon_states = pm
            .tendons
            .iter()
            .enumerate()
            .map(|(k, t)| {
                let prev = previous.map(|p| p.tendons[k].stress_ksi.cumulative).unwrap_or_default();
                self.tendon_state(t, prev, i, step)
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let rebar_active: Vec<bool> = pm.rebar.iter().map(|r| r.part.is_active(i)).collect();

        // age-adjusted transformed section
        let e_ref = concrete_states
            .iter()
            .flatten()
            .map(|c| c.e_age_adjusted_ksi)
            .chain(strand_states.iter().chain(&tendon_states).filter(|s| s.in_section).map(|s| s.e_ksi))
            .next()
            .unwrap_or(1.0);
        let mut builder = TransformedSectionBuilder::new(e_ref);
        for (c, state) in pm.concrete.iter().zip(&concrete_states) {
            if let Some(state) = state {
                builder.add(SectionComponent::new(
                    state.e_age_adjusted_ksi,
                    c.part.area_in2,
                    c.part.centroid_in,
                    c.part.inertia_in4,
                ));
            }
        }
        for st in strand_states.iter().chain(&tendon_states).filter(|s| s.in_section) {
            builder.add(SectionComponent::new(st.e_ksi, st.area_in2, st.centroid_in, 0.0));
        }
        for (r, active) in pm.rebar.iter().zip(&rebar_active) {
            if *active {
                builder.add(SectionComponent::new(r.material.e_ksi, r.part.area_in2, r.part.centroid_in, 0.0));
            }
        }
        let section = builder.build()?;
        let ytr = section.centroid_in;

        // 3. loads on the section
        let applied = self.loads.get(&(poi.id, i)).copied().unwrap_or_default();
        let mut axial = applied.axial_kip;
        let mut moment = applied.moment_kipin;
        for st in strand_states.iter().chain(&tendon_states) {
            axial += st.load_kip;
            moment += st.load_kip.scale(st.centroid_in - ytr);
        }

        let mut restraint = RestraintByEffect::default();
        for (c, state) in pm.concrete.iter().zip(&concrete_states) {
            if let Some(state) = state {
                let e = c.part.centroid_in - ytr;
                let r = state.restraint;
                restraint.creep.axial_kip += r.creep_force_kip;
                restraint.creep.moment_kipin += r.creep_force_kip * e + r.creep_moment_kipin;
                restraint.shrinkage.axial_kip += r.shrinkage_force_kip;
                restraint.shrinkage.moment_kipin += r.shrinkage_force_kip * e;
            }
        }
        for st in strand_states.iter().chain(&tendon_states).filter(|s| s.in_section) {
            restraint.relaxation.axial_kip += st.restraint_kip;
            restraint.relaxation.moment_kipin += st.restraint_kip * (st.centroid_in - ytr);
        }
        for (load, r) in [
            (ProductLoad::Creep, restraint.creep),
            (ProductLoad::Shrinkage, restraint.shrinkage),
            (ProductLoad::Relaxation, restraint.relaxation),
        ] {
            axial[load] -= r.axial_kip;
            moment[load] -= r.moment_kipin;
        }

        // 4. solve
        let response = if section.is_empty() {
            if !axial.is_zero() || !moment.is_zero() {
                return Err(CalcError::configuration(ctx, "Load applied to an empty section"));
            }
            SectionResponse {
                strain_top: ByProductLoad::zero(),
                curvature: ByProductLoad::zero(),
            }
        } else {
            solve_section(&section, &axial, &moment, &ctx)?
        };

        // 5. distribute
        let mut internal_axial = ByProductLoad::zero();
        let mut internal_moment = ByProductLoad::zero();

        let concrete = pm
            .concrete
            .iter()
            .zip(concrete_states)
            .map(|(c, state)| {
                let part = c.part;
                let Some(state) = state else {
                    return inactive_concrete(part);
                };
                let strain = response.strain_at(part.centroid_in);
                let dn_el = strain.scale(state.e_age_adjusted_ksi * part.area_in2);
                let dm_el = response.curvature.scale(state.e_age_adjusted_ksi * part.inertia_in4);
                internal_axial += dn_el;
                internal_moment += dn_el.scale(part.centroid_in - ytr) + dm_el;

                let mut dn = dn_el;
                dn[ProductLoad::Creep] += state.restraint.creep_force_kip;
                dn[ProductLoad::Shrinkage] += state.restraint.shrinkage_force_kip;
                let mut dm = dm_el;
                dm[ProductLoad::Creep] += state.restraint.creep_moment_kipin;
                let face = |y: f64| dn.scale(1.0 / part.area_in2) + dm.scale((y - part.centroid_in) / part.inertia_in4);

                ConcretePartResult {
                    name: part.name.clone(),
                    kind: part.kind,
                    active: true,
                    e_ksi: state.e_ksi,
                    e_age_adjusted_ksi: state.e_age_adjusted_ksi,
                    free_creep_strain: state.free.creep_strain,
                    free_creep_curvature: state.free.creep_curvature,
                    free_shrinkage_strain: state.free.shrinkage_strain,
                    creep_contributions: state.free.contributions,
                    creep_restraint_force_kip: state.restraint.creep_force_kip,
                    creep_restraint_moment_kipin: state.restraint.creep_moment_kipin,
                    shrinkage_restraint_force_kip: state.restraint.shrinkage_force_kip,
                    axial_kip: Tracked::new(dn),
                    moment_kipin: Tracked::new(dm),
                    strain: Tracked::new(strain),
                    curvature: Tracked::new(response.curvature),
                    stress_top_ksi: Tracked::new(face(part.y_top_in)),
                    stress_bottom_ksi: Tracked::new(face(part.y_bottom_in)),
                    live_load_stress_top_ksi: None,
                    live_load_stress_bottom_ksi: None,
                }
            })
            .collect::<Vec<_>>();

        let mut distribute = |st: &SteelState| -> (ByProductLoad, ByProductLoad) {
            if !st.in_section {
                return (st.stress_ksi, ByProductLoad::zero());
            }
            let strain = response.strain_at(st.centroid_in);
            let elastic = strain.scale(st.e_ksi);
            internal_axial += elastic.scale(st.area_in2);
            internal_moment += elastic.scale(st.area_in2 * (st.centroid_in - ytr));
            (st.stress_ksi + elastic, strain)
        };

        let strands = pm
            .strands
            .iter()
            .zip(&strand_states)
            .map(|(s, st)| {
                let (stress, strain) = distribute(st);
                StrandResult {
                    name: s.part.name.clone(),
                    kind: s.part.kind,
                    area_in2: s.area_in2,
                    transfer_factor: s.transfer_factor,
                    jacking_stress_ksi: s.part.jacking_stress_ksi,
                    stressed: st.stressed,
                    bonded: st.in_section,
                    relaxation_ksi: st.relaxation_ksi,
                    restraint_force_kip: st.restraint_kip,
                    force_kip: Tracked::new(stress.scale(s.area_in2)),
                    stress_ksi: Tracked::new(stress),
                    strain: Tracked::new(strain),
                    live_load_stress_ksi: None,
                }
            })
            .collect::<Vec<_>>();

        let tendons = pm
            .tendons
            .iter()
            .zip(&tendon_states)
            .map(|(t, st)| {
                let (stress, strain) = distribute(st);
                TendonResult {
                    duct: t.part.duct,
                    area_in2: t.area_in2,
                    jacking_stress_ksi: t.input.jacking_stress_ksi,
                    seated_stress_ksi: t.seated_stress_ksi,
                    stressed: st.stressed,
                    grouted: st.in_section,
                    relaxation_ksi: st.relaxation_ksi,
                    restraint_force_kip: st.restraint_kip,
                    force_kip: Tracked::new(stress.scale(t.area_in2)),
                    stress_ksi: Tracked::new(stress),
                    strain: Tracked::new(strain),
                    live_load_stress_ksi: None,
                }
            })
            .collect::<Vec<_>>();

        let rebar = pm
            .rebar
            .iter()
            .zip(&rebar_active)
            .map(|(r, active)| {
                let strain = if *active {
                    response.strain_at(r.part.centroid_in)
                } else {
                    ByProductLoad::zero()
                };
                let stress = strain.scale(r.material.e_ksi);
                let force = stress.scale(r.part.area_in2);
                if *active {
                    internal_axial += force;
                    internal_moment += force.scale(r.part.centroid_in - ytr);
                }
                RebarResult {
                    name: r.part.name.clone(),
                    active: *active,
                    force_kip: Tracked::new(force),
                    stress_ksi: Tracked::new(stress),
                    strain: Tracked::new(strain),
                }
            })
            .collect::<Vec<_>>();

        // 6. equilibrium
        let tolerance = settings.equilibrium_tolerance;
        for load in ProductLoad::ALL {
            for (what, external, internal) in [
                ("axial force", axial[load], internal_axial[load]),
                ("moment", moment[load], internal_moment[load]),
            ] {
                if (internal - external).abs() > tolerance * external.abs().max(1.0) {
                    error!(
                        segment = %poi.segment,
                        interval = i,
                        poi = poi.id,
                        product_load = %load,
                        external,
                        internal,
                        "equilibrium violated"
                    );
                    return Err(CalcError::equilibrium_violation(
                        format!("{}, {} {}", ctx, load, what),
                        external,
                        internal,
                        tolerance,
                    ));
                }
            }
        }

        let strain_tr = response.strain_at(ytr);
        debug!(
            poi = poi.id,
            interval = i,
            strain = strain_tr.total(),
            curvature = response.curvature.total(),
            "interval solved"
        );

        let mut result = IntervalResult {
            interval: i,
            section,
            external_axial_kip: Tracked::new(axial),
            external_moment_kipin: Tracked::new(moment),
            external_shear_kip: Tracked::new(applied.shear_kip),
            restraint,
            strain: Tracked::new(strain_tr),
            curvature: Tracked::new(response.curvature),
            concrete,
            strands,
            tendons,
            rebar,
            equilibrium: EquilibriumCheck {
                external_force_kip: axial.total(),
                internal_force_kip: internal_axial.total(),
                external_moment_kipin: moment.total(),
                internal_moment_kipin: internal_moment.total(),
                cumulative_force_kip: 0.0,
                cumulative_moment_kipin: 0.0,
                relative_tolerance: tolerance,
            },
        };

        if let (Some(from), Some(envelope)) = (self.live_load_from, self.model.loads.live_load_at(poi.id)) {
            if i >= from {
                apply_live_load(pm, &mut result, envelope)?;
            }
        }
        Ok(result)
    }
}

/// Solve K [strain_top, curvature] = [N, M_top] for every product load
fn solve_section(
    section: &TransformedSection,
    axial: &ByProductLoad,
    moment: &ByProductLoad,
    ctx: &str,
) -> CalcResult<SectionResponse> {
    let ytr = section.centroid_in;
    let lu = section.stiffness_at_top().lu();
    let mut strain_top = ByProductLoad::zero();
    let mut curvature = ByProductLoad::zero();
    for load in ProductLoad::ALL {
        let (n, m) = (axial[load], moment[load]);
        if n == 0.0 && m == 0.0 {
            continue;
        }
        let rhs = Vector2::new(n, m + n * ytr);
        let x = lu
            .solve(&rhs)
            .ok_or_else(|| CalcError::non_convergence(ctx, 0, "Section stiffness matrix is singular"))?;
        strain_top[load] = x[0];
        curvature[load] = x[1];
    }
    Ok(SectionResponse { strain_top, curvature })
}

fn inactive_concrete(part: &ConcretePart) -> ConcretePartResult {
    ConcretePartResult {
        name: part.name.clone(),
        kind: part.kind,
        active: false,
        e_ksi: 0.0,
        e_age_adjusted_ksi: 0.0,
        creep_contributions: Vec::new(),
        free_creep_strain: 0.0,
        free_creep_curvature: 0.0,
        free_shrinkage_strain: 0.0,
        creep_restraint_force_kip: 0.0,
        creep_restraint_moment_kipin: 0.0,
        shrinkage_restraint_force_kip: 0.0,
        axial_kip: Tracked::default(),
        moment_kipin: Tracked::default(),
        strain: Tracked::default(),
        curvature: Tracked::default(),
        stress_top_ksi: Tracked::default(),
        stress_bottom_ksi: Tracked::default(),
        live_load_stress_top_ksi: None,
        live_load_stress_bottom_ksi: None,
    }
}

/// Elastic stresses from the live load envelope on the instantaneous
/// (not age-adjusted) section
fn apply_live_load(pm: &PoiModel, result: &mut IntervalResult, envelope: &LiveLoadEnvelope) -> CalcResult<()> {
    let mut builder = TransformedSectionBuilder::new(
        result
            .concrete
            .iter()
            .find(|c| c.active)
            .map(|c| c.e_ksi)
            .unwrap_or(1.0),
    );
    for (c, r) in pm.concrete.iter().zip(&result.concrete) {
        if r.active {
            builder.add(SectionComponent::new(r.e_ksi, c.part.area_in2, c.part.centroid_in, c.part.inertia_in4));
        }
    }
    for (s, r) in pm.strands.iter().zip(&result.strands) {
        if r.bonded {
            builder.add(SectionComponent::new(s.material.e_ksi, s.area_in2, s.part.centroid_in, 0.0));
        }
    }
    for (t, r) in pm.tendons.iter().zip(&result.tendons) {
        if r.grouted {
            builder.add(SectionComponent::new(t.material.e_ksi, t.area_in2, t.part.centroid_in, 0.0));
        }
    }
    for (b, r) in pm.rebar.iter().zip(&result.rebar) {
        if r.active {
            builder.add(SectionComponent::new(b.material.e_ksi, b.part.area_in2, b.part.centroid_in, 0.0));
        }
    }
    let section = builder.build()?;
    let ei = section.flexural_stiffness();
    if section.is_empty() || ei <= 0.0 {
        return Ok(());
    }
    let range = |e: f64, y: f64| {
        let f = |m: f64| e * m / ei * (y - section.centroid_in);
        LiveLoadRange::from_pair(f(envelope.moment_min_kipin), f(envelope.moment_max_kipin))
    };

    for (c, r) in pm.concrete.iter().zip(result.concrete.iter_mut()) {
        if r.active {
            r.live_load_stress_top_ksi = Some(range(r.e_ksi, c.part.y_top_in));
            r.live_load_stress_bottom_ksi = Some(range(r.e_ksi, c.part.y_bottom_in));
        }
    }
    for (s, r) in pm.strands.iter().zip(result.strands.iter_mut()) {
        if r.bonded {
            r.live_load_stress_ksi = Some(range(s.material.e_ksi, s.part.centroid_in));
        }
    }
    for (t, r) in pm.tendons.iter().zip(result.tendons.iter_mut()) {
        if r.grouted {
            r.live_load_stress_ksi = Some(range(t.material.e_ksi, t.part.centroid_in));
        }
    }
    Ok(())
}
