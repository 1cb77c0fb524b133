//! # Loss Accumulator
//!
//! Per point of interest history of the time-step analysis. The solver hands
//! over each interval's increments and the accumulator rolls them into
//! cumulative values: cumulative[i] = cumulative[i - 1] + increment[i], for
//! every part and every product load. Appending is the only mutation, and
//! [`LossAccumulator::finalize`] turns the history into read-only
//! [`LossDetails`].
//!
//! ## Example
//!
//! ```rust
//! use girder_core::accumulator::Tracked;
//! use girder_core::loads::{ByProductLoad, ProductLoad};
//!
//! let first = Tracked::new(ByProductLoad::only(ProductLoad::Prestress, -10.0));
//! let mut second = Tracked::new(ByProductLoad::only(ProductLoad::Creep, -2.0));
//! second.accumulate(&first);
//! assert_eq!(second.total(), -12.0);
//! assert_eq!(second.total_incremental(), -2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{location, CalcError, CalcResult};
use crate::loads::ByProductLoad;
use crate::section::{ConcretePartKind, StrandKind, TransformedSection};
use crate::tendon::{AnchorSetZone, TendonStressAt};

/// Incremental and cumulative value per product load
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tracked {
    pub incremental: ByProductLoad,
    pub cumulative: ByProductLoad,
}

impl Tracked {
    /// First entry of a history: cumulative equals the increment
    pub fn new(incremental: ByProductLoad) -> Self {
        Tracked {
            incremental,
            cumulative: incremental,
        }
    }

    pub fn accumulate(&mut self, previous: &Tracked) {
        self.cumulative = previous.cumulative + self.incremental;
    }

    pub fn total_incremental(&self) -> f64 {
        self.incremental.total()
    }

    /// Cumulative value summed over product loads
    pub fn total(&self) -> f64 {
        self.cumulative.total()
    }
}

/// Stress range under the live load envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveLoadRange {
    pub min_ksi: f64,
    pub max_ksi: f64,
}

impl LiveLoadRange {
    pub fn from_pair(a: f64, b: f64) -> Self {
        LiveLoadRange {
            min_ksi: a.min(b),
            max_ksi: a.max(b),
        }
    }
}

/// Creep deformation in this interval caused by the increment of an
/// earlier interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreepContribution {
    pub from_interval: usize,
    pub strain: f64,
    pub curvature: f64,
}

// ============================================================================
// Part results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcretePartResult {
    pub name: String,
    pub kind: ConcretePartKind,
    pub active: bool,
    /// Modulus at the middle of the interval
    pub e_ksi: f64,
    pub e_age_adjusted_ksi: f64,
    pub creep_contributions: Vec<CreepContribution>,
    pub free_creep_strain: f64,
    pub free_creep_curvature: f64,
    pub free_shrinkage_strain: f64,
    pub creep_restraint_force_kip: f64,
    pub creep_restraint_moment_kipin: f64,
    pub shrinkage_restraint_force_kip: f64,
    pub axial_kip: Tracked,
    pub moment_kipin: Tracked,
    /// Strain at the part centroid
    pub strain: Tracked,
    pub curvature: Tracked,
    pub stress_top_ksi: Tracked,
    pub stress_bottom_ksi: Tracked,
    pub live_load_stress_top_ksi: Option<LiveLoadRange>,
    pub live_load_stress_bottom_ksi: Option<LiveLoadRange>,
}

impl ConcretePartResult {
    fn accumulate(&mut self, previous: &ConcretePartResult) {
        self.axial_kip.accumulate(&previous.axial_kip);
        self.moment_kipin.accumulate(&previous.moment_kipin);
        self.strain.accumulate(&previous.strain);
        self.curvature.accumulate(&previous.curvature);
        self.stress_top_ksi.accumulate(&previous.stress_top_ksi);
        self.stress_bottom_ksi.accumulate(&previous.stress_bottom_ksi);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandResult {
    pub name: String,
    pub kind: StrandKind,
    /// Strand area times the transfer factor
    pub area_in2: f64,
    /// Share of the full prestress force transferred at this point
    #[serde(default = "full_transfer")]
    pub transfer_factor: f64,
    pub jacking_stress_ksi: f64,
    pub stressed: bool,
    pub bonded: bool,
    pub relaxation_ksi: f64,
    pub restraint_force_kip: f64,
    pub force_kip: Tracked,
    pub stress_ksi: Tracked,
    pub strain: Tracked,
    pub live_load_stress_ksi: Option<LiveLoadRange>,
}

fn full_transfer() -> f64 {
    1.0
}

impl StrandResult {
    pub fn effective_stress_ksi(&self) -> f64 {
        self.stress_ksi.total()
    }

    /// Loss from jacking, zero before the strands are stressed
    pub fn loss_ksi(&self) -> f64 {
        if self.stressed {
            self.jacking_stress_ksi - self.effective_stress_ksi()
        } else {
            0.0
        }
    }

    fn accumulate(&mut self, previous: &StrandResult) {
        self.force_kip.accumulate(&previous.force_kip);
        self.stress_ksi.accumulate(&previous.stress_ksi);
        self.strain.accumulate(&previous.strain);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendonResult {
    pub duct: usize,
    pub area_in2: f64,
    pub jacking_stress_ksi: f64,
    pub seated_stress_ksi: f64,
    pub stressed: bool,
    pub grouted: bool,
    pub relaxation_ksi: f64,
    pub restraint_force_kip: f64,
    pub force_kip: Tracked,
    pub stress_ksi: Tracked,
    pub strain: Tracked,
    pub live_load_stress_ksi: Option<LiveLoadRange>,
}

impl TendonResult {
    pub fn effective_stress_ksi(&self) -> f64 {
        self.stress_ksi.total()
    }

    /// Loss from jacking including friction and anchor set
    pub fn loss_ksi(&self) -> f64 {
        if self.stressed {
            self.jacking_stress_ksi - self.effective_stress_ksi()
        } else {
            0.0
        }
    }

    fn accumulate(&mut self, previous: &TendonResult) {
        self.force_kip.accumulate(&previous.force_kip);
        self.stress_ksi.accumulate(&previous.stress_ksi);
        self.strain.accumulate(&previous.strain);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarResult {
    pub name: String,
    pub active: bool,
    pub force_kip: Tracked,
    pub stress_ksi: Tracked,
    pub strain: Tracked,
}

impl RebarResult {
    fn accumulate(&mut self, previous: &RebarResult) {
        self.force_kip.accumulate(&previous.force_kip);
        self.stress_ksi.accumulate(&previous.stress_ksi);
        self.strain.accumulate(&previous.strain);
    }
}

// ============================================================================
// Interval results
// ============================================================================

/// Axial force and moment pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceMoment {
    pub axial_kip: f64,
    pub moment_kipin: f64,
}

impl ForceMoment {
    pub fn is_zero(&self) -> bool {
        self.axial_kip == 0.0 && self.moment_kipin == 0.0
    }
}

/// Total restraint of all parts by time-dependent effect. The section is
/// loaded with the negative of these values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RestraintByEffect {
    pub creep: ForceMoment,
    pub shrinkage: ForceMoment,
    pub relaxation: ForceMoment,
}

/// Incremental internal versus external totals for one interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquilibriumCheck {
    pub external_force_kip: f64,
    pub internal_force_kip: f64,
    pub external_moment_kipin: f64,
    pub internal_moment_kipin: f64,
    /// Cumulative external totals through this interval
    pub cumulative_force_kip: f64,
    pub cumulative_moment_kipin: f64,
    pub relative_tolerance: f64,
}

impl EquilibriumCheck {
    pub fn force_error_kip(&self) -> f64 {
        (self.internal_force_kip - self.external_force_kip).abs()
    }

    pub fn moment_error_kipin(&self) -> f64 {
        (self.internal_moment_kipin - self.external_moment_kipin).abs()
    }

    pub fn is_satisfied(&self) -> bool {
        let tol = |ext: f64| self.relative_tolerance * ext.abs().max(1.0);
        self.force_error_kip() <= tol(self.external_force_kip)
            && self.moment_error_kipin() <= tol(self.external_moment_kipin)
    }
}

/// Everything computed at one point of interest in one interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalResult {
    pub interval: usize,
    /// Age-adjusted transformed section
    pub section: TransformedSection,
    /// Loads on the section, including prestress transfer and released restraint.
    /// Moments are about the centroid of `section`.
    pub external_axial_kip: Tracked,
    pub external_moment_kipin: Tracked,
    pub external_shear_kip: Tracked,
    pub restraint: RestraintByEffect,
    /// Strain at the transformed centroid
    pub strain: Tracked,
    pub curvature: Tracked,
    pub concrete: Vec<ConcretePartResult>,
    pub strands: Vec<StrandResult>,
    pub tendons: Vec<TendonResult>,
    pub rebar: Vec<RebarResult>,
    pub equilibrium: EquilibriumCheck,
}

impl IntervalResult {
    fn accumulate(&mut self, previous: &IntervalResult) -> CalcResult<()> {
        if self.concrete.len() != previous.concrete.len()
            || self.strands.len() != previous.strands.len()
            || self.tendons.len() != previous.tendons.len()
            || self.rebar.len() != previous.rebar.len()
        {
            return Err(CalcError::Internal {
                message: format!("Part list changed between intervals {} and {}", previous.interval, self.interval),
            });
        }
        self.external_axial_kip.accumulate(&previous.external_axial_kip);
        self.external_moment_kipin.accumulate(&previous.external_moment_kipin);
        self.external_shear_kip.accumulate(&previous.external_shear_kip);
        self.strain.accumulate(&previous.strain);
        self.curvature.accumulate(&previous.curvature);
        for (part, prev) in self.concrete.iter_mut().zip(&previous.concrete) {
            part.accumulate(prev);
        }
        for (part, prev) in self.strands.iter_mut().zip(&previous.strands) {
            part.accumulate(prev);
        }
        for (part, prev) in self.tendons.iter_mut().zip(&previous.tendons) {
            part.accumulate(prev);
        }
        for (part, prev) in self.rebar.iter_mut().zip(&previous.rebar) {
            part.accumulate(prev);
        }
        self.equilibrium.cumulative_force_kip = self.external_axial_kip.total();
        self.equilibrium.cumulative_moment_kipin = self.external_moment_kipin.total();
        Ok(())
    }

    pub fn strand(&self, name: &str) -> Option<&StrandResult> {
        self.strands.iter().find(|s| s.name == name)
    }

    pub fn tendon(&self, duct: usize) -> Option<&TendonResult> {
        self.tendons.iter().find(|t| t.duct == duct)
    }

    pub fn concrete_part(&self, name: &str) -> Option<&ConcretePartResult> {
        self.concrete.iter().find(|c| c.name == name)
    }

    /// Force in bonded prestressing steel (strands and grouted tendons)
    pub fn bonded_prestress_force_kip(&self) -> f64 {
        let strands: f64 = self.strands.iter().filter(|s| s.bonded).map(|s| s.force_kip.total()).sum();
        let tendons: f64 = self.tendons.iter().filter(|t| t.grouted).map(|t| t.force_kip.total()).sum();
        strands + tendons
    }
}

/// Friction and anchor set results for one duct at the point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TendonFrictionResult {
    pub duct: usize,
    pub name: String,
    pub elongation_in: f64,
    pub anchor_set: Vec<AnchorSetZone>,
    pub at_poi: TendonStressAt,
}

// ============================================================================
// Accumulator
// ============================================================================

/// Appends interval results for one point of interest
#[derive(Debug, Clone)]
pub struct LossAccumulator {
    details: LossDetails,
}

impl LossAccumulator {
    pub fn new(poi_id: usize, segment: impl Into<String>, friction: Vec<TendonFrictionResult>) -> Self {
        LossAccumulator {
            details: LossDetails {
                poi_id,
                segment: segment.into(),
                friction,
                intervals: Vec::new(),
            },
        }
    }

    /// Roll `result` into the history. Its index must be the next interval.
    pub fn append(&mut self, mut result: IntervalResult) -> CalcResult<&IntervalResult> {
        let expected = self.details.intervals.len();
        if result.interval != expected {
            return Err(CalcError::out_of_order(
                location(&self.details.segment, Some(result.interval), Some(self.details.poi_id)),
                format!("Expected interval {}", expected),
            ));
        }
        if let Some(previous) = self.details.intervals.last() {
            result.accumulate(previous)?;
        } else {
            result.equilibrium.cumulative_force_kip = result.external_axial_kip.total();
            result.equilibrium.cumulative_moment_kipin = result.external_moment_kipin.total();
        }
        self.details.intervals.push(result);
        let index = self.details.intervals.len() - 1;
        Ok(&self.details.intervals[index])
    }

    pub fn last(&self) -> Option<&IntervalResult> {
        self.details.intervals.last()
    }

    /// Finalized intervals in order
    pub fn intervals(&self) -> &[IntervalResult] {
        &self.details.intervals
    }

    pub fn interval(&self, index: usize) -> CalcResult<&IntervalResult> {
        self.details.interval(index)
    }

    pub fn len(&self) -> usize {
        self.details.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.intervals.is_empty()
    }

    pub fn finalize(self) -> LossDetails {
        self.details
    }
}

/// Finalized results at one point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossDetails {
    poi_id: usize,
    segment: String,
    friction: Vec<TendonFrictionResult>,
    intervals: Vec<IntervalResult>,
}

impl LossDetails {
    pub fn poi_id(&self) -> usize {
        self.poi_id
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn friction(&self) -> &[TendonFrictionResult] {
        &self.friction
    }

    pub fn friction_for(&self, duct: usize) -> Option<&TendonFrictionResult> {
        self.friction.iter().find(|f| f.duct == duct)
    }

    pub fn intervals(&self) -> &[IntervalResult] {
        &self.intervals
    }

    pub fn interval(&self, index: usize) -> CalcResult<&IntervalResult> {
        self.intervals.get(index).ok_or_else(|| {
            CalcError::out_of_order(
                location(&self.segment, Some(index), Some(self.poi_id)),
                format!("Only {} intervals have been finalized", self.intervals.len()),
            )
        })
    }

    pub fn cumulative_axial_kip(&self, interval: usize) -> CalcResult<ByProductLoad> {
        Ok(self.interval(interval)?.external_axial_kip.cumulative)
    }

    pub fn cumulative_moment_kipin(&self, interval: usize) -> CalcResult<ByProductLoad> {
        Ok(self.interval(interval)?.external_moment_kipin.cumulative)
    }

    pub fn cumulative_shear_kip(&self, interval: usize) -> CalcResult<ByProductLoad> {
        Ok(self.interval(interval)?.external_shear_kip.cumulative)
    }

    pub fn cumulative_strain(&self, interval: usize) -> CalcResult<ByProductLoad> {
        Ok(self.interval(interval)?.strain.cumulative)
    }

    pub fn cumulative_curvature(&self, interval: usize) -> CalcResult<ByProductLoad> {
        Ok(self.interval(interval)?.curvature.cumulative)
    }

    fn strand(&self, interval: usize, name: &str) -> CalcResult<&StrandResult> {
        self.interval(interval)?
            .strand(name)
            .ok_or_else(|| CalcError::missing_field(format!("strand group '{}' at poi {}", name, self.poi_id)))
    }

    /// Effective stress in a strand group at the end of `interval`
    pub fn effective_prestress_ksi(&self, interval: usize, strand: &str) -> CalcResult<f64> {
        Ok(self.strand(interval, strand)?.effective_stress_ksi())
    }

    pub fn prestress_loss_ksi(&self, interval: usize, strand: &str) -> CalcResult<f64> {
        Ok(self.strand(interval, strand)?.loss_ksi())
    }

    pub fn tendon_effective_stress_ksi(&self, interval: usize, duct: usize) -> CalcResult<f64> {
        self.interval(interval)?
            .tendon(duct)
            .map(TendonResult::effective_stress_ksi)
            .ok_or_else(|| CalcError::missing_field(format!("duct {} at poi {}", duct, self.poi_id)))
    }
}
