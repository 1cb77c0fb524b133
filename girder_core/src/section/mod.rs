//! # Section Geometry
//!
//! A girder is evaluated at points of interest. Each point carries the parts
//! that make up its cross section over the life of the girder: precast
//! segment, closure joint and deck concrete, pretensioned strands, tendons
//! and mild reinforcement. Parts switch on at their activation interval.
//!
//! All depths are measured downward from the top of the precast girder, so
//! deck parts have negative depths.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::aging::Exposure;
//! use girder_core::section::{ConcretePart, ConcretePartKind, PointOfInterest, StrandPart};
//! use girder_core::section::properties::Trapezoid;
//!
//! let girder = ConcretePart::from_shape(
//!     "Girder",
//!     ConcretePartKind::Segment,
//!     "Girder 8 ksi",
//!     &[Trapezoid::rectangle(0.0, 18.0, 48.0)],
//!     Exposure::new(4.0, 70.0, 1.0),
//!     0.0,
//!     1,
//! ).unwrap();
//!
//! let poi = PointOfInterest::new(0, "S1", 360.0)
//!     .with_concrete(girder)
//!     .with_strand(StrandPart::straight("Bottom", "0.6in Gr270 LR", 12, 44.0, 202.5, 0, 1));
//!
//! poi.validate().unwrap();
//! assert_eq!(poi.girder_parts().count(), 1);
//! ```

pub mod properties;
pub mod transformed;

pub use transformed::{SectionComponent, TransformedSection, TransformedSectionBuilder};

use serde::{Deserialize, Serialize};

use crate::aging::Exposure;
use crate::capacity::CapacitySection;
use crate::errors::{location, CalcError, CalcResult};
use crate::materials::StrandMaterial;
use properties::{GrossProperties, Trapezoid};

// ============================================================================
// Concrete
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcretePartKind {
    Segment,
    ClosureJoint,
    Deck,
}

impl ConcretePartKind {
    /// Part of the non-composite girder section
    pub fn is_girder(&self) -> bool {
        !matches!(self, ConcretePartKind::Deck)
    }
}

/// Concrete part of the cross section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcretePart {
    pub name: String,
    pub kind: ConcretePartKind,
    /// Concrete material name in the catalog
    pub material: String,
    /// Net area
    pub area_in2: f64,
    pub centroid_in: f64,
    pub inertia_in4: f64,
    pub y_top_in: f64,
    pub y_bottom_in: f64,
    pub exposure: Exposure,
    /// Time of casting on the timeline
    pub cast_days: f64,
    /// First interval in which the part carries load
    pub active_interval: usize,
}

impl ConcretePart {
    /// Part with properties computed from stacked trapezoids
    pub fn from_shape(
        name: impl Into<String>,
        kind: ConcretePartKind,
        material: impl Into<String>,
        shape: &[Trapezoid],
        exposure: Exposure,
        cast_days: f64,
        active_interval: usize,
    ) -> CalcResult<Self> {
        let props = GrossProperties::from_trapezoids(shape)?;
        Ok(ConcretePart {
            name: name.into(),
            kind,
            material: material.into(),
            area_in2: props.area_in2,
            centroid_in: props.centroid_in,
            inertia_in4: props.inertia_in4,
            y_top_in: props.y_top_in,
            y_bottom_in: props.y_bottom_in,
            exposure,
            cast_days,
            active_interval,
        })
    }

    pub fn height_in(&self) -> f64 {
        self.y_bottom_in - self.y_top_in
    }

    pub fn is_active(&self, interval: usize) -> bool {
        interval >= self.active_interval
    }

    /// Concrete age at time `t_days`
    pub fn age_at(&self, t_days: f64) -> f64 {
        t_days - self.cast_days
    }

    pub fn gross_properties(&self) -> GrossProperties {
        GrossProperties {
            area_in2: self.area_in2,
            centroid_in: self.centroid_in,
            inertia_in4: self.inertia_in4,
            y_top_in: self.y_top_in,
            y_bottom_in: self.y_bottom_in,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        let field = |f: &str| format!("{}.{}", self.name, f);
        for (f, v) in [("area_in2", self.area_in2), ("inertia_in4", self.inertia_in4)] {
            if !(v > 0.0) || !v.is_finite() {
                return Err(CalcError::invalid_input(field(f), v.to_string(), "Must be positive"));
            }
        }
        if !(self.y_top_in < self.y_bottom_in) {
            return Err(CalcError::invalid_input(
                field("y_bottom_in"),
                self.y_bottom_in.to_string(),
                "Bottom face must lie below the top face",
            ));
        }
        if self.centroid_in < self.y_top_in || self.centroid_in > self.y_bottom_in {
            return Err(CalcError::invalid_input(
                field("centroid_in"),
                self.centroid_in.to_string(),
                "Centroid must lie between the faces",
            ));
        }
        self.exposure.validate()
    }
}

// ============================================================================
// Prestressing steel
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrandKind {
    Straight,
    Harped,
    Temporary,
}

/// Group of pretensioned strands with a common centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandPart {
    pub name: String,
    pub kind: StrandKind,
    /// Strand material name in the catalog
    pub material: String,
    pub strand_count: u32,
    pub centroid_in: f64,
    /// Vertical slope dy/dx of a harped group
    #[serde(default)]
    pub slope: f64,
    pub jacking_stress_ksi: f64,
    pub stress_interval: usize,
    /// Interval in which the strands are released and bonded
    pub release_interval: usize,
    /// Interval in which temporary strands are cut
    #[serde(default)]
    pub removal_interval: Option<usize>,
    /// Debonded length at the start of the girder
    #[serde(default)]
    pub debond_start_in: f64,
    /// Debonded length at the end of the girder
    #[serde(default)]
    pub debond_end_in: f64,
}

impl StrandPart {
    pub fn straight(
        name: impl Into<String>,
        material: impl Into<String>,
        strand_count: u32,
        centroid_in: f64,
        jacking_stress_ksi: f64,
        stress_interval: usize,
        release_interval: usize,
    ) -> Self {
        StrandPart {
            name: name.into(),
            kind: StrandKind::Straight,
            material: material.into(),
            strand_count,
            centroid_in,
            slope: 0.0,
            jacking_stress_ksi,
            stress_interval,
            release_interval,
            removal_interval: None,
            debond_start_in: 0.0,
            debond_end_in: 0.0,
        }
    }

    pub fn debonded(mut self, start_in: f64, end_in: f64) -> Self {
        self.debond_start_in = start_in;
        self.debond_end_in = end_in;
        self
    }

    pub fn is_debonded(&self) -> bool {
        self.debond_start_in > 0.0 || self.debond_end_in > 0.0
    }

    pub fn harped(mut self, slope: f64) -> Self {
        self.kind = StrandKind::Harped;
        self.slope = slope;
        self
    }

    pub fn temporary(mut self, removal_interval: usize) -> Self {
        self.kind = StrandKind::Temporary;
        self.removal_interval = Some(removal_interval);
        self
    }

    pub fn area_in2(&self, strand: &StrandMaterial) -> f64 {
        f64::from(self.strand_count) * strand.area_in2
    }

    /// Bonded and carrying section forces during `interval`
    pub fn is_bonded(&self, interval: usize) -> bool {
        interval >= self.release_interval && self.removal_interval.map_or(true, |r| interval < r)
    }

    /// Tensioned against the bed, not yet released
    pub fn is_on_bed(&self, interval: usize) -> bool {
        interval >= self.stress_interval && interval < self.release_interval
    }

    pub fn validate(&self) -> CalcResult<()> {
        let ctx = format!("strand group '{}'", self.name);
        if self.strand_count == 0 {
            return Err(CalcError::invalid_input(
                format!("{}.strand_count", self.name),
                "0",
                "Strand group has no strands",
            ));
        }
        if !(self.jacking_stress_ksi > 0.0) {
            return Err(CalcError::invalid_input(
                format!("{}.jacking_stress_ksi", self.name),
                self.jacking_stress_ksi.to_string(),
                "Jacking stress must be positive",
            ));
        }
        for (field, value) in [("debond_start_in", self.debond_start_in), ("debond_end_in", self.debond_end_in)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.name, field),
                    value.to_string(),
                    "Debonded length cannot be negative",
                ));
            }
        }
        if self.stress_interval > self.release_interval {
            return Err(CalcError::configuration(ctx, "Strands are released before they are stressed"));
        }
        match (self.kind, self.removal_interval) {
            (StrandKind::Temporary, Some(r)) if r <= self.release_interval => Err(CalcError::configuration(
                ctx,
                format!("Removal interval {} must follow release interval {}", r, self.release_interval),
            )),
            (StrandKind::Straight | StrandKind::Harped, Some(_)) => {
                Err(CalcError::configuration(ctx, "Only temporary strands can be removed"))
            }
            _ => Ok(()),
        }
    }
}

/// Location of a post-tensioning duct at a point of interest. The duct
/// itself is described by [`crate::tendon::TendonInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TendonPart {
    pub duct: usize,
    pub centroid_in: f64,
    #[serde(default)]
    pub slope: f64,
}

/// Mild reinforcement, elastic with no aging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarPart {
    pub name: String,
    pub material: String,
    pub area_in2: f64,
    pub centroid_in: f64,
    pub active_interval: usize,
}

impl RebarPart {
    pub fn is_active(&self, interval: usize) -> bool {
        interval >= self.active_interval
    }
}

// ============================================================================
// Point of interest
// ============================================================================

/// Longitudinal location at which the section is analyzed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: usize,
    /// Girder segment the point belongs to
    pub segment: String,
    /// Distance from the start of the girder, also the tendon coordinate
    pub x_in: f64,
    pub concrete: Vec<ConcretePart>,
    #[serde(default)]
    pub strands: Vec<StrandPart>,
    #[serde(default)]
    pub tendons: Vec<TendonPart>,
    #[serde(default)]
    pub rebar: Vec<RebarPart>,
    #[serde(default)]
    pub capacity: Option<CapacitySection>,
}

impl PointOfInterest {
    pub fn new(id: usize, segment: impl Into<String>, x_in: f64) -> Self {
        PointOfInterest {
            id,
            segment: segment.into(),
            x_in,
            concrete: Vec::new(),
            strands: Vec::new(),
            tendons: Vec::new(),
            rebar: Vec::new(),
            capacity: None,
        }
    }

    pub fn with_concrete(mut self, part: ConcretePart) -> Self {
        self.concrete.push(part);
        self
    }

    pub fn with_strand(mut self, part: StrandPart) -> Self {
        self.strands.push(part);
        self
    }

    pub fn with_tendon(mut self, part: TendonPart) -> Self {
        self.tendons.push(part);
        self
    }

    pub fn with_rebar(mut self, part: RebarPart) -> Self {
        self.rebar.push(part);
        self
    }

    pub fn with_capacity(mut self, section: CapacitySection) -> Self {
        self.capacity = Some(section);
        self
    }

    /// Segment and closure joint concrete
    pub fn girder_parts(&self) -> impl Iterator<Item = &ConcretePart> {
        self.concrete.iter().filter(|c| c.kind.is_girder())
    }

    pub fn deck_parts(&self) -> impl Iterator<Item = &ConcretePart> {
        self.concrete.iter().filter(|c| c.kind == ConcretePartKind::Deck)
    }

    pub fn concrete_part(&self, name: &str) -> Option<&ConcretePart> {
        self.concrete.iter().find(|c| c.name == name)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.concrete.is_empty() {
            return Err(CalcError::configuration(
                location(&self.segment, None, Some(self.id)),
                "Section has no concrete parts",
            ));
        }
        for part in &self.concrete {
            part.validate()?;
        }
        for strand in &self.strands {
            strand.validate()?;
        }
        let mut names: Vec<&str> = self
            .concrete
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.strands.iter().map(|s| s.name.as_str()))
            .chain(self.rebar.iter().map(|r| r.name.as_str()))
            .collect();
        names.sort_unstable();
        if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(CalcError::configuration(
                location(&self.segment, None, Some(self.id)),
                format!("Duplicate part name '{}'", w[0]),
            ));
        }
        for rebar in &self.rebar {
            if !(rebar.area_in2 > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("{}.area_in2", rebar.name),
                    rebar.area_in2.to_string(),
                    "Must be positive",
                ));
            }
        }
        if let Some(capacity) = &self.capacity {
            capacity.validate(self)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn girder() -> ConcretePart {
        ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder",
            &[Trapezoid::rectangle(0.0, 12.0, 36.0)],
            Exposure::new(3.0, 70.0, 1.0),
            0.0,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_from_shape() {
        let g = girder();
        assert_eq!(g.area_in2, 432.0);
        assert_eq!(g.centroid_in, 18.0);
        assert_eq!(g.height_in(), 36.0);
        assert!(!g.is_active(0));
        assert!(g.is_active(1));
    }

    #[test]
    fn test_strand_activity() {
        let s = StrandPart::straight("Temp", "0.6in Gr270 LR", 2, 2.0, 202.5, 0, 1).temporary(3);
        assert!(s.is_on_bed(0));
        assert!(!s.is_bonded(0));
        assert!(s.is_bonded(1) && s.is_bonded(2));
        assert!(!s.is_bonded(3));
        s.validate().unwrap();
    }

    #[test]
    fn test_strand_validation() {
        let early = StrandPart::straight("S", "x", 4, 30.0, 202.5, 2, 1);
        assert!(matches!(early.validate(), Err(CalcError::Configuration { .. })));

        let mut removed = StrandPart::straight("S", "x", 4, 30.0, 202.5, 0, 1);
        removed.removal_interval = Some(3);
        assert!(removed.validate().is_err());

        let cut_early = StrandPart::straight("S", "x", 4, 30.0, 202.5, 0, 1).temporary(1);
        assert!(cut_early.validate().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let poi = PointOfInterest::new(3, "S1", 0.0).with_concrete(girder()).with_concrete(girder());
        let err = poi.validate().unwrap_err();
        assert!(err.to_string().contains("poi 3"));
    }

    #[test]
    fn test_empty_section_rejected() {
        assert!(PointOfInterest::new(0, "S1", 0.0).validate().is_err());
    }
}
