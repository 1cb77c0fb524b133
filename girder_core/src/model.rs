//! # Girder Model
//!
//! `GirderModel` is the root container for one girder segment chain: the
//! construction timeline, the material catalog, the points of interest with
//! their section parts, the tendons, and the loads handed over by the
//! structural analysis. Models serialize to JSON.
//!
//! ## Structure
//!
//! ```text
//! GirderModel
//! ├── meta: ModelMetadata (schema version, id, timestamps)
//! ├── settings: AnalysisSettings (aging method, tolerances, capacity factors)
//! ├── timeline: Timeline
//! ├── materials: MaterialCatalog
//! ├── points_of_interest: Vec<PointOfInterest>
//! ├── tendons: Vec<TendonInput>
//! └── loads: AppliedLoadTable
//! ```
//!
//! ## Example
//!
//! ```rust
//! use girder_core::materials::MaterialCatalog;
//! use girder_core::model::GirderModel;
//! use girder_core::timeline::{ConstructionEvent, Timeline};
//!
//! let timeline = Timeline::builder()
//!     .interval("Cast", 1.0, &[ConstructionEvent::CastSegment])
//!     .build()
//!     .unwrap();
//! let model = GirderModel::new("Span 1 Girder A", "S1", timeline, MaterialCatalog::standard());
//!
//! let json = model.to_json().unwrap();
//! let back = GirderModel::from_json(&json).unwrap();
//! assert_eq!(back.meta.id, model.meta.id);
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aging::{AgingMethod, MaterialAgingModel, RelaxationMethod};
use crate::bond;
use crate::capacity::cracking::CrackingFactors;
use crate::errors::{location, CalcError, CalcResult};
use crate::loads::AppliedLoadTable;
use crate::materials::MaterialCatalog;
use crate::section::{ConcretePartKind, PointOfInterest, StrandPart};
use crate::tendon::TendonInput;
use crate::timeline::{ConstructionEvent, Timeline};

/// Current schema version for model files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root model container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderModel {
    pub meta: ModelMetadata,

    pub settings: AnalysisSettings,

    /// Girder segment identity used in error locations
    pub segment: String,

    /// End-to-end length of the girder. Without it strands are taken as
    /// fully transferred and developed at every point of interest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub girder_length_in: Option<f64>,

    pub timeline: Timeline,

    pub materials: MaterialCatalog,

    pub points_of_interest: Vec<PointOfInterest>,

    #[serde(default)]
    pub tendons: Vec<TendonInput>,

    #[serde(default)]
    pub loads: AppliedLoadTable,
}

impl GirderModel {
    /// Create a model with default settings and no points of interest.
    pub fn new(name: impl Into<String>, segment: impl Into<String>, timeline: Timeline, materials: MaterialCatalog) -> Self {
        let now = Utc::now();
        GirderModel {
            meta: ModelMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            segment: segment.into(),
            girder_length_in: None,
            timeline,
            materials,
            points_of_interest: Vec::new(),
            tendons: Vec::new(),
            loads: AppliedLoadTable::default(),
        }
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_girder_length(mut self, length_in: f64) -> Self {
        self.girder_length_in = Some(length_in);
        self
    }

    pub fn with_poi(mut self, poi: PointOfInterest) -> Self {
        self.points_of_interest.push(poi);
        self
    }

    pub fn with_tendon(mut self, tendon: TendonInput) -> Self {
        self.tendons.push(tendon);
        self
    }

    pub fn with_loads(mut self, loads: AppliedLoadTable) -> Self {
        self.loads = loads;
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn poi(&self, id: usize) -> Option<&PointOfInterest> {
        self.points_of_interest.iter().find(|p| p.id == id)
    }

    pub fn tendon(&self, duct: usize) -> Option<&TendonInput> {
        self.tendons.iter().find(|t| t.duct == duct)
    }

    /// Distance from `poi` to the nearer start of bond of `strand`, when the
    /// girder length is known
    pub fn strand_bonded_length_in(&self, poi: &PointOfInterest, strand: &StrandPart) -> Option<f64> {
        self.girder_length_in
            .map(|length| bond::bonded_length_in(poi.x_in, length, strand.debond_start_in, strand.debond_end_in))
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the aging laws selected in the settings
    pub fn aging_model(&self) -> CalcResult<MaterialAgingModel> {
        MaterialAgingModel::resolve(self.settings.aging_method, self.settings.relaxation_method)
    }

    /// Check the model before any interval is solved
    pub fn validate(&self) -> CalcResult<()> {
        self.timeline.validate()?;
        self.materials.validate()?;
        self.settings.validate()?;
        self.aging_model()?;
        self.loads.validate()?;
        if let Some(length) = self.girder_length_in {
            if !(length > 0.0) || !length.is_finite() {
                return Err(CalcError::invalid_input("girder_length_in", length.to_string(), "Must be positive"));
            }
        }

        let n = self.timeline.len();
        let in_range = |what: String, interval: usize| -> CalcResult<()> {
            if interval >= n {
                return Err(CalcError::configuration(
                    location(&self.segment, Some(interval), None),
                    format!("{} refers to an interval beyond the timeline ({} intervals)", what, n),
                ));
            }
            Ok(())
        };
        let require_event = |what: String, interval: usize, event: ConstructionEvent| -> CalcResult<()> {
            self.timeline.require_event(event)?;
            if !self.timeline.interval(interval)?.has_event(event) {
                return Err(CalcError::configuration(
                    location(&self.segment, Some(interval), None),
                    format!("{} expects the '{}' event in this interval", what, event.description()),
                ));
            }
            Ok(())
        };

        let mut ducts = HashSet::new();
        for tendon in &self.tendons {
            tendon.validate()?;
            if !ducts.insert(tendon.duct) {
                return Err(CalcError::configuration(
                    location(&self.segment, None, None),
                    format!("Duct {} is defined twice", tendon.duct),
                ));
            }
            self.materials.strand(&tendon.material)?;
            in_range(format!("Tendon '{}'", tendon.name), tendon.grout_interval)?;
            require_event(format!("Tendon '{}'", tendon.name), tendon.stress_interval, ConstructionEvent::StressTendons)?;
        }

        let mut ids = HashSet::new();
        for poi in &self.points_of_interest {
            if !ids.insert(poi.id) {
                return Err(CalcError::configuration(
                    location(&self.segment, None, Some(poi.id)),
                    "Point of interest id is not unique",
                ));
            }
            poi.validate()?;
            let ctx = |interval: Option<usize>| location(&self.segment, interval, Some(poi.id));

            for part in &poi.concrete {
                self.materials.concrete(&part.material)?;
                in_range(format!("Concrete part '{}'", part.name), part.active_interval)?;
                let start = self.timeline.interval(part.active_interval)?.start_days;
                if part.cast_days > start + 1e-9 {
                    return Err(CalcError::configuration(
                        ctx(Some(part.active_interval)),
                        format!("Concrete part '{}' carries load before it is cast", part.name),
                    ));
                }
                if part.kind == ConcretePartKind::Deck {
                    require_event(format!("Deck '{}'", part.name), part.active_interval, ConstructionEvent::CompositeDeck)?;
                }
            }
            if let Some(length) = self.girder_length_in {
                if poi.x_in < 0.0 || poi.x_in > length {
                    return Err(CalcError::configuration(
                        ctx(None),
                        format!("Point of interest at {} in lies off the {} in girder", poi.x_in, length),
                    ));
                }
            }
            for strand in &poi.strands {
                self.materials.strand(&strand.material)?;
                if let Some(length) = self.girder_length_in {
                    if strand.debond_start_in + strand.debond_end_in >= length {
                        return Err(CalcError::configuration(
                            ctx(None),
                            format!("Strand group '{}' is debonded over the whole girder", strand.name),
                        ));
                    }
                }
                in_range(format!("Strand group '{}'", strand.name), strand.removal_interval.unwrap_or(strand.release_interval))?;
                require_event(
                    format!("Strand group '{}'", strand.name),
                    strand.release_interval,
                    ConstructionEvent::ReleasePrestress,
                )?;
            }
            for tendon in &poi.tendons {
                if self.tendon(tendon.duct).is_none() {
                    return Err(CalcError::configuration(ctx(None), format!("Duct {} is not defined", tendon.duct)));
                }
            }
            for rebar in &poi.rebar {
                self.materials.rebar(&rebar.material)?;
                in_range(format!("Rebar '{}'", rebar.name), rebar.active_interval)?;
            }
        }

        for load in &self.loads.loads {
            if !ids.contains(&load.poi_id) {
                return Err(CalcError::configuration(
                    location(&self.segment, Some(load.interval), Some(load.poi_id)),
                    "Load refers to an unknown point of interest",
                ));
            }
            in_range(format!("{} load", load.load), load.interval)?;
        }
        Ok(())
    }
}

/// Model metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    pub name: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Analysis options, selected once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub aging_method: AgingMethod,

    pub relaxation_method: RelaxationMethod,

    /// Aging coefficient chi of the age-adjusted effective modulus
    pub aging_coefficient: f64,

    /// Relative tolerance of the per-interval equilibrium check
    pub equilibrium_tolerance: f64,

    pub cracking: CrackingFactors,

    /// Number of layers each concrete region is sliced into for capacity
    pub capacity_slices: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            aging_method: AgingMethod::AashtoRefined,
            relaxation_method: RelaxationMethod::LogTime,
            aging_coefficient: 0.7,
            equilibrium_tolerance: 1.0e-6,
            cracking: CrackingFactors::default(),
            capacity_slices: 200,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !(0.0..=1.0).contains(&self.aging_coefficient) {
            return Err(CalcError::invalid_input(
                "aging_coefficient",
                self.aging_coefficient.to_string(),
                "Aging coefficient must be between 0 and 1",
            ));
        }
        if !(self.equilibrium_tolerance > 0.0) {
            return Err(CalcError::invalid_input(
                "equilibrium_tolerance",
                self.equilibrium_tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        if self.capacity_slices < 10 {
            return Err(CalcError::invalid_input(
                "capacity_slices",
                self.capacity_slices.to_string(),
                "Use at least 10 slices per region",
            ));
        }
        self.cracking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::Exposure;
    use crate::loads::ProductLoad;
    use crate::materials::ConcreteMaterial;
    use crate::section::properties::Trapezoid;
    use crate::section::{ConcretePart, StrandPart};

    fn timeline() -> Timeline {
        Timeline::builder()
            .interval("Stress", 1.0, &[ConstructionEvent::CastSegment, ConstructionEvent::StressStrands])
            .interval("Release", 0.5, &[ConstructionEvent::ReleasePrestress])
            .interval("Final", 10_000.0, &[ConstructionEvent::EndOfService])
            .build()
            .unwrap()
    }

    fn model() -> GirderModel {
        let girder = ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder",
            &[Trapezoid::rectangle(0.0, 12.0, 36.0)],
            Exposure::new(3.0, 70.0, 1.0),
            0.0,
            1,
        )
        .unwrap();
        let poi = PointOfInterest::new(0, "S1", 0.0)
            .with_concrete(girder)
            .with_strand(StrandPart::straight("Bottom", "0.5in Gr270 LR", 6, 33.0, 202.5, 0, 1));
        GirderModel::new(
            "Test",
            "S1",
            timeline(),
            MaterialCatalog::standard().with_concrete(ConcreteMaterial::normal("Girder", 6.0, 4.5)),
        )
        .with_poi(poi)
    }

    #[test]
    fn test_valid_model() {
        model().validate().unwrap();
    }

    #[test]
    fn test_default_settings() {
        let s = AnalysisSettings::default();
        assert_eq!(s.aging_coefficient, 0.7);
        assert_eq!(s.equilibrium_tolerance, 1e-6);
        assert_eq!(s.aging_method, AgingMethod::AashtoRefined);
    }

    #[test]
    fn test_missing_material() {
        let mut m = model();
        m.points_of_interest[0].concrete[0].material = "Nope".to_string();
        assert_eq!(m.validate().unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_release_without_event_rejected() {
        let mut m = model();
        m.points_of_interest[0].strands[0].release_interval = 2;
        m.points_of_interest[0].concrete[0].active_interval = 2;
        let err = m.validate().unwrap_err();
        assert!(matches!(err, CalcError::Configuration { .. }));
    }

    #[test]
    fn test_load_on_unknown_poi_rejected() {
        let m = model().with_loads(AppliedLoadTable::new().with_load(9, 1, ProductLoad::Girder, 0.0, 1.0, 0.0));
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_girder_length_bounds_points_and_debonding() {
        model().with_girder_length(1_200.0).validate().unwrap();
        assert!(model().with_girder_length(0.0).validate().is_err());

        let mut off = model().with_girder_length(1_200.0);
        off.points_of_interest[0].x_in = 1_300.0;
        assert_eq!(off.validate().unwrap_err().error_code(), "CONFIGURATION");

        let mut debonded = model().with_girder_length(1_200.0);
        debonded.points_of_interest[0].strands[0] = debonded.points_of_interest[0].strands[0].clone().debonded(600.0, 600.0);
        assert_eq!(debonded.validate().unwrap_err().error_code(), "CONFIGURATION");

        let mut negative = model();
        negative.points_of_interest[0].strands[0].debond_start_in = -1.0;
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let m = model();
        let back = GirderModel::from_json(&m.to_json().unwrap()).unwrap();
        assert_eq!(back, m);
    }
}
