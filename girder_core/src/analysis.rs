//! # Analysis Run
//!
//! [`run`] validates a model, drives the time-step solver through every
//! interval and packages the finalized loss details with run metadata.
//! Capacity queries are made against the returned results.
//!
//! Running the same model twice produces identical loss details; only the
//! run id and completion timestamp differ.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::analysis::run;
//! use girder_core::file_io::load_model;
//! use std::path::Path;
//!
//! let model = load_model(Path::new("girder.json"))?;
//! let results = run(&model)?;
//! for row in results.loss_summary(model.timeline.last_index())? {
//!     println!("poi {} {}: {:.1} ksi", row.poi_id, row.element, row.loss_ksi);
//! }
//! # Ok::<(), girder_core::errors::CalcError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::accumulator::LossDetails;
use crate::capacity::CapacityAnalyzer;
use crate::errors::{location, CalcError, CalcResult};
use crate::loads::{ByProductLoad, ProductLoad};
use crate::model::{AnalysisSettings, GirderModel};
use crate::timestep::TimeStepSolver;

/// Identity of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub model_id: Uuid,
    pub model_name: String,
    pub segment: String,
    pub completed: DateTime<Utc>,
    pub intervals: usize,
}

/// Finalized loss details for every point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderLossResults {
    pub meta: RunMetadata,
    pub settings: AnalysisSettings,
    details: Vec<LossDetails>,
}

/// Solve every interval of `model` in order.
pub fn run(model: &GirderModel) -> CalcResult<GirderLossResults> {
    let mut solver = TimeStepSolver::new(model)?;
    solver.solve_all()?;
    let details = solver.finish()?;

    let meta = RunMetadata {
        run_id: Uuid::new_v4(),
        model_id: model.meta.id,
        model_name: model.meta.name.clone(),
        segment: model.segment.clone(),
        completed: Utc::now(),
        intervals: model.timeline.len(),
    };
    info!(run_id = %meta.run_id, model = %meta.model_name, points_of_interest = details.len(), "analysis complete");

    Ok(GirderLossResults {
        meta,
        settings: model.settings,
        details,
    })
}

/// One prestressing element's losses at the end of an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossSummaryRow {
    pub poi_id: usize,
    /// Strand group name or `Duct n`
    pub element: String,
    pub jacking_ksi: f64,
    pub effective_ksi: f64,
    /// Total loss from jacking
    pub loss_ksi: f64,
    pub creep_ksi: f64,
    pub shrinkage_ksi: f64,
    pub relaxation_ksi: f64,
}

impl LossSummaryRow {
    pub fn loss_percent(&self) -> f64 {
        if self.jacking_ksi > 0.0 {
            100.0 * self.loss_ksi / self.jacking_ksi
        } else {
            0.0
        }
    }
}

/// Time-dependent losses are the negated stress changes of each effect
fn time_dependent(stress: &ByProductLoad) -> (f64, f64, f64) {
    (
        -stress[ProductLoad::Creep],
        -stress[ProductLoad::Shrinkage],
        -stress[ProductLoad::Relaxation],
    )
}

impl GirderLossResults {
    pub fn all_details(&self) -> &[LossDetails] {
        &self.details
    }

    pub fn details(&self, poi_id: usize) -> CalcResult<&LossDetails> {
        self.details.iter().find(|d| d.poi_id() == poi_id).ok_or_else(|| {
            CalcError::configuration(location(&self.meta.segment, None, Some(poi_id)), "Unknown point of interest")
        })
    }

    /// Capacity queries against these results
    pub fn capacity<'a>(&'a self, model: &'a GirderModel) -> CapacityAnalyzer<'a> {
        CapacityAnalyzer::new(model, &self.details)
    }

    /// Loss rows for every stressed strand group and tendon
    pub fn loss_summary(&self, interval: usize) -> CalcResult<Vec<LossSummaryRow>> {
        let mut rows = Vec::new();
        for details in &self.details {
            let result = details.interval(interval)?;
            for s in result.strands.iter().filter(|s| s.stressed) {
                let (creep_ksi, shrinkage_ksi, relaxation_ksi) = time_dependent(&s.stress_ksi.cumulative);
                rows.push(LossSummaryRow {
                    poi_id: details.poi_id(),
                    element: s.name.clone(),
                    jacking_ksi: s.jacking_stress_ksi,
                    effective_ksi: s.effective_stress_ksi(),
                    loss_ksi: s.loss_ksi(),
                    creep_ksi,
                    shrinkage_ksi,
                    relaxation_ksi,
                });
            }
            for t in result.tendons.iter().filter(|t| t.stressed) {
                let (creep_ksi, shrinkage_ksi, relaxation_ksi) = time_dependent(&t.stress_ksi.cumulative);
                rows.push(LossSummaryRow {
                    poi_id: details.poi_id(),
                    element: format!("Duct {}", t.duct),
                    jacking_ksi: t.jacking_stress_ksi,
                    effective_ksi: t.effective_stress_ksi(),
                    loss_ksi: t.loss_ksi(),
                    creep_ksi,
                    shrinkage_ksi,
                    relaxation_ksi,
                });
            }
        }
        Ok(rows)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{ConcretePartResult, IntervalResult, Tracked};
    use crate::aging::Exposure;
    use crate::capacity::{BendingSense, CapacitySection, ShearReinforcement};
    use crate::loads::{AppliedLoadTable, LimitState, LiveLoadEnvelope};
    use crate::materials::{ConcreteMaterial, MaterialCatalog};
    use crate::section::properties::Trapezoid;
    use crate::section::{ConcretePart, ConcretePartKind, PointOfInterest, RebarPart, StrandPart, TendonPart};
    use crate::tendon::{JackingEnd, TendonInput, TendonPathSegment};
    use crate::timeline::{ConstructionEvent::*, Timeline};
    use approx::assert_relative_eq;

    const STRAND: &str = "0.5in Gr270 LR";

    fn girder(active: usize) -> ConcretePart {
        ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder",
            &[Trapezoid::rectangle(0.0, 12.0, 36.0)],
            Exposure::new(3.0, 70.0, 1.0),
            0.0,
            active,
        )
        .unwrap()
    }

    fn materials() -> MaterialCatalog {
        MaterialCatalog::standard().with_concrete(ConcreteMaterial::normal("Girder", 6.0, 4.5))
    }

    fn pretensioned() -> GirderModel {
        let timeline = Timeline::builder()
            .interval("Stress strands", 1.0, &[CastSegment, StressStrands])
            .interval("Release", 0.5, &[ReleasePrestress])
            .interval("Storage", 60.0, &[StoreSegment])
            .interval("Service", 5_000.0, &[OpenToTraffic, EndOfService])
            .build()
            .unwrap();
        let capacity = CapacitySection::new()
            .with_region("Girder", Trapezoid::rectangle(0.0, 12.0, 36.0))
            .with_shear(ShearReinforcement {
                bv_in: 12.0,
                av_in2: 0.4,
                spacing_in: 12.0,
                material: "A615 Gr 60".to_string(),
            });
        let poi = PointOfInterest::new(0, "S1", 240.0)
            .with_concrete(girder(1))
            .with_strand(StrandPart::straight("Bottom", STRAND, 8, 32.0, 202.5, 0, 1))
            .with_capacity(capacity);
        let loads = AppliedLoadTable::new()
            .with_load(0, 1, ProductLoad::Girder, 0.0, 2_000.0, 10.0)
            .with_live_load(LiveLoadEnvelope {
                poi_id: 0,
                moment_min_kipin: -500.0,
                moment_max_kipin: 3_000.0,
                shear_max_kip: 40.0,
            });
        GirderModel::new("Pretensioned", "S1", timeline, materials())
            .with_poi(poi)
            .with_loads(loads)
    }

    fn post_tensioned() -> GirderModel {
        let timeline = Timeline::builder()
            .interval("Cure", 28.0, &[CastSegment])
            .interval("Stress tendon", 1.0, &[StressTendons])
            .interval("Grout", 1.0, &[GroutTendons])
            .interval("Service", 10_000.0, &[EndOfService])
            .build()
            .unwrap();
        let tendon = TendonInput {
            name: "PT 1".to_string(),
            duct: 1,
            material: STRAND.to_string(),
            strand_count: 12,
            jacking_stress_ksi: 202.5,
            jacking_end: JackingEnd::Start,
            friction_coefficient: 0.25,
            wobble_per_ft: 0.0002,
            anchor_set_in: 0.375,
            path: vec![TendonPathSegment {
                length_in: 1_200.0,
                angle_change_rad: 0.2,
            }],
            stress_interval: 1,
            grout_interval: 2,
        };
        let duct = TendonPart {
            duct: 1,
            centroid_in: 30.0,
            slope: 0.0,
        };
        let mut model = GirderModel::new("Post-tensioned", "S1", timeline, materials()).with_tendon(tendon);
        for (id, x) in [(0, 60.0), (1, 1_100.0)] {
            model = model.with_poi(
                PointOfInterest::new(id, "S1", x)
                    .with_concrete(girder(1))
                    .with_tendon(duct),
            );
        }
        model
    }

    fn section_fields(r: &IntervalResult) -> [(&'static str, &Tracked); 5] {
        [
            ("external axial", &r.external_axial_kip),
            ("external moment", &r.external_moment_kipin),
            ("external shear", &r.external_shear_kip),
            ("strain", &r.strain),
            ("curvature", &r.curvature),
        ]
    }

    fn concrete_fields(c: &ConcretePartResult) -> [(&'static str, &Tracked); 6] {
        [
            ("axial", &c.axial_kip),
            ("moment", &c.moment_kipin),
            ("strain", &c.strain),
            ("curvature", &c.curvature),
            ("top stress", &c.stress_top_ksi),
            ("bottom stress", &c.stress_bottom_ksi),
        ]
    }

    macro_rules! steel_fields {
        ($part:expr) => {
            [("force", &$part.force_kip), ("stress", &$part.stress_ksi), ("strain", &$part.strain)]
        };
    }

    /// cumulative[i] == cumulative[i - 1] + incremental[i] for every product load
    fn assert_fields<const N: usize>(
        part: &str,
        interval: usize,
        previous: Option<[(&str, &Tracked); N]>,
        current: [(&str, &Tracked); N],
    ) {
        for (k, (field, tracked)) in current.iter().enumerate() {
            for load in ProductLoad::ALL {
                let before = previous.as_ref().map_or(0.0, |p| p[k].1.cumulative[load]);
                assert_eq!(
                    tracked.cumulative[load],
                    before + tracked.incremental[load],
                    "{} {} ({}) at interval {}",
                    part,
                    field,
                    load,
                    interval
                );
            }
        }
    }

    /// Every part, every tracked quantity, every product load, every interval
    fn assert_cumulative_history(details: &LossDetails) {
        let intervals = details.intervals();
        for (i, r) in intervals.iter().enumerate() {
            assert_eq!(r.interval, i);
            assert!(r.equilibrium.is_satisfied(), "equilibrium at interval {}", i);
            let previous = i.checked_sub(1).map(|k| &intervals[k]);
            assert_fields("section", i, previous.map(section_fields), section_fields(r));
            for (k, c) in r.concrete.iter().enumerate() {
                assert_fields(&c.name, i, previous.map(|p| concrete_fields(&p.concrete[k])), concrete_fields(c));
            }
            for (k, s) in r.strands.iter().enumerate() {
                assert_fields(&s.name, i, previous.map(|p| steel_fields!(p.strands[k])), steel_fields!(s));
            }
            for (k, t) in r.tendons.iter().enumerate() {
                let name = format!("duct {}", t.duct);
                assert_fields(&name, i, previous.map(|p| steel_fields!(p.tendons[k])), steel_fields!(t));
            }
            for (k, b) in r.rebar.iter().enumerate() {
                assert_fields(&b.name, i, previous.map(|p| steel_fields!(p.rebar[k])), steel_fields!(b));
            }
        }
    }

    #[test]
    fn test_pretensioned_losses_accumulate() {
        let model = pretensioned();
        let results = run(&model).unwrap();
        let details = results.details(0).unwrap();

        let losses: Vec<f64> = (0..4).map(|i| details.prestress_loss_ksi(i, "Bottom").unwrap()).collect();
        assert!(losses[0] > 0.0, "relaxation on the bed");
        for pair in losses.windows(2) {
            assert!(pair[1] >= pair[0], "loss decreased: {:?}", losses);
        }
        assert_cumulative_history(details);

        let rows = results.loss_summary(3).unwrap();
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].loss_ksi, losses[3], epsilon = 1e-12);
        assert!(rows[0].creep_ksi > 0.0);
        assert!(rows[0].shrinkage_ksi > 0.0);
        assert!(rows[0].relaxation_ksi > 0.0);
        assert!(rows[0].loss_percent() > 0.0 && rows[0].loss_percent() < 50.0);
    }

    #[test]
    fn test_deck_placement_elastic_gain() {
        let timeline = Timeline::builder()
            .interval("Release", 1.0, &[CastSegment, StressStrands, ReleasePrestress])
            .interval("Deck placement", 1.0, &[CastDeck])
            .interval("Final", 10_000.0, &[EndOfService])
            .build()
            .unwrap();
        let poi = PointOfInterest::new(0, "S1", 240.0)
            .with_concrete(girder(0))
            .with_strand(StrandPart::straight("Bottom", STRAND, 8, 32.0, 202.5, 0, 0));
        let loads = AppliedLoadTable::new().with_load(0, 1, ProductLoad::Slab, 0.0, 3_000.0, 0.0);
        let model = GirderModel::new("Deck placement", "S1", timeline, materials())
            .with_poi(poi)
            .with_loads(loads);
        let results = run(&model).unwrap();
        let details = results.details(0).unwrap();
        assert_eq!(details.intervals().len(), 3);
        assert_cumulative_history(details);

        let fpe: Vec<f64> = (0..3).map(|i| details.effective_prestress_ksi(i, "Bottom").unwrap()).collect();
        let loss: Vec<f64> = (0..3).map(|i| details.prestress_loss_ksi(i, "Bottom").unwrap()).collect();
        for i in 0..3 {
            assert_relative_eq!(fpe[i] + loss[i], 202.5, epsilon = 1e-9);
        }

        // elastic shortening and relaxation at release
        assert!(loss[0] > 0.0, "{:?}", loss);

        // slab weight on the bare girder stretches the bottom strands, so fpe
        // rises at deck placement and the loss drops
        let deck = details.interval(1).unwrap().strand("Bottom").unwrap();
        let gain = deck.stress_ksi.incremental[ProductLoad::Slab];
        assert!(gain > 5.0 && gain < 12.0, "elastic gain {}", gain);
        assert!(fpe[1] > fpe[0], "{:?}", fpe);
        assert!(loss[1] < loss[0], "{:?}", loss);
        assert_relative_eq!(fpe[1] - fpe[0], deck.stress_ksi.total_incremental(), epsilon = 1e-9);

        // long-term creep, shrinkage and relaxation outweigh the gain
        assert!(fpe[2] < fpe[1], "{:?}", fpe);
        assert!(loss[2] > loss[0], "{:?}", loss);
        let last = details.interval(2).unwrap().strand("Bottom").unwrap();
        assert!(last.stress_ksi.incremental[ProductLoad::Slab].abs() < 1e-9);
        assert_relative_eq!(last.stress_ksi.cumulative[ProductLoad::Slab], gain, epsilon = 1e-9);
    }

    #[test]
    fn test_history_accumulates_for_every_part() {
        let timeline = Timeline::builder()
            .interval("Stress strands", 1.0, &[CastSegment, StressStrands])
            .interval("Release", 0.5, &[ReleasePrestress])
            .interval("Stress tendon", 28.0, &[StressTendons])
            .interval("Grout", 1.0, &[GroutTendons])
            .interval("Deck placement", 1.0, &[CastDeck])
            .interval("Service", 5_000.0, &[OpenToTraffic, EndOfService])
            .build()
            .unwrap();
        let tendon = TendonInput {
            name: "PT 1".to_string(),
            duct: 1,
            material: STRAND.to_string(),
            strand_count: 6,
            jacking_stress_ksi: 202.5,
            jacking_end: JackingEnd::Start,
            friction_coefficient: 0.25,
            wobble_per_ft: 0.0002,
            anchor_set_in: 0.375,
            path: vec![TendonPathSegment {
                length_in: 1_200.0,
                angle_change_rad: 0.1,
            }],
            stress_interval: 2,
            grout_interval: 3,
        };
        let poi = PointOfInterest::new(0, "S1", 600.0)
            .with_concrete(girder(1))
            .with_strand(StrandPart::straight("Bottom", STRAND, 6, 33.0, 202.5, 0, 1))
            .with_tendon(TendonPart {
                duct: 1,
                centroid_in: 28.0,
                slope: 0.0,
            })
            .with_rebar(RebarPart {
                name: "Top bars".to_string(),
                material: "A615 Gr 60".to_string(),
                area_in2: 1.2,
                centroid_in: 3.0,
                active_interval: 1,
            });
        let loads = AppliedLoadTable::new()
            .with_load(0, 1, ProductLoad::Girder, 0.0, 2_000.0, 10.0)
            .with_load(0, 4, ProductLoad::Slab, 0.0, 1_500.0, 8.0)
            .with_load(0, 5, ProductLoad::UserDw, 0.0, 400.0, 2.0);
        let model = GirderModel::new("Hybrid", "S1", timeline, materials())
            .with_tendon(tendon)
            .with_poi(poi)
            .with_loads(loads);
        let results = run(&model).unwrap();
        let details = results.details(0).unwrap();
        assert_eq!(details.intervals().len(), 6);

        let last = details.interval(5).unwrap();
        assert_eq!(last.concrete.len(), 1);
        assert_eq!(last.strands.len(), 1);
        assert_eq!(last.tendons.len(), 1);
        assert_eq!(last.rebar.len(), 1);
        assert!(last.strands[0].bonded && last.tendons[0].grouted && last.rebar[0].active);

        assert_cumulative_history(details);

        // time-dependent columns grow after release in every bonded part
        for load in [ProductLoad::Creep, ProductLoad::Shrinkage] {
            assert!(last.strands[0].force_kip.cumulative[load] < 0.0, "{}", load);
            assert!(last.rebar[0].force_kip.cumulative[load] != 0.0, "{}", load);
        }
        assert!(last.concrete[0].axial_kip.cumulative[ProductLoad::PostTensioning] < 0.0);
    }

    #[test]
    fn test_post_tensioned_friction_and_anchor_set() {
        let model = post_tensioned();
        let results = run(&model).unwrap();

        let near = results.details(0).unwrap().friction_for(1).unwrap().at_poi;
        let far = results.details(1).unwrap().friction_for(1).unwrap().at_poi;
        assert!(near.anchor_set_loss_ksi > 0.0);
        assert_eq!(far.anchor_set_loss_ksi, 0.0);
        assert!(far.friction_loss_ksi > near.friction_loss_ksi);

        for details in results.all_details() {
            let cure = details.interval(0).unwrap().tendon(1).unwrap();
            assert!(!cure.stressed);
            let seated = details.friction_for(1).unwrap().at_poi.seated_stress_ksi;
            let stressed = details.interval(1).unwrap().tendon(1).unwrap();
            assert!(stressed.stressed && !stressed.grouted);
            assert_relative_eq!(
                stressed.stress_ksi.incremental[ProductLoad::PostTensioning],
                seated,
                epsilon = 1e-12
            );
            let mut previous = f64::INFINITY;
            for i in 1..4 {
                let fpe = details.tendon_effective_stress_ksi(i, 1).unwrap();
                assert!(fpe <= previous);
                previous = fpe;
            }
            assert!(details.interval(2).unwrap().tendon(1).unwrap().grouted);
            for r in details.intervals() {
                assert!(r.equilibrium.is_satisfied());
            }
        }
    }

    #[test]
    fn test_rerun_is_identical() {
        let model = post_tensioned();
        let first = run(&model).unwrap();
        let second = run(&model).unwrap();
        assert_ne!(first.meta.run_id, second.meta.run_id);
        assert_eq!(first.all_details(), second.all_details());
        assert_eq!(
            serde_json::to_string(first.all_details()).unwrap(),
            serde_json::to_string(second.all_details()).unwrap()
        );
    }

    #[test]
    fn test_capacity_after_losses() {
        let model = pretensioned();
        let results = run(&model).unwrap();
        let analyzer = results.capacity(&model);
        let cap = analyzer.analyze(0, 3, LimitState::StrengthI, BendingSense::Positive).unwrap();

        // 1.25 DC + 1.75 LL
        assert_relative_eq!(cap.demand.mu_kipin, 1.25 * 2_000.0 + 1.75 * 3_000.0, epsilon = 1e-9);
        assert_eq!(cap.moment.controlling, crate::capacity::strain_compatibility::CapacityMode::ConcreteCrushing);
        assert!(cap.moment.mn_kipin > 8_000.0 && cap.moment.mn_kipin < 10_500.0, "Mn = {}", cap.moment.mn_kipin);
        assert_eq!(cap.moment.phi, 1.0);
        assert!(cap.moment_ok());

        assert!(cap.cracking.fcpe_ksi > 0.0);
        assert_eq!(cap.cracking.sb_in3, cap.cracking.sbc_in3);
        assert!(cap.cracking.mcr_kipin >= cap.cracking.mcr_limit_kipin);

        let shear = cap.shear.unwrap();
        assert!(shear.vr_kip > 0.0);
        assert!(shear.vn_kip <= shear.vn_max_kip);

        // live load is not applied before the girder opens to traffic
        let storage = analyzer.analyze(0, 2, LimitState::StrengthI, BendingSense::Positive).unwrap();
        assert_relative_eq!(storage.demand.mu_kipin, 2_500.0, epsilon = 1e-9);

        // before release nothing is bonded and the girder is not active
        let err = analyzer.analyze(0, 0, LimitState::StrengthI, BendingSense::Positive).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION");
    }

    #[test]
    fn test_capacity_near_the_end_is_limited_by_development() {
        // 0.5 in strand: lt = 30 in, ld about 120 in
        let mut model = pretensioned().with_girder_length(1_200.0);
        let template = model.points_of_interest[0].clone();
        for (id, x) in [(1, 15.0), (2, 45.0)] {
            let mut poi = template.clone();
            poi.id = id;
            poi.x_in = x;
            model = model.with_poi(poi);
        }
        let results = run(&model).unwrap();
        for details in results.all_details() {
            assert_cumulative_history(details);
        }

        // half the transfer length carries half the strand area
        let release = |id: usize| results.details(id).unwrap().interval(1).unwrap().strand("Bottom").unwrap().clone();
        let (inner, end) = (release(0), release(1));
        assert_eq!(inner.transfer_factor, 1.0);
        assert_eq!(end.transfer_factor, 0.5);
        assert_relative_eq!(end.area_in2, 0.5 * inner.area_in2, epsilon = 1e-12);
        assert!(end.force_kip.total() < 0.6 * inner.force_kip.total());
        assert_eq!(release(2).transfer_factor, 1.0);

        let analyzer = results.capacity(&model);
        let cap = |id: usize| analyzer.analyze(id, 3, LimitState::StrengthI, BendingSense::Positive).unwrap();
        let (mid, within_ld, within_lt) = (cap(0), cap(2), cap(1));

        assert_eq!(mid.development.len(), 1);
        assert!(mid.development[0].is_fully_developed());
        assert!(mid.development[0].development_length_in > 45.0);

        let d = &within_ld.development[0];
        assert_eq!(d.bonded_length_in, 45.0);
        assert!(d.bond_factor > d.fpe_ksi / d.fps_ksi && d.bond_factor < 1.0, "{:?}", d);
        let d = &within_lt.development[0];
        assert_relative_eq!(d.bond_factor, 0.5 * d.fpe_ksi / d.fps_ksi, epsilon = 1e-12);

        let strand_area = |c: &crate::capacity::CapacityDetails| c.section.steel()[0].area_in2;
        assert_relative_eq!(strand_area(&mid), 8.0 * 0.153, epsilon = 1e-12);
        assert_relative_eq!(strand_area(&within_lt), d.bond_factor * 8.0 * 0.153, epsilon = 1e-12);

        assert!(within_lt.moment.mn_kipin < within_ld.moment.mn_kipin);
        assert!(within_ld.moment.mn_kipin < mid.moment.mn_kipin);
        assert!(within_lt.cracking.fcpe_ksi < mid.cracking.fcpe_ksi);
    }

    #[test]
    fn test_analyze_all_scopes_failures() {
        let model = pretensioned();
        let results = run(&model).unwrap();
        let all = results.capacity(&model).analyze_all(3, LimitState::StrengthI, BendingSense::Negative);
        assert_eq!(all.len(), 1);
        let (poi, outcome) = &all[0];
        assert_eq!(*poi, 0);
        let cap = outcome.as_ref().unwrap();
        assert!(cap.cracking.mcr_kipin < 0.0);
        assert!(cap.moment.mn_kipin < 0.0);
    }

    #[test]
    fn test_unknown_poi() {
        let model = pretensioned();
        let results = run(&model).unwrap();
        assert_eq!(results.details(42).unwrap_err().error_code(), "CONFIGURATION");
    }
}
