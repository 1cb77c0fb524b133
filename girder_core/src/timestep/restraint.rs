//! Free deformations and the forces that restrain them
//!
//! Creep in interval i from the force increment of an earlier interval j:
//!
//! ```text
//! eps_cr = [phi(t_end_i, tau_j) - phi(t_start_i, tau_j)] * dN_j / (E_j A)
//! kappa_cr = [phi(t_end_i, tau_j) - phi(t_start_i, tau_j)] * dM_j / (E_j I)
//! ```
//!
//! where tau_j is the concrete age at the middle of interval j and E_j the
//! modulus at that age. A fully restrained part carries
//! `-Ea A eps_free` and `-Ea I kappa_free`; strands and bonded tendons carry
//! `-fr A`.

use serde::{Deserialize, Serialize};

use crate::accumulator::{CreepContribution, IntervalResult};
use crate::aging::ConcreteAging;
use crate::section::ConcretePart;
use crate::timeline::Interval;

/// Unrestrained creep and shrinkage of one concrete part over one interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeDeformation {
    pub creep_strain: f64,
    pub creep_curvature: f64,
    pub shrinkage_strain: f64,
    pub contributions: Vec<CreepContribution>,
}

/// Forces that hold a concrete part at zero deformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRestraint {
    pub creep_force_kip: f64,
    pub creep_moment_kipin: f64,
    pub shrinkage_force_kip: f64,
}

impl FreeDeformation {
    /// Creep from every earlier increment of part `index` plus shrinkage
    /// over `interval`
    pub fn compute(
        part: &ConcretePart,
        index: usize,
        aging: &ConcreteAging,
        history: &[IntervalResult],
        intervals: &[Interval],
        interval: &Interval,
    ) -> Self {
        let age_start = part.age_at(interval.start_days);
        let age_end = part.age_at(interval.end_days);

        let mut free = FreeDeformation::default();
        for (earlier, result) in history.iter().enumerate() {
            let Some(prior) = result.concrete.get(index) else {
                continue;
            };
            if !prior.active || prior.e_ksi <= 0.0 {
                continue;
            }
            let dn = prior.axial_kip.total_incremental();
            let dm = prior.moment_kipin.total_incremental();
            if dn == 0.0 && dm == 0.0 {
                continue;
            }
            let Some(earlier_interval) = intervals.get(earlier) else {
                continue;
            };
            let loading_age = part.age_at(earlier_interval.middle_days);
            let dphi = aging.creep_coefficient(loading_age, age_end) - aging.creep_coefficient(loading_age, age_start);
            let contribution = CreepContribution {
                from_interval: earlier,
                strain: dphi * dn / (prior.e_ksi * part.area_in2),
                curvature: dphi * dm / (prior.e_ksi * part.inertia_in4),
            };
            free.creep_strain += contribution.strain;
            free.creep_curvature += contribution.curvature;
            free.contributions.push(contribution);
        }

        free.shrinkage_strain = aging.shrinkage_strain(age_end) - aging.shrinkage_strain(age_start.max(0.0));
        free
    }

    pub fn restraint(&self, e_age_adjusted_ksi: f64, part: &ConcretePart) -> ConcreteRestraint {
        ConcreteRestraint {
            creep_force_kip: -e_age_adjusted_ksi * part.area_in2 * self.creep_strain,
            creep_moment_kipin: -e_age_adjusted_ksi * part.inertia_in4 * self.creep_curvature,
            shrinkage_force_kip: -e_age_adjusted_ksi * part.area_in2 * self.shrinkage_strain,
        }
    }
}

/// Force holding a bonded strand or tendon at constant length while it relaxes
pub fn steel_restraint(relaxation_ksi: f64, area_in2: f64) -> f64 {
    -relaxation_ksi * area_in2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{ConcretePartResult, EquilibriumCheck, RestraintByEffect, Tracked};
    use crate::aging::{AgingMethod, Exposure, MaterialAgingModel, RelaxationMethod};
    use crate::loads::{ByProductLoad, ProductLoad};
    use crate::materials::ConcreteMaterial;
    use crate::section::properties::Trapezoid;
    use crate::section::{ConcretePartKind, TransformedSection};
    use crate::timeline::Timeline;
    use approx::assert_relative_eq;

    fn part() -> ConcretePart {
        ConcretePart::from_shape(
            "Girder",
            ConcretePartKind::Segment,
            "Girder",
            &[Trapezoid::rectangle(0.0, 10.0, 40.0)],
            Exposure::new(3.0, 70.0, 1.0),
            0.0,
            0,
        )
        .unwrap()
    }

    fn aging() -> ConcreteAging {
        let model = MaterialAgingModel::resolve(
            AgingMethod::Simplified {
                ultimate_creep: 2.0,
                ultimate_shrinkage: 0.0005,
                creep_half_time_days: 30.0,
                shrinkage_half_time_days: 50.0,
            },
            RelaxationMethod::LogTime,
        )
        .unwrap();
        model
            .for_concrete(&ConcreteMaterial::normal("Girder", 6.0, 4.5), Exposure::new(3.0, 70.0, 1.0))
            .unwrap()
    }

    fn loaded(dn: f64, dm: f64, e: f64) -> IntervalResult {
        IntervalResult {
            interval: 0,
            section: TransformedSection::default(),
            external_axial_kip: Tracked::default(),
            external_moment_kipin: Tracked::default(),
            external_shear_kip: Tracked::default(),
            restraint: RestraintByEffect::default(),
            strain: Tracked::default(),
            curvature: Tracked::default(),
            concrete: vec![ConcretePartResult {
                name: "Girder".to_string(),
                kind: ConcretePartKind::Segment,
                active: true,
                e_ksi: e,
                e_age_adjusted_ksi: e,
                creep_contributions: vec![],
                free_creep_strain: 0.0,
                free_creep_curvature: 0.0,
                free_shrinkage_strain: 0.0,
                creep_restraint_force_kip: 0.0,
                creep_restraint_moment_kipin: 0.0,
                shrinkage_restraint_force_kip: 0.0,
                axial_kip: Tracked::new(ByProductLoad::only(ProductLoad::Prestress, dn)),
                moment_kipin: Tracked::new(ByProductLoad::only(ProductLoad::Girder, dm)),
                strain: Tracked::default(),
                curvature: Tracked::default(),
                stress_top_ksi: Tracked::default(),
                stress_bottom_ksi: Tracked::default(),
                live_load_stress_top_ksi: None,
                live_load_stress_bottom_ksi: None,
            }],
            strands: vec![],
            tendons: vec![],
            rebar: vec![],
            equilibrium: EquilibriumCheck::default(),
        }
    }

    #[test]
    fn test_creep_from_prior_increment() {
        let timeline = Timeline::builder()
            .interval("Load", 2.0, &[])
            .interval("Creep", 100.0, &[])
            .build()
            .unwrap();
        let p = part();
        let a = aging();
        let history = vec![loaded(-400.0, 1000.0, 4000.0)];
        let free = FreeDeformation::compute(&p, 0, &a, &history, timeline.intervals(), &timeline.intervals()[1]);

        let dphi = a.creep_coefficient(1.0, 102.0) - a.creep_coefficient(1.0, 2.0);
        assert_relative_eq!(free.creep_strain, dphi * -400.0 / (4000.0 * 400.0), epsilon = 1e-15);
        assert_relative_eq!(free.creep_curvature, dphi * 1000.0 / (4000.0 * p.inertia_in4), epsilon = 1e-15);
        assert_eq!(free.contributions.len(), 1);
        assert!(free.shrinkage_strain < 0.0);
    }

    #[test]
    fn test_restraint_round_trip() {
        let p = part();
        let free = FreeDeformation {
            creep_strain: -1.2e-4,
            creep_curvature: 3.0e-7,
            shrinkage_strain: -8.0e-5,
            contributions: vec![],
        };
        let ea = 2_500.0;
        let r = free.restraint(ea, &p);
        // the restraint is the elastic force that reproduces the free deformation, negated
        assert_relative_eq!(-r.creep_force_kip / (ea * p.area_in2), free.creep_strain, epsilon = 1e-18);
        assert_relative_eq!(-r.creep_moment_kipin / (ea * p.inertia_in4), free.creep_curvature, epsilon = 1e-18);
        assert_relative_eq!(-r.shrinkage_force_kip / (ea * p.area_in2), free.shrinkage_strain, epsilon = 1e-18);
        assert_relative_eq!(steel_restraint(2.5, 0.918), -2.295, epsilon = 1e-12);
    }
}
