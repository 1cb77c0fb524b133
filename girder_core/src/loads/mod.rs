//! Applied loads, product loads and limit states
//!
//! The global structural analysis is outside this crate. It hands over an
//! [`AppliedLoadTable`]: incremental axial force, moment and shear at each
//! point of interest, per interval and per product load, plus the live load
//! envelope. Loads the time-step solver generates itself (prestress,
//! post-tensioning, creep, shrinkage, relaxation) may not appear in it.
//!
//! # Overview
//!
//! - [`ProductLoad`] - fixed set of product load types
//! - [`ByProductLoad`] - enum-indexed array of per-product-load values
//! - [`AppliedLoadTable`] - external load increments
//! - [`LimitState`] / [`LoadCombination`] - LRFD load factors
//!
//! # Example
//!
//! ```
//! use girder_core::loads::{AppliedLoadTable, ProductLoad};
//!
//! let table = AppliedLoadTable::new()
//!     .with_load(0, 1, ProductLoad::Girder, 0.0, 15_000.0, 0.0)
//!     .with_load(0, 4, ProductLoad::Slab, 0.0, 12_000.0, 0.0);
//! table.validate().unwrap();
//!
//! let index = table.indexed();
//! assert_eq!(index[&(0, 1)].moment_kipin[ProductLoad::Girder], 15_000.0);
//! ```

pub mod limit_states;
pub mod product_loads;

pub use limit_states::{LimitState, LoadCombination};
pub use product_loads::{ByProductLoad, LoadClass, ProductLoad, TimeDependentEffect};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One external load increment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedLoad {
    pub poi_id: usize,
    pub interval: usize,
    pub load: ProductLoad,
    #[serde(default)]
    pub axial_kip: f64,
    /// Moment about the transformed section centroid (kip-in)
    #[serde(default)]
    pub moment_kipin: f64,
    #[serde(default)]
    pub shear_kip: f64,
}

/// Live load effects at a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveLoadEnvelope {
    pub poi_id: usize,
    pub moment_min_kipin: f64,
    pub moment_max_kipin: f64,
    #[serde(default)]
    pub shear_max_kip: f64,
}

/// Incremental external effects at one point of interest in one interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadIncrement {
    pub axial_kip: ByProductLoad,
    pub moment_kipin: ByProductLoad,
    pub shear_kip: ByProductLoad,
}

impl LoadIncrement {
    pub fn accumulate(&mut self, load: ProductLoad, axial_kip: f64, moment_kipin: f64, shear_kip: f64) {
        self.axial_kip[load] += axial_kip;
        self.moment_kipin[load] += moment_kipin;
        self.shear_kip[load] += shear_kip;
    }
}

/// External loads supplied by the structural analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedLoadTable {
    #[serde(default)]
    pub loads: Vec<AppliedLoad>,
    #[serde(default)]
    pub live_load: Vec<LiveLoadEnvelope>,
}

impl AppliedLoadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a load increment (builder pattern)
    pub fn with_load(
        mut self,
        poi_id: usize,
        interval: usize,
        load: ProductLoad,
        axial_kip: f64,
        moment_kipin: f64,
        shear_kip: f64,
    ) -> Self {
        self.loads.push(AppliedLoad {
            poi_id,
            interval,
            load,
            axial_kip,
            moment_kipin,
            shear_kip,
        });
        self
    }

    pub fn with_live_load(mut self, envelope: LiveLoadEnvelope) -> Self {
        self.live_load.push(envelope);
        self
    }

    /// Reject solver-generated product loads and non-finite values
    pub fn validate(&self) -> CalcResult<()> {
        for load in &self.loads {
            if load.load.is_computed() {
                return Err(CalcError::configuration(
                    format!("load table, poi {}, interval {}", load.poi_id, load.interval),
                    format!(
                        "{} loads are computed by the time-step analysis and cannot be applied externally",
                        load.load.description()
                    ),
                ));
            }
            for (field, value) in [
                ("axial_kip", load.axial_kip),
                ("moment_kipin", load.moment_kipin),
                ("shear_kip", load.shear_kip),
            ] {
                if !value.is_finite() {
                    return Err(CalcError::invalid_input(field, value.to_string(), "Load must be finite"));
                }
            }
        }
        for ll in &self.live_load {
            if ll.moment_min_kipin > ll.moment_max_kipin {
                return Err(CalcError::invalid_input(
                    "moment_min_kipin",
                    ll.moment_min_kipin.to_string(),
                    format!("Live load envelope at poi {} has min above max", ll.poi_id),
                ));
            }
        }
        Ok(())
    }

    /// Increments summed by (poi, interval)
    pub fn indexed(&self) -> HashMap<(usize, usize), LoadIncrement> {
        let mut index: HashMap<(usize, usize), LoadIncrement> = HashMap::new();
        for l in &self.loads {
            index
                .entry((l.poi_id, l.interval))
                .or_default()
                .accumulate(l.load, l.axial_kip, l.moment_kipin, l.shear_kip);
        }
        index
    }

    pub fn live_load_at(&self, poi_id: usize) -> Option<&LiveLoadEnvelope> {
        self.live_load.iter().find(|ll| ll.poi_id == poi_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_loads_rejected() {
        for pl in [
            ProductLoad::Creep,
            ProductLoad::Shrinkage,
            ProductLoad::Relaxation,
            ProductLoad::Prestress,
            ProductLoad::PostTensioning,
        ] {
            let table = AppliedLoadTable::new().with_load(0, 0, pl, 0.0, 10.0, 0.0);
            let err = table.validate().unwrap_err();
            assert_eq!(err.error_code(), "CONFIGURATION");
        }
    }

    #[test]
    fn test_indexed_sums_duplicates() {
        let table = AppliedLoadTable::new()
            .with_load(2, 3, ProductLoad::Diaphragm, 0.0, 100.0, 5.0)
            .with_load(2, 3, ProductLoad::Diaphragm, 0.0, 50.0, 1.0)
            .with_load(2, 4, ProductLoad::Railing, 0.0, 70.0, 2.0);
        let idx = table.indexed();
        assert_eq!(idx[&(2, 3)].moment_kipin[ProductLoad::Diaphragm], 150.0);
        assert_eq!(idx[&(2, 3)].shear_kip.total(), 6.0);
        assert!(idx.get(&(2, 5)).is_none());
    }

    #[test]
    fn test_live_load_validation() {
        let table = AppliedLoadTable::new().with_live_load(LiveLoadEnvelope {
            poi_id: 0,
            moment_min_kipin: 100.0,
            moment_max_kipin: -100.0,
            shear_max_kip: 0.0,
        });
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let table = AppliedLoadTable::new().with_load(0, 0, ProductLoad::Girder, f64::NAN, 0.0, 0.0);
        assert_eq!(table.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }
}
