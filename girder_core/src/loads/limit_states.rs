//! AASHTO LRFD limit state combinations (Table 3.4.1-1)
//!
//! Combinations are applied to cumulative product load effects at a section
//! plus the live load envelope. Primary prestress, creep, shrinkage and
//! relaxation effects are carried by the section itself and are not part of
//! the factored demand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::product_loads::{ByProductLoad, LoadClass};

/// Limit states the capacity analyzer can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitState {
    ServiceI,
    ServiceIII,
    StrengthI,
    StrengthII,
    FatigueI,
}

impl LimitState {
    pub const ALL: [LimitState; 5] = [
        LimitState::ServiceI,
        LimitState::ServiceIII,
        LimitState::StrengthI,
        LimitState::StrengthII,
        LimitState::FatigueI,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LimitState::ServiceI => "Service I",
            LimitState::ServiceIII => "Service III",
            LimitState::StrengthI => "Strength I",
            LimitState::StrengthII => "Strength II",
            LimitState::FatigueI => "Fatigue I",
        }
    }

    pub fn is_strength(&self) -> bool {
        matches!(self, LimitState::StrengthI | LimitState::StrengthII)
    }

    /// Load factors for this limit state (maximum permanent load factors)
    pub fn combination(&self) -> LoadCombination {
        match self {
            LimitState::ServiceI => LoadCombination::new(self.code(), "DC + DW + LL")
                .with_factor(LoadClass::Dc, 1.0)
                .with_factor(LoadClass::Dw, 1.0)
                .with_live_load(1.0),
            LimitState::ServiceIII => LoadCombination::new(self.code(), "DC + DW + 0.8LL")
                .with_factor(LoadClass::Dc, 1.0)
                .with_factor(LoadClass::Dw, 1.0)
                .with_live_load(0.8),
            LimitState::StrengthI => LoadCombination::new(self.code(), "1.25DC + 1.50DW + 1.75LL")
                .with_factor(LoadClass::Dc, 1.25)
                .with_factor(LoadClass::Dw, 1.50)
                .with_live_load(1.75),
            LimitState::StrengthII => LoadCombination::new(self.code(), "1.25DC + 1.50DW + 1.35LL")
                .with_factor(LoadClass::Dc, 1.25)
                .with_factor(LoadClass::Dw, 1.50)
                .with_live_load(1.35),
            LimitState::FatigueI => LoadCombination::new(self.code(), "1.75LL").with_live_load(1.75),
        }
    }
}

impl std::fmt::Display for LimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A load combination with factors for each load class
///
/// # Example
/// ```
/// use girder_core::loads::{ByProductLoad, LoadClass, LoadCombination, ProductLoad};
///
/// let combo = LoadCombination::new("Strength I", "1.25DC + 1.75LL")
///     .with_factor(LoadClass::Dc, 1.25)
///     .with_live_load(1.75);
///
/// let dead = ByProductLoad::only(ProductLoad::Girder, 100.0);
/// assert_eq!(combo.apply(&dead, 10.0), 142.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    pub name: String,

    /// Human-readable equation for display
    pub equation: String,

    /// Load factors keyed by class
    pub factors: HashMap<LoadClass, f64>,

    /// Live load factor
    pub live_load_factor: f64,
}

impl LoadCombination {
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
            live_load_factor: 0.0,
        }
    }

    pub fn with_factor(mut self, class: LoadClass, factor: f64) -> Self {
        self.factors.insert(class, factor);
        self
    }

    pub fn with_live_load(mut self, factor: f64) -> Self {
        self.live_load_factor = factor;
        self
    }

    /// Get the factor for a load class (0.0 if not in combination)
    pub fn get_factor(&self, class: LoadClass) -> f64 {
        self.factors.get(&class).copied().unwrap_or(0.0)
    }

    /// Factored effect of the permanent loads plus `live_load`
    pub fn apply(&self, permanent: &ByProductLoad, live_load: f64) -> f64 {
        let dead: f64 = permanent
            .iter()
            .map(|(pl, value)| self.get_factor(pl.class()) * value)
            .sum();
        dead + self.live_load_factor * live_load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::ProductLoad;

    #[test]
    fn test_strength_i_factors() {
        let combo = LimitState::StrengthI.combination();
        let mut m = ByProductLoad::zero();
        m[ProductLoad::Girder] = 1000.0;
        m[ProductLoad::Overlay] = 200.0;
        m[ProductLoad::Prestress] = -5000.0;
        m[ProductLoad::Creep] = 300.0;
        let mu = combo.apply(&m, 800.0);
        assert!((mu - (1250.0 + 300.0 + 1400.0)).abs() < 1e-9);
    }

    #[test]
    fn test_service_iii_live_load() {
        let combo = LimitState::ServiceIII.combination();
        assert_eq!(combo.live_load_factor, 0.8);
        assert_eq!(combo.get_factor(LoadClass::Ps), 0.0);
    }

    #[test]
    fn test_fatigue_ignores_dead_load() {
        let m = ByProductLoad::only(ProductLoad::Girder, 1000.0);
        assert_eq!(LimitState::FatigueI.combination().apply(&m, 100.0), 175.0);
    }

    #[test]
    fn test_strength_flag() {
        assert!(LimitState::StrengthII.is_strength());
        assert!(!LimitState::ServiceI.is_strength());
    }
}
