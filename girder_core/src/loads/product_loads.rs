//! Product load definitions
//!
//! Every force and deformation in the time-step analysis is tracked per
//! product load. The set is fixed, so results are stored in enum-indexed
//! arrays ([`ByProductLoad`]) instead of maps.

use std::ops::{Add, AddAssign, Index, IndexMut, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Load class used by limit state factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadClass {
    /// DC - structural components and attachments
    Dc,
    /// DW - wearing surfaces and utilities
    Dw,
    /// PS - prestress
    Ps,
    /// CR - creep
    Cr,
    /// SH - shrinkage
    Sh,
    /// RE - strand relaxation
    Re,
}

impl LoadClass {
    pub fn code(&self) -> &'static str {
        match self {
            LoadClass::Dc => "DC",
            LoadClass::Dw => "DW",
            LoadClass::Ps => "PS",
            LoadClass::Cr => "CR",
            LoadClass::Sh => "SH",
            LoadClass::Re => "RE",
        }
    }
}

/// Product load types
///
/// # Example
/// ```
/// use girder_core::loads::{LoadClass, ProductLoad};
///
/// assert_eq!(ProductLoad::Slab.code(), "Slab");
/// assert_eq!(ProductLoad::Overlay.class(), LoadClass::Dw);
/// assert!(ProductLoad::Creep.is_computed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductLoad {
    Girder,
    Diaphragm,
    Slab,
    SlabPad,
    Railing,
    Overlay,
    UserDc,
    UserDw,
    Prestress,
    PostTensioning,
    Creep,
    Shrinkage,
    Relaxation,
}

impl ProductLoad {
    pub const COUNT: usize = 13;

    /// All product loads in storage order
    pub const ALL: [ProductLoad; ProductLoad::COUNT] = [
        ProductLoad::Girder,
        ProductLoad::Diaphragm,
        ProductLoad::Slab,
        ProductLoad::SlabPad,
        ProductLoad::Railing,
        ProductLoad::Overlay,
        ProductLoad::UserDc,
        ProductLoad::UserDw,
        ProductLoad::Prestress,
        ProductLoad::PostTensioning,
        ProductLoad::Creep,
        ProductLoad::Shrinkage,
        ProductLoad::Relaxation,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProductLoad::Girder => "Girder",
            ProductLoad::Diaphragm => "Diaphragm",
            ProductLoad::Slab => "Slab",
            ProductLoad::SlabPad => "Haunch",
            ProductLoad::Railing => "Railing",
            ProductLoad::Overlay => "Overlay",
            ProductLoad::UserDc => "User DC",
            ProductLoad::UserDw => "User DW",
            ProductLoad::Prestress => "PS",
            ProductLoad::PostTensioning => "PT",
            ProductLoad::Creep => "CR",
            ProductLoad::Shrinkage => "SH",
            ProductLoad::Relaxation => "RE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProductLoad::Girder => "Girder self-weight",
            ProductLoad::Diaphragm => "Diaphragms",
            ProductLoad::Slab => "Deck slab",
            ProductLoad::SlabPad => "Slab haunch",
            ProductLoad::Railing => "Traffic barrier and railing",
            ProductLoad::Overlay => "Wearing overlay",
            ProductLoad::UserDc => "User defined DC",
            ProductLoad::UserDw => "User defined DW",
            ProductLoad::Prestress => "Pretensioning",
            ProductLoad::PostTensioning => "Post-tensioning",
            ProductLoad::Creep => "Creep",
            ProductLoad::Shrinkage => "Shrinkage",
            ProductLoad::Relaxation => "Relaxation",
        }
    }

    pub fn class(&self) -> LoadClass {
        match self {
            ProductLoad::Girder
            | ProductLoad::Diaphragm
            | ProductLoad::Slab
            | ProductLoad::SlabPad
            | ProductLoad::Railing
            | ProductLoad::UserDc => LoadClass::Dc,
            ProductLoad::Overlay | ProductLoad::UserDw => LoadClass::Dw,
            ProductLoad::Prestress | ProductLoad::PostTensioning => LoadClass::Ps,
            ProductLoad::Creep => LoadClass::Cr,
            ProductLoad::Shrinkage => LoadClass::Sh,
            ProductLoad::Relaxation => LoadClass::Re,
        }
    }

    /// Loads generated by the time-step solver. They may not be supplied by
    /// the structural analysis.
    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            ProductLoad::Prestress
                | ProductLoad::PostTensioning
                | ProductLoad::Creep
                | ProductLoad::Shrinkage
                | ProductLoad::Relaxation
        )
    }

    /// Permanent gravity load (DC or DW)
    pub fn is_dead_load(&self) -> bool {
        matches!(self.class(), LoadClass::Dc | LoadClass::Dw)
    }
}

impl std::fmt::Display for ProductLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Time-dependent effect that produces a restraining force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeDependentEffect {
    Creep,
    Shrinkage,
    Relaxation,
}

impl TimeDependentEffect {
    pub const ALL: [TimeDependentEffect; 3] = [
        TimeDependentEffect::Creep,
        TimeDependentEffect::Shrinkage,
        TimeDependentEffect::Relaxation,
    ];

    /// Product load the released restraint is booked under
    pub fn product_load(&self) -> ProductLoad {
        match self {
            TimeDependentEffect::Creep => ProductLoad::Creep,
            TimeDependentEffect::Shrinkage => ProductLoad::Shrinkage,
            TimeDependentEffect::Relaxation => ProductLoad::Relaxation,
        }
    }
}

/// One value per product load
///
/// ```
/// use girder_core::loads::{ByProductLoad, ProductLoad};
///
/// let mut m = ByProductLoad::zero();
/// m[ProductLoad::Girder] = 1200.0;
/// m[ProductLoad::Slab] = 800.0;
/// assert_eq!(m.total(), 2000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByProductLoad([f64; ProductLoad::COUNT]);

impl ByProductLoad {
    pub fn zero() -> Self {
        ByProductLoad([0.0; ProductLoad::COUNT])
    }

    /// Single non-zero entry
    pub fn only(load: ProductLoad, value: f64) -> Self {
        let mut v = Self::zero();
        v[load] = value;
        v
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Sum over product loads of one class
    pub fn class_total(&self, class: LoadClass) -> f64 {
        self.iter().filter(|(pl, _)| pl.class() == class).map(|(_, v)| v).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductLoad, f64)> + '_ {
        ProductLoad::ALL.iter().map(move |pl| (*pl, self.0[pl.index()]))
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = *self;
        out.0.iter_mut().for_each(|v| *v = f(*v));
        out
    }

    /// Element-wise combination of two arrays
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = Self::zero();
        for i in 0..ProductLoad::COUNT {
            out.0[i] = f(self.0[i], other.0[i]);
        }
        out
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl Index<ProductLoad> for ByProductLoad {
    type Output = f64;
    fn index(&self, load: ProductLoad) -> &f64 {
        &self.0[load.index()]
    }
}

impl IndexMut<ProductLoad> for ByProductLoad {
    fn index_mut(&mut self, load: ProductLoad) -> &mut f64 {
        &mut self.0[load.index()]
    }
}

impl Add for ByProductLoad {
    type Output = ByProductLoad;
    fn add(self, rhs: ByProductLoad) -> ByProductLoad {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl AddAssign for ByProductLoad {
    fn add_assign(&mut self, rhs: ByProductLoad) {
        *self = *self + rhs;
    }
}

impl Sub for ByProductLoad {
    type Output = ByProductLoad;
    fn sub(self, rhs: ByProductLoad) -> ByProductLoad {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl Neg for ByProductLoad {
    type Output = ByProductLoad;
    fn neg(self) -> ByProductLoad {
        self.map(|v| -v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_in_index_order() {
        for (i, pl) in ProductLoad::ALL.iter().enumerate() {
            assert_eq!(pl.index(), i);
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(ProductLoad::Girder.class(), LoadClass::Dc);
        assert_eq!(ProductLoad::UserDw.class(), LoadClass::Dw);
        assert_eq!(ProductLoad::PostTensioning.class(), LoadClass::Ps);
        assert!(ProductLoad::Railing.is_dead_load());
        assert!(!ProductLoad::Shrinkage.is_dead_load());
        assert!(!ProductLoad::Girder.is_computed());
    }

    #[test]
    fn test_effect_mapping() {
        assert_eq!(TimeDependentEffect::Relaxation.product_load(), ProductLoad::Relaxation);
        assert_eq!(TimeDependentEffect::Creep.product_load().class(), LoadClass::Cr);
    }

    #[test]
    fn test_arithmetic() {
        let a = ByProductLoad::only(ProductLoad::Girder, 2.0);
        let b = ByProductLoad::only(ProductLoad::Creep, -0.5);
        let mut c = a + b;
        assert_eq!(c.total(), 1.5);
        c += a;
        assert_eq!(c[ProductLoad::Girder], 4.0);
        assert_eq!((c - a)[ProductLoad::Girder], 2.0);
        assert_eq!((-b)[ProductLoad::Creep], 0.5);
        assert_eq!(c.class_total(LoadClass::Dc), 4.0);
        assert!(ByProductLoad::zero().is_zero());
    }

    #[test]
    fn test_serializes_as_array() {
        let a = ByProductLoad::only(ProductLoad::Slab, 3.0);
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.starts_with('['));
        let back: ByProductLoad = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
