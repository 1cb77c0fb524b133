//! # Transformed Section
//!
//! Each part is transformed to a reference modulus by the ratio n = E / E_ref
//! and summed:
//!
//! ```text
//! A_tr = Σ n A
//! y_tr = Σ n A y / A_tr
//! I_tr = Σ n (I + A y²) - A_tr y_tr²
//! ```
//!
//! Parts with zero modulus or zero area drop out without error; an ungrouted
//! tendon or a deck that has not been cast is added with `e_ksi = 0`.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::section::{SectionComponent, TransformedSectionBuilder};
//!
//! let section = TransformedSectionBuilder::new(4_000.0)
//!     .with(SectionComponent::new(4_000.0, 800.0, 30.0, 200_000.0))
//!     .with(SectionComponent::new(28_500.0, 6.0, 55.0, 0.0))
//!     .with(SectionComponent::new(0.0, 4.0, 50.0, 0.0)) // ungrouted duct
//!     .build()
//!     .unwrap();
//!
//! let n = 28_500.0 / 4_000.0;
//! assert!((section.area_in2 - (800.0 + n * 6.0)).abs() < 1e-9);
//! assert!(section.centroid_in > 30.0);
//! ```

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One part as seen by the transformed section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionComponent {
    pub e_ksi: f64,
    pub area_in2: f64,
    pub centroid_in: f64,
    /// About the part's own centroid
    pub inertia_in4: f64,
}

impl SectionComponent {
    pub fn new(e_ksi: f64, area_in2: f64, centroid_in: f64, inertia_in4: f64) -> Self {
        SectionComponent {
            e_ksi,
            area_in2,
            centroid_in,
            inertia_in4,
        }
    }

    fn participates(&self) -> bool {
        self.e_ksi > 0.0 && self.area_in2 > 0.0
    }
}

/// Area, centroid and inertia transformed to `e_ref_ksi`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformedSection {
    pub e_ref_ksi: f64,
    pub area_in2: f64,
    /// Depth below the top of girder
    pub centroid_in: f64,
    /// About `centroid_in`
    pub inertia_in4: f64,
}

impl TransformedSection {
    /// No participating parts
    pub fn is_empty(&self) -> bool {
        self.area_in2 <= 0.0
    }

    pub fn axial_stiffness(&self) -> f64 {
        self.e_ref_ksi * self.area_in2
    }

    pub fn flexural_stiffness(&self) -> f64 {
        self.e_ref_ksi * self.inertia_in4
    }

    /// Transformed section modulus for a fiber at depth `y_in`
    pub fn section_modulus_at(&self, y_in: f64) -> f64 {
        self.inertia_in4 / (y_in - self.centroid_in).abs()
    }

    /// Stiffness relating (strain at the top of girder, curvature) to
    /// (axial force, moment about the top of girder)
    ///
    /// ```text
    /// | EA    EA·y_tr               |
    /// | EA·y_tr   EI + EA·y_tr²     |
    /// ```
    pub fn stiffness_at_top(&self) -> Matrix2<f64> {
        let ea = self.axial_stiffness();
        let es = ea * self.centroid_in;
        let ei0 = self.flexural_stiffness() + ea * self.centroid_in * self.centroid_in;
        Matrix2::new(ea, es, es, ei0)
    }
}

/// Collects parts and transforms them to a reference modulus
#[derive(Debug, Clone, Default)]
pub struct TransformedSectionBuilder {
    e_ref_ksi: f64,
    components: Vec<SectionComponent>,
}

impl TransformedSectionBuilder {
    pub fn new(e_ref_ksi: f64) -> Self {
        TransformedSectionBuilder {
            e_ref_ksi,
            components: Vec::new(),
        }
    }

    pub fn with(mut self, component: SectionComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn add(&mut self, component: SectionComponent) {
        self.components.push(component);
    }

    pub fn build(&self) -> CalcResult<TransformedSection> {
        if !(self.e_ref_ksi > 0.0) || !self.e_ref_ksi.is_finite() {
            return Err(CalcError::invalid_input(
                "e_ref_ksi",
                self.e_ref_ksi.to_string(),
                "Reference modulus must be positive",
            ));
        }

        let mut area = 0.0;
        let mut first_moment = 0.0;
        let mut second_moment = 0.0;
        for c in self.components.iter().filter(|c| c.participates()) {
            let n = c.e_ksi / self.e_ref_ksi;
            area += n * c.area_in2;
            first_moment += n * c.area_in2 * c.centroid_in;
            second_moment += n * (c.inertia_in4 + c.area_in2 * c.centroid_in * c.centroid_in);
        }

        if area <= 0.0 {
            return Ok(TransformedSection {
                e_ref_ksi: self.e_ref_ksi,
                ..Default::default()
            });
        }

        let centroid = first_moment / area;
        Ok(TransformedSection {
            e_ref_ksi: self.e_ref_ksi,
            area_in2: area,
            centroid_in: centroid,
            inertia_in4: second_moment - area * centroid * centroid,
        })
    }
}
