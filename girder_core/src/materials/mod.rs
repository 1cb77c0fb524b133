//! # Materials Catalog
//!
//! Material definitions and property lookups for precast and post-tensioned
//! girders.
//!
//! ## Material Types
//!
//! - **Concrete**: time-dependent strength and modulus, conventional or UHPC
//! - **Strand**: seven-wire prestressing strand (power formula)
//! - **Rebar**: elastic-perfectly-plastic mild reinforcement
//!
//! The catalog is an explicit, immutable value. Build it once, then pass it
//! by reference to the analysis. There is no global material state.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::materials::{ConcreteMaterial, MaterialCatalog};
//!
//! let catalog = MaterialCatalog::standard()
//!     .with_concrete(ConcreteMaterial::normal("Girder", 8.0, 6.0));
//!
//! let strand = catalog.strand("0.6in Gr270 LR").unwrap();
//! assert_eq!(strand.fpu_ksi, 270.0);
//! assert!(catalog.concrete("Deck").is_err());
//! ```

pub mod concrete;
pub mod steel;

pub use concrete::{ConcreteMaterial, ConcreteType, CuringType, UhpcProperties};
pub use steel::{RebarMaterial, StrandMaterial, StrandType};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Unified material enum, used when materials are exchanged as a list
///
/// ```json
/// { "type": "Strand", "name": "0.5in Gr270 LR", "strand_type": "LowRelaxation", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Concrete(ConcreteMaterial),
    Strand(StrandMaterial),
    Rebar(RebarMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Concrete(m) => &m.name,
            Material::Strand(m) => &m.name,
            Material::Rebar(m) => &m.name,
        }
    }

    /// Get material type as a string
    pub fn material_type(&self) -> &'static str {
        match self {
            Material::Concrete(_) => "Concrete",
            Material::Strand(_) => "Strand",
            Material::Rebar(_) => "Rebar",
        }
    }
}

/// Read-only lookup of materials by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    concrete: HashMap<String, ConcreteMaterial>,
    strand: HashMap<String, StrandMaterial>,
    rebar: HashMap<String, RebarMaterial>,
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with Grade 270 strand (0.5" and 0.6") and A615 Grade 60 bar
    pub fn standard() -> Self {
        MaterialCatalog::new()
            .with_strand(StrandMaterial::grade_270("0.5in Gr270 LR", 0.153))
            .with_strand(StrandMaterial::grade_270("0.6in Gr270 LR", 0.217))
            .with_rebar(RebarMaterial::a615_grade_60())
    }

    /// Build from a flat material list
    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        materials.into_iter().fold(MaterialCatalog::new(), |cat, m| cat.with(m))
    }

    pub fn with(self, material: Material) -> Self {
        match material {
            Material::Concrete(m) => self.with_concrete(m),
            Material::Strand(m) => self.with_strand(m),
            Material::Rebar(m) => self.with_rebar(m),
        }
    }

    pub fn with_concrete(mut self, material: ConcreteMaterial) -> Self {
        self.concrete.insert(material.name.clone(), material);
        self
    }

    pub fn with_strand(mut self, material: StrandMaterial) -> Self {
        self.strand.insert(material.name.clone(), material);
        self
    }

    pub fn with_rebar(mut self, material: RebarMaterial) -> Self {
        self.rebar.insert(material.name.clone(), material);
        self
    }

    pub fn concrete(&self, name: &str) -> CalcResult<&ConcreteMaterial> {
        self.concrete
            .get(name)
            .ok_or_else(|| CalcError::material_not_found(format!("concrete '{}'", name)))
    }

    pub fn strand(&self, name: &str) -> CalcResult<&StrandMaterial> {
        self.strand
            .get(name)
            .ok_or_else(|| CalcError::material_not_found(format!("strand '{}'", name)))
    }

    pub fn rebar(&self, name: &str) -> CalcResult<&RebarMaterial> {
        self.rebar
            .get(name)
            .ok_or_else(|| CalcError::material_not_found(format!("rebar '{}'", name)))
    }

    /// Concrete materials in name order
    pub fn concretes(&self) -> Vec<&ConcreteMaterial> {
        let mut list: Vec<_> = self.concrete.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn len(&self) -> usize {
        self.concrete.len() + self.strand.len() + self.rebar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every material in the catalog
    pub fn validate(&self) -> CalcResult<()> {
        self.concrete.values().try_for_each(|m| m.validate())?;
        self.strand.values().try_for_each(|m| m.validate())?;
        self.rebar.values().try_for_each(|m| m.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let cat = MaterialCatalog::standard();
        assert_eq!(cat.len(), 3);
        assert!(cat.strand("0.5in Gr270 LR").is_ok());
        assert!(cat.rebar("A615 Gr 60").is_ok());
        assert!(cat.validate().is_ok());
    }

    #[test]
    fn test_missing_material() {
        let cat = MaterialCatalog::standard();
        let err = cat.concrete("Deck").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_from_material_list() {
        let cat = MaterialCatalog::from_materials(vec![
            Material::Concrete(ConcreteMaterial::normal("Deck", 4.0, 3.0)),
            Material::Rebar(RebarMaterial::a615_grade_60()),
        ]);
        assert_eq!(cat.concretes().len(), 1);
        assert!(cat.rebar("A615 Gr 60").is_ok());
    }

    #[test]
    fn test_material_serialization() {
        let m = Material::Strand(StrandMaterial::grade_270("0.6", 0.217));
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"type\":\"Strand\""));
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name(), "0.6");
    }
}
