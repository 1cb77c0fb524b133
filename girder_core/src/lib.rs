//! # girder_core - Prestress Loss and Capacity Engine
//!
//! `girder_core` computes time-dependent prestress losses in precast,
//! spliced and post-tensioned girders by the age-adjusted effective modulus
//! method, then evaluates moment, cracking and shear capacity against the
//! resulting prestress. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Interval by interval**: the construction timeline is solved in strict
//!   order; each interval's state is frozen before the next begins
//! - **Product-load bookkeeping**: every force, stress and strain is kept
//!   per product load so results can be recombined for any limit state
//! - **Rich Errors**: structured error types carrying segment, interval and
//!   point of interest
//!
//! ## Quick Start
//!
//! ```rust
//! use girder_core::aging::Exposure;
//! use girder_core::analysis::run;
//! use girder_core::materials::{ConcreteMaterial, MaterialCatalog};
//! use girder_core::model::GirderModel;
//! use girder_core::section::properties::Trapezoid;
//! use girder_core::section::{ConcretePart, ConcretePartKind, PointOfInterest, StrandPart};
//! use girder_core::timeline::{ConstructionEvent::*, Timeline};
//!
//! let timeline = Timeline::builder()
//!     .interval("Stress strands", 1.0, &[CastSegment, StressStrands])
//!     .interval("Release", 0.5, &[ReleasePrestress])
//!     .interval("Service", 10_000.0, &[EndOfService])
//!     .build()
//!     .unwrap();
//! let girder = ConcretePart::from_shape(
//!     "Girder",
//!     ConcretePartKind::Segment,
//!     "Girder 6 ksi",
//!     &[Trapezoid::rectangle(0.0, 12.0, 36.0)],
//!     Exposure::new(3.0, 70.0, 1.0),
//!     0.0,
//!     1,
//! )
//! .unwrap();
//! let poi = PointOfInterest::new(0, "S1", 240.0)
//!     .with_concrete(girder)
//!     .with_strand(StrandPart::straight("Bottom", "0.5in Gr270 LR", 8, 32.0, 202.5, 0, 1));
//! let materials = MaterialCatalog::standard().with_concrete(ConcreteMaterial::normal("Girder 6 ksi", 6.0, 4.5));
//! let model = GirderModel::new("Demo", "S1", timeline, materials).with_poi(poi);
//!
//! let results = run(&model).unwrap();
//! let loss = results.details(0).unwrap().prestress_loss_ksi(2, "Bottom").unwrap();
//! assert!(loss > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Model container, metadata and analysis settings
//! - [`timeline`] - Construction intervals and events
//! - [`materials`] - Concrete, strand and rebar catalog
//! - [`aging`] - Creep, shrinkage and relaxation laws
//! - [`section`] - Section parts and transformed properties
//! - [`tendon`] - Friction and anchor set losses
//! - [`bond`] - Strand transfer and development lengths
//! - [`timestep`] - Interval-by-interval solver
//! - [`accumulator`] - Per-interval result history
//! - [`capacity`] - Moment, cracking and shear capacity
//! - [`analysis`] - Complete runs
//! - [`file_io`] - Atomic model and result files
//! - [`errors`] - Structured error types

pub mod accumulator;
pub mod aging;
pub mod analysis;
pub mod bond;
pub mod capacity;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod model;
pub mod section;
pub mod tendon;
pub mod timeline;
pub mod timestep;
pub mod units;

pub use analysis::{run, GirderLossResults};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_model, save_json};
pub use model::GirderModel;
