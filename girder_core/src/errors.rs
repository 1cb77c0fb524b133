//! # Error Types
//!
//! Structured error types for girder_core. Every variant carries enough
//! context (segment, interval, point of interest) for a caller to locate
//! the failing input without re-running the analysis.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::errors::{CalcError, CalcResult};
//!
//! fn validate_slip(anchor_set_in: f64) -> CalcResult<()> {
//!     if anchor_set_in < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "anchor_set_in".to_string(),
//!             value: anchor_set_in.to_string(),
//!             reason: "Anchor set cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for girder_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Aging or relaxation method with no formula for the requested material
    #[error("Invalid method '{method}': {reason}")]
    InvalidMethod { method: String, reason: String },

    /// Malformed model: timeline, tendon slip, load table
    #[error("Configuration error in {context}: {reason}")]
    Configuration { context: String, reason: String },

    /// A numeric search did not converge
    #[error("No convergence in {context} after {iterations} iterations: {reason}")]
    NonConvergence {
        context: String,
        iterations: usize,
        reason: String,
    },

    /// Internal forces do not balance the applied forces
    #[error("Equilibrium violated in {context}: external {external}, internal {internal} (tolerance {tolerance})")]
    EquilibriumViolation {
        context: String,
        external: f64,
        internal: f64,
        tolerance: f64,
    },

    /// An interval was requested out of chronological order
    #[error("Out of order in {context}: {reason}")]
    OutOfOrder { context: String, reason: String },

    /// File I/O error
    #[error("File error during '{operation}' on '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Model file written by an incompatible schema
    #[error("Version mismatch: file is v{file_version}, expected v{expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an InvalidMethod error
    pub fn invalid_method(method: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidMethod {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Configuration {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a NonConvergence error
    pub fn non_convergence(context: impl Into<String>, iterations: usize, reason: impl Into<String>) -> Self {
        CalcError::NonConvergence {
            context: context.into(),
            iterations,
            reason: reason.into(),
        }
    }

    /// Create an EquilibriumViolation error
    pub fn equilibrium_violation(context: impl Into<String>, external: f64, internal: f64, tolerance: f64) -> Self {
        CalcError::EquilibriumViolation {
            context: context.into(),
            external,
            internal,
            tolerance,
        }
    }

    /// Create an OutOfOrder error
    pub fn out_of_order(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::OutOfOrder {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Invariant violations abort the whole run. Everything else is
    /// scoped to the point of interest or query that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CalcError::EquilibriumViolation { .. } | CalcError::OutOfOrder { .. } | CalcError::Internal { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::InvalidMethod { .. } => "INVALID_METHOD",
            CalcError::Configuration { .. } => "CONFIGURATION",
            CalcError::NonConvergence { .. } => "NON_CONVERGENCE",
            CalcError::EquilibriumViolation { .. } => "EQUILIBRIUM_VIOLATION",
            CalcError::OutOfOrder { .. } => "OUT_OF_ORDER",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Formats the location string carried by scoped errors.
pub(crate) fn location(segment: &str, interval: Option<usize>, poi: Option<usize>) -> String {
    let mut s = format!("segment '{}'", segment);
    if let Some(i) = interval {
        s.push_str(&format!(", interval {}", i));
    }
    if let Some(p) = poi {
        s.push_str(&format!(", poi {}", p));
    }
    s
}
