//! # File I/O
//!
//! Model and result files are pretty-printed JSON. Saves are atomic: the
//! document goes to a `.tmp` sibling, is synced, then renamed over the
//! target, so an interrupted save never leaves a truncated file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::file_io::{load_model, save_json};
//! use std::path::Path;
//!
//! let model = load_model(Path::new("girder.json"))?;
//! save_json(&model, Path::new("girder-copy.json"))?;
//! # Ok::<(), girder_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::model::{GirderModel, SCHEMA_VERSION};

/// Serialize `value` and write it to `path` atomically.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Load a model file and check its schema version.
pub fn load_model(path: &Path) -> CalcResult<GirderModel> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let model: GirderModel = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    validate_version(&model.meta.version)?;
    Ok(model)
}

/// Major versions must match; within 0.x a newer minor is rejected.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.as_slice(), current.as_slice()) {
        ([], _) | (_, []) => Err(mismatch()),
        ([fm, ..], [cm, ..]) if fm != cm => Err(mismatch()),
        ([0, fmin, ..], [0, cmin, ..]) if fmin > cmin => Err(mismatch()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialCatalog;
    use crate::timeline::{ConstructionEvent, Timeline};
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("girder_test_{}_{}.json", name, std::process::id()))
    }

    fn model() -> GirderModel {
        let timeline = Timeline::builder()
            .interval("Cast", 1.0, &[ConstructionEvent::CastSegment])
            .build()
            .unwrap();
        GirderModel::new("File test", "S1", timeline, MaterialCatalog::standard())
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let m = model();
        save_json(&m, &path).unwrap();
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, m);
        assert!(!path.with_extension("json.tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_model(Path::new("/nonexistent/girder.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_newer_schema_rejected() {
        let path = temp_path("version");
        let mut m = model();
        m.meta.version = "0.9.0".to_string();
        save_json(&m, &path).unwrap();
        assert_eq!(load_model(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
