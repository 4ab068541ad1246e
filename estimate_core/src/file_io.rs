//! # File I/O Module
//!
//! Loading estimate documents and writing results:
//! - **Validate before compute**: documents are checked against the schema
//!   before anything is deserialized
//! - **Atomic writes**: write to `.tmp`, sync, rename, so an interrupted
//!   export never leaves a half-written file behind
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::file_io::{load_estimate, save_output};
//! use estimate_core::rollup;
//! use std::path::Path;
//!
//! let estimate = load_estimate(Path::new("estimate.json"))?;
//! let output = rollup::run(&estimate)?;
//! save_output(&output, Path::new("estimate.out.json"))?;
//! # Ok::<(), estimate_core::errors::EstimateError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::Estimate;
use crate::rollup::EstimateOutput;
use crate::validation::{validate_with, EstimateSchema, SchemaValidator};

/// Read a file and parse it as JSON, without validating it.
pub fn read_document(path: &Path) -> EstimateResult<Value> {
    let contents = fs::read_to_string(path).map_err(|e| {
        EstimateError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load, validate and deserialize an estimate.
///
/// # Returns
///
/// * `Ok(Estimate)` - Document passed validation
/// * `Err(EstimateError::SchemaViolation)` - Structural problems, all listed
/// * `Err(EstimateError::SerializationError)` - Invalid JSON
/// * `Err(EstimateError::FileError)` - I/O error
pub fn load_estimate(path: &Path) -> EstimateResult<Estimate> {
    load_estimate_with(path, &EstimateSchema)
}

/// Same as [`load_estimate`] with a caller-supplied validator.
pub fn load_estimate_with(path: &Path, validator: &dyn SchemaValidator) -> EstimateResult<Estimate> {
    let document = read_document(path)?;
    parse_estimate(document, validator)
}

/// Validate an in-memory document, then deserialize it.
pub fn parse_estimate(document: Value, validator: &dyn SchemaValidator) -> EstimateResult<Estimate> {
    validate_with(validator, &document)?;
    let estimate = Estimate::from_value(document)?;
    info!(
        line_items = estimate.line_item_count(),
        "estimate loaded"
    );
    Ok(estimate)
}

/// Write bytes with atomic replace semantics.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
pub fn write_atomic(path: &Path, bytes: &[u8]) -> EstimateResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        EstimateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

/// Save the output document as pretty-printed JSON.
pub fn save_output(output: &EstimateOutput, path: &Path) -> EstimateResult<()> {
    let json = serde_json::to_vec_pretty(output).map_err(|e| EstimateError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, &json)
}

/// `report.pdf` -> `report.pdf.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CostCategory;
    use crate::rollup;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Value {
        json!({
            "meta": { "project": "Pump Station 4" },
            "costs": {
                "labor": { "baseLaborHours": 100, "productivityFactor": 1, "laborRate": 50 },
                "materials": { "items": [ { "quantity": 10, "wasteFactor": 0.1, "unitCost": 20 } ],
                               "freightCost": 100, "dutiesTaxesPct": 0.05 },
                "equipment": { "items": [] },
                "risk": {}, "escalation": {}, "overheadAndProfit": {}, "taxes": {}
            }
        })
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(
            tmp_path_for(Path::new("/out/report.pdf")),
            Path::new("/out/report.pdf.tmp")
        );
    }

    #[test]
    fn test_load_valid_estimate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estimate.json");
        fs::write(&path, sample().to_string()).unwrap();

        let estimate = load_estimate(&path).unwrap();
        assert_eq!(estimate.meta["project"], "Pump Station 4");
    }

    #[test]
    fn test_schema_errors_abort_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let mut doc = sample();
        doc["costs"]["labor"].as_object_mut().unwrap().remove("laborRate");
        fs::write(&path, doc.to_string()).unwrap();

        match load_estimate(&path) {
            Err(EstimateError::SchemaViolation { issues }) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].path, "costs.labor.laborRate");
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn test_subcontractor_credit_flows_into_direct_cost() {
        let mut doc = sample();
        doc["costs"]["subcontractors"] = json!([ { "name": "Owner-furnished credit", "quote": -500 } ]);

        let estimate = parse_estimate(doc, &EstimateSchema).unwrap();
        let output = rollup::run(&estimate).unwrap();
        assert_eq!(output.breakdown.categories.get(CostCategory::Subcontractors), Some(-500.0));
        assert_eq!(output.breakdown.waterfall.direct_cost, 4836.0);
        assert_eq!(output.breakdown.waterfall.total_with_tax, 4836.0);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_estimate(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = load_estimate(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        let estimate = parse_estimate(sample(), &EstimateSchema).unwrap();
        save_output(&rollup::run(&estimate).unwrap(), &path).unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["breakdown"]["Materials"], 336.0);
        assert_eq!(written["breakdown"]["totalWithTax"], 5336.0);
    }
}
