//! # Error Types
//!
//! Structured error types for estimate_core. Every failure carries enough
//! context to be reported to a person or handed to another program as JSON.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//!
//! fn check_rate(rate: f64) -> EstimateResult<()> {
//!     if rate.is_nan() {
//!         return Err(EstimateError::InvalidInput {
//!             field: "costs.labor.laborRate".to_string(),
//!             value: rate.to_string(),
//!             reason: "Rate must be a number".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationIssue;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimating operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value has the wrong shape or cannot be interpreted
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The document failed structural validation; nothing was computed
    #[error("Schema validation failed with {} issue(s)", .issues.len())]
    SchemaViolation { issues: Vec<ValidationIssue> },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// An exporter could not render the report
    #[error("Export failed: {format} - {reason}")]
    ExportFailed { format: String, reason: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(format: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::ExportFailed {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map a serde_json failure onto the closest structured variant.
    ///
    /// serde reports absent required fields as "missing field `name`"; those
    /// become [`EstimateError::MissingField`], everything else a
    /// [`EstimateError::SerializationError`].
    pub fn from_serde(error: &serde_json::Error) -> Self {
        let message = error.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some((field, _)) = rest.split_once('`') {
                return EstimateError::missing_field(field);
            }
        }
        EstimateError::SerializationError { reason: message }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::SchemaViolation { .. } => "SCHEMA_VIOLATION",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::ExportFailed { .. } => "EXPORT_FAILED",
            EstimateError::ConfigError { .. } => "CONFIG_ERROR",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_input("scope", "[]", "Scope must be an object");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(EstimateError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(EstimateError::export_failed("pdf", "boom").error_code(), "EXPORT_FAILED");
        let violation = EstimateError::SchemaViolation { issues: Vec::new() };
        assert_eq!(violation.error_code(), "SCHEMA_VIOLATION");
    }

    #[test]
    fn test_schema_violation_message_counts_issues() {
        let error = EstimateError::SchemaViolation {
            issues: vec![
                ValidationIssue::new("costs.labor", "is a required property"),
                ValidationIssue::new("costs.risk", "is a required property"),
            ],
        };
        assert_eq!(error.to_string(), "Schema validation failed with 2 issue(s)");
    }

    #[test]
    fn test_missing_field_from_serde() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            #[serde(rename = "baseLaborHours")]
            base_labor_hours: f64,
        }

        let err = serde_json::from_value::<Needs>(serde_json::json!({})).unwrap_err();
        assert_eq!(
            EstimateError::from_serde(&err),
            EstimateError::missing_field("baseLaborHours")
        );
    }
}
