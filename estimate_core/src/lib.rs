//! # estimate_core - Construction Cost Rollup Engine
//!
//! `estimate_core` turns a JSON estimate document into a rolled-up cost
//! breakdown: direct-cost category subtotals followed by a fixed chain of
//! soft-cost markups ending at a total with tax. Every input and output type
//! is JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from an estimate to a result
//! - **Full precision inside**: Rounding to cents happens once, at the report
//! - **Rich Errors**: Structured error types, not just strings
//! - **Validate first**: Structural problems are collected and reported together
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::{build_report, Estimate};
//!
//! let estimate = Estimate::from_value(serde_json::json!({
//!     "meta": { "project": "Warehouse Slab" },
//!     "costs": {
//!         "labor": { "baseLaborHours": 40, "productivityFactor": 0.8, "laborRate": 60 },
//!         "materials": { "items": [] },
//!         "equipment": { "items": [] },
//!         "risk": {}, "escalation": {}, "overheadAndProfit": {}, "taxes": {}
//!     }
//! })).unwrap();
//!
//! let report = build_report(&estimate).unwrap();
//! assert_eq!(report.total(), 3000.0);
//! ```
//!
//! ## Modules
//!
//! - [`estimate`] - Input document model
//! - [`calculations`] - Category aggregators and the soft-cost chain
//! - [`rollup`] - Pipeline orchestration and the output document
//! - [`report`] - Summary and WBS detail rows for exporters
//! - [`validation`] - Structural validation and JSON Schema export
//! - [`export`] - JSON, CSV, XLSX and PDF renderers
//! - [`config`] - Report and export settings from TOML
//! - [`file_io`] - Loading documents and atomic writes
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod estimate;
pub mod export;
pub mod file_io;
pub mod money;
pub mod report;
pub mod rollup;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use config::{load_config, EstimatorConfig};
pub use errors::{EstimateError, EstimateResult};
pub use estimate::Estimate;
pub use export::{export_to_file, exporter_for, ExportFormat, Exporter};
pub use file_io::{load_estimate, save_output, write_atomic};
pub use report::{build_report, Report};
pub use rollup::{EstimateOutput, Rollup};
pub use validation::{validate_estimate, SchemaValidator, ValidationIssue};
