//! Report and export settings.
//!
//! Settings come from `--config <path>`, else `estimator.toml` in the
//! current directory, else built-in defaults. CLI flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "estimator.toml";

/// Top-level settings, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

/// `[report]` section. Used by the PDF and XLSX renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_title")]
    pub title: String,

    /// Printed in the report header when non-empty.
    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub prepared_by: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            company: String::new(),
            prepared_by: String::new(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_title() -> String {
    "Construction Cost Estimate".into()
}
fn default_currency_symbol() -> String {
    "$".into()
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory for exports written without an explicit `--out`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Resolve and load settings.
///
/// An explicit path must exist. Without one, `estimator.toml` in the current
/// directory is used when present.
pub fn load_config(explicit: Option<&Path>) -> EstimateResult<EstimatorConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = Path::new(CONFIG_FILE_NAME);
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(EstimatorConfig::default());
    }

    load_config_from(path)
}

/// Load settings from a specific file.
pub fn load_config_from(path: &Path) -> EstimateResult<EstimatorConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EstimateError::config_error(path.display().to_string(), e.to_string()))?;

    let config = toml::from_str(&content)
        .map_err(|e| EstimateError::config_error(path.display().to_string(), e.to_string()))?;
    tracing::debug!(?path, "config loaded");
    Ok(config)
}
