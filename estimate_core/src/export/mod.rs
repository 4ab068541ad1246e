//! # Export Module
//!
//! Renders a [`Report`] into one of the supported file formats. Every
//! renderer implements [`Exporter`] and only formats numbers that the
//! report has already rounded.
//!
//! | Format    | Content                                          |
//! |-----------|--------------------------------------------------|
//! | `json`    | Output document, pretty printed                  |
//! | `csv`     | `Category,Amount` summary                        |
//! | `wbs-csv` | `WBS,Category,Item,Description,Amount,Included`  |
//! | `xlsx`    | `Summary` and `WBS Detail` sheets                |
//! | `pdf`     | Typst summary document                           |
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::config::ReportSettings;
//! use estimate_core::export::{exporter_for, ExportFormat};
//! use estimate_core::{build_report, load_estimate};
//! use std::path::Path;
//!
//! let estimate = load_estimate(Path::new("estimate.json"))?;
//! let report = build_report(&estimate)?;
//! let bytes = exporter_for(ExportFormat::Csv, &ReportSettings::default()).render(&report)?;
//! # Ok::<(), estimate_core::errors::EstimateError>(())
//! ```

pub mod delimited;
pub mod pdf;
pub mod xlsx;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ReportSettings;
use crate::errors::{EstimateError, EstimateResult};
use crate::file_io::write_atomic;
use crate::report::Report;

pub use self::delimited::{SummaryCsvExporter, WbsCsvExporter};
pub use self::pdf::PdfExporter;
pub use self::xlsx::XlsxExporter;

/// Renders a report to bytes.
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>>;
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Json,
    Csv,
    WbsCsv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::WbsCsv,
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::WbsCsv => "wbs-csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension for default output paths.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::WbsCsv => "wbs.csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                EstimateError::invalid_input(
                    "format",
                    s,
                    "expected one of json, csv, wbs-csv, xlsx, pdf",
                )
            })
    }
}

/// Output document as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>> {
        serde_json::to_vec_pretty(&report.output)
            .map_err(|e| EstimateError::export_failed(self.format().name(), e.to_string()))
    }
}

/// Pick the renderer for a format.
pub fn exporter_for(format: ExportFormat, settings: &ReportSettings) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Csv => Box::new(SummaryCsvExporter),
        ExportFormat::WbsCsv => Box::new(WbsCsvExporter),
        ExportFormat::Xlsx => Box::new(XlsxExporter::new(settings.clone())),
        ExportFormat::Pdf => Box::new(PdfExporter::new(settings.clone())),
    }
}

/// Render and write atomically.
pub fn export_to_file(exporter: &dyn Exporter, report: &Report, path: &Path) -> EstimateResult<()> {
    let bytes = exporter.render(report)?;
    write_atomic(path, &bytes)?;
    info!(
        format = %exporter.format(),
        path = %path.display(),
        bytes = bytes.len(),
        "report exported"
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::estimate::Estimate;
    use crate::report::{build_report, Report};

    pub fn report() -> Report {
        let estimate = Estimate::from_value(json!({
            "meta": { "project": "Harbor Pump Station", "client": "Port of Lindell", "estimator": "J. Park" },
            "scope": {
                "schedule": { "durationMonths": 6 },
                "allowances": [
                    { "id": "AL-1", "wbs": "09-000", "description": "Finish upgrades", "amount": 2500, "includeInTotal": true }
                ]
            },
            "costs": {
                "labor": { "baseLaborHours": 100, "productivityFactor": 1, "laborRate": 50, "wbs": "01-100" },
                "materials": {
                    "items": [
                        { "id": "M-1", "wbs": "03-300", "description": "Ready-mix, 4000 psi", "quantity": 10, "wasteFactor": 0.1, "unitCost": 20 }
                    ],
                    "freightCost": 100,
                    "dutiesTaxesPct": 0.05
                },
                "equipment": { "items": [ { "id": "E-1", "wbs": "01-500", "description": "Crane, 40t", "hours": 10, "rate": 100 } ] },
                "subcontractors": [ { "id": "S-1", "wbs": "26-000", "name": "Volt Electric", "quote": 2000 } ],
                "risk": { "insurancePct": 0.02, "bondPct": 0.01, "contingencyPct": 0.05 },
                "escalation": { "escalationPctPerYear": 0.03 },
                "overheadAndProfit": { "overheadPct": 0.1, "profitPct": 0.08 },
                "taxes": { "salesTaxPct": 0.07 }
            }
        }))
        .unwrap();
        build_report(&estimate).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_names_parse_back() {
        for format in ExportFormat::ALL {
            assert_eq!(format.name().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("WBS-CSV".parse::<ExportFormat>().unwrap(), ExportFormat::WbsCsv);
        assert_eq!("docx".parse::<ExportFormat>().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_exporter_for_matches_format() {
        let settings = ReportSettings::default();
        for format in ExportFormat::ALL {
            assert_eq!(exporter_for(format, &settings).format(), format);
        }
    }

    #[test]
    fn test_json_export_is_output_document() {
        let report = fixtures::report();
        let bytes = JsonExporter.render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::to_value(&report.output).unwrap());
        assert_eq!(value["meta"]["client"], "Port of Lindell");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pump.csv");
        export_to_file(&SummaryCsvExporter, &fixtures::report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Category,Amount\n"));
    }
}
