//! CSV renderers: the category summary and the WBS detail.

use csv::Writer;

use super::{ExportFormat, Exporter};
use crate::errors::{EstimateError, EstimateResult};
use crate::report::Report;

/// `Category,Amount`, one row per summary line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryCsvExporter;

impl Exporter for SummaryCsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>> {
        let fail = |e: csv::Error| EstimateError::export_failed(self.format().name(), e.to_string());

        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(["Category", "Amount"]).map_err(fail)?;
        for row in &report.rows {
            writer
                .write_record([row.label.as_str(), &format!("{:.2}", row.amount)])
                .map_err(fail)?;
        }
        finish(writer, self.format())
    }
}

/// `WBS,Category,Item,Description,Amount,Included`, sorted by WBS code.
#[derive(Debug, Clone, Copy, Default)]
pub struct WbsCsvExporter;

impl Exporter for WbsCsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::WbsCsv
    }

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>> {
        let fail = |e: csv::Error| EstimateError::export_failed(self.format().name(), e.to_string());

        let mut writer = Writer::from_writer(Vec::new());
        writer
            .write_record(["WBS", "Category", "Item", "Description", "Amount", "Included"])
            .map_err(fail)?;
        for row in &report.details {
            writer
                .write_record([
                    row.wbs.as_str(),
                    row.category.display_name(),
                    row.item.as_str(),
                    row.description.as_str(),
                    &format!("{:.2}", row.amount),
                    if row.included { "true" } else { "false" },
                ])
                .map_err(fail)?;
        }
        finish(writer, self.format())
    }
}

fn finish(writer: Writer<Vec<u8>>, format: ExportFormat) -> EstimateResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EstimateError::export_failed(format.name(), e.to_string()))
}
