//! XLSX workbook with `Summary` and `WBS Detail` sheets.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde_json::Value;

use super::{ExportFormat, Exporter};
use crate::config::ReportSettings;
use crate::errors::{EstimateError, EstimateResult};
use crate::report::Report;

const MONEY_FORMAT: &str = "#,##0.00";

#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    settings: ReportSettings,
}

impl XlsxExporter {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    fn build(&self, report: &Report) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        let summary = workbook.add_worksheet();
        summary.set_name("Summary")?;
        self.write_summary(summary, report)?;

        let detail = workbook.add_worksheet();
        detail.set_name("WBS Detail")?;
        write_detail(detail, report)?;

        workbook.save_to_buffer()
    }

    fn write_summary(&self, sheet: &mut Worksheet, report: &Report) -> Result<(), XlsxError> {
        let title = Format::new().set_bold().set_font_size(14);
        let bold = Format::new().set_bold();
        let money = Format::new().set_num_format(MONEY_FORMAT);
        let total = Format::new().set_bold().set_num_format(MONEY_FORMAT);

        sheet.set_column_width(0, 28.0)?;
        sheet.set_column_width(1, 18.0)?;

        sheet.write_string_with_format(0, 0, &self.settings.title, &title)?;
        let mut row: u32 = 1;
        for (label, value) in [
            ("Company", self.settings.company.as_str()),
            ("Prepared by", self.settings.prepared_by.as_str()),
        ] {
            if !value.is_empty() {
                sheet.write_string_with_format(row, 0, label, &bold)?;
                sheet.write_string(row, 1, value)?;
                row += 1;
            }
        }
        for (key, value) in report.meta() {
            sheet.write_string_with_format(row, 0, key, &bold)?;
            sheet.write_string(row, 1, meta_text(value))?;
            row += 1;
        }

        row += 1;
        sheet.write_string_with_format(row, 0, "Category", &bold)?;
        sheet.write_string_with_format(row, 1, "Amount", &bold)?;
        row += 1;

        let last = report.rows.len().saturating_sub(1);
        for (i, line) in report.rows.iter().enumerate() {
            let format = if i == last { &total } else { &money };
            sheet.write_string(row, 0, &line.label)?;
            sheet.write_number_with_format(row, 1, line.amount, format)?;
            row += 1;
        }
        Ok(())
    }
}

fn write_detail(sheet: &mut Worksheet, report: &Report) -> Result<(), XlsxError> {
    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    let money = Format::new().set_num_format(MONEY_FORMAT);
    let subtotal = Format::new().set_bold().set_num_format(MONEY_FORMAT);

    for (col, (name, width)) in [
        ("WBS", 14.0),
        ("Category", 16.0),
        ("Item", 14.0),
        ("Description", 40.0),
        ("Amount", 16.0),
        ("Included", 10.0),
    ]
    .into_iter()
    .enumerate()
    {
        let col = col as u16;
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, name, &header)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let mut row: u32 = 1;
    for line in &report.details {
        sheet.write_string(row, 0, &line.wbs)?;
        sheet.write_string(row, 1, line.category.display_name())?;
        sheet.write_string(row, 2, &line.item)?;
        sheet.write_string(row, 3, &line.description)?;
        sheet.write_number_with_format(row, 4, line.amount, &money)?;
        sheet.write_boolean(row, 5, line.included)?;
        row += 1;
    }

    row += 1;
    for group in report.wbs_subtotals() {
        sheet.write_string_with_format(row, 0, &group.wbs, &subtotal)?;
        sheet.write_string(row, 3, "Subtotal")?;
        sheet.write_number_with_format(row, 4, group.amount, &subtotal)?;
        row += 1;
    }
    Ok(())
}

fn meta_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Exporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>> {
        self.build(report)
            .map_err(|e| EstimateError::export_failed(self.format().name(), e.to_string()))
    }
}
