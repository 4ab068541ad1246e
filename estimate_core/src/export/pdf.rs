//! # PDF Export
//!
//! Generates the estimate summary document using Typst.
//!
//! ## Architecture
//!
//! - The page setup is a fixed Typst preamble; the body is assembled from
//!   the report rows
//! - Tables use `table.header`, so they break across pages with the header
//!   row repeated
//! - Output is raw PDF bytes (`Vec<u8>`)

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use serde_json::Value;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;
use uuid::Uuid;

use super::{ExportFormat, Exporter};
use crate::config::ReportSettings;
use crate::errors::{EstimateError, EstimateResult};
use crate::money::format_amount;
use crate::report::Report;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed once per process.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect()
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// Document
// ============================================================================

const PREAMBLE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 0.9in, bottom: 0.9in, left: 0.8in, right: 0.8in),
  header: align(right)[
    #text(size: 8pt, fill: gray)[{{TITLE}}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[Report {{REPORT_ID}}]],
      align(center)[#text(size: 8pt)[Page #counter(page).display() of #counter(page).final().first()]],
      align(right)[#text(size: 8pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#eef1f4"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    #v(2pt)
    #text(size: 11pt)[{{SUBTITLE}}]
  ]
]

#v(10pt)
"##;

/// Typst summary document.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    settings: ReportSettings,
}

impl PdfExporter {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    /// Typst source for a report.
    pub fn source(&self, report: &Report) -> String {
        let settings = &self.settings;
        let subtitle = [settings.company.as_str(), settings.prepared_by.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");

        let mut source = PREAMBLE
            .replace("{{TITLE}}", &escape_typst(&settings.title))
            .replace("{{SUBTITLE}}", &escape_typst(&subtitle))
            .replace("{{REPORT_ID}}", &Uuid::new_v4().simple().to_string()[..8])
            .replace("{{DATE}}", &Local::now().format("%Y-%m-%d").to_string());

        source.push_str(&self.meta_block(report));
        source.push_str(&self.summary_table(report));
        source.push_str(&self.detail_table(report));
        source
    }

    fn meta_block(&self, report: &Report) -> String {
        if report.meta().is_empty() {
            return String::new();
        }
        let cells: Vec<String> = report
            .meta()
            .iter()
            .map(|(key, value)| {
                format!(
                    "  [*{}*], [{}],",
                    escape_typst(&humanize(key)),
                    escape_typst(&meta_text(value))
                )
            })
            .collect();

        format!(
            "#table(\n  columns: (auto, 1fr),\n  stroke: none,\n  inset: 3pt,\n{}\n)\n\n#v(8pt)\n",
            cells.join("\n")
        )
    }

    fn summary_table(&self, report: &Report) -> String {
        let symbol = &self.settings.currency_symbol;
        let last = report.rows.len().saturating_sub(1);
        let cells: Vec<String> = report
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let label = escape_typst(&row.label);
                let amount = escape_typst(&format_amount(row.amount, symbol));
                if i == last {
                    format!("  [*{label}*], [*{amount}*],")
                } else {
                    format!("  [{label}], [{amount}],")
                }
            })
            .collect();

        format!(
            r##"== Cost Summary

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Category*], [*Amount*]),
{}
)

#v(12pt)
"##,
            cells.join("\n")
        )
    }

    fn detail_table(&self, report: &Report) -> String {
        if report.details.is_empty() {
            return String::new();
        }
        let symbol = &self.settings.currency_symbol;
        let cells: Vec<String> = report
            .details
            .iter()
            .map(|row| {
                let amount = escape_typst(&format_amount(row.amount, symbol));
                let amount = if row.included {
                    amount
                } else {
                    format!("({amount})")
                };
                format!(
                    "  [{}], [{}], [{}], [{}], [{}],",
                    escape_typst(&row.wbs),
                    escape_typst(row.category.display_name()),
                    escape_typst(&row.item),
                    escape_typst(&row.description),
                    amount
                )
            })
            .collect();

        format!(
            r##"== Work Breakdown Detail

#table(
  columns: (auto, auto, auto, 1fr, auto),
  inset: 5pt,
  stroke: 0.5pt,
  align: (left, left, left, left, right),
  table.header([*WBS*], [*Category*], [*Item*], [*Description*], [*Amount*]),
{}
)

#text(size: 8pt, fill: gray)[Amounts in parentheses are carried for information and excluded from totals.]
"##,
            cells.join("\n")
        )
    }
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, report: &Report) -> EstimateResult<Vec<u8>> {
        let world = PdfWorld::new(self.source(report));
        let warned = typst::compile(&world);

        let document = warned.output.map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            EstimateError::export_failed(
                self.format().name(),
                format!("Typst compilation failed: {}", error_msgs.join("; ")),
            )
        })?;

        typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            EstimateError::export_failed(
                self.format().name(),
                format!("PDF rendering failed: {}", error_msgs.join("; ")),
            )
        })
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut leading_digits = true;
    for (i, c) in s.chars().enumerate() {
        let markup = matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~' | '/');
        // list, enum and heading markers only count at the start of a cell
        let leading = i == 0 && matches!(c, '=' | '-' | '+');
        let enum_marker = leading_digits && i > 0 && c == '.';
        leading_digits = leading_digits && c.is_ascii_digit();
        if markup || leading || enum_marker {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `preparedFor` -> `Prepared For`
fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut word_start = true;
    for c in key.chars() {
        if c == '_' {
            out.push(' ');
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

fn meta_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
