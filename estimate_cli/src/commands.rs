//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use estimate_core::export::{export_to_file, exporter_for, ExportFormat};
use estimate_core::file_io::{read_document, save_output};
use estimate_core::validation::{json_schema, validate_estimate};
use estimate_core::{build_report, load_config, load_estimate, rollup, EstimateError};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Construction cost estimator: roll up direct costs and soft-cost markups.
#[derive(Parser)]
#[command(name = "estimate", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (defaults to ./estimator.toml when present).
    #[arg(long, global = true, env = "ESTIMATOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Export format as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum FormatArg {
    Json,
    Csv,
    WbsCsv,
    Xlsx,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::WbsCsv => ExportFormat::WbsCsv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compute the rollup and print the output document.
    Calc {
        /// Estimate document (JSON).
        file: PathBuf,

        /// Write the output document here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check a document against the input schema.
    Validate {
        /// Estimate document (JSON).
        file: PathBuf,
    },

    /// Render a report file.
    Export {
        /// Estimate document (JSON).
        file: PathBuf,

        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Output path (defaults to <output_dir>/<file stem>.<ext>).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Report title, overriding the settings file.
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the JSON Schema for estimate documents.
    Schema,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Logs go to stderr so stdout stays machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "estimate_core=warn,estimate=info",
        1 => "estimate_core=debug,estimate=debug",
        _ => "estimate_core=trace,estimate=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    let outcome = match cli.command {
        Command::Calc { file, out } => cmd_calc(&file, out.as_deref()),
        Command::Validate { file } => cmd_validate(&file),
        Command::Export {
            file,
            format,
            out,
            title,
        } => cmd_export(
            &file,
            format.into(),
            out.as_deref(),
            title,
            config_path.as_deref(),
        ),
        Command::Schema => cmd_schema(),
    };

    outcome.map_err(|e| {
        report_json(&e);
        eyre!(e)
    })
}

/// Failed operations also leave the structured error on stderr.
fn report_json(error: &EstimateError) {
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!("{json}");
    }
}

fn cmd_calc(file: &Path, out: Option<&Path>) -> Result<(), EstimateError> {
    let estimate = load_estimate(file)?;
    let output = rollup::run(&estimate)?;

    match out {
        Some(path) => {
            save_output(&output, path)?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let json = serde_json::to_string_pretty(&output).map_err(|e| {
                EstimateError::SerializationError {
                    reason: e.to_string(),
                }
            })?;
            println!("{json}");
        }
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), EstimateError> {
    let document = read_document(file)?;
    validate_estimate(&document)?;
    println!("{}: valid", file.display());
    Ok(())
}

fn cmd_export(
    file: &Path,
    format: ExportFormat,
    out: Option<&Path>,
    title: Option<String>,
    config_path: Option<&Path>,
) -> Result<(), EstimateError> {
    let mut config = load_config(config_path)?;
    if let Some(title) = title {
        config.report.title = title;
    }

    let estimate = load_estimate(file)?;
    let report = build_report(&estimate)?;

    let path = match out {
        Some(path) => path.to_path_buf(),
        None => default_output_path(&config.export.output_dir, file, format),
    };

    let exporter = exporter_for(format, &config.report);
    export_to_file(exporter.as_ref(), &report, &path)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_schema() -> Result<(), EstimateError> {
    let json = serde_json::to_string_pretty(&json_schema()).map_err(|e| {
        EstimateError::SerializationError {
            reason: e.to_string(),
        }
    })?;
    println!("{json}");
    Ok(())
}

/// `<output_dir>/<file stem>.<ext>`
fn default_output_path(output_dir: &Path, input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "estimate".to_string());
    output_dir.join(format!("{stem}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("reports"), Path::new("jobs/pump-4.json"), ExportFormat::Pdf);
        assert_eq!(path, PathBuf::from("reports/pump-4.pdf"));

        let path = default_output_path(Path::new("."), Path::new("pump-4.json"), ExportFormat::WbsCsv);
        assert_eq!(path, PathBuf::from("./pump-4.wbs.csv"));
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::parse_from([
            "estimate", "-vv", "export", "job.json", "--format", "wbs-csv", "--out", "x.csv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Export { format, out, .. } => {
                assert_eq!(ExportFormat::from(format), ExportFormat::WbsCsv);
                assert_eq!(out, Some(PathBuf::from("x.csv")));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_format_args_cover_every_format() {
        use clap::ValueEnum;
        let mapped: Vec<ExportFormat> = FormatArg::value_variants()
            .iter()
            .map(|arg| ExportFormat::from(*arg))
            .collect();
        assert_eq!(mapped, ExportFormat::ALL.to_vec());
    }
}
