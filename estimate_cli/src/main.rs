//! # estimate CLI
//!
//! Command-line front end for the cost rollup engine: compute an estimate,
//! validate a document, export reports, print the input schema.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
