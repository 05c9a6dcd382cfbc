extern crate heat_pump_uptake;

use anyhow::Context;
use clap::Parser;
use heat_pump_uptake::input::historical_data_from_path;
use heat_pump_uptake::output::ConsoleOutput;
use heat_pump_uptake::{run_analysis, INPUT_FILE};
use std::path::Path;

/// Fits heat pump uptake to historical prices and subsidies and projects yearly installations for
/// a catalogue of policy scenarios. Historical data is read from gb_heat_V2.xlsx in the working
/// directory.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct UptakeArgs {}

fn main() -> anyhow::Result<()> {
    UptakeArgs::parse();

    // logs go to stderr so they do not interleave with the report
    let tracing_subscriber = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(tracing_subscriber)
        .context("setting tracing subscriber failed")?;

    let records = historical_data_from_path(Path::new(INPUT_FILE))
        .with_context(|| format!("Could not read historical data file {INPUT_FILE}"))?;

    run_analysis(&records, ConsoleOutput)?;

    Ok(())
}
