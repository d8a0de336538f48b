use std::fs;
use std::path::PathBuf;

use clap::Parser;
use miette::*;
use tracing_subscriber::EnvFilter;

use tachyon_beams::grid::{Grid, GridError};
use tachyon_beams::report::Summary;
use tachyon_beams::simulator::simulate;

/// Counts beam splits and exiting timelines in a tachyon manifold.
#[derive(Parser, Debug)]
#[command(name = "tachyon-beams", version, about)]
struct Cli {
    /// Grid file: one row per line, `S` marks the entry point and `^` a splitter.
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?;

    let grid: Grid = match input.parse() {
        Ok(grid) => grid,
        Err(GridError::MissingStart) => {
            eprintln!("Error: Start position 'S' not found.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let totals = simulate(&grid, grid.start());
    tracing::info!(split_count = totals.split_count, "sweep complete");

    println!("{}", Summary::from(totals));
    Ok(())
}
