use miette::*;

use crate::grid::Grid;
use crate::simulator::simulate;

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    let grid: Grid = input.parse()?;

    // Only the number of occupied splitter cells matters here, merged beams
    // count once per row.
    let totals = simulate(&grid, grid.start());

    Ok(totals.split_count.to_string())
}
