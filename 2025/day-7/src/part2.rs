use miette::*;

use crate::grid::Grid;
use crate::simulator::simulate;

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    let grid: Grid = input.parse()?;

    // Every splitter encounter turns one timeline into two, so the count of
    // timelines leaving the manifold grows exponentially with depth.
    let totals = simulate(&grid, grid.start());

    Ok(totals.finished_timelines.to_string())
}
