use std::collections::BTreeMap;

use crate::grid::{Grid, Position};

/// Number of coincident timelines. Every splitter encounter can double it, so
/// this is kept wide.
pub type Weight = u128;

/// Active columns of the row being swept, each with its timeline count.
///
/// Zero weights are never stored, so every key is a live column.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Frontier {
    beams: BTreeMap<usize, Weight>,
}

impl Frontier {
    pub fn single(column: usize) -> Self {
        let mut frontier = Self::default();
        frontier.add(column, 1);
        frontier
    }

    /// Merges `weight` timelines into `column`.
    pub fn add(&mut self, column: usize, weight: Weight) {
        if weight == 0 {
            return;
        }
        *self.beams.entry(column).or_default() += weight;
    }

    pub fn get(&self, column: usize) -> Weight {
        self.beams.get(&column).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    /// Iterates `(column, weight)` in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Weight)> + '_ {
        self.beams.iter().map(|(&column, &weight)| (column, weight))
    }

    pub fn total(&self) -> Weight {
        self.beams.values().sum()
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Totals {
    /// One per occupied splitter cell per row, regardless of weight.
    pub split_count: u64,
    /// Timelines that left the grid sideways or past the last row.
    pub finished_timelines: Weight,
}

/// What happened while sweeping a single row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RowOutcome {
    pub row: usize,
    pub active: usize,
    pub splits: u64,
    pub exited: Weight,
}

/// Row-by-row sweep of a beam through a [`Grid`].
///
/// Each call to [`Simulation::step`] consumes the frontier of the current row
/// and replaces it with the one for the row below.
#[derive(Debug)]
pub struct Simulation<'g> {
    grid: &'g Grid,
    row: usize,
    frontier: Frontier,
    totals: Totals,
}

impl<'g> Simulation<'g> {
    pub fn new(grid: &'g Grid, start: Position) -> Self {
        Self {
            grid,
            row: start.row,
            frontier: Frontier::single(start.column),
            totals: Totals::default(),
        }
    }

    /// Row the current frontier sits on.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty() || self.row >= self.grid.height()
    }

    /// Sweeps the current row. Returns `None` once no timelines remain.
    pub fn step(&mut self) -> Option<RowOutcome> {
        if self.is_finished() {
            return None;
        }

        let row = self.row;
        let width = self.grid.width();
        let last_row = row + 1 >= self.grid.height();

        let mut next = Frontier::default();
        let mut outcome = RowOutcome {
            row,
            active: 0,
            splits: 0,
            exited: 0,
        };

        for (column, weight) in self.frontier.iter() {
            let Some(tile) = self.grid.get(row, column) else {
                continue;
            };
            outcome.active += 1;

            if tile.is_splitter() {
                outcome.splits += 1;

                // Both branches inherit the full weight
                let branches = [column.checked_sub(1), Some(column + 1)];
                for branch in branches {
                    match branch {
                        _ if last_row => outcome.exited += weight,
                        Some(c) if c < width => next.add(c, weight),
                        // Left the grid sideways
                        _ => outcome.exited += weight,
                    }
                }
            } else if last_row {
                outcome.exited += weight;
            } else {
                next.add(column, weight);
            }
        }

        tracing::trace!(
            row,
            active = outcome.active,
            splits = outcome.splits,
            exited = %outcome.exited,
            "swept row"
        );

        self.totals.split_count += outcome.splits;
        self.totals.finished_timelines += outcome.exited;
        self.frontier = next;
        self.row += 1;

        Some(outcome)
    }

    pub fn run(mut self) -> Totals {
        while self.step().is_some() {}
        self.totals
    }
}

impl Iterator for Simulation<'_> {
    type Item = RowOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

/// Sends one beam down from `start` and returns the accumulated totals.
#[tracing::instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn simulate(grid: &Grid, start: Position) -> Totals {
    let totals = Simulation::new(grid, start).run();
    tracing::debug!(
        split_count = totals.split_count,
        finished_timelines = %totals.finished_timelines,
        "simulation finished"
    );
    totals
}
