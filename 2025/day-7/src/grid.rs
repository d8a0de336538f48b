use std::fmt;
use std::str::FromStr;

use chumsky::prelude::*;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Splitter,
    /// Where the beam enters. Propagates exactly like `Empty`.
    Start,
}

impl Tile {
    pub fn is_splitter(self) -> bool {
        matches!(self, Tile::Splitter)
    }
}

impl From<char> for Tile {
    fn from(c: char) -> Self {
        match c {
            '^' => Tile::Splitter,
            'S' => Tile::Start,
            // Anything else ('.') is open space
            _ => Tile::Empty,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.column)
    }
}

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum GridError {
    #[error("failed to parse grid: {0}")]
    #[diagnostic(code(tachyon::grid::parse))]
    Parse(String),

    #[error("row {row} has {found} cells, expected {expected}")]
    #[diagnostic(
        code(tachyon::grid::ragged),
        help("every row of the manifold must have the same width")
    )]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("start position 'S' not found in grid")]
    #[diagnostic(code(tachyon::grid::missing_start))]
    MissingStart,

    #[error("second start position 'S' at {second}, first one at {first}")]
    #[diagnostic(
        code(tachyon::grid::duplicate_start),
        help("the grid must contain exactly one 'S'")
    )]
    DuplicateStart { first: Position, second: Position },
}

/// An immutable, rectangular tachyon manifold stored row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: Position,
}

impl Grid {
    /// Builds a grid from already tokenized rows.
    ///
    /// Trailing empty rows are dropped, the remaining rows must all share the
    /// width of the first one, and exactly one of them must hold the start.
    pub fn from_rows(mut rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }

        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut start: Option<Position> = None;
        let mut tiles = Vec::with_capacity(width * height);

        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }

            for (column, tile) in cells.into_iter().enumerate() {
                if tile == Tile::Start {
                    let here = Position::new(row, column);
                    if let Some(first) = start {
                        return Err(GridError::DuplicateStart {
                            first,
                            second: here,
                        });
                    }
                    start = Some(here);
                }
                tiles.push(tile);
            }
        }

        let start = start.ok_or(GridError::MissingStart)?;

        Ok(Grid {
            width,
            height,
            tiles,
            start,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the tile at `(row, column)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<Tile> {
        if row >= self.height || column >= self.width {
            return None;
        }
        Some(self.tiles[row * self.width + column])
    }

    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.get(position.row, position.column)
    }
}

/// One row per line, one tile per character. Line breaks may be `\n` or `\r\n`.
fn parser<'a>() -> impl Parser<'a, &'a str, Vec<Vec<Tile>>, extra::Err<Rich<'a, char>>> {
    let tile = none_of("\r\n").map(Tile::from);

    tile.repeated()
        .collect::<Vec<_>>()
        .separated_by(text::newline())
        .allow_trailing()
        .collect::<Vec<_>>()
}

impl FromStr for Grid {
    type Err = GridError;

    #[tracing::instrument(skip_all, fields(len = input.len()))]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rows = parser().parse(input).into_result().map_err(|errors| {
            GridError::Parse(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let grid = Grid::from_rows(rows)?;
        tracing::debug!(
            width = grid.width,
            height = grid.height,
            start = %grid.start,
            "parsed grid"
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn parses_dimensions_and_start() -> miette::Result<()> {
        let grid: Grid = "..S..
.....
..^..
.....".parse()?;

        assert_eq!(5, grid.width());
        assert_eq!(4, grid.height());
        assert_eq!(Position::new(0, 2), grid.start());
        assert_eq!(Some(Tile::Start), grid.get(0, 2));
        assert_eq!(Some(Tile::Splitter), grid.tile(Position::new(2, 2)));
        assert_eq!(Some(Tile::Empty), grid.get(3, 4));
        Ok(())
    }

    #[test]
    fn out_of_bounds_lookups_are_none() -> miette::Result<()> {
        let grid: Grid = "S.\n..".parse()?;
        assert_eq!(None, grid.get(2, 0));
        assert_eq!(None, grid.get(0, 2));
        Ok(())
    }

    #[rstest]
    #[case::lf("S.\n^.\n")]
    #[case::crlf("S.\r\n^.\r\n")]
    #[case::trailing_blank_lines("S.\n^.\n\n\n")]
    #[case::no_trailing_newline("S.\n^.")]
    fn accepts_line_ending_variants(#[case] input: &str) -> miette::Result<()> {
        let grid: Grid = input.parse()?;
        assert_eq!(2, grid.width());
        assert_eq!(2, grid.height());
        assert_eq!(Some(Tile::Splitter), grid.get(1, 0));
        Ok(())
    }

    #[test]
    fn unknown_symbols_are_empty() -> miette::Result<()> {
        let grid: Grid = "xS#\n|~ ".parse()?;
        assert!((0..3).all(|c| grid.get(1, c) == Some(Tile::Empty)));
        assert_eq!(Some(Tile::Empty), grid.get(0, 0));
        Ok(())
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_dots("...\n...")]
    fn missing_start_is_reported(#[case] input: &str) {
        assert_eq!(Err(GridError::MissingStart), input.parse::<Grid>());
    }

    #[test]
    fn duplicate_start_is_rejected() {
        assert_eq!(
            Err(GridError::DuplicateStart {
                first: Position::new(0, 1),
                second: Position::new(2, 0),
            }),
            ".S.\n...\nS..".parse::<Grid>()
        );
    }

    #[rstest]
    #[case::short_row("..S..\n...\n.....", 1, 3)]
    #[case::long_row("..S..\n.....\n......", 2, 6)]
    #[case::blank_row_inside("..S..\n\n.....", 1, 0)]
    fn ragged_rows_fail_fast(#[case] input: &str, #[case] row: usize, #[case] found: usize) {
        assert_eq!(
            Err(GridError::Ragged {
                row,
                expected: 5,
                found,
            }),
            input.parse::<Grid>()
        );
    }
}
