#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The 9×9 Sudoku board.
//!
//! A [`Board`] is a fixed 9×9 grid of digits where `0` marks an empty cell.
//! Boards parse from the conventional flattened 81-character puzzle string
//! (`'.'` or `'0'` for empty cells) and render back either as a compact
//! 81-character line or as the box-drawing grid used by the command line.

use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the board.
pub const GRID_SIZE: usize = 9;

/// Side length of one 3×3 sub-grid.
pub const BOX_SIZE: usize = 3;

/// The digit standing for an empty cell.
pub const EMPTY_CELL: u8 = 0;

/// Number of cells on the board.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// The widely reproduced introductory puzzle, kept around for tests,
/// benchmarks and documentation examples.
pub const EXAMPLE_PUZZLE: [[u8; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// The unique solution of [`EXAMPLE_PUZZLE`].
pub const EXAMPLE_SOLUTION: [[u8; 9]; 9] = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

/// Errors produced when parsing a flattened puzzle string.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseBoardError {
    /// The string did not contain exactly 81 cells.
    #[error("expected {CELL_COUNT} cells, found {0}")]
    BadLength(usize),

    /// A cell position held something other than `0`-`9` or `'.'`.
    #[error("invalid cell character {found:?} at position {index}")]
    BadCharacter {
        /// Zero-based offset of the offending character.
        index: usize,
        /// The character found there.
        found: char,
    },
}

/// A 9×9 grid of digits in `[0, 9]`, where `0` denotes an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board([[u8; GRID_SIZE]; GRID_SIZE]);

impl Board {
    /// Wraps a raw grid. Digits are taken as given; the search engine
    /// checks the givens for consistency before it starts.
    #[must_use]
    pub const fn new(cells: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(cells)
    }

    /// The digit at `(row, col)`, `0` for an empty cell.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    /// Writes `digit` at `(row, col)`. `EMPTY_CELL` clears the cell.
    pub const fn set(&mut self, row: usize, col: usize, digit: u8) {
        self.0[row][col] = digit;
    }

    /// Whether the cell at `(row, col)` is empty.
    #[must_use]
    pub const fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.0[row][col] == EMPTY_CELL
    }

    /// Top-left corner of the 3×3 sub-grid containing `(row, col)`.
    #[must_use]
    pub const fn box_origin(row: usize, col: usize) -> (usize, usize) {
        ((row / BOX_SIZE) * BOX_SIZE, (col / BOX_SIZE) * BOX_SIZE)
    }

    /// Iterates the rows of the board in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u8; GRID_SIZE]> {
        self.0.iter()
    }

    /// Number of empty cells remaining.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.rows()
            .flat_map(|row| row.iter())
            .filter(|&&digit| digit == EMPTY_CELL)
            .count()
    }

    /// Serializes the board as an 81-character digit string, `'0'` for
    /// empty cells. The inverse of [`FromStr`] up to the `'.'` alias.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.rows()
            .flat_map(|row| row.iter())
            .map(|digit| char::from(b'0' + digit))
            .collect()
    }

    /// Renders this board and `other` side by side, line by line. Used by
    /// the command line to show a puzzle next to its solution.
    #[must_use]
    pub fn side_by_side(&self, other: &Self) -> String {
        self.to_string()
            .lines()
            .zip(other.to_string().lines())
            .map(|(left, right)| format!("{left}     {right}"))
            .join("\n")
    }
}

impl From<[[u8; GRID_SIZE]; GRID_SIZE]> for Board {
    fn from(cells: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self::new(cells)
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses the flattened 81-character form, with `'.'` and `'0'` both
    /// accepted for empty cells.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != CELL_COUNT {
            return Err(ParseBoardError::BadLength(count));
        }

        let mut cells = [[EMPTY_CELL; GRID_SIZE]; GRID_SIZE];
        for (index, ch) in s.chars().enumerate() {
            let digit = match ch {
                '.' | '0' => EMPTY_CELL,
                '1'..='9' => ch as u8 - b'0',
                found => return Err(ParseBoardError::BadCharacter { index, found }),
            };
            cells[index / GRID_SIZE][index % GRID_SIZE] = digit;
        }

        Ok(Self(cells))
    }
}

impl fmt::Display for Board {
    /// Box-drawing rendering with `'.'` for empty cells:
    ///
    /// ```text
    /// ┌─────────┬─────────┬─────────┐
    /// │ 5  3  . │ .  7  . │ .  .  . │
    /// ...
    /// └─────────┴─────────┴─────────┘
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─────────┬─────────┬─────────┐")?;

        for (i, row) in self.0.iter().enumerate() {
            if i > 0 && i % BOX_SIZE == 0 {
                writeln!(f, "├─────────┼─────────┼─────────┤")?;
            }

            write!(f, "│")?;
            for (j, &digit) in row.iter().enumerate() {
                if digit == EMPTY_CELL {
                    write!(f, " . ")?;
                } else {
                    write!(f, " {digit} ")?;
                }
                if (j + 1) % BOX_SIZE == 0 {
                    write!(f, "│")?;
                }
            }
            writeln!(f)?;
        }

        write!(f, "└─────────┴─────────┴─────────┘")
    }
}
