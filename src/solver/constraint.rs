#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Pure constraint predicates over a [`Board`].
//!
//! Placement legality ([`is_valid`]), full-solution verification
//! ([`verify_solution`]) and completeness ([`is_complete`]) are free
//! functions with no state of their own; everything they need is the board
//! they inspect.

use crate::solver::board::{BOX_SIZE, Board, EMPTY_CELL, GRID_SIZE};
use std::fmt;

/// Bitmask with one bit set per digit 1-9; a row, column or sub-grid whose
/// digits fold to exactly this mask is a permutation of 1-9.
const FULL_MASK: u16 = 0b11_1111_1110;

/// Checks whether placing `digit` at `(row, col)` keeps the board
/// consistent: the digit must not already occur in the cell's row, column
/// or 3×3 sub-grid.
///
/// The probed cell is not required to be empty; callers only probe cells
/// they intend to assign.
#[must_use]
pub fn is_valid(board: &Board, row: usize, col: usize, digit: u8) -> bool {
    for i in 0..GRID_SIZE {
        if board.get(row, i) == digit || board.get(i, col) == digit {
            return false;
        }
    }

    let (box_row, box_col) = Board::box_origin(row, col);
    for r in box_row..box_row + BOX_SIZE {
        for c in box_col..box_col + BOX_SIZE {
            if board.get(r, c) == digit {
                return false;
            }
        }
    }

    true
}

/// Whether every cell holds a digit.
#[must_use]
pub fn is_complete(board: &Board) -> bool {
    board.rows().flatten().all(|&digit| digit != EMPTY_CELL)
}

/// One failed uniqueness constraint found by [`verify_solution`].
///
/// Indices are zero-based internally; the [`fmt::Display`] text reports
/// them one-based, matching how people number rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A row that is not a permutation of 1-9.
    Row(usize),
    /// A column that is not a permutation of 1-9.
    Column(usize),
    /// A 3×3 sub-grid that is not a permutation of 1-9, addressed by its
    /// (band, stack) position in the 3×3 arrangement of sub-grids.
    Box(usize, usize),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "Row {} is invalid", row + 1),
            Self::Column(col) => write!(f, "Column {} is invalid", col + 1),
            Self::Box(band, stack) => {
                write!(f, "Sub-grid at ({}, {}) is invalid", band + 1, stack + 1)
            }
        }
    }
}

/// Re-validates a filled board from scratch: every row, every column and
/// every 3×3 sub-grid must be exactly a permutation of 1-9.
///
/// Collects one [`Violation`] per failing unit, rows first, then columns,
/// then sub-grids in band-major order, rather than stopping at the first.
/// Makes no assumption about where the board came from.
#[must_use]
pub fn verify_solution(board: &Board) -> (bool, Vec<Violation>) {
    let mut violations = Vec::new();

    for row in 0..GRID_SIZE {
        if !is_permutation((0..GRID_SIZE).map(|col| board.get(row, col))) {
            violations.push(Violation::Row(row));
        }
    }

    for col in 0..GRID_SIZE {
        if !is_permutation((0..GRID_SIZE).map(|row| board.get(row, col))) {
            violations.push(Violation::Column(col));
        }
    }

    for band in 0..BOX_SIZE {
        for stack in 0..BOX_SIZE {
            let digits = (0..BOX_SIZE).flat_map(|r| {
                (0..BOX_SIZE).map(move |c| board.get(band * BOX_SIZE + r, stack * BOX_SIZE + c))
            });
            if !is_permutation(digits) {
                violations.push(Violation::Box(band, stack));
            }
        }
    }

    (violations.is_empty(), violations)
}

/// Whether the nine digits are exactly 1-9, each once. A `0` or any
/// repeated digit fails.
fn is_permutation(digits: impl Iterator<Item = u8>) -> bool {
    let mut seen = 0_u16;
    for digit in digits {
        if digit == EMPTY_CELL || seen & (1 << digit) != 0 {
            return false;
        }
        seen |= 1 << digit;
    }
    seen == FULL_MASK
}
