#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Cell selection heuristics.
//!
//! The search engine asks a [`CellSelection`] which empty cell to branch on
//! next. [`MinimumRemaining`] implements the MRV (minimum remaining values)
//! heuristic the solver is built around; [`FirstEmpty`] is the naive
//! baseline kept for comparison in the benchmarks.

use crate::solver::board::{Board, GRID_SIZE};
use crate::solver::domain::candidates;
use std::fmt;
use std::str::FromStr;

/// Picks the next cell for the search engine to branch on.
///
/// `select` returns `None` exactly when the board has no empty cell left,
/// which the engine takes as the solved base case. A returned cell may
/// have an empty domain; detecting that dead end is the engine's job, not
/// the selector's.
pub trait CellSelection {
    /// The `(row, col)` of the next cell to assign, or `None` when the
    /// board is fully assigned.
    fn select(&self, board: &Board) -> Option<(usize, usize)>;
}

/// Minimum-remaining-values selection.
///
/// Scans the board in row-major order, tracking the empty cell with the
/// smallest candidate domain seen so far; the earliest cell wins ties. A
/// domain of size one cannot be beaten, so the scan stops the moment one
/// turns up and forced cells are always resolved first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinimumRemaining;

impl CellSelection for MinimumRemaining {
    fn select(&self, board: &Board) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut best_size = usize::MAX;

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if !board.is_empty_cell(row, col) {
                    continue;
                }

                let size = candidates(board, row, col).len();
                if size < best_size {
                    best_size = size;
                    best = Some((row, col));
                }

                if size == 1 {
                    return best;
                }
            }
        }

        best
    }
}

/// The first empty cell in row-major order, domains ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstEmpty;

impl CellSelection for FirstEmpty {
    fn select(&self, board: &Board) -> Option<(usize, usize)> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if board.is_empty_cell(row, col) {
                    return Some((row, col));
                }
            }
        }

        None
    }
}

/// Selection strategy chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    /// [`MinimumRemaining`].
    #[default]
    MinimumRemaining,
    /// [`FirstEmpty`].
    FirstEmpty,
}

impl CellSelection for SelectionType {
    fn select(&self, board: &Board) -> Option<(usize, usize)> {
        match self {
            Self::MinimumRemaining => MinimumRemaining.select(board),
            Self::FirstEmpty => FirstEmpty.select(board),
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinimumRemaining => write!(f, "mrv"),
            Self::FirstEmpty => write!(f, "first-empty"),
        }
    }
}

impl FromStr for SelectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mrv" => Ok(Self::MinimumRemaining),
            "first-empty" => Ok(Self::FirstEmpty),
            other => Err(format!(
                "unknown selection strategy {other:?} (expected \"mrv\" or \"first-empty\")"
            )),
        }
    }
}
