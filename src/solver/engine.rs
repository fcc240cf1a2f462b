#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The backtracking search engine.
//!
//! [`Engine`] drives the search: it asks its [`CellSelection`] for the
//! next cell, computes that cell's candidate domain, assigns candidates in
//! ascending order and recurses, undoing the assignment when a branch
//! fails. The first complete assignment found wins; an exhausted search is
//! the normal way of reporting an unsolvable puzzle.
//!
//! Each solve runs on a private copy of the caller's board and owns its
//! own [`SearchStats`], so independent engines may run on separate threads
//! without sharing anything.

use crate::solver::board::{Board, CELL_COUNT, EMPTY_CELL, GRID_SIZE};
use crate::solver::constraint::is_valid;
use crate::solver::domain::candidates;
use crate::solver::selection::{CellSelection, MinimumRemaining};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Counters describing the last search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Deepest recursion reached. A solve that finds the board already
    /// complete reports 1: the single call that discovered it.
    pub max_recursion_depth: usize,
    /// Number of candidate assignments tried and undone. Counted by the
    /// frame that made the assignment when the branch below it fails; a
    /// frame that dead-ends with an empty domain counts nothing itself.
    pub backtrack_count: usize,
}

/// The result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The working board. Holds the full solution when `solved` is true;
    /// its contents are unspecified otherwise.
    pub board: Board,
    /// Whether a complete valid assignment was found.
    pub solved: bool,
}

/// Errors that abort a solve before or during search. An unsolvable
/// puzzle is *not* an error; it comes back as [`Outcome`] with
/// `solved = false`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// A given digit already conflicts with its row, column or sub-grid.
    /// Detected before any search runs.
    #[error("given {digit} at ({row}, {col}) conflicts with its row, column or sub-grid")]
    InvalidInput {
        /// Row of the offending given.
        row: usize,
        /// Column of the offending given.
        col: usize,
        /// The conflicting digit.
        digit: u8,
    },

    /// The configured deadline elapsed mid-search.
    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// A backtracking Sudoku search engine, generic over its cell selection
/// strategy.
#[derive(Debug, Clone, Default)]
pub struct Engine<S: CellSelection = MinimumRemaining> {
    selector: S,
    limit: Option<Duration>,
    depth: usize,
    stats: SearchStats,
}

impl Engine<MinimumRemaining> {
    /// An engine with the default MRV selection strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: CellSelection> Engine<S> {
    /// An engine using the given selection strategy.
    #[must_use]
    pub fn with_selector(selector: S) -> Self {
        Self {
            selector,
            limit: None,
            depth: 0,
            stats: SearchStats::default(),
        }
    }

    /// Bounds each solve to `limit` of wall-clock time, checked on every
    /// recursive entry. Without one, an adversarial input can keep the
    /// search running for a very long time.
    #[must_use]
    pub const fn with_deadline(mut self, limit: Duration) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Solves `puzzle`, leaving the caller's board untouched.
    ///
    /// Counters reset at the start of every call, so [`Engine::metrics`]
    /// always describes the most recent solve.
    ///
    /// # Errors
    ///
    /// [`SolveError::InvalidInput`] if the givens already conflict, before
    /// any search is attempted; [`SolveError::DeadlineExceeded`] if a
    /// configured deadline elapses mid-search.
    pub fn solve(&mut self, puzzle: &Board) -> Result<Outcome, SolveError> {
        self.depth = 0;
        self.stats = SearchStats::default();

        check_givens(puzzle)?;

        let deadline = self.limit.map(|limit| (Instant::now() + limit, limit));
        let mut board = *puzzle;
        let solved = self.search(&mut board, deadline)?;

        Ok(Outcome { board, solved })
    }

    /// Counters from the most recent [`Engine::solve`] call.
    #[must_use]
    pub const fn metrics(&self) -> SearchStats {
        self.stats
    }

    /// One frame of the recursive search. Returns whether the board below
    /// this frame was completed.
    fn search(
        &mut self,
        board: &mut Board,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<bool, SolveError> {
        if let Some((at, limit)) = deadline {
            if Instant::now() >= at {
                return Err(SolveError::DeadlineExceeded(limit));
            }
        }

        self.depth += 1;
        self.stats.max_recursion_depth = self.stats.max_recursion_depth.max(self.depth);
        // The engine only recurses after assigning a fresh cell, plus one
        // final frame that detects completion, so the call stack can never
        // outgrow the board by more than that terminal frame.
        debug_assert!(self.depth <= CELL_COUNT + 1);

        let Some((row, col)) = self.selector.select(board) else {
            // No empty cell left: solved.
            self.depth -= 1;
            return Ok(true);
        };

        let domain = candidates(board, row, col);
        if domain.is_empty() {
            // Dead end. The caller that assigned the digit leading here
            // counts the backtrack, not this frame.
            self.depth -= 1;
            return Ok(false);
        }

        for digit in domain.digits() {
            board.set(row, col, digit);

            if self.search(board, deadline)? {
                self.depth -= 1;
                return Ok(true);
            }

            board.set(row, col, EMPTY_CELL);
            self.stats.backtrack_count += 1;
        }

        self.depth -= 1;
        Ok(false)
    }
}

/// Rejects boards whose givens already conflict with each other, so the
/// search never starts from an inconsistent state.
fn check_givens(board: &Board) -> Result<(), SolveError> {
    let mut probe = *board;

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let digit = board.get(row, col);
            if digit == EMPTY_CELL {
                continue;
            }

            probe.set(row, col, EMPTY_CELL);
            let ok = is_valid(&probe, row, col, digit);
            probe.set(row, col, digit);

            if !ok {
                return Err(SolveError::InvalidInput { row, col, digit });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::board::{EXAMPLE_PUZZLE, EXAMPLE_SOLUTION};
    use crate::solver::constraint::verify_solution;
    use crate::solver::selection::FirstEmpty;

    #[test]
    fn test_solves_example_puzzle() {
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::new();
        let outcome = engine.solve(&puzzle).unwrap();

        assert!(outcome.solved);
        assert_eq!(outcome.board, Board::new(EXAMPLE_SOLUTION));
        assert!(verify_solution(&outcome.board).0);
    }

    #[test]
    fn test_caller_board_is_untouched() {
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::new();
        engine.solve(&puzzle).unwrap();
        assert_eq!(puzzle, Board::new(EXAMPLE_PUZZLE));
    }

    #[test]
    fn test_complete_board_solves_immediately() {
        let board = Board::new(EXAMPLE_SOLUTION);
        let mut engine = Engine::new();
        let outcome = engine.solve(&board).unwrap();

        assert!(outcome.solved);
        assert_eq!(outcome.board, board);
        assert_eq!(
            engine.metrics(),
            SearchStats {
                max_recursion_depth: 1,
                backtrack_count: 0
            }
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::new();

        let first = engine.solve(&puzzle).unwrap();
        let first_stats = engine.metrics();
        let second = engine.solve(&puzzle).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_stats, engine.metrics());
    }

    #[test]
    fn test_empty_board_is_solvable() {
        let mut engine = Engine::new();
        let outcome = engine.solve(&Board::default()).unwrap();

        assert!(outcome.solved);
        let (ok, violations) = verify_solution(&outcome.board);
        assert!(ok, "violations: {violations:?}");
    }

    #[test]
    fn test_consistent_but_unsolvable_puzzle() {
        // Row 0 holds 1-8, and a 9 further down column 8 starves the last
        // cell of row 0. The givens are pairwise consistent, so this is a
        // normal failed search, not an input error.
        let mut board = Board::default();
        for (col, digit) in (1..=8).enumerate() {
            board.set(0, col, digit);
        }
        board.set(6, 8, 9);

        let mut engine = Engine::new();
        let outcome = engine.solve(&board).unwrap();
        assert!(!outcome.solved);
    }

    #[test]
    fn test_conflicting_givens_are_rejected() {
        // Duplicate 5 in row 0.
        let mut board = Board::new(EXAMPLE_PUZZLE);
        board.set(0, 8, 5);

        let mut engine = Engine::new();
        assert_eq!(
            engine.solve(&board),
            Err(SolveError::InvalidInput {
                row: 0,
                col: 0,
                digit: 5
            })
        );
    }

    #[test]
    fn test_first_empty_reaches_the_same_solution() {
        // The example puzzle has a unique solution, so the selection
        // strategy may change the effort but not the answer.
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::with_selector(FirstEmpty);
        let outcome = engine.solve(&puzzle).unwrap();

        assert!(outcome.solved);
        assert_eq!(outcome.board, Board::new(EXAMPLE_SOLUTION));
    }

    #[test]
    fn test_zero_deadline_expires() {
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::new().with_deadline(Duration::ZERO);
        assert_eq!(
            engine.solve(&puzzle),
            Err(SolveError::DeadlineExceeded(Duration::ZERO))
        );
    }

    #[test]
    fn test_generous_deadline_does_not_interfere() {
        let puzzle = Board::new(EXAMPLE_PUZZLE);
        let mut engine = Engine::new().with_deadline(Duration::from_secs(60));
        assert!(engine.solve(&puzzle).unwrap().solved);
    }

    #[test]
    fn test_forced_chain_counts_no_backtracks() {
        // Reopening a single cell of a solved grid leaves one forced
        // assignment: two frames deep, nothing undone.
        let mut board = Board::new(EXAMPLE_SOLUTION);
        board.set(4, 4, EMPTY_CELL);

        let mut engine = Engine::new();
        let outcome = engine.solve(&board).unwrap();

        assert!(outcome.solved);
        assert_eq!(
            engine.metrics(),
            SearchStats {
                max_recursion_depth: 2,
                backtrack_count: 0
            }
        );
    }
}
