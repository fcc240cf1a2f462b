//! # sudoku-solver
//!
//! An instrumented command-line Sudoku solver. Puzzles are solved by
//! backtracking search guided by the MRV (minimum remaining values)
//! heuristic, with per-solve performance counters (maximum recursion
//! depth, backtrack count) collected along the way.
//!
//! ## Features
//!
//! - **Multiple inputs**: an inline 81-character grid, puzzle files (one
//!   grid per line), whole directories of puzzle files, or CSV datasets
//!   with `question`/`answer`/`rating`/`source` columns.
//! - **Configurable selection**: MRV or naive first-empty cell ordering.
//! - **Verification**: solutions are re-validated against the full rule
//!   set, and against the dataset's reference answer when one is present.
//! - **Statistics**: per-solve reports, batch summaries, CSV export of
//!   results and allocator memory figures.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a puzzle file
//! sudoku-solver puzzles.txt
//!
//! # Solve an inline grid with the naive ordering
//! sudoku-solver solve --grid "53..7....6..195...." --selection first-empty
//!
//! # Sample 500 puzzles from a dataset and export the results
//! sudoku-solver dataset --path sudoku.csv -n 500 --seed 42 --export results.csv
//! ```

use clap::Parser;

mod command_line;

use command_line::cli;

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let parsed = cli::Cli::parse();

    if let Err(e) = cli::run(parsed) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
