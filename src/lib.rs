#![deny(missing_docs)]
//! An instrumented Sudoku solver built on MRV-guided backtracking search,
//! together with the CSV dataset handling and result reporting used to
//! study its behavior over large puzzle collections.

/// The `dataset` module loads, filters, samples and saves CSV puzzle sets.
pub mod dataset;

/// The `report` module tracks solve results and turns them into summary
/// statistics, CSV exports and printed reports.
pub mod report;

/// The `solver` module implements the constraint-satisfaction core: the
/// board, constraint checking, candidate domains, cell selection and the
/// backtracking search engine.
pub mod solver;
