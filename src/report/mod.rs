#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Result tracking, summary statistics and CSV export.
//!
//! A [`Tracker`] accumulates one [`SolveRecord`] per solve attempt and
//! turns them into a [`Summary`], a results CSV, or the boxed report
//! tables printed by the command line.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Metrics recorded for a single solve attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRecord {
    /// Where the puzzle came from.
    pub source: String,
    /// Difficulty rating as published by the dataset.
    pub rating: f64,
    /// Wall-clock time the solve took.
    pub duration: Duration,
    /// Deepest recursion the search reached.
    pub max_recursion_depth: usize,
    /// Candidate assignments tried and undone.
    pub backtrack_count: usize,
    /// Whether the search found a complete assignment.
    pub solved: bool,
    /// Whether the returned grid passed full re-validation.
    pub solution_correct: bool,
}

/// Aggregate statistics over a batch of solve attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of attempts.
    pub total: usize,
    /// Attempts that produced a complete assignment.
    pub solved: usize,
    /// `solved / total`, as a percentage.
    pub solve_rate: f64,
    /// Mean solve time in seconds.
    pub avg_time: f64,
    /// Fastest solve in seconds.
    pub min_time: f64,
    /// Slowest solve in seconds.
    pub max_time: f64,
    /// Mean of the per-solve maximum recursion depths.
    pub avg_depth: f64,
    /// Mean backtrack count.
    pub avg_backtracks: f64,
    /// Attempts whose grid passed re-validation.
    pub correct: usize,
    /// Attempt counts per puzzle source, sorted by source name.
    pub by_source: Vec<(String, usize)>,
}

/// Accumulates solve records.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    records: Vec<SolveRecord>,
}

impl Tracker {
    /// An empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends one solve attempt.
    pub fn record(&mut self, record: SolveRecord) {
        self.records.push(record);
    }

    /// The recorded attempts, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[SolveRecord] {
        &self.records
    }

    /// Aggregates the recorded attempts, or `None` when nothing has been
    /// recorded yet.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        if self.records.is_empty() {
            return None;
        }

        let total = self.records.len();
        #[allow(clippy::cast_precision_loss)]
        let count = total as f64;

        let solved = self.records.iter().filter(|r| r.solved).count();
        let correct = self.records.iter().filter(|r| r.solution_correct).count();

        let times = || self.records.iter().map(|r| r.duration.as_secs_f64());
        let min_time = times().map(OrderedFloat).min().map_or(0.0, |t| t.0);
        let max_time = times().map(OrderedFloat).max().map_or(0.0, |t| t.0);
        let avg_time = times().sum::<f64>() / count;

        #[allow(clippy::cast_precision_loss)]
        let avg_depth = self
            .records
            .iter()
            .map(|r| r.max_recursion_depth as f64)
            .sum::<f64>()
            / count;
        #[allow(clippy::cast_precision_loss)]
        let avg_backtracks = self
            .records
            .iter()
            .map(|r| r.backtrack_count as f64)
            .sum::<f64>()
            / count;

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for record in &self.records {
            *counts.entry(record.source.as_str()).or_default() += 1;
        }
        let by_source = counts
            .into_iter()
            .map(|(source, n)| (source.to_string(), n))
            .sorted()
            .collect_vec();

        #[allow(clippy::cast_precision_loss)]
        let solve_rate = solved as f64 / count * 100.0;

        Some(Summary {
            total,
            solved,
            solve_rate,
            avg_time,
            min_time,
            max_time,
            avg_depth,
            avg_backtracks,
            correct,
            by_source,
        })
    }

    /// Writes the records to `path` as CSV, one row per attempt.
    ///
    /// # Errors
    ///
    /// Any I/O failure while writing.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        self.write_csv(&mut BufWriter::new(File::create(path)?))
    }

    /// Writes the records as CSV to any writer.
    ///
    /// # Errors
    ///
    /// Any I/O failure while writing.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "puzzle_source,puzzle_rating,execution_time,max_recursion_depth,backtrack_count,solved,solution_correct"
        )?;
        for r in &self.records {
            writeln!(
                writer,
                "{},{},{:.6},{},{},{},{}",
                r.source,
                r.rating,
                r.duration.as_secs_f64(),
                r.max_recursion_depth,
                r.backtrack_count,
                r.solved,
                r.solution_correct,
            )?;
        }
        Ok(())
    }
}

/// The conventional difficulty bucket for a rating.
#[must_use]
pub fn difficulty_label(rating: f64) -> &'static str {
    if rating <= 5.0 {
        "Easy"
    } else if rating <= 20.0 {
        "Medium"
    } else if rating <= 40.0 {
        "Hard"
    } else {
        "Expert"
    }
}

/// Prints a single statistic line in a formatted table row.
pub fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints the boxed report for one solve attempt.
pub fn print_report(record: &SolveRecord) {
    println!("\n==========================[ Solve Report ]===========================");
    stat_line("Source", &record.source);
    stat_line("Rating", format!("{:.1}", record.rating));
    stat_line("Difficulty", difficulty_label(record.rating));
    stat_line(
        "Execution time (s)",
        format!("{:.4}", record.duration.as_secs_f64()),
    );
    stat_line("Max recursion depth", record.max_recursion_depth);
    stat_line("Backtracks", record.backtrack_count);
    stat_line("Solved", if record.solved { "yes" } else { "no" });
    stat_line(
        "Solution correct",
        if record.solution_correct { "yes" } else { "no" },
    );
    println!("=====================================================================");
}

/// Prints the boxed summary table for a batch of attempts.
pub fn print_summary(summary: &Summary) {
    println!("\n========================[ Summary Statistics ]=======================");
    stat_line("Total puzzles", summary.total);
    stat_line("Solved", summary.solved);
    stat_line("Solve rate (%)", format!("{:.2}", summary.solve_rate));
    stat_line("Correct solutions", summary.correct);
    stat_line("Average time (s)", format!("{:.4}", summary.avg_time));
    stat_line("Fastest solve (s)", format!("{:.4}", summary.min_time));
    stat_line("Slowest solve (s)", format!("{:.4}", summary.max_time));
    stat_line("Avg recursion depth", format!("{:.2}", summary.avg_depth));
    stat_line("Avg backtracks", format!("{:.2}", summary.avg_backtracks));
    for (source, n) in &summary.by_source {
        stat_line(&format!("Puzzles from {source}"), n);
    }
    println!("=====================================================================");
}
