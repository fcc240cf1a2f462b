#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sudoku_solver::dataset::PuzzleSet;
use sudoku_solver::report::{self, SolveRecord, Tracker};
use sudoku_solver::solver::board::Board;
use sudoku_solver::solver::constraint::verify_solution;
use sudoku_solver::solver::engine::Engine;
use sudoku_solver::solver::selection::SelectionType;
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku-solver",
    version,
    about = "An instrumented MRV backtracking Sudoku solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve (one
    /// 81-character puzzle per line, `#` lines ignored).
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `dataset`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle given inline or in a puzzle file.
    Solve {
        /// The puzzle as a flattened 81-character string, `'.'` or `'0'`
        /// for empty cells.
        #[arg(short, long)]
        grid: Option<String>,

        /// Path to a puzzle file: one 81-character puzzle per line,
        /// `#` lines ignored.
        #[arg(long, conflicts_with = "grid")]
        path: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Run the solver over a CSV puzzle dataset and report statistics.
    Dataset {
        /// Path to the dataset CSV (header with `question`/`puzzle` and
        /// optionally `answer`, `rating`, `source` columns).
        #[arg(long)]
        path: PathBuf,

        /// How many puzzles to sample from the dataset.
        #[arg(short = 'n', long, default_value_t = 100)]
        samples: usize,

        /// Seed for the sampling shuffle; the same seed draws the same
        /// puzzles.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Read at most this many records from the file.
        #[arg(long)]
        limit: Option<usize>,

        /// Keep only puzzles rated at least this much.
        #[arg(long)]
        min_rating: Option<f64>,

        /// Keep only puzzles rated at most this much.
        #[arg(long)]
        max_rating: Option<f64>,

        /// Write the per-puzzle results to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Suppress the per-puzzle reports; only the summary is printed.
        #[arg(short, long, default_value_t = false)]
        quiet: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every puzzle file under a directory.
    Dir {
        /// The directory to walk; `.sudoku` and `.txt` files are solved.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable verification of found solutions against the full rule set.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Enable printing of performance statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Print the puzzle and its solution side by side.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Cell selection strategy. Supported values are "mrv" (minimum
    /// remaining values) and "first-empty" (naive row-major order).
    #[arg(long, default_value_t = SelectionType::MinimumRemaining)]
    pub(crate) selection: SelectionType,

    /// Abort any single solve after this many milliseconds.
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
}

/// Dispatches a parsed command line.
pub(crate) fn run(cli: Cli) -> Result<(), String> {
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            return solve_file(&path, &cli.common);
        }
    }

    match cli.command {
        Some(Commands::Solve { grid, path, common }) => match (grid, path) {
            (Some(grid), None) => solve_grid(&grid, "cli", &common),
            (None, Some(path)) => solve_file(&path, &common),
            _ => Err("provide exactly one of --grid or --path".to_string()),
        },
        Some(Commands::Dataset {
            path,
            samples,
            seed,
            limit,
            min_rating,
            max_rating,
            export,
            quiet,
            common,
        }) => run_dataset(
            &path,
            samples,
            seed,
            limit,
            min_rating,
            max_rating,
            export.as_deref(),
            quiet,
            &common,
        ),
        Some(Commands::Dir { path, common }) => solve_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
        None => Err("No command provided. Use --help for more information.".to_string()),
    }
}

/// Builds an engine configured per the common options.
fn build_engine(common: &CommonOptions) -> Engine<SelectionType> {
    let engine = Engine::with_selector(common.selection);
    match common.timeout_ms {
        Some(ms) => engine.with_deadline(Duration::from_millis(ms)),
        None => engine,
    }
}

/// Parses and solves a single flattened puzzle string.
fn solve_grid(grid: &str, label: &str, common: &CommonOptions) -> Result<(), String> {
    let board: Board = grid
        .trim()
        .parse()
        .map_err(|e| format!("failed to parse puzzle: {e}"))?;
    solve_board(&board, label, common)
}

/// Solves every puzzle line of a file.
fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_file() {
        return Err(format!("not a puzzle file: {}", path.display()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let label = path.display().to_string();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        solve_grid(line, &label, common)
            .map_err(|e| format!("{}:{}: {e}", path.display(), number + 1))?;
    }

    Ok(())
}

/// Solves one board, printing the solution, verification outcome and the
/// stats table as the options ask.
fn solve_board(board: &Board, label: &str, common: &CommonOptions) -> Result<(), String> {
    println!("Solving: {label}");
    println!("{board}");

    let mut engine = build_engine(common);
    let started = Instant::now();
    let outcome = engine.solve(board).map_err(|e| e.to_string())?;
    let elapsed = started.elapsed();
    let metrics = engine.metrics();

    let mut correct = false;
    if outcome.solved {
        let (ok, violations) = verify_solution(&outcome.board);
        correct = ok;
        if common.verify {
            println!("Verified: {ok}");
            for violation in &violations {
                eprintln!("  {violation}");
            }
            if !ok {
                return Err("solution failed verification".to_string());
            }
        }

        if common.print_solution {
            println!("{}", board.side_by_side(&outcome.board));
        } else {
            println!("Solution:\n{}", outcome.board);
        }
    } else {
        println!("No solution found");
    }

    if common.stats {
        report::print_report(&SolveRecord {
            source: label.to_string(),
            rating: 0.0,
            duration: elapsed,
            max_recursion_depth: metrics.max_recursion_depth,
            backtrack_count: metrics.backtrack_count,
            solved: outcome.solved,
            solution_correct: correct,
        });
        print_memory_stats();
    }

    Ok(())
}

/// Runs the engine over a sampled slice of a CSV dataset, tracking every
/// attempt and printing the aggregate summary at the end.
#[allow(clippy::too_many_arguments)]
fn run_dataset(
    path: &Path,
    samples: usize,
    seed: u64,
    limit: Option<usize>,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
    export: Option<&Path>,
    quiet: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    let set = match limit {
        Some(limit) => PuzzleSet::load_limited(path, limit),
        None => PuzzleSet::load(path),
    }
    .map_err(|e| e.to_string())?;
    println!("Loaded {} puzzles from {}", set.len(), path.display());

    let set = if min_rating.is_some() || max_rating.is_some() {
        let range = min_rating.unwrap_or(f64::NEG_INFINITY)..=max_rating.unwrap_or(f64::INFINITY);
        let filtered = set.filter_rating(range);
        println!("{} puzzles after rating filter", filtered.len());
        filtered
    } else {
        set
    };

    let set = set.sample(samples, seed);
    println!("Solving {} sampled puzzles (seed {seed})", set.len());

    let mut engine = build_engine(common);
    let mut tracker = Tracker::new();

    for puzzle in &set {
        let started = Instant::now();
        let result = engine.solve(&puzzle.givens);
        let elapsed = started.elapsed();
        let metrics = engine.metrics();

        let solved = match &result {
            Ok(outcome) => outcome.solved,
            Err(e) => {
                eprintln!("puzzle from {:?}: {e}", puzzle.source);
                false
            }
        };

        let correct = result.as_ref().is_ok_and(|outcome| {
            outcome.solved
                && verify_solution(&outcome.board).0
                && puzzle
                    .solution
                    .as_ref()
                    .is_none_or(|expected| *expected == outcome.board)
        });

        let record = SolveRecord {
            source: puzzle.source.clone(),
            rating: puzzle.rating,
            duration: elapsed,
            max_recursion_depth: metrics.max_recursion_depth,
            backtrack_count: metrics.backtrack_count,
            solved,
            solution_correct: correct,
        };

        if !quiet {
            report::print_report(&record);
        }
        tracker.record(record);
    }

    if let Some(summary) = tracker.summary() {
        report::print_summary(&summary);
        print_memory_stats();
    }

    if let Some(export) = export {
        tracker
            .export_csv(export)
            .map_err(|e| format!("failed to write {}: {e}", export.display()))?;
        println!("Results exported to {}", export.display());
    }

    Ok(())
}

/// Solves every `.sudoku` and `.txt` puzzle file under a directory.
fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        let recognized = file_path
            .extension()
            .is_some_and(|ext| ext == "sudoku" || ext == "txt");
        if !recognized {
            eprintln!("Skipping non-puzzle file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
    }

    Ok(())
}

/// Prints allocator statistics in the same table shape as the reports.
/// Prints nothing if the allocator refuses to report.
fn print_memory_stats() {
    let figures = || -> Result<(f64, f64), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        let allocated = stats::allocated::mib()?.read()? as f64 / (1024.0 * 1024.0);
        let resident = stats::resident::mib()?.read()? as f64 / (1024.0 * 1024.0);
        Ok((allocated, resident))
    };

    if let Ok((allocated, resident)) = figures() {
        report::stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        report::stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_dataset_command() {
        let cli = Cli::try_parse_from([
            "sudoku-solver",
            "dataset",
            "--path",
            "puzzles.csv",
            "-n",
            "10",
            "--seed",
            "7",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Dataset { samples, seed, .. }) => {
                assert_eq!(samples, 10);
                assert_eq!(seed, 7);
            }
            other => panic!("expected dataset command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_selection_strategy() {
        let cli = Cli::try_parse_from([
            "sudoku-solver",
            "solve",
            "--grid",
            ".........",
            "--selection",
            "first-empty",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Solve { common, .. }) => {
                assert_eq!(common.selection, SelectionType::FirstEmpty);
            }
            other => panic!("expected solve command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_selection() {
        assert!(
            Cli::try_parse_from([
                "sudoku-solver",
                "solve",
                "--grid",
                "x",
                "--selection",
                "vsids"
            ])
            .is_err()
        );
    }
}
