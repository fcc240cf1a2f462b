#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! CSV-backed puzzle sets.
//!
//! Puzzle dumps come as comma-separated files with a header line naming a
//! puzzle column (`question` or `puzzle`) and, optionally, `answer` (alias
//! `solution`), `rating` and `source` columns. Fields contain no commas or
//! quoting in this format, so records parse line by line.
//!
//! A [`PuzzleSet`] loads such a file (optionally only its first `n`
//! records, which matters for multi-million-row dumps), filters by rating,
//! draws reproducible samples and writes the same shape back out.

use crate::solver::board::{Board, ParseBoardError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// One puzzle record.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// The starting grid.
    pub givens: Board,
    /// The reference solution, when the dataset ships one.
    pub solution: Option<Board>,
    /// Difficulty rating as published by the dataset; `0.0` when absent.
    pub rating: f64,
    /// Where the puzzle came from; empty when the dataset does not say.
    pub source: String,
}

/// Errors produced while reading a puzzle CSV. Record-level variants carry
/// the 1-based line number of the offending record.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The underlying file could not be read.
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),

    /// The file was empty.
    #[error("missing header line")]
    MissingHeader,

    /// The header named no puzzle column.
    #[error("no puzzle column in header (expected `question` or `puzzle`)")]
    MissingPuzzleColumn,

    /// A record had fewer fields than the header promises.
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    FieldCount {
        /// 1-based line number.
        line: usize,
        /// Fields the header requires.
        expected: usize,
        /// Fields actually present.
        found: usize,
    },

    /// A grid field failed to parse.
    #[error("line {line}: {source}")]
    BadGrid {
        /// 1-based line number.
        line: usize,
        /// The underlying parse failure.
        source: ParseBoardError,
    },

    /// A rating field was not a number.
    #[error("line {line}: invalid rating {value:?}")]
    BadRating {
        /// 1-based line number.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },
}

/// Positions of the recognized columns within a record.
#[derive(Debug, Clone, Copy)]
struct Columns {
    puzzle: usize,
    solution: Option<usize>,
    rating: Option<usize>,
    source: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, DatasetError> {
        let mut puzzle = None;
        let mut solution = None;
        let mut rating = None;
        let mut source = None;

        for (i, name) in header.split(',').map(str::trim).enumerate() {
            if name.eq_ignore_ascii_case("question") || name.eq_ignore_ascii_case("puzzle") {
                puzzle.get_or_insert(i);
            } else if name.eq_ignore_ascii_case("answer") || name.eq_ignore_ascii_case("solution") {
                solution.get_or_insert(i);
            } else if name.eq_ignore_ascii_case("rating") {
                rating.get_or_insert(i);
            } else if name.eq_ignore_ascii_case("source") {
                source.get_or_insert(i);
            }
        }

        let Some(puzzle) = puzzle else {
            return Err(DatasetError::MissingPuzzleColumn);
        };

        Ok(Self {
            puzzle,
            solution,
            rating,
            source,
        })
    }

    /// Highest column index any recognized column sits at, i.e. how many
    /// fields a record must have.
    fn required_fields(&self) -> usize {
        [
            Some(self.puzzle),
            self.solution,
            self.rating,
            self.source,
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// An in-memory collection of puzzles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl PuzzleSet {
    /// Builds a set directly from records.
    #[must_use]
    pub const fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles }
    }

    /// Loads every record of the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// [`DatasetError`] on I/O failure or the first malformed record.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Self::parse(BufReader::new(File::open(path)?), None)
    }

    /// Loads at most the first `limit` records, without reading the rest
    /// of the file.
    ///
    /// # Errors
    ///
    /// [`DatasetError`] on I/O failure or the first malformed record.
    pub fn load_limited<P: AsRef<Path>>(path: P, limit: usize) -> Result<Self, DatasetError> {
        Self::parse(BufReader::new(File::open(path)?), Some(limit))
    }

    /// Parses CSV records from any buffered reader. Blank lines are
    /// skipped; the first non-blank line must be the header.
    ///
    /// # Errors
    ///
    /// [`DatasetError`] on I/O failure or the first malformed record.
    pub fn parse<R: BufRead>(reader: R, limit: Option<usize>) -> Result<Self, DatasetError> {
        let mut lines = reader.lines().enumerate();

        let columns = loop {
            let Some((_, line)) = lines.next() else {
                return Err(DatasetError::MissingHeader);
            };
            let line = line?;
            if !line.trim().is_empty() {
                break Columns::from_header(&line)?;
            }
        };

        let mut puzzles = Vec::new();

        for (index, line) in lines {
            if limit.is_some_and(|limit| puzzles.len() >= limit) {
                break;
            }

            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            puzzles.push(parse_record(&line, columns, index + 1)?);
        }

        Ok(Self { puzzles })
    }

    /// Number of puzzles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Whether the set holds no puzzles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// The puzzle at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    /// Iterates the puzzles in order.
    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    /// Keeps only puzzles whose rating falls inside `range` (inclusive).
    #[must_use]
    pub fn filter_rating(mut self, range: RangeInclusive<f64>) -> Self {
        self.puzzles.retain(|puzzle| range.contains(&puzzle.rating));
        self
    }

    /// Draws `n` puzzles without replacement, shuffled by a generator
    /// seeded with `seed`: the same seed always draws the same sample.
    /// Returns the whole set (shuffled) when `n` is not smaller than it.
    #[must_use]
    pub fn sample(&self, n: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut indices: Vec<usize> = (0..self.puzzles.len()).collect();
        rng.shuffle(&mut indices);
        indices.truncate(n);

        Self {
            puzzles: indices.iter().map(|&i| self.puzzles[i].clone()).collect(),
        }
    }

    /// Writes the set to `path` in the same CSV shape it loads from.
    ///
    /// # Errors
    ///
    /// Any I/O failure while writing.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        self.write(&mut BufWriter::new(File::create(path)?))
    }

    /// Writes the CSV representation to any writer.
    ///
    /// # Errors
    ///
    /// Any I/O failure while writing.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "question,answer,rating,source")?;
        for puzzle in &self.puzzles {
            writeln!(
                writer,
                "{},{},{},{}",
                puzzle.givens.to_line(),
                puzzle.solution.as_ref().map_or_else(String::new, Board::to_line),
                puzzle.rating,
                puzzle.source,
            )?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PuzzleSet {
    type Item = &'a Puzzle;
    type IntoIter = std::slice::Iter<'a, Puzzle>;

    fn into_iter(self) -> Self::IntoIter {
        self.puzzles.iter()
    }
}

fn parse_record(line: &str, columns: Columns, line_number: usize) -> Result<Puzzle, DatasetError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    let expected = columns.required_fields();
    if fields.len() < expected {
        return Err(DatasetError::FieldCount {
            line: line_number,
            expected,
            found: fields.len(),
        });
    }

    let grid = |field: usize| {
        Board::from_str(fields[field]).map_err(|source| DatasetError::BadGrid {
            line: line_number,
            source,
        })
    };

    let givens = grid(columns.puzzle)?;

    let solution = match columns.solution {
        Some(field) if !fields[field].is_empty() => Some(grid(field)?),
        _ => None,
    };

    let rating = match columns.rating {
        Some(field) => {
            fields[field]
                .parse::<f64>()
                .map_err(|_| DatasetError::BadRating {
                    line: line_number,
                    value: fields[field].to_string(),
                })?
        }
        None => 0.0,
    };

    let source = columns
        .source
        .map_or_else(String::new, |field| fields[field].to_string());

    Ok(Puzzle {
        givens,
        solution,
        rating,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::board::{EXAMPLE_PUZZLE, EXAMPLE_SOLUTION};
    use std::io::Cursor;

    const EXAMPLE_LINE: &str =
        "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";

    fn example_csv() -> String {
        let solution = Board::new(EXAMPLE_SOLUTION).to_line();
        format!(
            "question,answer,rating,source\n\
             {EXAMPLE_LINE},{solution},2.5,website\n\
             {line2},,40,magazine\n",
            line2 = Board::default().to_line(),
        )
    }

    #[test]
    fn test_parse_example_csv() {
        let set = PuzzleSet::parse(Cursor::new(example_csv()), None).unwrap();

        assert_eq!(set.len(), 2);
        let first = set.get(0).unwrap();
        assert_eq!(first.givens, Board::new(EXAMPLE_PUZZLE));
        assert_eq!(first.solution, Some(Board::new(EXAMPLE_SOLUTION)));
        assert!((first.rating - 2.5).abs() < f64::EPSILON);
        assert_eq!(first.source, "website");

        let second = set.get(1).unwrap();
        assert_eq!(second.solution, None);
        assert_eq!(second.source, "magazine");
    }

    #[test]
    fn test_parse_header_aliases() {
        let csv = format!("puzzle,solution\n{EXAMPLE_LINE},\n");
        let set = PuzzleSet::parse(Cursor::new(csv), None).unwrap();
        assert_eq!(set.len(), 1);
        assert!((set.get(0).unwrap().rating - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_respects_limit() {
        let set = PuzzleSet::parse(Cursor::new(example_csv()), Some(1)).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            PuzzleSet::parse(Cursor::new(""), None),
            Err(DatasetError::MissingHeader)
        ));
    }

    #[test]
    fn test_missing_puzzle_column() {
        assert!(matches!(
            PuzzleSet::parse(Cursor::new("rating,source\n"), None),
            Err(DatasetError::MissingPuzzleColumn)
        ));
    }

    #[test]
    fn test_bad_grid_reports_line_number() {
        let csv = format!("question\n{EXAMPLE_LINE}\nnot-a-grid\n");
        match PuzzleSet::parse(Cursor::new(csv), None) {
            Err(DatasetError::BadGrid { line: 3, .. }) => {}
            other => panic!("expected BadGrid on line 3, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_rating_reports_line_number() {
        let csv = format!("question,rating\n{EXAMPLE_LINE},hard\n");
        match PuzzleSet::parse(Cursor::new(csv), None) {
            Err(DatasetError::BadRating { line: 2, value }) => assert_eq!(value, "hard"),
            other => panic!("expected BadRating on line 2, got {other:?}"),
        }
    }

    #[test]
    fn test_field_count_reports_line_number() {
        let csv = format!("question,answer,rating,source\n{EXAMPLE_LINE},x\n");
        match PuzzleSet::parse(Cursor::new(csv), None) {
            Err(DatasetError::FieldCount {
                line: 2,
                expected: 4,
                found: 2,
            }) => {}
            other => panic!("expected FieldCount on line 2, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_rating() {
        let set = PuzzleSet::parse(Cursor::new(example_csv()), None).unwrap();
        let easy = set.clone().filter_rating(0.0..=5.0);
        assert_eq!(easy.len(), 1);
        assert_eq!(easy.get(0).unwrap().source, "website");
        assert!(set.filter_rating(50.0..=60.0).is_empty());
    }

    #[test]
    fn test_sample_is_reproducible() {
        let puzzles: Vec<Puzzle> = (0..20)
            .map(|i| Puzzle {
                givens: Board::default(),
                solution: None,
                rating: f64::from(i),
                source: format!("p{i}"),
            })
            .collect();
        let set = PuzzleSet::new(puzzles);

        let first = set.sample(5, 42);
        let second = set.sample(5, 42);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);

        // Oversampling returns everything.
        assert_eq!(set.sample(100, 42).len(), 20);
    }

    #[test]
    fn test_csv_round_trip() {
        let set = PuzzleSet::parse(Cursor::new(example_csv()), None).unwrap();
        let mut buffer = Vec::new();
        set.write(&mut buffer).unwrap();
        let reparsed = PuzzleSet::parse(Cursor::new(buffer), None).unwrap();
        assert_eq!(set, reparsed);
    }
}
