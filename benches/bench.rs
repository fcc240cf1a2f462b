use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use sudoku_solver::solver::board::{Board, EXAMPLE_PUZZLE};
use sudoku_solver::solver::domain::candidates;
use sudoku_solver::solver::engine::Engine;
use sudoku_solver::solver::selection::{CellSelection, FirstEmpty, MinimumRemaining};

/// A 17-clue puzzle (the minimum number of givens a uniquely solvable
/// puzzle can have), considerably harder for the search than the
/// introductory example.
const SEVENTEEN_CLUE: &str =
    "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

fn puzzles() -> Vec<(&'static str, Board)> {
    vec![
        ("example", Board::new(EXAMPLE_PUZZLE)),
        (
            "seventeen-clue",
            SEVENTEEN_CLUE.parse().expect("valid puzzle literal"),
        ),
        ("empty", Board::default()),
    ]
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.measurement_time(Duration::from_secs(10));

    for (name, board) in puzzles() {
        group.bench_function(format!("mrv/{name}"), |b| {
            b.iter(|| {
                let mut engine = Engine::with_selector(MinimumRemaining);
                black_box(engine.solve(black_box(&board)).expect("consistent puzzle"))
            });
        });

        group.bench_function(format!("first-empty/{name}"), |b| {
            b.iter(|| {
                let mut engine = Engine::with_selector(FirstEmpty);
                black_box(engine.solve(black_box(&board)).expect("consistent puzzle"))
            });
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let board = Board::new(EXAMPLE_PUZZLE);

    c.bench_function("selection/mrv-scan", |b| {
        b.iter(|| black_box(MinimumRemaining.select(black_box(&board))));
    });

    c.bench_function("selection/domain-query", |b| {
        b.iter(|| black_box(candidates(black_box(&board), 0, 2)));
    });
}

criterion_group!(benches, bench_solve, bench_selection);
criterion_main!(benches);
