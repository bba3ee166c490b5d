//! Basic example: generate a puzzle, solve it three ways, replay the trace.

use sudoku_steps::{Algorithm, Difficulty, Generator, Grid, Solver};

fn main() {
    println!("Generating a Medium difficulty puzzle...\n");
    let mut generator = Generator::new();
    let pair = generator.generate_puzzle(Difficulty::Medium);

    println!("Puzzle ({} given cells):", pair.puzzle.filled_count());
    println!("{}", pair.puzzle);

    let mut solver = Solver::new();
    for &algorithm in Algorithm::all() {
        solver.set_board(pair.puzzle.clone());
        match solver.solve(algorithm) {
            Some(stats) => println!(
                "{algorithm}: solved in {:?} with {} steps",
                stats.elapsed, stats.steps
            ),
            None => println!("{algorithm}: no solution found"),
        }
    }

    println!("\nSolution:");
    println!("{}", solver.solution());

    println!("First steps of the last trace:");
    for step in solver.solution_steps().iter().take(5) {
        println!(
            "  ({}, {}) tried {:?} -> {}",
            step.row, step.col, step.tested, step.value
        );
    }

    // Parse a puzzle from its 81-character form.
    println!("\n--- Parsing a puzzle from string ---\n");
    let parsed = Grid::from_string(
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
    )
    .expect("well-formed puzzle");

    println!("Solutions (up to 2): {}", solver.count_solutions(&parsed, 2));
    solver.set_board(parsed);
    if solver.solve(Algorithm::SimpleBacktrack).is_some() {
        println!("Solved:\n{}", solver.solution());
    }
}
