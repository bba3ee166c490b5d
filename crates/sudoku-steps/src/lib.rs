//! Sudoku solving and generation with replayable search traces.
//!
//! Three interchangeable algorithms (dancing-links exact cover, bitmask
//! backtracking, and naïve scan backtracking) run over the same 81-cell
//! [`Grid`]. Every committed cell records the ordered values the search
//! tried before one stuck, so a presentation layer can replay and narrate
//! the search after the fact. [`Generator`] builds full random grids and
//! digs holes, by default keeping the puzzle uniquely solvable.
//!
//! ```
//! use sudoku_steps::{Algorithm, Difficulty, Generator, Solver};
//!
//! let mut generator = Generator::with_seed(42);
//! let pair = generator.generate_puzzle(Difficulty::Easy);
//!
//! let mut solver = Solver::new();
//! solver.set_board(pair.puzzle.clone());
//! let stats = solver.solve(Algorithm::Dlx).expect("generated puzzles solve");
//! assert_eq!(solver.solution(), pair.solution);
//! assert_eq!(stats.steps, solver.solution_steps().len());
//! ```

mod generator;
mod grid;
mod solver;

pub use generator::{Difficulty, Generator, GeneratorConfig, Puzzle};
pub use grid::{DigitSet, Grid, GridError, Position};
pub use solver::{Algorithm, SolveStats, Solver, Step};
