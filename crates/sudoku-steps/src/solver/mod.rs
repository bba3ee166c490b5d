//! Solver orchestrator.
//!
//! Owns one board, dispatches to one of three search algorithms, and
//! collects the step trace plus timing/step-count statistics for the run.

mod bitmask;
mod dlx;
mod simple;

use crate::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// The search algorithm a solve run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Exact cover over the dancing-links matrix.
    Dlx,
    /// Backtracking with row/column/box bitmask candidate tracking.
    BitmaskBacktrack,
    /// Naïve backtracking testing raw values 1–9 against the board.
    SimpleBacktrack,
}

impl Algorithm {
    /// All algorithms, in dispatch order.
    pub fn all() -> &'static [Algorithm] {
        &[
            Algorithm::Dlx,
            Algorithm::BitmaskBacktrack,
            Algorithm::SimpleBacktrack,
        ]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Dlx => write!(f, "DLX"),
            Algorithm::BitmaskBacktrack => write!(f, "BITMASK_BACKTRACK"),
            Algorithm::SimpleBacktrack => write!(f, "SIMPLE_BACKTRACK"),
        }
    }
}

/// One committed assignment: the cell, every value the search tried there
/// before the commit, and the value that stuck.
///
/// The last entry of `tested` always equals `value`. The trace as a whole
/// replays the search in assignment order; that order is meaningful per
/// algorithm but not comparable across algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub row: usize,
    pub col: usize,
    pub tested: Vec<u8>,
    pub value: u8,
}

/// Statistics for one successful solve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveStats {
    pub algorithm: Algorithm,
    pub elapsed: Duration,
    pub steps: usize,
}

/// Runs the configured algorithm over a privately held board.
#[derive(Debug, Default)]
pub struct Solver {
    board: Grid,
    steps: Vec<Step>,
}

impl Solver {
    pub fn new() -> Self {
        Self {
            board: Grid::empty(),
            steps: Vec::new(),
        }
    }

    /// Store a private copy of the board and clear the step trace.
    pub fn set_board(&mut self, grid: Grid) {
        self.board = grid;
        self.steps.clear();
    }

    /// Run `algorithm` over the stored board, mutating it in place.
    ///
    /// Returns `None` when the board has no completion; the board is then
    /// left wherever the last backtrack left it and must not be trusted.
    pub fn solve(&mut self, algorithm: Algorithm) -> Option<SolveStats> {
        self.steps.clear();
        let start = Instant::now();
        let solved = match algorithm {
            Algorithm::Dlx => dlx::solve(&mut self.board, &mut self.steps),
            Algorithm::BitmaskBacktrack => bitmask::solve(&mut self.board, &mut self.steps),
            Algorithm::SimpleBacktrack => simple::solve(&mut self.board, &mut self.steps),
        };
        solved.then(|| SolveStats {
            algorithm,
            elapsed: start.elapsed(),
            steps: self.steps.len(),
        })
    }

    /// The board as the last solve left it (a copy).
    pub fn solution(&self) -> Grid {
        self.board.clone()
    }

    /// The accumulated step trace (a copy).
    pub fn solution_steps(&self) -> Vec<Step> {
        self.steps.clone()
    }

    /// Count completions of `grid`, stopping once `limit` is reached.
    pub fn count_solutions(&self, grid: &Grid, limit: usize) -> usize {
        bitmask::count_completions(grid, limit)
    }

    /// Check that `grid` has exactly one completion.
    pub fn has_unique_solution(&self, grid: &Grid) -> bool {
        self.count_solutions(grid, 2) == 1
    }
}
