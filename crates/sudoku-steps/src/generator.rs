use crate::{Algorithm, Grid, Position, Solver};
use serde::{Deserialize, Serialize};

/// Difficulty level of a generated puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    /// All levels, easiest first.
    pub fn all_levels() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Extreme,
        ]
    }

    /// Inclusive range of cells to remove from a full grid.
    ///
    /// The extreme range depends on the digging policy: insisting on a
    /// unique solution caps removal near the 17-clue floor, while the
    /// unchecked variant digs down to a handful of clues.
    pub fn removal_range(&self, check_uniqueness: bool) -> (usize, usize) {
        match self {
            Difficulty::Easy => (30, 35),
            Difficulty::Medium => (35, 40),
            Difficulty::Hard => (40, 45),
            Difficulty::Extreme => {
                if check_uniqueness {
                    (46, 64)
                } else {
                    (71, 77)
                }
            }
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Extreme => write!(f, "Extreme"),
        }
    }
}

/// A generated puzzle together with the full grid it was dug from. Every
/// filled puzzle cell agrees with the solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub puzzle: Grid,
    pub solution: Grid,
}

/// Configuration for hole digging.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Require every intermediate puzzle to keep exactly one solution.
    /// Turning this off accepts any still-solvable grid, which allows very
    /// low clue counts at the price of non-unique puzzles.
    pub check_uniqueness: bool,
    /// Digging passes over the board before accepting a puzzle with fewer
    /// holes than requested.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            check_uniqueness: true,
            max_attempts: 5,
        }
    }
}

/// Sudoku puzzle generator.
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator with the default (uniqueness-checked) policy.
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a custom digging policy.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a puzzle at `difficulty` along with its solution.
    pub fn generate_puzzle(&mut self, difficulty: Difficulty) -> Puzzle {
        let solution = self.generate_filled_grid();
        let (min, max) = difficulty.removal_range(self.config.check_uniqueness);
        let holes = min + self.rng.below(max - min + 1);

        let mut puzzle = solution.clone();
        self.dig_holes(&mut puzzle, holes, self.config.max_attempts);
        Puzzle { puzzle, solution }
    }

    /// Produce a complete valid grid.
    ///
    /// The three diagonal boxes get independently shuffled permutations of
    /// 1–9 (they share no row, column, or box, so they cannot conflict);
    /// deterministic backtracking completes the remaining 54 cells. All
    /// randomness enters through the shuffles.
    pub fn generate_filled_grid(&mut self) -> Grid {
        let mut grid = Grid::empty();
        for start in [0, 3, 6] {
            self.fill_box(&mut grid, start, start);
        }
        let completed = fill_remaining(&mut grid);
        debug_assert!(completed, "diagonal boxes always admit a completion");
        grid
    }

    fn fill_box(&mut self, grid: &mut Grid, start_row: usize, start_col: usize) {
        let mut values: Vec<u8> = (1..=9).collect();
        self.rng.shuffle(&mut values);

        let mut idx = 0;
        for row in start_row..start_row + 3 {
            for col in start_col..start_col + 3 {
                grid.set(Position::new(row, col), Some(values[idx]));
                idx += 1;
            }
        }
    }

    /// Remove up to `holes` cells from `grid`, keeping it solvable (and
    /// uniquely solvable under the default policy). When a full shuffled
    /// pass leaves holes owed, recurse over the partially dug grid until
    /// the attempt budget runs out, then accept the shortfall.
    fn dig_holes(&mut self, grid: &mut Grid, holes: usize, attempts: usize) -> usize {
        let mut positions: Vec<Position> = Position::all().collect();
        self.rng.shuffle(&mut positions);

        let mut remaining = holes;
        for pos in positions {
            if remaining == 0 {
                break;
            }
            let Some(value) = grid.get(pos) else {
                continue;
            };
            grid.set(pos, None);
            if self.acceptable(grid) {
                remaining -= 1;
            } else {
                grid.set(pos, Some(value));
            }
        }

        if remaining > 0 && attempts > 1 {
            return self.dig_holes(grid, remaining, attempts - 1);
        }
        remaining
    }

    /// A reduced grid is kept when a copy of it still solves and, under
    /// the uniqueness policy, solves exactly one way.
    fn acceptable(&self, grid: &Grid) -> bool {
        let mut solver = Solver::new();
        solver.set_board(grid.clone());
        if solver.solve(Algorithm::BitmaskBacktrack).is_none() {
            return false;
        }
        !self.config.check_uniqueness || solver.has_unique_solution(grid)
    }
}

/// Complete `grid` in place, scanning row-major for the first empty cell
/// and trying digits in ascending order.
fn fill_remaining(grid: &mut Grid) -> bool {
    let Some(pos) = grid.first_empty() else {
        return true;
    };
    for value in 1..=9 {
        if grid.can_place(pos, value) {
            grid.set(pos, Some(value));
            if fill_remaining(grid) {
                return true;
            }
            grid.set(pos, None);
        }
    }
    false
}

/// Small seedable PCG-step generator.
///
/// Entropy comes from `getrandom`, so generation behaves the same on
/// native and wasm targets; `with_seed` pins the whole sequence.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed = [0u8; 8];
        if getrandom::getrandom(&mut seed).is_err() {
            static FALLBACK: std::sync::atomic::AtomicU64 =
                std::sync::atomic::AtomicU64::new(0x9e37_79b9_7f4a_7c15);
            let next = FALLBACK.fetch_add(
                0x2545_f491_4f6c_dd1d,
                std::sync::atomic::Ordering::Relaxed,
            );
            seed = next.to_le_bytes();
        }
        Self::with_seed(u64::from_le_bytes(seed))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next_u32() as usize) % bound
    }

    /// Fisher–Yates.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.below(i + 1);
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_grid_is_complete_and_valid() {
        let mut generator = Generator::with_seed(42);
        let grid = generator.generate_filled_grid();
        assert!(grid.is_complete());
        assert!(grid.is_valid());
    }

    #[test]
    fn test_filled_grids_vary_with_seed() {
        let a = Generator::with_seed(1).generate_filled_grid();
        let b = Generator::with_seed(2).generate_filled_grid();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Generator::with_seed(42).generate_puzzle(Difficulty::Easy);
        let b = Generator::with_seed(42).generate_puzzle(Difficulty::Easy);
        assert_eq!(a.puzzle, b.puzzle);
        assert_eq!(a.solution, b.solution);
    }

    #[test]
    fn test_easy_puzzle_bounds_and_uniqueness() {
        let mut generator = Generator::with_seed(7);
        let pair = generator.generate_puzzle(Difficulty::Easy);

        // 30–35 holes leave 46–51 filled cells.
        let filled = pair.puzzle.filled_count();
        assert!((46..=51).contains(&filled), "unexpected clue count {filled}");

        let solver = Solver::new();
        assert!(solver.has_unique_solution(&pair.puzzle));
    }

    #[test]
    fn test_puzzle_agrees_with_solution() {
        let mut generator = Generator::with_seed(11);
        let pair = generator.generate_puzzle(Difficulty::Medium);

        assert!(pair.solution.is_complete());
        assert!(pair.solution.is_valid());
        for pos in Position::all() {
            if let Some(value) = pair.puzzle.get(pos) {
                assert_eq!(pair.solution.get(pos), Some(value));
            }
        }
    }

    #[test]
    fn test_solving_recovers_the_solution() {
        let mut generator = Generator::with_seed(23);
        let pair = generator.generate_puzzle(Difficulty::Hard);

        let mut solver = Solver::new();
        solver.set_board(pair.puzzle.clone());
        assert!(solver.solve(Algorithm::Dlx).is_some());
        assert_eq!(solver.solution(), pair.solution);
    }

    #[test]
    fn test_unchecked_policy_digs_deep() {
        let mut generator = Generator::with_config(GeneratorConfig {
            check_uniqueness: false,
            max_attempts: 5,
        });
        let pair = generator.generate_puzzle(Difficulty::Extreme);

        // 71–77 holes leave 4–10 clues.
        let filled = pair.puzzle.filled_count();
        assert!((4..=10).contains(&filled), "unexpected clue count {filled}");

        let mut solver = Solver::new();
        solver.set_board(pair.puzzle.clone());
        assert!(solver.solve(Algorithm::BitmaskBacktrack).is_some());
    }

    #[test]
    fn test_removal_ranges() {
        assert_eq!(Difficulty::Easy.removal_range(true), (30, 35));
        assert_eq!(Difficulty::Extreme.removal_range(true), (46, 64));
        assert_eq!(Difficulty::Extreme.removal_range(false), (71, 77));
        assert_eq!(Difficulty::all_levels().len(), 4);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = SimpleRng::with_seed(99);
        let mut values: Vec<u8> = (1..=9).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=9).collect::<Vec<_>>());
    }
}
