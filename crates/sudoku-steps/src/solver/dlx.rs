//! Exact cover over a dancing-links matrix.
//!
//! 324 constraint columns (cell, row-value, column-value, box-value) and
//! one candidate row per possible placement, held in a single node arena.
//! Links are arena indices rather than pointers, so cover and uncover are
//! plain index swaps and uncover restores the structure exactly.
//!
//! The matrix is rebuilt from a board snapshot at the start of every solve
//! and discarded afterwards; nothing is reused across calls.

use super::Step;
use crate::{Grid, Position};

const HEAD: usize = 0;
const COLUMNS: usize = 324;

/// One (cell, value) placement option, a row of the matrix.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    row: usize,
    col: usize,
    value: u8,
}

/// Arena node. Index 0 is the head of the header ring, 1..=324 are column
/// headers, the rest are candidate-row nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    /// Header index of the owning column (self for headers).
    column: usize,
    /// Index into the candidate table (`usize::MAX` for head/headers).
    candidate: usize,
}

struct Matrix {
    nodes: Vec<Node>,
    /// Live candidate count per column, indexed by header.
    sizes: Vec<usize>,
    candidates: Vec<Candidate>,
}

impl Matrix {
    /// Build the matrix for `grid`: nine candidate rows per empty cell,
    /// exactly one for each filled cell.
    fn build(grid: &Grid) -> Self {
        let mut matrix = Matrix {
            nodes: Vec::with_capacity(1 + COLUMNS + 729 * 4),
            sizes: vec![0; COLUMNS + 1],
            candidates: Vec::with_capacity(729),
        };

        // Head plus the circular header ring.
        matrix.nodes.push(Node {
            left: COLUMNS,
            right: 1,
            up: HEAD,
            down: HEAD,
            column: HEAD,
            candidate: usize::MAX,
        });
        for header in 1..=COLUMNS {
            matrix.nodes.push(Node {
                left: header - 1,
                right: if header == COLUMNS { HEAD } else { header + 1 },
                up: header,
                down: header,
                column: header,
                candidate: usize::MAX,
            });
        }

        for pos in Position::all() {
            match grid.get(pos) {
                Some(value) => matrix.add_row(pos, value),
                None => {
                    for value in 1..=9 {
                        matrix.add_row(pos, value);
                    }
                }
            }
        }

        matrix
    }

    /// Append a candidate row: four nodes linked circularly among
    /// themselves, each spliced at the bottom of its column.
    fn add_row(&mut self, pos: Position, value: u8) {
        let candidate = self.candidates.len();
        self.candidates.push(Candidate {
            row: pos.row,
            col: pos.col,
            value,
        });

        let digit = (value - 1) as usize;
        let columns = [
            pos.row * 9 + pos.col,
            81 + pos.row * 9 + digit,
            162 + pos.col * 9 + digit,
            243 + pos.box_index() * 9 + digit,
        ];

        let first = self.nodes.len();
        for (i, &column) in columns.iter().enumerate() {
            let header = column + 1;
            let node = self.nodes.len();
            let up = self.nodes[header].up;
            self.nodes.push(Node {
                left: if i == 0 { first + 3 } else { node - 1 },
                right: if i == 3 { first } else { node + 1 },
                up,
                down: header,
                column: header,
                candidate,
            });
            self.nodes[up].down = node;
            self.nodes[header].up = node;
            self.sizes[header] += 1;
        }
    }

    /// Remove `header` from the ring and every other node of every row in
    /// its column from that node's own column.
    fn cover(&mut self, header: usize) {
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row = self.nodes[header].down;
        while row != header {
            let mut node = self.nodes[row].right;
            while node != row {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                self.sizes[self.nodes[node].column] -= 1;
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Exact mirror of [`Matrix::cover`], walking in reverse order so every
    /// link and size counter is restored to its pre-cover state.
    fn uncover(&mut self, header: usize) {
        let mut row = self.nodes[header].up;
        while row != header {
            let mut node = self.nodes[row].left;
            while node != row {
                self.sizes[self.nodes[node].column] += 1;
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = node;
                self.nodes[down].up = node;
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Minimum-size live column; the first one encountered wins ties, and
    /// a size of one (or zero) ends the scan early.
    fn choose_column(&self) -> usize {
        let mut best = HEAD;
        let mut best_size = usize::MAX;
        let mut header = self.nodes[HEAD].right;
        while header != HEAD {
            let size = self.sizes[header];
            if size < best_size {
                best = header;
                best_size = size;
                if best_size <= 1 {
                    break;
                }
            }
            header = self.nodes[header].right;
        }
        best
    }

    fn search(&mut self, grid: &mut Grid, steps: &mut Vec<Step>) -> bool {
        if self.nodes[HEAD].right == HEAD {
            return true;
        }
        let header = self.choose_column();
        if self.sizes[header] == 0 {
            return false;
        }
        self.cover(header);

        let mut tested = Vec::new();
        let mut row = self.nodes[header].down;
        while row != header {
            let candidate = self.candidates[self.nodes[row].candidate];
            let pos = Position::new(candidate.row, candidate.col);
            tested.push(candidate.value);

            let mut node = self.nodes[row].right;
            while node != row {
                let column = self.nodes[node].column;
                self.cover(column);
                node = self.nodes[node].right;
            }

            // A filled cell's lone row restates a value the board already
            // holds; only a fresh write is a step worth narrating.
            let wrote = grid.get(pos).is_none();
            if wrote {
                grid.set(pos, Some(candidate.value));
                steps.push(Step {
                    row: candidate.row,
                    col: candidate.col,
                    tested: tested.clone(),
                    value: candidate.value,
                });
            }

            if self.search(grid, steps) {
                return true;
            }

            if wrote {
                if grid.get(pos) == Some(candidate.value) {
                    grid.set(pos, None);
                }
                steps.pop();
            }

            let mut node = self.nodes[row].left;
            while node != row {
                let column = self.nodes[node].column;
                self.uncover(column);
                node = self.nodes[node].left;
            }

            row = self.nodes[row].down;
        }

        self.uncover(header);
        false
    }
}

pub(super) fn solve(grid: &mut Grid, steps: &mut Vec<Step>) -> bool {
    let mut matrix = Matrix::build(grid);
    matrix.search(grid, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    #[test]
    fn test_build_shape() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let matrix = Matrix::build(&grid);

        // 30 givens contribute one row each, 51 empty cells nine each.
        assert_eq!(matrix.candidates.len(), 30 + 51 * 9);
        assert_eq!(matrix.nodes.len(), 1 + COLUMNS + matrix.candidates.len() * 4);

        // The cell column of a given holds exactly its one row.
        assert_eq!(matrix.sizes[1], 1); // cell (0, 0), value 5
        // The cell column of an empty cell holds all nine.
        assert_eq!(matrix.sizes[1 + 2], 9); // cell (0, 2)
    }

    #[test]
    fn test_build_on_empty_grid() {
        let matrix = Matrix::build(&Grid::empty());
        assert_eq!(matrix.candidates.len(), 729);
        for header in 1..=COLUMNS {
            assert_eq!(matrix.sizes[header], 9);
        }
    }

    #[test]
    fn test_cover_uncover_round_trip() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let mut matrix = Matrix::build(&grid);

        let nodes_before = matrix.nodes.clone();
        let sizes_before = matrix.sizes.clone();

        for header in [1, 82, 200, 324] {
            matrix.cover(header);
            assert_ne!(matrix.nodes, nodes_before);
            matrix.uncover(header);
            assert_eq!(matrix.nodes, nodes_before);
            assert_eq!(matrix.sizes, sizes_before);
        }

        // Nested covers unwind in reverse order.
        matrix.cover(5);
        matrix.cover(90);
        matrix.uncover(90);
        matrix.uncover(5);
        assert_eq!(matrix.nodes, nodes_before);
        assert_eq!(matrix.sizes, sizes_before);
    }

    #[test]
    fn test_cover_removes_conflicting_rows() {
        let mut matrix = Matrix::build(&Grid::empty());
        // Covering cell (0, 0) removes its nine rows from the row-value
        // columns of row 0, leaving eight placements per digit there.
        matrix.cover(1);
        for digit in 0..9 {
            assert_eq!(matrix.sizes[1 + 81 + digit], 8);
        }
    }

    #[test]
    fn test_solve_reference_puzzle() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        let mut steps = Vec::new();
        assert!(solve(&mut grid, &mut steps));
        assert_eq!(grid, Grid::from_string(SOLUTION).unwrap());
        // One step per originally empty cell once the search settles.
        assert_eq!(steps.len(), 51);
    }

    #[test]
    fn test_solve_empty_grid() {
        let mut grid = Grid::empty();
        let mut steps = Vec::new();
        assert!(solve(&mut grid, &mut steps));
        assert!(grid.is_complete());
        assert!(grid.is_valid());
        assert_eq!(steps.len(), 81);
    }

    #[test]
    fn test_unsolvable_fails_cleanly() {
        let mut rows = [[0u8; 9]; 9];
        rows[0][..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        rows[1][8] = 9;
        let mut grid = Grid::from_rows(rows).unwrap();
        let original = grid.clone();

        let mut steps = Vec::new();
        assert!(!solve(&mut grid, &mut steps));
        assert!(steps.is_empty());
        // Every tentative write was reverted on the way out.
        assert_eq!(grid, original);
    }
}
