//! Mask-tracked backtracking: one [`DigitSet`] per row, column, and box
//! mirrors the board, so the candidate set of a cell is a three-way union
//! away. Also hosts the solution counter behind the uniqueness check.

use super::Step;
use crate::{DigitSet, Grid, Position};

/// Placed-digit sets per row, column, and box. Kept in lock-step with the
/// grid: every write goes through [`Masks::place`]/[`Masks::unplace`] so
/// the two never diverge.
struct Masks {
    rows: [DigitSet; 9],
    cols: [DigitSet; 9],
    boxes: [DigitSet; 9],
}

impl Masks {
    fn from_grid(grid: &Grid) -> Self {
        let mut masks = Masks {
            rows: [DigitSet::empty(); 9],
            cols: [DigitSet::empty(); 9],
            boxes: [DigitSet::empty(); 9],
        };
        for pos in Position::all() {
            if let Some(value) = grid.get(pos) {
                masks.rows[pos.row].insert(value);
                masks.cols[pos.col].insert(value);
                masks.boxes[pos.box_index()].insert(value);
            }
        }
        masks
    }

    /// Digits still legal at `pos`.
    #[inline]
    fn candidates(&self, pos: Position) -> DigitSet {
        DigitSet::all()
            .difference(self.rows[pos.row] | self.cols[pos.col] | self.boxes[pos.box_index()])
    }

    fn place(&mut self, grid: &mut Grid, pos: Position, value: u8) {
        grid.set(pos, Some(value));
        self.rows[pos.row].insert(value);
        self.cols[pos.col].insert(value);
        self.boxes[pos.box_index()].insert(value);
    }

    fn unplace(&mut self, grid: &mut Grid, pos: Position, value: u8) {
        grid.set(pos, None);
        self.rows[pos.row].remove(value);
        self.cols[pos.col].remove(value);
        self.boxes[pos.box_index()].remove(value);
    }
}

pub(super) fn solve(grid: &mut Grid, steps: &mut Vec<Step>) -> bool {
    let mut masks = Masks::from_grid(grid);
    search(grid, &mut masks, steps)
}

fn search(grid: &mut Grid, masks: &mut Masks, steps: &mut Vec<Step>) -> bool {
    let Some(pos) = grid.first_empty() else {
        return true;
    };

    let candidates = masks.candidates(pos);
    if candidates.is_empty() {
        return false;
    }

    let mut tested = Vec::new();
    for value in candidates.iter() {
        tested.push(value);
        masks.place(grid, pos, value);
        steps.push(Step {
            row: pos.row,
            col: pos.col,
            tested: tested.clone(),
            value,
        });
        if search(grid, masks, steps) {
            return true;
        }
        masks.unplace(grid, pos, value);
        steps.pop();
    }
    false
}

/// Count completions of `grid`, stopping early once `limit` is reached.
pub(super) fn count_completions(grid: &Grid, limit: usize) -> usize {
    let mut work = grid.clone();
    let mut masks = Masks::from_grid(&work);
    let mut count = 0;
    count_recursive(&mut work, &mut masks, limit, &mut count);
    count
}

fn count_recursive(grid: &mut Grid, masks: &mut Masks, limit: usize, count: &mut usize) {
    if *count >= limit {
        return;
    }
    let Some(pos) = grid.first_empty() else {
        *count += 1;
        return;
    };
    let candidates = masks.candidates(pos);
    for value in candidates.iter() {
        masks.place(grid, pos, value);
        count_recursive(grid, masks, limit, count);
        masks.unplace(grid, pos, value);
        if *count >= limit {
            return;
        }
    }
}
