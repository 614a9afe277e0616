//! Stateless Sudoku constraint checks.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::model::{CellPosition, Grid, BOX_SIZE, GRID_SIZE};

/// An empty cell where exactly one digit is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NakedSingle {
    pub row: usize,
    pub col: usize,
    pub digit: u8,
}

/// `digit` may go at (row, col) if it does not already appear elsewhere in
/// the same row, column or 3x3 box. The cell's own value is ignored.
pub fn is_valid_placement(grid: &Grid, row: usize, col: usize, digit: u8) -> bool {
    let pos = CellPosition::new(row, col);
    if !pos.is_in_bounds() || !Grid::is_digit(digit) {
        return false;
    }

    let in_row = (0..GRID_SIZE).any(|c| c != col && grid.get(row, c) == Some(digit));
    let in_col = (0..GRID_SIZE).any(|r| r != row && grid.get(r, col) == Some(digit));

    let origin = pos.box_origin();
    let in_box = iproduct!(
        origin.row..origin.row + BOX_SIZE,
        origin.col..origin.col + BOX_SIZE
    )
    .any(|(r, c)| (r, c) != (row, col) && grid.get(r, c) == Some(digit));

    !(in_row || in_col || in_box)
}

pub fn has_conflicts(grid: &Grid) -> bool {
    Grid::positions().any(|pos| match grid.get(pos.row, pos.col) {
        Some(digit) => !is_valid_placement(grid, pos.row, pos.col, digit),
        None => false,
    })
}

/// True when no cell is empty. Says nothing about conflicts.
pub fn is_complete(grid: &Grid) -> bool {
    grid.empty_count() == 0
}

/// Full and conflict-free. This is the winning condition; the stored
/// solution is never consulted.
pub fn is_solved(grid: &Grid) -> bool {
    is_complete(grid) && !has_conflicts(grid)
}

pub fn candidates(grid: &Grid, row: usize, col: usize) -> Vec<u8> {
    (1..=9)
        .filter(|&digit| is_valid_placement(grid, row, col, digit))
        .collect()
}

/// First empty cell, in row-major order, with a single legal digit.
///
/// Naked singles are the only technique tried. A board whose next step needs
/// anything stronger gets no hint.
pub fn find_naked_single(grid: &Grid) -> Option<NakedSingle> {
    grid.empty_positions().find_map(|pos| {
        match candidates(grid, pos.row, pos.col).as_slice() {
            [digit] => Some(NakedSingle {
                row: pos.row,
                col: pos.col,
                digit: *digit,
            }),
            _ => None,
        }
    })
}
