use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use super::sudoku_rules::is_valid_placement;
use crate::model::{CellPosition, Grid, SudokuDifficulty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuPuzzle {
    pub template: Grid,
    pub solution: Grid,
    pub difficulty: SudokuDifficulty,
    pub seed: u64,
}

/// Build a solved grid by randomized backtracking, then clear
/// `difficulty.blanks()` distinct cells to form the template.
///
/// Uniqueness of the solution is not checked.
pub fn generate_puzzle(difficulty: SudokuDifficulty, seed: Option<u64>) -> SudokuPuzzle {
    let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut solution = Grid::new();
    let filled = fill_grid(&mut solution, &mut rng);
    debug_assert!(filled, "an empty grid always has a solution");
    trace!(target: "sudoku", "Solution grid (seed {}): {:?}", seed, solution);

    let mut positions: Vec<CellPosition> = Grid::positions().collect();
    positions.shuffle(&mut rng);

    let mut template = solution.clone();
    for pos in positions.iter().take(difficulty.blanks()) {
        template.set(pos.row, pos.col, None);
    }

    SudokuPuzzle {
        template,
        solution,
        difficulty,
        seed,
    }
}

fn fill_grid(grid: &mut Grid, rng: &mut StdRng) -> bool {
    let Some(pos) = grid.empty_positions().next() else {
        return true;
    };

    let mut digits: Vec<u8> = (1..=9).collect();
    digits.shuffle(rng);

    for digit in digits {
        if is_valid_placement(grid, pos.row, pos.col, digit) {
            grid.set(pos.row, pos.col, Some(digit));
            if fill_grid(grid, rng) {
                return true;
            }
            grid.set(pos.row, pos.col, None);
        }
    }
    false
}
