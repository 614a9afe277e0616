use std::fmt::Display;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 9;
pub const BOX_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize, // 0-8
    pub col: usize, // 0-8
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// Top-left cell of the 3x3 box containing this position
    pub fn box_origin(&self) -> CellPosition {
        CellPosition {
            row: self.row / BOX_SIZE * BOX_SIZE,
            col: self.col / BOX_SIZE * BOX_SIZE,
        }
    }
}

impl std::fmt::Display for CellPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

/// A 9x9 Sudoku grid. Each cell holds a digit 1-9 or nothing.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<u8>; GRID_SIZE]; GRID_SIZE], // [row][col]
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_digit(value: u8) -> bool {
        (1..=9).contains(&value)
    }

    /// Every position on the board, row-major.
    pub fn positions() -> impl Iterator<Item = CellPosition> {
        iproduct!(0..GRID_SIZE, 0..GRID_SIZE).map(|(row, col)| CellPosition::new(row, col))
    }

    /// Out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Option<u8>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = CellPosition> + '_ {
        Self::positions().filter(|pos| !self.is_filled(pos.row, pos.col))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        GRID_SIZE * GRID_SIZE - self.filled_count()
    }

    /// Parse 81 cells in row-major order. Digits 1-9 are values, `.` or `0`
    /// are empty cells, whitespace and `|`/`-` separators are skipped.
    pub fn parse(input: &str) -> Option<Grid> {
        let mut grid = Grid::new();
        let mut index = 0;
        for ch in input.chars() {
            let value = match ch {
                '1'..='9' => Some(ch as u8 - b'0'),
                '.' | '0' => None,
                c if c.is_whitespace() || c == '|' || c == '-' => continue,
                _ => return None,
            };
            if index >= GRID_SIZE * GRID_SIZE {
                return None;
            }
            grid.set(index / GRID_SIZE, index % GRID_SIZE, value);
            index += 1;
        }
        (index == GRID_SIZE * GRID_SIZE).then_some(grid)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();

        for row in 0..GRID_SIZE {
            if row > 0 && row % BOX_SIZE == 0 {
                output.push_str(&"-".repeat(GRID_SIZE * 2 + 3));
                output.push('\n');
            }
            for col in 0..GRID_SIZE {
                if col > 0 && col % BOX_SIZE == 0 {
                    output.push_str("| ");
                }
                match self.cells[row][col] {
                    Some(digit) => output.push_str(&format!("{} ", digit)),
                    None => output.push_str(". "),
                }
            }
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str = "\
53..7....
6..195...
.98....6.
8...6...3
4..8.3..1
7...2...6
.6....28.
...419..5
....8..79";

    #[test]
    fn test_parse() {
        let grid = Grid::parse(PUZZLE).unwrap();
        assert_eq!(grid.get(0, 0), Some(5));
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.get(8, 8), Some(9));
        assert_eq!(grid.filled_count(), 30);
        assert_eq!(grid.empty_count(), 51);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(Grid::parse("123").is_none());
        assert!(Grid::parse(&"1".repeat(82)).is_none());
        assert!(Grid::parse(&"x".repeat(81)).is_none());
    }

    #[test]
    fn test_display_parses_back() {
        let grid = Grid::parse(PUZZLE).unwrap();
        let rendered = grid.to_string();
        assert_eq!(Grid::parse(&rendered), Some(grid));
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let grid = Grid::parse(PUZZLE).unwrap();
        assert_eq!(grid.get(9, 0), None);
        assert_eq!(grid.get(0, 42), None);
    }

    #[test]
    fn test_out_of_range_writes_ignored() {
        let mut grid = Grid::parse(PUZZLE).unwrap();
        grid.set(9, 0, Some(1));
        grid.set(0, 12, Some(1));
        grid.set(usize::MAX, usize::MAX, None);
        assert_eq!(grid, Grid::parse(PUZZLE).unwrap());

        grid.set(0, 2, Some(4));
        assert_eq!(grid.get(0, 2), Some(4));
    }

    #[test]
    fn test_box_origin() {
        assert_eq!(CellPosition::new(4, 7).box_origin(), CellPosition::new(3, 6));
        assert_eq!(CellPosition::new(0, 2).box_origin(), CellPosition::new(0, 0));
        assert_eq!(CellPosition::new(8, 8).box_origin(), CellPosition::new(6, 6));
    }

    #[test]
    fn test_positions_are_row_major() {
        let positions: Vec<_> = Grid::positions().take(10).collect();
        assert_eq!(positions[0], CellPosition::new(0, 0));
        assert_eq!(positions[8], CellPosition::new(0, 8));
        assert_eq!(positions[9], CellPosition::new(1, 0));
        assert_eq!(Grid::positions().count(), 81);
    }
}
