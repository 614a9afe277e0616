use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SudokuDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Default for SudokuDifficulty {
    fn default() -> Self {
        SudokuDifficulty::Easy
    }
}

impl SudokuDifficulty {
    pub fn all() -> Vec<SudokuDifficulty> {
        vec![
            SudokuDifficulty::Easy,
            SudokuDifficulty::Medium,
            SudokuDifficulty::Hard,
            SudokuDifficulty::Expert,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            SudokuDifficulty::Easy => 0,
            SudokuDifficulty::Medium => 1,
            SudokuDifficulty::Hard => 2,
            SudokuDifficulty::Expert => 3,
        }
    }

    pub fn from_index(index: usize) -> SudokuDifficulty {
        match index {
            0 => SudokuDifficulty::Easy,
            1 => SudokuDifficulty::Medium,
            2 => SudokuDifficulty::Hard,
            3 => SudokuDifficulty::Expert,
            _ => SudokuDifficulty::Easy,
        }
    }

    /// Number of cells cleared from the solved grid to build the puzzle
    pub fn blanks(&self) -> usize {
        match self {
            SudokuDifficulty::Easy => 36,
            SudokuDifficulty::Medium => 46,
            SudokuDifficulty::Hard => 52,
            SudokuDifficulty::Expert => 58,
        }
    }

    pub fn clues(&self) -> usize {
        81 - self.blanks()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SudokuDifficulty::Easy => "easy",
            SudokuDifficulty::Medium => "medium",
            SudokuDifficulty::Hard => "hard",
            SudokuDifficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for SudokuDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
