mod card;
mod engine_command;
mod engine_event;
mod grid;
mod recall_difficulty;
mod recall_stats;
mod rejected;
mod sudoku_difficulty;
mod sudoku_stats;
mod theme;
mod timer_state;

pub use card::{Card, CardId};
pub use engine_command::{RecallCommand, SudokuCommand};
pub use engine_event::{RecallCompletion, RecallEngineEvent, SudokuCompletion, SudokuEngineEvent};
pub use grid::{CellPosition, Grid, BOX_SIZE, GRID_SIZE};
pub use recall_difficulty::RecallDifficulty;
pub use recall_stats::RecallStats;
pub use rejected::Rejected;
pub use sudoku_difficulty::SudokuDifficulty;
pub use sudoku_stats::SudokuStats;
pub use theme::Theme;
pub use timer_state::TimerState;
