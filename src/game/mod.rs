pub mod deck_generator;
pub mod recall_engine;
pub mod recall_session;
pub mod settings;
pub mod stats_manager;
pub mod sudoku_engine;
pub mod sudoku_generator;
pub mod sudoku_rules;
pub mod sudoku_session;

pub use deck_generator::generate_deck;
pub use recall_engine::RecallEngine;
pub use recall_session::{RecallPhase, RecallSession};
pub use settings::Settings;
pub use stats_manager::{JsonFileStorage, MemoryStorage, StatsManager, StatsStorage};
pub use sudoku_engine::SudokuEngine;
pub use sudoku_generator::{generate_puzzle, SudokuPuzzle};
pub use sudoku_rules::{
    candidates, find_naked_single, has_conflicts, is_complete, is_solved, is_valid_placement,
    NakedSingle,
};
pub use sudoku_session::{SudokuPhase, SudokuSession, MAX_HINTS};
