use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sudoku_generator::{generate_puzzle, SudokuPuzzle};
use super::sudoku_rules::{find_naked_single, has_conflicts, is_complete};
use crate::model::{CellPosition, Grid, Rejected, SudokuDifficulty, TimerState};

pub const MAX_HINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudokuPhase {
    Idle,
    Playing,
    Completed,
}

/// One Sudoku playthrough. Transitions never mutate in place: each returns
/// the next session, or the reason the intent was ignored.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuSession {
    pub template: Grid,
    pub solution: Grid,
    pub working: Grid,
    pub selected_cell: Option<CellPosition>,
    pub difficulty: SudokuDifficulty,
    pub timer: TimerState,
    pub is_completed: bool,
    pub has_errors: bool,
    pub hints_used: u32,
    pub max_hints: u32,
    pub seed: u64,
    pub playthrough_id: Uuid,
}

impl SudokuSession {
    pub fn new_game(difficulty: SudokuDifficulty, seed: Option<u64>, now: SystemTime) -> Self {
        Self::from_puzzle(generate_puzzle(difficulty, seed), now)
    }

    pub fn from_puzzle(puzzle: SudokuPuzzle, now: SystemTime) -> Self {
        Self {
            working: puzzle.template.clone(),
            template: puzzle.template,
            solution: puzzle.solution,
            selected_cell: None,
            difficulty: puzzle.difficulty,
            timer: TimerState::started(now),
            is_completed: false,
            has_errors: false,
            hints_used: 0,
            max_hints: MAX_HINTS,
            seed: puzzle.seed,
            playthrough_id: Uuid::new_v4(),
        }
    }

    pub fn with_max_hints(mut self, max_hints: u32) -> Self {
        self.max_hints = max_hints;
        self
    }

    pub fn phase(&self) -> SudokuPhase {
        if self.is_completed {
            SudokuPhase::Completed
        } else {
            SudokuPhase::Playing
        }
    }

    pub fn start_time(&self) -> Option<SystemTime> {
        self.timer.started_timestamp
    }

    pub fn end_time(&self) -> Option<SystemTime> {
        self.timer.ended_timestamp
    }

    /// Seconds from start to completion; `None` while still playing.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        self.timer.elapsed_seconds()
    }

    pub fn is_clue(&self, row: usize, col: usize) -> bool {
        self.template.is_filled(row, col)
    }

    pub fn hints_remaining(&self) -> u32 {
        self.max_hints.saturating_sub(self.hints_used)
    }

    pub fn select_cell(&self, row: usize, col: usize) -> Result<Self, Rejected> {
        let pos = CellPosition::new(row, col);
        if !pos.is_in_bounds() {
            return Err(Rejected::OutOfRange(pos));
        }
        let mut next = self.clone();
        next.selected_cell = Some(pos);
        Ok(next)
    }

    /// Write (or clear, with `None`) a non-clue cell. The first write that
    /// leaves the board full and conflict-free completes the game.
    pub fn set_cell_value(
        &self,
        row: usize,
        col: usize,
        value: Option<u8>,
        now: SystemTime,
    ) -> Result<Self, Rejected> {
        let pos = CellPosition::new(row, col);
        if !pos.is_in_bounds() {
            return Err(Rejected::OutOfRange(pos));
        }
        if self.is_completed {
            return Err(Rejected::GameCompleted);
        }
        if self.is_clue(row, col) {
            return Err(Rejected::ClueCell(pos));
        }
        if let Some(digit) = value.filter(|digit| !Grid::is_digit(*digit)) {
            return Err(Rejected::InvalidDigit(digit));
        }

        let mut next = self.clone();
        next.working.set(row, col, value);
        next.has_errors = has_conflicts(&next.working);
        if is_complete(&next.working) && !next.has_errors {
            next.is_completed = true;
            next.timer = next.timer.ended(now);
        }
        Ok(next)
    }

    pub fn clear_cell(&self, now: SystemTime) -> Result<Self, Rejected> {
        let pos = self.selected_cell.ok_or(Rejected::NoSelection)?;
        self.set_cell_value(pos.row, pos.col, None, now)
    }

    /// Fill the first naked single on the board and spend one hint.
    pub fn get_hint(&self, now: SystemTime) -> Result<Self, Rejected> {
        if self.is_completed {
            return Err(Rejected::GameCompleted);
        }
        if self.hints_used >= self.max_hints {
            return Err(Rejected::HintBudgetExhausted);
        }
        let hint = find_naked_single(&self.working).ok_or(Rejected::NoHintAvailable)?;
        let mut next = self.set_cell_value(hint.row, hint.col, Some(hint.digit), now)?;
        next.hints_used += 1;
        Ok(next)
    }

    /// Start the same puzzle over. Template and solution are kept.
    pub fn reset(&self, now: SystemTime) -> Self {
        let mut next = self.clone();
        next.working = self.template.clone();
        next.selected_cell = None;
        next.has_errors = false;
        next.hints_used = 0;
        next.is_completed = false;
        next.timer = TimerState::started(now);
        next.playthrough_id = Uuid::new_v4();
        next
    }
}
