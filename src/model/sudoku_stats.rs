use serde::{Deserialize, Serialize};

/// Lifetime Sudoku statistics. Times are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SudokuStats {
    pub games_played: u32,
    pub games_completed: u32,
    pub best_time: Option<u64>,
    pub total_time: u64,
    pub average_time: u64,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl SudokuStats {
    /// Fold one completed game into the running summary.
    ///
    /// Sessions can only be replaced, never abandoned as a scored event, so
    /// nothing here ever resets `current_streak`.
    pub fn record_completion(&mut self, elapsed_seconds: u64) {
        self.games_played += 1;
        self.games_completed += 1;
        self.best_time = Some(
            self.best_time
                .map_or(elapsed_seconds, |best| best.min(elapsed_seconds)),
        );
        self.total_time += elapsed_seconds;
        self.average_time = self.total_time / self.games_played as u64;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
    }
}
