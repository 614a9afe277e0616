use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RecallDifficulty;

/// Lifetime Picture-Recall statistics. `best_*` and `average_moves` are kept
/// per difficulty; the counters and `total_time` (seconds) are global.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecallStats {
    pub games_played: u32,
    pub games_completed: u32,
    pub best_moves: BTreeMap<RecallDifficulty, u32>,
    pub best_time: BTreeMap<RecallDifficulty, u64>,
    pub average_moves: BTreeMap<RecallDifficulty, u32>,
    pub total_time: u64,
}

impl RecallStats {
    pub fn best_moves_for(&self, difficulty: RecallDifficulty) -> Option<u32> {
        self.best_moves.get(&difficulty).copied()
    }

    pub fn best_time_for(&self, difficulty: RecallDifficulty) -> Option<u64> {
        self.best_time.get(&difficulty).copied()
    }

    pub fn average_moves_for(&self, difficulty: RecallDifficulty) -> u32 {
        self.average_moves.get(&difficulty).copied().unwrap_or(0)
    }

    /// Fold one completed game into the summary.
    ///
    /// The per-difficulty average is weighted by the global `games_played`
    /// counter, so games at other difficulties pull on it too.
    pub fn record_completion(
        &mut self,
        difficulty: RecallDifficulty,
        moves: u32,
        elapsed_seconds: u64,
    ) {
        let best_moves = self.best_moves.entry(difficulty).or_insert(moves);
        *best_moves = (*best_moves).min(moves);

        let best_time = self.best_time.entry(difficulty).or_insert(elapsed_seconds);
        *best_time = (*best_time).min(elapsed_seconds);

        let weight = self.games_played.max(1) as u64;
        let old_average = self.average_moves_for(difficulty) as u64;
        let new_average = (old_average * weight + moves as u64) / (self.games_played as u64 + 1);
        self.average_moves.insert(difficulty, new_average as u32);

        self.games_played += 1;
        self.games_completed += 1;
        self.total_time += elapsed_seconds;
    }
}
