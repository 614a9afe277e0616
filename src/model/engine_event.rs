use serde::Serialize;
use uuid::Uuid;

use super::{RecallDifficulty, RecallStats, SudokuDifficulty, SudokuStats, Theme};
use crate::game::{RecallSession, SudokuSession};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuCompletion {
    pub difficulty: SudokuDifficulty,
    pub elapsed_seconds: u64,
    pub hints_used: u32,
    pub playthrough_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallCompletion {
    pub difficulty: RecallDifficulty,
    pub theme: Theme,
    pub moves: u32,
    pub elapsed_seconds: u64,
    pub playthrough_id: Uuid,
}

#[derive(Debug, Clone)]
pub enum SudokuEngineEvent {
    SessionUpdated(SudokuSession),
    HintUsageChanged(u32),
    Completed(SudokuCompletion),
    StatsUpdated(SudokuStats),
}

#[derive(Debug, Clone)]
pub enum RecallEngineEvent {
    SessionUpdated(RecallSession),
    PreviewEnded,
    PairResolved { matched: bool, pair_key: String },
    Completed(RecallCompletion),
    StatsUpdated(RecallStats),
}
