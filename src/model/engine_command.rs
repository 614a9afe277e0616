use super::{CardId, RecallDifficulty, SudokuDifficulty, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SudokuCommand {
    NewGame(Option<SudokuDifficulty>), // None keeps the current difficulty
    SelectCell(usize, usize),
    SetCellValue(usize, usize, Option<u8>),
    ClearCell,
    ShowHint,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecallCommand {
    NewGame(RecallDifficulty, Theme),
    FlipCard(CardId),
    Cleanup,
}
