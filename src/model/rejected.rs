use super::{CardId, CellPosition};

/// Why an intent left a session untouched. Engines swallow these (logging
/// at debug level) so the host never sees an error from the game core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    OutOfRange(CellPosition),
    ClueCell(CellPosition),
    InvalidDigit(u8),
    NoSelection,
    GameCompleted,
    HintBudgetExhausted,
    NoHintAvailable,
    NotPlaying,
    PreviewNotActive,
    UnknownCard(CardId),
    CardNotFaceDown(CardId),
    SelectionFull,
    SelectionIncomplete,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejected::OutOfRange(pos) => write!(f, "cell {} is off the board", pos),
            Rejected::ClueCell(pos) => write!(f, "cell {} is a clue", pos),
            Rejected::InvalidDigit(digit) => write!(f, "{} is not a digit 1-9", digit),
            Rejected::NoSelection => write!(f, "no cell selected"),
            Rejected::GameCompleted => write!(f, "game already completed"),
            Rejected::HintBudgetExhausted => write!(f, "no hints left"),
            Rejected::NoHintAvailable => write!(f, "no naked single on the board"),
            Rejected::NotPlaying => write!(f, "game is not in play"),
            Rejected::PreviewNotActive => write!(f, "preview already over"),
            Rejected::UnknownCard(id) => write!(f, "no card with id {}", id),
            Rejected::CardNotFaceDown(id) => write!(f, "card {} is already face-up", id),
            Rejected::SelectionFull => write!(f, "two cards awaiting resolution"),
            Rejected::SelectionIncomplete => write!(f, "fewer than two cards selected"),
        }
    }
}

impl std::error::Error for Rejected {}
