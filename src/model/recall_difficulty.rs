use serde::{Deserialize, Serialize};

/// Number of picture pairs on the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecallDifficulty {
    ThreePairs,
    FourPairs,
    FivePairs,
}

impl Default for RecallDifficulty {
    fn default() -> Self {
        RecallDifficulty::ThreePairs
    }
}

impl RecallDifficulty {
    pub fn all() -> Vec<RecallDifficulty> {
        vec![
            RecallDifficulty::ThreePairs,
            RecallDifficulty::FourPairs,
            RecallDifficulty::FivePairs,
        ]
    }

    pub fn pairs(&self) -> usize {
        match self {
            RecallDifficulty::ThreePairs => 3,
            RecallDifficulty::FourPairs => 4,
            RecallDifficulty::FivePairs => 5,
        }
    }

    pub fn from_pairs(pairs: usize) -> Option<RecallDifficulty> {
        match pairs {
            3 => Some(RecallDifficulty::ThreePairs),
            4 => Some(RecallDifficulty::FourPairs),
            5 => Some(RecallDifficulty::FivePairs),
            _ => None,
        }
    }

    /// How long every card is shown face-up before play begins
    pub fn preview_seconds(&self) -> u32 {
        match self {
            RecallDifficulty::ThreePairs => 5,
            RecallDifficulty::FourPairs => 5,
            RecallDifficulty::FivePairs => 10,
        }
    }
}

impl From<RecallDifficulty> for u8 {
    fn from(difficulty: RecallDifficulty) -> u8 {
        difficulty.pairs() as u8
    }
}

impl TryFrom<u8> for RecallDifficulty {
    type Error = String;

    fn try_from(pairs: u8) -> Result<Self, Self::Error> {
        RecallDifficulty::from_pairs(pairs as usize)
            .ok_or_else(|| format!("unsupported pair count: {}", pairs))
    }
}

impl std::fmt::Display for RecallDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pairs", self.pairs())
    }
}
