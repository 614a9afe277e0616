use serde::{Deserialize, Serialize};

pub type CardId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub pair_key: String,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub fn new(id: CardId, pair_key: &str) -> Self {
        Self {
            id,
            pair_key: pair_key.to_string(),
            is_flipped: false,
            is_matched: false,
        }
    }

    pub fn is_face_down(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    pub fn matches(&self, other: &Card) -> bool {
        self.id != other.id && self.pair_key == other.pair_key
    }
}
