use std::time::SystemTime;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deck_generator::generate_deck;
use crate::model::{Card, CardId, RecallDifficulty, Rejected, Theme, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecallPhase {
    Previewing,
    Playing,
    Completed,
}

/// One Picture-Recall playthrough. Timers live in the engine; the session
/// only reacts to ticks and resolutions it is handed.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallSession {
    pub cards: Vec<Card>,
    pub selected_cards: Vec<CardId>,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub moves: u32,
    pub difficulty: RecallDifficulty,
    pub theme: Theme,
    pub is_game_complete: bool,
    pub show_preview: bool,
    pub preview_seconds_remaining: u32,
    pub timer: TimerState,
    pub seed: u64,
    pub playthrough_id: Uuid,
}

impl RecallSession {
    /// Deal a new deck, every card face-up for the preview.
    pub fn new_game(difficulty: RecallDifficulty, theme: Theme, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        let cards = generate_deck(difficulty, theme, &mut rng)
            .into_iter()
            .map(|mut card| {
                card.is_flipped = true;
                card
            })
            .collect();

        Self {
            cards,
            selected_cards: Vec::new(),
            matched_pairs: 0,
            total_pairs: difficulty.pairs(),
            moves: 0,
            difficulty,
            theme,
            is_game_complete: false,
            show_preview: true,
            preview_seconds_remaining: difficulty.preview_seconds(),
            timer: TimerState::default(),
            seed,
            playthrough_id: Uuid::new_v4(),
        }
    }

    pub fn phase(&self) -> RecallPhase {
        if self.is_game_complete {
            RecallPhase::Completed
        } else if self.show_preview {
            RecallPhase::Previewing
        } else {
            RecallPhase::Playing
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn start_time(&self) -> Option<SystemTime> {
        self.timer.started_timestamp
    }

    pub fn end_time(&self) -> Option<SystemTime> {
        self.timer.ended_timestamp
    }

    pub fn elapsed_seconds(&self) -> Option<u64> {
        self.timer.elapsed_seconds()
    }

    /// One second of preview has passed. The last tick turns every card
    /// face-down and starts the clock.
    pub fn tick_preview(&self, now: SystemTime) -> Result<Self, Rejected> {
        if self.phase() != RecallPhase::Previewing {
            return Err(Rejected::PreviewNotActive);
        }

        let mut next = self.clone();
        next.preview_seconds_remaining = next.preview_seconds_remaining.saturating_sub(1);
        if next.preview_seconds_remaining == 0 {
            for card in next.cards.iter_mut() {
                card.is_flipped = false;
            }
            next.show_preview = false;
            next.timer = TimerState::started(now);
        }
        Ok(next)
    }

    pub fn flip_card(&self, id: CardId) -> Result<Self, Rejected> {
        if self.phase() != RecallPhase::Playing {
            return Err(Rejected::NotPlaying);
        }
        if self.selected_cards.len() >= 2 {
            return Err(Rejected::SelectionFull);
        }
        let index = self
            .cards
            .iter()
            .position(|card| card.id == id)
            .ok_or(Rejected::UnknownCard(id))?;
        if !self.cards[index].is_face_down() {
            return Err(Rejected::CardNotFaceDown(id));
        }

        let mut next = self.clone();
        next.cards[index].is_flipped = true;
        next.selected_cards.push(id);
        Ok(next)
    }

    /// Compare the two selected cards. Either outcome costs one move.
    pub fn resolve_selection(&self, now: SystemTime) -> Result<Self, Rejected> {
        let [first, second] = self.selected_cards[..] else {
            return Err(Rejected::SelectionIncomplete);
        };
        let (Some(first), Some(second)) = (self.card(first), self.card(second)) else {
            return Err(Rejected::SelectionIncomplete);
        };
        let matched_key = first.matches(second).then(|| first.pair_key.clone());
        let selected = self.selected_cards.clone();

        let mut next = self.clone();
        next.moves += 1;
        next.selected_cards.clear();
        match matched_key {
            Some(key) => {
                for card in next.cards.iter_mut().filter(|card| card.pair_key == key) {
                    card.is_matched = true;
                }
                next.matched_pairs += 1;
                if next.matched_pairs == next.total_pairs {
                    next.is_game_complete = true;
                    next.timer = next.timer.ended(now);
                }
            }
            None => {
                for card in next
                    .cards
                    .iter_mut()
                    .filter(|card| selected.contains(&card.id))
                {
                    card.is_flipped = false;
                }
            }
        }
        Ok(next)
    }
}
