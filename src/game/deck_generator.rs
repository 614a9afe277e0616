use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Card, RecallDifficulty, Theme};

/// Deal a Picture-Recall deck: the first `difficulty.pairs()` images of the
/// theme's pool, two face-down cards each, shuffled (Fisher-Yates).
///
/// The image subset is always the same for a given difficulty and theme;
/// only the order varies.
pub fn generate_deck<R: Rng + ?Sized>(
    difficulty: RecallDifficulty,
    theme: Theme,
    rng: &mut R,
) -> Vec<Card> {
    let mut cards: Vec<Card> = theme
        .image_keys()
        .iter()
        .take(difficulty.pairs())
        .flat_map(|key| [*key, *key])
        .enumerate()
        .map(|(id, key)| Card::new(id, key))
        .collect();
    cards.shuffle(rng);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uses_leading_images_of_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let deck = generate_deck(RecallDifficulty::ThreePairs, Theme::Flags, &mut rng);
        let keys: Vec<&str> = deck
            .iter()
            .map(|card| card.pair_key.as_str())
            .unique()
            .sorted()
            .collect();
        assert_eq!(keys, vec!["fr", "gb", "us"]);
    }

    #[test]
    fn test_cards_start_face_down() {
        let mut rng = StdRng::seed_from_u64(2);
        let deck = generate_deck(RecallDifficulty::FivePairs, Theme::Things, &mut rng);
        assert!(deck.iter().all(Card::is_face_down));
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = generate_deck(RecallDifficulty::FourPairs, Theme::Things, &mut StdRng::seed_from_u64(9));
        let b = generate_deck(RecallDifficulty::FourPairs, Theme::Things, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn deck_has_exact_pairs(seed in any::<u64>(), pairs in 3usize..=5, things in any::<bool>()) {
            let difficulty = RecallDifficulty::from_pairs(pairs).unwrap();
            let theme = if things { Theme::Things } else { Theme::Flags };
            let deck = generate_deck(difficulty, theme, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(deck.len(), 2 * pairs);
            let counts = deck.iter().map(|card| card.pair_key.as_str()).counts();
            prop_assert_eq!(counts.len(), pairs);
            prop_assert!(counts.values().all(|&count| count == 2));
            let ids = deck.iter().map(|card| card.id).unique().count();
            prop_assert_eq!(ids, 2 * pairs);
        }
    }
}
