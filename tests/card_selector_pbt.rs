//! Property-based tests for card selection
//!
//! - Target is always an entry of the pool
//! - Distractors never share the target's word text
//! - Distractors are words from the pool, at most `distractor_count` of them
//! - Shuffled choices are exactly target plus distractors

use std::collections::BTreeSet;

use chrono::Utc;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use flashcard_bot::core::UserId;
use flashcard_bot::db::WordEntry;
use flashcard_bot::services::card_selector::{select_card, EmptyPoolError};

fn arb_entry() -> impl Strategy<Value = WordEntry> {
    (
        1i64..10_000,
        "[a-e]{1,3}",
        "[а-д]{1,4}",
        proptest::option::of(1i64..4),
    )
        .prop_map(|(id, word, translation, owner)| WordEntry {
            id,
            word,
            translation,
            owner: owner.map(UserId),
            created_at: Utc::now(),
        })
}

fn arb_pool() -> impl Strategy<Value = Vec<WordEntry>> {
    proptest::collection::vec(arb_entry(), 1..30)
}

proptest! {
    #[test]
    fn prop_target_from_pool_and_distractors_disjoint(
        pool in arb_pool(),
        distractor_count in 0usize..8,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let card = select_card(&pool, distractor_count, &mut rng).unwrap();

        prop_assert!(pool.contains(&card.target));
        prop_assert!(!card.distractors.contains(&card.target.word));
        prop_assert!(card.distractors.len() <= distractor_count);

        let words: BTreeSet<&str> = pool.iter().map(|e| e.word.as_str()).collect();
        for distractor in &card.distractors {
            prop_assert!(words.contains(distractor.as_str()));
        }
    }

    #[test]
    fn prop_choices_are_target_plus_distractors(
        pool in arb_pool(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let card = select_card(&pool, 4, &mut rng).unwrap();
        let choices = card.shuffled_choices(&mut rng);

        prop_assert_eq!(choices.len(), card.distractors.len() + 1);
        let mut expected: BTreeSet<String> = card.distractors.clone();
        expected.insert(card.target.word.clone());
        let actual: BTreeSet<String> = choices.into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_empty_pool_always_fails(distractor_count in 0usize..8, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(select_card(&[], distractor_count, &mut rng), Err(EmptyPoolError));
    }
}
