use std::collections::BTreeSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use thiserror::Error;

use crate::db::WordEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("word pool is empty")]
pub struct EmptyPoolError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub target: WordEntry,
    /// Never contains the target's word text.
    pub distractors: BTreeSet<String>,
}

impl Card {
    /// Target and distractors in random order, so the target's position
    /// carries no information.
    pub fn shuffled_choices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut choices = Vec::with_capacity(self.distractors.len() + 1);
        choices.push(self.target.word.clone());
        choices.extend(self.distractors.iter().cloned());
        choices.shuffle(rng);
        choices
    }
}

/// Picks a uniformly random target, then draws up to `distractor_count`
/// entries from the whole pool without replacement. Draws whose text equals
/// the target's word are dropped afterwards, so small pools yield fewer
/// distractors.
pub fn select_card<R: Rng + ?Sized>(
    pool: &[WordEntry],
    distractor_count: usize,
    rng: &mut R,
) -> Result<Card, EmptyPoolError> {
    let target = pool.choose(rng).ok_or(EmptyPoolError)?.clone();

    let distractors = pool
        .choose_multiple(rng, distractor_count.min(pool.len()))
        .filter(|entry| entry.word != target.word)
        .map(|entry| entry.word.clone())
        .collect();

    Ok(Card { target, distractors })
}
