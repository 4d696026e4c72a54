use crate::error::{QuizError, Result};
use crate::models::{BookRecord, Round};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Answers shown per round: the correct one plus two distractors.
pub const OPTION_COUNT: usize = 3;

/// Records usable in a round: first occurrence per title, skipping any whose
/// description was already taken so option texts never collide.
fn distinct_candidates(pool: &[BookRecord]) -> Vec<&BookRecord> {
    let mut titles = HashSet::new();
    let mut descriptions = HashSet::new();
    let mut candidates = Vec::new();
    for book in pool {
        if titles.contains(book.title.as_str()) || descriptions.contains(book.description.as_str())
        {
            continue;
        }
        titles.insert(book.title.as_str());
        descriptions.insert(book.description.as_str());
        candidates.push(book);
    }
    candidates
}

pub fn next_round<R: Rng>(pool: &[BookRecord], rng: &mut R) -> Result<Round> {
    let candidates = distinct_candidates(pool);
    if candidates.len() < OPTION_COUNT {
        return Err(QuizError::InsufficientData {
            needed: OPTION_COUNT,
            found: candidates.len(),
        });
    }

    let correct_index = rng.gen_range(0..candidates.len());
    let correct_book = candidates[correct_index];

    let mut distractors: Vec<&BookRecord> = candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != correct_index)
        .map(|(_, book)| *book)
        .collect();
    distractors.shuffle(rng);

    let mut options: Vec<String> = distractors
        .iter()
        .take(OPTION_COUNT - 1)
        .map(|book| book.description.clone())
        .chain(std::iter::once(correct_book.description.clone()))
        .collect();
    options.shuffle(rng);

    Ok(Round {
        correct_book: correct_book.clone(),
        options,
    })
}
