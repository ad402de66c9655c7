//! Practice question selection.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{QuestionBank, QuestionType};

/// Seed used for sampling when none is configured.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// How questions are picked for a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PracticeMode {
    /// Questions of the given types in bank order. An empty type list means
    /// every type.
    Sequential {
        #[serde(default)]
        types: Vec<QuestionType>,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Questions of a single type.
    Focus {
        question_type: QuestionType,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Explicit 1-based question numbers, in the order given.
    Custom { numbers: Vec<usize> },
}

impl PracticeMode {
    /// Every question in bank order.
    pub fn all() -> Self {
        PracticeMode::Sequential {
            types: Vec::new(),
            limit: None,
        }
    }
}

/// Resolve a practice mode to bank indices.
///
/// When a type filter matches more questions than `limit`, a seeded random
/// sample is drawn and returned in bank order, so the same seed always
/// yields the same session.
pub fn select(
    bank: &QuestionBank,
    mode: &PracticeMode,
    seed: u64,
) -> Result<Vec<usize>, SessionError> {
    let selected = match mode {
        PracticeMode::Sequential { types, limit } => {
            let matching = indices_of(bank, |t| types.is_empty() || types.contains(&t));
            cap(matching, *limit, seed)
        }
        PracticeMode::Focus {
            question_type,
            limit,
        } => cap(indices_of(bank, |t| t == *question_type), *limit, seed),
        PracticeMode::Custom { numbers } => {
            let mut selected = Vec::with_capacity(numbers.len());
            for &number in numbers {
                if number == 0 || number > bank.len() {
                    return Err(SessionError::OutOfRange {
                        requested: number,
                        available: bank.len(),
                    });
                }
                if !selected.contains(&(number - 1)) {
                    selected.push(number - 1);
                }
            }
            selected
        }
    };

    if selected.is_empty() {
        return Err(SessionError::EmptySelection);
    }
    Ok(selected)
}

fn indices_of(bank: &QuestionBank, keep: impl Fn(QuestionType) -> bool) -> Vec<usize> {
    bank.questions
        .iter()
        .filter(|q| keep(q.question_type))
        .map(|q| q.original_index)
        .collect()
}

fn cap(indices: Vec<usize>, limit: Option<usize>, seed: u64) -> Vec<usize> {
    match limit {
        Some(limit) if indices.len() > limit => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sampled: Vec<usize> =
                indices.choose_multiple(&mut rng, limit).copied().collect();
            sampled.sort_unstable();
            sampled
        }
        _ => indices,
    }
}
