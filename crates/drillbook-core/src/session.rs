//! Practice session state.
//!
//! A [`SessionState`] owns the ordered list of questions picked for one
//! practice run, a cursor into it, and the progress recorded so far. It is
//! a plain value: the caller owns it, mutates it through `&mut self`, and
//! serializes it to resume later.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::grade::{Assessment, Grader};
use crate::model::{Question, QuestionBank};
use crate::report::SessionSummary;
use crate::selection::{select, PracticeMode};

/// The learner's latest answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub answer: String,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// State of a practice session over one bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub bank_id: String,
    pub mode: PracticeMode,
    /// Bank indices in presentation order.
    order: Vec<usize>,
    cursor: usize,
    /// Keyed by the question's bank index.
    progress: BTreeMap<usize, ProgressRecord>,
    #[serde(default)]
    revealed: BTreeSet<usize>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Start a new session over the questions `mode` selects.
    pub fn start(
        bank: &QuestionBank,
        mode: PracticeMode,
        seed: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let order = select(bank, &mode, seed)?;
        tracing::debug!("session over '{}' with {} questions", bank.id, order.len());
        Ok(Self {
            id: Uuid::new_v4(),
            bank_id: bank.id.clone(),
            mode,
            order,
            cursor: 0,
            progress: BTreeMap::new(),
            revealed: BTreeSet::new(),
            started_at: now,
            updated_at: now,
        })
    }

    /// Check that a resumed session still fits `bank`.
    pub fn verify(&self, bank: &QuestionBank) -> Result<(), SessionError> {
        let fits = self.bank_id == bank.id
            && self.order.iter().all(|&i| i < bank.len())
            && self.progress.keys().all(|&i| i < bank.len());
        if fits {
            Ok(())
        } else {
            Err(SessionError::BankMismatch(bank.id.clone()))
        }
    }

    /// Number of questions in the session.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Zero-based position of the cursor within the session.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bank indices in presentation order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.order.len()
    }

    /// The question under the cursor, or `None` once the session is finished.
    pub fn current<'b>(&self, bank: &'b QuestionBank) -> Option<&'b Question> {
        self.order.get(self.cursor).and_then(|&i| bank.get(i))
    }

    /// Progress recorded for a question, by bank index.
    pub fn record(&self, original_index: usize) -> Option<&ProgressRecord> {
        self.progress.get(&original_index)
    }

    /// Whether the answer of a question was revealed without grading.
    pub fn was_revealed(&self, original_index: usize) -> bool {
        self.revealed.contains(&original_index)
    }

    /// Grade an answer to the current question and record it.
    ///
    /// The cursor does not move; call [`SessionState::advance`] to go on.
    pub fn submit(
        &mut self,
        bank: &QuestionBank,
        grader: &Grader,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<Assessment, SessionError> {
        let question = self.current(bank).ok_or(SessionError::Finished)?;
        let assessment = grader.assess(answer, question);
        self.progress.insert(
            question.original_index,
            ProgressRecord {
                answer: answer.trim().to_string(),
                correct: assessment.correct,
                answered_at: now,
            },
        );
        self.updated_at = now;
        Ok(assessment)
    }

    /// Show the current question's answer without grading it.
    pub fn reveal<'b>(&mut self, bank: &'b QuestionBank) -> Result<&'b Question, SessionError> {
        let question = self.current(bank).ok_or(SessionError::Finished)?;
        self.revealed.insert(question.original_index);
        Ok(question)
    }

    /// Move to the next question. Also used to skip.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Move back one question. Returns `false` at the first question.
    pub fn previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.cursor.min(self.order.len()) - 1;
        true
    }

    /// Jump to a 1-based position within the session.
    pub fn jump(&mut self, number: usize) -> Result<(), SessionError> {
        if number == 0 || number > self.order.len() {
            return Err(SessionError::OutOfRange {
                requested: number,
                available: self.order.len(),
            });
        }
        self.cursor = number - 1;
        Ok(())
    }

    /// Forget all answers and return to the first question.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.cursor = 0;
        self.progress.clear();
        self.revealed.clear();
        self.updated_at = now;
    }

    /// Tally the session so far.
    pub fn summary(&self, bank: &QuestionBank) -> SessionSummary {
        let mut summary = SessionSummary::new(self.id, &self.bank_id, self.updated_at);
        for &index in &self.order {
            let Some(question) = bank.get(index) else {
                continue;
            };
            summary.tally(question, self.progress.get(&index));
        }
        summary
    }
}
