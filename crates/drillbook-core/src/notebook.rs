//! Wrong-question notebook.
//!
//! Collects the questions a learner got wrong so they can be reviewed
//! later. A record is created on the first incorrect submission of a
//! question and updated on every later submission of the same question.
//! Once the learner answers it correctly they may mark it mastered, which
//! flags it reviewed; mastered records can then be purged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotebookError;
use crate::model::Question;

/// One submission of a notebook question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub answer: String,
    pub correct: bool,
    pub at: DateTime<Utc>,
}

/// A question the learner has answered incorrectly at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongQuestionRecord {
    pub question_id: String,
    /// The question as it was when first missed.
    pub question: Question,
    pub last_answer: String,
    pub history: Vec<Attempt>,
    pub attempt_count: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub reviewed: bool,
    pub last_correct: bool,
}

/// Counts shown on the review screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookStats {
    pub total: usize,
    pub not_reviewed: usize,
}

/// The wrong-question records of one bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongNotebook {
    pub bank_id: String,
    /// In order of first miss.
    records: Vec<WrongQuestionRecord>,
}

impl WrongNotebook {
    pub fn new(bank_id: impl Into<String>) -> Self {
        Self {
            bank_id: bank_id.into(),
            records: Vec::new(),
        }
    }

    /// Record a graded submission.
    ///
    /// Correct answers to questions that were never missed leave the
    /// notebook untouched. A wrong answer clears a previous reviewed flag.
    /// Returns `true` if the question has a record afterwards.
    pub fn record_submission(
        &mut self,
        question: &Question,
        answer: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> bool {
        let attempt = Attempt {
            answer: answer.trim().to_string(),
            correct,
            at: now,
        };

        if let Some(record) = self.records.iter_mut().find(|r| r.question_id == question.id) {
            record.last_answer = attempt.answer.clone();
            record.history.push(attempt);
            record.attempt_count += 1;
            record.last_seen = now;
            record.last_correct = correct;
            if !correct {
                record.reviewed = false;
            }
            return true;
        }

        if correct {
            return false;
        }

        tracing::debug!("adding {} to the notebook of '{}'", question.id, self.bank_id);
        self.records.push(WrongQuestionRecord {
            question_id: question.id.clone(),
            question: question.clone(),
            last_answer: attempt.answer.clone(),
            history: vec![attempt],
            attempt_count: 1,
            first_seen: now,
            last_seen: now,
            reviewed: false,
            last_correct: false,
        });
        true
    }

    /// Flag a record reviewed. Refused unless the last attempt was correct.
    pub fn mark_mastered(&mut self, question_id: &str) -> Result<(), NotebookError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.question_id == question_id)
            .ok_or_else(|| NotebookError::NotFound(question_id.to_string()))?;
        if !record.last_correct {
            return Err(NotebookError::NotYetCorrect(question_id.to_string()));
        }
        record.reviewed = true;
        Ok(())
    }

    /// Remove every reviewed record. Returns how many were removed.
    pub fn purge_mastered(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.reviewed);
        before - self.records.len()
    }

    pub fn stats(&self) -> NotebookStats {
        NotebookStats {
            total: self.records.len(),
            not_reviewed: self.records.iter().filter(|r| !r.reviewed).count(),
        }
    }

    /// Records still to review, in order of first miss.
    pub fn pending(&self) -> impl Iterator<Item = &WrongQuestionRecord> {
        self.records.iter().filter(|r| !r.reviewed)
    }

    pub fn get(&self, question_id: &str) -> Option<&WrongQuestionRecord> {
        self.records.iter().find(|r| r.question_id == question_id)
    }

    pub fn records(&self) -> &[WrongQuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
