//! Session summaries with JSON persistence and markdown rendering.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Question, QuestionType};
use crate::session::ProgressRecord;
use crate::statistics::accuracy_percent;

/// Totals for one question type within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTally {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

/// A question answered incorrectly during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedQuestion {
    pub question_id: String,
    pub text: String,
    pub answer: String,
    pub expected: String,
}

/// Outcome of a practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub bank_id: String,
    pub generated_at: DateTime<Utc>,
    /// Questions in the session.
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub per_type: BTreeMap<QuestionType, TypeTally>,
    pub missed: Vec<MissedQuestion>,
}

impl SessionSummary {
    pub fn new(session_id: Uuid, bank_id: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            bank_id: bank_id.to_string(),
            generated_at,
            total: 0,
            answered: 0,
            correct: 0,
            per_type: BTreeMap::new(),
            missed: Vec::new(),
        }
    }

    /// Count one session question and its progress, if any.
    pub fn tally(&mut self, question: &Question, record: Option<&ProgressRecord>) {
        let tally = self.per_type.entry(question.question_type).or_default();
        tally.total += 1;
        self.total += 1;

        let Some(record) = record else {
            return;
        };
        tally.answered += 1;
        self.answered += 1;
        if record.correct {
            tally.correct += 1;
            self.correct += 1;
        } else {
            self.missed.push(MissedQuestion {
                question_id: question.id.clone(),
                text: question.text.clone(),
                answer: record.answer.clone(),
                expected: question.correct_answer_raw.clone(),
            });
        }
    }

    /// Accuracy over answered questions, in percent.
    pub fn accuracy(&self) -> f64 {
        accuracy_percent(self.correct, self.answered)
    }

    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: SessionSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} of {} answered, {} correct ({:.1}%)\n\n",
            self.answered,
            self.total,
            self.correct,
            self.accuracy()
        ));

        if !self.per_type.is_empty() {
            md.push_str("| Type | Questions | Answered | Correct | Accuracy |\n");
            md.push_str("|------|-----------|----------|---------|----------|\n");
            for (question_type, tally) in &self.per_type {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {:.1}% |\n",
                    question_type.display_name(),
                    tally.total,
                    tally.answered,
                    tally.correct,
                    accuracy_percent(tally.correct, tally.answered)
                ));
            }
            md.push('\n');
        }

        if !self.missed.is_empty() {
            md.push_str("### Missed\n\n");
            md.push_str("| Question | Your answer | Expected |\n");
            md.push_str("|----------|-------------|----------|\n");
            for m in &self.missed {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    m.question_id,
                    escape_cell(&m.answer),
                    escape_cell(&m.expected)
                ));
            }
        }

        md
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
