//! TOML question bank parser.
//!
//! Loads plain-text question banks from TOML files, and validates banks
//! from any source for common authoring mistakes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::builder::{BankBuilder, RawRow};
use crate::classify::Classifier;
use crate::model::{QuestionBank, QuestionType};
use crate::normalize::is_boolean_token;

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    bank: Option<TomlBankHeader>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_section")]
    section: String,
}

fn default_section() -> String {
    "bank".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: Option<TomlScalar>,
    #[serde(default)]
    options: Option<TomlOptions>,
    #[serde(default, rename = "type")]
    question_type: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    section: Option<String>,
}

/// Answers may be bare TOML values (`answer = true`, `answer = 42`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl TomlScalar {
    /// Render the value the way it would read in a spreadsheet cell.
    fn into_text(self) -> String {
        match self {
            TomlScalar::Text(text) => text,
            TomlScalar::Integer(i) => i.to_string(),
            TomlScalar::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
            TomlScalar::Float(f) => f.to_string(),
            TomlScalar::Bool(b) => b.to_string(),
        }
    }
}

/// Options may be written as one cell-like string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlOptions {
    Cell(String),
    List(Vec<String>),
}

impl TomlOptions {
    fn into_cell(self) -> String {
        match self {
            TomlOptions::Cell(cell) => cell,
            TomlOptions::List(items) => items.join("\n"),
        }
    }
}

/// Parse a single TOML file into a `QuestionBank`.
///
/// The bank id is `[bank].id` when present, otherwise the file stem.
pub fn parse_bank(path: &Path, classifier: &Classifier) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path, classifier)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(
    content: &str,
    source_path: &Path,
    classifier: &Classifier,
) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bank".to_string());
    let (id, default_section) = match parsed.bank {
        Some(header) => (header.id.unwrap_or(stem), header.section),
        None => (stem, default_section()),
    };

    // Entries are numbered from 1 in file order.
    let rows: Vec<RawRow> = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| RawRow {
            source: q.section.unwrap_or_else(|| default_section.clone()),
            row_index: i + 1,
            question: q.question,
            answer: q.answer.map(TomlScalar::into_text).unwrap_or_default(),
            options_cell: q.options.map(TomlOptions::into_cell),
            discrete_options: Default::default(),
            explicit_type: q.question_type,
            explanation: q.explanation,
        })
        .collect();

    let mut builder = BankBuilder::new(id, classifier);
    builder.add_rows(&rows);
    let bank = builder.finish();
    if bank.skipped_rows > 0 {
        tracing::warn!(
            "{}: skipped {} question(s) without text",
            source_path.display(),
            bank.skipped_rows
        );
    }
    Ok(bank)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common authoring issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.skipped_rows > 0 {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!("{} row(s) without question text were skipped", bank.skipped_rows),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &bank.questions {
        if q.correct_answer_raw.is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "correct answer is empty".into(),
            });
            continue;
        }

        match q.question_type {
            QuestionType::SingleChoice => {
                if q.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: "single-choice question has no options".into(),
                    });
                } else if q.correct_answer_normalized.chars().count() == 1
                    && q.option(&q.correct_answer_normalized).is_none()
                {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: format!(
                            "answer {} does not match any option",
                            q.correct_answer_normalized
                        ),
                    });
                }
            }
            QuestionType::TrueFalse => {
                if !is_boolean_token(&q.correct_answer_normalized) {
                    warnings.push(ValidationWarning {
                        question_id: Some(q.id.clone()),
                        message: format!(
                            "true/false answer '{}' is not a recognized true/false value",
                            q.correct_answer_raw
                        ),
                    });
                }
            }
            QuestionType::FillBlank | QuestionType::ShortAnswer => {}
        }
    }

    warnings
}
