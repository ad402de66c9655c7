//! Core data model types for drillbook.
//!
//! These are the fundamental types that the entire drillbook system uses
//! to represent questions, their options, and question banks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::statistics::DetectionStats;

/// Maximum number of options kept per question.
pub const MAX_OPTIONS: usize = 4;

/// Option labels in positional order.
pub const OPTION_LABELS: [&str; MAX_OPTIONS] = ["A", "B", "C", "D"];

/// The four kinds of question the grader knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TrueFalse,
    SingleChoice,
    FillBlank,
    ShortAnswer,
}

impl QuestionType {
    /// All types in display order.
    pub const ALL: [QuestionType; 4] = [
        QuestionType::TrueFalse,
        QuestionType::SingleChoice,
        QuestionType::FillBlank,
        QuestionType::ShortAnswer,
    ];

    /// Parse an explicit type label from bank metadata.
    ///
    /// Returns `None` for anything that is not one of the four recognized
    /// kinds, including multi-select labels.
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionType::TrueFalse => "True/False",
            QuestionType::SingleChoice => "Single choice",
            QuestionType::FillBlank => "Fill in the blank",
            QuestionType::ShortAnswer => "Short answer",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::SingleChoice => write!(f, "single_choice"),
            QuestionType::FillBlank => write!(f, "fill_blank"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "判断" | "判断题" | "true_false" | "truefalse" | "true-false" | "judgment" | "tf" => {
                Ok(QuestionType::TrueFalse)
            }
            "单选" | "单选题" | "single_choice" | "single-choice" | "single" | "choice" => {
                Ok(QuestionType::SingleChoice)
            }
            "填空" | "填空题" | "fill_blank" | "fill-blank" | "fill" | "blank" => {
                Ok(QuestionType::FillBlank)
            }
            "简答" | "简答题" | "short_answer" | "short-answer" | "short" | "essay" => {
                Ok(QuestionType::ShortAnswer)
            }
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A labeled answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// "A" through "D", or empty when no label applies.
    pub label: String,
    /// Option text without its label prefix.
    pub text: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for ChoiceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{}. {}", self.label, self.text)
        }
    }
}

/// A fully built question. Immutable once constructed by the bank builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, `"{source}_{row_index}"`.
    pub id: String,
    /// Position of this question within its bank.
    pub original_index: usize,
    /// The prompt shown to the learner.
    pub text: String,
    /// Detected or declared question type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Choices, only populated for single-choice questions.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// The answer as authored in the bank.
    pub correct_answer_raw: String,
    /// `normalize(correct_answer_raw)`.
    pub correct_answer_normalized: String,
    /// Optional explanation shown after answering.
    #[serde(default)]
    pub explanation: String,
    /// Sheet (or bank section) the question came from.
    pub source: String,
    /// 1-based row number in the source sheet.
    pub row_index: usize,
}

impl Question {
    /// Build the stable identifier for a question.
    pub fn make_id(source: &str, row_index: usize) -> String {
        format!("{source}_{row_index}")
    }

    /// Look up an option by label.
    pub fn option(&self, label: &str) -> Option<&ChoiceOption> {
        self.options
            .iter()
            .find(|o| !o.label.is_empty() && o.label.eq_ignore_ascii_case(label))
    }
}

/// A loaded question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Bank identifier, usually the file stem.
    pub id: String,
    /// Questions in load order; `questions[i].original_index == i`.
    pub questions: Vec<Question>,
    /// Per-sheet detection statistics.
    #[serde(default)]
    pub stats: DetectionStats,
    /// Rows dropped because they were malformed.
    #[serde(default)]
    pub skipped_rows: usize,
}

impl QuestionBank {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            questions: Vec::new(),
            stats: DetectionStats::default(),
            skipped_rows: 0,
        }
    }

    pub fn get(&self, original_index: usize) -> Option<&Question> {
        self.questions.get(original_index)
    }

    pub fn find(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::TrueFalse.to_string(), "true_false");
        assert_eq!(QuestionType::ShortAnswer.to_string(), "short_answer");
        assert_eq!("判断".parse::<QuestionType>().unwrap(), QuestionType::TrueFalse);
        assert_eq!("单选".parse::<QuestionType>().unwrap(), QuestionType::SingleChoice);
        assert_eq!(" 填空 ".parse::<QuestionType>().unwrap(), QuestionType::FillBlank);
        assert_eq!("Essay".parse::<QuestionType>().unwrap(), QuestionType::ShortAnswer);
        assert_eq!(
            "Single_Choice".parse::<QuestionType>().unwrap(),
            QuestionType::SingleChoice
        );
        assert!("多选".parse::<QuestionType>().is_err());
        assert_eq!(QuestionType::from_label("matching"), None);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for t in QuestionType::ALL {
            assert_eq!(t.to_string().parse::<QuestionType>().unwrap(), t);
        }
    }

    #[test]
    fn option_display() {
        assert_eq!(ChoiceOption::new("A", "Paris").to_string(), "A. Paris");
        assert_eq!(ChoiceOption::new("", "Paris").to_string(), "Paris");
    }

    #[test]
    fn question_serde_uses_type_key() {
        let q = Question {
            id: Question::make_id("Sheet1", 2),
            original_index: 0,
            text: "Capital of France?".into(),
            question_type: QuestionType::SingleChoice,
            options: vec![ChoiceOption::new("A", "Paris")],
            correct_answer_raw: "A".into(),
            correct_answer_normalized: "A".into(),
            explanation: String::new(),
            source: "Sheet1".into(),
            row_index: 2,
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""type":"single_choice""#));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "Sheet1_2");
        assert_eq!(back.option("a").map(|o| o.text.as_str()), Some("Paris"));
    }
}
