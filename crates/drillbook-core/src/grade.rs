//! Answer grading.
//!
//! Compares a learner's input against a question's recorded answer using
//! type-specific rules. Grading is stateless: every call is a pure function
//! of the input, the question and the configured threshold.

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionType};
use crate::normalize::{choice_label, normalize};
use crate::similarity::{similarity_ratio, strip_for_comparison};

/// Minimum similarity for a short answer to count as correct.
pub const DEFAULT_SHORT_ANSWER_THRESHOLD: f64 = 0.70;

/// Detailed outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub correct: bool,
    /// Normalized learner input.
    pub user_normalized: String,
    /// Normalized reference answer.
    pub expected_normalized: String,
    /// Similarity ratio, only computed for short answers.
    #[serde(default)]
    pub similarity: Option<f64>,
}

impl Assessment {
    fn rejected() -> Self {
        Self {
            correct: false,
            user_normalized: String::new(),
            expected_normalized: String::new(),
            similarity: None,
        }
    }
}

/// Grades answers against questions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grader {
    short_answer_threshold: f64,
}

impl Default for Grader {
    fn default() -> Self {
        Self {
            short_answer_threshold: DEFAULT_SHORT_ANSWER_THRESHOLD,
        }
    }
}

impl Grader {
    /// Create a grader with a custom short-answer threshold, clamped to `[0, 1]`.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            short_answer_threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.short_answer_threshold
    }

    /// Returns `true` if `user_input` is a correct answer to `question`.
    pub fn grade(&self, user_input: &str, question: &Question) -> bool {
        self.assess(user_input, question).correct
    }

    /// Grade and report the intermediate values.
    pub fn assess(&self, user_input: &str, question: &Question) -> Assessment {
        self.assess_typed(user_input, question.question_type, &question.correct_answer_raw)
    }

    /// Grade against a type given as a free-form label.
    ///
    /// Labels that do not name one of the four question types earn no
    /// credit.
    pub fn assess_labeled(
        &self,
        user_input: &str,
        type_label: &str,
        correct_raw: &str,
    ) -> Assessment {
        match QuestionType::from_label(type_label) {
            Some(question_type) => self.assess_typed(user_input, question_type, correct_raw),
            None => {
                tracing::debug!("cannot grade unrecognized question type '{type_label}'");
                Assessment::rejected()
            }
        }
    }

    fn assess_typed(
        &self,
        user_input: &str,
        question_type: QuestionType,
        correct_raw: &str,
    ) -> Assessment {
        let user_input = user_input.trim();
        if user_input.is_empty() {
            return Assessment::rejected();
        }

        let user_normalized = normalize(user_input);
        let expected_normalized = normalize(correct_raw);
        let mut similarity = None;

        let correct = match question_type {
            QuestionType::TrueFalse | QuestionType::FillBlank => {
                user_normalized == expected_normalized
            }
            QuestionType::SingleChoice => {
                let mut expected_chars = expected_normalized.chars();
                match (choice_label(user_input), expected_chars.next(), expected_chars.next()) {
                    (Some(picked), Some(expected), None) if expected.is_alphabetic() => {
                        picked.eq_ignore_ascii_case(&expected)
                    }
                    _ => user_normalized == expected_normalized,
                }
            }
            QuestionType::ShortAnswer => {
                let user_clean = strip_for_comparison(user_input);
                let expected_clean = strip_for_comparison(correct_raw);
                if expected_clean.is_empty() {
                    false
                } else {
                    let ratio = similarity_ratio(&user_clean, &expected_clean);
                    similarity = Some(ratio);
                    ratio >= self.short_answer_threshold
                }
            }
        };

        Assessment {
            correct,
            user_normalized,
            expected_normalized,
            similarity,
        }
    }
}

/// Grade with the default threshold.
pub fn grade(user_input: &str, question: &Question) -> bool {
    Grader::default().grade(user_input, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_question;
    use crate::builder::RawRow;
    use crate::classify::Classifier;

    fn question(text: &str, answer: &str, options: &str) -> Question {
        let row = RawRow {
            source: "Sheet1".into(),
            row_index: 2,
            question: text.into(),
            answer: answer.into(),
            options_cell: Some(options.into()),
            ..RawRow::default()
        };
        build_question(&row, 0, &Classifier::default()).unwrap()
    }

    fn typed(question_type: QuestionType, answer: &str) -> Question {
        Question {
            id: "s_2".into(),
            original_index: 0,
            text: "q".into(),
            question_type,
            options: vec![],
            correct_answer_raw: answer.into(),
            correct_answer_normalized: normalize(answer),
            explanation: String::new(),
            source: "s".into(),
            row_index: 2,
        }
    }

    #[test]
    fn blank_input_is_always_wrong() {
        for t in QuestionType::ALL {
            let q = typed(t, "");
            assert!(!grade("", &q));
            assert!(!grade("   ", &q));
        }
        assert!(!grade(" ", &typed(QuestionType::TrueFalse, "对")));
    }

    #[test]
    fn true_false_synonyms() {
        let q = question("下列说法中，对的请填✅，错的请填❌", "✅", "");
        assert_eq!(q.question_type, QuestionType::TrueFalse);
        assert!(grade("对", &q));
        assert!(grade("yes", &q));
        assert!(grade("√", &q));
        assert!(!grade("错", &q));
        assert!(!grade("maybe", &q));
    }

    #[test]
    fn single_choice_scenario() {
        let q = question("Capital of France?", "A", "A. Paris\nB. London\nC. Rome");
        assert_eq!(q.question_type, QuestionType::SingleChoice);
        assert_eq!(q.options.len(), 3);
        assert!(grade("A. Paris", &q));
        assert!(grade("a", &q));
        assert!(grade("(A)", &q));
        assert!(!grade("C. Rome", &q));
        assert!(!grade("Paris", &q));
    }

    #[test]
    fn single_choice_label_is_case_insensitive() {
        let q = typed(QuestionType::SingleChoice, "B");
        assert!(grade("B. some option text", &q));
        assert!(grade("b", &q));
        assert!(!grade("c", &q));
    }

    #[test]
    fn single_choice_label_followed_by_any_punctuation() {
        let q = typed(QuestionType::SingleChoice, "B");
        assert!(grade("B，伦敦", &q));
        assert!(grade("B, London", &q));
        assert!(grade("B;", &q));
        assert!(!grade("Bangkok", &q));
    }

    #[test]
    fn single_choice_with_text_answer_compares_normalized() {
        let q = typed(QuestionType::SingleChoice, "London");
        assert!(grade(" London ", &q));
        assert!(!grade("B", &q));
    }

    #[test]
    fn fill_blank_is_exact() {
        let q = typed(QuestionType::FillBlank, "H2O");
        assert!(grade("H2O", &q));
        assert!(grade("  H2O ", &q));
        assert!(!grade("h2o", &q));
        assert!(!grade("H2O2", &q));
    }

    #[test]
    fn short_answer_ignores_punctuation_and_spaces() {
        let q = typed(QuestionType::ShortAnswer, "光合作用是植物利用光能合成有机物的过程");
        assert!(grade("光合作用，是植物 利用光能合成有机物的过程。", &q));
        let assessment = Grader::default().assess("光合作用是植物利用光能制造有机物", &q);
        assert!(assessment.correct);
        assert_eq!(assessment.similarity, Some(0.8));
        assert!(!grade("植物会呼吸", &q));
    }

    #[test]
    fn stricter_threshold() {
        let q = typed(QuestionType::ShortAnswer, "光合作用是植物利用光能合成有机物的过程");
        let strict = Grader::with_threshold(0.9);
        assert!(!strict.grade("光合作用是植物利用光能制造有机物", &q));
        assert!(strict.grade("光合作用是植物利用光能合成有机物的过程", &q));
        assert_eq!(Grader::with_threshold(3.0).threshold(), 1.0);
    }

    #[test]
    fn short_answer_without_reference_never_matches() {
        let q = typed(QuestionType::ShortAnswer, "。。。");
        assert!(!grade("。。。", &q));
    }

    #[test]
    fn unrecognized_type_label_is_no_credit() {
        let grader = Grader::default();
        assert!(!grader.assess_labeled("A", "多选", "A").correct);
        assert!(!grader.assess_labeled("A", "matching", "A").correct);
        assert!(grader.assess_labeled("A", "单选", "A").correct);
    }
}
