//! Question-type detection.
//!
//! When a bank does not declare a question's type, it is inferred from the
//! prompt, the recorded answer and the options text. Detection is a pure
//! function of its inputs and always lands on one of the four types.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::QuestionType;
use crate::normalize::{is_boolean_token, normalize};

/// Options text shorter than this (in characters) counts as "no real option list".
const SHORT_OPTIONS_CHARS: usize = 20;

/// Longest answer (in characters) still treated as a fill-in answer.
pub const FILL_BLANK_MAX_CHARS: usize = 30;

static SINGLE_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Da-d]$").unwrap());

static CHOICE_LINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[A-Da-d][\.．、:：]\s*[^\s]+",
        r"选项[ABCDabcd][\.．、:：]?\s*[^\s]+",
        r"[①②③④][\.．、:：]\s*[^\s]+",
        r"[1-4][\.．、:：]\s*[^\s]+",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TRAILING_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:（\s*）|\(\s*\))\s*[。.]?$").unwrap());

static BLANK_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}|\(\s*\)|（\s*）|【\s*】|\[\s*\]|……|\.{3,}|---").unwrap());

/// Keyword vocabularies used by detection.
///
/// Matching is a case-insensitive substring test against the question text.
/// The defaults carry the Chinese phrases banks are usually authored with
/// plus English equivalents; a config file may replace any list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// Phrases marking a true/false judgment question.
    pub judgment: Vec<String>,
    /// Phrases marking a choice question.
    pub choice: Vec<String>,
    /// Phrases marking a fill-in question.
    pub fill: Vec<String>,
    /// Phrases marking an essay-style question.
    pub essay: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            judgment: owned(&[
                "是否正确",
                "是对是错",
                "判断正误",
                "判断对错",
                "下列说法是否正确",
                "请判断",
                "判断下列说法",
                "正误",
                "对的请填",
                "错的请填",
                "true or false",
                "judge whether",
                "correct or incorrect",
            ]),
            choice: owned(&[
                "下列",
                "选择",
                "哪",
                "哪些",
                "正确的是",
                "不正确的是",
                "选项",
                "最符合",
                "which of the following",
                "choose",
                "select",
            ]),
            fill: owned(&["填空", "填写", "填入", "补充", "补全", "fill in"]),
            essay: owned(&[
                "简述",
                "论述",
                "说明",
                "阐述",
                "分析",
                "解释",
                "为什么",
                "如何",
                "怎样",
                "什么",
                "意义",
                "explain",
                "describe",
                "why",
                "how",
                "significance",
            ]),
        }
    }
}

fn contains_any(haystack_lower: &str, words: &[String]) -> bool {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .any(|w| haystack_lower.contains(&w.to_lowercase()))
}

/// Question-type classifier configured with a keyword vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: Keywords,
}

impl Classifier {
    pub fn new(keywords: Keywords) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Detect the type of a question.
    ///
    /// A recognized `explicit_type` label always wins. Otherwise the rules
    /// are evaluated in priority order (true/false, single choice, fill in,
    /// short answer) and the first match is returned.
    pub fn classify(
        &self,
        question_text: &str,
        correct_answer: &str,
        options_text: &str,
        explicit_type: Option<&str>,
    ) -> QuestionType {
        if let Some(declared) = explicit_type.and_then(QuestionType::from_label) {
            return declared;
        }

        let question = question_text.trim();
        let question_lower = question.to_lowercase();
        let answer = correct_answer.trim();
        let options = options_text.trim();
        let answer_chars = answer.chars().count();

        // 1. True/false
        let has_judgment_keyword = contains_any(&question_lower, &self.keywords.judgment);
        if is_boolean_token(&normalize(answer))
            && (has_judgment_keyword || options.chars().count() < SHORT_OPTIONS_CHARS)
        {
            return QuestionType::TrueFalse;
        }

        // 2. Single choice
        let answer_is_letter = SINGLE_LETTER.is_match(answer);
        let option_count = detected_option_count(options);
        let has_choice_keyword = contains_any(&question_lower, &self.keywords.choice);
        let has_trailing_placeholder = TRAILING_PLACEHOLDER.is_match(question);
        let looks_like_choice =
            option_count >= 2 || has_choice_keyword || has_trailing_placeholder;
        if answer_is_letter && looks_like_choice && option_count >= 2 {
            return QuestionType::SingleChoice;
        }

        // 3. Fill in the blank
        let is_short = (1..=FILL_BLANK_MAX_CHARS).contains(&answer_chars);
        if BLANK_MARKERS.is_match(question)
            || contains_any(&question_lower, &self.keywords.fill)
            || is_short
        {
            return QuestionType::FillBlank;
        }

        // 4. Short answer
        if contains_any(&question_lower, &self.keywords.essay)
            || answer_chars > FILL_BLANK_MAX_CHARS
        {
            return QuestionType::ShortAnswer;
        }

        // 5. Fallback
        if answer_is_letter && option_count >= 2 {
            QuestionType::SingleChoice
        } else if is_short {
            QuestionType::FillBlank
        } else {
            QuestionType::ShortAnswer
        }
    }
}

/// Number of choice lines found by the first pattern that matches at least twice.
pub fn detected_option_count(options_text: &str) -> usize {
    CHOICE_LINE_PATTERNS
        .iter()
        .map(|p| p.find_iter(options_text).count())
        .find(|&n| n >= 2)
        .unwrap_or(0)
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// Classify with the default keyword vocabulary.
pub fn classify(
    question_text: &str,
    correct_answer: &str,
    options_text: &str,
    explicit_type: Option<&str>,
) -> QuestionType {
    DEFAULT_CLASSIFIER.classify(question_text, correct_answer, options_text, explicit_type)
}
