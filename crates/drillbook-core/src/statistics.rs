//! Detection and practice statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::QuestionType;

/// Number of questions per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub true_false: usize,
    pub single_choice: usize,
    pub fill_blank: usize,
    pub short_answer: usize,
}

impl TypeCounts {
    pub fn record(&mut self, question_type: QuestionType) {
        *self.slot(question_type) += 1;
    }

    pub fn get(&self, question_type: QuestionType) -> usize {
        match question_type {
            QuestionType::TrueFalse => self.true_false,
            QuestionType::SingleChoice => self.single_choice,
            QuestionType::FillBlank => self.fill_blank,
            QuestionType::ShortAnswer => self.short_answer,
        }
    }

    pub fn total(&self) -> usize {
        self.true_false + self.single_choice + self.fill_blank + self.short_answer
    }

    /// Types with at least one question, in display order.
    pub fn present(&self) -> Vec<QuestionType> {
        QuestionType::ALL
            .into_iter()
            .filter(|t| self.get(*t) > 0)
            .collect()
    }

    fn slot(&mut self, question_type: QuestionType) -> &mut usize {
        match question_type {
            QuestionType::TrueFalse => &mut self.true_false,
            QuestionType::SingleChoice => &mut self.single_choice,
            QuestionType::FillBlank => &mut self.fill_blank,
            QuestionType::ShortAnswer => &mut self.short_answer,
        }
    }
}

impl std::ops::AddAssign for TypeCounts {
    fn add_assign(&mut self, other: Self) {
        self.true_false += other.true_false;
        self.single_choice += other.single_choice;
        self.fill_blank += other.fill_blank;
        self.short_answer += other.short_answer;
    }
}

/// Detected question types, per source sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    pub sheets: BTreeMap<String, TypeCounts>,
}

impl DetectionStats {
    pub fn record(&mut self, sheet: &str, question_type: QuestionType) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .record(question_type);
    }

    pub fn sheet(&self, name: &str) -> Option<&TypeCounts> {
        self.sheets.get(name)
    }

    /// Counts summed over every sheet.
    pub fn overall(&self) -> TypeCounts {
        let mut total = TypeCounts::default();
        for counts in self.sheets.values() {
            total += *counts;
        }
        total
    }
}

/// Percentage of correct answers among answered ones; 0 when nothing was answered.
pub fn accuracy_percent(correct: usize, answered: usize) -> f64 {
    if answered == 0 {
        0.0
    } else {
        correct as f64 / answered as f64 * 100.0
    }
}
