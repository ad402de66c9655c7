//! Question bank assembly.
//!
//! The spreadsheet reader hands over plain [`Sheet`]s of string cells.
//! Header names are resolved once per sheet into a [`HeaderMap`]; every
//! row is then read positionally into a [`RawRow`] and turned into a
//! [`Question`] by [`build_question`].

use crate::classify::Classifier;
use crate::error::BuildError;
use crate::model::{ChoiceOption, Question, QuestionBank, QuestionType, OPTION_LABELS};
use crate::normalize::normalize;
use crate::options::{options_to_text, parse_options};

/// A sheet of string cells, as produced by the spreadsheet reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    /// Data rows, without the header row.
    pub rows: Vec<Vec<String>>,
}

/// The cells of one question row, already located by header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Sheet name.
    pub source: String,
    /// 1-based row number in the sheet (the header is row 1).
    pub row_index: usize,
    pub question: String,
    pub answer: String,
    /// A single cell holding every option.
    pub options_cell: Option<String>,
    /// Separate A-D option cells, used when `options_cell` is blank.
    pub discrete_options: [Option<String>; 4],
    pub explicit_type: Option<String>,
    pub explanation: Option<String>,
}

/// Column positions for one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub question: usize,
    pub answer: usize,
    pub options: Option<usize>,
    pub question_type: Option<usize>,
    pub explanation: Option<usize>,
    pub discrete_options: [Option<usize>; 4],
}

const QUESTION_EXACT: &[&str] = &["题目", "question"];
const ANSWER_EXACT: &[&str] = &["正确答案", "答案", "answer"];
const OPTIONS_EXACT: &[&str] = &["选项", "options"];
const TYPE_EXACT: &[&str] = &["题型", "type", "question_type"];
const EXPLANATION_EXACT: &[&str] = &["解析", "explanation"];

impl HeaderMap {
    /// Locate the columns of a sheet by header name.
    ///
    /// Exact names are tried first for every field; the question and answer
    /// columns then fall back to a substring match on columns nobody else
    /// claimed. Returns `None` if either the question or the answer column
    /// cannot be found.
    pub fn resolve(headers: &[String]) -> Option<HeaderMap> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let exact = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));

        let options = exact(OPTIONS_EXACT);
        let question_type = exact(TYPE_EXACT);
        let explanation = exact(EXPLANATION_EXACT);
        let mut discrete_options = [None; 4];
        for (slot, label) in discrete_options.iter_mut().zip(OPTION_LABELS) {
            let lower = label.to_lowercase();
            let aliases = [
                lower.clone(),
                format!("选项{lower}"),
                format!("{lower}选项"),
                format!("选项 {lower}"),
                format!("option {lower}"),
                format!("option{lower}"),
            ];
            *slot = names.iter().position(|n| aliases.contains(n));
        }

        let mut claimed: Vec<usize> = [options, question_type, explanation]
            .into_iter()
            .chain(discrete_options)
            .flatten()
            .collect();

        let question = exact(QUESTION_EXACT)
            .filter(|i| !claimed.contains(i))
            .or_else(|| {
                names.iter().enumerate().position(|(i, n)| {
                    !claimed.contains(&i) && (n.contains("题目") || n.contains("question"))
                })
            })?;
        claimed.push(question);

        let answer = exact(ANSWER_EXACT)
            .filter(|i| !claimed.contains(i))
            .or_else(|| {
                names.iter().enumerate().position(|(i, n)| {
                    !claimed.contains(&i) && (n.contains("答案") || n.contains("answer"))
                })
            })?;

        Some(HeaderMap {
            question,
            answer,
            options,
            question_type,
            explanation,
            discrete_options,
        })
    }

    /// Read one data row positionally.
    ///
    /// `data_index` is the 0-based index among data rows; the recorded row
    /// number accounts for the header row.
    pub fn read_row(&self, source: &str, data_index: usize, cells: &[String]) -> RawRow {
        let cell = |i: usize| cells.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
        let optional = |i: Option<usize>| i.map(&cell).filter(|c| !c.is_empty());

        RawRow {
            source: source.to_string(),
            row_index: data_index + 2,
            question: cell(self.question),
            answer: cell(self.answer),
            options_cell: optional(self.options),
            discrete_options: self.discrete_options.map(&optional),
            explicit_type: optional(self.question_type),
            explanation: optional(self.explanation),
        }
    }
}

/// Build a question from one row.
pub fn build_question(
    row: &RawRow,
    original_index: usize,
    classifier: &Classifier,
) -> Result<Question, BuildError> {
    let text = row.question.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Err(BuildError::MissingQuestion {
            sheet: row.source.clone(),
            row_index: row.row_index,
        });
    }

    let answer = row.answer.trim();

    let mut options = match row.options_cell.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(cell) => parse_options(cell),
        None => row
            .discrete_options
            .iter()
            .zip(OPTION_LABELS)
            .filter_map(|(cell, label)| {
                let text = cell.as_deref()?.trim();
                (!text.is_empty()).then(|| ChoiceOption::new(label, text))
            })
            .collect(),
    };

    let options_text = options_to_text(&options);
    let explicit_type = row
        .explicit_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let question_type = classifier.classify(text, answer, &options_text, explicit_type);

    if question_type != QuestionType::SingleChoice {
        options.clear();
    }

    tracing::debug!(
        "{}:{} classified as {question_type} ({} options)",
        row.source,
        row.row_index,
        options.len()
    );

    Ok(Question {
        id: Question::make_id(&row.source, row.row_index),
        original_index,
        text: text.to_string(),
        question_type,
        options,
        correct_answer_raw: answer.to_string(),
        correct_answer_normalized: normalize(answer),
        explanation: row
            .explanation
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        source: row.source.clone(),
        row_index: row.row_index,
    })
}

/// Incrementally assembles a [`QuestionBank`].
pub struct BankBuilder<'a> {
    classifier: &'a Classifier,
    bank: QuestionBank,
}

impl<'a> BankBuilder<'a> {
    pub fn new(id: impl Into<String>, classifier: &'a Classifier) -> Self {
        Self {
            classifier,
            bank: QuestionBank::new(id),
        }
    }

    /// Add every usable row of a sheet. Returns the number of questions added.
    ///
    /// Empty sheets and sheets without question/answer columns are skipped
    /// with a warning.
    pub fn add_sheet(&mut self, sheet: &Sheet) -> usize {
        if sheet.rows.is_empty() {
            tracing::debug!("sheet '{}' is empty, skipping", sheet.name);
            return 0;
        }

        let Some(header_map) = HeaderMap::resolve(&sheet.headers) else {
            tracing::warn!(
                "sheet '{}' has no question or answer column, skipping",
                sheet.name
            );
            return 0;
        };

        let rows: Vec<RawRow> = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(i, cells)| header_map.read_row(&sheet.name, i, cells))
            .collect();
        self.add_rows(&rows)
    }

    /// Add pre-located rows. Malformed rows are counted and skipped.
    pub fn add_rows(&mut self, rows: &[RawRow]) -> usize {
        let mut added = 0;
        for row in rows {
            match build_question(row, self.bank.questions.len(), self.classifier) {
                Ok(question) => {
                    self.bank
                        .stats
                        .record(&question.source, question.question_type);
                    self.bank.questions.push(question);
                    added += 1;
                }
                Err(e) => {
                    tracing::debug!("skipping row: {e}");
                    self.bank.skipped_rows += 1;
                }
            }
        }
        added
    }

    pub fn finish(self) -> QuestionBank {
        self.bank
    }
}

/// Build a bank from a set of sheets.
pub fn build_bank(
    id: impl Into<String>,
    sheets: &[Sheet],
    classifier: &Classifier,
) -> QuestionBank {
    let mut builder = BankBuilder::new(id, classifier);
    for sheet in sheets {
        builder.add_sheet(sheet);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_exact_headers() {
        let map = HeaderMap::resolve(&headers(&["题目", "选项", "正确答案", "题型", "解析"])).unwrap();
        assert_eq!(map.question, 0);
        assert_eq!(map.answer, 2);
        assert_eq!(map.options, Some(1));
        assert_eq!(map.question_type, Some(3));
        assert_eq!(map.explanation, Some(4));
    }

    #[test]
    fn resolve_fuzzy_headers() {
        let map = HeaderMap::resolve(&headers(&["序号", "Question Text", "Correct Answer"])).unwrap();
        assert_eq!(map.question, 1);
        assert_eq!(map.answer, 2);
        assert_eq!(map.options, None);
    }

    #[test]
    fn fuzzy_question_does_not_steal_type_column() {
        let map =
            HeaderMap::resolve(&headers(&["question_type", "Question Body", "Answer"])).unwrap();
        assert_eq!(map.question_type, Some(0));
        assert_eq!(map.question, 1);
    }

    #[test]
    fn resolve_discrete_option_columns() {
        let map = HeaderMap::resolve(&headers(&[
            "题目", "A", "选项B", "C选项", "Option D", "答案",
        ]))
        .unwrap();
        assert_eq!(map.discrete_options, [Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(map.answer, 5);
    }

    #[test]
    fn resolve_requires_question_and_answer() {
        assert!(HeaderMap::resolve(&headers(&["题目", "备注"])).is_none());
        assert!(HeaderMap::resolve(&headers(&["name", "answer"])).is_none());
    }

    #[test]
    fn read_row_records_sheet_row_number() {
        let map = HeaderMap::resolve(&headers(&["question", "answer"])).unwrap();
        let raw = map.read_row("Sheet1", 0, &row(&[" What? ", "42"]));
        assert_eq!(raw.row_index, 2);
        assert_eq!(raw.question, "What?");
        assert_eq!(raw.options_cell, None);
    }

    #[test]
    fn build_single_choice_from_discrete_columns() {
        let raw = RawRow {
            source: "S".into(),
            row_index: 3,
            question: "Largest planet?".into(),
            answer: "B".into(),
            discrete_options: [
                Some("Mars".into()),
                Some("Jupiter".into()),
                None,
                Some("Venus".into()),
            ],
            ..RawRow::default()
        };
        let q = build_question(&raw, 7, &Classifier::default()).unwrap();
        assert_eq!(q.id, "S_3");
        assert_eq!(q.original_index, 7);
        assert_eq!(q.question_type, QuestionType::SingleChoice);
        let labels: Vec<&str> = q.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "D"]);
        assert_eq!(q.correct_answer_normalized, "B");
    }

    #[test]
    fn options_dropped_for_non_choice_questions() {
        let raw = RawRow {
            source: "S".into(),
            row_index: 2,
            question: "水的化学式是____".into(),
            answer: "H2O".into(),
            options_cell: Some("A. H2O\nB. CO2".into()),
            ..RawRow::default()
        };
        let q = build_question(&raw, 0, &Classifier::default()).unwrap();
        assert_eq!(q.question_type, QuestionType::FillBlank);
        assert!(q.options.is_empty());
    }

    #[test]
    fn explicit_type_is_honoured() {
        let raw = RawRow {
            source: "S".into(),
            row_index: 2,
            question: "2+2".into(),
            answer: "4".into(),
            explicit_type: Some(" 简答 ".into()),
            explanation: Some(" arithmetic ".into()),
            ..RawRow::default()
        };
        let q = build_question(&raw, 0, &Classifier::default()).unwrap();
        assert_eq!(q.question_type, QuestionType::ShortAnswer);
        assert_eq!(q.explanation, "arithmetic");
    }

    #[test]
    fn blank_question_is_rejected() {
        for text in ["", "   ", "nan", "NaN"] {
            let raw = RawRow {
                source: "S".into(),
                row_index: 4,
                question: text.into(),
                answer: "x".into(),
                ..RawRow::default()
            };
            assert_eq!(
                build_question(&raw, 0, &Classifier::default()),
                Err(BuildError::MissingQuestion {
                    sheet: "S".into(),
                    row_index: 4
                })
            );
        }
    }

    #[test]
    fn build_bank_skips_bad_sheets_and_rows() {
        let good = Sheet {
            name: "Geo".into(),
            headers: headers(&["题目", "选项", "答案"]),
            rows: vec![
                row(&["Capital of France?", "A. Paris\nB. London\nC. Rome", "A"]),
                row(&["", "", "B"]),
                row(&["下列说法中，对的请填✅，错的请填❌", "", "✅"]),
            ],
        };
        let headerless = Sheet {
            name: "Notes".into(),
            headers: headers(&["note"]),
            rows: vec![row(&["hello"])],
        };
        let empty = Sheet {
            name: "Empty".into(),
            headers: headers(&["题目", "答案"]),
            rows: vec![],
        };

        let bank = build_bank("geo", &[good, headerless, empty], &Classifier::default());
        assert_eq!(bank.id, "geo");
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.skipped_rows, 1);
        assert_eq!(bank.questions[1].original_index, 1);
        assert_eq!(bank.questions[1].row_index, 4);
        assert_eq!(bank.questions[1].question_type, QuestionType::TrueFalse);

        let geo = bank.stats.sheet("Geo").unwrap();
        assert_eq!(geo.total(), 2);
        assert_eq!(geo.get(QuestionType::SingleChoice), 1);
        assert_eq!(geo.get(QuestionType::TrueFalse), 1);
        assert!(bank.stats.sheet("Notes").is_none());
    }
}
