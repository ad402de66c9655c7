use std::path::Path;

use drillbook_core::classify::Classifier;
use drillbook_core::model::QuestionType;
use drillbook_sheets::{load_bank, load_banks, read_workbook};

/// Two sheets: a question sheet with one blank-question row and a numeric
/// answer, and a notes sheet with no question column.
fn write_quiz_workbook(path: &Path) {
    let mut book = umya_spreadsheet::new_file();

    let questions = book.get_sheet_mut(&0).unwrap();
    questions.set_name("题库");
    for (cell, value) in [("A1", "题目"), ("B1", "选项"), ("C1", "答案"), ("D1", "解析")] {
        questions.get_cell_mut(cell).set_value(value);
    }
    questions.get_cell_mut("A2").set_value("法国的首都是？");
    questions.get_cell_mut("B2").set_value("A. 巴黎\nB. 伦敦\nC. 罗马");
    questions.get_cell_mut("C2").set_value("A");
    questions.get_cell_mut("D2").set_value("巴黎自987年起为首都。");
    questions.get_cell_mut("C3").set_value("B");
    questions.get_cell_mut("A4").set_value("6 × 7 = ____");
    questions.get_cell_mut("C4").set_value_number(42.0);
    questions.get_cell_mut("A5").set_value("下列说法是否正确：太阳从东方升起");
    questions.get_cell_mut("C5").set_value("对");

    let notes = book.new_sheet("备注").unwrap();
    notes.get_cell_mut("A1").set_value("备注");
    notes.get_cell_mut("B1").set_value("作者");
    notes.get_cell_mut("A2").set_value("draft");
    notes.get_cell_mut("B2").set_value("李老师");

    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

#[test]
fn read_workbook_flattens_every_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz.xlsx");
    write_quiz_workbook(&path);

    let sheets = read_workbook(&path).unwrap();
    let names: Vec<_> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["题库", "备注"]);

    let questions = &sheets[0];
    assert_eq!(questions.headers, vec!["题目", "选项", "答案", "解析"]);
    assert_eq!(questions.rows.len(), 4);
    assert_eq!(questions.rows[1][0], "");
    assert_eq!(questions.rows[2][2], "42");

    assert_eq!(sheets[1].headers, vec!["备注", "作者"]);
}

#[test]
fn load_bank_from_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz.xlsx");
    write_quiz_workbook(&path);

    let bank = load_bank(&path, &Classifier::default()).unwrap();
    assert_eq!(bank.id, "quiz");
    assert_eq!(bank.len(), 3);
    assert_eq!(bank.skipped_rows, 1);

    let ids: Vec<_> = bank.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["题库_2", "题库_4", "题库_5"]);
    let rows: Vec<_> = bank.questions.iter().map(|q| q.row_index).collect();
    assert_eq!(rows, vec![2, 4, 5]);

    let choice = &bank.questions[0];
    assert_eq!(choice.question_type, QuestionType::SingleChoice);
    assert_eq!(choice.options.len(), 3);
    assert_eq!(choice.options[1].text, "伦敦");
    assert_eq!(choice.explanation, "巴黎自987年起为首都。");

    let fill = &bank.questions[1];
    assert_eq!(fill.question_type, QuestionType::FillBlank);
    assert_eq!(fill.correct_answer_raw, "42");

    assert_eq!(bank.questions[2].question_type, QuestionType::TrueFalse);

    let sheet = bank.stats.sheet("题库").unwrap();
    assert_eq!(sheet.total(), 3);
    assert!(bank.stats.sheet("备注").is_none());
}

#[test]
fn workbooks_load_alongside_toml_banks() {
    let dir = tempfile::tempdir().unwrap();
    write_quiz_workbook(&dir.path().join("quiz.xlsx"));
    std::fs::write(
        dir.path().join("arith.toml"),
        "[[questions]]\nquestion = \"1 + 1 = ____\"\nanswer = \"2\"\n",
    )
    .unwrap();

    let banks = load_banks(dir.path(), &Classifier::default()).unwrap();
    let ids: Vec<_> = banks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["arith", "quiz"]);
}
