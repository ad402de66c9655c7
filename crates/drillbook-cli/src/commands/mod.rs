pub mod grade;
pub mod init;
pub mod inspect;
pub mod practice;
pub mod reset;
pub mod review;
pub mod validate;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;

use drillbook_core::model::{Question, QuestionBank, QuestionType};
use drillbook_sheets::load_bank;

use crate::config::DrillbookConfig;

/// Load the single bank a practice-style command works on.
fn load_one_bank(config: &DrillbookConfig, bank: &Path) -> Result<QuestionBank> {
    let path = config.resolve_bank(bank)?;
    anyhow::ensure!(
        !path.is_dir(),
        "{} is a directory; pass a single bank file",
        path.display()
    );
    let bank = load_bank(&path, &config.classifier())?;
    anyhow::ensure!(!bank.is_empty(), "no questions found in {}", path.display());
    Ok(bank)
}

/// Print a question with its options.
fn render_question<W: Write>(out: &mut W, heading: &str, question: &Question) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{heading} ({}) {}",
        question.question_type.display_name(),
        question.id
    )?;
    writeln!(out, "{}", question.text)?;
    for option in &question.options {
        writeln!(out, "  {option}")?;
    }
    if question.question_type == QuestionType::TrueFalse {
        writeln!(out, "  (answer 对/错 or true/false)")?;
    }
    Ok(())
}

/// Print the reference answer and explanation.
fn render_answer<W: Write>(out: &mut W, question: &Question) -> Result<()> {
    writeln!(out, "Answer: {}", question.correct_answer_raw)?;
    if !question.explanation.is_empty() {
        writeln!(out, "Explanation: {}", question.explanation)?;
    }
    Ok(())
}

/// Prompt and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
