//! The `drillbook grade` command: grade one answer without a session.

use std::path::PathBuf;

use anyhow::Result;

use super::load_one_bank;
use crate::config::load_config_from;

pub fn execute(
    bank: PathBuf,
    question_number: usize,
    answer: String,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_one_bank(&config, &bank)?;

    let question = question_number
        .checked_sub(1)
        .and_then(|i| bank.get(i))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "question {question_number} is out of range (bank has {} questions)",
                bank.len()
            )
        })?;

    let assessment = config.grader().assess(&answer, question);

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    let verdict = if assessment.correct {
        "correct"
    } else {
        "incorrect"
    };
    println!("{} ({}): {verdict}", question.id, question.question_type.display_name());
    if let Some(similarity) = assessment.similarity {
        println!("similarity: {similarity:.2}");
    }
    if !assessment.correct {
        println!("expected: {}", question.correct_answer_raw);
    }
    Ok(())
}
