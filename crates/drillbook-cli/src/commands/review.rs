//! The `drillbook review` command: work through the wrong-question notebook.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};

use drillbook_core::model::QuestionBank;
use drillbook_core::notebook::WrongNotebook;

use super::{load_one_bank, prompt, render_answer, render_question};
use crate::config::{load_config_from, DrillbookConfig};

/// What `review` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Interactive,
    Stats,
    Purge,
}

pub fn execute(bank: PathBuf, action: ReviewAction, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_one_bank(&config, &bank)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&config, &bank, action, &mut stdin.lock(), &mut stdout.lock())
}

pub fn run<R: BufRead, W: Write>(
    config: &DrillbookConfig,
    bank: &QuestionBank,
    action: ReviewAction,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let store = config.notebook_store();
    let mut notebook = store.load(&bank.id)?;

    match action {
        ReviewAction::Stats => print_stats(out, &notebook)?,
        ReviewAction::Purge => {
            let removed = notebook.purge_mastered();
            store.save(&notebook)?;
            writeln!(out, "Removed {removed} mastered question(s).")?;
        }
        ReviewAction::Interactive => {
            if notebook.pending().next().is_none() {
                writeln!(out, "Nothing to review for '{}'.", bank.id)?;
                return Ok(());
            }
            review(config, bank, &mut notebook, input, out)?;
            store.save(&notebook)?;
            print_stats(out, &notebook)?;
        }
    }
    Ok(())
}

fn review<R: BufRead, W: Write>(
    config: &DrillbookConfig,
    bank: &QuestionBank,
    notebook: &mut WrongNotebook,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let grader = config.grader();
    let pending: Vec<String> = notebook.pending().map(|r| r.question_id.clone()).collect();
    let total = pending.len();

    for (i, question_id) in pending.iter().enumerate() {
        let Some(record) = notebook.get(question_id) else {
            continue;
        };
        // Prefer the bank's current wording when the question still exists.
        let question = bank
            .find(question_id)
            .cloned()
            .unwrap_or_else(|| record.question.clone());
        let heading = format!(
            "[{}/{}] missed {} time(s)",
            i + 1,
            total,
            record.history.iter().filter(|a| !a.correct).count()
        );
        render_question(out, &heading, &question)?;
        writeln!(out, "Last answer: {}", record.last_answer)?;

        let Some(line) = prompt(input, out, "> ")? else {
            break;
        };
        match line.as_str() {
            ":quit" | ":q" => break,
            ":skip" | ":s" | "" => continue,
            _ => {}
        }

        let correct = grader.grade(&line, &question);
        notebook.record_submission(&question, &line, correct, Utc::now());
        if !correct {
            writeln!(out, "Incorrect.")?;
            render_answer(out, &question)?;
            continue;
        }

        writeln!(out, "Correct!")?;
        let Some(confirm) = prompt(input, out, "Mark as mastered? [y/N] ")? else {
            break;
        };
        if matches!(confirm.to_lowercase().as_str(), "y" | "yes") {
            notebook.mark_mastered(question_id)?;
            writeln!(out, "Marked as mastered.")?;
        }
    }
    Ok(())
}

fn print_stats<W: Write>(out: &mut W, notebook: &WrongNotebook) -> Result<()> {
    let stats = notebook.stats();
    let mut table = Table::new();
    table.set_header(vec!["Bank", "Wrong questions", "Not reviewed"]);
    table.add_row(vec![
        Cell::new(&notebook.bank_id),
        Cell::new(stats.total),
        Cell::new(stats.not_reviewed),
    ]);
    writeln!(out, "{table}")?;
    Ok(())
}
