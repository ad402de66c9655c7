//! The `drillbook inspect` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use drillbook_core::model::{QuestionBank, QuestionType};
use drillbook_core::statistics::TypeCounts;
use drillbook_sheets::load_banks;

use crate::config::load_config_from;

pub fn execute(path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = match path {
        Some(p) => config.resolve_bank(&p)?,
        None => config.data_dir.clone(),
    };

    let banks = load_banks(&path, &config.classifier())?;
    if banks.is_empty() {
        println!("No question banks found in {}", path.display());
        return Ok(());
    }

    for bank in &banks {
        print_bank(bank);
    }

    Ok(())
}

fn print_bank(bank: &QuestionBank) {
    println!("Bank: {} ({} questions)", bank.id, bank.len());
    if bank.skipped_rows > 0 {
        println!("  {} row(s) skipped", bank.skipped_rows);
    }

    let mut table = Table::new();
    let mut header = vec!["Sheet".to_string()];
    header.extend(QuestionType::ALL.iter().map(|t| t.display_name().to_string()));
    header.push("Total".to_string());
    table.set_header(header);

    for (sheet, counts) in &bank.stats.sheets {
        table.add_row(counts_row(sheet, counts));
    }
    if bank.stats.sheets.len() > 1 {
        table.add_row(counts_row("All sheets", &bank.stats.overall()));
    }

    println!("{table}\n");
}

fn counts_row(name: &str, counts: &TypeCounts) -> Vec<Cell> {
    let mut row = vec![Cell::new(name)];
    row.extend(QuestionType::ALL.iter().map(|t| Cell::new(counts.get(*t))));
    row.push(Cell::new(counts.total()));
    row
}
