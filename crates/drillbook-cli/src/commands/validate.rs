//! The `drillbook validate` command.

use std::path::PathBuf;

use anyhow::Result;

use drillbook_core::parser::validate_bank;
use drillbook_sheets::load_banks;

use crate::config::load_config_from;

pub fn execute(path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = match path {
        Some(p) => config.resolve_bank(&p)?,
        None => config.data_dir.clone(),
    };

    let banks = load_banks(&path, &config.classifier())?;

    let mut total_warnings = 0;

    for bank in &banks {
        println!("Bank: {} ({} questions)", bank.id, bank.len());

        let warnings = validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
