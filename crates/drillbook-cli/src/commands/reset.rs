//! The `drillbook reset` command.

use std::path::PathBuf;

use anyhow::Result;

use super::load_one_bank;
use crate::config::load_config_from;

pub fn execute(bank: PathBuf, notebook: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_one_bank(&config, &bank)?;

    if config.progress_store().clear(&bank.id)? {
        println!("Cleared saved progress for '{}'.", bank.id);
    } else {
        println!("No saved progress for '{}'.", bank.id);
    }

    if notebook {
        if config.notebook_store().clear(&bank.id)? {
            println!("Cleared wrong-question notebook for '{}'.", bank.id);
        } else {
            println!("No wrong-question notebook for '{}'.", bank.id);
        }
    }

    Ok(())
}
