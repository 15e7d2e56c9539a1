use anyhow::{Result, bail};
use inquire::Confirm;
use std::io::{self, IsTerminal};

use crate::config::ConfigManager;
use crate::history::HistoryStore;
use crate::paths;
use crate::status;
use crate::translation::validate_target;
use crate::ui::{Style, display_history, handle_prompt_cancellation};

fn open_store() -> Result<HistoryStore> {
    let config = ConfigManager::new()?.load()?;
    Ok(HistoryStore::new(paths::history_file()?, config.max_history))
}

/// Prints up to `limit` recent translations, optionally only those involving `lang`.
pub fn run_history(limit: usize, lang: Option<&str>) -> Result<()> {
    let lang = lang.map(validate_target).transpose()?;
    let store = open_store()?;
    display_history(&store.list(limit, lang));
    Ok(())
}

/// Clears the history after confirmation (skipped with `yes`).
pub fn run_clear(yes: bool) -> Result<()> {
    handle_prompt_cancellation(|| {
        let store = open_store()?;
        if !yes {
            if !io::stdin().is_terminal() {
                bail!("Refusing to clear history without confirmation; pass --yes");
            }
            let confirmed = Confirm::new("Delete all translation history?")
                .with_default(false)
                .prompt()?;
            if !confirmed {
                status!("History kept.");
                return Ok(());
            }
        }
        store.clear()?;
        status!("{} History cleared", Style::success("✓"));
        Ok(())
    })
}
