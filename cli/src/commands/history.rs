//! History listing and clearing

use crate::config::CliConfigLoader;
use crate::output::Reporter;
use anyhow::{Context, Result};
use clap::Subcommand;
use dialoguer::Confirm;
use integra_core::present::PlainTextTypesetter;
use integra_core::{HistoryStore, JsonFileHistoryStore};
use tracing::debug;

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// List past calculations, most recent first
    List {
        /// Print the stored entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every entry
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Default for HistoryAction {
    fn default() -> Self {
        HistoryAction::List { json: false }
    }
}

pub async fn history_command(action: HistoryAction, config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    debug!("History file: {}", config.history_path.display());

    let store = JsonFileHistoryStore::new(&config.history_path, config.history_capacity);
    let history = store.load().await.context("Failed to load history")?;
    let reporter = Reporter::default();

    match action {
        HistoryAction::List { json: true } => {
            println!("{}", serde_json::to_string_pretty(&history.to_vec())?);
        }
        HistoryAction::List { json: false } => {
            reporter.history(&history, &PlainTextTypesetter);
        }
        HistoryAction::Clear { yes } => {
            if history.is_empty() {
                reporter.info("History is already empty.");
                return Ok(());
            }

            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("Clear {} history entries?", history.len()))
                    .default(false)
                    .interact()
                    .context("Confirmation needs a terminal, pass --yes to skip it")?;

            if confirmed {
                store.clear().await.context("Failed to clear history")?;
                reporter.success("History cleared.");
            }
        }
    }

    Ok(())
}
