//! Interactive mode command

use crate::interactive::app::run_interactive;
use anyhow::Result;
use tracing::debug;

/// Start interactive mode
pub async fn interactive_command(config_loader: crate::config::CliConfigLoader) -> Result<()> {
    // Load client configuration
    let config = config_loader.load().await?;
    debug!("Using endpoint: {}", config.endpoint_url());
    debug!("History file: {}", config.history_path.display());

    run_interactive(config).await
}
