//! # integra CLI
//!
//! Terminal client for a symbolic integral calculation service.
//!
//! ## Usage
//!
//! - `integra` - Start the interactive calculator
//! - `integra solve "x^2"` - Solve a single integral and print the result
//! - `integra history` - List or clear past calculations
//!
//! The interactive mode is a keypad-driven terminal UI powered by iocraft.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod interactive;
mod output;

use commands::{history_command, interactive_command, solve_command, HistoryAction, SolveArgs};
use config::CliConfigLoader;

/// integra - solve integrals step by step from the terminal
#[derive(Parser)]
#[command(name = "integra")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Solve definite and indefinite integrals step by step")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Calculation service base URL
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Plot range as min,max
    #[arg(long, global = true, allow_hyphen_values = true)]
    graph_range: Option<String>,

    /// Plot the antiderivative F(x) instead of f(x)
    #[arg(long, global = true)]
    dual_graph: bool,

    /// History file location
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one integral and print the result
    Solve(SolveArgs),

    /// Show or clear the calculation history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(server_url) = &cli.server_url {
        loader = loader.with_server_url_override(server_url.clone());
    }

    if let Some(graph_range) = &cli.graph_range {
        loader = loader.with_graph_range_override(graph_range.clone());
    }

    if cli.dual_graph {
        loader = loader.with_dual_graph_override(true);
    }

    if let Some(history_file) = &cli.history_file {
        loader = loader.with_history_file_override(history_file.clone());
    }

    loader
}

/// Log file used while the terminal UI owns the screen
fn tui_log_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("integra");
    path.push("integra.log");
    path
}

fn init_tracing(verbose: bool, interactive: bool) {
    // Initialize tracing
    let filter = if verbose { "debug" } else { "info" };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter));

    if interactive {
        let path = tui_log_path();
        let file = path
            .parent()
            .map(std::fs::create_dir_all)
            .transpose()
            .and_then(|_| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
            });
        match file {
            Ok(file) => builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init(),
            // Without a log file stay silent rather than draw over the UI
            Err(_) => builder.with_writer(std::io::sink).init(),
        }
    } else {
        builder.with_writer(std::io::stderr).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.command.is_none());

    // Build configuration loader
    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Solve(args)) => solve_command(args, config_loader).await,
        Some(Commands::History { action }) => {
            history_command(action.unwrap_or_default(), config_loader).await
        }
        // Default to interactive mode
        None => interactive_command(config_loader).await,
    }
}
