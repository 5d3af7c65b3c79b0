// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! fixdesk - resolve machine error logs with an assistant.
//!
//! This is the binary entry point.

mod commands;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use fixdesk_config::FixdeskConfig;
use fixdesk_core::types::{ConversationId, LogId};

/// fixdesk - resolve machine error logs with an assistant.
#[derive(Parser, Debug)]
#[command(name = "fixdesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat about an error in an existing conversation.
    Chat {
        /// Conversation id.
        conversation_id: i64,
    },
    /// Open (or create) the conversation for an error log and chat in it.
    Open {
        /// Log id from `fixdesk logs`.
        log_id: i64,
    },
    /// List processed error logs.
    Logs {
        /// Only logs from this machine.
        #[arg(long)]
        machine: Option<String>,
        /// Only resolved (`true`) or unresolved (`false`) logs.
        #[arg(long)]
        resolved: Option<bool>,
    },
    /// Check that the backend and assistant services are reachable.
    Check,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => fixdesk_config::load_and_validate_path(path),
        None => fixdesk_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            fixdesk_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Commands::Chat { conversation_id } => {
            shell::run_chat(&config, ConversationId(conversation_id)).await
        }
        Commands::Open { log_id } => shell::run_open(&config, LogId(log_id)).await,
        Commands::Logs { machine, resolved } => {
            commands::run_logs(&config, machine, resolved).await
        }
        Commands::Check => commands::run_check(&config).await,
        Commands::Config => print_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &FixdeskConfig) -> Result<(), fixdesk_core::FixdeskError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| fixdesk_core::FixdeskError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fixdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
