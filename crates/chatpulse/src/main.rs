// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chatpulse - live chat analytics for a streaming channel.
//!
//! This is the binary entry point.

mod config_cmd;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chatpulse - live chat analytics for a streaming channel.
#[derive(Parser, Debug)]
#[command(name = "chatpulse", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Join a channel and log a periodic summary.
    Watch {
        /// Channel login, with or without a leading `#`.
        channel: String,
        /// Seconds between two summaries.
        #[arg(long, default_value_t = 10)]
        every: u64,
    },
    /// Join a channel and serve its views over HTTP.
    Serve {
        /// Channel login, with or without a leading `#`.
        channel: String,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => chatpulse_config::load_and_validate_path(path),
        None => chatpulse_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            chatpulse_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Watch { channel, every }) => serve::run_watch(config, &channel, every).await,
        Some(Commands::Serve { channel }) => serve::run_serve(config, &channel).await,
        Some(Commands::Config) => config_cmd::print_config(&config),
        None => {
            println!("chatpulse: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("chatpulse: {e}");
        std::process::exit(1);
    }
}
