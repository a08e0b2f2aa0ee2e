//! Retouch CLI - headless driver for the retouch editing engine.
//!
//! Loads an image, applies a chain of operations through the same editing
//! surface a GUI would use, and writes the result back to disk.
//!
//! # Usage
//!
//! ```bash
//! # Apply a couple of edits
//! retouch edit photo.jpg --op blur:gaussian,sigma=2.0 --op transform:rotate180
//!
//! # Inspect an image
//! retouch info photo.jpg
//!
//! # View configuration
//! retouch config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Retouch - command-line photo editing with undo-aware sessions.
#[derive(Parser, Debug)]
#[command(name = "retouch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load an image, apply operations, and save the result
    Edit(cli::edit::EditArgs),

    /// Print image information as JSON
    Info(cli::info::InfoArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match retouch_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `retouch config path`."
            );
            retouch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("retouch v{}", retouch_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Edit(args) => cli::edit::execute(args, &config),
        Commands::Info(args) => cli::info::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args),
    }
}
