//! Command-line interface for `prismq_scaffold`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use scaffold_lib::{ConfigStore, StoreOptions};
use std::path::PathBuf;

use crate::logging;

/// `prismq_scaffold` (pq) - PrismQ module scaffold runtime.
#[derive(Parser, Debug)]
#[command(name = "pq")]
#[command(
    author,
    version,
    about = "PrismQ module scaffold (env-file config + startup diagnostics)",
    long_about = None,
    after_help = "Single-operator, single-process: no daemons, no file locking."
)]
pub struct Cli {
    /// Explicit env file path (skips marker discovery)
    #[arg(long, global = true, env = "PQ_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Never prompt; missing values silently fall back to defaults
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the working directory and create the env file
    Init,

    /// Show resolved configuration and host facts
    Info,

    /// Read/write env-file configuration
    Config(ConfigCommand),

    /// Run the placeholder module entry point (default)
    Run,
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a config value
    Get {
        key: String,

        /// Fallback when the key is absent or empty
        #[arg(long, default_value = "")]
        default: String,
    },

    /// Set a config value
    Set { key: String, value: String },

    /// List config values
    List,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if store construction, logging setup, or the
/// command itself fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let options = StoreOptions {
        env_file: cli.env_file.clone(),
        interactive: !cli.non_interactive,
        ..StoreOptions::default()
    };
    let mut store = ConfigStore::open(options)?;

    logging::init_logging(cli.verbose, cli.quiet, Some(store.settings()))?;

    match cli.command {
        Some(Commands::Init) => commands::init::execute(&store, cli.json),
        Some(Commands::Info) => commands::info::execute(&store, cli.json),
        Some(Commands::Config(config)) => commands::config::execute(&config, &mut store, cli.json),
        Some(Commands::Run) | None => commands::run::execute(&store),
    }
}
