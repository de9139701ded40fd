//! `prismq_scaffold` - PrismQ module scaffold runtime library
//!
//! This crate provides the functionality behind the `pq` CLI tool: it
//! boots a scaffolded module by discovering its working directory,
//! loading env-file configuration, and emitting startup diagnostics.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`logging`] - tracing setup and the startup banner
//! - [`diag`] - best-effort host facts (CPU, RAM, GPU)
//!
//! The config core (locator, env-file codec, layered environment,
//! store) lives in the `scaffold-lib` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod diag;
pub mod logging;

pub use scaffold_lib::{ConfigStore, Result as ScaffoldResult, ScaffoldError, StoreOptions};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
