//! Run command: the placeholder module entry point.

use anyhow::Result;
use scaffold_lib::ConfigStore;
use tracing::{debug, info};

use crate::logging;

/// Execute the run command.
///
/// This is a template implementation; a scaffolded module replaces the
/// body between the startup and shutdown banners with its own logic.
///
/// # Errors
///
/// Infallible today; kept fallible so module logic can use `?`.
pub fn execute(store: &ConfigStore) -> Result<()> {
    logging::log_startup(store);

    info!("Starting module execution");
    info!("Performing module operations...");
    debug!("This is a debug message (only shown if LOG_LEVEL=DEBUG)");
    info!("Module execution completed successfully");

    logging::log_shutdown(store);
    Ok(())
}
