//! Logging setup and the module startup banner.
//!
//! Console output goes through a tracing-subscriber fmt layer; when
//! `LOG_FILE` is configured a second non-ANSI layer duplicates output
//! to that file. The startup banner reports module metadata, host
//! facts, and the runtime environment, all informational.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use scaffold_lib::{ConfigStore, Settings};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::diag::HostInfo;

const BANNER_WIDTH: usize = 80;

/// Initialize tracing with a console layer and an optional file layer.
///
/// Level precedence: `-q` forces `error`; `-v`/`-vv` force
/// `debug`/`trace`; otherwise the configured `LOG_LEVEL` applies.
/// An unrecognized `LOG_LEVEL` value falls back to `info` (with a
/// warning) rather than being fed to the filter, where a bare token
/// would parse as a target directive and mute everything. Calling
/// this twice is tolerated (the second init is a no-op).
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or the log file
/// cannot be opened.
pub fn init_logging(verbose: u8, quiet: bool, settings: Option<&Settings>) -> Result<()> {
    let mut unrecognized: Option<String> = None;
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => {
                let raw = settings.map_or("INFO", |s| s.log_level.as_str());
                match level_directive(raw) {
                    Some(level) => level,
                    None => {
                        unrecognized = Some(raw.to_string());
                        "info"
                    }
                }
            }
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level directive '{level}'"))?;

    let mut layers: Vec<BoxedLayer> = vec![
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stdout)
            .boxed(),
    ];
    if let Some(path) = settings.and_then(|s| s.log_file.as_deref()) {
        layers.push(open_file_layer(path)?);
    }

    // Already-initialized is fine: tests and repeated store
    // constructions share one process-global subscriber.
    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();

    if let Some(raw) = unrecognized {
        tracing::warn!(value = %raw, "Unrecognized LOG_LEVEL, using info");
    }

    Ok(())
}

/// Map a configured level name to a filter directive, `None` when the
/// name is not a level.
fn level_directive(raw: &str) -> Option<&'static str> {
    match raw.to_lowercase().as_str() {
        "error" => Some("error"),
        "warn" | "warning" => Some("warn"),
        "info" => Some("info"),
        "debug" => Some("debug"),
        "trace" => Some("trace"),
        _ => None,
    }
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn open_file_layer(path: &Path) -> Result<BoxedLayer> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    Ok(fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .boxed())
}

/// Emit the module startup banner.
pub fn log_startup(store: &ConfigStore) {
    let settings = store.settings();
    let separator = "=".repeat(BANNER_WIDTH);

    info!("{separator}");
    info!("MODULE STARTUP");
    info!("{separator}");

    info!("Module Information:");
    info!("  Name: {}", settings.app_name);
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    info!("  Location: {}", store.working_directory().display());
    info!("  Environment: {}", settings.app_env);

    let host = HostInfo::collect();
    info!("System Information:");
    info!(
        "  Operating System: {} {}",
        host.os,
        host.os_version.as_deref().unwrap_or("unknown")
    );
    if let Some(kernel) = &host.kernel {
        info!("  Kernel: {kernel}");
    }
    info!("  Architecture: {}", host.arch);
    if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER").filter(|s| !s.trim().is_empty()) {
        info!("  Rust Version: {rustc}");
    }
    if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE").filter(|s| !s.trim().is_empty())
    {
        info!("  Target: {target}");
    }

    info!("Runtime Information:");
    if let Ok(cwd) = std::env::current_dir() {
        info!("  Current Directory: {}", cwd.display());
    }
    info!("  Working Directory: {}", store.working_directory().display());
    info!("  Env File: {}", store.env_file().display());
    info!("  Python Executable: {}", settings.python_executable);
    info!("  Log Level: {}", settings.log_level);
    if let Some(log_file) = &settings.log_file {
        info!("  Log File: {}", log_file.display());
    }

    info!("Hardware Information:");
    info!(
        "  CPU: {} physical cores, {} logical cores",
        host.physical_cores, host.logical_cores
    );
    info!("  RAM: {:.2} GB total", host.total_ram_gb);
    for gpu in &host.gpus {
        info!("  GPU: {gpu}");
    }

    info!("{separator}");
}

/// Emit the module shutdown line.
pub fn log_shutdown(store: &ConfigStore) {
    let separator = "=".repeat(BANNER_WIDTH);
    info!("{separator}");
    info!("MODULE SHUTDOWN: {}", store.settings().app_name);
    info!("{separator}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_accepts_known_levels() {
        assert_eq!(level_directive("INFO"), Some("info"));
        assert_eq!(level_directive("debug"), Some("debug"));
        assert_eq!(level_directive("Warning"), Some("warn"));
        assert_eq!(level_directive("TRACE"), Some("trace"));
        assert_eq!(level_directive("error"), Some("error"));
    }

    #[test]
    fn test_level_directive_rejects_non_levels() {
        assert_eq!(level_directive("VERBOSE"), None);
        assert_eq!(level_directive(""), None);
        assert_eq!(level_directive("info,hyper=off"), None);
    }
}
