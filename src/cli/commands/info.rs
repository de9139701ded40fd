//! Info command implementation.

use anyhow::Result;
use scaffold_lib::ConfigStore;
use serde::Serialize;

use crate::diag::HostInfo;

#[derive(Serialize)]
struct ModuleInfo<'a> {
    name: &'a str,
    version: &'a str,
    environment: &'a str,
    debug: bool,
    working_directory: String,
    env_file: String,
    log_level: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_file: Option<String>,
    python_executable: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rust_version: Option<&'a str>,
}

#[derive(Serialize)]
struct InfoOutput<'a> {
    module: ModuleInfo<'a>,
    host: HostInfo,
}

/// Execute the info command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(store: &ConfigStore, json: bool) -> Result<()> {
    let settings = store.settings();
    let host = HostInfo::collect();

    let commit = option_env!("VERGEN_GIT_SHA").filter(|s| !s.trim().is_empty());
    let rust_version = option_env!("VERGEN_RUSTC_SEMVER").filter(|s| !s.trim().is_empty());

    if json {
        let output = InfoOutput {
            module: ModuleInfo {
                name: &settings.app_name,
                version: env!("CARGO_PKG_VERSION"),
                environment: settings.app_env.as_str(),
                debug: settings.debug,
                working_directory: store.working_directory().display().to_string(),
                env_file: store.env_file().display().to_string(),
                log_level: &settings.log_level,
                log_file: settings.log_file.as_ref().map(|p| p.display().to_string()),
                python_executable: &settings.python_executable,
                commit,
                rust_version,
            },
            host,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{} {}", settings.app_name, env!("CARGO_PKG_VERSION"));
    println!("Environment: {}", settings.app_env);
    println!("Working directory: {}", store.working_directory().display());
    println!("Env file: {}", store.env_file().display());
    println!("Log level: {}", settings.log_level);
    if let Some(log_file) = &settings.log_file {
        println!("Log file: {}", log_file.display());
    }
    println!("Python executable: {}", settings.python_executable);
    if let Some(commit) = commit {
        let short = &commit[..commit.len().min(7)];
        println!("Commit: {short}");
    }

    println!(
        "Host: {} {} ({})",
        host.os,
        host.os_version.as_deref().unwrap_or(""),
        host.arch
    );
    if let Some(rustc) = rust_version {
        println!("Rust: {rustc}");
    }
    println!(
        "CPU: {} physical cores, {} logical cores",
        host.physical_cores, host.logical_cores
    );
    println!("RAM: {:.2} GB total", host.total_ram_gb);
    for gpu in &host.gpus {
        println!("GPU: {gpu}");
    }

    Ok(())
}
