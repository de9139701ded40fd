//! Config get/set/list command implementations.

use anyhow::Result;
use scaffold_lib::{ConfigStore, envfile};

use crate::cli::{ConfigCommand, ConfigSubcommand};

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns an error if the env file cannot be read or written.
pub fn execute(config: &ConfigCommand, store: &mut ConfigStore, json: bool) -> Result<()> {
    match &config.command {
        ConfigSubcommand::Get { key, default } => {
            let value = store.get_or(key, default);
            if json {
                println!("{}", serde_json::json!({ "key": key, "value": value }));
            } else {
                println!("{value}");
            }
        }
        ConfigSubcommand::Set { key, value } => {
            store.set(key, value)?;
            if json {
                println!("{}", serde_json::json!({ "key": key, "value": value }));
            } else {
                println!("{key}={value}");
            }
        }
        ConfigSubcommand::List => {
            // Listing reflects the file, not the layered view: the
            // operator is editing the file, not the process env.
            let pairs = envfile::load(store.env_file())?;
            if json {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                println!("{}", serde_json::Value::Object(map));
            } else {
                for (key, value) in pairs {
                    println!("{key}={value}");
                }
            }
        }
    }
    Ok(())
}
