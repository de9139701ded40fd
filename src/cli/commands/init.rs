//! Init command implementation.

use anyhow::Result;
use scaffold_lib::ConfigStore;
use serde::Serialize;

#[derive(Serialize)]
struct InitOutput<'a> {
    working_directory: &'a str,
    env_file: &'a str,
    input_dir: &'a str,
    output_dir: &'a str,
    cache_dir: &'a str,
}

/// Execute the init command.
///
/// Construction already did the work (discovery, file creation,
/// reconciliation, directory setup); this reports where things landed.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(store: &ConfigStore, json: bool) -> Result<()> {
    let settings = store.settings();
    let working_directory = store.working_directory().display().to_string();
    let env_file = store.env_file().display().to_string();
    let input_dir = settings.input_dir.display().to_string();
    let output_dir = settings.output_dir.display().to_string();
    let cache_dir = settings.cache_dir.display().to_string();

    if json {
        let output = InitOutput {
            working_directory: &working_directory,
            env_file: &env_file,
            input_dir: &input_dir,
            output_dir: &output_dir,
            cache_dir: &cache_dir,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Initialized scaffold workspace in {working_directory}");
    println!("  env file: {env_file}");
    println!("  input:    {input_dir}");
    println!("  output:   {output_dir}");
    println!("  cache:    {cache_dir}");
    Ok(())
}
