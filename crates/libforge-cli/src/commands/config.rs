//! `libforge config`: read and write configuration values.

use std::path::{Path, PathBuf};

use crate::{
    cli::ConfigCommands,
    config::{self, AppConfig},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// `explicit` is the `--config` path, if any; `set` writes to it.
pub fn execute(
    cmd: ConfigCommands,
    explicit: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = explicit.unwrap_or_else(AppConfig::active_path);

    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            // Bare value so scripts can capture it.
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            set(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                output.print(config.to_toml()?.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

/// Rewrite `key` in the file at `path`, creating the file if needed.
fn set(path: &Path, key: &str, value: &str) -> CliResult<()> {
    let current = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(CliError::IoError {
                message: format!("Failed to read '{}'", path.display()),
                source: e,
            });
        }
    };

    let updated = config::set_value(&current, key, value)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, updated)
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))
}
