//! Path resolution for the config file and data directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, CasebookConfig};

/// Resolve the config file path, checking CASEBOOK_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("CASEBOOK_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the data directory: `--data-dir` / CASEBOOK_DATA_DIR, then the
/// config file, then the XDG default.
pub fn resolve_data_dir(cli: &Cli, config: Option<&CasebookConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.data_dir.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.data.path));
    }
    default_data_dir()
}

/// Error message when the data directory does not exist.
pub fn missing_data_message(path: &Path) -> String {
    format!("No casebook data found at {}", path.display())
}
