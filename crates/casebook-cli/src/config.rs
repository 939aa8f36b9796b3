use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CasebookConfig {
    pub data: DataSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    /// IANA timezone for displayed dates and template defaults
    pub timezone: Option<String>,
}

impl CasebookConfig {
    pub fn new(data_dir: PathBuf, timezone: Option<String>) -> Self {
        Self {
            data: DataSection {
                path: data_dir.to_string_lossy().to_string(),
            },
            ui: UiSection { timezone },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<CasebookConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &CasebookConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("casebook"));
        }
    }
    Ok(home_dir()?.join(".config").join("casebook"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("casebook"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("casebook"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = CasebookConfig::new(PathBuf::from("/srv/casebook"), Some("Europe/Berlin".into()));
        write_config(&path, &config).unwrap();

        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.data.path, "/srv/casebook");
        assert_eq!(loaded.ui.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_ui_section_is_optional() {
        let config: CasebookConfig = toml::from_str("[data]\npath = \"/tmp/x\"\n").unwrap();
        assert!(config.ui.timezone.is_none());
    }
}
