pub mod schema;

pub use schema::ToolsConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default crag-tools home directory (~/.crag-tools).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".crag-tools"))
        .unwrap_or_else(|| PathBuf::from(".crag-tools"))
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("config.toml")
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<ToolsConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path).context("Failed to read tools config file")?;
        let config: ToolsConfig =
            toml::from_str(&contents).context("Failed to parse tools config (TOML)")?;
        Ok(config)
    } else {
        Ok(ToolsConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &ToolsConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.chat_model, "gpt-4o-mini");
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = ToolsConfig::default();
        cfg.router_url = "http://router:7000".into();
        cfg.top_k = 3;
        save_config(&cfg, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.router_url, "http://router:7000");
        assert_eq!(loaded.top_k, 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "top_k = \"many\"").unwrap();
        assert!(load_config(&path).is_err());
    }
}
