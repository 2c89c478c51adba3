//! # Configuration
//!
//! Settings live in `config.json` next to the todo data. Missing fields fall
//! back to their defaults, so an empty `{}` is a valid config.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `load_delay_ms` | `0` | Simulated latency of the initial load (the loading indicator stays up this long) |
//! | `confirm_clear` | `true` | Ask before `clear` empties the list |
//!
//! ## Data Directory
//!
//! Resolved in priority order:
//! 1. `--data-dir <path>` on the command line
//! 2. `TODOZ_DATA_DIR` environment variable
//! 3. The OS data directory (via the `directories` crate)

use crate::error::{Result, TodozError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

pub const DATA_DIR_ENV: &str = "TODOZ_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodozConfig {
    #[serde(default)]
    pub load_delay_ms: u64,

    #[serde(default = "default_confirm_clear")]
    pub confirm_clear: bool,
}

fn default_confirm_clear() -> bool {
    true
}

impl Default for TodozConfig {
    fn default() -> Self {
        Self {
            load_delay_ms: 0,
            confirm_clear: default_confirm_clear(),
        }
    }
}

/// Settable keys, as spelled on the command line.
pub const CONFIG_KEYS: [&str; 2] = ["load-delay-ms", "confirm-clear"];

impl TodozConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TodozError::Io)?;
        let config: TodozConfig =
            serde_json::from_str(&content).map_err(TodozError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TodozError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TodozError::Serialization)?;
        fs::write(config_path, content).map_err(TodozError::Io)?;
        Ok(())
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "load-delay-ms" => Ok(self.load_delay_ms.to_string()),
            "confirm-clear" => Ok(self.confirm_clear.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "load-delay-ms" => {
                self.load_delay_ms = value.trim().parse().map_err(|_| {
                    TodozError::Api(format!("load-delay-ms expects milliseconds, got '{}'", value))
                })?;
            }
            "confirm-clear" => {
                self.confirm_clear = parse_bool(value).ok_or_else(|| {
                    TodozError::Api(format!("confirm-clear expects true/false, got '{}'", value))
                })?;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> TodozError {
    TodozError::Api(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Picks the data directory: explicit flag, then environment, then OS default.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    directories::ProjectDirs::from("com", "todoz", "todoz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| TodozError::Store("Could not determine a data directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TodozConfig::default();
        assert_eq!(config.load_delay_ms, 0);
        assert!(config.confirm_clear);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = TodozConfig::load(dir.path()).unwrap();
        assert_eq!(config, TodozConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"load_delay_ms": 500}"#).unwrap();
        let config = TodozConfig::load(dir.path()).unwrap();
        assert_eq!(config.load_delay(), Duration::from_millis(500));
        assert!(config.confirm_clear);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");

        let mut config = TodozConfig::default();
        config.set("confirm-clear", "no").unwrap();
        config.save(&target).unwrap();

        let loaded = TodozConfig::load(&target).unwrap();
        assert!(!loaded.confirm_clear);
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = TodozConfig::default();
        config.set("load-delay-ms", "250").unwrap();
        assert_eq!(config.get("load-delay-ms").unwrap(), "250");
        assert_eq!(config.get("confirm-clear").unwrap(), "true");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = TodozConfig::default();
        assert!(config.set("load-delay-ms", "soon").is_err());
        assert!(config.set("confirm-clear", "maybe").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, TodozConfig::default());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/elsewhere"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/elsewhere"));
    }
}
