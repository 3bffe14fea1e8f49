//! Server configuration.

use anyhow::Result;
use portico_core::DEFAULT_RECENT_LIMIT;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Root directory for the history and key stores.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,
    /// Seconds of inactivity after which the server shuts itself down.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Default number of entries served by /recentProjects.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_host() -> String {
    // Personal tool; never exposed beyond the local machine by default.
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_archive_dir() -> PathBuf {
    dirs::desktop_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".portico_archive")
}

fn default_idle_timeout_secs() -> u64 {
    15 * 60
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            archive_dir: default_archive_dir(),
            idle_timeout_secs: default_idle_timeout_secs(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.idle_timeout_secs, 900);
        assert_eq!(config.recent_limit, 3);
    }
}
