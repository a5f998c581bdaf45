//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::model::{RunnerConfig, DEFAULT_CONFIG_PATH};

pub const ENV_CONFIG_FILE: &str = "STDOUT_JSON_CONFIG_FILE";
pub const ENV_SHELL: &str = "STDOUT_JSON_SHELL";
pub const ENV_STARTUP_LOGS: &str = "STDOUT_JSON_STARTUP_LOGS";
pub const ENV_CHANNEL_CAPACITY: &str = "STDOUT_JSON_CHANNEL_CAPACITY";

impl RunnerConfig {
    /// Load configuration.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// An explicit `path` must exist. Otherwise `STDOUT_JSON_CONFIG_FILE`, then
    /// the default location, are read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let config_path = std::env::var(ENV_CONFIG_FILE)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
                if config_path.exists() {
                    tracing::info!("Loading configuration from: {}", config_path.display());
                    Self::from_file(&config_path)?
                } else {
                    tracing::debug!("Config file not found at {}, using defaults", config_path.display());
                    Self::default()
                }
            }
        };

        config.apply_env_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: RunnerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override fields from variables returned by `lookup`.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shell) = lookup(ENV_SHELL) {
            self.shell = shell;
        }
        if let Some(raw) = lookup(ENV_STARTUP_LOGS) {
            match raw.parse() {
                Ok(enabled) => self.startup_logs = enabled,
                Err(_) => tracing::warn!("Ignoring {}={:?}: expected true or false", ENV_STARTUP_LOGS, raw),
            }
        }
        if let Some(raw) = lookup(ENV_CHANNEL_CAPACITY) {
            match raw.parse() {
                Ok(capacity) => self.channel_capacity = capacity,
                Err(_) => tracing::warn!("Ignoring {}={:?}: expected a number", ENV_CHANNEL_CAPACITY, raw),
            }
        }
    }
}
