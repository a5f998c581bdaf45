//! Model: RunnerConfig and its defaults.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/stdout_json/config.toml";
pub const DEFAULT_SHELL: &str = "sh";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interpreter for the wrapped command, invoked as `<shell> -c <command>`.
    pub shell: String,
    /// Emit the version / start / exit records around a command.
    pub startup_logs: bool,
    /// Lines buffered between the pipe readers and the writer.
    pub channel_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            startup_logs: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.shell.trim().is_empty() {
            return Err("shell must not be empty".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("channel_capacity must be > 0".to_string());
        }
        Ok(())
    }
}
