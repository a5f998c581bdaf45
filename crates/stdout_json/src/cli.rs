use std::path::PathBuf;

use clap::Parser;

/// Print every output line of COMMAND (or of stdin) as a Logstash JSON record.
#[derive(Debug, Parser)]
#[command(name = "stdout_json", version)]
pub struct Cli {
    /// TOML config file (defaults to $STDOUT_JSON_CONFIG_FILE or /etc/stdout_json/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to run; its words are joined with spaces and passed to the shell.
    /// Reads stdin when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// The shell command line, if any.
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
