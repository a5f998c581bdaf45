//! Boot: logging init and config load.

use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::RunnerConfig;

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr; stdout carries only JSON records.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stdout_json=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate the configuration.
pub fn boot(config_path: Option<&Path>) -> Result<RunnerConfig, Box<dyn std::error::Error>> {
    let config = RunnerConfig::load(config_path)?;
    info!(
        "Loaded configuration: shell={}, startup_logs={}, channel_capacity={}",
        config.shell, config.startup_logs, config.channel_capacity
    );
    Ok(config)
}
