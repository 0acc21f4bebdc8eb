mod config;

pub use config::{Config, DayConfig, LoggingConfig, OutputConfig, OutputFormat};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/dayplan[-dev]/` based on DAYPLAN_ENV.
///
/// Set DAYPLAN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dayplan-dev")
    } else {
        base_dir.join("dayplan")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
