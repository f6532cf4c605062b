//! YAML defaults for saving
//!
//! ```yaml
//! prefix: my-model
//! pretty: true
//! output_dir: ./artifacts
//! ```

use crate::io::{SaveConfig, DEFAULT_NAME_PREFIX};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Save defaults read from a configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IoConfig {
    /// File name prefix for saved payloads
    pub prefix: String,

    /// Pretty-print the JSON payload
    pub pretty: bool,

    /// Directory saved payloads are written to
    pub output_dir: PathBuf,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_NAME_PREFIX.to_string(),
            pretty: false,
            output_dir: PathBuf::from("."),
        }
    }
}

impl IoConfig {
    /// Save configuration derived from these settings
    pub fn save_config(&self) -> SaveConfig {
        SaveConfig::new(self.prefix.clone()).with_pretty(self.pretty)
    }
}

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File name prefix must not be empty")]
    EmptyPrefix,

    #[error("File name prefix must not contain path separators: {0}")]
    PrefixWithSeparator(String),
}

/// Validate settings
pub fn validate_config(config: &IoConfig) -> std::result::Result<(), ValidationError> {
    if config.prefix.trim().is_empty() {
        return Err(ValidationError::EmptyPrefix);
    }
    if config.prefix.contains(['/', '\\']) {
        return Err(ValidationError::PrefixWithSeparator(config.prefix.clone()));
    }
    Ok(())
}

/// Load and validate settings from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<IoConfig> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let config: IoConfig = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))?;

    validate_config(&config).map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;

    Ok(config)
}
