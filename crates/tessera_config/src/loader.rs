//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PlacerConfig;
use std::path::Path;

/// Loads and validates a `tessera.toml` configuration from a project directory.
///
/// Reads `<project_dir>/tessera.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<PlacerConfig, ConfigError> {
    let config_path = project_dir.join("tessera.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tessera.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PlacerConfig, ConfigError> {
    let config: PlacerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &PlacerConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.canvas.width == 0 || config.canvas.height == 0 {
        return Err(ConfigError::ValidationError(
            "canvas dimensions must be positive".to_string(),
        ));
    }
    if config.clustering.count == 0 {
        return Err(ConfigError::ValidationError(
            "clustering.count must be at least 1".to_string(),
        ));
    }
    if !(0.0 < config.refine.cooling && config.refine.cooling < 1.0) {
        return Err(ConfigError::ValidationError(
            "refine.cooling must lie in (0, 1)".to_string(),
        ));
    }
    if config.refine.initial_temperature <= 0.0 {
        return Err(ConfigError::ValidationError(
            "refine.initial_temperature must be positive".to_string(),
        ));
    }
    Ok(())
}
