use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::types::{ConfigError, SourceConfig};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<SourceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: SourceConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BEAMBOOKS_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<SourceConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
