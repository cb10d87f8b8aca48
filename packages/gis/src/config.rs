//! Engine configuration.
//!
//! Defaults are embedded from `config/default.toml`. An override file only
//! needs the keys it changes; everything else keeps its default.

use std::path::Path;

use load_map_gis_models::GisConfig;

use crate::GisError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Parses a TOML configuration. Missing keys take their defaults.
///
/// # Errors
///
/// Returns [`GisError::Config`] if the TOML is malformed or a key has the
/// wrong type.
pub fn parse_config(toml_str: &str) -> Result<GisConfig, GisError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns the embedded default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure indicates a development error caught by tests.
#[must_use]
pub fn default_config() -> GisConfig {
    parse_config(DEFAULT_CONFIG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
}

/// Reads a configuration override from disk.
///
/// # Errors
///
/// Returns [`GisError::Io`] if the file cannot be read, or
/// [`GisError::Config`] if it is not valid configuration.
pub fn load_config(path: &Path) -> Result<GisConfig, GisError> {
    let toml_str = std::fs::read_to_string(path)?;
    let config = parse_config(&toml_str)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
