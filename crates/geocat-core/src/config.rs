use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GeocatError, Result};
use crate::models::DistanceMode;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the geocat engine
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Process-wide CRS; every stored geometry and query input must use it.
    pub crs: ConfigValue<u32>,
    /// Measurement mode; must match the CRS (planar for projected,
    /// geodesic for geographic).
    pub distance_mode: ConfigValue<DistanceMode>,
    /// Default result count for nearest-feature queries.
    pub nearest_limit: ConfigValue<usize>,
    /// Accumulated index mutations before a bulk rebuild of the R-tree.
    pub index_rebuild_threshold: ConfigValue<usize>,
}

/// Resolved configuration snapshot handed to the engine components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub crs: u32,
    pub distance_mode: DistanceMode,
    pub nearest_limit: usize,
    pub index_rebuild_threshold: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        LayeredConfig::with_defaults().resolve()
    }
}

/// TOML file schema; every key optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    crs: Option<u32>,
    distance_mode: Option<DistanceMode>,
    nearest_limit: Option<usize>,
    index_rebuild_threshold: Option<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            crs: ConfigValue::new(4326, ConfigSource::Default),
            distance_mode: ConfigValue::new(DistanceMode::Geodesic, ConfigSource::Default),
            nearest_limit: ConfigValue::new(5, ConfigSource::Default),
            index_rebuild_threshold: ConfigValue::new(1024, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| GeocatError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeocatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        Ok(self.apply_file_config(file_config))
    }

    fn apply_file_config(mut self, file_config: FileConfig) -> Self {
        if let Some(crs) = file_config.crs {
            self.crs.update(crs, ConfigSource::File);
        }

        if let Some(mode) = file_config.distance_mode {
            self.distance_mode.update(mode, ConfigSource::File);
        }

        if let Some(limit) = file_config.nearest_limit {
            self.nearest_limit.update(limit, ConfigSource::File);
        }

        if let Some(threshold) = file_config.index_rebuild_threshold {
            self.index_rebuild_threshold.update(threshold, ConfigSource::File);
        }

        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(crs_str) = env::var("GEOCAT_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOCAT_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        if let Ok(mode_str) = env::var("GEOCAT_DISTANCE_MODE") {
            match mode_str.to_lowercase().as_str() {
                "planar" => self.distance_mode.update(DistanceMode::Planar, ConfigSource::Environment),
                "geodesic" => {
                    self.distance_mode.update(DistanceMode::Geodesic, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOCAT_DISTANCE_MODE value '{}': expected 'planar' or 'geodesic'",
                    mode_str
                ),
            }
        }

        if let Ok(limit_str) = env::var("GEOCAT_NEAREST_LIMIT") {
            match limit_str.parse::<usize>() {
                Ok(limit) if limit > 0 => {
                    self.nearest_limit.update(limit, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOCAT_NEAREST_LIMIT value '{}': expected positive integer",
                    limit_str
                ),
            }
        }

        if let Ok(threshold_str) = env::var("GEOCAT_INDEX_REBUILD_THRESHOLD") {
            match threshold_str.parse::<usize>() {
                Ok(threshold) if threshold > 0 => {
                    self.index_rebuild_threshold.update(threshold, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOCAT_INDEX_REBUILD_THRESHOLD value '{}': expected positive integer",
                    threshold_str
                ),
            }
        }

        self
    }

    /// Collapse the layered values into a plain settings snapshot.
    pub fn resolve(&self) -> EngineSettings {
        EngineSettings {
            crs: self.crs.value,
            distance_mode: self.distance_mode.value,
            nearest_limit: self.nearest_limit.value,
            index_rebuild_threshold: self.index_rebuild_threshold.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LayeredConfig::with_defaults().resolve();
        assert_eq!(settings.crs, 4326);
        assert_eq!(settings.distance_mode, DistanceMode::Geodesic);
        assert_eq!(settings.nearest_limit, 5);
        assert_eq!(settings.index_rebuild_threshold, 1024);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file_config: FileConfig =
            toml::from_str("crs = 3857\ndistance_mode = \"planar\"").unwrap();
        let config = LayeredConfig::with_defaults().apply_file_config(file_config);

        assert_eq!(config.crs.value, 3857);
        assert_eq!(config.crs.source, ConfigSource::File);
        assert_eq!(config.distance_mode.value, DistanceMode::Planar);
        // Untouched keys keep their defaults
        assert_eq!(config.nearest_limit.value, 5);
        assert_eq!(config.nearest_limit.source, ConfigSource::Default);
    }

    #[test]
    fn test_lower_precedence_never_overwrites_higher() {
        let mut value = ConfigValue::new(10usize, ConfigSource::Environment);
        value.update(20, ConfigSource::File);
        assert_eq!(value.value, 10);
        assert_eq!(value.source, ConfigSource::Environment);

        value.update(30, ConfigSource::Environment);
        assert_eq!(value.value, 30);
    }

    #[test]
    fn test_malformed_file_is_config_invalid() {
        let err = LayeredConfig::with_defaults()
            .load_from_file("/nonexistent/geocat.toml")
            .unwrap_err();
        assert!(matches!(err, GeocatError::ConfigInvalid { .. }));
    }
}
