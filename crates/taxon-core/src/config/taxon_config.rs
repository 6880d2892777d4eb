//! Top-level taxon configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DifferConfig, ObservabilityConfig, StampConfig, StorageConfig, TaxonomyConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Missing sections and keys fall back to compiled defaults; unknown keys
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxonConfig {
    pub stamp: StampConfig,
    pub taxonomy: TaxonomyConfig,
    pub differ: DifferConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl TaxonConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: TaxonConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: TaxonConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &TaxonConfig) -> Result<(), ConfigError> {
        let positive = [
            ("taxonomy.batch_size", config.taxonomy.batch_size),
            ("differ.queue_capacity", config.differ.queue_capacity),
            ("differ.max_in_flight_writes", config.differ.max_in_flight_writes),
            ("differ.write_batch_size", config.differ.write_batch_size),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if config.storage.db_path.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "storage.db_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
