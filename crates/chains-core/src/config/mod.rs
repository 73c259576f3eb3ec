//! Layered configuration: defaults, overridden by a TOML file.

pub mod defaults;
mod matching_config;
mod observability_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use matching_config::MatchingConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use crate::errors::{ChainsResult, ConfigError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainsConfig {
    pub matching: MatchingConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl ChainsConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(source: &str) -> ChainsResult<Self> {
        Self::parse(source, "<inline>")
    }

    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> ChainsResult<Self> {
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: display.clone() })?;
        Self::parse(&source, &display)
    }

    fn parse(source: &str, origin: &str) -> ChainsResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make every comparison pass or fail silently.
    pub fn validate(&self) -> ChainsResult<()> {
        let m = &self.matching;
        for (field, value) in [
            ("matching.required_chain_confidence", m.required_chain_confidence),
            ("matching.required_venue_confidence", m.required_venue_confidence),
            ("matching.prune_threshold", m.prune_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be a non-negative number, got {value}"),
                }
                .into());
            }
        }
        if !(0.0..=1.0).contains(&m.category_gate) {
            return Err(ConfigError::InvalidValue {
                field: "matching.category_gate".to_string(),
                message: format!("must be within [0, 1], got {}", m.category_gate),
            }
            .into());
        }
        Ok(())
    }
}
