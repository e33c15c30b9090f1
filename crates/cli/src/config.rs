//! Typed configuration (spec §6.3), loaded from TOML with CLI flags
//! overriding file values. `chain_id` is discovered dynamically from a
//! block header and is never an accepted config key — a file that sets it
//! is rejected outright.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config file sets 'chain_id', which is discovered dynamically and must not be configured")]
    ChainIdNotConfigurable,
    #[error("max_height_skew must be non-negative")]
    InvalidSkew,
    #[error("bft_threshold must be (2, 3); configurable fractions are not yet supported")]
    UnsupportedThreshold,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    api_endpoint: Option<String>,
    consensus_endpoint: Option<String>,
    genesis_hash: Option<String>,
    genesis_validators: Option<String>,
    #[serde(default)]
    bft_threshold: Option<(u32, u32)>,
    #[serde(default)]
    max_height_skew: Option<i64>,
    #[serde(default)]
    debug: Option<bool>,
}

/// Resolved configuration, after file load and CLI-flag overrides.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_endpoint: String,
    pub consensus_endpoint: Option<String>,
    pub genesis_hash: Option<String>,
    pub genesis_validators_path: Option<String>,
    pub max_height_skew: u64,
    pub debug: bool,
}

impl Config {
    /// Load from an optional TOML file, then apply CLI overrides (`Some`
    /// wins over the file's value; both absent falls back to the default).
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        config_path: Option<&Path>,
        api_endpoint: Option<String>,
        consensus_endpoint: Option<String>,
        genesis_hash: Option<String>,
        genesis_validators_path: Option<String>,
        max_height_skew: Option<u64>,
        debug: bool,
    ) -> Result<Self, ConfigError> {
        let raw = match config_path {
            Some(path) => Some(Self::load_raw(path)?),
            None => None,
        };

        let api_endpoint = api_endpoint
            .or_else(|| raw.as_ref().and_then(|r| r.api_endpoint.clone()))
            .unwrap_or_default();
        let consensus_endpoint =
            consensus_endpoint.or_else(|| raw.as_ref().and_then(|r| r.consensus_endpoint.clone()));
        let genesis_hash = genesis_hash.or_else(|| raw.as_ref().and_then(|r| r.genesis_hash.clone()));
        let genesis_validators_path = genesis_validators_path
            .or_else(|| raw.as_ref().and_then(|r| r.genesis_validators.clone()));

        if let Some(raw) = &raw {
            if let Some(threshold) = raw.bft_threshold {
                if threshold != (2, 3) {
                    return Err(ConfigError::UnsupportedThreshold);
                }
            }
        }

        let max_height_skew = max_height_skew
            .or_else(|| raw.as_ref().and_then(|r| r.max_height_skew).map(|v| v.max(0) as u64))
            .unwrap_or(0);
        if let Some(raw) = &raw {
            if let Some(skew) = raw.max_height_skew {
                if skew < 0 {
                    return Err(ConfigError::InvalidSkew);
                }
            }
        }

        let debug = debug || raw.as_ref().and_then(|r| r.debug).unwrap_or(false);

        Ok(Self {
            api_endpoint,
            consensus_endpoint,
            genesis_hash,
            genesis_validators_path,
            max_height_skew,
            debug,
        })
    }

    fn load_raw(path: &Path) -> Result<RawConfig, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let value: toml::Value = toml::from_str(&text)?;
        if let toml::Value::Table(table) = &value {
            if table.contains_key("chain_id") {
                return Err(ConfigError::ChainIdNotConfigurable);
            }
        }

        Ok(RawConfig::deserialize(value)?)
    }
}
