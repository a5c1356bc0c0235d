use std::{path::Path, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    chain::ChainConfig, helpers::deserialize_duration_from_seconds, http_retry::HttpRetryConfig,
};

/// Provides the default subscription name used for alias lookups.
fn default_subscription() -> String {
    "default".to_string()
}

/// Provides the default per-request timeout for REST calls.
fn default_query_timeout() -> Duration {
    Duration::from_secs(60)
}

/// Provides the default capacity of the shared report channel.
fn default_report_channel_capacity() -> usize {
    128
}

/// Provides the default external chain registry base URL.
fn default_chain_registry_url() -> String {
    "https://chains.cosmos.directory".to_string()
}

/// Provides the default price source base URL.
fn default_coingecko_url() -> String {
    "https://api.coingecko.com".to_string()
}

/// Application configuration for Pharos.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// The watched chains.
    pub chains: Vec<ChainConfig>,

    /// Subscription name, used as the alias-manager namespace.
    #[serde(default = "default_subscription")]
    pub subscription: String,

    /// Per-request timeout for REST calls.
    #[serde(
        default = "default_query_timeout",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub query_timeout_secs: Duration,

    /// Configuration for HTTP client retry policies.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,

    /// Capacity of the shared deduplicated report channel.
    #[serde(default = "default_report_channel_capacity")]
    pub report_channel_capacity: usize,

    /// Base URL of the external chain registry.
    #[serde(default = "default_chain_registry_url")]
    pub chain_registry_url: String,

    /// Base URL of the price source.
    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,
}

impl AppConfig {
    /// Loads configuration from a YAML file plus `PHAROS__`-prefixed
    /// environment overrides. Invalid filter or query syntax fails here,
    /// the only fatal error class in the pipeline.
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("config"),
        };

        let config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("PHAROS").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Structural checks that serde defaults cannot express.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::Message("at least one chain must be configured".into()));
        }
        for chain in &self.chains {
            if chain.tendermint_nodes.is_empty() {
                return Err(ConfigError::Message(format!(
                    "chain '{}' has no tendermint nodes configured",
                    chain.name
                )));
            }
            if chain.api_nodes.is_empty() {
                return Err(ConfigError::Message(format!(
                    "chain '{}' has no API nodes configured",
                    chain.name
                )));
            }
        }
        Ok(())
    }

    /// Looks up a chain by its configured name.
    pub fn chain_by_name(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|chain| chain.name == name)
    }

    /// Looks up a chain by its on-chain chain id.
    pub fn chain_by_chain_id(&self, chain_id: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|chain| chain.chain_id == chain_id)
    }
}
