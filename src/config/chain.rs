//! Per-chain configuration: node URLs, denom table, explorer link patterns,
//! subscription queries, and event filters.

use serde::Deserialize;
use url::Url;

use super::{filter::Filter, helpers::deserialize_urls};
use crate::models::DenomInfo;

/// Provides the default subscription query set.
fn default_queries() -> Vec<String> {
    vec!["tm.event = 'Tx'".to_string()]
}

/// Provides the default for boolean chain flags.
fn default_true() -> bool {
    true
}

/// Explorer link patterns for one chain. Each pattern embeds a single `%s`
/// placeholder that is substituted with the raw value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplorerConfig {
    /// Pattern for wallet addresses.
    #[serde(default)]
    pub wallet_link_pattern: Option<String>,
    /// Pattern for validator operator addresses.
    #[serde(default)]
    pub validator_link_pattern: Option<String>,
    /// Pattern for transaction hashes.
    #[serde(default)]
    pub transaction_link_pattern: Option<String>,
    /// Pattern for block heights.
    #[serde(default)]
    pub block_link_pattern: Option<String>,
    /// Pattern for governance proposal ids.
    #[serde(default)]
    pub proposal_link_pattern: Option<String>,
}

impl ExplorerConfig {
    /// Substitutes `value` into a pattern, if the pattern is configured.
    fn substitute(pattern: &Option<String>, value: &str) -> Option<String> {
        pattern.as_ref().map(|p| p.replace("%s", value))
    }

    /// Explorer URL for a wallet address.
    pub fn wallet_link(&self, address: &str) -> Option<String> {
        Self::substitute(&self.wallet_link_pattern, address)
    }

    /// Explorer URL for a validator operator address.
    pub fn validator_link(&self, address: &str) -> Option<String> {
        Self::substitute(&self.validator_link_pattern, address)
    }

    /// Explorer URL for a transaction hash.
    pub fn transaction_link(&self, hash: &str) -> Option<String> {
        Self::substitute(&self.transaction_link_pattern, hash)
    }

    /// Explorer URL for a block height.
    pub fn block_link(&self, height: &str) -> Option<String> {
        Self::substitute(&self.block_link_pattern, height)
    }

    /// Explorer URL for a proposal id.
    pub fn proposal_link(&self, id: &str) -> Option<String> {
        Self::substitute(&self.proposal_link_pattern, id)
    }
}

/// Configuration for one watched chain.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Internal chain name, unique across the configuration.
    pub name: String,
    /// Human-facing chain name.
    #[serde(default)]
    pub pretty_name: Option<String>,
    /// The chain id as reported by the chain itself (e.g. `cosmoshub-4`).
    pub chain_id: String,
    /// CometBFT WebSocket endpoints, one subscription task each.
    #[serde(deserialize_with = "deserialize_urls")]
    pub tendermint_nodes: Vec<Url>,
    /// LCD/REST API endpoints, tried in order on every query.
    #[serde(deserialize_with = "deserialize_urls")]
    pub api_nodes: Vec<Url>,
    /// Subscription queries in the Tendermint query grammar.
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    /// Event filters applied to each parsed message; OR'd, empty matches all.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Locally configured denom metadata.
    #[serde(default)]
    pub denoms: Vec<DenomInfo>,
    /// Explorer link patterns.
    #[serde(default)]
    pub explorer: Option<ExplorerConfig>,
    /// Whether unknown message types produce a placeholder report entry.
    #[serde(default = "default_true")]
    pub log_unknown_messages: bool,
    /// Whether transactions with a non-zero result code are reported.
    #[serde(default = "default_true")]
    pub log_failed_transactions: bool,
    /// Whether node-level errors are reported.
    #[serde(default = "default_true")]
    pub log_node_errors: bool,
}

impl ChainConfig {
    /// Looks up the locally configured metadata for a base denom.
    pub fn denom_info(&self, denom: &str) -> Option<&DenomInfo> {
        self.denoms.iter().find(|info| info.denom == denom)
    }

    /// The name to show users, falling back to the internal name.
    pub fn display_name(&self) -> &str {
        self.pretty_name.as_deref().unwrap_or(&self.name)
    }
}
