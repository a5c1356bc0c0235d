//! Canonical denom metadata, sourced from local chain configuration or
//! resolved dynamically through the external chain registry.

use serde::Deserialize;

/// Provides the default base-to-display coefficient (10^6, the Cosmos-SDK
/// convention for u-prefixed denoms).
fn default_denom_coefficient() -> f64 {
    1_000_000.0
}

/// Canonical metadata for one denom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenomInfo {
    /// The base denom as minted on chain (e.g. `uatom`).
    pub denom: String,
    /// The human-facing display denom (e.g. `atom`).
    pub display_denom: String,
    /// Base units per display unit.
    #[serde(default = "default_denom_coefficient")]
    pub denom_coefficient: f64,
    /// Identifier on the price source, if the denom is priced.
    #[serde(default)]
    pub coingecko_currency: Option<String>,
}
