//! Client for the external HTTP chain registry (cosmos.directory schema).
//!
//! Used as the last resolution tier for denoms on chains outside local
//! configuration.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use thiserror::Error;

use crate::models::DenomInfo;

/// Custom error type for chain registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The response body could not be read or decoded.
    #[error("Response decode failed: {0}")]
    Decode(#[from] reqwest::Error),

    /// The registry answered with a non-success status.
    #[error("Registry returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One chain entry in the registry listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryChain {
    /// Registry directory name, used to address the chain's assetlist.
    pub name: String,
    /// On-chain chain id.
    #[serde(default)]
    pub chain_id: String,
}

#[derive(Debug, Deserialize)]
struct ChainsResponse {
    chains: Vec<RegistryChain>,
}

/// One denom unit of a registry asset.
#[derive(Debug, Clone, Deserialize)]
pub struct DenomUnit {
    /// Unit denom.
    pub denom: String,
    /// Power-of-ten exponent relative to the base unit.
    #[serde(default)]
    pub exponent: i32,
}

/// One asset record in a chain's assetlist.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryAsset {
    /// Base denom as minted on chain.
    pub base: String,
    /// Display denom name.
    #[serde(default)]
    pub display: String,
    /// Known denom units with their exponents.
    #[serde(default)]
    pub denom_units: Vec<DenomUnit>,
    /// CoinGecko identifier, when the asset is priced there.
    #[serde(default)]
    pub coingecko_id: Option<String>,
}

impl RegistryAsset {
    fn exponent_of(&self, denom: &str) -> i32 {
        self.denom_units
            .iter()
            .find(|unit| unit.denom == denom)
            .map(|unit| unit.exponent)
            .unwrap_or(0)
    }

    /// Translates the asset record into denom metadata, with the coefficient
    /// computed as 10^(display exponent − base exponent).
    pub fn to_denom_info(&self) -> DenomInfo {
        let exponent = self.exponent_of(&self.display) - self.exponent_of(&self.base);
        DenomInfo {
            denom: self.base.clone(),
            display_denom: if self.display.is_empty() {
                self.base.clone()
            } else {
                self.display.clone()
            },
            denom_coefficient: 10f64.powi(exponent),
            coingecko_currency: self.coingecko_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Assetlist {
    #[serde(default)]
    assets: Vec<RegistryAsset>,
}

#[derive(Debug, Deserialize)]
struct AssetlistResponse {
    assetlist: Assetlist,
}

/// Client for the external chain registry.
pub struct ChainRegistryClient {
    base: String,
    client: ClientWithMiddleware,
}

impl ChainRegistryClient {
    /// Creates a registry client over the given base URL.
    pub fn new(base: impl Into<String>, client: ClientWithMiddleware) -> Self {
        let base = base.into();
        Self { base: base.trim_end_matches('/').to_string(), client }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RegistryError> {
        let response = self.client.get(format!("{}{}", self.base, path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }

    /// Fetches the full chain listing.
    pub async fn chains(&self) -> Result<Vec<RegistryChain>, RegistryError> {
        let response: ChainsResponse = self.get_json("").await?;
        Ok(response.chains)
    }

    /// Fetches the assetlist of one chain by registry name.
    pub async fn assetlist(&self, chain_name: &str) -> Result<Vec<RegistryAsset>, RegistryError> {
        let response: AssetlistResponse = self.get_json(&format!("/{chain_name}/assetlist")).await?;
        Ok(response.assetlist.assets)
    }
}
