//! Multi-hop IBC chain and denom resolution.
//!
//! Resolves the canonical display denom, coefficient, and price-source id
//! for a token that may have arrived over one or more IBC hops from a chain
//! outside local configuration. Resolution tiers: local denom table, denom
//! trace walk back to the origin chain, external chain registry. Every tier
//! degrades to `None`; callers fall back to the raw on-chain denom.

use futures::{future::BoxFuture, FutureExt};

use super::DataFetcher;
use crate::models::DenomInfo;

impl DataFetcher {
    /// Resolves denom metadata for `denom` as seen on the chain with
    /// `chain_id`.
    ///
    /// Recursion over IBC hops terminates because each
    /// [`resolve_remote_origin`](DataFetcher::resolve_remote_origin) call
    /// consumes the full trace of the current denom and recurses on the
    /// origin chain's base denom, which is not IBC-prefixed unless it made
    /// further hops of its own.
    pub fn resolve_denom_info<'a>(
        &'a self,
        chain_id: &'a str,
        denom: &'a str,
    ) -> BoxFuture<'a, Option<DenomInfo>> {
        async move {
            if let Some(chain) = self.config.chain_by_chain_id(chain_id) {
                if let Some(info) = chain.denom_info(denom) {
                    return Some(info.clone());
                }
            }

            if denom.starts_with("ibc/") {
                let (remote_chain_id, remote_denom) =
                    self.resolve_remote_origin(chain_id, denom).await?;
                return self.resolve_denom_info(&remote_chain_id, &remote_denom).await;
            }

            self.registry_denom_info(chain_id, denom).await
        }
        .boxed()
    }

    /// Walks an IBC denom trace back to the chain the asset was minted on.
    ///
    /// Returns the origin chain id together with the trace's base denom (the
    /// denom exactly as minted there). Exactly one connection hop per
    /// channel is supported; more is a deliberate scope limit and resolves
    /// to `None`. Any single query failure anywhere in the walk aborts the
    /// whole resolution; no partial result is cached.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve_remote_origin(
        &self,
        chain_id: &str,
        ibc_denom: &str,
    ) -> Option<(String, String)> {
        let hash = ibc_denom.strip_prefix("ibc/").unwrap_or(ibc_denom);

        let origin_chain = match self.config.chain_by_chain_id(chain_id) {
            Some(chain) => chain,
            None => {
                tracing::warn!(chain_id, denom = ibc_denom, "No configured chain to query trace on.");
                return None;
            }
        };

        let trace = self.get_ibc_denom_trace(&origin_chain.name, hash).await?;

        let tokens: Vec<&str> = trace.path.split('/').filter(|token| !token.is_empty()).collect();
        if tokens.len() % 2 != 0 {
            tracing::warn!(
                chain_id,
                path = %trace.path,
                "Denom trace path is not a sequence of port/channel pairs."
            );
            return None;
        }

        let mut current_chain_id = chain_id.to_string();
        for pair in tokens.chunks(2) {
            let (port, channel) = (pair[0], pair[1]);

            let current_chain = match self.config.chain_by_chain_id(&current_chain_id) {
                Some(chain) => chain,
                None => {
                    tracing::warn!(
                        chain_id = %current_chain_id,
                        "Trace walk reached a chain outside local configuration."
                    );
                    return None;
                }
            };

            let channel_end = self.get_ibc_channel(&current_chain.name, channel, port).await?;

            if channel_end.connection_hops.len() != 1 {
                tracing::warn!(
                    chain = %current_chain.name,
                    channel,
                    hops = channel_end.connection_hops.len(),
                    "Channels with more than one connection hop are unsupported."
                );
                return None;
            }

            current_chain_id = self
                .get_ibc_connection_chain_id(&current_chain.name, &channel_end.connection_hops[0])
                .await?;
        }

        Some((current_chain_id, trace.base_denom))
    }

    /// The last resolution tier: translate an asset record from the external
    /// chain registry.
    async fn registry_denom_info(&self, chain_id: &str, denom: &str) -> Option<DenomInfo> {
        let chains = self.get_registry_chains().await?;
        let chain_name = chains
            .iter()
            .find(|chain| chain.chain_id == chain_id)
            .map(|chain| chain.name.clone())?;

        let assets = self.get_registry_assets(&chain_name).await?;
        assets.iter().find(|asset| asset.base == denom).map(|asset| asset.to_denom_info())
    }
}
