//! Cache-aside data fetcher with per-resource node failover.
//!
//! Every read-only question follows the same pattern: compute a cache key
//! from (chain, resource, parameters); return a fresh typed cache hit;
//! otherwise iterate the chain's configured API nodes in order, cache and
//! return the first success, and degrade to `None` when every node fails.
//! `None` is the only failure surface: callers omit the enrichment the
//! answer would have fed.

mod resolver;

use std::{collections::HashMap, sync::Arc};

use futures::{future::BoxFuture, FutureExt};
use thiserror::Error;

use crate::{
    aliases::AliasManager,
    cache::Cache,
    chain_api::{ChainApiClient, ChainApiError, DecCoin, IbcChannel, Proposal, StakingParams, Validator},
    chain_registry::{ChainRegistryClient, RegistryAsset, RegistryChain},
    config::{AppConfig, ChainConfig},
    http_client::{create_base_http_client, create_retryable_http_client},
    metrics::AppMetrics,
    models::{Amount, DenomInfo, Link},
    price::{CoingeckoPriceFetcher, PriceFetcher},
};

/// Custom error type for fetcher construction.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP client build failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The cache-aside, failover-aware answer desk for every enrichment
/// question the pipeline asks.
pub struct DataFetcher {
    config: Arc<AppConfig>,
    cache: Cache,
    clients: HashMap<String, Vec<ChainApiClient>>,
    registry: ChainRegistryClient,
    price_fetchers: HashMap<String, Box<dyn PriceFetcher>>,
    aliases: Arc<dyn AliasManager>,
}

impl DataFetcher {
    /// Builds the fetcher and one API client per configured node per chain.
    pub fn new(
        config: Arc<AppConfig>,
        aliases: Arc<dyn AliasManager>,
        metrics: Arc<AppMetrics>,
    ) -> Result<Self, FetcherError> {
        let base_client = create_base_http_client(config.query_timeout_secs)?;
        let http = create_retryable_http_client(&config.http_retry_config, base_client);

        let mut clients = HashMap::new();
        for chain in &config.chains {
            let chain_clients = chain
                .api_nodes
                .iter()
                .map(|node| {
                    ChainApiClient::new(&chain.name, node, http.clone(), Arc::clone(&metrics))
                })
                .collect();
            clients.insert(chain.name.clone(), chain_clients);
        }

        let registry = ChainRegistryClient::new(&config.chain_registry_url, http.clone());

        let mut price_fetchers: HashMap<String, Box<dyn PriceFetcher>> = HashMap::new();
        let coingecko = CoingeckoPriceFetcher::new(&config.coingecko_url, http);
        price_fetchers.insert(coingecko.name().to_string(), Box::new(coingecko));

        Ok(Self {
            config,
            cache: Cache::new(),
            clients,
            registry,
            price_fetchers,
            aliases,
        })
    }

    /// The fetcher's cache. Exposed so callers and tests can prime it.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The application configuration the fetcher answers from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The uniform cache-aside + in-order failover read path.
    async fn cached_with_failover<T, F>(&self, chain: &str, cache_key: String, fetch: F) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
        F: for<'a> Fn(&'a ChainApiClient) -> BoxFuture<'a, Result<T, ChainApiError>>,
    {
        if let Some(value) = self.cache.get::<T>(&cache_key) {
            return Some(value);
        }

        let Some(clients) = self.clients.get(chain) else {
            tracing::error!(chain, key = %cache_key, "No API clients configured for chain.");
            return None;
        };

        for client in clients {
            match fetch(client).await {
                Ok(value) => {
                    self.cache.set(&cache_key, value.clone());
                    return Some(value);
                }
                Err(error) => {
                    tracing::warn!(
                        chain,
                        node = client.host(),
                        %error,
                        "Node query failed, trying next node."
                    );
                }
            }
        }

        tracing::error!(chain, key = %cache_key, "All configured nodes failed for query.");
        None
    }

    /// Fetches one validator by operator address.
    pub async fn get_validator(&self, chain: &str, address: &str) -> Option<Validator> {
        let key = format!("validator:{chain}:{address}");
        let address = address.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let address = address.clone();
            async move { client.validator(&address).await }.boxed()
        })
        .await
    }

    /// Fetches a delegator's rewards from one validator at a height.
    pub async fn get_rewards(
        &self,
        chain: &str,
        delegator: &str,
        validator: &str,
        height: i64,
    ) -> Option<Vec<DecCoin>> {
        let key = format!("rewards:{chain}:{delegator}:{validator}:{height}");
        let delegator = delegator.to_string();
        let validator = validator.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let delegator = delegator.clone();
            let validator = validator.clone();
            async move { client.rewards_at_height(&delegator, &validator, height).await }.boxed()
        })
        .await
    }

    /// Fetches a validator's commission at a height.
    pub async fn get_commission(
        &self,
        chain: &str,
        validator: &str,
        height: i64,
    ) -> Option<Vec<DecCoin>> {
        let key = format!("commission:{chain}:{validator}:{height}");
        let validator = validator.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let validator = validator.clone();
            async move { client.commission_at_height(&validator, height).await }.boxed()
        })
        .await
    }

    /// Fetches one governance proposal by id.
    pub async fn get_proposal(&self, chain: &str, id: &str) -> Option<Proposal> {
        let key = format!("proposal:{chain}:{id}");
        let id = id.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let id = id.clone();
            async move { client.proposal(&id).await }.boxed()
        })
        .await
    }

    /// Fetches the staking module parameters.
    pub async fn get_staking_params(&self, chain: &str) -> Option<StakingParams> {
        let key = format!("staking_params:{chain}");
        self.cached_with_failover(chain, key, |client| {
            async move { client.staking_params().await }.boxed()
        })
        .await
    }

    /// Fetches one IBC channel end.
    pub async fn get_ibc_channel(
        &self,
        chain: &str,
        channel_id: &str,
        port_id: &str,
    ) -> Option<IbcChannel> {
        let key = format!("channel:{chain}:{channel_id}:{port_id}");
        let channel_id = channel_id.to_string();
        let port_id = port_id.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let channel_id = channel_id.clone();
            let port_id = port_id.clone();
            async move { client.ibc_channel(&channel_id, &port_id).await }.boxed()
        })
        .await
    }

    /// Fetches the chain id on the counterparty end of an IBC connection.
    pub async fn get_ibc_connection_chain_id(
        &self,
        chain: &str,
        connection_id: &str,
    ) -> Option<String> {
        let key = format!("connection_chain_id:{chain}:{connection_id}");
        let connection_id = connection_id.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let connection_id = connection_id.clone();
            async move {
                client
                    .ibc_connection_client_state(&connection_id)
                    .await
                    .map(|state| state.chain_id)
            }
            .boxed()
        })
        .await
    }

    /// Fetches the denom trace behind an `ibc/<hash>` denom.
    pub async fn get_ibc_denom_trace(
        &self,
        chain: &str,
        hash: &str,
    ) -> Option<crate::chain_api::DenomTrace> {
        let key = format!("denom_trace:{chain}:{hash}");
        let hash = hash.to_string();
        self.cached_with_failover(chain, key, move |client| {
            let hash = hash.clone();
            async move { client.ibc_denom_trace(&hash).await }.boxed()
        })
        .await
    }

    /// Fetches the external chain registry listing (cache-aside, no
    /// per-chain failover: the registry is a single collaborator).
    pub async fn get_registry_chains(&self) -> Option<Vec<RegistryChain>> {
        const KEY: &str = "registry:chains";
        if let Some(chains) = self.cache.get::<Vec<RegistryChain>>(KEY) {
            return Some(chains);
        }
        match self.registry.chains().await {
            Ok(chains) => {
                self.cache.set(KEY, chains.clone());
                Some(chains)
            }
            Err(error) => {
                tracing::error!(%error, "Chain registry listing query failed.");
                None
            }
        }
    }

    /// Fetches one chain's assetlist from the external registry.
    pub async fn get_registry_assets(&self, chain_name: &str) -> Option<Vec<RegistryAsset>> {
        let key = format!("registry:assets:{chain_name}");
        if let Some(assets) = self.cache.get::<Vec<RegistryAsset>>(&key) {
            return Some(assets);
        }
        match self.registry.assetlist(chain_name).await {
            Ok(assets) => {
                self.cache.set(&key, assets.clone());
                Some(assets)
            }
            Err(error) => {
                tracing::error!(chain_name, %error, "Chain registry assetlist query failed.");
                None
            }
        }
    }

    /// Fetches the USD spot price for a denom, if it names a price source
    /// currency.
    pub async fn get_price(&self, info: &DenomInfo) -> Option<f64> {
        let currency = info.coingecko_currency.as_ref()?;
        let key = format!("price:coingecko:{currency}");
        if let Some(price) = self.cache.get::<f64>(&key) {
            return Some(price);
        }

        let fetcher = self.price_fetchers.get("coingecko")?;
        match fetcher.get_prices(std::slice::from_ref(currency)).await {
            Ok(prices) => {
                for (currency, price) in &prices {
                    self.cache.set(&format!("price:coingecko:{currency}"), *price);
                }
                prices.get(currency).copied()
            }
            Err(error) => {
                tracing::error!(currency, %error, "Price query failed.");
                None
            }
        }
    }

    /// Resolves and applies denom metadata plus spot price to one amount.
    /// Unresolvable denoms leave the amount untouched: raw on-chain denom,
    /// no price.
    #[tracing::instrument(skip(self, amount), level = "debug")]
    pub async fn populate_amount(&self, chain_name: &str, amount: &mut Amount) {
        let Some(chain) = self.config.chain_by_name(chain_name) else {
            return;
        };
        let Some(info) = self.resolve_denom_info(&chain.chain_id, &amount.denom).await else {
            tracing::debug!(
                chain = chain_name,
                denom = %amount.denom,
                "Denom did not resolve, reporting raw value."
            );
            return;
        };
        let price = self.get_price(&info).await;
        amount.enrich(&info, price);
    }

    /// Applies [`DataFetcher::populate_amount`] to a slice of amounts.
    pub async fn populate_amounts(&self, chain_name: &str, amounts: &mut [Amount]) {
        for amount in amounts {
            self.populate_amount(chain_name, amount).await;
        }
    }

    /// Attaches an explorer href and an alias title to a wallet link.
    pub fn enrich_wallet_link(&self, chain_name: &str, subscription: &str, link: &mut Link) {
        if let Some(chain) = self.config.chain_by_name(chain_name) {
            if let Some(explorer) = &chain.explorer {
                link.href = explorer.wallet_link(&link.value);
            }
        }
        link.title = self.aliases.get(subscription, chain_name, &link.value);
    }

    /// Attaches an explorer href and the moniker title to a validator link.
    pub async fn enrich_validator_link(&self, chain_name: &str, link: &mut Link) {
        if let Some(chain) = self.config.chain_by_name(chain_name) {
            if let Some(explorer) = &chain.explorer {
                link.href = explorer.validator_link(&link.value);
            }
        }
        if let Some(validator) = self.get_validator(chain_name, &link.value).await {
            if !validator.description.moniker.is_empty() {
                link.title = Some(validator.description.moniker);
            }
        }
    }

    /// Attaches an explorer href and the proposal title to a proposal link.
    pub async fn enrich_proposal_link(&self, chain_name: &str, link: &mut Link) {
        if let Some(chain) = self.config.chain_by_name(chain_name) {
            if let Some(explorer) = &chain.explorer {
                link.href = explorer.proposal_link(&link.value);
            }
        }
        if let Some(proposal) = self.get_proposal(chain_name, &link.value).await {
            if let Some(content) = proposal.content {
                if !content.title.is_empty() {
                    link.title = Some(content.title);
                }
            }
        }
    }

    /// Attaches explorer hrefs to a transaction's hash and height links.
    pub fn enrich_transaction_links(&self, chain_name: &str, hash: &mut Link, height: &mut Link) {
        let Some(chain) = self.config.chain_by_name(chain_name) else {
            return;
        };
        if let Some(explorer) = &chain.explorer {
            hash.href = explorer.transaction_link(&hash.value);
            height.href = explorer.block_link(&height.value);
        }
    }

    /// The configuration of one chain, by name.
    pub fn chain_config(&self, name: &str) -> Option<&ChainConfig> {
        self.config.chain_by_name(name)
    }
}
