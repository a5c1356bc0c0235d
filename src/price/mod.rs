//! Pluggable spot-price sources, keyed by source name.

use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;

/// Custom error type for price fetching.
#[derive(Debug, Error)]
pub enum PriceError {
    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The response body could not be read or decoded.
    #[error("Response decode failed: {0}")]
    Decode(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("Price source returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A source of USD spot prices for a set of currencies.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// The source name this fetcher is registered under.
    fn name(&self) -> &'static str;

    /// Fetches USD prices for the given source-specific currency ids.
    /// Currencies the source does not know are absent from the result.
    async fn get_prices(
        &self,
        currencies: &[String],
    ) -> Result<HashMap<String, f64>, PriceError>;
}

/// A [`PriceFetcher`] backed by the CoinGecko simple-price endpoint.
pub struct CoingeckoPriceFetcher {
    base: String,
    client: ClientWithMiddleware,
}

impl CoingeckoPriceFetcher {
    /// Creates a CoinGecko fetcher over the given base URL.
    pub fn new(base: impl Into<String>, client: ClientWithMiddleware) -> Self {
        let base = base.into();
        Self { base: base.trim_end_matches('/').to_string(), client }
    }
}

#[async_trait]
impl PriceFetcher for CoingeckoPriceFetcher {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn get_prices(
        &self,
        currencies: &[String],
    ) -> Result<HashMap<String, f64>, PriceError> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base,
            currencies.join(",")
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status));
        }

        let body: HashMap<String, HashMap<String, f64>> = response.json().await?;
        Ok(body
            .into_iter()
            .filter_map(|(currency, quotes)| quotes.get("usd").map(|usd| (currency, *usd)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::HttpRetryConfig,
        http_client::{create_base_http_client, create_retryable_http_client},
    };

    #[tokio::test]
    async fn parses_simple_price_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/simple/price?ids=cosmos,osmosis&vs_currencies=usd")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cosmos": {"usd": 6.7}, "osmosis": {"usd": 0.45}}"#)
            .create_async()
            .await;

        let http = create_retryable_http_client(
            &HttpRetryConfig { max_retries: 0, ..Default::default() },
            create_base_http_client(Duration::from_secs(5)).unwrap(),
        );
        let fetcher = CoingeckoPriceFetcher::new(server.url(), http);

        let prices = fetcher
            .get_prices(&["cosmos".to_string(), "osmosis".to_string()])
            .await
            .unwrap();

        assert_eq!(prices.get("cosmos"), Some(&6.7));
        assert_eq!(prices.get("osmosis"), Some(&0.45));
    }
}
