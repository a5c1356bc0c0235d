//! One REST client per configured API node. Every call produces a
//! [`QueryInfo`] that is handed to the metrics collector and never affects
//! control flow.

use std::{sync::Arc, time::Instant};

use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::types::{
    ChannelResponse, CommissionResponse, ConnectionClientStateResponse, DecCoin,
    DenomTraceResponse, ClientState, DenomTrace, IbcChannel, Proposal, ProposalResponse,
    RewardsResponse, StakingParams, StakingParamsResponse, Validator, ValidatorResponse,
};
use crate::{metrics::AppMetrics, models::QueryInfo};

/// Header carrying the historical block height for state queries.
const BLOCK_HEIGHT_HEADER: &str = "x-cosmos-block-height";

/// Custom error type for chain API operations.
#[derive(Debug, Error)]
pub enum ChainApiError {
    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The response body could not be read or decoded.
    #[error("Response decode failed: {0}")]
    Decode(#[from] reqwest::Error),

    /// The node answered with a non-success status.
    #[error("Node returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A typed REST client bound to a single API node.
pub struct ChainApiClient {
    chain: String,
    base: String,
    host: String,
    client: ClientWithMiddleware,
    metrics: Arc<AppMetrics>,
}

impl ChainApiClient {
    /// Creates a client for one API node of `chain`.
    pub fn new(
        chain: impl Into<String>,
        base: &Url,
        client: ClientWithMiddleware,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        let host = base.host_str().unwrap_or("unknown").to_string();
        Self {
            chain: chain.into(),
            base: base.as_str().trim_end_matches('/').to_string(),
            host,
            client,
            metrics,
        }
    }

    /// The host this client queries, used in logs and query outcomes.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Performs one GET, recording a [`QueryInfo`] outcome with the metrics
    /// collector regardless of success.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[(&str, String)],
    ) -> Result<T, ChainApiError> {
        let started = Instant::now();
        let result = self.do_get(path, headers).await;

        let query_info = QueryInfo {
            success: result.is_ok(),
            elapsed: started.elapsed(),
            node: self.host.clone(),
        };
        self.metrics.record_query(&self.chain, &query_info);

        result
    }

    async fn do_get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[(&str, String)],
    ) -> Result<T, ChainApiError> {
        let url = format!("{}{}", self.base, path);
        let mut request = self.client.get(&url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChainApiError::Status(status));
        }

        Ok(response.json::<T>().await?)
    }

    /// Fetches one validator by operator address.
    pub async fn validator(&self, address: &str) -> Result<Validator, ChainApiError> {
        let response: ValidatorResponse = self
            .get_json(&format!("/cosmos/staking/v1beta1/validators/{address}"), &[])
            .await?;
        Ok(response.validator)
    }

    /// Fetches a delegator's accrued rewards from one validator, at a
    /// historical height.
    pub async fn rewards_at_height(
        &self,
        delegator: &str,
        validator: &str,
        height: i64,
    ) -> Result<Vec<DecCoin>, ChainApiError> {
        let response: RewardsResponse = self
            .get_json(
                &format!("/cosmos/distribution/v1beta1/delegators/{delegator}/rewards/{validator}"),
                &[(BLOCK_HEIGHT_HEADER, height.to_string())],
            )
            .await?;
        Ok(response.rewards)
    }

    /// Fetches a validator's accrued commission at a historical height.
    pub async fn commission_at_height(
        &self,
        validator: &str,
        height: i64,
    ) -> Result<Vec<DecCoin>, ChainApiError> {
        let response: CommissionResponse = self
            .get_json(
                &format!("/cosmos/distribution/v1beta1/validators/{validator}/commission"),
                &[(BLOCK_HEIGHT_HEADER, height.to_string())],
            )
            .await?;
        Ok(response.commission.commission)
    }

    /// Fetches one governance proposal by id.
    pub async fn proposal(&self, id: &str) -> Result<Proposal, ChainApiError> {
        let response: ProposalResponse =
            self.get_json(&format!("/cosmos/gov/v1beta1/proposals/{id}"), &[]).await?;
        Ok(response.proposal)
    }

    /// Fetches the staking module parameters.
    pub async fn staking_params(&self) -> Result<StakingParams, ChainApiError> {
        let response: StakingParamsResponse =
            self.get_json("/cosmos/staking/v1beta1/params", &[]).await?;
        Ok(response.params)
    }

    /// Fetches one IBC channel end.
    pub async fn ibc_channel(
        &self,
        channel_id: &str,
        port_id: &str,
    ) -> Result<IbcChannel, ChainApiError> {
        let response: ChannelResponse = self
            .get_json(&format!("/ibc/core/channel/v1/channels/{channel_id}/ports/{port_id}"), &[])
            .await?;
        Ok(response.channel)
    }

    /// Fetches the counterparty client state of an IBC connection.
    pub async fn ibc_connection_client_state(
        &self,
        connection_id: &str,
    ) -> Result<ClientState, ChainApiError> {
        let response: ConnectionClientStateResponse = self
            .get_json(&format!("/ibc/core/connection/v1/connections/{connection_id}/client_state"), &[])
            .await?;
        Ok(response.identified_client_state.client_state)
    }

    /// Fetches the denom trace behind an `ibc/<hash>` denom.
    pub async fn ibc_denom_trace(&self, hash: &str) -> Result<DenomTrace, ChainApiError> {
        let response: DenomTraceResponse =
            self.get_json(&format!("/ibc/apps/transfer/v1/denom_traces/{hash}"), &[]).await?;
        Ok(response.denom_trace)
    }
}
