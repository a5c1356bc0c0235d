//! Distribution messages: reward and commission withdrawals.
//!
//! The withdrawn amounts are not part of the message payload; they are
//! queried from the distribution module at the block just before the
//! withdrawal executed.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::distribution::v1beta1::{
    MsgWithdrawDelegatorReward as MsgWithdrawDelegatorRewardProto,
    MsgWithdrawValidatorCommission as MsgWithdrawValidatorCommissionProto,
};
use prost::Message as _;

use super::registry::{MessageRegistry, ParseError};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Amount, Link, Message},
};

const REWARD_TYPE_URL: &str = "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";
const COMMISSION_TYPE_URL: &str = "/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission";

/// A parsed `MsgWithdrawDelegatorReward`.
#[derive(Debug)]
pub struct MsgWithdrawDelegatorReward {
    chain: String,
    height: i64,
    /// Withdrawing wallet.
    pub delegator: Link,
    /// Validator the rewards accrued with.
    pub validator: Link,
    /// Withdrawn amounts, filled in by enrichment.
    pub amounts: Vec<Amount>,
}

/// Decodes a `MsgWithdrawDelegatorReward` payload.
pub fn parse_delegator_reward(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgWithdrawDelegatorRewardProto::decode(data)?;
    Ok(Some(Box::new(MsgWithdrawDelegatorReward {
        chain: chain.name.clone(),
        height,
        delegator: Link::new(msg.delegator_address),
        validator: Link::new(msg.validator_address),
        amounts: Vec::new(),
    })))
}

#[async_trait]
impl Message for MsgWithdrawDelegatorReward {
    fn message_type(&self) -> &'static str {
        REWARD_TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), REWARD_TYPE_URL.to_string()),
            ("withdraw_rewards.delegator".to_string(), self.delegator.value.clone()),
            ("withdraw_rewards.validator".to_string(), self.validator.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        if let Some(rewards) = fetcher
            .get_rewards(&self.chain, &self.delegator.value, &self.validator.value, self.height - 1)
            .await
        {
            self.amounts =
                rewards.iter().map(|coin| Amount::from_coin(&coin.amount, &coin.denom)).collect();
            fetcher.populate_amounts(&self.chain, &mut self.amounts).await;
        }
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.delegator);
        fetcher.enrich_validator_link(&self.chain, &mut self.validator).await;
    }
}

/// A parsed `MsgWithdrawValidatorCommission`.
#[derive(Debug)]
pub struct MsgWithdrawValidatorCommission {
    chain: String,
    height: i64,
    /// Validator whose commission is withdrawn.
    pub validator: Link,
    /// Withdrawn amounts, filled in by enrichment.
    pub amounts: Vec<Amount>,
}

/// Decodes a `MsgWithdrawValidatorCommission` payload.
pub fn parse_validator_commission(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgWithdrawValidatorCommissionProto::decode(data)?;
    Ok(Some(Box::new(MsgWithdrawValidatorCommission {
        chain: chain.name.clone(),
        height,
        validator: Link::new(msg.validator_address),
        amounts: Vec::new(),
    })))
}

#[async_trait]
impl Message for MsgWithdrawValidatorCommission {
    fn message_type(&self) -> &'static str {
        COMMISSION_TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), COMMISSION_TYPE_URL.to_string()),
            ("withdraw_commission.validator".to_string(), self.validator.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, _subscription: &str) {
        if let Some(commission) =
            fetcher.get_commission(&self.chain, &self.validator.value, self.height - 1).await
        {
            self.amounts = commission
                .iter()
                .map(|coin| Amount::from_coin(&coin.amount, &coin.denom))
                .collect();
            fetcher.populate_amounts(&self.chain, &mut self.amounts).await;
        }
        fetcher.enrich_validator_link(&self.chain, &mut self.validator).await;
    }
}
