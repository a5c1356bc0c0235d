//! Staking messages: delegate, undelegate, redelegate.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::staking::v1beta1::{
    MsgBeginRedelegate as MsgBeginRedelegateProto, MsgDelegate as MsgDelegateProto,
    MsgUndelegate as MsgUndelegateProto,
};
use prost::Message as _;

use super::registry::{MessageRegistry, ParseError};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Amount, Link, Message},
};

const DELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgDelegate";
const UNDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
const REDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";

/// A parsed `MsgDelegate`.
#[derive(Debug)]
pub struct MsgDelegate {
    chain: String,
    /// Delegating wallet.
    pub delegator: Link,
    /// Validator receiving the delegation.
    pub validator: Link,
    /// Delegated amount.
    pub amount: Amount,
}

/// Decodes a `MsgDelegate` payload.
pub fn parse_delegate(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgDelegateProto::decode(data)?;
    Ok(Some(Box::new(MsgDelegate {
        chain: chain.name.clone(),
        delegator: Link::new(msg.delegator_address),
        validator: Link::new(msg.validator_address),
        amount: coin_amount(msg.amount.as_ref()),
    })))
}

#[async_trait]
impl Message for MsgDelegate {
    fn message_type(&self) -> &'static str {
        DELEGATE_TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), DELEGATE_TYPE_URL.to_string()),
            ("delegate.delegator".to_string(), self.delegator.value.clone()),
            ("delegate.validator".to_string(), self.validator.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.populate_amount(&self.chain, &mut self.amount).await;
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.delegator);
        fetcher.enrich_validator_link(&self.chain, &mut self.validator).await;
    }
}

/// A parsed `MsgUndelegate`.
#[derive(Debug)]
pub struct MsgUndelegate {
    chain: String,
    /// Undelegating wallet.
    pub delegator: Link,
    /// Validator being undelegated from.
    pub validator: Link,
    /// Undelegated amount.
    pub amount: Amount,
    /// Unbonding period of the chain, e.g. `"1814400s"`.
    pub unbonding_time: Option<String>,
}

/// Decodes a `MsgUndelegate` payload.
pub fn parse_undelegate(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgUndelegateProto::decode(data)?;
    Ok(Some(Box::new(MsgUndelegate {
        chain: chain.name.clone(),
        delegator: Link::new(msg.delegator_address),
        validator: Link::new(msg.validator_address),
        amount: coin_amount(msg.amount.as_ref()),
        unbonding_time: None,
    })))
}

#[async_trait]
impl Message for MsgUndelegate {
    fn message_type(&self) -> &'static str {
        UNDELEGATE_TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), UNDELEGATE_TYPE_URL.to_string()),
            ("unbond.delegator".to_string(), self.delegator.value.clone()),
            ("unbond.validator".to_string(), self.validator.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.populate_amount(&self.chain, &mut self.amount).await;
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.delegator);
        fetcher.enrich_validator_link(&self.chain, &mut self.validator).await;
        self.unbonding_time = fetcher
            .get_staking_params(&self.chain)
            .await
            .map(|params| params.unbonding_time);
    }
}

/// A parsed `MsgBeginRedelegate`.
#[derive(Debug)]
pub struct MsgBeginRedelegate {
    chain: String,
    /// Redelegating wallet.
    pub delegator: Link,
    /// Validator the stake moves away from.
    pub validator_src: Link,
    /// Validator the stake moves to.
    pub validator_dst: Link,
    /// Redelegated amount.
    pub amount: Amount,
}

/// Decodes a `MsgBeginRedelegate` payload.
pub fn parse_redelegate(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgBeginRedelegateProto::decode(data)?;
    Ok(Some(Box::new(MsgBeginRedelegate {
        chain: chain.name.clone(),
        delegator: Link::new(msg.delegator_address),
        validator_src: Link::new(msg.validator_src_address),
        validator_dst: Link::new(msg.validator_dst_address),
        amount: coin_amount(msg.amount.as_ref()),
    })))
}

#[async_trait]
impl Message for MsgBeginRedelegate {
    fn message_type(&self) -> &'static str {
        REDELEGATE_TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), REDELEGATE_TYPE_URL.to_string()),
            ("redelegate.delegator".to_string(), self.delegator.value.clone()),
            ("redelegate.source_validator".to_string(), self.validator_src.value.clone()),
            ("redelegate.destination_validator".to_string(), self.validator_dst.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.populate_amount(&self.chain, &mut self.amount).await;
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.delegator);
        fetcher.enrich_validator_link(&self.chain, &mut self.validator_src).await;
        fetcher.enrich_validator_link(&self.chain, &mut self.validator_dst).await;
    }
}

fn coin_amount(coin: Option<&cosmos_sdk_proto::cosmos::base::v1beta1::Coin>) -> Amount {
    match coin {
        Some(coin) => Amount::from_coin(&coin.amount, &coin.denom),
        None => Amount::from_coin("0", ""),
    }
}
