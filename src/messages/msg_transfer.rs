//! IBC fungible token transfer messages (the sending side).

use async_trait::async_trait;
use prost::Message as _;

use super::{
    proto::MsgTransfer as MsgTransferProto,
    registry::{MessageRegistry, ParseError},
};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Amount, Link, Message},
};

/// The type URL this parser is registered under.
pub const TYPE_URL: &str = "/ibc.applications.transfer.v1.MsgTransfer";

/// A parsed `MsgTransfer`.
///
/// The receiver lives on the counterparty chain, so it never gets an
/// explorer link from this chain's configuration.
#[derive(Debug)]
pub struct MsgTransfer {
    chain: String,
    /// Sender on this chain.
    pub sender: Link,
    /// Receiver on the counterparty chain.
    pub receiver: Link,
    /// Channel the transfer leaves through.
    pub source_channel: String,
    /// Transferred amount.
    pub amount: Amount,
}

/// Decodes a `MsgTransfer` payload.
pub fn parse(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgTransferProto::decode(data)?;
    let amount = match &msg.token {
        Some(coin) => Amount::from_coin(&coin.amount, &coin.denom),
        None => Amount::from_coin("0", ""),
    };
    Ok(Some(Box::new(MsgTransfer {
        chain: chain.name.clone(),
        sender: Link::new(msg.sender),
        receiver: Link::new(msg.receiver),
        source_channel: msg.source_channel,
        amount,
    })))
}

#[async_trait]
impl Message for MsgTransfer {
    fn message_type(&self) -> &'static str {
        TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), TYPE_URL.to_string()),
            ("ibc_transfer.sender".to_string(), self.sender.value.clone()),
            ("ibc_transfer.recipient".to_string(), self.receiver.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.populate_amount(&self.chain, &mut self.amount).await;
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.sender);
    }
}
