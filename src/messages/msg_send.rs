//! Bank send messages.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend as MsgSendProto;
use prost::Message as _;

use super::registry::{MessageRegistry, ParseError};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Amount, Link, Message},
};

/// The type URL this parser is registered under.
pub const TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";

/// A parsed `MsgSend`.
#[derive(Debug)]
pub struct MsgSend {
    chain: String,
    /// Sending wallet.
    pub from: Link,
    /// Receiving wallet.
    pub to: Link,
    /// Transferred amounts.
    pub amounts: Vec<Amount>,
}

/// Decodes a `MsgSend` payload.
pub fn parse(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgSendProto::decode(data)?;
    Ok(Some(Box::new(MsgSend {
        chain: chain.name.clone(),
        from: Link::new(msg.from_address),
        to: Link::new(msg.to_address),
        amounts: msg
            .amount
            .iter()
            .map(|coin| Amount::from_coin(&coin.amount, &coin.denom))
            .collect(),
    })))
}

#[async_trait]
impl Message for MsgSend {
    fn message_type(&self) -> &'static str {
        TYPE_URL
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), TYPE_URL.to_string()),
            ("transfer.sender".to_string(), self.from.value.clone()),
            ("transfer.recipient".to_string(), self.to.value.clone()),
        ]
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.populate_amounts(&self.chain, &mut self.amounts).await;
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.from);
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.to);
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

    use super::*;
    use crate::messages::test_helpers::test_chain;

    #[test]
    fn parses_send_with_amounts() {
        let proto = MsgSendProto {
            from_address: "cosmos1sender".into(),
            to_address: "cosmos1recipient".into(),
            amount: vec![Coin { denom: "uatom".into(), amount: "100000000".into() }],
        };

        let registry = MessageRegistry::default();
        let message = parse(&registry, &proto.encode_to_vec(), &test_chain(), 10)
            .unwrap()
            .expect("message expected");

        assert_eq!(message.message_type(), TYPE_URL);
        let values = message.values();
        assert!(values.contains(&("transfer.sender".to_string(), "cosmos1sender".to_string())));
        assert!(values
            .contains(&("transfer.recipient".to_string(), "cosmos1recipient".to_string())));
    }
}
