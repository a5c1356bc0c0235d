//! Authz exec messages: a wrapper executing other messages on a granter's
//! behalf.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::authz::v1beta1::MsgExec as MsgExecProto;
use prost::Message as _;

use super::registry::{MessageRegistry, ParseError};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{Link, Message},
};

/// The type URL this parser is registered under.
pub const TYPE_URL: &str = "/cosmos.authz.v1beta1.MsgExec";

/// A parsed `MsgExec` with its surviving inner messages.
#[derive(Debug)]
pub struct MsgExec {
    chain: String,
    /// The wallet executing on the granter's behalf.
    pub grantee: Link,
    inner: Vec<Box<dyn Message>>,
}

/// Decodes a `MsgExec` payload, recursing into its wrapped messages.
///
/// Each wrapped message goes through the registry under the same policy as a
/// top-level one. A wrapper whose inner messages all decode to nothing
/// decodes to nothing itself.
pub fn parse(
    registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgExecProto::decode(data)?;

    let inner: Vec<Box<dyn Message>> = msg
        .msgs
        .iter()
        .filter_map(|any| registry.parse_any(&any.type_url, &any.value, chain, height))
        .collect();

    if inner.is_empty() {
        return Ok(None);
    }

    Ok(Some(Box::new(MsgExec {
        chain: chain.name.clone(),
        grantee: Link::new(msg.grantee),
        inner,
    })))
}

#[async_trait]
impl Message for MsgExec {
    fn message_type(&self) -> &'static str {
        TYPE_URL
    }

    /// Own pairs plus every inner message's pairs, so filters written
    /// against a plain message also match its authz-wrapped form.
    fn values(&self) -> Vec<(String, String)> {
        let mut values = vec![
            ("message.action".to_string(), TYPE_URL.to_string()),
            ("exec.grantee".to_string(), self.grantee.value.clone()),
        ];
        for message in &self.inner {
            values.extend(message.values());
        }
        values
    }

    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str) {
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.grantee);
        for message in &mut self.inner {
            message.enrich(fetcher, subscription).await;
        }
    }

    fn inner_messages(&self) -> &[Box<dyn Message>] {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::{
        cosmos::{bank::v1beta1::MsgSend as MsgSendProto, base::v1beta1::Coin},
        Any,
    };

    use super::*;
    use crate::messages::test_helpers::test_chain;

    fn send_any() -> Any {
        let send = MsgSendProto {
            from_address: "cosmos1granter".into(),
            to_address: "cosmos1recipient".into(),
            amount: vec![Coin { denom: "uatom".into(), amount: "42".into() }],
        };
        Any {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            value: send.encode_to_vec(),
        }
    }

    #[test]
    fn exec_surfaces_inner_message_values() {
        let proto = MsgExecProto { grantee: "cosmos1grantee".into(), msgs: vec![send_any()] };

        let registry = MessageRegistry::default();
        let message = parse(&registry, &proto.encode_to_vec(), &test_chain(), 12)
            .unwrap()
            .expect("message expected");

        assert_eq!(message.inner_messages().len(), 1);
        let values = message.values();
        assert!(values.contains(&("exec.grantee".to_string(), "cosmos1grantee".to_string())));
        assert!(values.contains(&("transfer.sender".to_string(), "cosmos1granter".to_string())));
    }

    #[test]
    fn exec_with_no_surviving_inner_messages_decodes_to_nothing() {
        let mut chain = test_chain();
        chain.log_unknown_messages = false;

        let proto = MsgExecProto {
            grantee: "cosmos1grantee".into(),
            msgs: vec![Any {
                type_url: "/cosmwasm.wasm.v1.MsgExecuteContract".to_string(),
                value: Vec::new(),
            }],
        };

        let registry = MessageRegistry::default();
        assert!(parse(&registry, &proto.encode_to_vec(), &chain, 12).unwrap().is_none());
    }

    #[test]
    fn exec_keeps_the_surviving_subset_of_inner_messages() {
        let mut chain = test_chain();
        chain.log_unknown_messages = false;

        let proto = MsgExecProto {
            grantee: "cosmos1grantee".into(),
            msgs: vec![
                send_any(),
                Any {
                    type_url: "/cosmwasm.wasm.v1.MsgExecuteContract".to_string(),
                    value: Vec::new(),
                },
            ],
        };

        let registry = MessageRegistry::default();
        let message = parse(&registry, &proto.encode_to_vec(), &chain, 12)
            .unwrap()
            .expect("message expected");
        assert_eq!(message.inner_messages().len(), 1);
    }
}
