//! Conversion from raw node subscription events to reportable payloads.
//!
//! One converter per chain turns each [`NodeEvent`] into at most one
//! [`Reportable`]: a parsed transaction, an error payload, or nothing when
//! chain policy says to drop it. Conversion never fails outward; every
//! failure mode is itself a payload or a drop.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cosmos_sdk_proto::cosmos::tx::v1beta1::Tx as TxProto;
use prost::Message as _;

use crate::{
    config::{matches_filters, ChainConfig},
    messages::MessageRegistry,
    models::{sha256_hex, Link, Message, Reportable, Tx, TxError},
    providers::{EventData, NodeEvent, TxEventValue, TX_EVENT_TYPE},
};

/// Subscription errors that are expected churn, never worth reporting.
const BENIGN_ERRORS: &[&str] = &["already subscribed"];

/// Per-chain event-to-reportable converter.
pub struct Converter {
    chain: ChainConfig,
    registry: Arc<MessageRegistry>,
}

impl Converter {
    /// Creates a converter for one chain.
    pub fn new(chain: ChainConfig, registry: Arc<MessageRegistry>) -> Self {
        Self { chain, registry }
    }

    /// Converts one subscription event. `None` means the event was dropped
    /// by policy: benign errors, suppressed failure classes, non-transaction
    /// deliveries, and transactions with no surviving messages.
    pub fn convert(&self, event: NodeEvent) -> Option<Reportable> {
        match event {
            NodeEvent::Error(error) => self.convert_error(error),
            NodeEvent::Event(result) => self.convert_event(&result),
            // Disconnects are reported by the node manager, which knows the
            // node identity.
            NodeEvent::Disconnected(_) => None,
        }
    }

    fn convert_error(&self, error: String) -> Option<Reportable> {
        if BENIGN_ERRORS.iter().any(|benign| error.contains(benign)) {
            tracing::debug!(chain = %self.chain.name, error, "Ignoring benign node error.");
            return None;
        }
        if !self.chain.log_node_errors {
            tracing::debug!(chain = %self.chain.name, error, "Suppressing node error by policy.");
            return None;
        }
        Some(Reportable::TxError(TxError { error }))
    }

    fn convert_event(&self, result: &serde_json::Value) -> Option<Reportable> {
        let data = result.get("data")?;
        let data: EventData = match serde_json::from_value(data.clone()) {
            Ok(data) => data,
            Err(error) => {
                return self.decode_error(format!("Malformed event data: {error}"));
            }
        };
        if data.kind != TX_EVENT_TYPE {
            tracing::debug!(chain = %self.chain.name, kind = %data.kind, "Skipping non-Tx event.");
            return None;
        }

        let value: TxEventValue = match serde_json::from_value(data.value) {
            Ok(value) => value,
            Err(error) => {
                return self.decode_error(format!("Malformed Tx event payload: {error}"));
            }
        };
        let tx_result = value.tx_result;

        let tx_bytes = match BASE64.decode(&tx_result.tx) {
            Ok(bytes) => bytes,
            Err(error) => {
                return self.decode_error(format!("Transaction is not valid base64: {error}"));
            }
        };
        let hash = sha256_hex(&tx_bytes);

        if tx_result.result.code != 0 {
            if !self.chain.log_failed_transactions {
                tracing::debug!(
                    chain = %self.chain.name,
                    hash,
                    code = tx_result.result.code,
                    "Dropping failed transaction by policy."
                );
                return None;
            }
            tracing::debug!(
                chain = %self.chain.name,
                hash,
                code = tx_result.result.code,
                log = %tx_result.result.log,
                "Transaction failed on chain, reporting it anyway."
            );
        }

        let decoded = match TxProto::decode(tx_bytes.as_slice()) {
            Ok(decoded) => decoded,
            Err(error) => {
                return self.decode_error(format!("Transaction {hash} did not decode: {error}"));
            }
        };
        let body = decoded.body?;
        let height: i64 = tx_result.height.parse().unwrap_or_default();

        let messages_count = body.messages.len();
        let messages: Vec<Box<dyn Message>> = body
            .messages
            .iter()
            .filter_map(|any| self.registry.parse_any(&any.type_url, &any.value, &self.chain, height))
            .filter(|message| matches_filters(&self.chain.filters, &message.values()))
            .collect();

        if messages.is_empty() {
            tracing::debug!(chain = %self.chain.name, hash, "No messages survived, dropping.");
            return None;
        }

        Some(Reportable::Tx(Tx {
            hash: Link::new(hash),
            height: Link::new(tx_result.height),
            memo: body.memo,
            messages,
            messages_count,
        }))
    }

    fn decode_error(&self, error: String) -> Option<Reportable> {
        tracing::warn!(chain = %self.chain.name, %error, "Event decode failed.");
        if !self.chain.log_failed_transactions {
            return None;
        }
        Some(Reportable::TxError(TxError { error }))
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::{
        cosmos::{
            bank::v1beta1::MsgSend,
            base::v1beta1::Coin,
            tx::v1beta1::{Tx as TxProto, TxBody},
        },
        Any,
    };
    use serde_json::json;

    use super::*;
    use crate::messages::test_helpers::test_chain;

    fn converter(chain: ChainConfig) -> Converter {
        Converter::new(chain, Arc::new(MessageRegistry::default()))
    }

    fn tx_event(tx: &TxProto, code: u32, log: &str) -> NodeEvent {
        NodeEvent::Event(json!({
            "query": "tm.event = 'Tx'",
            "data": {
                "type": "tendermint/event/Tx",
                "value": {
                    "TxResult": {
                        "height": "123456",
                        "tx": BASE64.encode(tx.encode_to_vec()),
                        "result": {"code": code, "log": log}
                    }
                }
            }
        }))
    }

    fn send_tx(memo: &str) -> TxProto {
        let send = MsgSend {
            from_address: "cosmos1sender".into(),
            to_address: "cosmos1recipient".into(),
            amount: vec![Coin { denom: "uatom".into(), amount: "1000".into() }],
        };
        TxProto {
            body: Some(TxBody {
                messages: vec![Any {
                    type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
                    value: send.encode_to_vec(),
                }],
                memo: memo.to_string(),
                ..Default::default()
            }),
            auth_info: None,
            signatures: Vec::new(),
        }
    }

    #[test]
    fn converts_successful_transaction() {
        let reportable = converter(test_chain())
            .convert(tx_event(&send_tx("hello"), 0, ""))
            .expect("reportable expected");

        let Reportable::Tx(tx) = reportable else {
            panic!("expected a Tx");
        };
        assert_eq!(tx.memo, "hello");
        assert_eq!(tx.messages_count, 1);
        assert_eq!(tx.messages.len(), 1);
        assert_eq!(tx.height.value, "123456");
        assert_eq!(tx.hash.value.len(), 64);
    }

    #[test]
    fn failed_transaction_is_still_parsed_when_chain_logs_failures() {
        let reportable = converter(test_chain())
            .convert(tx_event(&send_tx("fee too low retry"), 5, "insufficient funds"))
            .expect("reportable expected");
        let Reportable::Tx(tx) = reportable else {
            panic!("expected a parsed Tx for a failed transaction");
        };
        assert_eq!(tx.messages.len(), 1);
        assert_eq!(tx.memo, "fee too low retry");
        assert_eq!(tx.hash.value.len(), 64);
    }

    #[test]
    fn failed_transaction_is_dropped_when_policy_says_so() {
        let mut chain = test_chain();
        chain.log_failed_transactions = false;
        assert!(converter(chain).convert(tx_event(&send_tx(""), 5, "boom")).is_none());
    }

    #[test]
    fn benign_subscription_error_is_dropped() {
        let event = NodeEvent::Error("already subscribed".to_string());
        assert!(converter(test_chain()).convert(event).is_none());
    }

    #[test]
    fn node_error_becomes_error_payload_by_default() {
        let event = NodeEvent::Error("Internal error".to_string());
        let reportable = converter(test_chain()).convert(event).expect("reportable expected");
        assert!(matches!(reportable, Reportable::TxError(_)));
    }

    #[test]
    fn node_error_is_dropped_when_policy_says_so() {
        let mut chain = test_chain();
        chain.log_node_errors = false;
        assert!(converter(chain).convert(NodeEvent::Error("Internal error".into())).is_none());
    }

    #[test]
    fn transaction_with_no_matching_messages_is_dropped() {
        let mut chain = test_chain();
        chain.filters =
            vec!["transfer.recipient = 'cosmos1someoneelse'".parse().unwrap()];
        assert!(converter(chain).convert(tx_event(&send_tx(""), 0, "")).is_none());
    }

    #[test]
    fn matching_filter_keeps_the_message() {
        let mut chain = test_chain();
        chain.filters = vec!["transfer.recipient = 'cosmos1recipient'".parse().unwrap()];
        let reportable = converter(chain)
            .convert(tx_event(&send_tx(""), 0, ""))
            .expect("reportable expected");
        assert!(matches!(reportable, Reportable::Tx(_)));
    }

    #[test]
    fn unsupported_message_is_counted_but_reported_as_placeholder() {
        let tx = TxProto {
            body: Some(TxBody {
                messages: vec![Any {
                    type_url: "/cosmwasm.wasm.v1.MsgExecuteContract".to_string(),
                    value: Vec::new(),
                }],
                ..Default::default()
            }),
            auth_info: None,
            signatures: Vec::new(),
        };

        let reportable =
            converter(test_chain()).convert(tx_event(&tx, 0, "")).expect("reportable expected");
        let Reportable::Tx(tx) = reportable else {
            panic!("expected a Tx");
        };
        assert_eq!(tx.messages.len(), 1);
        assert_eq!(tx.messages[0].message_type(), "MsgUnsupportedMessage");
    }
}
