//! The open, additive mapping from protobuf type-URL to message parser.
//!
//! New message kinds are added purely by registering a new tag/parser pair;
//! nothing else changes. The registry also owns the per-message failure
//! policy: an unregistered tag becomes a placeholder (or nothing, per chain
//! configuration) and a failed decode becomes an error placeholder, so one
//! bad message never aborts its transaction.

use std::collections::HashMap;

use thiserror::Error;

use super::placeholders::{MsgError, MsgUnsupportedMessage};
use crate::{config::ChainConfig, models::Message};

/// An error produced while decoding one message's bytes.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The protobuf payload did not decode as the registered type.
    #[error("Protobuf decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// A registered parser: `(registry, bytes, chain, height)` to an optional
/// parsed message. `Ok(None)` means "decoded to nothing meaningful".
/// Wrapper parsers use the registry argument to parse their inner payloads.
pub type ParserFn = fn(
    &MessageRegistry,
    &[u8],
    &ChainConfig,
    i64,
) -> Result<Option<Box<dyn Message>>, ParseError>;

/// Type-URL-keyed parser registry.
pub struct MessageRegistry {
    parsers: HashMap<String, ParserFn>,
}

impl MessageRegistry {
    /// Creates a registry with no parsers registered.
    pub fn empty() -> Self {
        Self { parsers: HashMap::new() }
    }

    /// Registers a parser under a type URL, replacing any previous one.
    pub fn register(&mut self, type_url: impl Into<String>, parser: ParserFn) {
        self.parsers.insert(type_url.into(), parser);
    }

    /// Whether a parser is registered for the tag.
    pub fn contains(&self, type_url: &str) -> bool {
        self.parsers.contains_key(type_url)
    }

    /// Decodes one opaque payload by tag, applying the failure policy.
    ///
    /// - unregistered tag: `MsgUnsupportedMessage` placeholder when the
    ///   chain logs unknown messages, otherwise nothing;
    /// - registered but failing to decode: `MsgError` placeholder;
    /// - decoded to nothing meaningful: nothing.
    pub fn parse_any(
        &self,
        type_url: &str,
        value: &[u8],
        chain: &ChainConfig,
        height: i64,
    ) -> Option<Box<dyn Message>> {
        let Some(parser) = self.parsers.get(type_url) else {
            if chain.log_unknown_messages {
                tracing::info!(chain = %chain.name, type_url, "Unsupported message type.");
                return Some(Box::new(MsgUnsupportedMessage::new(type_url)));
            }
            tracing::debug!(chain = %chain.name, type_url, "Dropping unsupported message type.");
            return None;
        };

        match parser(self, value, chain, height) {
            Ok(message) => message,
            Err(error) => {
                tracing::warn!(chain = %chain.name, type_url, %error, "Message decode failed.");
                Some(Box::new(MsgError::new(format!("{type_url}: {error}"))))
            }
        }
    }
}

impl Default for MessageRegistry {
    /// A registry with every built-in parser registered.
    fn default() -> Self {
        let mut registry = Self::empty();

        registry.register("/cosmos.bank.v1beta1.MsgSend", super::msg_send::parse);
        registry.register("/cosmos.staking.v1beta1.MsgDelegate", super::msg_delegate::parse_delegate);
        registry
            .register("/cosmos.staking.v1beta1.MsgUndelegate", super::msg_delegate::parse_undelegate);
        registry.register(
            "/cosmos.staking.v1beta1.MsgBeginRedelegate",
            super::msg_delegate::parse_redelegate,
        );
        registry.register(
            "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward",
            super::msg_withdraw::parse_delegator_reward,
        );
        registry.register(
            "/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission",
            super::msg_withdraw::parse_validator_commission,
        );
        registry.register("/cosmos.gov.v1beta1.MsgVote", super::msg_vote::parse);
        registry.register("/cosmos.authz.v1beta1.MsgExec", super::msg_exec::parse);
        registry.register("/ibc.applications.transfer.v1.MsgTransfer", super::msg_transfer::parse);
        registry.register("/ibc.core.channel.v1.MsgRecvPacket", super::msg_recv_packet::parse);

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(log_unknown: bool) -> ChainConfig {
        let mut chain: ChainConfig = serde_json::from_str(
            r#"{
                "name": "testchain",
                "chain_id": "test-1",
                "tendermint_nodes": ["wss://rpc.example.com/websocket"],
                "api_nodes": ["https://api.example.com"]
            }"#,
        )
        .unwrap();
        chain.log_unknown_messages = log_unknown;
        chain
    }

    #[test]
    fn unknown_tag_yields_placeholder_when_chain_logs_unknown() {
        let registry = MessageRegistry::default();
        let message = registry
            .parse_any("/cosmwasm.wasm.v1.MsgExecuteContract", &[], &chain(true), 1)
            .expect("placeholder expected");
        assert_eq!(message.message_type(), "MsgUnsupportedMessage");
    }

    #[test]
    fn unknown_tag_yields_nothing_when_chain_drops_unknown() {
        let registry = MessageRegistry::default();
        assert!(registry
            .parse_any("/cosmwasm.wasm.v1.MsgExecuteContract", &[], &chain(false), 1)
            .is_none());
    }

    #[test]
    fn registered_tag_with_garbage_bytes_yields_error_placeholder() {
        let registry = MessageRegistry::default();
        let message = registry
            .parse_any("/cosmos.gov.v1beta1.MsgVote", &[0xff, 0xff, 0xff], &chain(true), 1)
            .expect("error placeholder expected");
        assert_eq!(message.message_type(), "MsgError");
    }

    #[test]
    fn registration_is_additive() {
        let mut registry = MessageRegistry::empty();
        assert!(!registry.contains("/cosmos.bank.v1beta1.MsgSend"));
        registry.register("/cosmos.bank.v1beta1.MsgSend", super::super::msg_send::parse);
        assert!(registry.contains("/cosmos.bank.v1beta1.MsgSend"));
    }
}
