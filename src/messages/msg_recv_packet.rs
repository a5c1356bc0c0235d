//! IBC packet receipt messages (the receiving side of a transfer).
//!
//! Only fungible-token transfer packets are meaningful here; packets whose
//! payload is not `FungibleTokenPacketData` decode to nothing.

use async_trait::async_trait;
use prost::Message as _;

use super::{
    proto::{FungibleTokenPacketData, MsgRecvPacket as MsgRecvPacketProto, Packet},
    registry::{MessageRegistry, ParseError},
};
use crate::{
    config::ChainConfig,
    fetcher::DataFetcher,
    models::{sha256_hex, Amount, Link, Message},
};

/// The type URL this parser is registered under.
pub const TYPE_URL: &str = "/ibc.core.channel.v1.MsgRecvPacket";

/// A fungible-token transfer as received on this chain.
#[derive(Debug)]
pub struct MsgRecvPacket {
    chain: String,
    /// Sender on the counterparty chain.
    pub sender: Link,
    /// Receiver on this chain.
    pub receiver: Link,
    /// Received amount, in this chain's representation of the denom.
    pub amount: Amount,
}

/// Decodes a `MsgRecvPacket` payload.
pub fn parse(
    _registry: &MessageRegistry,
    data: &[u8],
    chain: &ChainConfig,
    _height: i64,
) -> Result<Option<Box<dyn Message>>, ParseError> {
    let msg = MsgRecvPacketProto::decode(data)?;
    let Some(packet) = msg.packet else {
        return Ok(None);
    };

    let packet_data: FungibleTokenPacketData = match serde_json::from_slice(&packet.data) {
        Ok(data) => data,
        Err(error) => {
            tracing::debug!(
                chain = %chain.name,
                %error,
                "Packet payload is not a fungible token transfer, skipping."
            );
            return Ok(None);
        }
    };

    let denom = receive_denom(&packet, &packet_data.denom);
    Ok(Some(Box::new(MsgRecvPacket {
        chain: chain.name.clone(),
        sender: Link::new(packet_data.sender),
        receiver: Link::new(packet_data.receiver),
        amount: Amount::from_coin(&packet_data.amount, &denom),
    })))
}

/// The denom the transferred token takes on this chain.
///
/// A token returning to the chain it was minted on sheds the
/// `port/channel` prefix it picked up on the way out; a token arriving
/// for the first time gains this chain's prefix and is addressed by the
/// hash of its full trace.
fn receive_denom(packet: &Packet, packet_denom: &str) -> String {
    let return_prefix = format!("{}/{}/", packet.source_port, packet.source_channel);
    if let Some(unwound) = packet_denom.strip_prefix(&return_prefix) {
        return unwound.to_string();
    }

    let trace =
        format!("{}/{}/{packet_denom}", packet.destination_port, packet.destination_channel);
    format!("ibc/{}", sha256_hex(trace.as_bytes()))
}

#[async_trait]
impl Message for MsgRecvPacket {
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
        fetcher.enrich_wallet_link(&self.chain, subscription, &mut self.receiver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::test_helpers::test_chain;

    fn packet(data: &str) -> MsgRecvPacketProto {
        MsgRecvPacketProto {
            packet: Some(Packet {
                sequence: 1,
                source_port: "transfer".into(),
                source_channel: "channel-0".into(),
                destination_port: "transfer".into(),
                destination_channel: "channel-141".into(),
                data: data.as_bytes().to_vec(),
                timeout_height: None,
                timeout_timestamp: 0,
            }),
            proof_commitment: Vec::new(),
            proof_height: None,
            signer: "cosmos1relayer".into(),
        }
    }

    #[test]
    fn parses_incoming_transfer_with_hashed_denom() {
        let proto = packet(
            r#"{"denom": "uosmo", "amount": "1000", "sender": "osmo1a", "receiver": "cosmos1b"}"#,
        );

        let registry = MessageRegistry::default();
        let message = parse(&registry, &proto.encode_to_vec(), &test_chain(), 3)
            .unwrap()
            .expect("message expected");

        assert_eq!(message.message_type(), TYPE_URL);
        assert!(message
            .values()
            .contains(&("ibc_transfer.recipient".to_string(), "cosmos1b".to_string())));
    }

    #[test]
    fn returning_token_sheds_its_prefix() {
        let p = packet("").packet.unwrap();
        assert_eq!(receive_denom(&p, "transfer/channel-0/uatom"), "uatom");
    }

    #[test]
    fn arriving_token_is_addressed_by_trace_hash() {
        let p = packet("").packet.unwrap();
        let denom = receive_denom(&p, "uosmo");
        assert!(denom.starts_with("ibc/"));
        assert_eq!(denom.len(), "ibc/".len() + 64);
    }

    #[test]
    fn non_transfer_payload_decodes_to_nothing() {
        let proto = packet(r#"{"result": "AQ=="}"#);
        let registry = MessageRegistry::default();
        assert!(parse(&registry, &proto.encode_to_vec(), &test_chain(), 3).unwrap().is_none());
    }
}
