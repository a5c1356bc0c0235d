//! Hand-declared protobuf shapes for the IBC messages the crate decodes.
//!
//! `cosmos-sdk-proto` stopped shipping IBC definitions, so the few types
//! needed here are declared directly with prost derives, field tags matching
//! the upstream `.proto` files.

use serde::Deserialize;

use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

/// `ibc.core.client.v1.Height`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Height {
    /// Revision number of the chain.
    #[prost(uint64, tag = "1")]
    pub revision_number: u64,
    /// Height at that revision.
    #[prost(uint64, tag = "2")]
    pub revision_height: u64,
}

/// `ibc.applications.transfer.v1.MsgTransfer`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgTransfer {
    /// Port the transfer leaves through.
    #[prost(string, tag = "1")]
    pub source_port: ::prost::alloc::string::String,
    /// Channel the transfer leaves through.
    #[prost(string, tag = "2")]
    pub source_channel: ::prost::alloc::string::String,
    /// The token being transferred.
    #[prost(message, optional, tag = "3")]
    pub token: ::core::option::Option<Coin>,
    /// Sender on the source chain.
    #[prost(string, tag = "4")]
    pub sender: ::prost::alloc::string::String,
    /// Receiver on the destination chain.
    #[prost(string, tag = "5")]
    pub receiver: ::prost::alloc::string::String,
    /// Timeout as a counterparty height.
    #[prost(message, optional, tag = "6")]
    pub timeout_height: ::core::option::Option<Height>,
    /// Timeout as a unix timestamp in nanoseconds.
    #[prost(uint64, tag = "7")]
    pub timeout_timestamp: u64,
    /// Optional transfer memo.
    #[prost(string, tag = "8")]
    pub memo: ::prost::alloc::string::String,
}

/// `ibc.core.channel.v1.Packet`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Packet {
    /// Packet sequence on the channel.
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// Source port.
    #[prost(string, tag = "2")]
    pub source_port: ::prost::alloc::string::String,
    /// Source channel.
    #[prost(string, tag = "3")]
    pub source_channel: ::prost::alloc::string::String,
    /// Destination port.
    #[prost(string, tag = "4")]
    pub destination_port: ::prost::alloc::string::String,
    /// Destination channel.
    #[prost(string, tag = "5")]
    pub destination_channel: ::prost::alloc::string::String,
    /// Opaque application payload.
    #[prost(bytes = "vec", tag = "6")]
    pub data: ::prost::alloc::vec::Vec<u8>,
    /// Timeout as a counterparty height.
    #[prost(message, optional, tag = "7")]
    pub timeout_height: ::core::option::Option<Height>,
    /// Timeout as a unix timestamp in nanoseconds.
    #[prost(uint64, tag = "8")]
    pub timeout_timestamp: u64,
}

/// `ibc.core.channel.v1.MsgRecvPacket`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgRecvPacket {
    /// The packet being received.
    #[prost(message, optional, tag = "1")]
    pub packet: ::core::option::Option<Packet>,
    /// Commitment proof (unused here).
    #[prost(bytes = "vec", tag = "2")]
    pub proof_commitment: ::prost::alloc::vec::Vec<u8>,
    /// Proof height (unused here).
    #[prost(message, optional, tag = "3")]
    pub proof_height: ::core::option::Option<Height>,
    /// Relayer address signing the message.
    #[prost(string, tag = "4")]
    pub signer: ::prost::alloc::string::String,
}

/// The JSON payload of a fungible-token transfer packet
/// (`ibc.applications.transfer.v2.FungibleTokenPacketData`).
#[derive(Debug, Clone, Deserialize)]
pub struct FungibleTokenPacketData {
    /// Denom as represented on the sending chain.
    pub denom: String,
    /// Amount in base units, as a decimal string.
    pub amount: String,
    /// Sender on the source chain.
    pub sender: String,
    /// Receiver on this chain.
    pub receiver: String,
    /// Optional transfer memo.
    #[serde(default)]
    pub memo: String,
}

#[cfg(test)]
mod tests {
    use prost::Message as _;

    use super::*;

    #[test]
    fn msg_transfer_roundtrips_through_prost() {
        let msg = MsgTransfer {
            source_port: "transfer".into(),
            source_channel: "channel-141".into(),
            token: Some(Coin { denom: "uosmo".into(), amount: "25000000".into() }),
            sender: "osmo1xxx".into(),
            receiver: "cosmos1yyy".into(),
            timeout_height: Some(Height { revision_number: 4, revision_height: 100 }),
            timeout_timestamp: 0,
            memo: String::new(),
        };

        let decoded = MsgTransfer::decode(msg.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn packet_data_parses_fungible_token_payload() {
        let data: FungibleTokenPacketData = serde_json::from_str(
            r#"{"denom": "uatom", "amount": "1000", "sender": "cosmos1a", "receiver": "osmo1b"}"#,
        )
        .unwrap();
        assert_eq!(data.denom, "uatom");
        assert_eq!(data.memo, "");
    }
}
