//! Top-level reportable payloads: parsed transactions, transaction-level
//! decode errors, and node connection errors.

use super::{link::Link, message::Message, sha256_hex};

/// A parsed on-chain transaction.
///
/// `messages` only shrinks during conversion and is never mutated after,
/// so `messages.len() <= messages_count` always holds; the gap is the
/// number of messages filtered out, which is reported, never silently lost.
#[derive(Debug)]
pub struct Tx {
    /// Content hash of the transaction, with an optional explorer link.
    pub hash: Link,
    /// Block height the transaction was included at.
    pub height: Link,
    /// Transaction memo.
    pub memo: String,
    /// Messages that survived decoding and filtering.
    pub messages: Vec<Box<dyn Message>>,
    /// Number of messages the transaction originally carried.
    pub messages_count: usize,
}

/// A node-level or transaction-level decode error, delivered like any other
/// event so one bad input never stalls the pipeline.
#[derive(Debug, Clone)]
pub struct TxError {
    /// The underlying error text.
    pub error: String,
}

impl TxError {
    /// Dedup identity: hash of the error text.
    pub fn hash(&self) -> String {
        sha256_hex(self.error.as_bytes())
    }
}

/// A failed node connection or subscription, reported fail-fast.
#[derive(Debug, Clone)]
pub struct NodeConnectError {
    /// Chain the node belongs to.
    pub chain: String,
    /// The node that failed.
    pub node: String,
    /// The underlying transport error text.
    pub error: String,
}

impl NodeConnectError {
    /// Dedup identity: hash over chain, node, and error text, so the same
    /// failure repeating within the dedup window is reported once while
    /// distinct nodes failing are each reported.
    pub fn hash(&self) -> String {
        sha256_hex(format!("{}/{}/{}", self.chain, self.node, self.error).as_bytes())
    }
}
