//! The delivery unit handed from the node manager to the processor.

use super::{
    message::Message,
    tx::{NodeConnectError, Tx, TxError},
};

/// The polymorphic top-level payload of a report.
#[derive(Debug)]
pub enum Reportable {
    /// A parsed on-chain transaction.
    Tx(Tx),
    /// A transaction that failed to decode, or a node-level error event.
    TxError(TxError),
    /// A failed node connection or subscription.
    NodeConnectError(NodeConnectError),
}

impl Reportable {
    /// A stable name for the payload kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Reportable::Tx(_) => "Tx",
            Reportable::TxError(_) => "TxError",
            Reportable::NodeConnectError(_) => "NodeConnectError",
        }
    }

    /// The dedup identity. Computed at creation time from immutable content,
    /// so it is stable for the lifetime of the reportable.
    pub fn hash(&self) -> String {
        match self {
            Reportable::Tx(tx) => tx.hash.value.clone(),
            Reportable::TxError(e) => e.hash(),
            Reportable::NodeConnectError(e) => e.hash(),
        }
    }

    /// The surviving messages, empty for error payloads.
    pub fn messages(&self) -> &[Box<dyn Message>] {
        match self {
            Reportable::Tx(tx) => &tx.messages,
            _ => &[],
        }
    }
}

/// One delivery unit: which chain and node produced the payload.
#[derive(Debug)]
pub struct Report {
    /// Chain name from configuration.
    pub chain: String,
    /// Host of the node the event arrived on.
    pub node: String,
    /// The payload.
    pub reportable: Reportable,
}
