//! The polymorphic per-message-type trait every registered decoder produces.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::fetcher::DataFetcher;

/// A parsed on-chain message.
///
/// Implementations are produced by parsers registered in the
/// [`MessageRegistry`](crate::messages::MessageRegistry) and mutated in place
/// exactly once by their enrichment pass. The fetcher capability is injected
/// into that pass so decoders never depend on the fetcher at construction
/// time.
#[async_trait]
pub trait Message: Debug + Send + Sync {
    /// The stable type tag this message was decoded from.
    fn message_type(&self) -> &'static str;

    /// The attribute set used for event filtering: derived key/value pairs
    /// in the Tendermint event-attribute convention
    /// (e.g. `("message.action", "/cosmos.bank.v1beta1.MsgSend")`).
    fn values(&self) -> Vec<(String, String)>;

    /// The single enrichment pass: attaches prices, display denoms, explorer
    /// links, aliases, monikers. Degrades gracefully; never fails.
    async fn enrich(&mut self, fetcher: &DataFetcher, subscription: &str);

    /// Inner messages, for wrapper kinds (authz exec).
    fn inner_messages(&self) -> &[Box<dyn Message>] {
        &[]
    }
}
