//! Placeholder messages standing in for payloads the pipeline could not
//! decode, so the failure is visible downstream instead of silently lost.

use async_trait::async_trait;

use crate::{fetcher::DataFetcher, models::Message};

/// A message whose type tag has no registered parser.
#[derive(Debug, Clone)]
pub struct MsgUnsupportedMessage {
    /// The unregistered type tag.
    pub type_url: String,
}

impl MsgUnsupportedMessage {
    /// Creates a placeholder for an unregistered tag.
    pub fn new(type_url: impl Into<String>) -> Self {
        Self { type_url: type_url.into() }
    }
}

#[async_trait]
impl Message for MsgUnsupportedMessage {
    fn message_type(&self) -> &'static str {
        "MsgUnsupportedMessage"
    }

    fn values(&self) -> Vec<(String, String)> {
        vec![("message.action".to_string(), self.type_url.clone())]
    }

    async fn enrich(&mut self, _fetcher: &DataFetcher, _subscription: &str) {}
}

/// A message whose registered parser failed to decode it.
#[derive(Debug, Clone)]
pub struct MsgError {
    /// The decode error text.
    pub error: String,
}

impl MsgError {
    /// Creates a placeholder wrapping a decode error.
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[async_trait]
impl Message for MsgError {
    fn message_type(&self) -> &'static str {
        "MsgError"
    }

    fn values(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    async fn enrich(&mut self, _fetcher: &DataFetcher, _subscription: &str) {}
}
