//! The per-node WebSocket subscription task.
//!
//! Each configured Tendermint node gets one task that owns the socket:
//! connect, subscribe to the chain's queries, forward deliveries, and on any
//! failure report the disconnect and reconnect with doubling backoff. The
//! task only ends when cancelled.

use std::{sync::Arc, time::Duration};

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::{sync::mpsc, task::JoinHandle, time};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::events::NodeEvent;
use crate::metrics::AppMetrics;

const RECONNECT_INITIAL: Duration = Duration::from_secs(1);
const RECONNECT_MAX: Duration = Duration::from_secs(60);

/// A subscription to one Tendermint node's event socket.
pub struct TendermintWsClient {
    chain: String,
    url: Url,
    host: String,
    queries: Vec<String>,
    metrics: Arc<AppMetrics>,
}

impl TendermintWsClient {
    /// Creates a client for one node. `queries` are Tendermint subscription
    /// query expressions, subscribed one request each.
    pub fn new(chain: &str, url: &Url, queries: Vec<String>, metrics: Arc<AppMetrics>) -> Self {
        let host = url.host_str().unwrap_or("unknown").to_string();
        Self { chain: chain.to_string(), url: url.clone(), host, queries, metrics }
    }

    /// The node's host, used as its identity in logs and metrics.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Spawns the background task owning the socket. Deliveries, errors, and
    /// disconnects all arrive on `events`; the task ends when `cancel` fires
    /// or the receiving side goes away.
    pub fn spawn(
        self,
        events: mpsc::Sender<NodeEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(events, cancel).await })
    }

    async fn run(self, events: mpsc::Sender<NodeEvent>, cancel: CancellationToken) {
        let mut backoff = RECONNECT_INITIAL;
        let mut reconnecting = false;

        loop {
            if reconnecting {
                self.metrics.record_reconnect(&self.chain, &self.host);
            }

            let connection = tokio::select! {
                () = cancel.cancelled() => return,
                connection = connect_async(self.url.as_str()) => connection,
            };

            let (mut sink, mut stream) = match connection {
                Ok((socket, _)) => {
                    tracing::info!(chain = %self.chain, node = %self.host, "Node connected.");
                    self.metrics.set_node_connected(&self.chain, &self.host, true);
                    backoff = RECONNECT_INITIAL;
                    socket.split()
                }
                Err(error) => {
                    tracing::warn!(
                        chain = %self.chain,
                        node = %self.host,
                        %error,
                        "Node connection failed, retrying."
                    );
                    if events.send(NodeEvent::Disconnected(error.to_string())).await.is_err() {
                        return;
                    }
                    if !self.sleep_backoff(&mut backoff, &cancel).await {
                        return;
                    }
                    reconnecting = true;
                    continue;
                }
            };

            let mut subscribed = true;
            for (id, query) in self.queries.iter().enumerate() {
                let request = json!({
                    "jsonrpc": "2.0",
                    "method": "subscribe",
                    "id": id,
                    "params": {"query": query},
                });
                if sink.send(WsMessage::Text(request.to_string())).await.is_err() {
                    subscribed = false;
                    break;
                }
            }

            let reason = if subscribed {
                self.pump(&mut stream, &events, &cancel).await
            } else {
                Some("subscribe request failed".to_string())
            };

            self.metrics.set_node_connected(&self.chain, &self.host, false);
            let Some(reason) = reason else {
                // Cancelled or the receiver went away.
                return;
            };

            tracing::warn!(
                chain = %self.chain,
                node = %self.host,
                reason,
                "Node disconnected, reconnecting."
            );
            if events.send(NodeEvent::Disconnected(reason)).await.is_err() {
                return;
            }
            if !self.sleep_backoff(&mut backoff, &cancel).await {
                return;
            }
            reconnecting = true;
        }
    }

    /// Forwards deliveries until the socket fails. Returns the disconnect
    /// reason, or `None` when the task should end instead of reconnecting.
    async fn pump<S>(
        &self,
        stream: &mut S,
        events: &mpsc::Sender<NodeEvent>,
        cancel: &CancellationToken,
    ) -> Option<String>
    where
        S: StreamExt<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        loop {
            let message = tokio::select! {
                () = cancel.cancelled() => return None,
                message = stream.next() => message,
            };

            match message {
                None => return Some("stream closed".to_string()),
                Some(Err(error)) => return Some(error.to_string()),
                Some(Ok(WsMessage::Text(text))) => {
                    let Some(event) = classify(&text) else {
                        continue;
                    };
                    if let NodeEvent::Event(_) = &event {
                        self.metrics.record_event(&self.chain, &self.host);
                    }
                    if events.send(event).await.is_err() {
                        return None;
                    }
                }
                Some(Ok(WsMessage::Close(_))) => return Some("close frame".to_string()),
                Some(Ok(_)) => {}
            }
        }
    }

    async fn sleep_backoff(&self, backoff: &mut Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            () = cancel.cancelled() => false,
            () = time::sleep(*backoff) => {
                *backoff = (*backoff * 2).min(RECONNECT_MAX);
                true
            }
        }
    }
}

/// Classifies one frame: JSON-RPC error, subscription delivery, or noise
/// (subscribe acks, unparseable frames).
fn classify(text: &str) -> Option<NodeEvent> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, "Dropping unparseable frame.");
            return None;
        }
    };

    if let Some(error) = value.get("error") {
        let text = error
            .get("data")
            .and_then(Value::as_str)
            .or_else(|| error.get("message").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Some(NodeEvent::Error(text));
    }

    let result = value.get("result")?;
    if result.get("data").is_some() {
        return Some(NodeEvent::Event(result.clone()));
    }

    // Subscribe acknowledgement: an empty result object.
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_frames_by_data_field() {
        let event = classify(
            r#"{"jsonrpc": "2.0", "id": 0, "error": {"code": -32603, "message": "Internal error", "data": "already subscribed"}}"#,
        )
        .expect("event expected");
        match event {
            NodeEvent::Error(text) => assert_eq!(text, "already subscribed"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn classifies_deliveries_as_events() {
        let event = classify(
            r#"{"jsonrpc": "2.0", "id": 0, "result": {"query": "tm.event = 'Tx'", "data": {"type": "tendermint/event/Tx", "value": {}}}}"#,
        )
        .expect("event expected");
        assert!(matches!(event, NodeEvent::Event(_)));
    }

    #[test]
    fn drops_subscribe_acks_and_noise() {
        assert!(classify(r#"{"jsonrpc": "2.0", "id": 0, "result": {}}"#).is_none());
        assert!(classify("not json").is_none());
    }
}
