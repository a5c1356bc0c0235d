//! Multi-node, multi-chain subscription fan-in.
//!
//! The node manager spawns one subscription task per configured Tendermint
//! node and one forwarding task on top of each. Forwarders run every event
//! through the chain's converter, deduplicate across nodes, and push
//! surviving reports into the single output channel the processor consumes.

mod dedup;

use std::sync::{Arc, Mutex};

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

pub use dedup::{DedupQueue, DEDUP_CAPACITY};

use crate::{
    config::AppConfig,
    converter::Converter,
    messages::MessageRegistry,
    metrics::AppMetrics,
    models::{NodeConnectError, Report, Reportable},
    providers::{NodeEvent, TendermintWsClient},
};

/// Per-node event channel depth. Small on purpose: a slow consumer should
/// backpressure the socket reader, not buffer unboundedly.
const NODE_EVENT_CAPACITY: usize = 64;

/// Owns every node subscription and the dedup history between them.
pub struct NodeManager {
    config: Arc<AppConfig>,
    registry: Arc<MessageRegistry>,
    metrics: Arc<AppMetrics>,
    dedup: Arc<Mutex<DedupQueue>>,
}

impl NodeManager {
    /// Creates the manager. Nothing runs until [`NodeManager::spawn`].
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<MessageRegistry>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self { config, registry, metrics, dedup: Arc::new(Mutex::new(DedupQueue::default())) }
    }

    /// Spawns the subscription and forwarding tasks for every configured
    /// node. Reports arrive on `reports`; everything winds down when
    /// `cancel` fires.
    pub fn spawn(
        &self,
        reports: mpsc::Sender<Report>,
        cancel: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        for chain in &self.config.chains {
            let converter = Arc::new(Converter::new(chain.clone(), Arc::clone(&self.registry)));

            for node in &chain.tendermint_nodes {
                let client = TendermintWsClient::new(
                    &chain.name,
                    node,
                    chain.queries.clone(),
                    Arc::clone(&self.metrics),
                );
                let host = client.host().to_string();

                let (events_tx, events_rx) = mpsc::channel(NODE_EVENT_CAPACITY);
                handles.push(client.spawn(events_tx, cancel.clone()));
                handles.push(self.spawn_forwarder(
                    chain.name.clone(),
                    host,
                    Arc::clone(&converter),
                    events_rx,
                    reports.clone(),
                    cancel.clone(),
                ));
            }
        }

        handles
    }

    fn spawn_forwarder(
        &self,
        chain: String,
        node: String,
        converter: Arc<Converter>,
        mut events: mpsc::Receiver<NodeEvent>,
        reports: mpsc::Sender<Report>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let dedup = Arc::clone(&self.dedup);
        let metrics = Arc::clone(&self.metrics);

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    () = cancel.cancelled() => return,
                    event = events.recv() => match event {
                        Some(event) => event,
                        None => return,
                    },
                };

                let reportable = match event {
                    NodeEvent::Disconnected(error) => {
                        Some(Reportable::NodeConnectError(NodeConnectError {
                            chain: chain.clone(),
                            node: node.clone(),
                            error,
                        }))
                    }
                    other => converter.convert(other),
                };
                let Some(reportable) = reportable else {
                    continue;
                };

                // Membership check and insert under one lock, so two nodes
                // racing on the same transaction cannot both pass.
                let identity = format!("{chain}:{}", reportable.hash());
                let fresh = match dedup.lock() {
                    Ok(mut dedup) => dedup.check_and_insert(&identity),
                    Err(poisoned) => poisoned.into_inner().check_and_insert(&identity),
                };
                if !fresh {
                    tracing::debug!(chain, node, identity, "Suppressing duplicate report.");
                    metrics.record_deduplicated(&chain);
                    continue;
                }

                metrics.record_report(&chain, reportable.type_name());
                let report = Report { chain: chain.clone(), node: node.clone(), reportable };
                if reports.send(report).await.is_err() {
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // End-to-end forwarding across two nodes of one chain: the same
    // transaction arrives on both sockets and is reported once.
    #[tokio::test]
    async fn duplicate_across_nodes_is_reported_once() {
        let config: AppConfig = serde_json::from_value(json!({
            "chains": [{
                "name": "testchain",
                "chain_id": "test-1",
                "tendermint_nodes": ["wss://a.example.com/websocket", "wss://b.example.com/websocket"],
                "api_nodes": ["https://api.example.com"]
            }]
        }))
        .unwrap();
        let config = Arc::new(config);
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let manager =
            NodeManager::new(Arc::clone(&config), Arc::new(MessageRegistry::default()), metrics);

        let cancel = CancellationToken::new();
        let (reports_tx, mut reports_rx) = mpsc::channel(8);
        let converter = Arc::new(Converter::new(
            config.chains[0].clone(),
            Arc::new(MessageRegistry::default()),
        ));

        let (node_a_tx, node_a_rx) = mpsc::channel(8);
        let (node_b_tx, node_b_rx) = mpsc::channel(8);
        let _forwarder_a = manager.spawn_forwarder(
            "testchain".into(),
            "a.example.com".into(),
            Arc::clone(&converter),
            node_a_rx,
            reports_tx.clone(),
            cancel.clone(),
        );
        let _forwarder_b = manager.spawn_forwarder(
            "testchain".into(),
            "b.example.com".into(),
            converter,
            node_b_rx,
            reports_tx,
            cancel.clone(),
        );

        let error = NodeEvent::Error("Internal error".to_string());
        node_a_tx.send(error.clone()).await.unwrap();
        let first = reports_rx.recv().await.expect("first report");
        assert_eq!(first.node, "a.example.com");

        // The same payload arriving on the second node is suppressed; the
        // next report through is the genuinely new one.
        node_b_tx.send(error).await.unwrap();
        node_b_tx.send(NodeEvent::Error("a different error".to_string())).await.unwrap();

        let second = reports_rx.recv().await.expect("second report");
        let Reportable::TxError(error) = second.reportable else {
            panic!("expected a TxError");
        };
        assert_eq!(error.error, "a different error");
        assert_eq!(second.node, "b.example.com");

        cancel.cancel();
    }

    #[tokio::test]
    async fn disconnect_becomes_a_node_connect_error_report() {
        let config: AppConfig = serde_json::from_value(json!({
            "chains": [{
                "name": "testchain",
                "chain_id": "test-1",
                "tendermint_nodes": ["wss://a.example.com/websocket"],
                "api_nodes": ["https://api.example.com"]
            }]
        }))
        .unwrap();
        let config = Arc::new(config);
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let manager =
            NodeManager::new(Arc::clone(&config), Arc::new(MessageRegistry::default()), metrics);

        let cancel = CancellationToken::new();
        let (reports_tx, mut reports_rx) = mpsc::channel(8);
        let (events_tx, events_rx) = mpsc::channel(8);
        let converter = Arc::new(Converter::new(
            config.chains[0].clone(),
            Arc::new(MessageRegistry::default()),
        ));
        let _forwarder = manager.spawn_forwarder(
            "testchain".into(),
            "a.example.com".into(),
            converter,
            events_rx,
            reports_tx,
            cancel.clone(),
        );

        events_tx.send(NodeEvent::Disconnected("connection refused".into())).await.unwrap();

        let report = reports_rx.recv().await.expect("report");
        let Reportable::NodeConnectError(error) = report.reportable else {
            panic!("expected a NodeConnectError");
        };
        assert_eq!(error.node, "a.example.com");
        assert_eq!(error.error, "connection refused");

        cancel.cancel();
    }
}
