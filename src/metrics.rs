//! Fire-and-forget application metrics.
//!
//! Counters and gauges are recorded on a best-effort basis and never affect
//! control flow anywhere in the pipeline.

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry};

use crate::models::QueryInfo;

/// Shared application metrics.
pub struct AppMetrics {
    registry: Registry,
    /// API node queries by chain, node, and outcome.
    queries_total: IntCounterVec,
    /// API node query latency by chain and node.
    query_duration: HistogramVec,
    /// Raw events received from node subscriptions.
    events_total: IntCounterVec,
    /// Reports forwarded downstream, by payload kind.
    reports_total: IntCounterVec,
    /// Reports suppressed by the dedup history.
    deduplicated_total: IntCounterVec,
    /// Whether a node's subscription is currently connected.
    node_connected: IntGaugeVec,
    /// WebSocket reconnect attempts.
    reconnects_total: IntCounterVec,
}

impl AppMetrics {
    /// Creates and registers all metric families.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let queries_total = IntCounterVec::new(
            Opts::new("pharos_queries_total", "Total API node queries"),
            &["chain", "node", "success"],
        )?;
        let query_duration = HistogramVec::new(
            HistogramOpts::new("pharos_query_duration_seconds", "API node query latency"),
            &["chain", "node"],
        )?;
        let events_total = IntCounterVec::new(
            Opts::new("pharos_events_total", "Raw events received from node subscriptions"),
            &["chain", "node"],
        )?;
        let reports_total = IntCounterVec::new(
            Opts::new("pharos_reports_total", "Reports forwarded downstream"),
            &["chain", "type"],
        )?;
        let deduplicated_total = IntCounterVec::new(
            Opts::new("pharos_reports_deduplicated_total", "Reports suppressed as duplicates"),
            &["chain"],
        )?;
        let node_connected = IntGaugeVec::new(
            Opts::new("pharos_node_connected", "Whether a node subscription is connected"),
            &["chain", "node"],
        )?;
        let reconnects_total = IntCounterVec::new(
            Opts::new("pharos_reconnects_total", "WebSocket reconnect attempts"),
            &["chain", "node"],
        )?;

        registry.register(Box::new(queries_total.clone()))?;
        registry.register(Box::new(query_duration.clone()))?;
        registry.register(Box::new(events_total.clone()))?;
        registry.register(Box::new(reports_total.clone()))?;
        registry.register(Box::new(deduplicated_total.clone()))?;
        registry.register(Box::new(node_connected.clone()))?;
        registry.register(Box::new(reconnects_total.clone()))?;

        Ok(Self {
            registry,
            queries_total,
            query_duration,
            events_total,
            reports_total,
            deduplicated_total,
            node_connected,
            reconnects_total,
        })
    }

    /// The registry holding every family, for exposition by an outer layer.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Records the outcome of one API node query.
    pub fn record_query(&self, chain: &str, info: &QueryInfo) {
        let success = if info.success { "true" } else { "false" };
        self.queries_total.with_label_values(&[chain, &info.node, success]).inc();
        self.query_duration
            .with_label_values(&[chain, &info.node])
            .observe(info.elapsed.as_secs_f64());
    }

    /// Records one raw event received from a node subscription.
    pub fn record_event(&self, chain: &str, node: &str) {
        self.events_total.with_label_values(&[chain, node]).inc();
    }

    /// Records one report forwarded downstream.
    pub fn record_report(&self, chain: &str, type_name: &str) {
        self.reports_total.with_label_values(&[chain, type_name]).inc();
    }

    /// Records one report suppressed by the dedup history.
    pub fn record_deduplicated(&self, chain: &str) {
        self.deduplicated_total.with_label_values(&[chain]).inc();
    }

    /// Updates a node's connectivity gauge.
    pub fn set_node_connected(&self, chain: &str, node: &str, connected: bool) {
        self.node_connected.with_label_values(&[chain, node]).set(i64::from(connected));
    }

    /// Records one WebSocket reconnect attempt.
    pub fn record_reconnect(&self, chain: &str, node: &str) {
        self.reconnects_total.with_label_values(&[chain, node]).inc();
    }
}
