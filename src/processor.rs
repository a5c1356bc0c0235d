//! The report processor: enrichment and delivery.
//!
//! Consumes the deduplicated report stream, runs the single enrichment pass
//! over each payload, and hands the result to every configured reporter.
//! Delivery failures are logged and never stall the stream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    fetcher::DataFetcher,
    models::{Report, Reportable},
    reporter::Reporter,
};

/// Enriches reports and fans them out to delivery channels.
pub struct Processor {
    fetcher: Arc<DataFetcher>,
    reporters: Vec<Box<dyn Reporter>>,
    subscription: String,
}

impl Processor {
    /// Creates a processor delivering to the given reporters.
    pub fn new(
        fetcher: Arc<DataFetcher>,
        reporters: Vec<Box<dyn Reporter>>,
        subscription: impl Into<String>,
    ) -> Self {
        Self { fetcher, reporters, subscription: subscription.into() }
    }

    /// Consumes reports until the channel closes or `cancel` fires.
    pub async fn run(&self, mut reports: mpsc::Receiver<Report>, cancel: CancellationToken) {
        loop {
            let report = tokio::select! {
                () = cancel.cancelled() => return,
                report = reports.recv() => match report {
                    Some(report) => report,
                    None => return,
                },
            };
            self.process(report).await;
        }
    }

    /// Enriches one report in place and delivers it everywhere.
    pub async fn process(&self, mut report: Report) {
        self.enrich(&mut report).await;

        for reporter in &self.reporters {
            if let Err(error) = reporter.send(&report).await {
                tracing::error!(
                    reporter = reporter.name(),
                    chain = %report.chain,
                    %error,
                    "Report delivery failed."
                );
            }
        }
    }

    /// The single enrichment pass: explorer links on the transaction itself,
    /// then each message's own pass.
    async fn enrich(&self, report: &mut Report) {
        let Reportable::Tx(tx) = &mut report.reportable else {
            return;
        };

        self.fetcher.enrich_transaction_links(&report.chain, &mut tx.hash, &mut tx.height);
        for message in &mut tx.messages {
            message.enrich(&self.fetcher, &self.subscription).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        aliases::InMemoryAliasManager,
        config::AppConfig,
        metrics::AppMetrics,
        models::TxError,
        reporter::MockReporter,
    };

    fn fetcher() -> Arc<DataFetcher> {
        let config: AppConfig = serde_json::from_value(json!({
            "chains": [{
                "name": "testchain",
                "chain_id": "test-1",
                "tendermint_nodes": ["wss://rpc.example.com/websocket"],
                "api_nodes": ["https://api.example.com"]
            }]
        }))
        .unwrap();
        Arc::new(
            DataFetcher::new(
                Arc::new(config),
                Arc::new(InMemoryAliasManager::new()),
                Arc::new(AppMetrics::new().unwrap()),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn delivers_to_every_reporter_even_after_a_failure() {
        let mut failing = MockReporter::new();
        failing.expect_name().return_const("failing");
        failing.expect_send().times(1).returning(|_| {
            Err(crate::reporter::ReporterError::Delivery("nope".into()))
        });

        let mut working = MockReporter::new();
        working.expect_name().return_const("working");
        working.expect_send().times(1).returning(|_| Ok(()));

        let processor =
            Processor::new(fetcher(), vec![Box::new(failing), Box::new(working)], "default");

        processor
            .process(Report {
                chain: "testchain".into(),
                node: "rpc.example.com".into(),
                reportable: Reportable::TxError(TxError { error: "boom".into() }),
            })
            .await;
    }

    #[tokio::test]
    async fn run_ends_when_the_channel_closes() {
        let processor = Processor::new(fetcher(), Vec::new(), "default");
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        processor.run(rx, CancellationToken::new()).await;
    }
}
