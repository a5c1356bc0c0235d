//! Report delivery channels.

mod stdout;

use async_trait::async_trait;
use thiserror::Error;

pub use stdout::StdoutReporter;

use crate::models::Report;

/// An error produced while delivering a report.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The delivery channel rejected or failed to accept the report.
    #[error("Report delivery failed: {0}")]
    Delivery(String),
}

/// A delivery channel for enriched reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reporter: Send + Sync {
    /// A stable name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Delivers one report. Failures are logged by the caller and never
    /// stall the pipeline.
    async fn send(&self, report: &Report) -> Result<(), ReporterError>;
}
