//! Outcome record for a single node query, consumed by the metrics layer.

use std::time::Duration;

/// The outcome of one API node query. Created per call, handed to the
/// metrics collector, and never used for control flow.
#[derive(Debug, Clone)]
pub struct QueryInfo {
    /// Whether the query succeeded.
    pub success: bool,
    /// Wall-clock time the query took.
    pub elapsed: Duration,
    /// Host of the node that served (or failed) the query.
    pub node: String,
}
