//! A reporter that prints rendered reports to standard output.

use std::fmt::Write as _;

use async_trait::async_trait;

use super::{Reporter, ReporterError};
use crate::models::{Message, Report, Reportable};

/// Prints each report as a plain-text block.
pub struct StdoutReporter;

#[async_trait]
impl Reporter for StdoutReporter {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn send(&self, report: &Report) -> Result<(), ReporterError> {
        println!("{}", render(report));
        Ok(())
    }
}

fn render(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} on {} (via {}) ===",
        report.reportable.type_name(),
        report.chain,
        report.node
    );

    match &report.reportable {
        Reportable::Tx(tx) => {
            let _ = writeln!(out, "Hash: {}", render_link(&tx.hash));
            let _ = writeln!(out, "Height: {}", render_link(&tx.height));
            if !tx.memo.is_empty() {
                let _ = writeln!(out, "Memo: {}", tx.memo);
            }
            let _ =
                writeln!(out, "Messages ({} of {}):", tx.messages.len(), tx.messages_count);
            for message in &tx.messages {
                render_message(&mut out, message.as_ref(), 1);
            }
        }
        Reportable::TxError(error) => {
            let _ = writeln!(out, "Error: {}", error.error);
        }
        Reportable::NodeConnectError(error) => {
            let _ = writeln!(out, "Node {} on {} failed: {}", error.node, error.chain, error.error);
        }
    }

    out
}

fn render_message(out: &mut String, message: &dyn Message, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}- {}", message.message_type());
    for (key, value) in message.values() {
        if key != "message.action" {
            let _ = writeln!(out, "{indent}    {key}: {value}");
        }
    }
    for inner in message.inner_messages() {
        render_message(out, inner.as_ref(), depth + 1);
    }
}

fn render_link(link: &crate::models::Link) -> String {
    match &link.href {
        Some(href) => format!("{link} <{href}>"),
        None => link.to_string(),
    }
}
