//! Event shapes flowing out of a node subscription.

use serde::Deserialize;

/// One item delivered by a node subscription task.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// A subscription delivery: the JSON-RPC `result` object.
    Event(serde_json::Value),
    /// A JSON-RPC level error returned over the subscription socket.
    Error(String),
    /// The socket dropped or the connection attempt failed.
    Disconnected(String),
}

/// The typed `data` block of a CometBFT subscription delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// CometBFT event type tag, `"tendermint/event/Tx"` for transactions.
    #[serde(rename = "type")]
    pub kind: String,
    /// The tag-specific payload.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// The payload of a `tendermint/event/Tx` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct TxEventValue {
    /// The executed transaction and its result.
    #[serde(rename = "TxResult")]
    pub tx_result: TxResult,
}

/// An executed transaction as CometBFT reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct TxResult {
    /// Block height, as a decimal string.
    pub height: String,
    /// The raw signed transaction, base64-encoded protobuf.
    pub tx: String,
    /// Execution result.
    pub result: TxExecResult,
}

/// The execution result block of a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TxExecResult {
    /// ABCI result code; zero means success.
    #[serde(default)]
    pub code: u32,
    /// Raw log, carries the error text for failed transactions.
    #[serde(default)]
    pub log: String,
}

/// The CometBFT event type tag for transaction deliveries.
pub const TX_EVENT_TYPE: &str = "tendermint/event/Tx";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tx_event_delivery() {
        let result: serde_json::Value = serde_json::from_str(
            r#"{
                "query": "tm.event = 'Tx'",
                "data": {
                    "type": "tendermint/event/Tx",
                    "value": {
                        "TxResult": {
                            "height": "123456",
                            "index": 0,
                            "tx": "CgsKCWR1bW15ZGF0YQ==",
                            "result": {"code": 0, "log": ""}
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let data: EventData = serde_json::from_value(result["data"].clone()).unwrap();
        assert_eq!(data.kind, TX_EVENT_TYPE);

        let value: TxEventValue = serde_json::from_value(data.value).unwrap();
        assert_eq!(value.tx_result.height, "123456");
        assert_eq!(value.tx_result.result.code, 0);
    }

    #[test]
    fn parses_failed_tx_result() {
        let result: TxResult = serde_json::from_str(
            r#"{"height": "7", "tx": "", "result": {"code": 5, "log": "insufficient funds"}}"#,
        )
        .unwrap();
        assert_eq!(result.result.code, 5);
        assert_eq!(result.result.log, "insufficient funds");
    }
}
