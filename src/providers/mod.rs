//! Node event providers: the WebSocket subscription transport and the event
//! shapes it emits.

mod events;
mod ws;

pub use events::{EventData, NodeEvent, TxEventValue, TxExecResult, TxResult, TX_EVENT_TYPE};
pub use ws::TendermintWsClient;
