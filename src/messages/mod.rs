//! Message decoding: the type-URL registry and one decoder per supported
//! message kind.

pub mod msg_delegate;
pub mod msg_exec;
pub mod msg_recv_packet;
pub mod msg_send;
pub mod msg_transfer;
pub mod msg_vote;
pub mod msg_withdraw;
pub mod placeholders;
pub mod proto;
mod registry;

pub use placeholders::{MsgError, MsgUnsupportedMessage};
pub use registry::{MessageRegistry, ParseError, ParserFn};
