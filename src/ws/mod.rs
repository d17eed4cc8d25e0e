//! Wire protocol and the outbound intent channel

pub mod channel;
pub mod protocol;

pub use channel::{ChannelSink, IntentSink, ProtocolError, RecordingSink};
pub use protocol::{BonusData, ClientMsg, Position, ServerMsg};
