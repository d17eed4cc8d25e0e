//! Session wiring for a running client

pub mod bot;
pub mod session;

pub use bot::InputBot;
pub use session::{
    session_channels, InputEvent, Session, SessionHandle, SessionInbox, SessionReport,
};
