//! Outbound intent channel and frame codec

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::protocol::{ClientMsg, ServerMsg};

/// Wire codec errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Failed to decode inbound frame: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode outbound intent: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Decode a text frame pushed by the authority
pub fn decode_inbound(text: &str) -> Result<ServerMsg, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

/// Encode an intent as a text frame
pub fn encode_outbound(msg: &ClientMsg) -> Result<String, ProtocolError> {
    serde_json::to_string(msg).map_err(ProtocolError::Encode)
}

/// Where committed intents go.
///
/// Sends are fire-and-forget: local state never depends on delivery.
pub trait IntentSink: Send {
    fn send(&mut self, msg: ClientMsg);

    /// Send after `delay`, letting bursts coalesce
    fn send_after(&mut self, delay: Duration, msg: ClientMsg);
}

/// Sink backed by an unbounded tokio channel toward the transport
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ClientMsg>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ClientMsg>) -> Self {
        Self { tx }
    }

    pub fn pair() -> (Self, mpsc::UnboundedReceiver<ClientMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl IntentSink for ChannelSink {
    fn send(&mut self, msg: ClientMsg) {
        let kind = msg.kind();
        if self.tx.send(msg).is_err() {
            debug!(kind, "Outbound channel closed, dropping intent");
        }
    }

    /// Must be called from within a tokio runtime.
    fn send_after(&mut self, delay: Duration, msg: ClientMsg) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let kind = msg.kind();
            if tx.send(msg).is_err() {
                debug!(kind, "Outbound channel closed, dropping delayed intent");
            }
        });
    }
}

/// Sink that keeps everything it is given; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<ClientMsg>>>,
    delayed: Arc<Mutex<Vec<(Duration, ClientMsg)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ClientMsg> {
        self.sent.lock().clone()
    }

    pub fn delayed(&self) -> Vec<(Duration, ClientMsg)> {
        self.delayed.lock().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
        self.delayed.lock().clear();
    }
}

impl IntentSink for RecordingSink {
    fn send(&mut self, msg: ClientMsg) {
        self.sent.lock().push(msg);
    }

    fn send_after(&mut self, delay: Duration, msg: ClientMsg) {
        self.delayed.lock().push((delay, msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_frame_is_a_decode_error() {
        let err = decode_inbound("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn encode_produces_tagged_json() {
        let text = encode_outbound(&ClientMsg::Death {
            sender: "alice".into(),
        })
        .unwrap();
        assert_eq!(text, r#"{"type":"death","sender":"alice"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_send_arrives_after_delay() {
        let (mut sink, mut rx) = ChannelSink::pair();
        sink.send_after(
            Duration::from_millis(100),
            ClientMsg::Death {
                sender: "alice".into(),
            },
        );
        sink.send(ClientMsg::Degats {
            sender: "alice".into(),
            nb: 1,
        });

        assert_eq!(rx.recv().await.map(|m| m.kind()), Some("degats"));
        let start = tokio::time::Instant::now();
        assert_eq!(rx.recv().await.map(|m| m.kind()), Some("death"));
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn send_on_closed_channel_is_silent() {
        let (mut sink, rx) = ChannelSink::pair();
        drop(rx);
        sink.send(ClientMsg::Death {
            sender: "alice".into(),
        });
    }
}
