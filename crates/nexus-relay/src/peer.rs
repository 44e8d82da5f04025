//! Peer connection handles.
//!
//! A [`PeerHandle`] is the registry's view of a live connection: a
//! non-blocking sender feeding that connection's writer task. Sends
//! are fire-and-forget -- if the peer's writer has already shut down
//! the frame is dropped silently, because an unreachable peer is a
//! normal condition of the relay, not a fault.

use axum::extract::ws::Message;
use nexus_types::ServerEvent;
use tokio::sync::mpsc;
use tracing::warn;

/// A cloneable, non-blocking handle to one connection's outbound queue.
///
/// The queue is unbounded: the relay never applies backpressure to
/// the sending peer, matching the fire-and-forget forwarding contract.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl PeerHandle {
    /// Create a handle together with the receiver its writer task
    /// drains into the socket sink.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a protocol event as a JSON text frame, best-effort.
    pub fn send_event(&self, event: &ServerEvent) {
        match event.to_json() {
            Ok(json) => self.send_frame(Message::Text(json.into())),
            Err(e) => warn!("failed to serialize outbound event: {e}"),
        }
    }

    /// Queue a raw frame (pong, close), best-effort.
    pub fn send_frame(&self, frame: Message) {
        // Err here means the writer task is gone; the disconnect
        // handler for that peer owns the cleanup.
        let _ = self.tx.send(frame);
    }
}
