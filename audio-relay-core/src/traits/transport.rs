use crate::models::error::AudioError;
use crate::models::message::AnalysisMessage;

/// Outbound half of an external WebSocket-style client.
///
/// The implementation owns the socket, connection lifecycle, retries, and
/// reconnect backoff; this crate only pushes text frames through it and
/// tracks connection state via `TransportLink`.
pub trait Transport: Send + Sync {
    /// Send one text frame.
    fn send_text(&self, payload: &str) -> Result<(), AudioError>;

    /// Whether the underlying socket is currently usable.
    fn is_open(&self) -> bool;
}

/// Receiver for transport lifecycle and inbound messages, dispatched by
/// `TransportLink` on state transitions. Every method has an empty default.
pub trait TransportHandler: Send + Sync {
    /// The link reached the connected state.
    fn on_open(&self) {}

    /// A raw inbound text frame arrived while connected.
    fn on_message(&self, _raw: &str) {}

    /// An inbound frame parsed as a classification result.
    fn on_analysis(&self, _analysis: &AnalysisMessage) {}

    /// The transport reported an error. State is unchanged; a `Closed`
    /// event follows if the connection is gone.
    fn on_error(&self, _reason: &str) {}

    /// The link returned to the disconnected state.
    fn on_close(&self) {}
}
