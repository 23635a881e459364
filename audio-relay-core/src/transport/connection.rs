//! Connection state machine over an external transport client.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::AudioError;
use crate::models::message::{AnalysisMessage, WindowMessage};
use crate::traits::transport::{Transport, TransportHandler};

/// Lifecycle of a transport link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

/// Events surfaced by the external transport client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

/// Explicit state machine over an injected `Transport`.
///
/// The external client owns the socket, reconnect backoff, and retry
/// policy; it reports lifecycle changes through `handle_event`, and the
/// link dispatches transitions to the registered handler. Invalid
/// transitions are logged and ignored — a misbehaving transport never
/// panics the link.
pub struct TransportLink<T: Transport> {
    transport: T,
    state: Mutex<ConnectionState>,
    handler: Mutex<Option<Arc<dyn TransportHandler>>>,
}

impl<T: Transport> TransportLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(ConnectionState::Disconnected),
            handler: Mutex::new(None),
        }
    }

    pub fn set_handler(&self, handler: Arc<dyn TransportHandler>) {
        *self.handler.lock() = Some(handler);
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Disconnected → Connecting. The external client performs the actual
    /// dial and reports `TransportEvent::Opened` when it completes.
    pub fn connect(&self) -> Result<(), AudioError> {
        let mut state = self.state.lock();
        match *state {
            ConnectionState::Disconnected => {
                *state = ConnectionState::Connecting;
                Ok(())
            }
            other => Err(AudioError::Transport(format!("cannot connect while {other:?}"))),
        }
    }

    /// Connecting/Connected → Closing. The client reports
    /// `TransportEvent::Closed` once the socket is down.
    pub fn close(&self) -> Result<(), AudioError> {
        let mut state = self.state.lock();
        match *state {
            ConnectionState::Connecting | ConnectionState::Connected => {
                *state = ConnectionState::Closing;
                Ok(())
            }
            other => Err(AudioError::Transport(format!("cannot close while {other:?}"))),
        }
    }

    /// Apply one transport event and dispatch to the registered handler.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                let mut state = self.state.lock();
                match *state {
                    ConnectionState::Connecting => {
                        *state = ConnectionState::Connected;
                        drop(state);
                        self.with_handler(|h| h.on_open());
                    }
                    other => log::warn!("ignoring Opened event in state {other:?}"),
                }
            }
            TransportEvent::Message(text) => {
                if !self.state.lock().is_connected() {
                    log::warn!("dropping inbound message while not connected");
                    return;
                }
                self.with_handler(|h| {
                    h.on_message(&text);
                    match AnalysisMessage::from_json(&text) {
                        Ok(analysis) => h.on_analysis(&analysis),
                        Err(e) => log::debug!("inbound frame is not an analysis message: {e}"),
                    }
                });
            }
            TransportEvent::Error(reason) => {
                // Errors do not change state by themselves; the client
                // follows with Closed if the connection is gone.
                log::error!("transport error: {reason}");
                self.with_handler(|h| h.on_error(&reason));
            }
            TransportEvent::Closed => {
                *self.state.lock() = ConnectionState::Disconnected;
                self.with_handler(|h| h.on_close());
            }
        }
    }

    /// Serialize and send a trailing-window message. Fails unless the
    /// link is connected and the socket reports itself open.
    pub fn send_window(&self, message: &WindowMessage) -> Result<(), AudioError> {
        if !self.state.lock().is_connected() {
            return Err(AudioError::Transport("link is not connected".into()));
        }
        if !self.transport.is_open() {
            return Err(AudioError::Transport("socket is not open".into()));
        }
        self.transport.send_text(&message.to_json()?)
    }

    fn with_handler(&self, f: impl FnOnce(&dyn TransportHandler)) {
        let handler = self.handler.lock().clone();
        if let Some(handler) = handler {
            f(handler.as_ref());
        }
    }
}
