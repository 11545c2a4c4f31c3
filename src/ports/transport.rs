//! Transport port - Interface to one full-duplex text connection.
//!
//! The live channel never touches a socket type directly. It asks a
//! [`Transport`] for a [`TransportLink`] and then talks to the link over
//! two queues:
//!
//! ```text
//!   LiveChannel ──OutboundFrame──> link.outbound ──> socket
//!   LiveChannel <──TransportEvent── link.events  <── socket
//! ```
//!
//! Adapters pump the socket on their own tasks, so both queues are
//! cancel-safe to wait on.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Frames the channel asks the transport to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// A text message.
    Text(String),
    /// Close the connection gracefully.
    Close,
}

/// Why a connection ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloseReason {
    /// Protocol close code, when the peer sent one.
    pub code: Option<u16>,
    /// Human readable reason, possibly empty.
    pub reason: String,
}

impl CloseReason {
    pub fn new(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// The event stream ended without a close frame.
    pub fn transport_gone() -> Self {
        Self::new(None, "transport ended")
    }
}

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Text(String),
    /// A transport-level error. Does not by itself end the connection.
    Error(TransportError),
    /// The connection ended. No further events follow.
    Closed(CloseReason),
}

/// Errors raised by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// A frame could not be written.
    #[error("Send failed: {0}")]
    Send(String),

    /// The peer violated the protocol or sent an unreadable frame.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// An established connection, expressed as two queues.
#[derive(Debug)]
pub struct TransportLink {
    pub outbound: mpsc::UnboundedSender<OutboundFrame>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl TransportLink {
    pub fn new(
        outbound: mpsc::UnboundedSender<OutboundFrame>,
        events: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> Self {
        Self { outbound, events }
    }
}

/// Port for opening connections to a URL.
///
/// # Example
///
/// ```ignore
/// let link = transport.connect("ws://localhost:5173/pei-ml/ws/performance/status").await?;
/// link.outbound.send(OutboundFrame::Text(r#"{"type":"ping"}"#.into()))?;
/// while let Some(event) = link.events.recv().await {
///     // ...
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish a connection.
    ///
    /// Resolves once the connection is usable or has definitively failed.
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError>;
}
