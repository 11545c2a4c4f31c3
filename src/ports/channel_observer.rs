//! ChannelObserver port - The full event contract of a live channel.
//!
//! Hosting views implement this trait instead of wiring four loose
//! callbacks. All methods are invoked from the channel's driver task, one
//! at a time, in the order the transport delivered the underlying events.
//! Implementations must not block.

use thiserror::Error;

use crate::domain::channel::{DecodeError, InboundMessage};

use super::transport::{CloseReason, TransportError};

/// Failures reported to observers. None of them are returned to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// Transport-level failure. Does not by itself trigger a reconnect.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An inbound frame could not be decoded and was dropped.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Details delivered with `on_close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseNotice {
    pub reason: CloseReason,
    /// True when the close came from `close()` or a replaced transport.
    pub initiated_locally: bool,
    /// True when an automatic reconnect has been scheduled.
    pub reconnect_scheduled: bool,
    /// True when the retry budget is spent and the channel is now idle
    /// until someone calls `reconnect()`.
    pub retries_exhausted: bool,
}

/// Observer of a live channel's lifecycle and traffic.
///
/// Every method has an empty default so views implement only what they use.
pub trait ChannelObserver: Send + Sync {
    /// The transport connected; state is now `Open`.
    fn on_open(&self) {}

    /// The transport closed; state is now `Closed`.
    fn on_close(&self, _notice: &CloseNotice) {}

    /// A well-formed message arrived.
    fn on_message(&self, _message: &InboundMessage) {}

    /// A transport error occurred or a frame failed to decode.
    fn on_error(&self, _error: &ChannelError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ChannelObserver for NoopObserver {}
