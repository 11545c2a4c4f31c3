//! Channel module - Vocabulary of the reconnecting live channel.
//!
//! - [`ConnectionState`] - Lifecycle of the single logical connection
//! - [`RetryState`] - Bounded reconnect bookkeeping
//! - [`InboundMessage`] - Decoded, kind-tagged message from the endpoint
//! - [`OutboundPayload`] - Text or structured value queued for sending

mod connection_state;
mod message;
mod retry;

pub use connection_state::ConnectionState;
pub use message::{DecodeError, InboundMessage, MessageKind, OutboundPayload, KIND_FIELD};
pub use retry::RetryState;
