//! WebSocket transport for live channels.
//!
//! Implements the `Transport` port over `tokio-tungstenite`. Each connection
//! is pumped by two tasks:
//! 1. Writer: drains outbound frames into the socket sink
//! 2. Reader: turns socket messages into transport events

mod transport;

pub use transport::TungsteniteTransport;
