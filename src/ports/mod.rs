//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the live-data core and the outside world. Adapters implement these ports.
//!
//! - `Transport` - Opens one full-duplex text connection
//! - `ChannelObserver` - Receives a live channel's lifecycle and messages
//! - `SnapshotSource` - Fetches a one-shot snapshot over HTTP
//! - `MlControlPlane` - Model registry, training, predictions and service config

mod channel_observer;
mod ml_control_plane;
mod snapshot_source;
mod transport;

pub use channel_observer::{ChannelError, ChannelObserver, CloseNotice, NoopObserver};
pub use ml_control_plane::{ControlPlaneError, MlControlPlane};
pub use snapshot_source::{SnapshotError, SnapshotSource};
pub use transport::{
    CloseReason, OutboundFrame, Transport, TransportError, TransportEvent, TransportLink,
};
