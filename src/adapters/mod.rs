//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the live-data core to external systems:
//! - `websocket` - `Transport` over tokio-tungstenite
//! - `snapshot` - `SnapshotSource` over reqwest, plus static and fallback sources
//! - `ml` - `MlControlPlane` over reqwest, plus mock and fallback control planes
//! - `testing` - Scripted transport and recording observer for tests

pub mod ml;
pub mod snapshot;
pub mod testing;
pub mod websocket;

pub use ml::{FallbackControlPlane, HttpControlPlane, MockControlPlane};
pub use snapshot::{FallbackSnapshotSource, HttpSnapshotClient, StaticSnapshotSource};
pub use websocket::TungsteniteTransport;
