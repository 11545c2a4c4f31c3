//! Snapshot sources.
//!
//! - `HttpSnapshotClient` - GET against the dashboard backends
//! - `StaticSnapshotSource` - Fixed payload, for demos and tests
//! - `FallbackSnapshotSource` - Primary source with a static fallback

mod fallback;
mod http_client;

pub use fallback::{FallbackSnapshotSource, StaticSnapshotSource};
pub use http_client::HttpSnapshotClient;
