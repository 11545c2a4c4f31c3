//! SnapshotSource port - One-shot fetch of a view's current state.
//!
//! Views call this before (or instead of) waiting for a snapshot message
//! on their live channel. The source returns the raw payload; shape
//! normalization happens in the domain (`normalize_snapshot`).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while fetching a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The request timed out after the given number of milliseconds.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// The body was not valid JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Port for fetching a snapshot payload.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the payload at `url`.
    async fn fetch(&self, url: &str) -> Result<Value, SnapshotError>;
}
