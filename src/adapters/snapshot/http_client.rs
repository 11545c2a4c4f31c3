//! HTTP snapshot source backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::ports::{SnapshotError, SnapshotSource};

/// Fetches snapshots with a plain GET and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpSnapshotClient {
    client: Client,
    timeout: Duration,
}

impl HttpSnapshotClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SnapshotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SnapshotError::Request(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn map_error(&self, error: reqwest::Error) -> SnapshotError {
        if error.is_timeout() {
            SnapshotError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if error.is_decode() {
            SnapshotError::Decode(error.to_string())
        } else {
            SnapshotError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotClient {
    async fn fetch(&self, url: &str) -> Result<Value, SnapshotError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Snapshot request rejected");
            return Err(SnapshotError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| self.map_error(e))
    }
}
