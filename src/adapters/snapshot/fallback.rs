//! Static and fallback snapshot sources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{SnapshotError, SnapshotSource};

/// Always returns the same payload.
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource {
    payload: Value,
}

impl StaticSnapshotSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch(&self, _url: &str) -> Result<Value, SnapshotError> {
        Ok(self.payload.clone())
    }
}

/// Tries `primary`, and serves `fallback` when it fails.
///
/// Lets a view render mocked data while a backend is down.
pub struct FallbackSnapshotSource {
    primary: Arc<dyn SnapshotSource>,
    fallback: Value,
}

impl FallbackSnapshotSource {
    pub fn new(primary: Arc<dyn SnapshotSource>, fallback: Value) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl SnapshotSource for FallbackSnapshotSource {
    async fn fetch(&self, url: &str) -> Result<Value, SnapshotError> {
        match self.primary.fetch(url).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(url, error = %e, "Snapshot fetch failed, serving fallback data");
                Ok(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource;

    #[async_trait]
    impl SnapshotSource for FailingSource {
        async fn fetch(&self, _url: &str) -> Result<Value, SnapshotError> {
            Err(SnapshotError::Status(503))
        }
    }

    #[tokio::test]
    async fn primary_payload_wins_when_available() {
        let source = FallbackSnapshotSource::new(
            Arc::new(StaticSnapshotSource::new(json!({"results": [1]}))),
            json!({"results": []}),
        );
        assert_eq!(source.fetch("/x").await.unwrap(), json!({"results": [1]}));
    }

    #[tokio::test]
    async fn fallback_is_served_on_failure() {
        let source = FallbackSnapshotSource::new(Arc::new(FailingSource), json!([{"id": 1}]));
        assert_eq!(source.fetch("/x").await.unwrap(), json!([{"id": 1}]));
    }
}
