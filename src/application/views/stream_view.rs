//! Bounded streaming view over a live channel.
//!
//! Merges a snapshot with pushed updates into a most-recent-first buffer
//! of fixed capacity:
//!
//! - Snapshot (message or HTTP fetch): normalize, order, replace the buffer
//! - Incremental update: prepend one item, evicting the oldest
//! - Disconnect: keep the last known contents until the next snapshot

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::ChannelConfig;
use crate::domain::channel::{InboundMessage, MessageKind};
use crate::domain::stream::{normalize_snapshot, SeedOrder, StreamBuffer};
use crate::ports::{ChannelError, ChannelObserver, SnapshotError, SnapshotSource};

/// Errors from loading data into a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Payload does not match the view's item type: {0}")]
    Decode(String),
}

/// Bounded, most-recent-first view of `T` items.
pub struct StreamView<T> {
    buffer: Mutex<StreamBuffer<T>>,
    seed_order: SeedOrder,
    revision: watch::Sender<u64>,
    decode_failures: AtomicU64,
}

impl<T> StreamView<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    /// Create an empty view holding at most `capacity` items.
    pub fn new(capacity: usize, seed_order: SeedOrder) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            buffer: Mutex::new(StreamBuffer::new(capacity)),
            seed_order,
            revision,
            decode_failures: AtomicU64::new(0),
        }
    }

    /// Create an empty view sized and ordered by `config`.
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(config.buffer_capacity, config.seed_order)
    }

    fn buffer(&self) -> MutexGuard<'_, StreamBuffer<T>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Replace the contents with `items`, already most recent first.
    pub fn seed(&self, items: Vec<T>) {
        self.buffer().seed(items);
        self.bump_revision();
    }

    /// Prepend one item.
    pub fn push(&self, item: T) {
        self.buffer().push(item);
        self.bump_revision();
    }

    /// Drop everything, e.g. before a snapshot re-fetch or when the view
    /// is torn down.
    pub fn clear(&self) {
        self.buffer().clear();
        self.bump_revision();
    }

    /// Normalize a snapshot payload, order it and seed the buffer.
    ///
    /// Every item must decode as `T`; otherwise the buffer is untouched.
    /// Returns the number of items kept.
    pub fn apply_snapshot(&self, payload: Value) -> Result<usize, ViewError> {
        let items = normalize_snapshot(payload)
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ViewError::Decode(e.to_string()))?;

        let items = self.seed_order.apply(items);
        let mut buffer = self.buffer();
        buffer.seed(items);
        let kept = buffer.len();
        drop(buffer);

        self.bump_revision();
        Ok(kept)
    }

    /// Fetch a snapshot from `source` and seed the view with it.
    pub async fn load_snapshot(
        &self,
        source: &dyn SnapshotSource,
        url: &str,
    ) -> Result<usize, ViewError> {
        let payload = source.fetch(url).await?;
        let kept = self.apply_snapshot(payload)?;
        tracing::debug!(url, kept, "Snapshot loaded");
        Ok(kept)
    }

    /// Items, most recent first.
    pub fn items(&self) -> Vec<T> {
        self.buffer().to_vec()
    }

    pub fn latest(&self) -> Option<T> {
        self.buffer().latest().cloned()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    /// Number of applied changes so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver notified on every applied change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Frames or payloads dropped because they could not be decoded.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    fn record_decode_failure(&self, error: &dyn std::fmt::Display) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(error = %error, "Dropping message the view cannot decode");
    }
}

impl<T> ChannelObserver for StreamView<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    fn on_message(&self, message: &InboundMessage) {
        match &message.kind {
            MessageKind::Snapshot => {
                if let Err(e) = self.apply_snapshot(message.payload.clone()) {
                    self.record_decode_failure(&e);
                }
            }
            MessageKind::IncrementalUpdate => {
                match serde_json::from_value::<T>(message.item().clone()) {
                    Ok(item) => self.push(item),
                    Err(e) => self.record_decode_failure(&e),
                }
            }
            MessageKind::HeartbeatResponse => tracing::trace!("Heartbeat response"),
            MessageKind::Other(tag) => tracing::debug!(tag = %tag, "Ignoring message"),
        }
    }

    fn on_error(&self, error: &ChannelError) {
        if let ChannelError::Decode(e) = error {
            self.record_decode_failure(e);
        }
    }
}
