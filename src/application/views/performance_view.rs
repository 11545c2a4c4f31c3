//! Model performance view fed by the performance status channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::watch;

use crate::domain::channel::{InboundMessage, MessageKind};
use crate::domain::performance::{CellSeries, ModelPerformance, PerformanceBoard};
use crate::ports::{ChannelError, ChannelObserver, CloseNotice};

/// Keeps the latest performance of every model.
///
/// A snapshot replaces the whole board; a `performance_update` carries one
/// `model_key` and replaces that model only.
pub struct PerformanceView {
    board: Mutex<PerformanceBoard>,
    max_points: usize,
    revision: watch::Sender<u64>,
    connected: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl PerformanceView {
    /// `max_points` bounds each chart series.
    pub fn new(max_points: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            board: Mutex::new(PerformanceBoard::new()),
            max_points,
            revision,
            connected: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    fn lock_board(&self) -> MutexGuard<'_, PerformanceBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_last_error(&self, error: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    fn applied(&self) {
        self.set_last_error(None);
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn apply_snapshot(&self, message: &InboundMessage) {
        let Some(data) = message.data() else {
            tracing::warn!(tag = %message.tag, "Performance snapshot without data");
            return;
        };

        let result = self.lock_board().replace_all(data.clone());
        match result {
            Ok(()) => {
                tracing::debug!(models = self.lock_board().len(), "Performance snapshot applied");
                self.applied();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed performance snapshot");
                self.set_last_error(Some(e.to_string()));
            }
        }
    }

    fn apply_update(&self, message: &InboundMessage) {
        let Some(model_key) = message.payload.get("model_key").and_then(Value::as_str) else {
            tracing::warn!(tag = %message.tag, "Performance update without model_key");
            return;
        };

        match serde_json::from_value::<ModelPerformance>(message.item().clone()) {
            Ok(performance) => {
                self.lock_board().upsert(model_key, performance);
                tracing::trace!(model_key, "Performance update applied");
                self.applied();
            }
            Err(e) => {
                tracing::warn!(model_key, error = %e, "Malformed performance update");
                self.set_last_error(Some(e.to_string()));
            }
        }
    }

    /// Window sizes available for selection, ascending.
    pub fn window_sizes(&self) -> Vec<u32> {
        self.lock_board().window_sizes()
    }

    /// Chart series for one window size, ordered by cell.
    pub fn series_for_window(&self, window_size: u32) -> Vec<CellSeries> {
        self.lock_board()
            .series_for_window(window_size, self.max_points)
    }

    /// Copy of the current board.
    pub fn board(&self) -> PerformanceBoard {
        self.lock_board().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Last error reported by the channel or by a malformed message.
    /// Cleared by the next applied message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl ChannelObserver for PerformanceView {
    fn on_open(&self) {
        self.connected.store(true, Ordering::Relaxed);
    }

    fn on_close(&self, _notice: &CloseNotice) {
        self.connected.store(false, Ordering::Relaxed);
    }

    fn on_message(&self, message: &InboundMessage) {
        match &message.kind {
            MessageKind::Snapshot => self.apply_snapshot(message),
            MessageKind::IncrementalUpdate => self.apply_update(message),
            MessageKind::HeartbeatResponse => tracing::trace!("Performance heartbeat"),
            MessageKind::Other(tag) => tracing::debug!(tag = %tag, "Ignoring performance message"),
        }
    }

    fn on_error(&self, error: &ChannelError) {
        self.set_last_error(Some(error.to_string()));
    }
}
