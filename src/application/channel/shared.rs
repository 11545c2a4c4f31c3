//! State shared between a `LiveChannel` handle and its driver task.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};

use crate::domain::channel::{ConnectionState, InboundMessage, RetryState};
use crate::domain::foundation::StateMachine;
use crate::ports::OutboundFrame;

use super::reconnect_timer::ReconnectTimer;

/// Mutable channel bookkeeping, guarded by one lock.
#[derive(Debug)]
pub(crate) struct ChannelInner {
    pub(crate) state: ConnectionState,
    pub(crate) retry: RetryState,
    /// Cleared by `close()`, re-armed by `reconnect()`.
    pub(crate) auto_reconnect: bool,
    /// Bumped by every `close()` and `reconnect()`. Work tagged with an
    /// older generation is discarded.
    pub(crate) generation: u64,
    /// Writer of the live transport, present only while `Open`.
    pub(crate) outbound: Option<mpsc::UnboundedSender<OutboundFrame>>,
    pub(crate) timer: Option<ReconnectTimer>,
}

impl ChannelInner {
    /// Abort any scheduled reconnect.
    pub(crate) fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Ask the live transport, if any, to close.
    pub(crate) fn release_transport(&mut self) {
        if let Some(outbound) = self.outbound.take() {
            let _ = outbound.send(OutboundFrame::Close);
        }
    }
}

pub(crate) struct ChannelShared {
    pub(crate) url: String,
    inner: Mutex<ChannelInner>,
    state_tx: watch::Sender<ConnectionState>,
    last_message: Mutex<Option<InboundMessage>>,
}

impl ChannelShared {
    pub(crate) fn new(url: String, retry: RetryState) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Closed);
        Self {
            url,
            inner: Mutex::new(ChannelInner {
                state: ConnectionState::Closed,
                retry,
                auto_reconnect: true,
                generation: 0,
                outbound: None,
                timer: None,
            }),
            state_tx,
            last_message: Mutex::new(None),
        }
    }

    /// Lock the bookkeeping. A panicking observer cannot wedge the channel.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ChannelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `target` and publish it. Returns false if nothing changed.
    pub(crate) fn set_state(&self, inner: &mut ChannelInner, target: ConnectionState) -> bool {
        if inner.state == target {
            return false;
        }
        match inner.state.transition_to(target) {
            Ok(next) => {
                tracing::debug!(url = %self.url, from = %inner.state, to = %next, "Channel state change");
                inner.state = next;
                self.state_tx.send_replace(next);
                true
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Rejected channel state change");
                false
            }
        }
    }

    pub(crate) fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Queue `text` on the live transport. Fails unless `Open`.
    pub(crate) fn transmit(&self, text: String) -> bool {
        let inner = self.lock();
        if !inner.state.is_open() {
            tracing::debug!(url = %self.url, state = %inner.state, "Channel not open, dropping send");
            return false;
        }
        match inner.outbound.as_ref() {
            Some(outbound) => outbound.send(OutboundFrame::Text(text)).is_ok(),
            None => false,
        }
    }

    pub(crate) fn record_message(&self, message: &InboundMessage) {
        *self
            .last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.clone());
    }

    pub(crate) fn last_message(&self) -> Option<InboundMessage> {
        self.last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
