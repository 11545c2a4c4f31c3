//! Public handle of a reconnecting live channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::channel::{ConnectionState, InboundMessage, OutboundPayload, RetryState};
use crate::ports::{ChannelObserver, Transport};

use super::driver::{ChannelDriver, Command};
use super::options::ChannelOptions;
use super::shared::ChannelShared;

/// One logical connection to one URL that survives transient failures.
///
/// - `open` returns immediately; the connection is made on a driver task.
/// - An unexpected close schedules a reconnect after `reconnect_delay`,
///   up to `max_reconnect_attempts` times since the last successful open.
///   After that the channel stays `Closed` until `reconnect()` is called.
/// - Transport errors and undecodable frames go to the observer and never
///   change the connection state.
/// - `close()` cancels any pending reconnect and stops auto-reconnect.
///
/// Dropping the handle closes the channel and stops the driver.
///
/// # Example
///
/// ```ignore
/// let channel = LiveChannel::open(
///     endpoints.performance_ws_url(),
///     ChannelOptions::default().with_heartbeat_interval(Duration::from_secs(30)),
///     Arc::new(TungsteniteTransport::new()),
///     view.clone(),
/// );
/// channel.send(OutboundPayload::ping());
/// ```
pub struct LiveChannel {
    id: Uuid,
    shared: Arc<ChannelShared>,
    commands: mpsc::UnboundedSender<Command>,
    driver: JoinHandle<()>,
}

impl LiveChannel {
    /// Create the channel and, if enabled, start connecting.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(
        url: impl Into<String>,
        options: ChannelOptions,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ChannelObserver>,
    ) -> Self {
        let shared = Arc::new(ChannelShared::new(
            url.into(),
            RetryState::new(options.max_reconnect_attempts, options.reconnect_delay),
        ));
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let driver = ChannelDriver::new(
            Arc::clone(&shared),
            transport,
            observer,
            commands_tx.clone(),
            commands_rx,
            options.heartbeat_interval,
        );

        let channel = Self {
            id: Uuid::new_v4(),
            shared,
            commands: commands_tx,
            driver: tokio::spawn(driver.run()),
        };

        if options.enabled {
            channel.begin_connect();
        } else {
            tracing::debug!(channel_id = %channel.id, url = %channel.shared.url, "Channel disabled, not connecting");
        }
        channel
    }

    /// Transmit `data` if the channel is open.
    ///
    /// Structured values are serialized to JSON text. Returns false, and
    /// transmits nothing, in any other state.
    pub fn send(&self, data: impl Into<OutboundPayload>) -> bool {
        self.shared.transmit(data.into().into_text())
    }

    /// Serialize `value` as JSON and transmit it. Returns false if the
    /// value cannot be serialized or the channel is not open.
    pub fn send_json<T: Serialize>(&self, value: &T) -> bool {
        match OutboundPayload::json(value) {
            Ok(payload) => self.send(payload),
            Err(e) => {
                tracing::warn!(channel_id = %self.id, error = %e, "Failed to serialize outbound message");
                false
            }
        }
    }

    /// Close the channel. Idempotent.
    ///
    /// Cancels any pending reconnect before returning, so no connection
    /// attempt starts afterwards unless `reconnect()` is called.
    pub fn close(&self) {
        {
            let mut inner = self.shared.lock();
            inner.auto_reconnect = false;
            inner.generation += 1;
            inner.cancel_timer();
            inner.release_transport();
            self.shared.set_state(&mut inner, ConnectionState::Closed);
        }
        tracing::debug!(channel_id = %self.id, url = %self.shared.url, "Close requested");
        let _ = self.commands.send(Command::Close);
    }

    /// Start a fresh connection now.
    ///
    /// Resets the attempt counter, cancels any pending reconnect, re-arms
    /// auto-reconnect and replaces the live transport, if any. This is the
    /// way out of the terminal disconnected state.
    pub fn reconnect(&self) {
        tracing::info!(channel_id = %self.id, url = %self.shared.url, "Reconnect requested");
        self.begin_connect();
    }

    fn begin_connect(&self) {
        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.cancel_timer();
            inner.retry.reset();
            inner.auto_reconnect = true;
            inner.release_transport();
            self.shared.set_state(&mut inner, ConnectionState::Connecting);
            inner.generation
        };
        let _ = self.commands.send(Command::Connect {
            generation,
            retry: false,
        });
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.lock().state
    }

    /// Receiver that sees every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.subscribe_state()
    }

    /// Most recently received well-formed message.
    pub fn last_message(&self) -> Option<InboundMessage> {
        self.shared.last_message()
    }

    /// Reconnect attempts since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.lock().retry.attempts()
    }

    /// True while a reconnect timer is waiting to fire.
    pub fn has_pending_reconnect(&self) -> bool {
        self.shared
            .lock()
            .timer
            .as_ref()
            .is_some_and(|timer| timer.is_pending())
    }

    /// Attempt number the pending reconnect will start, if any.
    pub fn pending_reconnect_attempt(&self) -> Option<u32> {
        self.shared
            .lock()
            .timer
            .as_ref()
            .filter(|timer| timer.is_pending())
            .map(|timer| timer.attempt())
    }

    pub fn url(&self) -> &str {
        &self.shared.url
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.close();
        self.driver.abort();
    }
}

impl std::fmt::Debug for LiveChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveChannel")
            .field("id", &self.id)
            .field("url", &self.shared.url)
            .field("state", &self.state())
            .finish()
    }
}
