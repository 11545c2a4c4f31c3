//! Driver task: owns the transport link and calls the observer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::domain::channel::{ConnectionState, InboundMessage, OutboundPayload};
use crate::ports::{
    ChannelError, ChannelObserver, CloseNotice, CloseReason, OutboundFrame, Transport,
    TransportEvent, TransportLink,
};

use super::reconnect_timer::ReconnectTimer;
use super::shared::ChannelShared;

/// Close code reported when the client closes the connection itself.
const NORMAL_CLOSURE: u16 = 1000;

/// Requests handled by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Open a fresh transport, replacing any live one.
    ///
    /// `retry` marks a reconnect started by the timer; it counts against
    /// the retry budget.
    Connect { generation: u64, retry: bool },
    /// `close()` was called; release the link and notify the observer.
    Close,
}

/// The link currently owned by the driver.
struct ActiveLink {
    generation: u64,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    heartbeat: Option<Interval>,
}

enum LinkActivity {
    Event(TransportEvent),
    Heartbeat,
}

pub(crate) struct ChannelDriver {
    shared: Arc<ChannelShared>,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn ChannelObserver>,
    commands_tx: mpsc::UnboundedSender<Command>,
    commands: mpsc::UnboundedReceiver<Command>,
    heartbeat_interval: Option<Duration>,
    link: Option<ActiveLink>,
}

impl ChannelDriver {
    pub(crate) fn new(
        shared: Arc<ChannelShared>,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ChannelObserver>,
        commands_tx: mpsc::UnboundedSender<Command>,
        commands: mpsc::UnboundedReceiver<Command>,
        heartbeat_interval: Option<Duration>,
    ) -> Self {
        Self {
            shared,
            transport,
            observer,
            commands_tx,
            commands,
            heartbeat_interval,
            link: None,
        }
    }

    /// Process commands and link activity until the channel is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                activity = next_activity(&mut self.link) => self.handle_activity(activity),
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect { generation, retry } => self.connect(generation, retry).await,
            Command::Close => {
                if self.link.take().is_some() {
                    self.notify_local_close(CloseReason::new(
                        Some(NORMAL_CLOSURE),
                        "closed by client",
                    ));
                }
            }
        }
    }

    async fn connect(&mut self, generation: u64, retry: bool) {
        {
            let mut inner = self.shared.lock();
            if generation != inner.generation {
                tracing::debug!(url = %self.shared.url, "Ignoring stale connect request");
                return;
            }
            if retry {
                inner.timer = None;
                match inner.retry.record_attempt() {
                    Some(attempt) => tracing::info!(
                        url = %self.shared.url,
                        attempt,
                        max_attempts = inner.retry.max_attempts(),
                        "Reconnecting"
                    ),
                    None => return,
                }
            }
            inner.release_transport();
            self.shared.set_state(&mut inner, ConnectionState::Connecting);
        }

        if self.link.take().is_some() {
            self.notify_local_close(CloseReason::new(Some(NORMAL_CLOSURE), "replaced by reconnect"));
        }

        tracing::info!(url = %self.shared.url, "Connecting");
        let result = self.transport.connect(&self.shared.url).await;

        let mut inner = self.shared.lock();
        if generation != inner.generation {
            // close() or reconnect() ran while the connect was in flight.
            if let Ok(link) = result {
                let _ = link.outbound.send(OutboundFrame::Close);
            }
            return;
        }

        match result {
            Ok(TransportLink { outbound, events }) => {
                inner.retry.reset();
                inner.outbound = Some(outbound);
                self.shared.set_state(&mut inner, ConnectionState::Open);
                drop(inner);

                self.link = Some(ActiveLink {
                    generation,
                    events,
                    heartbeat: self.heartbeat_interval.and_then(|period| self.heartbeat(period)),
                });
                tracing::info!(url = %self.shared.url, "Channel open");
                self.observer.on_open();
            }
            Err(error) => {
                drop(inner);
                tracing::warn!(url = %self.shared.url, error = %error, "Connection attempt failed");
                let reason = CloseReason::new(None, error.to_string());
                self.observer.on_error(&ChannelError::Transport(error));
                self.handle_unexpected_close(generation, reason);
            }
        }
    }

    fn handle_activity(&mut self, activity: LinkActivity) {
        let Some(link_generation) = self.link.as_ref().map(|link| link.generation) else {
            return;
        };
        let current = link_generation == self.shared.generation();

        match activity {
            LinkActivity::Event(TransportEvent::Closed(reason)) => {
                self.link = None;
                if current {
                    self.handle_unexpected_close(link_generation, reason);
                } else {
                    self.notify_local_close(reason);
                }
            }
            // Traffic from a link that close() or reconnect() already released.
            _ if !current => {}
            LinkActivity::Event(TransportEvent::Text(text)) => self.handle_text(&text),
            LinkActivity::Event(TransportEvent::Error(error)) => {
                tracing::warn!(url = %self.shared.url, error = %error, "Transport error");
                self.observer.on_error(&ChannelError::Transport(error));
            }
            LinkActivity::Heartbeat => {
                let sent = self.shared.transmit(OutboundPayload::ping().into_text());
                tracing::trace!(url = %self.shared.url, sent, "Heartbeat ping");
            }
        }
    }

    fn handle_text(&self, text: &str) {
        match InboundMessage::decode(text) {
            Ok(message) => {
                tracing::debug!(
                    url = %self.shared.url,
                    kind = message.kind.label(),
                    received_at = %message.received_at.to_rfc3339(),
                    "Message received"
                );
                self.shared.record_message(&message);
                self.observer.on_message(&message);
            }
            Err(error) => {
                tracing::warn!(url = %self.shared.url, error = %error, "Dropping undecodable message");
                self.observer.on_error(&ChannelError::Decode(error));
            }
        }
    }

    /// The link went away without `close()`: go `Closed` and maybe retry.
    fn handle_unexpected_close(&mut self, generation: u64, reason: CloseReason) {
        let mut inner = self.shared.lock();
        if generation != inner.generation {
            return;
        }
        inner.outbound = None;
        self.shared.set_state(&mut inner, ConnectionState::Closed);

        let mut reconnect_scheduled = false;
        let mut retries_exhausted = false;
        if inner.auto_reconnect {
            if inner.retry.can_retry() {
                let delay = inner.retry.delay();
                let attempt = inner.retry.attempts() + 1;
                inner.cancel_timer();
                inner.timer = Some(ReconnectTimer::schedule(
                    delay,
                    attempt,
                    generation,
                    self.commands_tx.clone(),
                ));
                reconnect_scheduled = true;
                tracing::info!(
                    url = %self.shared.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnect scheduled"
                );
            } else {
                retries_exhausted = true;
                tracing::warn!(
                    url = %self.shared.url,
                    attempts = inner.retry.attempts(),
                    "Reconnect attempts exhausted, channel disconnected"
                );
            }
        }
        drop(inner);

        tracing::info!(url = %self.shared.url, code = ?reason.code, reason = %reason.reason, "Channel closed unexpectedly");
        self.observer.on_close(&CloseNotice {
            reason,
            initiated_locally: false,
            reconnect_scheduled,
            retries_exhausted,
        });
    }

    fn notify_local_close(&self, reason: CloseReason) {
        tracing::info!(url = %self.shared.url, "Channel closed");
        self.observer.on_close(&CloseNotice {
            reason,
            initiated_locally: true,
            reconnect_scheduled: false,
            retries_exhausted: false,
        });
    }

    /// Ping timer for a fresh link. A period that is zero or too far out
    /// to schedule disables pings for the link.
    fn heartbeat(&self, period: Duration) -> Option<Interval> {
        let start = (!period.is_zero())
            .then(|| Instant::now().checked_add(period))
            .flatten();
        let Some(start) = start else {
            tracing::warn!(url = %self.shared.url, period = ?period, "Heartbeat period cannot be scheduled, pings disabled");
            return None;
        };
        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(interval)
    }
}

/// Wait for the next thing the live link has to say. Pends forever with no link.
async fn next_activity(link: &mut Option<ActiveLink>) -> LinkActivity {
    let Some(link) = link.as_mut() else {
        return std::future::pending().await;
    };
    let closed = || TransportEvent::Closed(CloseReason::transport_gone());

    match link.heartbeat.as_mut() {
        Some(heartbeat) => tokio::select! {
            event = link.events.recv() => LinkActivity::Event(event.unwrap_or_else(closed)),
            _ = heartbeat.tick() => LinkActivity::Heartbeat,
        },
        None => LinkActivity::Event(link.events.recv().await.unwrap_or_else(closed)),
    }
}
