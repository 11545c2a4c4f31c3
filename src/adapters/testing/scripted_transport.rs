//! Scripted transport for testing.
//!
//! # Example
//!
//! ```ignore
//! let transport = ScriptedTransport::new().accept().refuse("down");
//! let channel = LiveChannel::open(url, options, Arc::new(transport.clone()), observer);
//!
//! let peer = transport.last_peer().unwrap();
//! peer.push_text(r#"{"type":"update","data":1}"#);
//! peer.close(CloseReason::new(Some(1006), "abnormal"));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::ports::{
    CloseReason, OutboundFrame, Transport, TransportError, TransportEvent, TransportLink,
};

/// Result of one scripted connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Accept,
    Refuse(String),
}

/// Transport whose connects follow a script, consumed in order.
///
/// Once the script is exhausted every connect is refused.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<ConnectOutcome>>>,
    peers: Arc<Mutex<Vec<ScriptedPeer>>>,
    urls: Arc<Mutex<Vec<String>>>,
    /// Simulated handshake latency.
    delay: Duration,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted connect to the script.
    pub fn accept(self) -> Self {
        self.push_outcome(ConnectOutcome::Accept);
        self
    }

    /// Append a refused connect to the script.
    pub fn refuse(self, reason: impl Into<String>) -> Self {
        self.push_outcome(ConnectOutcome::Refuse(reason.into()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Append an outcome while the transport is in use.
    pub fn push_outcome(&self, outcome: ConnectOutcome) {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).push_back(outcome);
    }

    /// Number of connects started so far.
    pub fn connect_attempts(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// URLs passed to `connect`, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Peer of the `index`-th accepted connect.
    pub fn peer(&self, index: usize) -> Option<ScriptedPeer> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner).get(index).cloned()
    }

    pub fn last_peer(&self) -> Option<ScriptedPeer> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    pub fn accepted(&self) -> usize {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).push(url.to_string());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let outcome = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| ConnectOutcome::Refuse("script exhausted".to_string()));

        match outcome {
            ConnectOutcome::Accept => {
                let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                let (events_tx, events_rx) = mpsc::unbounded_channel();
                self.peers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(ScriptedPeer::new(events_tx, outbound_rx));
                Ok(TransportLink::new(outbound_tx, events_rx))
            }
            ConnectOutcome::Refuse(reason) => Err(TransportError::Connect(reason)),
        }
    }
}

/// Server side of one accepted scripted link.
#[derive(Debug, Clone)]
pub struct ScriptedPeer {
    inner: Arc<PeerInner>,
}

#[derive(Debug)]
struct PeerInner {
    events: mpsc::UnboundedSender<TransportEvent>,
    outbound: Mutex<mpsc::UnboundedReceiver<OutboundFrame>>,
    sent: Mutex<Vec<String>>,
    closed_by_client: AtomicBool,
}

impl ScriptedPeer {
    fn new(
        events: mpsc::UnboundedSender<TransportEvent>,
        outbound: mpsc::UnboundedReceiver<OutboundFrame>,
    ) -> Self {
        Self {
            inner: Arc::new(PeerInner {
                events,
                outbound: Mutex::new(outbound),
                sent: Mutex::new(Vec::new()),
                closed_by_client: AtomicBool::new(false),
            }),
        }
    }

    /// Deliver a text frame to the channel. False if the channel let go
    /// of the link.
    pub fn push_text(&self, text: impl Into<String>) -> bool {
        self.inner
            .events
            .send(TransportEvent::Text(text.into()))
            .is_ok()
    }

    pub fn push_error(&self, error: TransportError) -> bool {
        self.inner.events.send(TransportEvent::Error(error)).is_ok()
    }

    /// End the link from the server side.
    pub fn close(&self, reason: CloseReason) -> bool {
        self.inner.events.send(TransportEvent::Closed(reason)).is_ok()
    }

    fn drain(&self) {
        let mut outbound = self.inner.outbound.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sent = self.inner.sent.lock().unwrap_or_else(PoisonError::into_inner);
        while let Ok(frame) = outbound.try_recv() {
            match frame {
                OutboundFrame::Text(text) => sent.push(text),
                OutboundFrame::Close => self.inner.closed_by_client.store(true, Ordering::SeqCst),
            }
        }
    }

    /// Text frames the channel wrote, in order.
    pub fn sent(&self) -> Vec<String> {
        self.drain();
        self.inner.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// True once the channel asked this link to close.
    pub fn closed_by_client(&self) -> bool {
        self.drain();
        self.inner.closed_by_client.load(Ordering::SeqCst)
    }

    /// True once the channel dropped its end of the link.
    pub fn is_released(&self) -> bool {
        self.inner.events.is_closed()
    }
}
