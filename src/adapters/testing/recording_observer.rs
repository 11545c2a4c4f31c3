//! Observer that records callbacks for later assertions.

use std::sync::{Mutex, PoisonError};

use crate::domain::channel::InboundMessage;
use crate::ports::{ChannelError, ChannelObserver, CloseNotice};

/// One recorded observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Open,
    Close(CloseNotice),
    Message(InboundMessage),
    /// Display text of the reported error.
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: ObservedEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    /// Everything recorded so far, in callback order.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn opens(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ObservedEvent::Open))
            .count()
    }

    pub fn closes(&self) -> Vec<CloseNotice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Close(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<InboundMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Error(error) => Some(error),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ChannelObserver for RecordingObserver {
    fn on_open(&self) {
        self.record(ObservedEvent::Open);
    }

    fn on_close(&self, notice: &CloseNotice) {
        self.record(ObservedEvent::Close(notice.clone()));
    }

    fn on_message(&self, message: &InboundMessage) {
        self.record(ObservedEvent::Message(message.clone()));
    }

    fn on_error(&self, error: &ChannelError) {
        self.record(ObservedEvent::Error(error.to_string()));
    }
}
