//! Forwards channel events to several observers.

use std::sync::Arc;

use crate::domain::channel::InboundMessage;
use crate::ports::{ChannelError, ChannelObserver, CloseNotice};

/// Observer that forwards every event, in order, to each member.
#[derive(Default, Clone)]
pub struct ObserverFanout {
    observers: Vec<Arc<dyn ChannelObserver>>,
}

impl ObserverFanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer; events reach observers in insertion order.
    pub fn with(mut self, observer: Arc<dyn ChannelObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ChannelObserver for ObserverFanout {
    fn on_open(&self) {
        for observer in &self.observers {
            observer.on_open();
        }
    }

    fn on_close(&self, notice: &CloseNotice) {
        for observer in &self.observers {
            observer.on_close(notice);
        }
    }

    fn on_message(&self, message: &InboundMessage) {
        for observer in &self.observers {
            observer.on_message(message);
        }
    }

    fn on_error(&self, error: &ChannelError) {
        for observer in &self.observers {
            observer.on_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::{ObservedEvent, RecordingObserver};

    #[test]
    fn forwards_to_every_observer() {
        let first = Arc::new(RecordingObserver::new());
        let second = Arc::new(RecordingObserver::new());
        let fanout = ObserverFanout::new()
            .with(first.clone())
            .with(second.clone());

        fanout.on_open();

        assert_eq!(fanout.len(), 2);
        assert_eq!(first.events(), vec![ObservedEvent::Open]);
        assert_eq!(second.events(), vec![ObservedEvent::Open]);
    }
}
