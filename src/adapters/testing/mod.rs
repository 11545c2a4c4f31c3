//! In-memory fakes for driving live channels in tests.
//!
//! - `ScriptedTransport` - Accepts or refuses connects from a script and
//!   hands the test a `ScriptedPeer` for each accepted link
//! - `RecordingObserver` - Records every observer callback in order

mod recording_observer;
mod scripted_transport;

pub use recording_observer::{ObservedEvent, RecordingObserver};
pub use scripted_transport::{ConnectOutcome, ScriptedPeer, ScriptedTransport};
