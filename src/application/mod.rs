//! Application layer - Live channels and the views they feed.
//!
//! - [`channel`] - The reconnecting live channel
//! - [`views`] - Observers that turn channel traffic into renderable state

pub mod channel;
pub mod views;

pub use channel::{ChannelOptions, LiveChannel};
pub use views::{ObserverFanout, PerformanceView, ServiceConfigView, StreamView, ViewError};
