//! Reconnecting live channel.
//!
//! # Architecture
//!
//! ```text
//!  caller ──open/send/close/reconnect──> LiveChannel ──Command──> ChannelDriver
//!                                           │                       │   ▲
//!                                    ChannelShared (state,          │   │ TransportEvent
//!                                    retry, outbound, timer)        ▼   │
//!                                           ▲                    TransportLink
//!                                           └── ReconnectTimer ──Command──┘
//! ```
//!
//! The driver is the only task that talks to the transport and the only
//! caller of the observer, so observer callbacks are strictly serialized.
//! Every state change happens under the shared lock and bumps or checks a
//! generation counter, so a stale timer or a stale transport can never
//! reopen a channel that `close()` has already closed.

mod driver;
mod live_channel;
mod options;
mod reconnect_timer;
mod shared;

pub use live_channel::LiveChannel;
pub use options::ChannelOptions;
