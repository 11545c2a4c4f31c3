//! Views fed by live channels.
//!
//! Each view implements [`ChannelObserver`](crate::ports::ChannelObserver)
//! and is handed to `LiveChannel::open`. Every applied change bumps a
//! revision counter that renderers can watch instead of polling.
//! [`ServiceConfigView`] follows the same pattern for the ML service
//! config, which is fetched over REST rather than pushed.

mod fanout;
mod performance_view;
mod service_config_view;
mod stream_view;

pub use fanout::ObserverFanout;
pub use performance_view::PerformanceView;
pub use service_config_view::ServiceConfigView;
pub use stream_view::{StreamView, ViewError};
