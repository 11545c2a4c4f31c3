//! Options recognised by `LiveChannel::open`.

use std::time::Duration;

use crate::config::ChannelConfig;

/// Configuration of one live channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOptions {
    /// When false, `open` makes no connection attempt.
    pub enabled: bool,

    /// Delay before each automatic reconnect.
    ///
    /// Default: 3 seconds
    pub reconnect_delay: Duration,

    /// Automatic reconnects allowed since the last successful open.
    ///
    /// Default: 10
    pub max_reconnect_attempts: u32,

    /// Liveness ping period while open. `None` disables pings.
    pub heartbeat_interval: Option<Duration>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect_delay: Duration::from_millis(3000),
            max_reconnect_attempts: 10,
            heartbeat_interval: None,
        }
    }
}

impl ChannelOptions {
    /// Create options with connecting enabled or disabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Create options with a custom reconnect delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Create options with a custom reconnect budget.
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Create options that ping the endpoint every `interval` while open.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }
}

impl From<&ChannelConfig> for ChannelOptions {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            enabled: config.enabled,
            reconnect_delay: config.reconnect_delay(),
            max_reconnect_attempts: config.max_reconnect_attempts,
            heartbeat_interval: config.heartbeat_interval(),
        }
    }
}
