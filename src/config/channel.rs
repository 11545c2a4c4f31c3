//! Live channel configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::stream::SeedOrder;

use super::error::ValidationError;

/// Live channel and streaming view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Connect when a channel is opened
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Fixed delay before each reconnect attempt
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Reconnect attempts allowed since the last successful open
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Liveness ping period, 0 disables pings
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Capacity of streaming view buffers
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// How fetched snapshots are ordered before seeding
    #[serde(default)]
    pub seed_order: SeedOrder,
}

impl ChannelConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Ping period, or `None` when pings are disabled.
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        (self.heartbeat_interval_secs > 0)
            .then(|| Duration::from_secs(self.heartbeat_interval_secs))
    }

    /// Validate channel configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reconnect_delay_ms == 0 {
            return Err(ValidationError::InvalidReconnectDelay);
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            buffer_capacity: default_buffer_capacity(),
            seed_order: SeedOrder::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_reconnect_delay_ms() -> u64 {
    3000
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_buffer_capacity() -> usize {
    100
}
