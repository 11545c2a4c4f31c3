//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AION_` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a working setup
//! against a local dashboard gateway.
//!
//! # Example
//!
//! ```no_run
//! use aion_live::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Performance channel: {}", config.endpoints.performance_ws_url());
//! ```

mod channel;
mod endpoints;
mod error;
mod logging;

pub use channel::ChannelConfig;
pub use endpoints::{EndpointsConfig, Service};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend gateway origin and per-service path prefixes
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Reconnect policy, heartbeat and view buffer settings
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AION__ENDPOINTS__BASE_URL=https://aion.example.com` -> `endpoints.base_url`
    /// - `AION__CHANNEL__MAX_RECONNECT_ATTEMPTS=5` -> `channel.max_reconnect_attempts = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.endpoints.validate()?;
        self.channel.validate()?;
        Ok(())
    }
}
