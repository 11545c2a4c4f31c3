//! Backend endpoint configuration
//!
//! Every backend service sits behind the same origin under its own path
//! prefix. Live channels use the same origin with a `ws`/`wss` scheme.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Backend services reachable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Ingestion,
    Storage,
    Ml,
}

/// Endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// Origin of the backend gateway, http or https
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_ingestion_prefix")]
    pub ingestion_prefix: String,

    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    #[serde(default = "default_ml_prefix")]
    pub ml_prefix: String,

    /// Path of the performance status channel under the ML prefix
    #[serde(default = "default_performance_ws_path")]
    pub performance_ws_path: String,

    /// Model registry listing under the ML prefix
    #[serde(default = "default_models_path")]
    pub models_path: String,

    /// Training trigger under the ML prefix
    #[serde(default = "default_train_path")]
    pub train_path: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl EndpointsConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn prefix(&self, service: Service) -> &str {
        match service {
            Service::Ingestion => &self.ingestion_prefix,
            Service::Storage => &self.storage_prefix,
            Service::Ml => &self.ml_prefix,
        }
    }

    /// HTTP URL of `path` on `service`.
    pub fn http_url(&self, service: Service, path: &str) -> String {
        format!("{}{}{}", self.base(), self.prefix(service), path)
    }

    /// WebSocket URL of `path` on `service`. `https` maps to `wss`.
    pub fn ws_url(&self, service: Service, path: &str) -> String {
        let base = self.base();
        let origin = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}{}{}", origin, self.prefix(service), path)
    }

    /// URL of the model performance status channel.
    pub fn performance_ws_url(&self) -> String {
        self.ws_url(Service::Ml, &self.performance_ws_path)
    }

    pub fn models_url(&self) -> String {
        self.http_url(Service::Ml, &self.models_path)
    }

    pub fn train_url(&self) -> String {
        self.http_url(Service::Ml, &self.train_path)
    }

    pub fn analytics_url(&self) -> String {
        self.http_url(Service::Ml, "/api/v1/analytics")
    }

    pub fn ml_config_url(&self) -> String {
        self.http_url(Service::Ml, "/api/v1/config")
    }

    pub fn cells_url(&self) -> String {
        self.http_url(Service::Storage, "/api/v1/cell")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate endpoint configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        for prefix in [
            &self.ingestion_prefix,
            &self.storage_prefix,
            &self.ml_prefix,
            &self.performance_ws_path,
            &self.models_path,
            &self.train_path,
        ] {
            if !prefix.starts_with('/') {
                return Err(ValidationError::InvalidPathPrefix(prefix.clone()));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ingestion_prefix: default_ingestion_prefix(),
            storage_prefix: default_storage_prefix(),
            ml_prefix: default_ml_prefix(),
            performance_ws_path: default_performance_ws_path(),
            models_path: default_models_path(),
            train_path: default_train_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_ingestion_prefix() -> String {
    "/data-ingestion".to_string()
}

fn default_storage_prefix() -> String {
    "/data-storage".to_string()
}

fn default_ml_prefix() -> String {
    "/pei-ml".to_string()
}

fn default_performance_ws_path() -> String {
    "/ws/performance/status".to_string()
}

fn default_models_path() -> String {
    "/api/v1/models".to_string()
}

fn default_train_path() -> String {
    "/api/v1/train".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_ws_url_default() {
        let config = EndpointsConfig::default();
        assert_eq!(
            config.performance_ws_url(),
            "ws://localhost:5173/pei-ml/ws/performance/status"
        );
    }

    #[test]
    fn test_https_maps_to_wss() {
        let config = EndpointsConfig {
            base_url: "https://aion.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.ws_url(Service::Ml, "/ws/performance/status"),
            "wss://aion.example.com/pei-ml/ws/performance/status"
        );
    }

    #[test]
    fn test_http_url_per_service() {
        let config = EndpointsConfig::default();
        assert_eq!(
            config.http_url(Service::Storage, "/api/v1/cell"),
            "http://localhost:5173/data-storage/api/v1/cell"
        );
        assert_eq!(
            config.http_url(Service::Ingestion, "/status"),
            "http://localhost:5173/data-ingestion/status"
        );
    }

    #[test]
    fn test_control_plane_urls() {
        let config = EndpointsConfig::default();
        assert_eq!(config.models_url(), "http://localhost:5173/pei-ml/api/v1/models");
        assert_eq!(config.train_url(), "http://localhost:5173/pei-ml/api/v1/train");
        assert_eq!(config.analytics_url(), "http://localhost:5173/pei-ml/api/v1/analytics");
        assert_eq!(config.ml_config_url(), "http://localhost:5173/pei-ml/api/v1/config");
        assert_eq!(config.cells_url(), "http://localhost:5173/data-storage/api/v1/cell");
    }

    #[test]
    fn test_validation_rejects_bad_scheme() {
        let config = EndpointsConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_validation_rejects_relative_prefix() {
        let config = EndpointsConfig {
            ml_prefix: "pei-ml".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPathPrefix("pei-ml".to_string()))
        );
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = EndpointsConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
