//! MlControlPlane port - REST operations of the ML service.
//!
//! Covers everything the dashboard asks the ML service and the storage
//! service outside of live channels: the model registry, training runs,
//! analytics predictions, the cell list and the service's runtime config.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::ml::{
    MlServiceConfig, Prediction, PredictionRequest, RegisteredModel, TrainingAck, TrainingRequest,
};

/// Errors from control plane calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlPlaneError {
    /// The request was refused before anything was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ControlPlaneError {
    /// True when the backend could not be used at all, as opposed to the
    /// caller asking for something unsupported.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, ControlPlaneError::Invalid(_))
    }
}

/// Port for the ML service's REST API.
#[async_trait]
pub trait MlControlPlane: Send + Sync {
    /// Registered models.
    async fn list_models(&self) -> Result<Vec<RegisteredModel>, ControlPlaneError>;

    /// Start a training run.
    async fn trigger_training(
        &self,
        request: &TrainingRequest,
    ) -> Result<TrainingAck, ControlPlaneError>;

    /// Predict one cell's value over the request's horizon.
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ControlPlaneError>;

    /// Cells with stored telemetry.
    async fn list_cells(&self) -> Result<Vec<u64>, ControlPlaneError>;

    /// The ML service's runtime configuration.
    async fn fetch_config(&self) -> Result<MlServiceConfig, ControlPlaneError>;
}
