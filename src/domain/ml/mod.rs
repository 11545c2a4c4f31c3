//! ML control plane module - Model registry, training and analytics.
//!
//! Request and response shapes of the ML service's REST API, plus the
//! demonstration data the dashboard shows while that service is down.

mod analytics;
mod registry;
mod service_config;

pub use analytics::{mock_cells, mock_prediction, AnalyticsType, Prediction, PredictionRequest};
pub use registry::{
    mock_models, normalize_models, ModelVersion, RegisteredModel, TrainingAck, TrainingRequest,
};
pub use service_config::{InferenceType, MlServiceConfig};
