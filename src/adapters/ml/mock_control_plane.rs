//! Demonstration control plane.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ml::{
    mock_cells, mock_models, mock_prediction, InferenceType, MlServiceConfig, Prediction,
    PredictionRequest, RegisteredModel, TrainingAck, TrainingRequest,
};
use crate::ports::{ControlPlaneError, MlControlPlane};

/// Answers every call with fixed demonstration data.
#[derive(Debug, Clone, Default)]
pub struct MockControlPlane;

impl MockControlPlane {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MlControlPlane for MockControlPlane {
    async fn list_models(&self) -> Result<Vec<RegisteredModel>, ControlPlaneError> {
        Ok(mock_models())
    }

    async fn trigger_training(
        &self,
        _request: &TrainingRequest,
    ) -> Result<TrainingAck, ControlPlaneError> {
        Ok(TrainingAck::mocked())
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ControlPlaneError> {
        request.validate()?;
        Ok(mock_prediction(request, Utc::now().timestamp()))
    }

    async fn list_cells(&self) -> Result<Vec<u64>, ControlPlaneError> {
        Ok(mock_cells())
    }

    async fn fetch_config(&self) -> Result<MlServiceConfig, ControlPlaneError> {
        let latency = |horizon: u32| InferenceType {
            name: "latency".to_string(),
            horizon,
            description: format!("Latency over {}s", horizon),
        };
        Ok(MlServiceConfig {
            inference_types: vec![latency(60), latency(300)],
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::AnalyticsType;

    #[tokio::test]
    async fn predictions_are_marked_as_mocked() {
        let prediction = MockControlPlane::new()
            .predict(&PredictionRequest::new(AnalyticsType::Latency, 26379009, 60))
            .await
            .unwrap();
        assert!(prediction.mocked);
    }

    #[tokio::test]
    async fn config_offers_latency_horizons() {
        let config = MockControlPlane::new().fetch_config().await.unwrap();
        assert_eq!(config.analytics_types(), vec!["latency"]);
        assert_eq!(config.horizons_for("latency").count(), 2);
    }
}
