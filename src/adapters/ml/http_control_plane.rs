//! ML control plane over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::EndpointsConfig;
use crate::domain::ml::{
    normalize_models, MlServiceConfig, Prediction, PredictionRequest, RegisteredModel,
    TrainingAck, TrainingRequest,
};
use crate::ports::{ControlPlaneError, MlControlPlane};

/// Talks JSON to the ML service and the storage service.
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: Client,
    timeout: Duration,
    models_url: String,
    train_url: String,
    analytics_url: String,
    config_url: String,
    cells_url: String,
}

impl HttpControlPlane {
    /// Creates a client for the services in `endpoints`, using its request
    /// timeout.
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self, ControlPlaneError> {
        let timeout = endpoints.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControlPlaneError::Request(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            models_url: endpoints.models_url(),
            train_url: endpoints.train_url(),
            analytics_url: endpoints.analytics_url(),
            config_url: endpoints.ml_config_url(),
            cells_url: endpoints.cells_url(),
        })
    }

    fn map_error(&self, error: reqwest::Error) -> ControlPlaneError {
        if error.is_timeout() {
            ControlPlaneError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if error.is_decode() {
            ControlPlaneError::Decode(error.to_string())
        } else {
            ControlPlaneError::Request(error.to_string())
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, ControlPlaneError> {
        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Control plane request rejected");
            return Err(ControlPlaneError::Status(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| self.map_error(e))
    }
}

#[async_trait]
impl MlControlPlane for HttpControlPlane {
    async fn list_models(&self) -> Result<Vec<RegisteredModel>, ControlPlaneError> {
        let payload: Value = self
            .execute(&self.models_url, self.client.get(&self.models_url))
            .await?;
        normalize_models(payload).map_err(|e| ControlPlaneError::Decode(e.to_string()))
    }

    async fn trigger_training(
        &self,
        request: &TrainingRequest,
    ) -> Result<TrainingAck, ControlPlaneError> {
        tracing::info!(
            analytics_type = ?request.analytics_type,
            horizon = request.horizon,
            model_type = %request.model_type,
            "Requesting training run"
        );
        self.execute(&self.train_url, self.client.post(&self.train_url).json(request))
            .await
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ControlPlaneError> {
        request.validate()?;
        self.execute(
            &self.analytics_url,
            self.client.post(&self.analytics_url).json(request),
        )
        .await
    }

    async fn list_cells(&self) -> Result<Vec<u64>, ControlPlaneError> {
        self.execute(&self.cells_url, self.client.get(&self.cells_url))
            .await
    }

    async fn fetch_config(&self) -> Result<MlServiceConfig, ControlPlaneError> {
        self.execute(&self.config_url, self.client.get(&self.config_url))
            .await
    }
}
