//! Control plane with a mocked fallback.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ml::{
    MlServiceConfig, Prediction, PredictionRequest, RegisteredModel, TrainingAck, TrainingRequest,
};
use crate::ports::{ControlPlaneError, MlControlPlane};

use super::MockControlPlane;

/// Serves demonstration data whenever `primary` is unavailable.
///
/// Requests the primary refuses as invalid are not masked, and the service
/// config is never mocked: callers need to know it could not be loaded.
pub struct FallbackControlPlane {
    primary: Arc<dyn MlControlPlane>,
    fallback: MockControlPlane,
}

impl FallbackControlPlane {
    pub fn new(primary: Arc<dyn MlControlPlane>) -> Self {
        Self {
            primary,
            fallback: MockControlPlane::new(),
        }
    }

    async fn or_fallback<T, P, F>(
        &self,
        operation: &'static str,
        primary: P,
        fallback: F,
    ) -> Result<T, ControlPlaneError>
    where
        P: Future<Output = Result<T, ControlPlaneError>> + Send,
        F: Future<Output = Result<T, ControlPlaneError>> + Send,
    {
        match primary.await {
            Err(e) if e.is_unavailable() => {
                tracing::warn!(operation, error = %e, "Control plane unavailable, using mock data");
                fallback.await
            }
            result => result,
        }
    }
}

#[async_trait]
impl MlControlPlane for FallbackControlPlane {
    async fn list_models(&self) -> Result<Vec<RegisteredModel>, ControlPlaneError> {
        self.or_fallback(
            "list_models",
            self.primary.list_models(),
            self.fallback.list_models(),
        )
        .await
    }

    async fn trigger_training(
        &self,
        request: &TrainingRequest,
    ) -> Result<TrainingAck, ControlPlaneError> {
        self.or_fallback(
            "trigger_training",
            self.primary.trigger_training(request),
            self.fallback.trigger_training(request),
        )
        .await
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ControlPlaneError> {
        self.or_fallback(
            "predict",
            self.primary.predict(request),
            self.fallback.predict(request),
        )
        .await
    }

    async fn list_cells(&self) -> Result<Vec<u64>, ControlPlaneError> {
        self.or_fallback(
            "list_cells",
            self.primary.list_cells(),
            self.fallback.list_cells(),
        )
        .await
    }

    async fn fetch_config(&self) -> Result<MlServiceConfig, ControlPlaneError> {
        self.primary.fetch_config().await
    }
}
