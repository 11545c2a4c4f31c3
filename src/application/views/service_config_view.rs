//! ML service configuration, loaded on demand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::domain::ml::MlServiceConfig;
use crate::ports::{ControlPlaneError, MlControlPlane};

#[derive(Debug, Default)]
struct ConfigState {
    config: Option<MlServiceConfig>,
    error: Option<String>,
    loading: bool,
}

/// Last loaded ML service config, or why it could not be loaded.
///
/// Starts out loading; call [`refetch`](Self::refetch) to (re)load.
pub struct ServiceConfigView {
    control_plane: Arc<dyn MlControlPlane>,
    state: Mutex<ConfigState>,
    revision: watch::Sender<u64>,
}

impl ServiceConfigView {
    pub fn new(control_plane: Arc<dyn MlControlPlane>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            control_plane,
            state: Mutex::new(ConfigState {
                loading: true,
                ..Default::default()
            }),
            revision,
        }
    }

    fn state(&self) -> MutexGuard<'_, ConfigState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Fetch the config again. A failure clears any previously loaded
    /// config and records the error.
    pub async fn refetch(&self) -> Result<(), ControlPlaneError> {
        {
            let mut state = self.state();
            state.error = None;
            state.loading = true;
        }
        self.bump_revision();

        let result = self.control_plane.fetch_config().await;

        let mut state = self.state();
        state.loading = false;
        let outcome = match result {
            Ok(config) => {
                tracing::debug!(
                    inference_types = config.inference_types.len(),
                    "ML service config loaded"
                );
                state.config = Some(config);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch ML service config");
                state.config = None;
                state.error = Some(format!(
                    "Failed to load configuration from ML service: {}",
                    e
                ));
                Err(e)
            }
        };
        drop(state);

        self.bump_revision();
        outcome
    }

    pub fn config(&self) -> Option<MlServiceConfig> {
        self.state().config.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::adapters::MockControlPlane;
    use crate::domain::ml::{
        Prediction, PredictionRequest, RegisteredModel, TrainingAck, TrainingRequest,
    };

    /// Serves the mock config until switched off.
    struct FlakyConfig {
        up: AtomicBool,
    }

    #[async_trait]
    impl MlControlPlane for FlakyConfig {
        async fn list_models(&self) -> Result<Vec<RegisteredModel>, ControlPlaneError> {
            unimplemented!()
        }
        async fn trigger_training(
            &self,
            _request: &TrainingRequest,
        ) -> Result<TrainingAck, ControlPlaneError> {
            unimplemented!()
        }
        async fn predict(
            &self,
            _request: &PredictionRequest,
        ) -> Result<Prediction, ControlPlaneError> {
            unimplemented!()
        }
        async fn list_cells(&self) -> Result<Vec<u64>, ControlPlaneError> {
            unimplemented!()
        }
        async fn fetch_config(&self) -> Result<MlServiceConfig, ControlPlaneError> {
            if self.up.load(Ordering::SeqCst) {
                MockControlPlane::new().fetch_config().await
            } else {
                Err(ControlPlaneError::Status(502))
            }
        }
    }

    #[test]
    fn starts_loading_without_config() {
        let view = ServiceConfigView::new(Arc::new(MockControlPlane::new()));
        assert!(view.is_loading());
        assert!(view.config().is_none());
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn refetch_stores_config() {
        let view = ServiceConfigView::new(Arc::new(MockControlPlane::new()));
        view.refetch().await.unwrap();

        assert!(!view.is_loading());
        assert_eq!(view.config().unwrap().analytics_types(), vec!["latency"]);
        assert_eq!(view.revision(), 2);
    }

    #[tokio::test]
    async fn failed_refetch_clears_config_and_records_error() {
        let backend = Arc::new(FlakyConfig {
            up: AtomicBool::new(true),
        });
        let view = ServiceConfigView::new(backend.clone());
        view.refetch().await.unwrap();
        assert!(view.config().is_some());

        backend.up.store(false, Ordering::SeqCst);
        assert_eq!(view.refetch().await, Err(ControlPlaneError::Status(502)));

        assert!(view.config().is_none());
        assert!(!view.is_loading());
        assert_eq!(
            view.error().as_deref(),
            Some("Failed to load configuration from ML service: HTTP error! status: 502")
        );
    }

    #[tokio::test]
    async fn successful_refetch_clears_previous_error() {
        let backend = Arc::new(FlakyConfig {
            up: AtomicBool::new(false),
        });
        let view = ServiceConfigView::new(backend.clone());
        assert!(view.refetch().await.is_err());

        backend.up.store(true, Ordering::SeqCst);
        view.refetch().await.unwrap();
        assert!(view.error().is_none());
        assert!(view.config().is_some());
    }
}
