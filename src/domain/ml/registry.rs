//! Model registry entries and training requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AnalyticsType;

/// One registered version of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub version: String,
    pub stage: String,
    #[serde(default)]
    pub run_id: Option<String>,
}

/// A model as listed by the registry, newest version first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: String,
    #[serde(default)]
    pub creation_timestamp: Option<i64>,
    #[serde(default)]
    pub last_updated_timestamp: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latest_versions: Vec<ModelVersion>,
}

impl RegisteredModel {
    pub fn latest_version(&self) -> Option<&ModelVersion> {
        self.latest_versions.first()
    }
}

/// Decodes a registry listing. The registry answers with either an array
/// of models or a single model object.
pub fn normalize_models(payload: Value) -> Result<Vec<RegisteredModel>, serde_json::Error> {
    match payload {
        Value::Array(_) => serde_json::from_value(payload),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

/// Parameters of a training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub analytics_type: AnalyticsType,
    /// Prediction horizon in seconds.
    pub horizon: u32,
    pub model_type: String,
}

impl Default for TrainingRequest {
    fn default() -> Self {
        Self {
            analytics_type: AnalyticsType::Latency,
            horizon: 60,
            model_type: "xgboost".to_string(),
        }
    }
}

/// Acknowledgement of a training request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingAck {
    #[serde(default = "default_ack_message")]
    pub message: String,
    /// True when no backend accepted the request and this ack is a stand-in.
    #[serde(default, skip_serializing)]
    pub mocked: bool,
}

impl TrainingAck {
    pub fn mocked() -> Self {
        Self {
            message: "Training started successfully! (Mock)".to_string(),
            mocked: true,
        }
    }
}

fn default_ack_message() -> String {
    "Training started successfully!".to_string()
}

fn version(version: &str, stage: &str, run_id: &str) -> ModelVersion {
    ModelVersion {
        version: version.to_string(),
        stage: stage.to_string(),
        run_id: Some(run_id.to_string()),
    }
}

/// Registry listing shown while the registry is unreachable.
pub fn mock_models() -> Vec<RegisteredModel> {
    vec![
        RegisteredModel {
            name: "latency_prediction_xgboost".to_string(),
            creation_timestamp: Some(1_702_300_800),
            last_updated_timestamp: Some(1_702_387_200),
            description: Some(
                "XGBoost model for predicting network latency with 60s horizon".to_string(),
            ),
            latest_versions: vec![version("1", "Production", "abc123")],
        },
        RegisteredModel {
            name: "latency_prediction_lstm".to_string(),
            creation_timestamp: Some(1_702_214_400),
            last_updated_timestamp: Some(1_702_300_800),
            description: Some("LSTM neural network for time-series latency prediction".to_string()),
            latest_versions: vec![
                version("3", "Staging", "def456"),
                version("2", "Archived", "ghi789"),
                version("1", "Archived", "mkl789"),
            ],
        },
        RegisteredModel {
            name: "latency_prediction_random_forest".to_string(),
            creation_timestamp: Some(1_702_128_000),
            last_updated_timestamp: Some(1_702_214_400),
            description: Some("Random Forest model for latency prediction".to_string()),
            latest_versions: vec![
                version("2", "Production", "jkl012"),
                version("1", "Archived", "mkl789"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_listing_decodes_every_model() {
        let models = normalize_models(json!([
            {"name": "a", "latest_versions": [{"version": "2", "stage": "Staging"}]},
            {"name": "b"}
        ]))
        .unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].latest_version().map(|v| v.version.as_str()), Some("2"));
        assert_eq!(models[1].latest_version(), None);
    }

    #[test]
    fn single_model_object_becomes_one_entry() {
        let models = normalize_models(json!({
            "name": "latency_prediction_xgboost",
            "creation_timestamp": 1702300800
        }))
        .unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].creation_timestamp, Some(1_702_300_800));
    }

    #[test]
    fn listing_without_names_is_rejected() {
        assert!(normalize_models(json!({"models": []})).is_err());
    }

    #[test]
    fn mock_listing_puts_newest_version_first() {
        let models = mock_models();
        assert_eq!(models.len(), 3);
        let lstm = models.iter().find(|m| m.name == "latency_prediction_lstm").unwrap();
        assert_eq!(lstm.latest_version().unwrap().stage, "Staging");
    }

    #[test]
    fn training_request_serializes_dashboard_defaults() {
        assert_eq!(
            serde_json::to_value(TrainingRequest::default()).unwrap(),
            json!({"analytics_type": "latency", "horizon": 60, "model_type": "xgboost"})
        );
    }

    #[test]
    fn ack_without_message_uses_default_text() {
        let ack: TrainingAck = serde_json::from_value(json!({})).unwrap();
        assert_eq!(ack.message, "Training started successfully!");
        assert!(!ack.mocked);
    }
}
