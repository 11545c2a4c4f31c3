//! Runtime configuration published by the ML service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One servable (analytics type, horizon) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceType {
    pub name: String,
    pub horizon: u32,
    #[serde(default)]
    pub description: String,
}

/// Body of `GET {ml}/api/v1/config`.
///
/// Only `inference_types` is interpreted; everything else is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlServiceConfig {
    #[serde(default)]
    pub inference_types: Vec<InferenceType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MlServiceConfig {
    /// Distinct analytics type names, in first-seen order.
    pub fn analytics_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for inference in &self.inference_types {
            if !names.contains(&inference.name.as_str()) {
                names.push(&inference.name);
            }
        }
        names
    }

    /// Inference types offered for `name`, one per horizon.
    pub fn horizons_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a InferenceType> {
        self.inference_types.iter().filter(move |t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> MlServiceConfig {
        serde_json::from_value(json!({
            "inference_types": [
                {"name": "latency", "horizon": 60, "description": "one minute"},
                {"name": "latency", "horizon": 300, "description": "five minutes"},
                {"name": "throughput", "horizon": 60}
            ],
            "model_registry": "mlflow"
        }))
        .unwrap()
    }

    #[test]
    fn analytics_types_are_unique_and_ordered() {
        assert_eq!(config().analytics_types(), vec!["latency", "throughput"]);
    }

    #[test]
    fn horizons_filter_by_type() {
        let config = config();
        let horizons: Vec<u32> = config.horizons_for("latency").map(|t| t.horizon).collect();
        assert_eq!(horizons, vec![60, 300]);
    }

    #[test]
    fn unknown_fields_are_preserved() {
        assert_eq!(config().extra["model_registry"], "mlflow");
    }

    #[test]
    fn empty_body_means_no_inference_types() {
        let config: MlServiceConfig = serde_json::from_value(json!({})).unwrap();
        assert!(config.analytics_types().is_empty());
    }
}
