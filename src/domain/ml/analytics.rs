//! Analytics predictions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::ValidationError;

/// What a prediction or training run is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsType {
    Latency,
    Throughput,
    SignalStrength,
}

impl AnalyticsType {
    /// Only latency models are served for predictions today.
    pub fn is_predictable(&self) -> bool {
        matches!(self, AnalyticsType::Latency)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsType::Latency => "Latency",
            AnalyticsType::Throughput => "Throughput",
            AnalyticsType::SignalStrength => "Signal_strength",
        }
    }

    fn mock_base_value(&self) -> f64 {
        match self {
            AnalyticsType::Latency => 45.5,
            AnalyticsType::Throughput => 85.2,
            AnalyticsType::SignalStrength => -92.3,
        }
    }
}

/// Prediction request for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub analytics_type: AnalyticsType,
    pub cell_index: u64,
    /// Horizon in seconds.
    pub horizon: u32,
}

impl PredictionRequest {
    pub fn new(analytics_type: AnalyticsType, cell_index: u64, horizon: u32) -> Self {
        Self {
            analytics_type,
            cell_index,
            horizon,
        }
    }

    /// Rejects analytics types the ML service cannot predict yet.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.analytics_type.is_predictable() {
            return Ok(());
        }
        Err(ValidationError::invalid_format(
            "analytics_type",
            format!(
                "{} analytics type will be supported in the future. Currently only 'Latency' is available.",
                self.analytics_type.label()
            ),
        ))
    }
}

/// Predicted value over `[target_start_time, target_end_time]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub interval: String,
    pub predicted_value: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Aggregated radio features the model was fed.
    #[serde(default)]
    pub data: Value,
    pub target_start_time: i64,
    pub target_end_time: i64,
    #[serde(default, skip_serializing)]
    pub mocked: bool,
}

/// Stand-in prediction shown while the ML service is unreachable.
///
/// `now` is the start of the target window in Unix seconds.
pub fn mock_prediction(request: &PredictionRequest, now: i64) -> Prediction {
    Prediction {
        interval: format!("{}s", request.horizon),
        predicted_value: request.analytics_type.mock_base_value(),
        confidence: Some(0.9),
        data: json!({
            "rsrp_mean": -96.28571428571429,
            "rsrp_max": -90,
            "rsrp_min": -100,
            "rsrp_std": 4.268463449507354,
            "sinr_mean": 14.714285714285714,
            "sinr_max": 17,
            "sinr_min": 12,
            "sinr_std": 1.8156825980064073,
            "rsrq_mean": -11.642857142857142,
            "rsrq_max": -10,
            "rsrq_min": -14,
            "rsrq_std": 1.5984195491000024,
            "cqi_mean": 12.428571428571429,
            "cqi_max": 14,
            "cqi_min": 10,
            "cqi_std": 1.4525460784051258,
            "primary_bandwidth": 20000,
            "ul_bandwidth": 20000
        }),
        target_start_time: now,
        target_end_time: now + i64::from(request.horizon),
        mocked: true,
    }
}

/// Cell list shown while the storage service is unreachable.
pub fn mock_cells() -> Vec<u64> {
    vec![26379009, 26379010, 26379011, 26379012, 26379013]
}
