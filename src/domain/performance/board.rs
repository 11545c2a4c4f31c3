//! Keyed board of per-model performance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::series::CellSeries;

/// One prediction-error sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsePoint {
    pub timestamp: f64,
    pub mse: f64,
}

/// Performance of one model as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub cell_index: i64,
    #[serde(default)]
    pub latest_mse: Option<f64>,
    #[serde(default)]
    pub history: Vec<MsePoint>,
}

/// Extracts `n` from the first `window_<n>` marker in a model key.
pub fn window_size_of(key: &str) -> Option<u32> {
    key.match_indices("window_").find_map(|(idx, marker)| {
        let digits: String = key[idx + marker.len()..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    })
}

/// All models currently known, keyed by model key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceBoard {
    models: BTreeMap<String, ModelPerformance>,
}

impl PerformanceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole board from a snapshot `data` object.
    ///
    /// On error the board is left untouched.
    pub fn replace_all(&mut self, data: Value) -> Result<(), serde_json::Error> {
        let models: BTreeMap<String, ModelPerformance> = serde_json::from_value(data)?;
        self.models = models;
        Ok(())
    }

    /// Inserts or replaces one model.
    pub fn upsert(&mut self, model_key: impl Into<String>, performance: ModelPerformance) {
        self.models.insert(model_key.into(), performance);
    }

    pub fn get(&self, model_key: &str) -> Option<&ModelPerformance> {
        self.models.get(model_key)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Window sizes present in the model keys, ascending and unique.
    pub fn window_sizes(&self) -> Vec<u32> {
        self.models
            .keys()
            .filter_map(|key| window_size_of(key))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// One series per cell for the given window size, ordered by cell index.
    ///
    /// Each series keeps at most `max_points` of its most recent samples.
    pub fn series_for_window(&self, window_size: u32, max_points: usize) -> Vec<CellSeries> {
        let mut by_cell: BTreeMap<i64, CellSeries> = BTreeMap::new();
        for (key, model) in &self.models {
            if window_size_of(key) != Some(window_size) {
                continue;
            }
            by_cell.insert(
                model.cell_index,
                CellSeries::from_history(model.cell_index, model.latest_mse, &model.history, max_points),
            );
        }
        by_cell.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(cell_index: i64, samples: &[(f64, f64)]) -> ModelPerformance {
        ModelPerformance {
            cell_index,
            latest_mse: samples.last().map(|(_, mse)| *mse),
            history: samples
                .iter()
                .map(|(timestamp, mse)| MsePoint {
                    timestamp: *timestamp,
                    mse: *mse,
                })
                .collect(),
        }
    }

    #[test]
    fn window_size_parses_marker() {
        assert_eq!(window_size_of("cell_26379009_window_5"), Some(5));
        assert_eq!(window_size_of("window_30_cell_1"), Some(30));
        assert_eq!(window_size_of("window_x_window_12"), Some(12));
        assert_eq!(window_size_of("cell_1"), None);
        assert_eq!(window_size_of("window_"), None);
    }

    #[test]
    fn replace_all_loads_snapshot() {
        let mut board = PerformanceBoard::new();
        board
            .replace_all(json!({
                "cell_1_window_5": {"cell_index": 1, "latest_mse": 0.5, "history": [{"timestamp": 1.0, "mse": 0.5}]},
                "cell_2_window_10": {"cell_index": 2}
            }))
            .unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board.get("cell_2_window_10").unwrap().history.len(), 0);
        assert_eq!(board.window_sizes(), vec![5, 10]);
    }

    #[test]
    fn malformed_snapshot_leaves_board_untouched() {
        let mut board = PerformanceBoard::new();
        board.upsert("cell_1_window_5", model(1, &[(1.0, 0.1)]));

        let result = board.replace_all(json!({"cell_9_window_5": {"latest_mse": "high"}}));

        assert!(result.is_err());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn upsert_adds_new_window_size() {
        let mut board = PerformanceBoard::new();
        board.upsert("cell_1_window_5", model(1, &[]));
        board.upsert("cell_1_window_60", model(1, &[]));
        board.upsert("cell_1_window_5", model(1, &[(2.0, 0.3)]));

        assert_eq!(board.len(), 2);
        assert_eq!(board.window_sizes(), vec![5, 60]);
        assert_eq!(board.get("cell_1_window_5").unwrap().latest_mse, Some(0.3));
    }

    #[test]
    fn series_are_filtered_by_exact_window_and_sorted_by_cell() {
        let mut board = PerformanceBoard::new();
        board.upsert("cell_20_window_5", model(20, &[(1.0, 0.2)]));
        board.upsert("cell_3_window_5", model(3, &[(1.0, 0.3)]));
        board.upsert("cell_3_window_50", model(3, &[(1.0, 0.9)]));

        let series = board.series_for_window(5, 100);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cell_index, 3);
        assert_eq!(series[1].cell_index, 20);
        assert_eq!(series[0].points[0].mse, 0.3);
    }
}
