//! Chart projection of the performance board.

use serde::Serialize;

use super::board::MsePoint;

/// Samples of one cell for one window size, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSeries {
    pub cell_index: i64,
    pub latest_mse: Option<f64>,
    pub points: Vec<MsePoint>,
}

impl CellSeries {
    /// Sorts `history` by timestamp and keeps the newest `max_points`.
    pub fn from_history(
        cell_index: i64,
        latest_mse: Option<f64>,
        history: &[MsePoint],
        max_points: usize,
    ) -> Self {
        let mut points = history.to_vec();
        points.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        let skip = points.len().saturating_sub(max_points);
        points.drain(..skip);

        Self {
            cell_index,
            latest_mse,
            points,
        }
    }

    /// Timestamp of the newest sample.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.points.last().map(|p| p.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(timestamp: f64, mse: f64) -> MsePoint {
        MsePoint { timestamp, mse }
    }

    #[test]
    fn points_are_sorted_by_timestamp() {
        let series = CellSeries::from_history(
            1,
            None,
            &[point(3.0, 0.3), point(1.0, 0.1), point(2.0, 0.2)],
            10,
        );
        let timestamps: Vec<f64> = series.points.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last_timestamp(), Some(3.0));
    }

    #[test]
    fn oldest_points_are_dropped_beyond_limit() {
        let series = CellSeries::from_history(
            1,
            Some(0.4),
            &[point(4.0, 0.4), point(1.0, 0.1), point(3.0, 0.3), point(2.0, 0.2)],
            2,
        );
        let timestamps: Vec<f64> = series.points.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![3.0, 4.0]);
    }

    #[test]
    fn zero_limit_keeps_no_points() {
        let series = CellSeries::from_history(1, None, &[point(1.0, 0.1)], 0);
        assert!(series.points.is_empty());
        assert_eq!(series.last_timestamp(), None);
    }
}
