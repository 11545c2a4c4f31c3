//! Performance module - Live model-error board fed by the ML control plane.
//!
//! The control plane streams one entry per `(cell, window size)` model,
//! keyed like `cell_26379009_window_5`. The board merges the snapshot and
//! per-model updates; [`series`] projects it into chart series.

mod board;
mod series;

pub use board::{window_size_of, ModelPerformance, MsePoint, PerformanceBoard};
pub use series::CellSeries;
