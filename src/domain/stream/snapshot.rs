//! Snapshot normalization.
//!
//! Backends answer snapshot fetches in one of a few shapes. The first
//! matching rule wins:
//!
//! | Shape                       | Items                  |
//! |-----------------------------|------------------------|
//! | `{"results": [..]}`         | the `results` array    |
//! | `{"data": [..]}`            | the `data` array       |
//! | `{"data": {..}}`            | `[data]`               |
//! | `[..]`                      | the array              |
//! | anything else               | `[payload]`            |

use serde::Deserialize;
use serde_json::Value;

/// Ordering of a snapshot as delivered by its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOrder {
    /// The source already lists the most recent item first.
    AsSupplied,
    /// The source lists oldest first; reverse before seeding.
    #[default]
    Reversed,
}

impl SeedOrder {
    /// Puts `items` into most-recent-first order.
    pub fn apply<T>(self, mut items: Vec<T>) -> Vec<T> {
        if self == SeedOrder::Reversed {
            items.reverse();
        }
        items
    }
}

/// Extracts the item sequence from a snapshot payload, in source order.
pub fn normalize_snapshot(payload: Value) -> Vec<Value> {
    match payload {
        Value::Object(mut object) => {
            if matches!(object.get("results"), Some(Value::Array(_))) {
                if let Some(Value::Array(results)) = object.remove("results") {
                    return results;
                }
            }
            match object.remove("data") {
                Some(Value::Array(items)) => items,
                Some(data) => vec![data],
                None => vec![Value::Object(object)],
            }
        }
        Value::Array(items) => items,
        other => vec![other],
    }
}
