//! Message types exchanged over a live channel.
//!
//! Inbound frames are JSON objects discriminated by a `type` field:
//! - Snapshot: full state used to seed a view
//! - Incremental update: one new unit of data since the snapshot
//! - Heartbeat response: reply to a liveness ping
//!
//! The payload schema itself belongs to the backend; this module only
//! classifies and carries it.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Field that carries the message discriminator.
pub const KIND_FIELD: &str = "type";

// ============================================
// Inbound
// ============================================

/// Classification of an inbound message by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Full state; replaces whatever the view holds.
    Snapshot,
    /// A single pushed item.
    IncrementalUpdate,
    /// Reply to a liveness ping.
    HeartbeatResponse,
    /// Any tag this crate does not interpret.
    Other(String),
}

impl MessageKind {
    /// Maps a wire tag to a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "snapshot" | "initial_status" | "status_response" | "initial_data" => {
                MessageKind::Snapshot
            }
            "update" | "incremental_update" | "performance_update" => {
                MessageKind::IncrementalUpdate
            }
            "pong" | "heartbeat" | "heartbeat_response" => MessageKind::HeartbeatResponse,
            other => MessageKind::Other(other.to_string()),
        }
    }

    /// Short label for log fields.
    pub fn label(&self) -> &str {
        match self {
            MessageKind::Snapshot => "snapshot",
            MessageKind::IncrementalUpdate => "incremental_update",
            MessageKind::HeartbeatResponse => "heartbeat_response",
            MessageKind::Other(tag) => tag,
        }
    }
}

/// Reasons an inbound frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Inbound frame is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Inbound frame is not a JSON object")]
    NotAnObject,

    #[error("Inbound frame has no string '{}' field", KIND_FIELD)]
    MissingKind,
}

/// A decoded inbound message.
///
/// `payload` is the received object with the discriminator removed.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub tag: String,
    pub kind: MessageKind,
    pub payload: Value,
    pub received_at: Timestamp,
}

impl InboundMessage {
    /// Decodes a text frame.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Classifies an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut object: Map<String, Value> = match value {
            Value::Object(object) => object,
            _ => return Err(DecodeError::NotAnObject),
        };

        let tag = match object.remove(KIND_FIELD) {
            Some(Value::String(tag)) => tag,
            _ => return Err(DecodeError::MissingKind),
        };

        Ok(Self {
            kind: MessageKind::from_tag(&tag),
            tag,
            payload: Value::Object(object),
            received_at: Timestamp::now(),
        })
    }

    /// The `data` member of the payload, if present.
    pub fn data(&self) -> Option<&Value> {
        self.payload.get("data")
    }

    /// The value a single-item view should store: `data` when present,
    /// otherwise the whole payload.
    pub fn item(&self) -> &Value {
        self.data().unwrap_or(&self.payload)
    }
}

// ============================================
// Outbound
// ============================================

/// A value handed to `send`: raw text, or a structure serialized to JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Text(String),
    Json(Value),
}

impl OutboundPayload {
    /// The liveness ping the backend answers with `pong`.
    pub fn ping() -> Self {
        let mut object = Map::new();
        object.insert(KIND_FIELD.to_string(), Value::String("ping".to_string()));
        OutboundPayload::Json(Value::Object(object))
    }

    /// Serializes any value into a JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(OutboundPayload::Json)
    }

    /// Text as written to the transport.
    pub fn into_text(self) -> String {
        match self {
            OutboundPayload::Text(text) => text,
            OutboundPayload::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for OutboundPayload {
    fn from(text: String) -> Self {
        OutboundPayload::Text(text)
    }
}

impl From<&str> for OutboundPayload {
    fn from(text: &str) -> Self {
        OutboundPayload::Text(text.to_string())
    }
}

impl From<Value> for OutboundPayload {
    fn from(value: Value) -> Self {
        OutboundPayload::Json(value)
    }
}
