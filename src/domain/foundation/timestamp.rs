//! UTC receive time stamped on inbound messages.

use chrono::{DateTime, Utc};

/// Point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// RFC 3339 rendering used in log fields.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}
