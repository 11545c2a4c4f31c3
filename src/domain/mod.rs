//! Domain layer - Pure types for live dashboard data.
//!
//! Nothing here performs I/O. The application layer drives these types
//! from transport events and snapshot fetches.

pub mod channel;
pub mod foundation;
pub mod ml;
pub mod performance;
pub mod stream;
