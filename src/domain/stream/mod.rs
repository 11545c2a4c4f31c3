//! Stream module - Bounded, most-recent-first views over pushed data.
//!
//! - [`StreamBuffer`] - Fixed-capacity buffer; push to the front, evict from the back
//! - [`normalize_snapshot`] - Extracts seed items from the payload shapes the backends return
//! - [`SeedOrder`] - Whether a snapshot arrives newest-first or must be reversed

mod buffer;
mod snapshot;

pub use buffer::StreamBuffer;
pub use snapshot::{normalize_snapshot, SeedOrder};
