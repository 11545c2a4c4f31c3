//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects, error types and the state machine trait
//! that the channel and stream domains build on.

mod errors;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
