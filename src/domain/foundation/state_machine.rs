//! Checked transitions for lifecycle enums.

use super::ValidationError;

/// A lifecycle enum whose changes are checked against an allowed set.
pub trait StateMachine: Sized + Copy + std::fmt::Debug {
    /// Whether moving from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns `target` if the move is allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "state_transition",
                format!("{:?} cannot move to {:?}", self, target),
            ));
        }
        Ok(target)
    }
}
