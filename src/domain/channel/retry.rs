//! Bounded reconnect bookkeeping.

use std::time::Duration;

/// Tracks reconnect attempts since the last successful open.
///
/// Invariant: `attempts <= max_attempts`. Once the two are equal the
/// channel stops reconnecting on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    /// Creates retry bookkeeping with no attempts recorded.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            delay,
        }
    }

    /// Attempts made since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Upper bound on automatic attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before each automatic attempt.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns true if another automatic attempt is allowed.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// Returns true once the attempt budget is spent.
    pub fn is_exhausted(&self) -> bool {
        !self.can_retry()
    }

    /// Records one attempt, returning its 1-based number.
    ///
    /// Returns `None` without mutating when the budget is spent.
    pub fn record_attempt(&mut self) -> Option<u32> {
        if !self.can_retry() {
            return None;
        }
        self.attempts += 1;
        Some(self.attempts)
    }

    /// Clears the attempt count after a successful open or an explicit reconnect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
