//! Countdown timing for the auction clock
//!
//! The engine advances in discrete ticks driven by the host game loop. A
//! bidding round and every "going" call last a fixed number of ticks; this
//! module provides the countdown those phases share.

use serde::{Deserialize, Serialize};

/// Countdown measured in ticks
///
/// # Example
/// ```
/// use auction_engine_core_rs::RoundTimer;
///
/// let mut timer = RoundTimer::new(3);
/// assert!(!timer.tick());
/// assert!(!timer.tick());
/// assert!(timer.tick()); // expired on the third tick
/// assert_eq!(timer.remaining(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    /// Ticks left before expiry
    remaining: u32,
}

impl RoundTimer {
    /// Create a timer that expires after `ticks` ticks
    ///
    /// # Panics
    /// Panics if `ticks` is zero
    pub fn new(ticks: u32) -> Self {
        assert!(ticks > 0, "timer duration must be positive");
        Self { remaining: ticks }
    }

    /// Rebuild a timer from a stored remaining count (may be zero)
    pub fn from_remaining(remaining: u32) -> Self {
        Self { remaining }
    }

    /// Advance one tick. Returns true when this tick exhausted the timer.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    /// Restart the countdown with a fresh duration
    pub fn reset(&mut self, ticks: u32) {
        self.remaining = ticks.max(1);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}
