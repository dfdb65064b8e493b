//! Bidder Policy Module
//!
//! The decision function every NPC bidder runs when it is its turn to
//! respond: raise, or drop out for good.
//!
//! # Overview
//!
//! The decision depends only on its inputs: the bidder (personality and
//! budget), the standing bid, the increment, how many rounds have elapsed and
//! the RNG. There is no shared state, which keeps the phase machine and the
//! tactics engine free to call it from anywhere.
//!
//! ```text
//! ratio = current_bid / max_budget
//! p     = profile.raise_probability(ratio, rounds_elapsed)
//! roll < p  → Raise { current_bid + increment + jitter }   (capped at budget)
//! else      → DropOut                                       (permanent)
//! ```
//!
//! # Example
//!
//! ```rust
//! use auction_engine_core_rs::policy::{decide, BidDecision};
//! use auction_engine_core_rs::{Bidder, Personality, RngManager};
//!
//! let bidder = Bidder::new("npc_1", "Dusty Dan", Personality::Aggressive, 500);
//! let mut rng = RngManager::new(42);
//!
//! match decide(&bidder, 50, 10, 1, &mut rng) {
//!     BidDecision::Raise { amount } => assert!((60..=62).contains(&amount)),
//!     BidDecision::DropOut => unreachable!("aggressive bidders raise at low ratios"),
//! }
//! ```

pub mod personality;

pub use personality::PersonalityProfile;

use crate::models::bidder::Bidder;
use crate::rng::RngManager;

/// What a bidder does when asked to respond
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidDecision {
    /// Offer `amount` (always at least one increment over the standing bid
    /// and never above the bidder's budget)
    Raise { amount: i64 },

    /// Leave the auction permanently
    DropOut,
}

impl BidDecision {
    pub fn amount(&self) -> Option<i64> {
        match self {
            BidDecision::Raise { amount } => Some(*amount),
            BidDecision::DropOut => None,
        }
    }
}

/// Decide whether `bidder` raises over `current_bid`
pub fn decide(
    bidder: &Bidder,
    current_bid: i64,
    increment: i64,
    rounds_elapsed: u32,
    rng: &mut RngManager,
) -> BidDecision {
    if bidder.is_dropped_out() {
        return BidDecision::DropOut;
    }

    let increment = increment.max(1);
    let budget = bidder.max_budget();
    let minimum = match current_bid.checked_add(increment) {
        Some(minimum) if minimum <= budget => minimum,
        _ => return BidDecision::DropOut,
    };

    let profile = PersonalityProfile::for_personality(bidder.personality());
    let ratio = current_bid as f64 / budget as f64;
    let probability = profile.raise_probability(ratio, rounds_elapsed);

    if !rng.chance(probability) {
        return BidDecision::DropOut;
    }

    let extra = (increment as f64 * profile.jitter * rng.next_f64()).floor() as i64;
    BidDecision::Raise {
        amount: minimum.saturating_add(extra).min(budget),
    }
}

/// Raise by `steps` increments regardless of the probability curve, capped
/// at the budget. Used when a rival is provoked (e.g. a failed bluff).
/// Drops out if even one increment is out of reach.
pub fn escalate(bidder: &Bidder, current_bid: i64, increment: i64, steps: u32) -> BidDecision {
    if bidder.is_dropped_out() {
        return BidDecision::DropOut;
    }

    let increment = increment.max(1);
    match current_bid.checked_add(increment) {
        Some(minimum) if minimum <= bidder.max_budget() => {}
        _ => return BidDecision::DropOut,
    }

    let target = current_bid.saturating_add(increment.saturating_mul(steps.max(1) as i64));
    BidDecision::Raise {
        amount: target.min(bidder.max_budget()),
    }
}
