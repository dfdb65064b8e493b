//! NPC bidder model
//!
//! Each computer-controlled bidder carries a personality and a private
//! budget. The budget is fixed when the roster is built and only ever grows
//! through a lot event (bidding frenzy).
//!
//! # Critical Invariants
//!
//! 1. `current_bid <= max_budget` at all times
//! 2. Once `dropped_out` is set it never clears for this auction

use serde::{Deserialize, Serialize};

/// Behavioural archetype of an NPC bidder
///
/// The variant alone selects the numeric curve used by the bidder policy
/// (see `policy::personality`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Drops out early once prices look rich
    Cautious,
    /// Keeps raising well into its budget
    Aggressive,
    /// Unpredictable, wide raise jitter
    Erratic,
    /// Values-driven; calls bluffs
    Analytical,
    /// Distrusts the player; calls bluffs and may escalate
    Skeptical,
    /// Easily intimidated
    Timid,
}

impl Personality {
    pub const ALL: [Personality; 6] = [
        Personality::Cautious,
        Personality::Aggressive,
        Personality::Erratic,
        Personality::Analytical,
        Personality::Skeptical,
        Personality::Timid,
    ];

    /// Short tag used in UI keys and logs
    pub fn tag(self) -> &'static str {
        match self {
            Personality::Cautious => "cautious",
            Personality::Aggressive => "aggressive",
            Personality::Erratic => "erratic",
            Personality::Analytical => "analytical",
            Personality::Skeptical => "skeptical",
            Personality::Timid => "timid",
        }
    }
}

/// A computer-controlled bidder
///
/// # Example
/// ```
/// use auction_engine_core_rs::{Bidder, Personality};
///
/// let mut bidder = Bidder::new("npc_1", "Dusty Dan", Personality::Aggressive, 500);
/// assert!(bidder.record_bid(120));
/// assert!(!bidder.record_bid(900)); // over budget, rejected
/// assert_eq!(bidder.current_bid(), 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bidder {
    id: String,
    name: String,
    personality: Personality,
    /// Never shown to the player unless `budget_revealed`
    max_budget: i64,
    current_bid: i64,
    dropped_out: bool,
    bid_count: u32,
    budget_revealed: bool,
    /// Joined mid-auction through a lot event
    late_arrival: bool,
}

impl Bidder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        personality: Personality,
        max_budget: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            personality,
            max_budget: max_budget.max(0),
            current_bid: 0,
            dropped_out: false,
            bid_count: 0,
            budget_revealed: false,
            late_arrival: false,
        }
    }

    /// Mark as a mid-auction arrival (builder style)
    pub fn arriving_late(mut self) -> Self {
        self.late_arrival = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn max_budget(&self) -> i64 {
        self.max_budget
    }

    /// Budget as the UI may show it
    pub fn visible_budget(&self) -> Option<i64> {
        self.budget_revealed.then_some(self.max_budget)
    }

    pub fn current_bid(&self) -> i64 {
        self.current_bid
    }

    pub fn bid_count(&self) -> u32 {
        self.bid_count
    }

    pub fn is_dropped_out(&self) -> bool {
        self.dropped_out
    }

    pub fn is_active(&self) -> bool {
        !self.dropped_out
    }

    pub fn is_budget_revealed(&self) -> bool {
        self.budget_revealed
    }

    pub fn is_late_arrival(&self) -> bool {
        self.late_arrival
    }

    /// Record an offer. Returns false (and changes nothing) if the bidder
    /// has dropped out, the amount exceeds the budget, or it would lower the
    /// bidder's own standing offer.
    pub fn record_bid(&mut self, amount: i64) -> bool {
        if self.dropped_out || amount > self.max_budget || amount < self.current_bid {
            return false;
        }
        self.current_bid = amount;
        self.bid_count += 1;
        true
    }

    /// Permanently leave this auction
    pub fn drop_out(&mut self) {
        self.dropped_out = true;
    }

    /// Scale the budget up. Multipliers below 1.0 are ignored so the budget
    /// never shrinks under a standing offer.
    pub fn boost_budget(&mut self, multiplier: f64) {
        if multiplier <= 1.0 {
            return;
        }
        self.max_budget = (self.max_budget as f64 * multiplier).round() as i64;
    }

    pub fn reveal_budget(&mut self) {
        self.budget_revealed = true;
    }
}
