//! Lot event types
//!
//! Lot events are rolled when an auction is created and fire at one of three
//! moments: when the lot is revealed, when the bidding reaches a round
//! threshold, or when the player wins.
//!
//! # Design Principles
//!
//! 1. **Determinism**: events are scheduled up front from the seeded RNG
//! 2. **Deferred item mutation**: effects that touch the prize items are
//!    classified once, at construction, and only land at win-time settlement
//! 3. **Apply once**: every effect carries its own `applied` flag
//! 4. **Money is i64**

use crate::models::item::Rarity;
use serde::{Deserialize, Serialize};

/// A single modification carried by a lot event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LotEffect {
    /// Random active rivals walk away
    NpcDropout { count: usize },

    /// Every active rival's budget is multiplied
    NpcFrenzy { budget_multiplier: f64 },

    /// The auctioneer changes the bid step
    IncrementMultiplier { multiplier: f64 },

    /// A fraction of the entry fee is credited back
    EntryFeeRefund { fraction: f64 },

    /// A new rival joins mid-auction with a budget derived from the lot value
    LateBidder,

    /// Random rivals' budgets become visible to the player
    RevealBudgets { count: usize },

    /// Flat cash reward
    BonusCash { amount: i64 },

    /// One more item is added to the lot
    ExtraItem { rarity: Rarity, value_multiplier: f64 },

    /// A hidden item is discovered in the unit
    HiddenTreasure { rarity: Rarity, value_multiplier: f64 },

    /// One item's condition moves along the ladder (negative = damage)
    ConditionShift { steps: i8 },

    /// One item moves up a rarity tier
    RarityUpgrade,
}

impl LotEffect {
    /// True for effects that mutate the prize items. These must only land
    /// if the player wins.
    pub fn requires_deferred_resolution(&self) -> bool {
        matches!(
            self,
            LotEffect::ExtraItem { .. }
                | LotEffect::HiddenTreasure { .. }
                | LotEffect::ConditionShift { .. }
                | LotEffect::RarityUpgrade
        )
    }

    /// Stable key the UI uses to render the effect's result
    pub fn result_key(&self) -> &'static str {
        match self {
            LotEffect::NpcDropout { .. } => "lot_event.npc_dropout",
            LotEffect::NpcFrenzy { .. } => "lot_event.npc_frenzy",
            LotEffect::IncrementMultiplier { .. } => "lot_event.increment_change",
            LotEffect::EntryFeeRefund { .. } => "lot_event.fee_refund",
            LotEffect::LateBidder => "lot_event.late_bidder",
            LotEffect::RevealBudgets { .. } => "lot_event.budget_reveal",
            LotEffect::BonusCash { .. } => "lot_event.bonus_cash",
            LotEffect::ExtraItem { .. } => "lot_event.extra_item",
            LotEffect::HiddenTreasure { .. } => "lot_event.hidden_treasure",
            LotEffect::ConditionShift { steps } if *steps >= 0 => "lot_event.condition_upgrade",
            LotEffect::ConditionShift { .. } => "lot_event.condition_downgrade",
            LotEffect::RarityUpgrade => "lot_event.rarity_upgrade",
        }
    }
}

/// When a lot event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "timing", rename_all = "snake_case")]
pub enum EventTiming {
    /// Once, when the auction becomes active
    OnReveal,

    /// The first time `rounds_elapsed` reaches the threshold
    OnBid { round_threshold: u32 },

    /// Only if the player wins, at settlement
    OnWin,
}

impl EventTiming {
    /// Check whether a round-keyed event is due after `rounds_elapsed` rounds
    pub fn due_at_round(&self, rounds_elapsed: u32) -> bool {
        match self {
            EventTiming::OnBid { round_threshold } => rounds_elapsed >= *round_threshold,
            EventTiming::OnReveal | EventTiming::OnWin => false,
        }
    }
}

/// One effect inside a lot event with its resolution bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEffect {
    pub effect: LotEffect,
    /// Computed once at construction from `requires_deferred_resolution`
    pub deferred: bool,
    pub applied: bool,
    /// Dropped unapplied because the player did not win
    #[serde(default)]
    pub discarded: bool,
}

impl ScheduledEffect {
    pub fn new(effect: LotEffect) -> Self {
        let deferred = effect.requires_deferred_resolution();
        Self {
            effect,
            deferred,
            applied: false,
            discarded: false,
        }
    }

    /// Deferred and still waiting for win-time resolution
    pub fn is_pending(&self) -> bool {
        self.deferred && !self.applied && !self.discarded
    }
}

/// A lot event scheduled at auction creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotEvent {
    pub id: String,
    /// Template key, e.g. "water_damage"
    pub kind: String,
    pub timing: EventTiming,
    /// Applied in list order
    pub effects: Vec<ScheduledEffect>,
    pub triggered: bool,
    /// UI keys describing what happened, filled as effects land
    #[serde(default)]
    pub result_keys: Vec<String>,
}

impl LotEvent {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        timing: EventTiming,
        effects: Vec<LotEffect>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            timing,
            effects: effects.into_iter().map(ScheduledEffect::new).collect(),
            triggered: false,
            result_keys: Vec::new(),
        }
    }

    pub fn has_pending_deferred(&self) -> bool {
        self.effects.iter().any(ScheduledEffect::is_pending)
    }

    pub fn is_fully_applied(&self) -> bool {
        self.effects.iter().all(|e| e.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_effects_are_deferred() {
        assert!(LotEffect::RarityUpgrade.requires_deferred_resolution());
        assert!(LotEffect::ConditionShift { steps: -1 }.requires_deferred_resolution());
        assert!(LotEffect::ExtraItem {
            rarity: Rarity::Common,
            value_multiplier: 1.0
        }
        .requires_deferred_resolution());
        assert!(!LotEffect::LateBidder.requires_deferred_resolution());
        assert!(!LotEffect::BonusCash { amount: 10 }.requires_deferred_resolution());
    }

    #[test]
    fn test_on_bid_due_at_threshold() {
        let timing = EventTiming::OnBid { round_threshold: 3 };
        assert!(!timing.due_at_round(2));
        assert!(timing.due_at_round(3));
        assert!(timing.due_at_round(4));
        assert!(!EventTiming::OnReveal.due_at_round(10));
        assert!(!EventTiming::OnWin.due_at_round(10));
    }

    #[test]
    fn test_lot_event_classifies_effects_once() {
        let event = LotEvent::new(
            "evt_1",
            "mixed_bag",
            EventTiming::OnReveal,
            vec![LotEffect::BonusCash { amount: 5 }, LotEffect::RarityUpgrade],
        );
        assert!(!event.effects[0].deferred);
        assert!(event.effects[1].deferred);
        assert!(event.has_pending_deferred());
        assert!(!event.is_fully_applied());
    }

    #[test]
    fn test_condition_shift_result_key_direction() {
        assert_eq!(
            LotEffect::ConditionShift { steps: 1 }.result_key(),
            "lot_event.condition_upgrade"
        );
        assert_eq!(
            LotEffect::ConditionShift { steps: -1 }.result_key(),
            "lot_event.condition_downgrade"
        );
    }
}
