//! Auction model
//!
//! One storage-unit auction: the lot, the rival roster, the scheduled lot
//! events and the phase clock.
//!
//! # Lifecycle
//!
//! ```text
//! Available ──(entry fee paid)──► Active ──(phase clock closes)──► Won | Lost
//! ```
//!
//! # Critical Invariants
//!
//! 1. `current_bid` never decreases
//! 2. `rounds_elapsed` never decreases
//! 3. Phases only move forward unless a new bid reopens `Bidding`
//! 4. Once the phase is `Closed` the auction is immutable

use crate::core::time::RoundTimer;
use crate::events::types::LotEvent;
use crate::models::bidder::Bidder;
use crate::models::item::{lot_value, Item};
use serde::{Deserialize, Serialize};

/// Auctioneer phase. Ordered: later phases compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionPhase {
    Bidding,
    GoingOnce,
    GoingTwice,
    FinalCall,
    Closed,
}

impl AuctionPhase {
    /// Phase that follows when the going timer expires without a new bid
    pub fn next(self) -> Option<AuctionPhase> {
        match self {
            AuctionPhase::Bidding => Some(AuctionPhase::GoingOnce),
            AuctionPhase::GoingOnce => Some(AuctionPhase::GoingTwice),
            AuctionPhase::GoingTwice => Some(AuctionPhase::FinalCall),
            AuctionPhase::FinalCall => Some(AuctionPhase::Closed),
            AuctionPhase::Closed => None,
        }
    }

    /// True for the going-once / going-twice / final-call countdown
    pub fn is_going(self) -> bool {
        matches!(
            self,
            AuctionPhase::GoingOnce | AuctionPhase::GoingTwice | AuctionPhase::FinalCall
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AuctionPhase::Bidding => "bidding",
            AuctionPhase::GoingOnce => "going_once",
            AuctionPhase::GoingTwice => "going_twice",
            AuctionPhase::FinalCall => "final_call",
            AuctionPhase::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Available,
    Active,
    Won,
    Lost,
}

impl AuctionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AuctionStatus::Won | AuctionStatus::Lost)
    }
}

/// Who holds the current bid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Leader {
    Nobody,
    Player,
    Npc(String),
}

impl Leader {
    pub fn is_player(&self) -> bool {
        matches!(self, Leader::Player)
    }

    pub fn is_npc(&self, bidder_id: &str) -> bool {
        matches!(self, Leader::Npc(id) if id == bidder_id)
    }

    /// "" for nobody, "player", or the bidder id
    pub fn as_str(&self) -> &str {
        match self {
            Leader::Nobody => "",
            Leader::Player => "player",
            Leader::Npc(id) => id,
        }
    }
}

/// Why an auction closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Final call expired with no new bid
    Hammer,
    /// The first bidding round expired with nobody bidding
    NoBids,
    /// Maximum round count reached
    RoundLimit,
    /// The player walked away
    PlayerLeft,
    /// Player won but could no longer cover the bid
    InsufficientFunds,
    /// Player won but the inventory refused the lot
    InventoryFull,
}

/// Everything needed to assemble an auction
///
/// The factory fills this from a location profile; tests build it directly
/// to stage exact scenarios.
#[derive(Debug, Clone)]
pub struct AuctionDraft {
    pub id: String,
    pub location_id: String,
    pub location_name: String,
    pub entry_fee: i64,
    /// Location-tier aggression factor for late-arriving bidders
    pub budget_tier_factor: f64,
    pub items: Vec<Item>,
    /// Minimum first bid
    pub opening_bid: i64,
    pub bid_increment: i64,
    pub bidders: Vec<Bidder>,
    pub lot_events: Vec<LotEvent>,
}

/// A storage-unit auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub(crate) id: String,
    pub(crate) location_id: String,
    pub(crate) location_name: String,
    pub(crate) items: Vec<Item>,
    /// Lot value at creation; never shown to the player before close
    pub(crate) hidden_total_value: i64,
    pub(crate) entry_fee: i64,
    pub(crate) budget_tier_factor: f64,
    pub(crate) current_bid: i64,
    pub(crate) leader: Leader,
    pub(crate) bid_increment: i64,
    pub(crate) phase: AuctionPhase,
    pub(crate) rounds_elapsed: u32,
    pub(crate) timer: RoundTimer,
    pub(crate) bidders: Vec<Bidder>,
    pub(crate) lot_events: Vec<LotEvent>,
    pub(crate) status: AuctionStatus,
    pub(crate) bid_count: u32,
    pub(crate) player_bid_count: u32,
    pub(crate) close_reason: Option<CloseReason>,
    /// Counter for ids minted mid-auction (late bidders, bonus items)
    pub(crate) next_local_id: u32,
}

impl Auction {
    pub fn from_draft(draft: AuctionDraft) -> Self {
        let hidden_total_value = lot_value(&draft.items);
        Self {
            id: draft.id,
            location_id: draft.location_id,
            location_name: draft.location_name,
            items: draft.items,
            hidden_total_value,
            entry_fee: draft.entry_fee.max(0),
            budget_tier_factor: draft.budget_tier_factor,
            current_bid: draft.opening_bid.max(0),
            leader: Leader::Nobody,
            bid_increment: draft.bid_increment.max(1),
            phase: AuctionPhase::Bidding,
            rounds_elapsed: 0,
            timer: RoundTimer::from_remaining(0),
            bidders: draft.bidders,
            lot_events: draft.lot_events,
            status: AuctionStatus::Available,
            bid_count: 0,
            player_bid_count: 0,
            close_reason: None,
            next_local_id: 1,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn hidden_total_value(&self) -> i64 {
        self.hidden_total_value
    }

    pub fn entry_fee(&self) -> i64 {
        self.entry_fee
    }

    pub fn budget_tier_factor(&self) -> f64 {
        self.budget_tier_factor
    }

    pub fn current_bid(&self) -> i64 {
        self.current_bid
    }

    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    pub fn bid_increment(&self) -> i64 {
        self.bid_increment
    }

    pub fn phase(&self) -> AuctionPhase {
        self.phase
    }

    pub fn rounds_elapsed(&self) -> u32 {
        self.rounds_elapsed
    }

    pub fn round_ticks_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn bidders(&self) -> &[Bidder] {
        &self.bidders
    }

    pub fn bidder(&self, bidder_id: &str) -> Option<&Bidder> {
        self.bidders.iter().find(|b| b.id() == bidder_id)
    }

    pub fn lot_events(&self) -> &[LotEvent] {
        &self.lot_events
    }

    pub fn status(&self) -> AuctionStatus {
        self.status
    }

    pub fn bid_count(&self) -> u32 {
        self.bid_count
    }

    pub fn player_bid_count(&self) -> u32 {
        self.player_bid_count
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Active and not yet closed: the only state player actions may touch
    pub fn is_mutable(&self) -> bool {
        self.status == AuctionStatus::Active && self.phase != AuctionPhase::Closed
    }

    pub fn has_bids(&self) -> bool {
        self.leader != Leader::Nobody
    }

    /// Smallest legal next bid: the opening bid while nobody leads, then one
    /// increment over the standing bid. Saturates at `i64::MAX`.
    pub fn min_next_bid(&self) -> i64 {
        if self.has_bids() {
            self.current_bid.saturating_add(self.bid_increment)
        } else {
            self.current_bid
        }
    }

    /// Rivals still in the running
    pub fn active_bidders(&self) -> impl Iterator<Item = &Bidder> {
        self.bidders.iter().filter(|b| b.is_active())
    }

    /// Active rivals other than the current leader, by roster index
    pub fn challenger_indices(&self) -> Vec<usize> {
        self.bidders
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_active() && !self.leader.is_npc(b.id()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Deferred lot effects triggered but not yet resolved
    pub fn pending_deferred_effects(&self) -> usize {
        self.lot_events
            .iter()
            .filter(|e| e.triggered)
            .flat_map(|e| e.effects.iter())
            .filter(|e| e.is_pending())
            .count()
    }

    // ========================================================================
    // Crate-internal mutation
    // ========================================================================

    /// Move the standing bid to `leader` at `amount`. Refuses anything that
    /// would lower the bid.
    pub(crate) fn set_leader(&mut self, leader: Leader, amount: i64) -> bool {
        if amount < self.current_bid {
            return false;
        }
        if leader.is_player() {
            self.player_bid_count += 1;
        }
        self.current_bid = amount;
        self.leader = leader;
        self.bid_count += 1;
        true
    }

    pub(crate) fn mint_local_id(&mut self, prefix: &str) -> String {
        let id = format!("{}_{}_{}", self.id, prefix, self.next_local_id);
        self.next_local_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bidder::Personality;
    use crate::models::item::{Condition, Rarity};

    fn draft() -> AuctionDraft {
        AuctionDraft {
            id: "auc_1".to_string(),
            location_id: "suburb".to_string(),
            location_name: "Suburban Storage".to_string(),
            entry_fee: 100,
            budget_tier_factor: 1.0,
            items: vec![Item::new(
                "i1",
                "Toolbox",
                "tools",
                Rarity::Common,
                Condition::Good,
                400,
            )],
            opening_bid: 40,
            bid_increment: 10,
            bidders: vec![
                Bidder::new("npc_1", "A", Personality::Cautious, 300),
                Bidder::new("npc_2", "B", Personality::Aggressive, 500),
            ],
            lot_events: Vec::new(),
        }
    }

    #[test]
    fn test_new_auction_is_available_with_no_leader() {
        let auction = Auction::from_draft(draft());
        assert_eq!(auction.status(), AuctionStatus::Available);
        assert_eq!(auction.leader(), &Leader::Nobody);
        assert_eq!(auction.hidden_total_value(), 400);
        assert!(!auction.is_mutable());
    }

    #[test]
    fn test_min_next_bid_uses_opening_then_increment() {
        let mut auction = Auction::from_draft(draft());
        assert_eq!(auction.min_next_bid(), 40);
        assert!(auction.set_leader(Leader::Player, 50));
        assert_eq!(auction.min_next_bid(), 60);
    }

    #[test]
    fn test_set_leader_refuses_lower_bid() {
        let mut auction = Auction::from_draft(draft());
        assert!(auction.set_leader(Leader::Player, 80));
        assert!(!auction.set_leader(Leader::Npc("npc_1".to_string()), 70));
        assert_eq!(auction.current_bid(), 80);
        assert!(auction.leader().is_player());
    }

    #[test]
    fn test_challengers_exclude_npc_leader() {
        let mut auction = Auction::from_draft(draft());
        auction.set_leader(Leader::Npc("npc_2".to_string()), 60);
        assert_eq!(auction.challenger_indices(), vec![0]);
    }

    #[test]
    fn test_phase_order() {
        assert!(AuctionPhase::Bidding < AuctionPhase::GoingOnce);
        assert!(AuctionPhase::FinalCall < AuctionPhase::Closed);
        assert_eq!(AuctionPhase::FinalCall.next(), Some(AuctionPhase::Closed));
        assert_eq!(AuctionPhase::Closed.next(), None);
    }
}
