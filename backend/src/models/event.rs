//! Event logging for auction replay and auditing.
//!
//! Every significant state change in the auction house is captured as an
//! `Event`. The log lets the UI replay an auction, lets tests assert on the
//! exact sequence of phase changes, and gives the host something to persist.
//!
//! # Event Types
//!
//! - **Lifecycle**: listed, started, closed, settled
//! - **Bidding**: bids placed, rivals dropping out, rounds resolved
//! - **Phase**: auctioneer phase changes
//! - **Tactics**: player tactic invocations
//! - **Lot events**: triggers, applied effects, discarded deferred effects
//!
//! # Example
//!
//! ```rust
//! use auction_engine_core_rs::models::event::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::BidPlaced {
//!     tick: 3,
//!     auction_id: "auc_1".to_string(),
//!     bidder: "player".to_string(),
//!     amount: 120,
//! });
//! assert_eq!(log.events_at_tick(3).len(), 1);
//! ```

use crate::models::auction::{AuctionPhase, AuctionStatus, CloseReason};
use crate::tactics::Tactic;

/// Auction event capturing a state change.
///
/// All events carry the house tick they happened on; events within a tick
/// are logged in the order they occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new auction was put on the board
    AuctionListed {
        tick: usize,
        auction_id: String,
        location_id: String,
        num_bidders: usize,
        num_lot_events: usize,
    },

    /// The player paid the entry fee
    AuctionStarted {
        tick: usize,
        auction_id: String,
        entry_fee: i64,
    },

    /// A bid took the lead ("player" or the rival's id)
    BidPlaced {
        tick: usize,
        auction_id: String,
        bidder: String,
        amount: i64,
    },

    /// A rival left the auction for good
    BidderDropped {
        tick: usize,
        auction_id: String,
        bidder_id: String,
    },

    /// One NPC response round finished
    RoundResolved {
        tick: usize,
        auction_id: String,
        round: u32,
        raises: usize,
        current_bid: i64,
    },

    PhaseChanged {
        tick: usize,
        auction_id: String,
        from: AuctionPhase,
        to: AuctionPhase,
    },

    TacticUsed {
        tick: usize,
        auction_id: String,
        tactic: Tactic,
        countered: usize,
        dropped: usize,
        sniped: usize,
    },

    LotEventTriggered {
        tick: usize,
        auction_id: String,
        event_id: String,
        kind: String,
    },

    LotEffectApplied {
        tick: usize,
        auction_id: String,
        event_id: String,
        result_key: String,
    },

    /// Deferred item effects thrown away because the player did not win
    LotEffectsDiscarded {
        tick: usize,
        auction_id: String,
        count: usize,
    },

    AuctionClosed {
        tick: usize,
        auction_id: String,
        status: AuctionStatus,
        reason: CloseReason,
        winner: String,
        winning_bid: i64,
    },

    /// Cash and items moved for a won auction
    Settled {
        tick: usize,
        auction_id: String,
        amount_paid: i64,
        items_transferred: usize,
    },
}

impl Event {
    /// Get the tick when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::AuctionListed { tick, .. }
            | Event::AuctionStarted { tick, .. }
            | Event::BidPlaced { tick, .. }
            | Event::BidderDropped { tick, .. }
            | Event::RoundResolved { tick, .. }
            | Event::PhaseChanged { tick, .. }
            | Event::TacticUsed { tick, .. }
            | Event::LotEventTriggered { tick, .. }
            | Event::LotEffectApplied { tick, .. }
            | Event::LotEffectsDiscarded { tick, .. }
            | Event::AuctionClosed { tick, .. }
            | Event::Settled { tick, .. } => *tick,
        }
    }

    /// Get the auction this event belongs to
    pub fn auction_id(&self) -> &str {
        match self {
            Event::AuctionListed { auction_id, .. }
            | Event::AuctionStarted { auction_id, .. }
            | Event::BidPlaced { auction_id, .. }
            | Event::BidderDropped { auction_id, .. }
            | Event::RoundResolved { auction_id, .. }
            | Event::PhaseChanged { auction_id, .. }
            | Event::TacticUsed { auction_id, .. }
            | Event::LotEventTriggered { auction_id, .. }
            | Event::LotEffectApplied { auction_id, .. }
            | Event::LotEffectsDiscarded { auction_id, .. }
            | Event::AuctionClosed { auction_id, .. }
            | Event::Settled { auction_id, .. } => auction_id,
        }
    }

    /// Get the event type name (variant name)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::AuctionListed { .. } => "AuctionListed",
            Event::AuctionStarted { .. } => "AuctionStarted",
            Event::BidPlaced { .. } => "BidPlaced",
            Event::BidderDropped { .. } => "BidderDropped",
            Event::RoundResolved { .. } => "RoundResolved",
            Event::PhaseChanged { .. } => "PhaseChanged",
            Event::TacticUsed { .. } => "TacticUsed",
            Event::LotEventTriggered { .. } => "LotEventTriggered",
            Event::LotEffectApplied { .. } => "LotEffectApplied",
            Event::LotEffectsDiscarded { .. } => "LotEffectsDiscarded",
            Event::AuctionClosed { .. } => "AuctionClosed",
            Event::Settled { .. } => "Settled",
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific auction
    pub fn events_for_auction(&self, auction_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.auction_id() == auction_id)
            .collect()
    }

    /// Phase sequence observed for one auction, starting from `Bidding`
    pub fn phase_trail(&self, auction_id: &str) -> Vec<AuctionPhase> {
        let mut trail = vec![AuctionPhase::Bidding];
        for event in self.events_for_auction(auction_id) {
            if let Event::PhaseChanged { to, .. } = event {
                trail.push(*to);
            }
        }
        trail
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(tick: usize, auction: &str, amount: i64) -> Event {
        Event::BidPlaced {
            tick,
            auction_id: auction.to_string(),
            bidder: "player".to_string(),
            amount,
        }
    }

    #[test]
    fn test_event_type_and_tick() {
        let event = bid(42, "auc_1", 10);
        assert_eq!(event.tick(), 42);
        assert_eq!(event.event_type(), "BidPlaced");
        assert_eq!(event.auction_id(), "auc_1");
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        log.log(bid(1, "auc_1", 10));
        log.log(Event::PhaseChanged {
            tick: 1,
            auction_id: "auc_1".to_string(),
            from: AuctionPhase::Bidding,
            to: AuctionPhase::GoingOnce,
        });
        log.log(bid(2, "auc_2", 20));

        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_of_type("BidPlaced").len(), 2);
        assert_eq!(log.events_for_auction("auc_2").len(), 1);
        assert_eq!(
            log.phase_trail("auc_1"),
            vec![AuctionPhase::Bidding, AuctionPhase::GoingOnce]
        );
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(bid(1, "auc_1", 10));
        log.clear();
        assert!(log.is_empty());
    }
}
