//! Phase State Machine
//!
//! Owns the auctioneer's clock:
//!
//! ```text
//! bidding ──(round expires, no raise)──► going_once ──► going_twice ──► final_call ──► closed
//!    ▲                                       │               │              │
//!    └──────────── any new bid ──────────────┴───────────────┴──────────────┘
//! ```
//!
//! Each tick decrements the current phase's timer. An expired `Bidding`
//! timer means an NPC response round is due; the orchestrator fires any
//! round-keyed lot events and then calls [`run_npc_round`]. An expired going
//! timer moves one step toward `Closed`.
//!
//! A new bid during any going phase reopens `Bidding` with a full round
//! timer. That rule is what makes sniping meaningful: a snipe that nobody
//! answers skips straight to `GoingOnce`, one that is answered puts everyone
//! back into a full round.
//!
//! # Critical Invariants
//!
//! - Phases only advance forward except through [`register_bid`]
//! - `rounds_elapsed` only increases
//! - `current_bid` only increases (enforced by `Auction::set_leader`)

use crate::models::auction::{Auction, AuctionPhase, AuctionStatus, CloseReason, Leader};
use crate::policy::{decide, BidDecision};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Phase clock timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Ticks in one bidding round
    pub round_ticks: u32,
    /// Ticks in each of going-once, going-twice and final-call
    pub going_ticks: u32,
    /// Bidding rounds after which the auction closes regardless
    pub max_rounds: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            round_ticks: 5,
            going_ticks: 3,
            max_rounds: 30,
        }
    }
}

/// What one tick of the clock produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    /// Auction not mutable; nothing happened
    Idle,
    /// Timer still running
    Running,
    /// Bidding timer expired; `rounds_elapsed` was incremented and an NPC
    /// round must be run
    RoundDue,
    /// Going timer expired and the phase moved forward
    Advanced { from: AuctionPhase, to: AuctionPhase },
    Closed { reason: CloseReason },
}

/// Phase change caused by something other than the clock
pub type Transition = (AuctionPhase, AuctionPhase);

/// Result of applying a batch of rival responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseOutcome {
    /// (bidder id, amount) for every raise, in roster order
    pub raises: Vec<(String, i64)>,
    pub dropped: Vec<String>,
    /// The raise that took the lead
    pub winner: Option<(String, i64)>,
}

impl ResponseOutcome {
    pub fn has_raise(&self) -> bool {
        self.winner.is_some()
    }
}

/// Result of one NPC response round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round: u32,
    pub outcome: ResponseOutcome,
    pub transition: Option<Transition>,
}

/// Activate an available auction and start the first bidding round
pub fn open(auction: &mut Auction, config: &PhaseConfig) {
    auction.status = AuctionStatus::Active;
    auction.phase = AuctionPhase::Bidding;
    auction.timer.reset(config.round_ticks);
}

/// Advance the clock by one tick
pub fn tick(auction: &mut Auction, config: &PhaseConfig) -> PhaseSignal {
    if !auction.is_mutable() {
        return PhaseSignal::Idle;
    }

    if !auction.timer.tick() {
        return PhaseSignal::Running;
    }

    match auction.phase {
        AuctionPhase::Bidding => {
            if !auction.has_bids() {
                return close(auction, CloseReason::NoBids);
            }
            if auction.rounds_elapsed >= config.max_rounds {
                return close(auction, CloseReason::RoundLimit);
            }
            auction.rounds_elapsed += 1;
            PhaseSignal::RoundDue
        }
        phase => match phase.next() {
            Some(AuctionPhase::Closed) | None => close(auction, CloseReason::Hammer),
            Some(next) => {
                auction.phase = next;
                auction.timer.reset(config.going_ticks);
                log::debug!(
                    "auction {} advanced {} -> {}",
                    auction.id,
                    phase.label(),
                    next.label()
                );
                PhaseSignal::Advanced {
                    from: phase,
                    to: next,
                }
            }
        },
    }
}

/// Ask every challenger (active rivals other than the leader) for a response
pub fn collect_responses(auction: &Auction, rng: &mut RngManager) -> Vec<(usize, BidDecision)> {
    auction
        .challenger_indices()
        .into_iter()
        .map(|idx| {
            let decision = decide(
                &auction.bidders[idx],
                auction.current_bid,
                auction.bid_increment,
                auction.rounds_elapsed,
                rng,
            );
            (idx, decision)
        })
        .collect()
}

/// Apply rival responses: record raises, drop folders, and hand the lead to
/// the highest raise (earliest in the roster on ties).
pub fn apply_responses(auction: &mut Auction, responses: &[(usize, BidDecision)]) -> ResponseOutcome {
    let mut outcome = ResponseOutcome::default();
    let mut best: Option<(usize, i64)> = None;

    for (idx, decision) in responses {
        let Some(bidder) = auction.bidders.get_mut(*idx) else {
            continue;
        };
        match decision {
            BidDecision::Raise { amount } if *amount > auction.current_bid => {
                if !bidder.record_bid(*amount) {
                    continue;
                }
                outcome.raises.push((bidder.id().to_string(), *amount));
                if best.map_or(true, |(_, top)| *amount > top) {
                    best = Some((*idx, *amount));
                }
            }
            BidDecision::Raise { .. } => {}
            BidDecision::DropOut => {
                bidder.drop_out();
                outcome.dropped.push(bidder.id().to_string());
            }
        }
    }

    if let Some((idx, amount)) = best {
        let bidder_id = auction.bidders[idx].id().to_string();
        if auction.set_leader(Leader::Npc(bidder_id.clone()), amount) {
            outcome.winner = Some((bidder_id, amount));
        }
    }

    outcome
}

/// Resolve one NPC response round after the bidding timer expired
pub fn run_npc_round(auction: &mut Auction, config: &PhaseConfig, rng: &mut RngManager) -> RoundSummary {
    let responses = collect_responses(auction, rng);
    let outcome = apply_responses(auction, &responses);

    let transition = if !outcome.has_raise() && auction.has_bids() {
        force_going_once(auction, config)
    } else {
        auction.timer.reset(config.round_ticks);
        None
    };

    RoundSummary {
        round: auction.rounds_elapsed,
        outcome,
        transition,
    }
}

/// A new bid landed. Reopens `Bidding` with a full round timer if the
/// auction was in a going phase.
pub fn register_bid(auction: &mut Auction, config: &PhaseConfig) -> Option<Transition> {
    if !auction.phase.is_going() {
        return None;
    }
    let from = auction.phase;
    auction.phase = AuctionPhase::Bidding;
    auction.timer.reset(config.round_ticks);
    log::debug!("auction {} reopened from {}", auction.id, from.label());
    Some((from, AuctionPhase::Bidding))
}

/// Jump from `Bidding` to `GoingOnce` with a fresh going timer
pub fn force_going_once(auction: &mut Auction, config: &PhaseConfig) -> Option<Transition> {
    if auction.phase != AuctionPhase::Bidding || !auction.is_mutable() {
        return None;
    }
    auction.phase = AuctionPhase::GoingOnce;
    auction.timer.reset(config.going_ticks);
    Some((AuctionPhase::Bidding, AuctionPhase::GoingOnce))
}

/// Close the auction. The player wins only if they hold the bid and did not
/// walk away.
pub fn close(auction: &mut Auction, reason: CloseReason) -> PhaseSignal {
    auction.phase = AuctionPhase::Closed;
    auction.timer = crate::core::time::RoundTimer::from_remaining(0);
    auction.close_reason = Some(reason);
    auction.status = if auction.leader.is_player() && reason != CloseReason::PlayerLeft {
        AuctionStatus::Won
    } else {
        AuctionStatus::Lost
    };
    log::info!(
        "auction {} closed ({:?}): {:?} at {}",
        auction.id,
        reason,
        auction.status,
        auction.current_bid
    );
    PhaseSignal::Closed { reason }
}
