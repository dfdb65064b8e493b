//! Tactics Engine
//!
//! Player-invoked actions that perturb the rivals outside the normal
//! per-round response:
//!
//! - **Intimidate**: rattles the room; susceptible rivals fold, the rest
//!   answer as in a forced NPC round
//! - **Bluff**: feigns deep pockets; believers fold, skeptics call it and may
//!   escalate out of spite
//! - **Sniper bid**: a minimal last-second raise that most rivals miss
//!
//! Every tactic spends one of a small per-auction budget of uses. Its
//! cooldown counts bidding rounds since the last tactic of any kind, so
//! tactics cannot be chained within one round. Each invocation is logged per
//! rival for UI replay.

use crate::models::auction::{Auction, Leader};
use crate::phase::{self, PhaseConfig, ResponseOutcome, Transition};
use crate::policy::{decide, escalate, BidDecision, PersonalityProfile};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    Intimidate,
    Bluff,
    SniperBid,
}

impl Tactic {
    pub const ALL: [Tactic; 3] = [Tactic::Intimidate, Tactic::Bluff, Tactic::SniperBid];
}

/// Errors from tactic invocation
#[derive(Debug, Error, PartialEq)]
pub enum TacticError {
    #[error("Auction is not active")]
    AuctionNotMutable,

    #[error("No uses of {0:?} left this auction")]
    NoUsesLeft(Tactic),

    #[error("{tactic:?} is on cooldown for {rounds_remaining} more round(s)")]
    OnCooldown { tactic: Tactic, rounds_remaining: u32 },

    #[error("The player must hold the current bid")]
    NotLeading,

    #[error("The player already holds the current bid")]
    AlreadyLeading,

    #[error("No rival bid to snipe")]
    NothingToSnipe,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },
}

/// Use budget and cooldown for one tactic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticRule {
    pub uses: u32,
    /// Bidding rounds that must pass before the tactic can be used again
    pub cooldown_rounds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticsConfig {
    pub intimidate: TacticRule,
    pub bluff: TacticRule,
    pub sniper: TacticRule,
    /// Chance each rival notices a sniper bid in time to react
    pub sniper_response_fraction: f64,
    /// Scales a skeptic's chance of escalating when calling a bluff
    pub bluff_escalation_factor: f64,
    /// Scales a believer's chance of folding to a bluff
    pub bluff_fold_factor: f64,
}

impl TacticsConfig {
    pub fn rule(&self, tactic: Tactic) -> TacticRule {
        match tactic {
            Tactic::Intimidate => self.intimidate,
            Tactic::Bluff => self.bluff,
            Tactic::SniperBid => self.sniper,
        }
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            intimidate: TacticRule {
                uses: 2,
                cooldown_rounds: 2,
            },
            bluff: TacticRule {
                uses: 2,
                cooldown_rounds: 2,
            },
            sniper: TacticRule {
                uses: 2,
                cooldown_rounds: 3,
            },
            sniper_response_fraction: 0.25,
            bluff_escalation_factor: 0.35,
            bluff_fold_factor: 0.6,
        }
    }
}

/// How one rival reacted to a tactic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TacticOutcome {
    Countered { amount: i64 },
    Dropped,
    /// Missed the sniper bid entirely
    Sniped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderReaction {
    pub bidder_id: String,
    pub outcome: TacticOutcome,
}

/// One tactic invocation, kept for UI replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticRecord {
    pub round: u32,
    pub tactic: Tactic,
    /// The player's bid for a sniper bid
    pub player_bid: Option<i64>,
    pub reactions: Vec<BidderReaction>,
    /// Phase changes caused by the tactic, in order
    pub transitions: Vec<Transition>,
}

impl TacticRecord {
    pub fn count(&self, wanted: fn(&TacticOutcome) -> bool) -> usize {
        self.reactions.iter().filter(|r| wanted(&r.outcome)).count()
    }

    pub fn countered(&self) -> usize {
        self.count(|o| matches!(o, TacticOutcome::Countered { .. }))
    }

    pub fn dropped(&self) -> usize {
        self.count(|o| matches!(o, TacticOutcome::Dropped))
    }

    pub fn sniped(&self) -> usize {
        self.count(|o| matches!(o, TacticOutcome::Sniped))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct TacticCounter {
    remaining: u32,
    last_used_round: Option<u32>,
}

/// Per-auction tactic bookkeeping; created fresh for every auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticsState {
    counters: BTreeMap<Tactic, TacticCounter>,
    /// Round of the most recent tactic of any kind
    last_tactic_round: Option<u32>,
    log: Vec<TacticRecord>,
}

impl TacticsState {
    pub fn new(config: &TacticsConfig) -> Self {
        let counters = Tactic::ALL
            .iter()
            .map(|tactic| {
                (
                    *tactic,
                    TacticCounter {
                        remaining: config.rule(*tactic).uses,
                        last_used_round: None,
                    },
                )
            })
            .collect();
        Self {
            counters,
            last_tactic_round: None,
            log: Vec::new(),
        }
    }

    pub fn uses_remaining(&self, tactic: Tactic) -> u32 {
        self.counters.get(&tactic).map_or(0, |c| c.remaining)
    }

    pub fn last_used_round(&self, tactic: Tactic) -> Option<u32> {
        self.counters.get(&tactic).and_then(|c| c.last_used_round)
    }

    pub fn last_tactic_round(&self) -> Option<u32> {
        self.last_tactic_round
    }

    pub fn log(&self) -> &[TacticRecord] {
        &self.log
    }

    /// Check use budget and cooldown without consuming anything
    ///
    /// The cooldown is the invoked tactic's own `cooldown_rounds`, measured
    /// from the last use of any tactic.
    pub fn check(&self, tactic: Tactic, round: u32, config: &TacticsConfig) -> Result<(), TacticError> {
        let counter = self
            .counters
            .get(&tactic)
            .ok_or(TacticError::NoUsesLeft(tactic))?;
        if counter.remaining == 0 {
            return Err(TacticError::NoUsesLeft(tactic));
        }
        if let Some(last) = self.last_tactic_round {
            let cooldown = config.rule(tactic).cooldown_rounds;
            let since = round.saturating_sub(last);
            if since < cooldown {
                return Err(TacticError::OnCooldown {
                    tactic,
                    rounds_remaining: cooldown - since,
                });
            }
        }
        Ok(())
    }

    fn consume(&mut self, tactic: Tactic, round: u32) {
        if let Some(counter) = self.counters.get_mut(&tactic) {
            counter.remaining = counter.remaining.saturating_sub(1);
            counter.last_used_round = Some(round);
        }
        self.last_tactic_round = Some(round);
    }
}

/// Run a tactic against the active auction
///
/// `wallet_balance` is only consulted by the sniper bid, which must be
/// affordable. Nothing is consumed or mutated when an error is returned.
pub fn invoke(
    tactic: Tactic,
    auction: &mut Auction,
    state: &mut TacticsState,
    config: &TacticsConfig,
    phase_config: &PhaseConfig,
    wallet_balance: i64,
    rng: &mut RngManager,
) -> Result<TacticRecord, TacticError> {
    if !auction.is_mutable() {
        return Err(TacticError::AuctionNotMutable);
    }
    let round = auction.rounds_elapsed();
    state.check(tactic, round, config)?;

    let record = match tactic {
        Tactic::Intimidate => {
            require_player_lead(auction)?;
            intimidate(auction, phase_config, rng)
        }
        Tactic::Bluff => {
            require_player_lead(auction)?;
            bluff(auction, config, phase_config, rng)
        }
        Tactic::SniperBid => snipe(auction, config, phase_config, wallet_balance, rng)?,
    };

    state.consume(tactic, round);
    state.log.push(record.clone());
    log::debug!(
        "tactic {:?} in auction {}: {} countered, {} dropped, {} sniped",
        tactic,
        auction.id(),
        record.countered(),
        record.dropped(),
        record.sniped()
    );
    Ok(record)
}

fn require_player_lead(auction: &Auction) -> Result<(), TacticError> {
    if auction.leader().is_player() {
        Ok(())
    } else {
        Err(TacticError::NotLeading)
    }
}

fn intimidate(auction: &mut Auction, phase_config: &PhaseConfig, rng: &mut RngManager) -> TacticRecord {
    let responses: Vec<(usize, BidDecision)> = auction
        .challenger_indices()
        .into_iter()
        .map(|idx| {
            let bidder = &auction.bidders()[idx];
            let profile = PersonalityProfile::for_personality(bidder.personality());
            let ratio = auction.current_bid() as f64 / bidder.max_budget().max(1) as f64;
            let fear = (profile.intimidation_susceptibility * (0.5 + ratio)).clamp(0.0, 0.95);
            let decision = if rng.chance(fear) {
                BidDecision::DropOut
            } else {
                decide(
                    bidder,
                    auction.current_bid(),
                    auction.bid_increment(),
                    auction.rounds_elapsed(),
                    rng,
                )
            };
            (idx, decision)
        })
        .collect();

    forced_round(Tactic::Intimidate, auction, &responses, phase_config)
}

fn bluff(
    auction: &mut Auction,
    config: &TacticsConfig,
    phase_config: &PhaseConfig,
    rng: &mut RngManager,
) -> TacticRecord {
    let responses: Vec<(usize, BidDecision)> = auction
        .challenger_indices()
        .into_iter()
        .map(|idx| {
            let bidder = &auction.bidders()[idx];
            let profile = PersonalityProfile::for_personality(bidder.personality());
            let (current, increment, rounds) = (
                auction.current_bid(),
                auction.bid_increment(),
                auction.rounds_elapsed(),
            );
            let decision = if profile.calls_bluffs() {
                if rng.chance(profile.skepticism * config.bluff_escalation_factor) {
                    escalate(bidder, current, increment, 2)
                } else {
                    decide(bidder, current, increment, rounds, rng)
                }
            } else if rng.chance((1.0 - profile.skepticism) * config.bluff_fold_factor) {
                BidDecision::DropOut
            } else {
                decide(bidder, current, increment, rounds, rng)
            };
            (idx, decision)
        })
        .collect();

    forced_round(Tactic::Bluff, auction, &responses, phase_config)
}

/// Resolve intimidate/bluff responses like an NPC round
fn forced_round(
    tactic: Tactic,
    auction: &mut Auction,
    responses: &[(usize, BidDecision)],
    phase_config: &PhaseConfig,
) -> TacticRecord {
    let round = auction.rounds_elapsed();
    let outcome = phase::apply_responses(auction, responses);

    let mut transitions = Vec::new();
    if outcome.has_raise() {
        match phase::register_bid(auction, phase_config) {
            Some(transition) => transitions.push(transition),
            None => auction.timer.reset(phase_config.round_ticks),
        }
    } else if auction.challenger_indices().is_empty() {
        transitions.extend(phase::force_going_once(auction, phase_config));
    }

    TacticRecord {
        round,
        tactic,
        player_bid: None,
        reactions: reactions_from(auction, responses, &outcome),
        transitions,
    }
}

fn snipe(
    auction: &mut Auction,
    config: &TacticsConfig,
    phase_config: &PhaseConfig,
    wallet_balance: i64,
    rng: &mut RngManager,
) -> Result<TacticRecord, TacticError> {
    match auction.leader() {
        Leader::Npc(_) => {}
        Leader::Player => return Err(TacticError::AlreadyLeading),
        Leader::Nobody => return Err(TacticError::NothingToSnipe),
    }

    let amount = match auction.current_bid().checked_add(auction.bid_increment()) {
        Some(amount) if amount <= wallet_balance => amount,
        overflow => {
            return Err(TacticError::InsufficientFunds {
                required: overflow.unwrap_or(i64::MAX),
                available: wallet_balance,
            })
        }
    };

    let round = auction.rounds_elapsed();
    auction.set_leader(Leader::Player, amount);

    let mut transitions = Vec::new();
    transitions.extend(phase::register_bid(auction, phase_config));

    let mut missed = Vec::new();
    let mut responses = Vec::new();
    for idx in auction.challenger_indices() {
        if rng.chance(config.sniper_response_fraction) {
            let bidder = &auction.bidders()[idx];
            let decision = decide(
                bidder,
                auction.current_bid(),
                auction.bid_increment(),
                auction.rounds_elapsed(),
                rng,
            );
            responses.push((idx, decision));
        } else {
            missed.push(auction.bidders()[idx].id().to_string());
        }
    }

    let outcome = phase::apply_responses(auction, &responses);
    if outcome.has_raise() {
        auction.timer.reset(phase_config.round_ticks);
    } else {
        transitions.extend(phase::force_going_once(auction, phase_config));
    }

    let mut reactions = reactions_from(auction, &responses, &outcome);
    reactions.extend(missed.into_iter().map(|bidder_id| BidderReaction {
        bidder_id,
        outcome: TacticOutcome::Sniped,
    }));

    Ok(TacticRecord {
        round,
        tactic: Tactic::SniperBid,
        player_bid: Some(amount),
        reactions,
        transitions,
    })
}

fn reactions_from(
    auction: &Auction,
    responses: &[(usize, BidDecision)],
    outcome: &ResponseOutcome,
) -> Vec<BidderReaction> {
    responses
        .iter()
        .filter_map(|(idx, _)| {
            let bidder_id = auction.bidders().get(*idx)?.id().to_string();
            let reaction = if let Some((_, amount)) =
                outcome.raises.iter().find(|(id, _)| *id == bidder_id)
            {
                TacticOutcome::Countered { amount: *amount }
            } else if outcome.dropped.contains(&bidder_id) {
                TacticOutcome::Dropped
            } else {
                return None;
            };
            Some(BidderReaction {
                bidder_id,
                outcome: reaction,
            })
        })
        .collect()
}
