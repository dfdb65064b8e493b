//! Auction House Engine
//!
//! The single entry point a host drives. It owns the board of available
//! auctions, at most one active auction with its tactics state, the bounded
//! history of closed auctions, the event log and the RNG.
//!
//! # Architecture
//!
//! ```text
//! For each tick t:
//! 1. Advance the phase clock of the active auction
//! 2. If a bidding round expired:
//!    a. Fire round-keyed lot events (list order)
//!    b. Run the NPC response round
//! 3. If the auction closed:
//!    a. Settle (pay, resolve win-time lot events, transfer items)
//!    b. Archive a HistoryRecord, discard the auction
//! 4. Advance time
//! ```
//!
//! Player actions (`place_bid`, `use_tactic`, `leave_auction`) are plain
//! calls between ticks. They validate before mutating and return an
//! `AuctionError` instead of panicking.
//!
//! # Example
//!
//! ```rust
//! use auction_engine_core_rs::orchestrator::{AuctionHouse, AuctionHouseConfig};
//! use auction_engine_core_rs::{
//!     Collaborators, Condition, Item, PlayerWallet, Rarity, StaticLocationCatalog,
//!     StorageInventory, TemplateItemGenerator,
//! };
//!
//! let mut house = AuctionHouse::new(
//!     AuctionHouseConfig::default(),
//!     StaticLocationCatalog::with_default_locations(),
//! )
//! .unwrap();
//!
//! let items = vec![Item::new("itm_1", "Toolbox", "tools", Rarity::Common, Condition::Good, 400)];
//! let auction_id = house.list_auction("roadside_yard", items, 0.0).unwrap();
//!
//! let mut wallet = PlayerWallet::new(1_000);
//! let mut inventory = StorageInventory::new(20);
//! let mut generator = TemplateItemGenerator::default();
//! let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut generator);
//!
//! house.start_auction(&auction_id, &mut collab).unwrap();
//! for _ in 0..500 {
//!     if house.tick(&mut collab).closed.is_some() {
//!         break;
//!     }
//! }
//! assert!(house.active_auction().is_none());
//! assert_eq!(house.history().len(), 1);
//! ```

use crate::events::handler::{fire_reveal, fire_round, LotEventReport};
use crate::factory::{build_auction, FactoryError};
use crate::models::auction::{Auction, AuctionPhase, AuctionStatus, CloseReason, Leader};
use crate::models::bidder::Personality;
use crate::models::collaborators::{Collaborators, LocationCatalog, Wallet};
use crate::models::event::{Event, EventLog};
use crate::models::item::Item;
use crate::phase::{self, PhaseConfig, PhaseSignal, RoundSummary, Transition};
use crate::rng::RngManager;
use crate::settlement::{settle, SettlementOutcome};
use crate::tactics::{self, Tactic, TacticError, TacticOutcome, TacticRecord, TacticsConfig, TacticsState};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete auction house configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionHouseConfig {
    /// RNG seed for deterministic auctions
    pub rng_seed: u64,

    /// Phase clock timings
    #[serde(default)]
    pub phase: PhaseConfig,

    /// Tactic budgets, cooldowns and reaction factors
    #[serde(default)]
    pub tactics: TacticsConfig,

    /// Closed auctions kept in history (oldest evicted first)
    pub history_capacity: usize,

    /// Available auctions kept on the board (oldest evicted first)
    pub board_capacity: usize,
}

impl Default for AuctionHouseConfig {
    fn default() -> Self {
        Self {
            rng_seed: 12345,
            phase: PhaseConfig::default(),
            tactics: TacticsConfig::default(),
            history_capacity: 50,
            board_capacity: 8,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from player actions and house setup
#[derive(Debug, Error, PartialEq)]
pub enum AuctionError {
    #[error("Another auction is already active")]
    AuctionAlreadyActive,

    #[error("No auction is active")]
    NoActiveAuction,

    #[error("The active auction is closed")]
    AuctionNotMutable,

    #[error("Unknown auction: {0}")]
    UnknownAuction(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Bid too low: minimum {minimum}, offered {offered}")]
    BidTooLow { minimum: i64, offered: i64 },

    #[error("The player already holds the current bid")]
    AlreadyLeading,

    #[error("The player must hold the current bid")]
    NotLeading,

    #[error("No rival bid to snipe")]
    NothingToSnipe,

    #[error("No uses of {0:?} left this auction")]
    NoUsesLeft(Tactic),

    #[error("{tactic:?} is on cooldown for {rounds_remaining} more round(s)")]
    OnCooldown { tactic: Tactic, rounds_remaining: u32 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Cannot list an auction with no items")]
    EmptyLot,
}

impl From<TacticError> for AuctionError {
    fn from(err: TacticError) -> Self {
        match err {
            TacticError::AuctionNotMutable => AuctionError::AuctionNotMutable,
            TacticError::NoUsesLeft(tactic) => AuctionError::NoUsesLeft(tactic),
            TacticError::OnCooldown {
                tactic,
                rounds_remaining,
            } => AuctionError::OnCooldown {
                tactic,
                rounds_remaining,
            },
            TacticError::NotLeading => AuctionError::NotLeading,
            TacticError::AlreadyLeading => AuctionError::AlreadyLeading,
            TacticError::NothingToSnipe => AuctionError::NothingToSnipe,
            TacticError::InsufficientFunds {
                required,
                available,
            } => AuctionError::InsufficientFunds {
                required,
                available,
            },
        }
    }
}

impl From<FactoryError> for AuctionError {
    fn from(err: FactoryError) -> Self {
        match err {
            FactoryError::EmptyLot => AuctionError::EmptyLot,
        }
    }
}

// ============================================================================
// Records and Views
// ============================================================================

/// The active auction and the state that lives and dies with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAuction {
    pub auction: Auction,
    pub tactics: TacticsState,
    pub started_tick: usize,
}

/// Trimmed archive of a closed auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub auction_id: String,
    pub location_id: String,
    pub location_name: String,
    pub status: AuctionStatus,
    /// "player", a rival id, or "" when nobody bid
    pub winner: String,
    pub winning_bid: i64,
    pub entry_fee: i64,
    pub rounds: u32,
    pub player_bids: u32,
    pub tactics_used: usize,
    pub items_won: usize,
    pub items_value: i64,
    /// Lot value at listing, revealed once the auction is over
    pub hidden_value: i64,
    pub close_reason: Option<CloseReason>,
    pub closed_at_tick: usize,
}

/// A rival as the player may see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderView {
    pub id: String,
    pub name: String,
    pub personality: Personality,
    pub current_bid: i64,
    pub dropped_out: bool,
    pub late_arrival: bool,
    /// Only set once a lot event revealed it
    pub visible_budget: Option<i64>,
}

/// UI snapshot of the active auction (no hidden values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub auction_id: String,
    pub location_name: String,
    pub phase: AuctionPhase,
    pub status: AuctionStatus,
    pub current_bid: i64,
    pub leader: Leader,
    pub min_next_bid: i64,
    pub bid_increment: i64,
    pub rounds_elapsed: u32,
    pub round_ticks_remaining: u32,
    pub item_count: usize,
    pub bidders: Vec<BidderView>,
}

impl AuctionSnapshot {
    pub fn from_auction(auction: &Auction) -> Self {
        Self {
            auction_id: auction.id().to_string(),
            location_name: auction.location_name().to_string(),
            phase: auction.phase(),
            status: auction.status(),
            current_bid: auction.current_bid(),
            leader: auction.leader().clone(),
            min_next_bid: auction.min_next_bid(),
            bid_increment: auction.bid_increment(),
            rounds_elapsed: auction.rounds_elapsed(),
            round_ticks_remaining: auction.round_ticks_remaining(),
            item_count: auction.items().len(),
            bidders: auction
                .bidders()
                .iter()
                .map(|b| BidderView {
                    id: b.id().to_string(),
                    name: b.name().to_string(),
                    personality: b.personality(),
                    current_bid: b.current_bid(),
                    dropped_out: b.is_dropped_out(),
                    late_arrival: b.is_late_arrival(),
                    visible_budget: b.visible_budget(),
                })
                .collect(),
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Tick number
    pub tick: usize,

    /// What the phase clock did
    pub signal: PhaseSignal,

    /// NPC round resolved this tick, if any
    pub round: Option<RoundSummary>,

    /// Round-keyed lot events fired this tick
    pub lot_events: Vec<LotEventReport>,

    /// Archive of the auction closed and settled this tick
    pub closed: Option<HistoryRecord>,
}

// ============================================================================
// Auction House
// ============================================================================

/// Owns every auction from listing to archive
///
/// # Determinism
///
/// All randomness comes from one seeded `RngManager`. Same seed + same
/// config + same sequence of calls = identical auctions.
pub struct AuctionHouse {
    config: AuctionHouseConfig,
    catalog: Box<dyn LocationCatalog>,
    rng: RngManager,
    current_tick: usize,
    board: Vec<Auction>,
    active: Option<ActiveAuction>,
    history: VecDeque<HistoryRecord>,
    event_log: EventLog,
}

impl AuctionHouse {
    /// Create a house with an empty board
    pub fn new(
        config: AuctionHouseConfig,
        catalog: impl LocationCatalog + 'static,
    ) -> Result<Self, AuctionError> {
        Self::validate_config(&config)?;

        Ok(Self {
            rng: RngManager::new(config.rng_seed),
            config,
            catalog: Box::new(catalog),
            current_tick: 0,
            board: Vec::new(),
            active: None,
            history: VecDeque::new(),
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    pub fn validate_config(config: &AuctionHouseConfig) -> Result<(), AuctionError> {
        let phase = &config.phase;
        if phase.round_ticks == 0 || phase.going_ticks == 0 {
            return Err(AuctionError::InvalidConfig(
                "phase timers must be > 0 ticks".to_string(),
            ));
        }
        if phase.max_rounds == 0 {
            return Err(AuctionError::InvalidConfig(
                "max_rounds must be > 0".to_string(),
            ));
        }
        if config.history_capacity == 0 || config.board_capacity == 0 {
            return Err(AuctionError::InvalidConfig(
                "history and board capacity must be > 0".to_string(),
            ));
        }

        let tactics = &config.tactics;
        let probabilities = [
            ("sniper_response_fraction", tactics.sniper_response_fraction),
            ("bluff_escalation_factor", tactics.bluff_escalation_factor),
            ("bluff_fold_factor", tactics.bluff_fold_factor),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(AuctionError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &AuctionHouseConfig {
        &self.config
    }

    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Available auctions, oldest first
    pub fn board(&self) -> &[Auction] {
        &self.board
    }

    pub fn listing(&self, auction_id: &str) -> Option<&Auction> {
        self.board.iter().find(|a| a.id() == auction_id)
    }

    pub fn active_auction(&self) -> Option<&Auction> {
        self.active.as_ref().map(|a| &a.auction)
    }

    /// What the player may see of the active auction
    pub fn snapshot(&self) -> Option<AuctionSnapshot> {
        self.active_auction().map(AuctionSnapshot::from_auction)
    }

    pub fn tactics_state(&self) -> Option<&TacticsState> {
        self.active.as_ref().map(|a| &a.tactics)
    }

    /// Closed auctions, oldest first
    pub fn history(&self) -> &VecDeque<HistoryRecord> {
        &self.history
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub(crate) fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    // ========================================================================
    // Board
    // ========================================================================

    /// List a new auction at `location_id` for a caller-supplied item batch
    ///
    /// Returns the new auction's id. When the board is full the oldest
    /// listing is dropped.
    pub fn list_auction(
        &mut self,
        location_id: &str,
        items: Vec<Item>,
        luck: f64,
    ) -> Result<String, AuctionError> {
        let profile = self
            .catalog
            .get(location_id)
            .ok_or_else(|| AuctionError::UnknownLocation(location_id.to_string()))?;
        let auction = build_auction(&profile, items, luck, &mut self.rng)?;
        let auction_id = auction.id().to_string();

        self.event_log.log(Event::AuctionListed {
            tick: self.current_tick,
            auction_id: auction_id.clone(),
            location_id: profile.id.clone(),
            num_bidders: auction.bidders().len(),
            num_lot_events: auction.lot_events().len(),
        });

        self.push_listing(auction);
        Ok(auction_id)
    }

    /// List an auction built elsewhere (scripted or tutorial lots)
    ///
    /// The auction must still be `Available`, carry at least one item and
    /// not reuse an id already on the board or in play.
    pub fn list_prepared(&mut self, auction: Auction) -> Result<String, AuctionError> {
        if auction.items().is_empty() {
            return Err(AuctionError::EmptyLot);
        }
        if auction.status() != AuctionStatus::Available {
            return Err(AuctionError::AuctionNotMutable);
        }
        let auction_id = auction.id().to_string();
        let in_play = self.active_auction().map_or(false, |a| a.id() == auction_id);
        if in_play || self.listing(&auction_id).is_some() {
            return Err(AuctionError::InvalidConfig(format!(
                "duplicate auction id {}",
                auction_id
            )));
        }

        self.event_log.log(Event::AuctionListed {
            tick: self.current_tick,
            auction_id: auction_id.clone(),
            location_id: auction.location_id().to_string(),
            num_bidders: auction.bidders().len(),
            num_lot_events: auction.lot_events().len(),
        });
        self.push_listing(auction);
        Ok(auction_id)
    }

    fn push_listing(&mut self, auction: Auction) {
        if self.board.len() >= self.config.board_capacity {
            let evicted = self.board.remove(0);
            log::debug!("board full, dropped listing {}", evicted.id());
        }
        self.board.push(auction);
    }

    // ========================================================================
    // Player Actions
    // ========================================================================

    /// Pay the entry fee and activate a listed auction
    pub fn start_auction(
        &mut self,
        auction_id: &str,
        collab: &mut Collaborators,
    ) -> Result<(), AuctionError> {
        if self.active.is_some() {
            return Err(AuctionError::AuctionAlreadyActive);
        }
        let idx = self
            .board
            .iter()
            .position(|a| a.id() == auction_id)
            .ok_or_else(|| AuctionError::UnknownAuction(auction_id.to_string()))?;

        let entry_fee = self.board[idx].entry_fee();
        let available = collab.wallet.balance();
        if available < entry_fee || (entry_fee > 0 && !collab.wallet.debit(entry_fee)) {
            return Err(AuctionError::InsufficientFunds {
                required: entry_fee,
                available,
            });
        }

        let mut auction = self.board.remove(idx);
        phase::open(&mut auction, &self.config.phase);

        let tick = self.current_tick;
        self.event_log.log(Event::AuctionStarted {
            tick,
            auction_id: auction_id.to_string(),
            entry_fee,
        });

        let reports = fire_reveal(&mut auction, collab, &mut self.rng);
        log_lot_reports(&mut self.event_log, tick, auction_id, &reports);

        log::info!(
            "auction {} started at {} (fee {}, {} rivals)",
            auction_id,
            auction.location_id(),
            entry_fee,
            auction.bidders().len()
        );

        self.active = Some(ActiveAuction {
            auction,
            tactics: TacticsState::new(&self.config.tactics),
            started_tick: tick,
        });
        Ok(())
    }

    /// Place a player bid on the active auction
    ///
    /// The first bid must reach the opening bid; later bids must be at least
    /// one increment over the standing bid. A bid in a going phase reopens
    /// `Bidding`.
    pub fn place_bid(&mut self, amount: i64, wallet: &dyn Wallet) -> Result<(), AuctionError> {
        let active = self.active.as_mut().ok_or(AuctionError::NoActiveAuction)?;
        let auction = &mut active.auction;
        if !auction.is_mutable() {
            return Err(AuctionError::AuctionNotMutable);
        }
        if auction.leader().is_player() {
            return Err(AuctionError::AlreadyLeading);
        }
        let minimum = auction.min_next_bid();
        // The minimum saturates, so a bid must also beat the standing one
        if amount < minimum || (auction.has_bids() && amount <= auction.current_bid()) {
            return Err(AuctionError::BidTooLow {
                minimum,
                offered: amount,
            });
        }
        let available = wallet.balance();
        if available < amount {
            return Err(AuctionError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        auction.set_leader(Leader::Player, amount);
        let tick = self.current_tick;
        self.event_log.log(Event::BidPlaced {
            tick,
            auction_id: auction.id().to_string(),
            bidder: Leader::Player.as_str().to_string(),
            amount,
        });
        if let Some(transition) = phase::register_bid(auction, &self.config.phase) {
            log_transition(&mut self.event_log, tick, auction.id(), transition);
        }
        Ok(())
    }

    /// Invoke a tactic against the active auction
    pub fn use_tactic(
        &mut self,
        tactic: Tactic,
        wallet: &dyn Wallet,
    ) -> Result<TacticRecord, AuctionError> {
        let active = self.active.as_mut().ok_or(AuctionError::NoActiveAuction)?;
        let leader_before = active.auction.leader().clone();

        let record = tactics::invoke(
            tactic,
            &mut active.auction,
            &mut active.tactics,
            &self.config.tactics,
            &self.config.phase,
            wallet.balance(),
            &mut self.rng,
        )?;

        let tick = self.current_tick;
        let auction = &active.auction;
        let auction_id = auction.id().to_string();

        if let Some(amount) = record.player_bid {
            self.event_log.log(Event::BidPlaced {
                tick,
                auction_id: auction_id.clone(),
                bidder: Leader::Player.as_str().to_string(),
                amount,
            });
        }
        if let Leader::Npc(id) = auction.leader() {
            if *auction.leader() != leader_before || record.player_bid.is_some() {
                self.event_log.log(Event::BidPlaced {
                    tick,
                    auction_id: auction_id.clone(),
                    bidder: id.clone(),
                    amount: auction.current_bid(),
                });
            }
        }
        for reaction in &record.reactions {
            if reaction.outcome == TacticOutcome::Dropped {
                self.event_log.log(Event::BidderDropped {
                    tick,
                    auction_id: auction_id.clone(),
                    bidder_id: reaction.bidder_id.clone(),
                });
            }
        }
        for transition in &record.transitions {
            log_transition(&mut self.event_log, tick, &auction_id, *transition);
        }
        self.event_log.log(Event::TacticUsed {
            tick,
            auction_id,
            tactic,
            countered: record.countered(),
            dropped: record.dropped(),
            sniped: record.sniped(),
        });

        Ok(record)
    }

    /// Walk away from the active auction. Always a loss.
    pub fn leave_auction(&mut self, collab: &mut Collaborators) -> Result<HistoryRecord, AuctionError> {
        let active = self.active.as_mut().ok_or(AuctionError::NoActiveAuction)?;
        let auction = &mut active.auction;
        if !auction.is_mutable() {
            return Err(AuctionError::AuctionNotMutable);
        }

        let from = auction.phase();
        phase::close(auction, CloseReason::PlayerLeft);
        log_transition(
            &mut self.event_log,
            self.current_tick,
            auction.id(),
            (from, AuctionPhase::Closed),
        );

        self.finish(collab).ok_or(AuctionError::NoActiveAuction)
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one tick
    ///
    /// With no active auction this only advances time.
    pub fn tick(&mut self, collab: &mut Collaborators) -> TickResult {
        let tick = self.current_tick;
        let mut result = TickResult {
            tick,
            signal: PhaseSignal::Idle,
            round: None,
            lot_events: Vec::new(),
            closed: None,
        };

        if let Some(active) = self.active.as_mut() {
            let auction = &mut active.auction;
            let phase_before = auction.phase();
            result.signal = phase::tick(auction, &self.config.phase);

            match result.signal {
                PhaseSignal::RoundDue => {
                    // STEP 2a: round-keyed lot events
                    let reports = fire_round(auction, collab, &mut self.rng);
                    log_lot_reports(&mut self.event_log, tick, auction.id(), &reports);

                    // STEP 2b: NPC response round
                    let summary = phase::run_npc_round(auction, &self.config.phase, &mut self.rng);
                    log_round(&mut self.event_log, tick, auction, &summary);

                    result.lot_events = reports;
                    result.round = Some(summary);
                }
                PhaseSignal::Advanced { from, to } => {
                    log_transition(&mut self.event_log, tick, auction.id(), (from, to));
                }
                PhaseSignal::Closed { .. } => {
                    log_transition(
                        &mut self.event_log,
                        tick,
                        auction.id(),
                        (phase_before, AuctionPhase::Closed),
                    );
                }
                PhaseSignal::Idle | PhaseSignal::Running => {}
            }
        }

        // STEP 3: settle and archive
        let closed = self
            .active
            .as_ref()
            .map_or(false, |a| !a.auction.is_mutable());
        if closed {
            result.closed = self.finish(collab);
        }

        // STEP 4: advance time
        self.current_tick += 1;
        result
    }

    /// Settle the closed active auction and archive it
    fn finish(&mut self, collab: &mut Collaborators) -> Option<HistoryRecord> {
        let mut active = self.active.take()?;
        let tick = self.current_tick;
        let outcome = settle(&mut active.auction, collab, &mut self.rng);

        let auction = &active.auction;
        log_lot_reports(&mut self.event_log, tick, auction.id(), &outcome.lot_reports);
        if outcome.discarded_effects > 0 {
            self.event_log.log(Event::LotEffectsDiscarded {
                tick,
                auction_id: auction.id().to_string(),
                count: outcome.discarded_effects,
            });
        }

        let record = history_record(&active, &outcome, tick);
        self.event_log.log(Event::AuctionClosed {
            tick,
            auction_id: record.auction_id.clone(),
            status: record.status,
            reason: record.close_reason.unwrap_or(CloseReason::Hammer),
            winner: record.winner.clone(),
            winning_bid: record.winning_bid,
        });
        if outcome.status == AuctionStatus::Won {
            self.event_log.log(Event::Settled {
                tick,
                auction_id: record.auction_id.clone(),
                amount_paid: outcome.amount_paid,
                items_transferred: outcome.items_transferred.len(),
            });
        }

        self.archive(record.clone());
        Some(record)
    }

    fn archive(&mut self, record: HistoryRecord) {
        while self.history.len() >= self.config.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }

    // ========================================================================
    // Checkpoint Support
    // ========================================================================

    pub(crate) fn restore(
        config: AuctionHouseConfig,
        catalog: impl LocationCatalog + 'static,
        rng_state: u64,
        current_tick: usize,
        board: Vec<Auction>,
        active: Option<ActiveAuction>,
        history: Vec<HistoryRecord>,
    ) -> Result<Self, AuctionError> {
        let mut house = Self::new(config, catalog)?;
        house.rng = RngManager::new(rng_state);
        house.current_tick = current_tick;
        house.board = board;
        house.active = active;
        house.history = history.into_iter().collect();
        Ok(house)
    }

    pub(crate) fn active_state(&self) -> Option<&ActiveAuction> {
        self.active.as_ref()
    }
}

// ============================================================================
// Event Logging Helpers
// ============================================================================

fn log_transition(log: &mut EventLog, tick: usize, auction_id: &str, transition: Transition) {
    let (from, to) = transition;
    log.log(Event::PhaseChanged {
        tick,
        auction_id: auction_id.to_string(),
        from,
        to,
    });
}

fn log_lot_reports(log: &mut EventLog, tick: usize, auction_id: &str, reports: &[LotEventReport]) {
    for report in reports {
        if report.triggered_now {
            log.log(Event::LotEventTriggered {
                tick,
                auction_id: auction_id.to_string(),
                event_id: report.event_id.clone(),
                kind: report.kind.clone(),
            });
        }
        for key in &report.applied {
            log.log(Event::LotEffectApplied {
                tick,
                auction_id: auction_id.to_string(),
                event_id: report.event_id.clone(),
                result_key: key.clone(),
            });
        }
    }
}

fn log_round(log: &mut EventLog, tick: usize, auction: &Auction, summary: &RoundSummary) {
    let auction_id = auction.id();
    for bidder_id in &summary.outcome.dropped {
        log.log(Event::BidderDropped {
            tick,
            auction_id: auction_id.to_string(),
            bidder_id: bidder_id.clone(),
        });
    }
    if let Some((bidder, amount)) = &summary.outcome.winner {
        log.log(Event::BidPlaced {
            tick,
            auction_id: auction_id.to_string(),
            bidder: bidder.clone(),
            amount: *amount,
        });
    }
    log.log(Event::RoundResolved {
        tick,
        auction_id: auction_id.to_string(),
        round: summary.round,
        raises: summary.outcome.raises.len(),
        current_bid: auction.current_bid(),
    });
    if let Some(transition) = summary.transition {
        log_transition(log, tick, auction_id, transition);
    }
}

fn history_record(active: &ActiveAuction, outcome: &SettlementOutcome, tick: usize) -> HistoryRecord {
    let auction = &active.auction;
    let winner = match (outcome.status, auction.leader()) {
        (AuctionStatus::Won, _) => Leader::Player.as_str().to_string(),
        (_, Leader::Npc(id)) => id.clone(),
        _ => String::new(),
    };
    HistoryRecord {
        auction_id: auction.id().to_string(),
        location_id: auction.location_id().to_string(),
        location_name: auction.location_name().to_string(),
        status: outcome.status,
        winning_bid: if winner.is_empty() { 0 } else { auction.current_bid() },
        winner,
        entry_fee: auction.entry_fee(),
        rounds: auction.rounds_elapsed(),
        player_bids: auction.player_bid_count(),
        tactics_used: active.tactics.log().len(),
        items_won: outcome.items_transferred.len(),
        items_value: outcome.items_value(),
        hidden_value: auction.hidden_total_value(),
        close_reason: outcome.close_reason,
        closed_at_tick: tick,
    }
}
