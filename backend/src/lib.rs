//! Storage Auction Engine Core - Rust Engine
//!
//! Tick-driven storage-unit auctions between one player and a roster of
//! computer-controlled rivals, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Round/phase countdown timing
//! - **models**: Domain types (Auction, Bidder, Item, Location, Event) and
//!   the collaborator traits (Wallet, Inventory, ItemGenerator, LocationCatalog)
//! - **policy**: NPC bidder decisions driven by personality profiles
//! - **factory**: Auction creation from a location profile and an item batch
//! - **phase**: The auctioneer's phase clock and NPC response rounds
//! - **tactics**: Player tactics (intimidate, bluff, sniper bid)
//! - **events**: Lot events rolled at creation and fired during the auction
//! - **settlement**: Win/loss settlement against wallet and inventory
//! - **orchestrator**: The auction house tick loop and checkpointing
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (whole currency units)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. At most one auction is active at a time

// Module declarations
pub mod core;
pub mod events;
pub mod factory;
pub mod models;
pub mod orchestrator;
pub mod phase;
pub mod policy;
pub mod rng;
pub mod settlement;
pub mod tactics;

// Re-exports for convenience
pub use crate::core::time::RoundTimer;
pub use events::{EventTiming, LotEffect, LotEvent};
pub use models::{
    auction::{Auction, AuctionDraft, AuctionPhase, AuctionStatus, CloseReason, Leader},
    bidder::{Bidder, Personality},
    collaborators::{Collaborators, Inventory, ItemGenerator, LocationCatalog, Wallet},
    event::{Event, EventLog},
    inventory::{StorageInventory, StoredItem, TemplateItemGenerator},
    item::{Condition, Item, Rarity},
    location::{LocationProfile, StaticLocationCatalog},
    wallet::{PlayerWallet, WalletError},
};
pub use orchestrator::{
    AuctionError, AuctionHouse, AuctionHouseConfig, AuctionSnapshot, CheckpointError, HistoryRecord,
    TickResult,
};
pub use phase::PhaseConfig;
pub use policy::{BidDecision, PersonalityProfile};
pub use rng::RngManager;
pub use settlement::{SettlementError, SettlementOutcome};
pub use tactics::{Tactic, TacticOutcome, TacticRecord, TacticsConfig, TacticsState};
