//! Orchestrator - the auction house
//!
//! Ties the phase clock, bidder policy, tactics, lot events and settlement
//! into one tick-driven entry point.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{
    ActiveAuction, AuctionError, AuctionHouse, AuctionHouseConfig, AuctionSnapshot, BidderView,
    HistoryRecord, TickResult,
};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, CheckpointError, StateSnapshot};
