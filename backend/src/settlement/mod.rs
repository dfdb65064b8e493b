//! Settlement Module
//!
//! Turns a closed auction into money and items:
//! - Won: debit the winning bid, resolve win-time lot events, hand the
//!   items to the inventory
//! - Lost: discard held lot effects, nothing moves
//!
//! # Critical Invariants
//!
//! 1. **Validate before mutate**: balance and capacity are checked before
//!    any debit or transfer
//! 2. **Exactly once**: each auction is settled once, when it closes
//! 3. **Failure is a loss, never a panic**

pub mod payout;

// Re-export public API
pub use payout::{check_payout, settle, SettlementError, SettlementOutcome};
