//! Win-time payout
//!
//! Settles a closed auction against the player's wallet and inventory.
//!
//! # Settlement Flow
//!
//! ```text
//! closed auction ──► Lost? ──► discard deferred lot effects ──► done
//!                     │
//!                     Won ──► check balance + capacity ──fail──► Lost (close reason set)
//!                               │
//!                               ok ──► debit winning bid
//!                                      ──► OnWin events + deferred sweep
//!                                      ──► transfer items to inventory
//! ```
//!
//! # Critical Invariants
//!
//! - **Validate first**: nothing is debited or transferred unless both the
//!   balance and the inventory check pass
//! - **Conservation**: on a win the wallet falls by exactly the winning bid
//!   (plus any lot-event credits), on a loss it is untouched
//! - **Deferred effects**: item mutations land only on a successful win

use crate::events::handler::{discard_deferred, resolve_win, LotEventReport};
use crate::models::auction::{Auction, AuctionStatus, CloseReason};
use crate::models::collaborators::{Collaborators, Inventory, Wallet};
use crate::models::item::Item;
use crate::rng::RngManager;
use thiserror::Error;

/// Errors that turn a won auction into a loss at settlement
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettlementError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Inventory is full")]
    InventoryFull,
}

impl SettlementError {
    pub fn close_reason(&self) -> CloseReason {
        match self {
            SettlementError::InsufficientFunds { .. } => CloseReason::InsufficientFunds,
            SettlementError::InventoryFull => CloseReason::InventoryFull,
        }
    }
}

/// Result of settling one auction
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    pub status: AuctionStatus,
    pub close_reason: Option<CloseReason>,
    pub amount_paid: i64,
    /// Items handed to the inventory, after lot effects
    pub items_transferred: Vec<Item>,
    pub lot_reports: Vec<LotEventReport>,
    pub discarded_effects: usize,
    /// Present when a win was downgraded to a loss
    pub error: Option<SettlementError>,
}

impl SettlementOutcome {
    pub fn items_value(&self) -> i64 {
        crate::models::item::lot_value(&self.items_transferred)
    }
}

/// Check the winning bid can be paid and the lot stored
///
/// Returns the amount due. No state changes.
pub fn check_payout(
    auction: &Auction,
    wallet: &dyn Wallet,
    inventory: &dyn Inventory,
) -> Result<i64, SettlementError> {
    let amount = auction.current_bid();
    let available = wallet.balance();
    if available < amount {
        return Err(SettlementError::InsufficientFunds {
            required: amount,
            available,
        });
    }
    if !inventory.has_capacity() {
        return Err(SettlementError::InventoryFull);
    }
    Ok(amount)
}

/// Settle a closed auction
///
/// A `Lost` auction only discards its held lot effects. A `Won` auction is
/// paid for, its win-time lot events resolve and its items move to the
/// inventory tagged `auction:{location_id}`. If the win cannot be paid or
/// stored, the auction is marked `Lost` with the matching close reason.
pub fn settle(
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
) -> SettlementOutcome {
    if auction.status != AuctionStatus::Won {
        return lost(auction, None);
    }

    let amount = match check_payout(auction, &*collab.wallet, &*collab.inventory) {
        Ok(amount) => amount,
        Err(err) => return lost(auction, Some(err)),
    };
    if !collab.wallet.debit(amount) {
        let available = collab.wallet.balance();
        return lost(
            auction,
            Some(SettlementError::InsufficientFunds {
                required: amount,
                available,
            }),
        );
    }

    let lot_reports = resolve_win(auction, collab, rng);

    let origin = format!("auction:{}", auction.location_id);
    let items_transferred: Vec<Item> = auction.items.drain(..).collect();
    for item in &items_transferred {
        collab.inventory.add(item.clone(), &origin);
    }

    log::info!(
        "settled auction {}: paid {}, {} item(s) to inventory",
        auction.id,
        amount,
        items_transferred.len()
    );

    SettlementOutcome {
        status: AuctionStatus::Won,
        close_reason: auction.close_reason,
        amount_paid: amount,
        items_transferred,
        lot_reports,
        discarded_effects: 0,
        error: None,
    }
}

fn lost(auction: &mut Auction, error: Option<SettlementError>) -> SettlementOutcome {
    if let Some(err) = &error {
        log::info!("auction {} win downgraded to loss: {}", auction.id, err);
        auction.status = AuctionStatus::Lost;
        auction.close_reason = Some(err.close_reason());
    }
    let discarded_effects = discard_deferred(auction);
    SettlementOutcome {
        status: AuctionStatus::Lost,
        close_reason: auction.close_reason,
        amount_paid: 0,
        items_transferred: Vec::new(),
        lot_reports: Vec::new(),
        discarded_effects,
        error,
    }
}
