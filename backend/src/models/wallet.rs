//! In-memory player wallet
//!
//! A straightforward `Wallet` implementation for hosts that do not bring
//! their own ledger, and for tests. Tracks running debit/credit totals so
//! settlement conservation can be checked after the fact.
//!
//! CRITICAL: All money values are i64 whole currency units, never negative.

use crate::models::collaborators::Wallet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from explicit wallet operations
#[derive(Debug, Error, PartialEq)]
pub enum WalletError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Amount must be positive, got {0}")]
    NonPositive(i64),
}

/// Player cash balance
///
/// # Example
/// ```
/// use auction_engine_core_rs::{PlayerWallet, Wallet};
///
/// let mut wallet = PlayerWallet::new(1_000);
/// assert!(wallet.debit(300));
/// assert!(!wallet.debit(5_000)); // refused, balance untouched
/// assert_eq!(wallet.balance(), 700);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerWallet {
    balance: i64,
    total_debited: i64,
    total_credited: i64,
}

impl PlayerWallet {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            balance: opening_balance.max(0),
            total_debited: 0,
            total_credited: 0,
        }
    }

    /// Debit with a reason on failure
    pub fn try_debit(&mut self, amount: i64) -> Result<(), WalletError> {
        if amount <= 0 {
            return Err(WalletError::NonPositive(amount));
        }
        if amount > self.balance {
            return Err(WalletError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.total_debited += amount;
        Ok(())
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    pub fn total_debited(&self) -> i64 {
        self.total_debited
    }

    pub fn total_credited(&self) -> i64 {
        self.total_credited
    }
}

impl Wallet for PlayerWallet {
    fn balance(&self) -> i64 {
        self.balance
    }

    fn debit(&mut self, amount: i64) -> bool {
        self.try_debit(amount).is_ok()
    }

    fn credit(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.balance = self.balance.saturating_add(amount);
        self.total_credited = self.total_credited.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_exceeding_balance_is_refused() {
        let mut wallet = PlayerWallet::new(100);
        assert_eq!(
            wallet.try_debit(150),
            Err(WalletError::InsufficientFunds {
                required: 150,
                available: 100
            })
        );
        assert_eq!(wallet.balance(), 100);
        assert_eq!(wallet.total_debited(), 0);
    }

    #[test]
    fn test_debit_exact_balance() {
        let mut wallet = PlayerWallet::new(100);
        assert!(wallet.debit(100));
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn test_non_positive_amounts() {
        let mut wallet = PlayerWallet::new(100);
        assert_eq!(wallet.try_debit(0), Err(WalletError::NonPositive(0)));
        wallet.credit(-50);
        assert_eq!(wallet.balance(), 100);
        assert_eq!(wallet.total_credited(), 0);
    }

    #[test]
    fn test_totals_track_movements() {
        let mut wallet = PlayerWallet::new(500);
        wallet.debit(120);
        wallet.credit(30);
        assert_eq!(wallet.total_debited(), 120);
        assert_eq!(wallet.total_credited(), 30);
        assert_eq!(wallet.balance(), 410);
    }
}
