//! Checkpoint - Save/Load Auction House State
//!
//! Serializes the complete house state to JSON so a host can persist it
//! between sessions and resume mid-auction.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restoring and ticking reproduces the same auction as
//!   never having stopped (the RNG state is captured)
//! - **Single active auction**: a snapshot never holds more than one
//! - **Config Matching**: state can only be loaded with the config it was
//!   saved under

use crate::models::auction::{Auction, AuctionStatus};
use crate::models::collaborators::LocationCatalog;
use crate::orchestrator::engine::{ActiveAuction, AuctionError, AuctionHouse, AuctionHouseConfig, HistoryRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from saving or restoring a checkpoint
#[derive(Debug, Error, PartialEq)]
pub enum CheckpointError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config mismatch: checkpoint {expected}, supplied {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Config rejected: {0}")]
    Config(#[from] AuctionError),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete auction house state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Current tick position
    pub current_tick: usize,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// Available auctions, oldest first
    pub board: Vec<Auction>,

    /// The active auction with its tactics state
    pub active: Option<ActiveAuction>,

    /// Closed auctions, oldest first
    pub history: Vec<HistoryRecord>,

    /// SHA256 hash of the config (for validation)
    pub config_hash: String,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, CheckpointError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| CheckpointError::Serialization(format!("Config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| CheckpointError::Serialization(format!("Config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - board entries are `Available`, the active auction is `Active`
/// - auction ids are unique across board and active auction
/// - history fits the configured capacity and holds only won or lost auctions
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    config: &AuctionHouseConfig,
) -> Result<(), CheckpointError> {
    let mut seen = HashSet::new();

    for auction in &snapshot.board {
        if auction.status() != AuctionStatus::Available {
            return Err(CheckpointError::InvalidState(format!(
                "Board auction {} has status {:?}",
                auction.id(),
                auction.status()
            )));
        }
        if !seen.insert(auction.id()) {
            return Err(CheckpointError::InvalidState(format!(
                "Duplicate auction {} on board",
                auction.id()
            )));
        }
    }

    if let Some(active) = &snapshot.active {
        let auction = &active.auction;
        if !auction.is_mutable() {
            return Err(CheckpointError::InvalidState(format!(
                "Active auction {} is not mutable",
                auction.id()
            )));
        }
        if !seen.insert(auction.id()) {
            return Err(CheckpointError::InvalidState(format!(
                "Active auction {} also listed on board",
                auction.id()
            )));
        }
    }

    if snapshot.history.len() > config.history_capacity {
        return Err(CheckpointError::InvalidState(format!(
            "History holds {} records, capacity is {}",
            snapshot.history.len(),
            config.history_capacity
        )));
    }
    if let Some(record) = snapshot.history.iter().find(|r| !r.status.is_terminal()) {
        return Err(CheckpointError::InvalidState(format!(
            "History record {} has status {:?}",
            record.auction_id, record.status
        )));
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl AuctionHouse {
    /// Capture the full house state
    pub fn snapshot_state(&self) -> Result<StateSnapshot, CheckpointError> {
        Ok(StateSnapshot {
            current_tick: self.current_tick(),
            rng_state: self.rng_state(),
            board: self.board().to_vec(),
            active: self.active_state().cloned(),
            history: self.history().iter().cloned().collect(),
            config_hash: compute_config_hash(self.config())?,
        })
    }

    /// Serialize the full house state to JSON
    pub fn save_state(&self) -> Result<String, CheckpointError> {
        let snapshot = self.snapshot_state()?;
        serde_json::to_string(&snapshot)
            .map_err(|e| CheckpointError::Serialization(format!("State serialization failed: {}", e)))
    }

    /// Restore a house from `save_state` output
    ///
    /// Fails if `config` differs from the one the state was saved under.
    pub fn load_state(
        config: AuctionHouseConfig,
        catalog: impl LocationCatalog + 'static,
        state_json: &str,
    ) -> Result<Self, CheckpointError> {
        let snapshot: StateSnapshot = serde_json::from_str(state_json)
            .map_err(|e| CheckpointError::Serialization(format!("State parse failed: {}", e)))?;

        let actual = compute_config_hash(&config)?;
        if actual != snapshot.config_hash {
            return Err(CheckpointError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual,
            });
        }
        validate_snapshot(&snapshot, &config)?;

        log::info!(
            "restored auction house at tick {} ({} listed, active: {})",
            snapshot.current_tick,
            snapshot.board.len(),
            snapshot.active.is_some()
        );

        Ok(AuctionHouse::restore(
            config,
            catalog,
            snapshot.rng_state,
            snapshot.current_tick,
            snapshot.board,
            snapshot.active,
            snapshot.history,
        )?)
    }
}
