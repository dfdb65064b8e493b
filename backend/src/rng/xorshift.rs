//! xorshift64* random number generator
//!
//! Bidder decisions, tactic outcomes, lot-event selection and roster
//! generation all draw from one `RngManager` owned by the auction house and
//! passed down explicitly. Nothing in the engine reaches for ambient
//! randomness.
//!
//! # Determinism
//!
//! Same seed → same auction. Tests pin a seed and replay exact bidding wars;
//! checkpoints store the generator state so a resumed auction continues the
//! same sequence.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use auction_engine_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let roll = rng.next_f64();
/// assert!((0.0..1.0).contains(&roll));
/// let seat = rng.range(0, 4); // [0, 4)
/// assert!((0..4).contains(&seat));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed (zero is remapped to one)
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Inclusive integer range; returns `min` when the bounds collapse.
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.range(min, max + 1)
    }

    /// Pick an index into a collection of `len` elements.
    ///
    /// # Panics
    /// Panics if `len` is zero
    pub fn index(&mut self, len: usize) -> usize {
        self.range(0, len as i64) as usize
    }

    /// Current state (for checkpointing). `RngManager::new(state)` resumes
    /// the exact sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform f64 in [min, max)
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Bernoulli trial. `p <= 0` never fires, `p >= 1` always fires.
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }

    /// 16 random bytes, used to mint reproducible auction ids.
    pub fn next_bytes16(&mut self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next().to_le_bytes());
        bytes[8..].copy_from_slice(&self.next().to_le_bytes());
        bytes
    }

    /// Weighted pick over `weights`; returns `None` if every weight is zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut target = self.next_f64() * total;
        let mut last_positive = None;
        for (idx, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            last_positive = Some(idx);
            target -= weight;
            if target < 0.0 {
                return Some(idx);
            }
        }

        // Float rounding can leave a sliver of target behind
        last_positive
    }
}
