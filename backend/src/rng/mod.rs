//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, reproducible auctions.
//! All randomness in the engine MUST go through this module.

mod xorshift;

pub use xorshift::RngManager;
