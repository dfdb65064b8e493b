//! Core timekeeping for the auction clock

pub mod time;
