//! Lot events
//!
//! Random happenings scheduled when an auction is listed: a rival who never
//! shows, water damage, a hidden compartment. `types` holds the data,
//! `catalog` rolls events from weighted templates and `handler` fires them
//! and applies their effects.

pub mod catalog;
pub mod handler;
pub mod types;

pub use handler::{discard_deferred, fire_reveal, fire_round, resolve_win, LotEventReport};
pub use types::{EventTiming, LotEffect, LotEvent, ScheduledEffect};
