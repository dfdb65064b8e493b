//! Auction factory for deterministic auction creation.
//!
//! Turns a location profile plus a caller-supplied batch of items into an
//! `Available` auction: rival roster, pricing and scheduled lot events. The
//! engine never rolls the items itself; it only prices them.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same profile + same items → same auction
//! 2. **Location-driven economics**: roster size, budgets, entry fee and
//!    event frequency all come from the `LocationProfile`
//! 3. **Luck only helps**: a higher luck modifier trims rival budgets and
//!    favours the good lot events
//!
//! # Example
//!
//! ```
//! use auction_engine_core_rs::factory::build_auction;
//! use auction_engine_core_rs::rng::RngManager;
//! use auction_engine_core_rs::{Condition, Item, LocationCatalog, Rarity, StaticLocationCatalog};
//!
//! let catalog = StaticLocationCatalog::with_default_locations();
//! let profile = catalog.get("roadside_yard").unwrap();
//! let items = vec![Item::new("itm_1", "Toolbox", "tools", Rarity::Common, Condition::Good, 400)];
//!
//! let mut rng = RngManager::new(42);
//! let auction = build_auction(&profile, items, 0.0, &mut rng).unwrap();
//! assert_eq!(auction.hidden_total_value(), 400);
//! assert!(auction.bidders().len() >= 2);
//! ```

use crate::events::catalog;
use crate::models::auction::{Auction, AuctionDraft};
use crate::models::bidder::{Bidder, Personality};
use crate::models::item::{lot_value, Item};
use crate::models::location::LocationProfile;
use crate::policy::PersonalityProfile;
use crate::rng::RngManager;
use thiserror::Error;

/// How much a full luck modifier shaves off every rival budget
pub const LUCK_BUDGET_DISCOUNT: f64 = 0.25;

const RIVAL_NAMES: [&str; 16] = [
    "Dusty Dan",
    "Barb the Haggler",
    "Two-Truck Terry",
    "Marla Finch",
    "Cash-Only Carl",
    "Vintage Vera",
    "Hank Oduya",
    "Pawnshop Pete",
    "Lucille Brandt",
    "Garage Gus",
    "Rosa Delgado",
    "Flip-It Phil",
    "Nadia Kerr",
    "Old Man Abernathy",
    "Tilly Song",
    "Reseller Ray",
];

#[derive(Debug, Error, PartialEq)]
pub enum FactoryError {
    #[error("Cannot list an auction with no items")]
    EmptyLot,
}

/// Pick a display name for a rival
pub fn rival_name(rng: &mut RngManager) -> &'static str {
    RIVAL_NAMES[rng.index(RIVAL_NAMES.len())]
}

/// Budget for a starting-roster rival
///
/// `lot value × location tier factor × personality multiplier`, jittered by
/// ±20% and discounted by luck.
pub fn starting_budget(
    hidden_total_value: i64,
    profile: &LocationProfile,
    personality: Personality,
    luck: f64,
    rng: &mut RngManager,
) -> i64 {
    let personality_multiplier = PersonalityProfile::for_personality(personality).budget_multiplier;
    let jitter = rng.uniform(0.8, 1.2);
    let luck_discount = 1.0 - luck.clamp(0.0, 1.0) * LUCK_BUDGET_DISCOUNT;
    let budget = hidden_total_value as f64
        * profile.bidder_budget_tier_factor
        * personality_multiplier
        * jitter
        * luck_discount;
    (budget.round() as i64).max(1)
}

/// Build a new `Available` auction at `profile` for `items`
///
/// `luck` is clamped to [0, 1].
pub fn build_auction(
    profile: &LocationProfile,
    items: Vec<Item>,
    luck: f64,
    rng: &mut RngManager,
) -> Result<Auction, FactoryError> {
    if items.is_empty() {
        return Err(FactoryError::EmptyLot);
    }
    let luck = luck.clamp(0.0, 1.0);

    let id = format!(
        "auc_{}",
        uuid::Builder::from_random_bytes(rng.next_bytes16())
            .into_uuid()
            .simple()
    );

    let hidden_total_value = lot_value(&items);
    let (opening_bid, bid_increment) = profile.pricing_for(hidden_total_value);
    let bidders = build_roster(profile, hidden_total_value, luck, rng);
    let lot_events = catalog::roll_lot_events(&id, profile, hidden_total_value, luck, rng);

    log::debug!(
        "built auction {} at {}: rivals [{}], {} lot events, value {}",
        id,
        profile.id,
        bidders
            .iter()
            .map(|b| b.personality().tag())
            .collect::<Vec<_>>()
            .join(", "),
        lot_events.len(),
        hidden_total_value
    );

    Ok(Auction::from_draft(AuctionDraft {
        id,
        location_id: profile.id.clone(),
        location_name: profile.name.clone(),
        entry_fee: profile.entry_fee,
        budget_tier_factor: profile.bidder_budget_tier_factor,
        items,
        opening_bid,
        bid_increment,
        bidders,
        lot_events,
    }))
}

fn build_roster(
    profile: &LocationProfile,
    hidden_total_value: i64,
    luck: f64,
    rng: &mut RngManager,
) -> Vec<Bidder> {
    let (min, max) = profile.bidder_count;
    let count = rng.range_inclusive(min.max(1) as i64, max as i64) as usize;

    let mut names: Vec<&str> = RIVAL_NAMES.to_vec();
    (0..count)
        .map(|n| {
            let personality = Personality::ALL[rng.index(Personality::ALL.len())];
            let budget = starting_budget(hidden_total_value, profile, personality, luck, rng);
            let name = if names.is_empty() {
                rival_name(rng)
            } else {
                names.swap_remove(rng.index(names.len()))
            };
            Bidder::new(format!("npc_{}", n + 1), name, personality, budget)
        })
        .collect()
}
