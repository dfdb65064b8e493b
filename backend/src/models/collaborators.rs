//! Capability traits for the systems the engine leans on
//!
//! The auction engine never stores cash or items itself. It reaches the
//! player's wallet, inventory, the item generator and the location data
//! through these narrow traits so hosts can plug in their own ledgers.

use crate::models::item::{Item, Rarity};
use crate::models::location::LocationProfile;

/// Player cash ledger
pub trait Wallet {
    fn balance(&self) -> i64;

    /// Remove `amount`. Returns false, changing nothing, if it cannot be covered.
    fn debit(&mut self, amount: i64) -> bool;

    fn credit(&mut self, amount: i64);
}

/// Player item storage
pub trait Inventory {
    fn has_capacity(&self) -> bool;

    /// Store a won item. `origin` tags where it came from (e.g. "auction:suburb").
    fn add(&mut self, item: Item, origin: &str);
}

/// Item factory used by win-time lot effects (extra item, hidden treasure)
pub trait ItemGenerator {
    fn create(&mut self, rarity: Rarity, value_multiplier: f64) -> Item;
}

/// Read-only location data
pub trait LocationCatalog {
    fn get(&self, location_id: &str) -> Option<LocationProfile>;
}

/// Mutable collaborators handed to a tick or settlement
///
/// Bundled so the tick signature stays stable as effects grow.
pub struct Collaborators<'a> {
    pub wallet: &'a mut dyn Wallet,
    pub inventory: &'a mut dyn Inventory,
    pub items: &'a mut dyn ItemGenerator,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        wallet: &'a mut dyn Wallet,
        inventory: &'a mut dyn Inventory,
        items: &'a mut dyn ItemGenerator,
    ) -> Self {
        Self {
            wallet,
            inventory,
            items,
        }
    }
}
