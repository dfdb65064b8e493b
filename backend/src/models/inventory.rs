//! In-memory storage inventory and item generator
//!
//! Default collaborators for hosts without their own storage or item
//! pipeline. The real game swaps these for its warehouse and loot tables.

use crate::models::collaborators::{Inventory, ItemGenerator};
use crate::models::item::{Condition, Item, Rarity};
use serde::{Deserialize, Serialize};

/// An item in storage together with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub item: Item,
    pub origin: String,
}

/// Fixed-capacity item storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageInventory {
    capacity: usize,
    items: Vec<StoredItem>,
}

impl StorageInventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[StoredItem] {
        &self.items
    }

    /// Items stored with the given origin tag
    pub fn from_origin(&self, origin: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|s| s.origin == origin)
            .map(|s| &s.item)
            .collect()
    }
}

impl Inventory for StorageInventory {
    fn has_capacity(&self) -> bool {
        self.items.len() < self.capacity
    }

    fn add(&mut self, item: Item, origin: &str) {
        self.items.push(StoredItem {
            item,
            origin: origin.to_string(),
        });
    }
}

/// Deterministic item generator driven by name tables
///
/// Produces items in Good condition whose base value is
/// `base_value × value_multiplier`. Names cycle through a fixed list.
#[derive(Debug, Clone)]
pub struct TemplateItemGenerator {
    base_value: i64,
    next_id: u64,
}

const FOUND_ITEM_NAMES: [(&str, &str); 8] = [
    ("Vintage Camera", "electronics"),
    ("Silver Candlestick", "decor"),
    ("Signed Baseball", "collectibles"),
    ("Antique Pocket Watch", "jewelry"),
    ("Vinyl Record Crate", "music"),
    ("Cast Iron Skillet", "kitchen"),
    ("Oil Painting", "art"),
    ("Leather Satchel", "fashion"),
];

impl TemplateItemGenerator {
    pub fn new(base_value: i64) -> Self {
        Self {
            base_value: base_value.max(1),
            next_id: 1,
        }
    }
}

impl Default for TemplateItemGenerator {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ItemGenerator for TemplateItemGenerator {
    fn create(&mut self, rarity: Rarity, value_multiplier: f64) -> Item {
        let (name, category) =
            FOUND_ITEM_NAMES[(self.next_id as usize - 1) % FOUND_ITEM_NAMES.len()];
        let base = (self.base_value as f64 * value_multiplier.max(0.0)).round() as i64;
        let item = Item::new(
            format!("gen_{:06}", self.next_id),
            name,
            category,
            rarity,
            Condition::Good,
            base,
        );
        self.next_id += 1;
        item
    }
}
