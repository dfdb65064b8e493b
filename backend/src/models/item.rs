//! Prize items inside a storage-unit lot
//!
//! Items are produced by an external generator and only handled here: the
//! engine moves them into an auction, lets win-time lot events nudge their
//! rarity or condition, and hands them to the inventory on a win.

use serde::{Deserialize, Serialize};

/// Item rarity tier, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Value multiplier applied on top of an item's base value
    pub fn value_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.6,
            Rarity::Rare => 2.8,
            Rarity::Epic => 5.0,
            Rarity::Legendary => 10.0,
        }
    }

    /// Next tier up; `Legendary` stays `Legendary`
    pub fn upgraded(self) -> Rarity {
        match self {
            Rarity::Common => Rarity::Uncommon,
            Rarity::Uncommon => Rarity::Rare,
            Rarity::Rare => Rarity::Epic,
            Rarity::Epic | Rarity::Legendary => Rarity::Legendary,
        }
    }
}

/// Physical condition of an item, worst first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Broken,
    Poor,
    Fair,
    Good,
    Excellent,
    Mint,
}

impl Condition {
    const LADDER: [Condition; 6] = [
        Condition::Broken,
        Condition::Poor,
        Condition::Fair,
        Condition::Good,
        Condition::Excellent,
        Condition::Mint,
    ];

    pub fn value_multiplier(self) -> f64 {
        match self {
            Condition::Broken => 0.2,
            Condition::Poor => 0.5,
            Condition::Fair => 0.8,
            Condition::Good => 1.0,
            Condition::Excellent => 1.3,
            Condition::Mint => 1.7,
        }
    }

    /// Move `steps` rungs along the condition ladder (negative = damage),
    /// clamped at both ends.
    pub fn shifted(self, steps: i8) -> Condition {
        let current = Self::LADDER
            .iter()
            .position(|c| *c == self)
            .unwrap_or(0) as i64;
        let target = (current + steps as i64).clamp(0, Self::LADDER.len() as i64 - 1);
        Self::LADDER[target as usize]
    }
}

/// A single prize item
///
/// # Example
/// ```
/// use auction_engine_core_rs::{Condition, Item, Rarity};
///
/// let lamp = Item::new("itm_1", "Brass Lamp", "decor", Rarity::Uncommon, Condition::Good, 100);
/// assert_eq!(lamp.market_value(), 160);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub rarity: Rarity,
    pub condition: Condition,
    /// Value of a Common item in Good condition
    pub base_value: i64,
    /// Found by a hidden-treasure lot event rather than listed with the lot
    #[serde(default)]
    pub hidden_bonus: bool,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        rarity: Rarity,
        condition: Condition,
        base_value: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            rarity,
            condition,
            base_value,
            hidden_bonus: false,
        }
    }

    /// Estimated market value (base × rarity × condition), floored at zero
    pub fn market_value(&self) -> i64 {
        let value = self.base_value as f64
            * self.rarity.value_multiplier()
            * self.condition.value_multiplier();
        value.round().max(0.0) as i64
    }
}

/// Sum of market values for a batch of items
pub fn lot_value(items: &[Item]) -> i64 {
    items.iter().map(Item::market_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_upgrade_caps_at_legendary() {
        assert_eq!(Rarity::Common.upgraded(), Rarity::Uncommon);
        assert_eq!(Rarity::Legendary.upgraded(), Rarity::Legendary);
    }

    #[test]
    fn test_condition_shift_clamps() {
        assert_eq!(Condition::Good.shifted(1), Condition::Excellent);
        assert_eq!(Condition::Good.shifted(-2), Condition::Poor);
        assert_eq!(Condition::Poor.shifted(-5), Condition::Broken);
        assert_eq!(Condition::Excellent.shifted(4), Condition::Mint);
    }

    #[test]
    fn test_lot_value_sums_market_values() {
        let items = vec![
            Item::new("a", "Chair", "furniture", Rarity::Common, Condition::Good, 50),
            Item::new("b", "Vase", "decor", Rarity::Rare, Condition::Fair, 100),
        ];
        // 50 + 100 * 2.8 * 0.8
        assert_eq!(lot_value(&items), 50 + 224);
    }
}
