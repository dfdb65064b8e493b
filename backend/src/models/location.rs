//! Auction locations
//!
//! A location fixes the economics of every auction held there: the entry
//! fee, how deep the rivals' pockets are relative to the lot, the size of
//! the crowd and how eventful the auctions tend to be.

use crate::models::collaborators::LocationCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static description of an auction venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProfile {
    pub id: String,
    pub name: String,
    /// 1 = starter yard, higher tiers draw richer crowds
    pub tier: u8,
    pub entry_fee: i64,
    /// Rival budget as a multiple of the lot's hidden value; also scales
    /// late-arriving bidders
    pub bidder_budget_tier_factor: f64,
    /// Inclusive (min, max) size of the starting roster
    pub bidder_count: (usize, usize),
    /// Opening bid as a fraction of the hidden lot value
    pub opening_bid_fraction: f64,
    /// Bid increment as a fraction of the hidden lot value
    pub increment_fraction: f64,
    pub min_increment: i64,
    /// Probability that each lot-event slot is filled
    pub event_chance: f64,
    pub max_events: usize,
}

impl LocationProfile {
    /// Opening bid and increment for a lot of the given value
    pub fn pricing_for(&self, lot_value: i64) -> (i64, i64) {
        let opening = (lot_value as f64 * self.opening_bid_fraction).round() as i64;
        let increment = ((lot_value as f64 * self.increment_fraction).round() as i64)
            .max(self.min_increment)
            .max(1);
        (opening.max(1), increment)
    }
}

/// Catalog backed by a fixed list of profiles
#[derive(Debug, Clone, Default)]
pub struct StaticLocationCatalog {
    locations: HashMap<String, LocationProfile>,
}

impl StaticLocationCatalog {
    pub fn new(profiles: Vec<LocationProfile>) -> Self {
        let locations = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self { locations }
    }

    /// The stock venues, from the starter yard up to the estate sale
    pub fn with_default_locations() -> Self {
        Self::new(vec![
            LocationProfile {
                id: "roadside_yard".to_string(),
                name: "Roadside Self-Storage".to_string(),
                tier: 1,
                entry_fee: 50,
                bidder_budget_tier_factor: 0.9,
                bidder_count: (2, 3),
                opening_bid_fraction: 0.08,
                increment_fraction: 0.03,
                min_increment: 5,
                event_chance: 0.35,
                max_events: 2,
            },
            LocationProfile {
                id: "suburban_units".to_string(),
                name: "Suburban Storage Units".to_string(),
                tier: 2,
                entry_fee: 250,
                bidder_budget_tier_factor: 1.1,
                bidder_count: (3, 4),
                opening_bid_fraction: 0.1,
                increment_fraction: 0.04,
                min_increment: 25,
                event_chance: 0.45,
                max_events: 3,
            },
            LocationProfile {
                id: "downtown_vault".to_string(),
                name: "Downtown Climate Vault".to_string(),
                tier: 3,
                entry_fee: 1_500,
                bidder_budget_tier_factor: 1.3,
                bidder_count: (3, 5),
                opening_bid_fraction: 0.12,
                increment_fraction: 0.05,
                min_increment: 100,
                event_chance: 0.55,
                max_events: 3,
            },
            LocationProfile {
                id: "estate_sale".to_string(),
                name: "Hillside Estate Sale".to_string(),
                tier: 4,
                entry_fee: 10_000,
                bidder_budget_tier_factor: 1.6,
                bidder_count: (4, 6),
                opening_bid_fraction: 0.15,
                increment_fraction: 0.05,
                min_increment: 500,
                event_chance: 0.65,
                max_events: 4,
            },
        ])
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.locations.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl LocationCatalog for StaticLocationCatalog {
    fn get(&self, location_id: &str) -> Option<LocationProfile> {
        self.locations.get(location_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookup() {
        let catalog = StaticLocationCatalog::with_default_locations();
        let yard = catalog.get("roadside_yard").unwrap();
        assert_eq!(yard.tier, 1);
        assert!(catalog.get("moon_base").is_none());
        assert_eq!(catalog.ids().len(), 4);
    }

    #[test]
    fn test_pricing_respects_min_increment() {
        let catalog = StaticLocationCatalog::with_default_locations();
        let yard = catalog.get("roadside_yard").unwrap();
        let (opening, increment) = yard.pricing_for(100);
        assert_eq!(opening, 8);
        assert_eq!(increment, 5);
    }
}
