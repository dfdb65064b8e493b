//! Lot event triggering and effect application
//!
//! This module handles:
//! - Firing reveal, round-keyed and win-time lot events
//! - Applying immediate effects to the roster, the clock and the wallet
//! - Holding item-mutating effects back until the player has won
//! - Discarding held effects when the player loses
//!
//! Events are scanned in list order, and effects inside an event apply in
//! list order, so simultaneous events always resolve the same way.

use crate::events::types::{EventTiming, LotEffect};
use crate::factory::rival_name;
use crate::models::auction::Auction;
use crate::models::bidder::{Bidder, Personality};
use crate::models::collaborators::Collaborators;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Late arrivals bring a budget of this fraction range of the lot value
/// (before the location tier factor)
const LATE_BIDDER_BUDGET_RANGE: (f64, f64) = (0.9, 1.3);

/// What happened to one lot event during a trigger or sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotEventReport {
    pub event_id: String,
    pub kind: String,
    /// Triggered by this call (false for effects landing in the win sweep)
    pub triggered_now: bool,
    /// Result keys for the effects applied by this call, in order
    pub applied: Vec<String>,
}

/// Fire every `OnReveal` event. Called once when the auction activates.
pub fn fire_reveal(
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
) -> Vec<LotEventReport> {
    fire_matching(auction, collab, rng, |timing, _| {
        matches!(timing, EventTiming::OnReveal)
    })
}

/// Fire every `OnBid` event whose round threshold has been reached.
/// Called at the start of each NPC round, after `rounds_elapsed` moved.
pub fn fire_round(
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
) -> Vec<LotEventReport> {
    fire_matching(auction, collab, rng, |timing, rounds| timing.due_at_round(rounds))
}

/// Win-time resolution: fire `OnWin` events, then apply every triggered
/// deferred effect still pending, in list order.
pub fn resolve_win(
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
) -> Vec<LotEventReport> {
    let mut reports = fire_matching(auction, collab, rng, |timing, _| {
        matches!(timing, EventTiming::OnWin)
    });

    for idx in 0..auction.lot_events.len() {
        if !auction.lot_events[idx].triggered {
            continue;
        }
        let applied = apply_effects(auction, idx, collab, rng, true);
        if applied.is_empty() {
            continue;
        }
        let event = &auction.lot_events[idx];
        match reports.iter_mut().find(|r| r.event_id == event.id) {
            Some(report) => report.applied.extend(applied),
            None => reports.push(LotEventReport {
                event_id: event.id.clone(),
                kind: event.kind.clone(),
                triggered_now: false,
                applied,
            }),
        }
    }

    reports
}

/// Drop every pending deferred effect unapplied. Returns how many.
pub fn discard_deferred(auction: &mut Auction) -> usize {
    let mut count = 0;
    for event in auction.lot_events.iter_mut() {
        for scheduled in event.effects.iter_mut().filter(|e| e.is_pending()) {
            scheduled.discarded = true;
            count += 1;
        }
    }
    count
}

fn fire_matching(
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
    due: impl Fn(&EventTiming, u32) -> bool,
) -> Vec<LotEventReport> {
    let mut reports = Vec::new();
    for idx in 0..auction.lot_events.len() {
        let event = &auction.lot_events[idx];
        if event.triggered || !due(&event.timing, auction.rounds_elapsed) {
            continue;
        }
        auction.lot_events[idx].triggered = true;
        let applied = apply_effects(auction, idx, collab, rng, false);

        let event = &auction.lot_events[idx];
        log::debug!(
            "lot event {} ({}) fired in auction {}",
            event.id,
            event.kind,
            auction.id
        );
        reports.push(LotEventReport {
            event_id: event.id.clone(),
            kind: event.kind.clone(),
            triggered_now: true,
            applied,
        });
    }
    reports
}

/// Apply the immediate (`deferred == false`) or the pending deferred effects
/// of one event
fn apply_effects(
    auction: &mut Auction,
    event_idx: usize,
    collab: &mut Collaborators,
    rng: &mut RngManager,
    deferred: bool,
) -> Vec<String> {
    let mut applied = Vec::new();
    for effect_idx in 0..auction.lot_events[event_idx].effects.len() {
        let scheduled = &auction.lot_events[event_idx].effects[effect_idx];
        let eligible = if deferred {
            scheduled.is_pending()
        } else {
            !scheduled.deferred && !scheduled.applied
        };
        if !eligible {
            continue;
        }
        let effect = scheduled.effect.clone();
        let key = apply_effect(&effect, auction, collab, rng);

        let event = &mut auction.lot_events[event_idx];
        event.effects[effect_idx].applied = true;
        event.result_keys.push(key.to_string());
        applied.push(key.to_string());
    }
    applied
}

/// Apply a single effect. Returns its result key.
pub fn apply_effect(
    effect: &LotEffect,
    auction: &mut Auction,
    collab: &mut Collaborators,
    rng: &mut RngManager,
) -> &'static str {
    match effect {
        LotEffect::NpcDropout { count } => {
            // The standing leader is never removed
            let mut candidates = auction.challenger_indices();
            for _ in 0..*count {
                if candidates.is_empty() {
                    break;
                }
                let idx = candidates.swap_remove(rng.index(candidates.len()));
                auction.bidders[idx].drop_out();
            }
        }

        LotEffect::NpcFrenzy { budget_multiplier } => {
            for bidder in auction.bidders.iter_mut().filter(|b| b.is_active()) {
                bidder.boost_budget(*budget_multiplier);
            }
        }

        LotEffect::IncrementMultiplier { multiplier } => {
            let scaled = (auction.bid_increment as f64 * multiplier.max(0.0)).round() as i64;
            auction.bid_increment = scaled.max(1);
        }

        LotEffect::EntryFeeRefund { fraction } => {
            let refund = (auction.entry_fee as f64 * fraction.clamp(0.0, 1.0)).round() as i64;
            if refund > 0 {
                collab.wallet.credit(refund);
            }
        }

        LotEffect::LateBidder => {
            let (low, high) = LATE_BIDDER_BUDGET_RANGE;
            let budget = auction.hidden_total_value as f64
                * auction.budget_tier_factor
                * rng.uniform(low, high);
            let personality = Personality::ALL[rng.index(Personality::ALL.len())];
            let name = rival_name(rng);
            let id = auction.mint_local_id("late");
            auction
                .bidders
                .push(Bidder::new(id, name, personality, budget.round() as i64).arriving_late());
        }

        LotEffect::RevealBudgets { count } => {
            let mut hidden: Vec<usize> = auction
                .bidders
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_active() && !b.is_budget_revealed())
                .map(|(idx, _)| idx)
                .collect();
            for _ in 0..*count {
                if hidden.is_empty() {
                    break;
                }
                let idx = hidden.swap_remove(rng.index(hidden.len()));
                auction.bidders[idx].reveal_budget();
            }
        }

        LotEffect::BonusCash { amount } => {
            if *amount > 0 {
                collab.wallet.credit(*amount);
            }
        }

        LotEffect::ExtraItem {
            rarity,
            value_multiplier,
        } => {
            let item = collab.items.create(*rarity, *value_multiplier);
            auction.items.push(item);
        }

        LotEffect::HiddenTreasure {
            rarity,
            value_multiplier,
        } => {
            let mut item = collab.items.create(*rarity, *value_multiplier);
            item.hidden_bonus = true;
            auction.items.push(item);
        }

        LotEffect::ConditionShift { steps } => {
            if !auction.items.is_empty() {
                let idx = rng.index(auction.items.len());
                let item = &mut auction.items[idx];
                item.condition = item.condition.shifted(*steps);
            }
        }

        LotEffect::RarityUpgrade => {
            if !auction.items.is_empty() {
                let idx = rng.index(auction.items.len());
                let item = &mut auction.items[idx];
                item.rarity = item.rarity.upgraded();
            }
        }
    }

    effect.result_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::LotEvent;
    use crate::models::auction::{AuctionDraft, AuctionStatus, Leader};
    use crate::models::inventory::{StorageInventory, TemplateItemGenerator};
    use crate::models::item::{Condition, Item, Rarity};
    use crate::models::wallet::PlayerWallet;
    use crate::models::Wallet;

    fn auction_with(events: Vec<LotEvent>) -> Auction {
        let mut auction = Auction::from_draft(AuctionDraft {
            id: "auc_t".to_string(),
            location_id: "loc".to_string(),
            location_name: "Loc".to_string(),
            entry_fee: 100,
            budget_tier_factor: 1.0,
            items: vec![Item::new("i1", "Lamp", "decor", Rarity::Common, Condition::Good, 200)],
            opening_bid: 20,
            bid_increment: 10,
            bidders: vec![
                Bidder::new("npc_1", "A", Personality::Cautious, 300),
                Bidder::new("npc_2", "B", Personality::Timid, 300),
            ],
            lot_events: events,
        });
        auction.status = AuctionStatus::Active;
        auction
    }

    #[test]
    fn test_deferred_effects_wait_for_win() {
        let mut auction = auction_with(vec![LotEvent::new(
            "e1",
            "hidden_compartment",
            EventTiming::OnReveal,
            vec![LotEffect::HiddenTreasure {
                rarity: Rarity::Rare,
                value_multiplier: 2.0,
            }],
        )]);
        let mut wallet = PlayerWallet::new(1_000);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
        let mut rng = RngManager::new(1);

        let reports = fire_reveal(&mut auction, &mut collab, &mut rng);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].applied.is_empty());
        assert_eq!(auction.items().len(), 1);
        assert_eq!(auction.pending_deferred_effects(), 1);

        let reports = resolve_win(&mut auction, &mut collab, &mut rng);
        assert_eq!(reports[0].applied, vec!["lot_event.hidden_treasure".to_string()]);
        assert!(!reports[0].triggered_now);
        assert_eq!(auction.items().len(), 2);
        assert!(auction.items()[1].hidden_bonus);
        assert_eq!(auction.pending_deferred_effects(), 0);
    }

    #[test]
    fn test_discard_marks_pending_effects() {
        let mut auction = auction_with(vec![LotEvent::new(
            "e1",
            "water_damage",
            EventTiming::OnBid { round_threshold: 1 },
            vec![LotEffect::ConditionShift { steps: -1 }],
        )]);
        let mut wallet = PlayerWallet::new(0);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
        let mut rng = RngManager::new(1);

        assert!(fire_round(&mut auction, &mut collab, &mut rng).is_empty());
        auction.rounds_elapsed = 1;
        assert_eq!(fire_round(&mut auction, &mut collab, &mut rng).len(), 1);
        // Already triggered; does not fire twice
        assert!(fire_round(&mut auction, &mut collab, &mut rng).is_empty());

        assert_eq!(discard_deferred(&mut auction), 1);
        assert_eq!(auction.pending_deferred_effects(), 0);
        assert_eq!(auction.items()[0].condition, Condition::Good);
    }

    #[test]
    fn test_dropout_spares_leader() {
        let mut auction = auction_with(Vec::new());
        auction.set_leader(Leader::Npc("npc_1".to_string()), 40);
        let mut wallet = PlayerWallet::new(0);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
        let mut rng = RngManager::new(3);

        apply_effect(
            &LotEffect::NpcDropout { count: 2 },
            &mut auction,
            &mut collab,
            &mut rng,
        );
        assert!(auction.bidder("npc_1").unwrap().is_active());
        assert!(auction.bidder("npc_2").unwrap().is_dropped_out());
    }

    #[test]
    fn test_cash_effects_credit_wallet() {
        let mut auction = auction_with(Vec::new());
        let mut wallet = PlayerWallet::new(0);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut rng = RngManager::new(3);
        {
            let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
            apply_effect(
                &LotEffect::EntryFeeRefund { fraction: 0.5 },
                &mut auction,
                &mut collab,
                &mut rng,
            );
            apply_effect(
                &LotEffect::BonusCash { amount: 25 },
                &mut auction,
                &mut collab,
                &mut rng,
            );
        }
        assert_eq!(wallet.balance(), 75);
    }

    #[test]
    fn test_late_bidder_budget_tracks_lot_value() {
        let mut auction = auction_with(Vec::new());
        let mut wallet = PlayerWallet::new(0);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
        let mut rng = RngManager::new(11);

        apply_effect(&LotEffect::LateBidder, &mut auction, &mut collab, &mut rng);
        let late = auction.bidders().last().unwrap();
        assert!(late.is_late_arrival());
        assert_eq!(late.id(), "auc_t_late_1");
        assert!((180..=260).contains(&late.max_budget()));
    }

    #[test]
    fn test_increment_multiplier_never_below_one() {
        let mut auction = auction_with(Vec::new());
        let mut wallet = PlayerWallet::new(0);
        let mut inventory = StorageInventory::new(10);
        let mut items = TemplateItemGenerator::default();
        let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut items);
        let mut rng = RngManager::new(1);

        apply_effect(
            &LotEffect::IncrementMultiplier { multiplier: 2.0 },
            &mut auction,
            &mut collab,
            &mut rng,
        );
        assert_eq!(auction.bid_increment(), 20);
        apply_effect(
            &LotEffect::IncrementMultiplier { multiplier: 0.0 },
            &mut auction,
            &mut collab,
            &mut rng,
        );
        assert_eq!(auction.bid_increment(), 1);
    }
}
