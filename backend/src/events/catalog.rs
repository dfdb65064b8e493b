//! Weighted lot-event templates
//!
//! Each auction gets up to `max_events` lot events. Every slot is filled
//! with probability `event_chance`; a filled slot draws one template, by
//! weight, from those not yet used for this auction.
//!
//! Luck in [0, 1] reweights the draw: favourable templates gain up to
//! double weight, unfavourable ones lose up to half.

use crate::events::types::{EventTiming, LotEffect, LotEvent};
use crate::models::item::Rarity;
use crate::models::location::LocationProfile;
use crate::rng::RngManager;

/// Round-keyed events fire somewhere in this range
const ON_BID_THRESHOLDS: (i64, i64) = (2, 6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Reveal,
    Bid,
    Win,
}

#[derive(Clone, Copy)]
struct Template {
    kind: &'static str,
    slot: Slot,
    favourable: bool,
    weight: f64,
    effects: fn(i64, &mut RngManager) -> Vec<LotEffect>,
}

fn fee_refund(_: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::EntryFeeRefund {
        fraction: rng.uniform(0.25, 0.5),
    }]
}

fn budget_leak(_: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::RevealBudgets {
        count: rng.range_inclusive(1, 2) as usize,
    }]
}

fn no_show(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::NpcDropout { count: 1 }]
}

fn hidden_compartment(_: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::HiddenTreasure {
        rarity: Rarity::Rare,
        value_multiplier: rng.uniform(1.5, 3.0),
    }]
}

fn frenzy(_: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::NpcFrenzy {
        budget_multiplier: rng.uniform(1.15, 1.35),
    }]
}

fn hurry(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::IncrementMultiplier { multiplier: 2.0 }]
}

fn late_arrival(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::LateBidder]
}

fn water_damage(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::ConditionShift { steps: -1 }]
}

fn bonus_box(_: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::ExtraItem {
        rarity: Rarity::Uncommon,
        value_multiplier: rng.uniform(0.8, 1.5),
    }]
}

fn expert_eye(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::RarityUpgrade]
}

fn sponsor_bonus(lot_value: i64, rng: &mut RngManager) -> Vec<LotEffect> {
    let amount = (lot_value as f64 * rng.uniform(0.05, 0.1)).round() as i64;
    vec![LotEffect::BonusCash {
        amount: amount.max(10),
    }]
}

fn restored_piece(_: i64, _: &mut RngManager) -> Vec<LotEffect> {
    vec![LotEffect::ConditionShift { steps: 1 }]
}

const TEMPLATES: [Template; 12] = [
    Template {
        kind: "early_bird_refund",
        slot: Slot::Reveal,
        favourable: true,
        weight: 1.0,
        effects: fee_refund,
    },
    Template {
        kind: "budget_leak",
        slot: Slot::Reveal,
        favourable: true,
        weight: 1.0,
        effects: budget_leak,
    },
    Template {
        kind: "rival_no_show",
        slot: Slot::Reveal,
        favourable: true,
        weight: 0.8,
        effects: no_show,
    },
    Template {
        kind: "hidden_compartment",
        slot: Slot::Reveal,
        favourable: true,
        weight: 0.6,
        effects: hidden_compartment,
    },
    Template {
        kind: "bidding_frenzy",
        slot: Slot::Bid,
        favourable: false,
        weight: 1.0,
        effects: frenzy,
    },
    Template {
        kind: "auctioneer_hurry",
        slot: Slot::Bid,
        favourable: false,
        weight: 0.8,
        effects: hurry,
    },
    Template {
        kind: "late_arrival",
        slot: Slot::Bid,
        favourable: false,
        weight: 0.9,
        effects: late_arrival,
    },
    Template {
        kind: "water_damage",
        slot: Slot::Bid,
        favourable: false,
        weight: 0.7,
        effects: water_damage,
    },
    Template {
        kind: "bonus_box",
        slot: Slot::Win,
        favourable: true,
        weight: 0.8,
        effects: bonus_box,
    },
    Template {
        kind: "expert_eye",
        slot: Slot::Win,
        favourable: true,
        weight: 0.5,
        effects: expert_eye,
    },
    Template {
        kind: "sponsor_bonus",
        slot: Slot::Win,
        favourable: true,
        weight: 0.7,
        effects: sponsor_bonus,
    },
    Template {
        kind: "restored_piece",
        slot: Slot::Win,
        favourable: true,
        weight: 0.6,
        effects: restored_piece,
    },
];

/// Template keys in catalog order
pub fn template_kinds() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|t| t.kind)
}

fn luck_weight(template: &Template, luck: f64) -> f64 {
    if template.favourable {
        template.weight * (1.0 + luck)
    } else {
        template.weight * (1.0 - 0.5 * luck)
    }
}

/// Roll the lot events for a new auction
pub fn roll_lot_events(
    auction_id: &str,
    profile: &LocationProfile,
    hidden_total_value: i64,
    luck: f64,
    rng: &mut RngManager,
) -> Vec<LotEvent> {
    let luck = luck.clamp(0.0, 1.0);
    let mut weights: Vec<f64> = TEMPLATES.iter().map(|t| luck_weight(t, luck)).collect();
    let mut events = Vec::new();

    for _ in 0..profile.max_events {
        if !rng.chance(profile.event_chance) {
            continue;
        }
        let Some(idx) = rng.weighted_index(&weights) else {
            break;
        };
        // No template twice per auction
        weights[idx] = 0.0;

        let template = &TEMPLATES[idx];
        let timing = match template.slot {
            Slot::Reveal => EventTiming::OnReveal,
            Slot::Bid => EventTiming::OnBid {
                round_threshold: rng.range_inclusive(ON_BID_THRESHOLDS.0, ON_BID_THRESHOLDS.1)
                    as u32,
            },
            Slot::Win => EventTiming::OnWin,
        };
        let effects = (template.effects)(hidden_total_value, rng);
        events.push(LotEvent::new(
            format!("{}_evt_{}", auction_id, events.len() + 1),
            template.kind,
            timing,
            effects,
        ));
    }

    events
}
