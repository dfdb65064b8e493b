//! Lot event tests
//!
//! Rolling events from the template catalog, firing them at reveal, round
//! and win time, and the hold-until-win rule for effects on the prize items.

use auction_engine_core_rs::events::catalog::{roll_lot_events, template_kinds};
use auction_engine_core_rs::events::{
    discard_deferred, fire_reveal, fire_round, resolve_win, LotEventReport,
};
use auction_engine_core_rs::phase::{self, PhaseConfig, PhaseSignal};
use auction_engine_core_rs::policy::BidDecision;
use auction_engine_core_rs::{
    Auction, AuctionDraft, Bidder, Collaborators, Condition, EventTiming, Item, Leader, LotEffect,
    LocationCatalog, LocationProfile, LotEvent, Personality, PlayerWallet, Rarity, RngManager,
    StaticLocationCatalog, StorageInventory, TemplateItemGenerator, Wallet,
};
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

struct Fixture {
    wallet: PlayerWallet,
    inventory: StorageInventory,
    generator: TemplateItemGenerator,
    rng: RngManager,
}

impl Fixture {
    fn new() -> Self {
        Self {
            wallet: PlayerWallet::new(1_000),
            inventory: StorageInventory::new(10),
            generator: TemplateItemGenerator::new(200),
            rng: RngManager::new(21),
        }
    }

    fn reveal(&mut self, auction: &mut Auction) -> Vec<LotEventReport> {
        let mut collab = Collaborators::new(&mut self.wallet, &mut self.inventory, &mut self.generator);
        fire_reveal(auction, &mut collab, &mut self.rng)
    }

    fn round(&mut self, auction: &mut Auction) -> Vec<LotEventReport> {
        let mut collab = Collaborators::new(&mut self.wallet, &mut self.inventory, &mut self.generator);
        fire_round(auction, &mut collab, &mut self.rng)
    }

    fn win(&mut self, auction: &mut Auction) -> Vec<LotEventReport> {
        let mut collab = Collaborators::new(&mut self.wallet, &mut self.inventory, &mut self.generator);
        resolve_win(auction, &mut collab, &mut self.rng)
    }
}

fn lamp() -> Item {
    Item::new("i1", "Brass Lamp", "decor", Rarity::Common, Condition::Good, 400)
}

fn auction_with(events: Vec<LotEvent>) -> Auction {
    auction_with_budgets(events, 300)
}

fn auction_with_budgets(events: Vec<LotEvent>, budget: i64) -> Auction {
    let mut auction = Auction::from_draft(AuctionDraft {
        id: "auc_lot".to_string(),
        location_id: "loc".to_string(),
        location_name: "Test Yard".to_string(),
        entry_fee: 100,
        budget_tier_factor: 1.2,
        items: vec![lamp()],
        opening_bid: 40,
        bid_increment: 10,
        bidders: vec![
            Bidder::new("npc_1", "A", Personality::Cautious, budget),
            Bidder::new("npc_2", "B", Personality::Timid, budget),
            Bidder::new("npc_3", "C", Personality::Erratic, budget),
        ],
        lot_events: events,
    });
    phase::open(&mut auction, &PhaseConfig::default());
    auction
}

fn reveal_event(kind: &str, effects: Vec<LotEffect>) -> LotEvent {
    LotEvent::new(format!("evt_{}", kind), kind, EventTiming::OnReveal, effects)
}

// ============================================================================
// Immediate effects
// ============================================================================

#[test]
fn test_fee_refund_credits_wallet_on_reveal() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![reveal_event(
        "early_bird_refund",
        vec![LotEffect::EntryFeeRefund { fraction: 0.25 }],
    )]);

    let reports = fx.reveal(&mut auction);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].triggered_now);
    assert_eq!(reports[0].applied, vec!["lot_event.fee_refund".to_string()]);
    assert_eq!(fx.wallet.balance(), 1_025);

    // Fires once only
    assert!(fx.reveal(&mut auction).is_empty());
    assert_eq!(fx.wallet.balance(), 1_025);
    assert!(auction.lot_events()[0].is_fully_applied());
}

#[test]
fn test_dropout_spares_the_leader() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![reveal_event(
        "rival_no_show",
        vec![LotEffect::NpcDropout { count: 5 }],
    )]);
    phase::apply_responses(&mut auction, &[(1, BidDecision::Raise { amount: 50 })]);
    assert_eq!(auction.leader(), &Leader::Npc("npc_2".to_string()));

    fx.reveal(&mut auction);
    let active: Vec<&str> = auction.active_bidders().map(|b| b.id()).collect();
    assert_eq!(active, vec!["npc_2"]);
}

#[test]
fn test_frenzy_and_increment_change() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![reveal_event(
        "bidding_frenzy",
        vec![
            LotEffect::NpcFrenzy {
                budget_multiplier: 1.5,
            },
            LotEffect::IncrementMultiplier { multiplier: 2.0 },
        ],
    )]);

    let reports = fx.reveal(&mut auction);
    assert_eq!(reports[0].applied.len(), 2);
    assert!(auction.bidders().iter().all(|b| b.max_budget() == 450));
    assert_eq!(auction.bid_increment(), 20);
}

#[test]
fn test_late_bidder_and_budget_reveal() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![
        reveal_event("late_arrival", vec![LotEffect::LateBidder]),
        reveal_event("budget_leak", vec![LotEffect::RevealBudgets { count: 2 }]),
    ]);

    fx.reveal(&mut auction);
    assert_eq!(auction.bidders().len(), 4);
    let late = &auction.bidders()[3];
    assert!(late.is_late_arrival());
    assert!(late.id().starts_with("auc_lot_late_"));
    // lot value 400 × tier 1.2 × [0.9, 1.3)
    assert!((432..=624).contains(&late.max_budget()), "{}", late.max_budget());

    let revealed = auction
        .bidders()
        .iter()
        .filter(|b| b.visible_budget().is_some())
        .count();
    assert_eq!(revealed, 2);
}

// ============================================================================
// Round-keyed events
// ============================================================================

#[test]
fn test_on_bid_event_fires_once_at_threshold() {
    let mut fx = Fixture::new();
    let config = PhaseConfig::default();
    let mut auction = auction_with_budgets(
        vec![LotEvent::new(
            "evt_hurry",
            "auctioneer_hurry",
            EventTiming::OnBid { round_threshold: 2 },
            vec![LotEffect::IncrementMultiplier { multiplier: 2.0 }],
        )],
        100_000,
    );
    phase::apply_responses(&mut auction, &[(0, BidDecision::Raise { amount: 50 })]);

    // Deep pockets: every challenger raises, so bidding stays open
    let mut fired_at = Vec::new();
    for _ in 0..3 {
        while phase::tick(&mut auction, &config) != PhaseSignal::RoundDue {}
        if !fx.round(&mut auction).is_empty() {
            fired_at.push(auction.rounds_elapsed());
        }
        let summary = phase::run_npc_round(&mut auction, &config, &mut fx.rng);
        assert!(summary.outcome.has_raise());
    }

    assert_eq!(fired_at, vec![2]);
    assert_eq!(auction.bid_increment(), 20);
}

// ============================================================================
// Deferred effects
// ============================================================================

#[test]
fn test_item_effects_wait_for_win() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![
        reveal_event("water_damage", vec![LotEffect::ConditionShift { steps: -1 }]),
        LotEvent::new(
            "evt_bonus",
            "bonus_box",
            EventTiming::OnWin,
            vec![LotEffect::ExtraItem {
                rarity: Rarity::Uncommon,
                value_multiplier: 1.0,
            }],
        ),
    ]);

    let reports = fx.reveal(&mut auction);
    assert!(reports[0].applied.is_empty());
    assert_eq!(auction.items()[0].condition, Condition::Good);
    assert_eq!(auction.pending_deferred_effects(), 1);

    let reports = fx.win(&mut auction);
    let applied: Vec<&str> = reports
        .iter()
        .flat_map(|r| r.applied.iter().map(String::as_str))
        .collect();
    assert!(applied.contains(&"lot_event.condition_downgrade"));
    assert!(applied.contains(&"lot_event.extra_item"));
    assert_eq!(auction.items().len(), 2);
    assert_eq!(auction.pending_deferred_effects(), 0);

    let damaged = auction
        .items()
        .iter()
        .filter(|i| i.condition == Condition::Fair)
        .count();
    assert_eq!(damaged, 1);
}

#[test]
fn test_hidden_treasure_marks_bonus_item() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![reveal_event(
        "hidden_compartment",
        vec![LotEffect::HiddenTreasure {
            rarity: Rarity::Rare,
            value_multiplier: 2.0,
        }],
    )]);
    fx.reveal(&mut auction);
    fx.win(&mut auction);

    let treasure = auction.items().iter().find(|i| i.hidden_bonus).unwrap();
    assert_eq!(treasure.rarity, Rarity::Rare);
    assert_eq!(treasure.base_value, 400);
}

#[test]
fn test_discarded_effects_never_land() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![reveal_event(
        "water_damage",
        vec![LotEffect::ConditionShift { steps: -1 }],
    )]);
    fx.reveal(&mut auction);

    assert_eq!(discard_deferred(&mut auction), 1);
    assert_eq!(auction.pending_deferred_effects(), 0);
    assert_eq!(discard_deferred(&mut auction), 0);

    fx.win(&mut auction);
    assert_eq!(auction.items()[0].condition, Condition::Good);
    assert!(auction.lot_events()[0].effects[0].discarded);
}

#[test]
fn test_untriggered_round_event_does_not_land_at_win() {
    let mut fx = Fixture::new();
    let mut auction = auction_with(vec![LotEvent::new(
        "evt_late",
        "water_damage",
        EventTiming::OnBid { round_threshold: 6 },
        vec![LotEffect::ConditionShift { steps: -1 }],
    )]);
    assert!(fx.win(&mut auction).is_empty());
    assert_eq!(auction.items()[0].condition, Condition::Good);
}

// ============================================================================
// Catalog
// ============================================================================

fn profile(event_chance: f64) -> LocationProfile {
    let mut profile = StaticLocationCatalog::with_default_locations()
        .get("estate_sale")
        .unwrap();
    profile.event_chance = event_chance;
    profile
}

#[test]
fn test_quiet_location_rolls_nothing() {
    let events = roll_lot_events("auc_x", &profile(0.0), 5_000, 1.0, &mut RngManager::new(4));
    assert!(events.is_empty());
}

#[test]
fn test_rolled_events_are_well_formed() {
    let kinds: HashSet<&str> = template_kinds().collect();
    assert_eq!(kinds.len(), 12);

    let profile = profile(1.0);
    for seed in 1..40 {
        let events = roll_lot_events("auc_x", &profile, 5_000, 0.4, &mut RngManager::new(seed));
        assert_eq!(events.len(), profile.max_events);

        let mut seen = HashSet::new();
        for (n, event) in events.iter().enumerate() {
            assert_eq!(event.id, format!("auc_x_evt_{}", n + 1));
            assert!(kinds.contains(event.kind.as_str()));
            assert!(seen.insert(event.kind.clone()), "duplicate {}", event.kind);
            assert!(!event.triggered);
            if let EventTiming::OnBid { round_threshold } = event.timing {
                assert!((2..=6).contains(&round_threshold));
            }
            for scheduled in &event.effects {
                assert_eq!(scheduled.deferred, scheduled.effect.requires_deferred_resolution());
            }
        }
    }
}

#[test]
fn test_same_seed_same_events() {
    let profile = profile(0.7);
    let a = roll_lot_events("auc_x", &profile, 2_000, 0.0, &mut RngManager::new(13));
    let b = roll_lot_events("auc_x", &profile, 2_000, 0.0, &mut RngManager::new(13));
    assert_eq!(a, b);
}
