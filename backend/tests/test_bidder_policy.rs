//! Bidder policy tests
//!
//! The decision function, the escalation used by provoked rivals and the
//! personality probability curves.

use auction_engine_core_rs::policy::{decide, escalate, BidDecision, PersonalityProfile};
use auction_engine_core_rs::{Bidder, Personality, RngManager};

#[test]
fn test_comfortable_bidders_always_raise() {
    for personality in Personality::ALL {
        let bidder = Bidder::new("npc_1", "A", personality, 10_000);
        let mut rng = RngManager::new(3);
        for _ in 0..20 {
            let decision = decide(&bidder, 100, 10, 0, &mut rng);
            assert!(
                matches!(decision, BidDecision::Raise { amount } if amount >= 110),
                "{:?} folded at a 1% ratio",
                personality
            );
        }
    }
}

#[test]
fn test_past_ceiling_always_folds() {
    // Cautious tops out at 75% of budget
    let bidder = Bidder::new("npc_1", "A", Personality::Cautious, 1_000);
    let mut rng = RngManager::new(3);
    for _ in 0..20 {
        assert_eq!(decide(&bidder, 800, 10, 0, &mut rng), BidDecision::DropOut);
    }
}

#[test]
fn test_raise_bounded_by_increment_jitter_and_budget() {
    let mut rng = RngManager::new(77);
    for personality in Personality::ALL {
        let profile = PersonalityProfile::for_personality(personality);
        let bidder = Bidder::new("npc_1", "A", personality, 5_000);
        for _ in 0..50 {
            if let BidDecision::Raise { amount } = decide(&bidder, 1_000, 40, 2, &mut rng) {
                let ceiling = 1_040 + (40.0 * profile.jitter).floor() as i64;
                assert!((1_040..=ceiling).contains(&amount), "{:?}: {}", personality, amount);
            }
        }
    }

    let tight = Bidder::new("npc_2", "B", Personality::Erratic, 1_045);
    for _ in 0..50 {
        if let Some(amount) = decide(&tight, 1_000, 40, 0, &mut rng).amount() {
            assert!(amount <= 1_045);
        }
    }
}

#[test]
fn test_unaffordable_increment_folds() {
    let bidder = Bidder::new("npc_1", "A", Personality::Aggressive, 100);
    let mut rng = RngManager::new(1);
    assert_eq!(decide(&bidder, 95, 10, 0, &mut rng), BidDecision::DropOut);
    assert_eq!(escalate(&bidder, 95, 10, 2), BidDecision::DropOut);
}

#[test]
fn test_bids_at_the_top_of_the_range_fold() {
    let bidder = Bidder::new("npc_1", "A", Personality::Aggressive, i64::MAX);
    let mut rng = RngManager::new(1);
    assert_eq!(decide(&bidder, i64::MAX, 10, 0, &mut rng), BidDecision::DropOut);
    assert_eq!(decide(&bidder, i64::MAX - 5, 10, 0, &mut rng), BidDecision::DropOut);
    assert_eq!(escalate(&bidder, i64::MAX - 5, 10, 2), BidDecision::DropOut);

    // One increment still fits, the second saturates at the budget
    assert_eq!(
        escalate(&bidder, i64::MAX - 15, 10, 2),
        BidDecision::Raise { amount: i64::MAX }
    );
}

#[test]
fn test_escalate_steps_capped_at_budget() {
    let bidder = Bidder::new("npc_1", "A", Personality::Analytical, 1_000);
    assert_eq!(
        escalate(&bidder, 500, 50, 2),
        BidDecision::Raise { amount: 600 }
    );
    assert_eq!(
        escalate(&bidder, 940, 50, 2),
        BidDecision::Raise { amount: 1_000 }
    );

    let mut gone = bidder.clone();
    gone.drop_out();
    assert_eq!(escalate(&gone, 500, 50, 2), BidDecision::DropOut);
}

#[test]
fn test_same_seed_same_decisions() {
    let bidder = Bidder::new("npc_1", "A", Personality::Erratic, 1_000);
    let run = |seed| {
        let mut rng = RngManager::new(seed);
        (0..30)
            .map(|round| decide(&bidder, 400, 25, round, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(2024), run(2024));
}

#[test]
fn test_raise_probability_falls_with_ratio() {
    for personality in Personality::ALL {
        let profile = PersonalityProfile::for_personality(personality);
        let mut previous = 1.0;
        for step in 0..=20 {
            let ratio = step as f64 * 0.05;
            let p = profile.raise_probability(ratio, 0);
            assert!((0.0..=1.0).contains(&p));
            assert!(p <= previous + 1e-12, "{:?} rose at {}", personality, ratio);
            previous = p;
        }
    }
}

#[test]
fn test_impatience_erodes_raise_probability() {
    let profile = PersonalityProfile::for_personality(Personality::Timid);
    let fresh = profile.raise_probability(0.1, 0);
    let late = profile.raise_probability(0.1, profile.patience_rounds + 5);
    assert_eq!(fresh, 1.0);
    assert!(late < fresh);
    // Patience itself costs nothing
    assert_eq!(profile.raise_probability(0.1, profile.patience_rounds), 1.0);
}

#[test]
fn test_skeptical_personalities_call_bluffs() {
    let callers: Vec<Personality> = Personality::ALL
        .into_iter()
        .filter(|p| PersonalityProfile::for_personality(*p).calls_bluffs())
        .collect();
    assert_eq!(callers, vec![Personality::Analytical, Personality::Skeptical]);
}

#[test]
fn test_timid_is_easiest_to_intimidate() {
    let timid = PersonalityProfile::for_personality(Personality::Timid);
    for personality in Personality::ALL {
        let profile = PersonalityProfile::for_personality(personality);
        assert!(profile.intimidation_susceptibility <= timid.intimidation_susceptibility);
    }
}
