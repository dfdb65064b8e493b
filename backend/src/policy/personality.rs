//! Personality lookup table
//!
//! Maps each closed `Personality` variant to the numbers that drive its
//! behaviour. The bidder policy, the tactics engine and the auction factory
//! all read from here; no other module branches on personality.

use crate::models::bidder::Personality;

/// Behaviour parameters for one personality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalityProfile {
    /// Affordability ratio up to which the bidder always raises
    pub comfort_ratio: f64,
    /// Ratio at which raise probability bottoms out; beyond it the bidder folds
    pub ceiling_ratio: f64,
    /// Raise probability right at the ceiling
    pub floor_probability: f64,
    /// Rounds before impatience sets in
    pub patience_rounds: u32,
    /// Per-round multiplicative erosion after `patience_rounds`
    pub patience_decay: f64,
    /// Extra raise on top of one increment, as a fraction of the increment
    pub jitter: f64,
    /// Budget relative to the location's tier factor
    pub budget_multiplier: f64,
    /// Base chance of folding to an intimidation attempt
    pub intimidation_susceptibility: f64,
    /// How readily the bidder sees through a bluff (>= 0.5 calls bluffs)
    pub skepticism: f64,
}

const CAUTIOUS: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.35,
    ceiling_ratio: 0.75,
    floor_probability: 0.15,
    patience_rounds: 6,
    patience_decay: 0.12,
    jitter: 0.1,
    budget_multiplier: 0.85,
    intimidation_susceptibility: 0.6,
    skepticism: 0.4,
};

const AGGRESSIVE: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.7,
    ceiling_ratio: 1.0,
    floor_probability: 0.55,
    patience_rounds: 12,
    patience_decay: 0.04,
    jitter: 0.3,
    budget_multiplier: 1.15,
    intimidation_susceptibility: 0.1,
    skepticism: 0.3,
};

const ERRATIC: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.2,
    ceiling_ratio: 1.0,
    floor_probability: 0.35,
    patience_rounds: 5,
    patience_decay: 0.08,
    jitter: 0.8,
    budget_multiplier: 1.0,
    intimidation_susceptibility: 0.4,
    skepticism: 0.2,
};

const ANALYTICAL: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.5,
    ceiling_ratio: 0.9,
    floor_probability: 0.25,
    patience_rounds: 8,
    patience_decay: 0.08,
    jitter: 0.05,
    budget_multiplier: 1.0,
    intimidation_susceptibility: 0.2,
    skepticism: 0.7,
};

const SKEPTICAL: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.45,
    ceiling_ratio: 0.9,
    floor_probability: 0.3,
    patience_rounds: 8,
    patience_decay: 0.06,
    jitter: 0.15,
    budget_multiplier: 0.95,
    intimidation_susceptibility: 0.25,
    skepticism: 0.85,
};

const TIMID: PersonalityProfile = PersonalityProfile {
    comfort_ratio: 0.3,
    ceiling_ratio: 0.65,
    floor_probability: 0.1,
    patience_rounds: 4,
    patience_decay: 0.15,
    jitter: 0.1,
    budget_multiplier: 0.75,
    intimidation_susceptibility: 0.8,
    skepticism: 0.2,
};

impl PersonalityProfile {
    pub fn for_personality(personality: Personality) -> &'static PersonalityProfile {
        match personality {
            Personality::Cautious => &CAUTIOUS,
            Personality::Aggressive => &AGGRESSIVE,
            Personality::Erratic => &ERRATIC,
            Personality::Analytical => &ANALYTICAL,
            Personality::Skeptical => &SKEPTICAL,
            Personality::Timid => &TIMID,
        }
    }

    /// Probability of raising at the given affordability ratio after
    /// `rounds_elapsed` rounds
    pub fn raise_probability(&self, ratio: f64, rounds_elapsed: u32) -> f64 {
        let base = if ratio <= self.comfort_ratio {
            1.0
        } else if ratio > self.ceiling_ratio {
            0.0
        } else {
            let span = (self.ceiling_ratio - self.comfort_ratio).max(f64::EPSILON);
            let progress = (ratio - self.comfort_ratio) / span;
            1.0 - progress * (1.0 - self.floor_probability)
        };

        let impatience = rounds_elapsed.saturating_sub(self.patience_rounds);
        let erosion = (1.0 - self.patience_decay).powi(impatience as i32);

        (base * erosion).clamp(0.0, 1.0)
    }

    pub fn calls_bluffs(&self) -> bool {
        self.skepticism >= 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_is_certain_inside_comfort_zone() {
        let profile = PersonalityProfile::for_personality(Personality::Aggressive);
        assert_eq!(profile.raise_probability(0.1, 1), 1.0);
    }

    #[test]
    fn test_probability_zero_past_ceiling() {
        let profile = PersonalityProfile::for_personality(Personality::Timid);
        assert_eq!(profile.raise_probability(0.8, 1), 0.0);
    }

    #[test]
    fn test_aggressive_outlasts_cautious_at_high_ratio() {
        let aggressive = PersonalityProfile::for_personality(Personality::Aggressive);
        let cautious = PersonalityProfile::for_personality(Personality::Cautious);
        assert!(aggressive.raise_probability(0.72, 2) > cautious.raise_probability(0.72, 2));
    }

    #[test]
    fn test_patience_erodes_probability() {
        let profile = PersonalityProfile::for_personality(Personality::Cautious);
        let fresh = profile.raise_probability(0.1, 1);
        let tired = profile.raise_probability(0.1, 16);
        assert_eq!(fresh, 1.0);
        assert!(tired < 0.35);
    }

    #[test]
    fn test_bluff_callers() {
        assert!(PersonalityProfile::for_personality(Personality::Analytical).calls_bluffs());
        assert!(PersonalityProfile::for_personality(Personality::Skeptical).calls_bluffs());
        assert!(!PersonalityProfile::for_personality(Personality::Timid).calls_bluffs());
    }
}
