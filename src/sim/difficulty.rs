//! Score-driven difficulty lookup

use crate::tuning::{DifficultyTier, Tuning};

/// Highest tier whose threshold is at or below `score`
///
/// The table is validated non-empty and strictly increasing at startup, so
/// the first entry is always a valid fallback.
pub fn tier_for_score(tuning: &Tuning, score: u64) -> DifficultyTier {
    let table = &tuning.difficulty;
    let idx = table.partition_point(|tier| tier.score <= score);
    table[idx.saturating_sub(1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_tier_at_zero() {
        let tuning = Tuning::default();
        let tier = tier_for_score(&tuning, 0);
        assert_eq!(tier.score, 0);
        assert!((tier.base_speed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_last_matching_tier_wins() {
        let tuning = Tuning::default();
        assert_eq!(tier_for_score(&tuning, 4).score, 0);
        assert_eq!(tier_for_score(&tuning, 5).score, 5);
        assert_eq!(tier_for_score(&tuning, 39).score, 30);
        assert_eq!(tier_for_score(&tuning, 10_000).score, 150);
    }

    #[test]
    fn test_extra_taps_follow_tier() {
        let mut tuning = Tuning::default();
        tuning.difficulty[12].extra_taps = 2;
        assert_eq!(tier_for_score(&tuning, 149).extra_taps, 0);
        assert_eq!(tier_for_score(&tuning, 150).extra_taps, 2);
    }

    proptest! {
        #[test]
        fn prop_lookup_is_monotonic(a in 0u64..1000, b in 0u64..1000) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let t_lo = tier_for_score(&tuning, lo);
            let t_hi = tier_for_score(&tuning, hi);
            prop_assert!(t_lo.base_speed <= t_hi.base_speed);
            prop_assert!(t_lo.extra_taps <= t_hi.extra_taps);
            prop_assert!(t_lo.score <= lo);
        }
    }
}
