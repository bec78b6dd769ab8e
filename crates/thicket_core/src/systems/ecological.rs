//! Ecosystem health: how far the population mix sits from the ideal
//! plant/herbivore/carnivore balance.

use thicket_data::{HealthTier, PopulationCounts};

pub const IDEAL_PLANT: f64 = 0.6;
pub const IDEAL_HERBIVORE: f64 = 0.3;
pub const IDEAL_CARNIVORE: f64 = 0.1;

/// Sum of absolute ratio deviations from the ideal, in `[0, 2]`. `None` for
/// an empty population.
pub fn deviation(counts: &PopulationCounts) -> Option<f64> {
    let total = counts.total();
    if total == 0 {
        return None;
    }
    let t = total as f64;
    Some(
        (counts.plants as f64 / t - IDEAL_PLANT).abs()
            + (counts.herbivores as f64 / t - IDEAL_HERBIVORE).abs()
            + (counts.carnivores as f64 / t - IDEAL_CARNIVORE).abs(),
    )
}

pub fn tier_for(deviation: f64) -> HealthTier {
    if deviation < 0.1 {
        HealthTier::Excellent
    } else if deviation < 0.2 {
        HealthTier::Good
    } else if deviation < 0.3 {
        HealthTier::Fair
    } else if deviation < 0.4 {
        HealthTier::Poor
    } else {
        HealthTier::Critical
    }
}

/// Zero population is Critical.
pub fn score(counts: &PopulationCounts) -> HealthTier {
    deviation(counts).map_or(HealthTier::Critical, tier_for)
}

/// Improvement in deviation going from `before` to `after`; positive is
/// healthier. An empty population counts as the worst deviation, 2.0.
pub fn impact(before: &PopulationCounts, after: &PopulationCounts) -> f64 {
    deviation(before).unwrap_or(2.0) - deviation(after).unwrap_or(2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(score(&PopulationCounts::new(0, 0, 0)), HealthTier::Critical);
        assert_eq!(score(&PopulationCounts::new(60, 30, 10)), HealthTier::Excellent);
        assert_eq!(deviation(&PopulationCounts::new(60, 30, 10)), Some(0.0));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(tier_for(0.0999), HealthTier::Excellent);
        assert_eq!(tier_for(0.1), HealthTier::Good);
        assert_eq!(tier_for(0.25), HealthTier::Fair);
        assert_eq!(tier_for(0.35), HealthTier::Poor);
        assert_eq!(tier_for(0.4), HealthTier::Critical);
        // All plants: 0.4 + 0.3 + 0.1.
        assert_eq!(score(&PopulationCounts::new(10, 0, 0)), HealthTier::Critical);
        // 52/38/10: 0.08 + 0.08.
        assert_eq!(score(&PopulationCounts::new(52, 38, 10)), HealthTier::Good);
    }

    #[test]
    fn test_impact_sign() {
        let skewed = PopulationCounts::new(10, 0, 0);
        let balanced = PopulationCounts::new(6, 3, 1);
        assert!(impact(&skewed, &balanced) > 0.0);
        assert!(impact(&balanced, &skewed) < 0.0);
    }
}
