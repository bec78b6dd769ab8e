use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-brain temperament, rolled once at spawn. Traits only scale force
/// weights; they never pick a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub boldness: f64,
    pub sociability: f64,
    pub curiosity: f64,
    pub aggression: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::neutral()
    }
}

impl PersonalityTraits {
    pub const fn neutral() -> Self {
        Self {
            boldness: 0.5,
            sociability: 0.5,
            curiosity: 0.5,
            aggression: 0.5,
        }
    }

    pub fn new_random_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            boldness: rng.gen_range(0.0..=1.0),
            sociability: rng.gen_range(0.0..=1.0),
            curiosity: rng.gen_range(0.0..=1.0),
            aggression: rng.gen_range(0.0..=1.0),
        }
    }

    /// Flee speed multiplier in `[1.5, 2.5]`; timid creatures bolt harder.
    pub fn panic_multiplier(&self) -> f64 {
        2.5 - self.boldness.clamp(0.0, 1.0)
    }

    /// Scale on the flocking blend, `[0.5, 1.5]`.
    pub fn flock_scale(&self) -> f64 {
        0.5 + self.sociability.clamp(0.0, 1.0)
    }

    /// Scale on the exploration force, `[0.75, 1.25]`.
    pub fn explore_scale(&self) -> f64 {
        0.75 + 0.5 * self.curiosity.clamp(0.0, 1.0)
    }

    /// Scale on pursuit force, `[0.8, 1.2]`.
    pub fn pursuit_scale(&self) -> f64 {
        0.8 + 0.4 * self.aggression.clamp(0.0, 1.0)
    }
}
