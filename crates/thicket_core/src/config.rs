//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration that maps onto a `config.toml` file. Every
//! section has defaults, so a partial file only overrides what it names.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//! tick_rate = 30
//!
//! [feeding]
//! bite_weight = 0.05
//! eat_cooldown = 0.2
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thicket_data::{EntityKind, Species};

/// Global world parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed. `None` draws one from the OS at startup (and logs it).
    pub seed: Option<u64>,
    /// Fixed-timestep frequency in Hz.
    pub tick_rate: u32,
    /// Live population above which the AI pass fans out across rooms on rayon.
    pub parallel_threshold: usize,
    /// Reproduction is suppressed once a room holds this many organisms.
    pub max_room_population: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: Some(42),
            tick_rate: 30,
            parallel_threshold: 400,
            max_room_population: 120,
        }
    }
}

/// What creatures can see and remember.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Same-room neighbours farther than this are invisible to the AI.
    pub nearby_radius: f64,
    pub memory_capacity: usize,
    /// Remembered food older than this (seconds) is ignored.
    pub food_memory_window: f64,
    pub prey_memory_window: f64,
    /// Sticky targets are dropped beyond `detection range x tracking_range_mult`.
    pub tracking_range_mult: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            nearby_radius: 200.0,
            memory_capacity: 8,
            food_memory_window: 45.0,
            prey_memory_window: 20.0,
            tracking_range_mult: 1.5,
        }
    }
}

/// Steering and integration constants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Non-zero steering forces are raised to at least this magnitude.
    pub min_force: f64,
    pub max_force: f64,
    /// Scales force into velocity change per second.
    pub tick_scale: f64,
    pub wall_margin: f64,
    pub wall_weight: f64,
    pub panic_multiplier: f64,
    pub slowing_radius: f64,
    pub flock_radius: f64,
    pub ally_weight_per_neighbor: f64,
    pub ally_weight_cap: f64,
    pub wander_radius: f64,
    pub wander_distance: f64,
    /// Maximum wander angle change per call, radians.
    pub wander_jitter: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_force: 5.0,
            max_force: 150.0,
            tick_scale: 1.0,
            wall_margin: 30.0,
            wall_weight: 2.5,
            panic_multiplier: 2.0,
            slowing_radius: 40.0,
            flock_radius: 60.0,
            ally_weight_per_neighbor: 0.1,
            ally_weight_cap: 0.3,
            wander_radius: 20.0,
            wander_distance: 40.0,
            wander_jitter: 0.6,
        }
    }
}

/// Grazing, hunting and consumption.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedingConfig {
    pub eat_range: f64,
    pub attack_range: f64,
    /// Herbivores only start a new meal at or above this hunger fraction.
    pub hunger_threshold: f64,
    /// Carnivores only start a new hunt at or above this hunger fraction.
    pub hunt_threshold: f64,
    /// Kilograms removed from a plant per eat step.
    pub bite_weight: f64,
    /// Kilograms removed from a carcass per eat step.
    pub carcass_bite_weight: f64,
    /// Kilograms a carnivore takes from prey on the killing blow.
    pub kill_feast_weight: f64,
    /// Seconds between eat steps for one herbivore.
    pub eat_cooldown: f64,
    /// Seconds between attacks for one carnivore.
    pub hunt_cooldown: f64,
    pub energy_per_bite: f64,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            eat_range: 20.0,
            attack_range: 28.0,
            hunger_threshold: 0.6,
            hunt_threshold: 0.4,
            bite_weight: 0.05,
            carcass_bite_weight: 0.5,
            kill_feast_weight: 1.0,
            eat_cooldown: 0.2,
            hunt_cooldown: 0.5,
            energy_per_bite: 2.0,
        }
    }
}

/// Aging, hunger and recovery.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MetabolismConfig {
    /// Fraction of max hunger gained per second.
    pub hunger_rate: f64,
    /// Health lost per second while hunger is full.
    pub starvation_damage: f64,
    /// Energy fraction below which a creature is forced to sleep.
    pub critical_energy: f64,
    /// Energy fraction considered "low" by fallback transitions.
    pub low_energy: f64,
    /// Health per second regained while well fed.
    pub health_regen: f64,
    /// Hunger fraction below which creatures regenerate health.
    pub regen_hunger_ceiling: f64,
    /// Energy per second a plant gathers from light.
    pub plant_energy_regen: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            hunger_rate: 1.0 / 90.0,
            starvation_damage: 2.0,
            critical_energy: 0.1,
            low_energy: 0.3,
            health_regen: 0.5,
            regen_hunger_ceiling: 0.5,
            plant_energy_regen: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReproductionConfig {
    pub offspring_offset: f64,
    pub plant_offspring_offset: f64,
    /// Fraction of max energy a parent spends on one offspring.
    pub energy_cost: f64,
    /// Seconds before a newborn may reproduce.
    pub min_age: f64,
    pub offspring_health: f64,
    pub offspring_energy: f64,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            offspring_offset: 25.0,
            plant_offspring_offset: 40.0,
            energy_cost: 0.4,
            min_age: 20.0,
            offspring_health: 0.6,
            offspring_energy: 0.5,
        }
    }
}

/// Player verbs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Max distance between the player and an action target.
    pub reach: f64,
    /// Kilograms removed from a plant per gather.
    pub gather_weight: f64,
    pub attack_damage: f64,
    /// Health given back to a creature per restore.
    pub restore_amount: f64,
    pub plant_species: Species,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            reach: 40.0,
            gather_weight: 0.1,
            attack_damage: 25.0,
            restore_amount: 20.0,
            plant_species: Species::Fern,
        }
    }
}

/// Full simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub perception: PerceptionConfig,
    pub movement: MovementConfig,
    pub feeding: FeedingConfig,
    pub metabolism: MetabolismConfig,
    pub reproduction: ReproductionConfig,
    pub player: PlayerConfig,
}

impl SimConfig {
    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.world.tick_rate.max(1))
    }

    /// Validates all configuration parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.tick_rate > 0, "Tick rate must be positive");
        anyhow::ensure!(self.world.tick_rate <= 240, "Tick rate too high (max 240)");
        anyhow::ensure!(
            self.world.max_room_population > 0,
            "Max room population must be positive"
        );

        anyhow::ensure!(
            self.perception.nearby_radius > 0.0,
            "Nearby radius must be positive"
        );
        anyhow::ensure!(
            self.perception.memory_capacity > 0,
            "Memory capacity must be positive"
        );
        anyhow::ensure!(
            self.perception.food_memory_window >= 0.0,
            "Food memory window must be non-negative"
        );
        anyhow::ensure!(
            self.perception.tracking_range_mult >= 1.0,
            "Tracking range multiplier must be at least 1.0"
        );

        anyhow::ensure!(
            self.movement.min_force >= 0.0,
            "Min force must be non-negative"
        );
        anyhow::ensure!(
            self.movement.max_force >= self.movement.min_force,
            "Max force must be >= min force"
        );
        anyhow::ensure!(
            self.movement.panic_multiplier >= 1.0,
            "Panic multiplier must be at least 1.0"
        );
        anyhow::ensure!(
            self.movement.wall_margin >= 0.0,
            "Wall margin must be non-negative"
        );
        anyhow::ensure!(
            self.movement.ally_weight_cap >= 0.0 && self.movement.ally_weight_cap <= 1.0,
            "Ally weight cap must be in [0.0, 1.0]"
        );

        anyhow::ensure!(self.feeding.eat_range > 0.0, "Eat range must be positive");
        anyhow::ensure!(
            self.feeding.attack_range > 0.0,
            "Attack range must be positive"
        );
        anyhow::ensure!(
            self.feeding.hunger_threshold >= 0.0 && self.feeding.hunger_threshold <= 1.0,
            "Hunger threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.feeding.hunt_threshold >= 0.0 && self.feeding.hunt_threshold <= 1.0,
            "Hunt threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.feeding.bite_weight > 0.0,
            "Bite weight must be positive"
        );
        anyhow::ensure!(
            self.feeding.eat_cooldown >= 0.0 && self.feeding.hunt_cooldown >= 0.0,
            "Cooldowns must be non-negative"
        );

        anyhow::ensure!(
            self.metabolism.hunger_rate >= 0.0,
            "Hunger rate must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.critical_energy < self.metabolism.low_energy,
            "Critical energy must be below low energy"
        );

        anyhow::ensure!(
            self.reproduction.energy_cost >= 0.0 && self.reproduction.energy_cost <= 1.0,
            "Reproduction energy cost must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.reproduction.offspring_health > 0.0 && self.reproduction.offspring_health <= 1.0,
            "Offspring health must be in (0.0, 1.0]"
        );

        anyhow::ensure!(self.player.reach > 0.0, "Player reach must be positive");
        anyhow::ensure!(
            self.player.plant_species.kind() == EntityKind::Plant,
            "Player plant species must be a plant"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Stable hash of every tunable, for tagging run output.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.perception).as_bytes());
        hasher.update(format!("{:?}", self.movement).as_bytes());
        hasher.update(format!("{:?}", self.feeding).as_bytes());
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.reproduction).as_bytes());
        hasher.update(format!("{:?}", self.player).as_bytes());
        hasher.update(self.world.tick_rate.to_le_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.dt() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_tick_rate() {
        let config = SimConfig {
            world: WorldConfig {
                tick_rate: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_force_band() {
        let config = SimConfig {
            movement: MovementConfig {
                min_force: 10.0,
                max_force: 5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_hunger_threshold() {
        let config = SimConfig {
            feeding: FeedingConfig {
                hunger_threshold: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [world]
            seed = 7

            [feeding]
            bite_weight = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.tick_rate, 30);
        assert!((config.feeding.bite_weight - 0.1).abs() < 1e-12);
        assert!((config.feeding.eat_range - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = SimConfig::default();
        let mut b = SimConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.feeding.bite_weight = 0.2;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
