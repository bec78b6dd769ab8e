//! Aging, metabolism and death detection, run for every entity at the start
//! of each tick.

use crate::biome::BiomeModifiers;
use crate::config::SimConfig;
use crate::history::DeathCause;
use rand::Rng;
use thicket_data::{Body, Entity, LifeState};

/// Advances one entity by `dt` seconds. `wants_reproduce` is the brain's
/// verdict; the lifecycle adds the age gate and the probabilistic roll.
///
/// Returns the cause when this call killed the entity. Energy running out
/// never hurts health: only starvation does.
pub fn update<R: Rng + ?Sized>(
    entity: &mut Entity,
    dt: f64,
    modifiers: &BiomeModifiers,
    wants_reproduce: bool,
    config: &SimConfig,
    rng: &mut R,
) -> Option<DeathCause> {
    if entity.state == LifeState::Dead {
        return None;
    }
    entity.age += dt;

    let cause = match entity.body {
        Body::Player => return None,
        Body::Plant(plant) => {
            entity.change_health(plant.growth_rate * modifiers.food_efficiency * dt);
            entity.change_energy(config.metabolism.plant_energy_regen * dt);
            DeathCause::Withered
        }
        Body::Herbivore(_) | Body::Carnivore(_) => {
            let m = &config.metabolism;
            entity.change_hunger(entity.max_hunger() * m.hunger_rate * dt);
            if entity.hunger() >= entity.max_hunger() {
                entity.health -= m.starvation_damage * dt;
            } else if entity.hunger_ratio() < m.regen_hunger_ceiling {
                entity.change_health(m.health_regen * dt);
            }
            DeathCause::Starvation
        }
    };

    if entity.health <= 0.0 {
        entity.health = 0.0;
        entity.state = LifeState::Dead;
        return Some(cause);
    }

    if entity.state == LifeState::Alive
        && wants_reproduce
        && entity.age >= config.reproduction.min_age
    {
        let rate = entity
            .species
            .map_or(0.0, |s| s.profile().reproduction_rate);
        let p = (rate * modifiers.reproduction_rate * dt).clamp(0.0, 1.0);
        if rng.gen_bool(p) {
            entity.state = LifeState::Reproducing;
        }
    }
    None
}
