//! Per-creature brains.
//!
//! One strategy per creature class. A brain is created once at spawn by
//! [`crate::factory::create_brain`] and lives in the world's arena until the
//! entity is removed. Brains never see the world directly: each tick they get
//! a read-only [`Perception`] of same-room neighbours and return a
//! [`Decision`] that the driver applies.

pub mod carnivore;
pub mod explore;
pub mod herbivore;
pub mod motion;
pub mod plant;

use crate::biome::BiomeModifiers;
use crate::config::SimConfig;
use crate::steering::{self, Neighbor};
use rand::Rng;
use thicket_data::{
    BehaviorState, Entity, EntityId, EntityKind, LifeState, Position, Rect, Species, Vec2,
};

pub use carnivore::CarnivoreAi;
pub use herbivore::HerbivoreAi;
pub use plant::PlantAi;

/// Read-only view of a neighbour, captured before the AI pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub species: Option<Species>,
    pub position: Position,
    pub velocity: Vec2,
    pub weight: f64,
    pub state: LifeState,
}

impl NearbyEntity {
    pub fn capture(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind(),
            species: entity.species,
            position: entity.position,
            velocity: entity.velocity,
            weight: entity.weight,
            state: entity.state,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != LifeState::Dead
    }

    /// Alive with weight, or a carcass with residual weight.
    pub fn is_edible(&self) -> bool {
        self.weight > 0.0
    }

    pub fn neighbor(&self) -> Neighbor {
        Neighbor::new(self.position, self.velocity)
    }
}

/// Everything a brain may look at this tick.
#[derive(Debug, Clone, Copy)]
pub struct Perception<'a> {
    /// Simulation time, seconds.
    pub now: f64,
    pub dt: f64,
    /// Room bounds; `None` when the room is unknown.
    pub bounds: Option<Rect>,
    pub modifiers: BiomeModifiers,
    /// Same-room entities within the perception radius, excluding self.
    pub nearby: &'a [NearbyEntity],
}

/// A brain's output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub position: Position,
    pub velocity: Vec2,
    pub behavior: BehaviorState,
    pub target: Option<EntityId>,
    /// Energy per second drawn by the chosen behavior.
    pub energy_cost: f64,
}

impl Decision {
    pub fn stay(entity: &Entity, behavior: BehaviorState) -> Self {
        Self {
            position: entity.position,
            velocity: Vec2::ZERO,
            behavior,
            target: None,
            energy_cost: 0.0,
        }
    }
}

/// Health at 80% of max and energy at 70% of max scaled by the biome's
/// reproduction multiplier.
pub fn should_reproduce(entity: &Entity, modifiers: &BiomeModifiers) -> bool {
    entity.health >= 0.8 * entity.max_health
        && entity.energy >= 0.7 * modifiers.reproduction_rate * entity.max_energy
}

/// Hungry enough to start a meal, or already committed to one.
pub fn should_eat(entity: &Entity, config: &SimConfig, committed: bool) -> bool {
    committed || entity.hunger_ratio() >= config.feeding.hunger_threshold
}

/// Hunger scaled by biome aggression reaches the hunt threshold.
pub fn should_hunt(entity: &Entity, modifiers: &BiomeModifiers, config: &SimConfig) -> bool {
    entity.hunger_ratio() * modifiers.aggression >= config.feeding.hunt_threshold
}

/// Blend weight for flocking: `min(cap, allies x per_neighbor)`, scaled by
/// sociability and re-capped.
pub fn flock_weight(allies: usize, sociability_scale: f64, config: &SimConfig) -> f64 {
    let m = &config.movement;
    let base = (allies as f64 * m.ally_weight_per_neighbor).min(m.ally_weight_cap);
    (base * sociability_scale).min(m.ally_weight_cap)
}

/// Reynolds triad over `allies`, sized to `speed`.
pub fn flock_force(
    pos: Position,
    velocity: Vec2,
    allies: &[Neighbor],
    speed: f64,
    config: &SimConfig,
) -> Vec2 {
    let r = config.movement.flock_radius;
    let sep = steering::separation(pos, allies, r).with_length(1.5);
    let align = steering::alignment(pos, allies, r).with_length(1.0);
    let coh = steering::cohesion(pos, allies, r).with_length(1.0);
    (sep + align + coh) * speed - velocity
}

/// Inward push near room edges, sized to `speed`.
pub fn wall_force(pos: Position, bounds: Option<&Rect>, speed: f64, config: &SimConfig) -> Vec2 {
    match bounds {
        Some(b) => {
            steering::avoid_walls(pos, b, config.movement.wall_margin)
                * (speed * config.movement.wall_weight)
        }
        None => Vec2::ZERO,
    }
}

/// A brain bound to one entity for its whole life.
#[derive(Debug, Clone)]
pub enum CreatureBrain {
    Plant(PlantAi),
    Herbivore(HerbivoreAi),
    Carnivore(CarnivoreAi),
}

impl CreatureBrain {
    pub fn kind(&self) -> EntityKind {
        match self {
            CreatureBrain::Plant(_) => EntityKind::Plant,
            CreatureBrain::Herbivore(_) => EntityKind::Herbivore,
            CreatureBrain::Carnivore(_) => EntityKind::Carnivore,
        }
    }

    pub fn behavior(&self) -> BehaviorState {
        match self {
            CreatureBrain::Plant(_) => BehaviorState::Growing,
            CreatureBrain::Herbivore(ai) => ai.behavior(),
            CreatureBrain::Carnivore(ai) => ai.behavior(),
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        me: &Entity,
        perception: &Perception<'_>,
        config: &SimConfig,
        rng: &mut R,
    ) -> Decision {
        match self {
            CreatureBrain::Plant(ai) => ai.update(me),
            CreatureBrain::Herbivore(ai) => ai.update(me, perception, config, rng),
            CreatureBrain::Carnivore(ai) => ai.update(me, perception, config, rng),
        }
    }

    pub fn should_reproduce(&self, me: &Entity, modifiers: &BiomeModifiers) -> bool {
        match self {
            CreatureBrain::Plant(ai) => ai.should_reproduce(me, modifiers),
            CreatureBrain::Herbivore(ai) => ai.should_reproduce(me, modifiers),
            CreatureBrain::Carnivore(ai) => ai.should_reproduce(me, modifiers),
        }
    }
}
