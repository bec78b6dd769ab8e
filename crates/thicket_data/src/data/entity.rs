use super::geometry::{Position, Vec2};
use super::room::RoomId;
use super::species::{EntityKind, HuntingStyle, Species};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Hunger capacity per kilogram of body weight.
pub const HUNGER_PER_KG: f64 = 5.0;

/// Unique identity of an entity, assigned at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }

    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// Lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
    Reproducing,
    Fleeing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantBody {
    pub growth_rate: f64,
    pub reproduction_rate: f64,
    /// Nutrition per kilogram eaten.
    pub food_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HerbivoreBody {
    pub speed: f64,
    pub hunger: f64,
    pub max_hunger: f64,
    /// Plant currently being eaten or walked to.
    pub current_target: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarnivoreBody {
    pub speed: f64,
    pub hunger: f64,
    pub max_hunger: f64,
    pub attack_power: f64,
    pub hunting_style: HuntingStyle,
    pub stealth_level: f64,
    pub detection_range: f64,
    /// Herbivore currently being hunted or eaten.
    pub current_target: Option<EntityId>,
}

/// Kind-specific state. The entity's [`EntityKind`] is derived from this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Body {
    Plant(PlantBody),
    Herbivore(HerbivoreBody),
    Carnivore(CarnivoreBody),
    Player,
}

/// A simulated organism or the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub species: Option<Species>,
    pub position: Position,
    pub velocity: Vec2,
    pub health: f64,
    pub max_health: f64,
    pub energy: f64,
    pub max_energy: f64,
    /// Kilograms. Drives food value and hunger capacity.
    pub weight: f64,
    /// Seconds since spawn.
    pub age: f64,
    pub state: LifeState,
    pub room_id: RoomId,
    pub body: Body,
}

impl Entity {
    /// Builds a fresh individual from the species profile.
    pub fn spawn(id: EntityId, species: Species, position: Position, room_id: RoomId) -> Self {
        let p = species.profile();
        let body = match p.kind {
            EntityKind::Plant => Body::Plant(PlantBody {
                growth_rate: p.growth_rate,
                reproduction_rate: p.reproduction_rate,
                food_value: p.food_value_per_kg,
            }),
            EntityKind::Herbivore => Body::Herbivore(HerbivoreBody {
                speed: p.base_speed,
                hunger: 0.0,
                max_hunger: p.weight * HUNGER_PER_KG,
                current_target: None,
            }),
            EntityKind::Carnivore => Body::Carnivore(CarnivoreBody {
                speed: p.base_speed,
                hunger: 0.0,
                max_hunger: p.weight * HUNGER_PER_KG,
                attack_power: p.attack_power,
                hunting_style: p.hunting_style.unwrap_or(HuntingStyle::Chase),
                stealth_level: p.stealth_level,
                detection_range: p.detection_range,
                current_target: None,
            }),
            EntityKind::Player => Body::Player,
        };
        Self {
            id,
            species: Some(species),
            position,
            velocity: Vec2::ZERO,
            health: p.max_health,
            max_health: p.max_health,
            energy: p.max_energy,
            max_energy: p.max_energy,
            weight: p.weight,
            age: 0.0,
            state: LifeState::Alive,
            room_id,
            body,
        }
    }

    pub fn player(id: EntityId, position: Position, room_id: RoomId) -> Self {
        Self {
            id,
            species: None,
            position,
            velocity: Vec2::ZERO,
            health: 100.0,
            max_health: 100.0,
            energy: 100.0,
            max_energy: 100.0,
            weight: 70.0,
            age: 0.0,
            state: LifeState::Alive,
            room_id,
            body: Body::Player,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Plant(_) => EntityKind::Plant,
            Body::Herbivore(_) => EntityKind::Herbivore,
            Body::Carnivore(_) => EntityKind::Carnivore,
            Body::Player => EntityKind::Player,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != LifeState::Dead
    }

    /// The one removal rule: dead, or nothing left to eat.
    pub fn is_removable(&self) -> bool {
        self.state == LifeState::Dead || self.weight <= 0.0
    }

    /// Alive, or a carcass that still carries weight.
    pub fn is_edible(&self) -> bool {
        self.weight > 0.0
    }

    pub fn hunger(&self) -> f64 {
        match &self.body {
            Body::Herbivore(h) => h.hunger,
            Body::Carnivore(c) => c.hunger,
            _ => 0.0,
        }
    }

    pub fn max_hunger(&self) -> f64 {
        match &self.body {
            Body::Herbivore(h) => h.max_hunger,
            Body::Carnivore(c) => c.max_hunger,
            _ => 0.0,
        }
    }

    pub fn hunger_ratio(&self) -> f64 {
        ratio(self.hunger(), self.max_hunger())
    }

    pub fn health_ratio(&self) -> f64 {
        ratio(self.health, self.max_health)
    }

    pub fn energy_ratio(&self) -> f64 {
        ratio(self.energy, self.max_energy)
    }

    /// Adds to hunger, clamped into `[0, max_hunger]`.
    pub fn change_hunger(&mut self, delta: f64) {
        match &mut self.body {
            Body::Herbivore(h) => h.hunger = (h.hunger + delta).clamp(0.0, h.max_hunger),
            Body::Carnivore(c) => c.hunger = (c.hunger + delta).clamp(0.0, c.max_hunger),
            _ => {}
        }
    }

    pub fn change_energy(&mut self, delta: f64) {
        self.energy = (self.energy + delta).clamp(0.0, self.max_energy);
    }

    pub fn change_health(&mut self, delta: f64) {
        self.health = (self.health + delta).min(self.max_health);
    }

    pub fn current_target(&self) -> Option<EntityId> {
        match &self.body {
            Body::Herbivore(h) => h.current_target,
            Body::Carnivore(c) => c.current_target,
            _ => None,
        }
    }

    pub fn set_current_target(&mut self, target: Option<EntityId>) {
        match &mut self.body {
            Body::Herbivore(h) => h.current_target = target,
            Body::Carnivore(c) => c.current_target = target,
            _ => {}
        }
    }

    pub fn speed(&self) -> f64 {
        match &self.body {
            Body::Herbivore(h) => h.speed,
            Body::Carnivore(c) => c.speed,
            _ => 0.0,
        }
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
