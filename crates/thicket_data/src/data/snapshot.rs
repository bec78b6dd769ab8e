use super::entity::{Entity, EntityId, LifeState};
use super::geometry::Position;
use super::room::RoomId;
use super::species::{EntityKind, Species};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a creature's brain is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BehaviorState {
    Wandering,
    Exploring,
    Grazing,
    Hunting,
    Fleeing,
    Resting,
    Sleeping,
    Socializing,
    Growing,
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_ascii_lowercase())
    }
}

/// Ordinal ecosystem classification, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthTier {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_ascii_lowercase())
    }
}

/// Alive-entity counts by class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

impl PopulationCounts {
    pub const fn new(plants: usize, herbivores: usize, carnivores: usize) -> Self {
        Self {
            plants,
            herbivores,
            carnivores,
        }
    }

    pub fn total(&self) -> usize {
        self.plants + self.herbivores + self.carnivores
    }

    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut counts = Self::default();
        for e in entities.into_iter().filter(|e| !e.is_removable()) {
            match e.kind() {
                EntityKind::Plant => counts.plants += 1,
                EntityKind::Herbivore => counts.herbivores += 1,
                EntityKind::Carnivore => counts.carnivores += 1,
                EntityKind::Player => {}
            }
        }
        counts
    }
}

/// Read-only view of one entity for renderers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub species: Option<Species>,
    pub room_id: RoomId,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub energy: f64,
    pub hunger: f64,
    pub weight: f64,
    pub state: LifeState,
    pub behavior: Option<BehaviorState>,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity, behavior: Option<BehaviorState>) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind(),
            species: entity.species,
            room_id: entity.room_id,
            position: entity.position,
            health: entity.health,
            max_health: entity.max_health,
            energy: entity.energy,
            hunger: entity.hunger(),
            weight: entity.weight,
            state: entity.state,
            behavior,
        }
    }
}

/// Immutable per-tick picture of the whole simulation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    /// Simulation seconds elapsed.
    pub time: f64,
    pub entities: Vec<EntitySnapshot>,
    pub counts: PopulationCounts,
    pub health_tier: HealthTier,
}

impl WorldSnapshot {
    pub fn empty() -> Self {
        Self {
            tick: 0,
            time: 0.0,
            entities: Vec::new(),
            counts: PopulationCounts::default(),
            health_tier: HealthTier::Critical,
        }
    }

    pub fn find(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }
}
