//! The simulation world and its fixed-timestep driver.

use crate::ai::CreatureBrain;
use crate::config::SimConfig;
use crate::dungeon::RoomMap;
use crate::error::{Result, SimError};
use crate::factory;
use crate::history::LiveEvent;
use crate::metrics::Metrics;
use crate::player::{ActionOutcome, PlayerCommand};
use crate::systems::interaction::Cooldowns;
use crate::systems::{ecological, reproduction};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thicket_data::{
    Entity, EntityId, EntityKind, EntitySnapshot, HealthTier, PopulationCounts, Position, Room,
    RoomId, Species, WorldSnapshot,
};

pub mod update;

/// What one tick produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<LiveEvent>,
    /// One per player command applied this tick, in queue order.
    pub outcomes: Vec<ActionOutcome>,
    pub health_tier: HealthTier,
}

pub struct World {
    config: SimConfig,
    rooms: RoomMap,
    entities: Vec<Entity>,
    brains: HashMap<EntityId, CreatureBrain>,
    cooldowns: Cooldowns,
    pending: VecDeque<PlayerCommand>,
    seed: u64,
    tick: u64,
    time: f64,
    health_tier: HealthTier,
    snapshot: Arc<WorldSnapshot>,
    metrics: Metrics,
}

impl World {
    /// Builds a world from generated rooms and their initial inhabitants.
    ///
    /// Fails on a config that does not validate, on bad rooms (see
    /// [`RoomMap::new`]), when an entity claims a room that does not exist,
    /// or when there is more than one player.
    pub fn new(config: SimConfig, rooms: Vec<Room>, entities: Vec<Entity>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        let rooms = RoomMap::new(rooms)?;
        if !rooms.is_connected() {
            tracing::warn!(rooms = rooms.len(), "some rooms are unreachable by teleporter");
        }

        let mut players = 0;
        for e in &entities {
            if !rooms.contains(e.room_id) {
                return Err(SimError::OrphanEntity {
                    entity: e.id,
                    room: e.room_id,
                });
            }
            if e.kind() == EntityKind::Player {
                players += 1;
                if players > 1 {
                    return Err(SimError::DuplicatePlayer);
                }
            }
        }

        let seed = config.world.seed.unwrap_or_else(|| {
            let seed = rand::random();
            tracing::info!(seed, "no seed configured, drew one");
            seed
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let brains: HashMap<EntityId, CreatureBrain> = entities
            .iter()
            .filter_map(|e| factory::brain_for(e, &config, &mut rng).map(|b| (e.id, b)))
            .collect();

        tracing::info!(
            seed,
            rooms = rooms.len(),
            entities = entities.len(),
            fingerprint = %config.fingerprint(),
            "world created"
        );

        let mut world = Self {
            config,
            rooms,
            entities,
            brains,
            cooldowns: Cooldowns::default(),
            pending: VecDeque::new(),
            seed,
            tick: 0,
            time: 0.0,
            health_tier: HealthTier::Critical,
            snapshot: Arc::new(WorldSnapshot::empty()),
            metrics: Metrics::new(),
        };
        world.publish();
        Ok(world)
    }

    /// Queues a command for the start of the next tick.
    pub fn queue_player(&mut self, command: PlayerCommand) {
        self.pending.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Adds a fresh organism, e.g. from a room generator restocking a room.
    pub fn spawn(
        &mut self,
        species: Species,
        position: Position,
        room: RoomId,
    ) -> Result<EntityId> {
        let bounds = self.rooms.bounds(room).ok_or(SimError::UnknownRoom(room))?;
        let population = reproduction::room_populations(&self.entities);
        if population.get(&room).copied().unwrap_or(0) >= self.config.world.max_room_population {
            return Err(SimError::RoomFull(room));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(
            self.seed ^ self.tick.rotate_left(32) ^ self.entities.len() as u64,
        );
        let id = reproduction::next_id(&mut rng);
        let brain = factory::create_brain(species.kind(), species, &self.config, &mut rng);
        self.brains.insert(id, brain);
        self.entities
            .push(Entity::spawn(id, species, bounds.clamp(position), room));
        Ok(id)
    }

    /// The latest published snapshot. Cheap to clone and safe to hand to a
    /// renderer thread.
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rooms(&self) -> &RoomMap {
        &self.rooms
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind() == EntityKind::Player)
    }

    pub fn brain(&self, id: EntityId) -> Option<&CreatureBrain> {
        self.brains.get(&id)
    }

    pub fn brain_count(&self) -> usize {
        self.brains.len()
    }

    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts::from_entities(&self.entities)
    }

    pub fn health_tier(&self) -> HealthTier {
        self.health_tier
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation seconds elapsed.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Scores the population and swaps in a fresh snapshot.
    fn publish(&mut self) {
        let counts = PopulationCounts::from_entities(&self.entities);
        self.health_tier = ecological::score(&counts);
        let entities = self
            .entities
            .iter()
            .map(|e| EntitySnapshot::capture(e, self.brains.get(&e.id).map(|b| b.behavior())))
            .collect();
        self.snapshot = Arc::new(WorldSnapshot {
            tick: self.tick,
            time: self.time,
            entities,
            counts,
            health_tier: self.health_tier,
        });
    }
}
