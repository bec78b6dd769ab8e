pub mod macros;

use thicket_core::{SimConfig, World};
use thicket_data::{Biome, Entity, EntityId, Position, Rect, Room, RoomId, Species};

/// Ids handed out by [`WorldBuilder`], in insertion order starting at 1.
pub fn id(n: u128) -> EntityId {
    EntityId::from_u128(n)
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: SimConfig,
    rooms: Vec<Room>,
    entities: Vec<Entity>,
    next_id: u128,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.world.seed = Some(42);
        Self {
            config,
            rooms: Vec::new(),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// A 600x400 room with neutral biome modifiers.
    pub fn with_plain_room(self, id: u32) -> Self {
        let left = f64::from(id) * 1000.0;
        self.with_room(Room::new(
            RoomId(id),
            Rect::new(left, 0.0, 600.0, 400.0),
            Biome::Unknown,
        ))
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_species(self, species: Species, x: f64, y: f64) -> Self {
        self.with_species_in(species, x, y, RoomId(0))
    }

    pub fn with_species_in(mut self, species: Species, x: f64, y: f64, room: RoomId) -> Self {
        let e = Entity::spawn(id(self.next_id), species, Position::new(x, y), room);
        self.next_id += 1;
        self.entities.push(e);
        self
    }

    /// Spawns `species` and lets `edit` adjust it before it enters the world.
    pub fn with_species_edit<F>(mut self, species: Species, x: f64, y: f64, edit: F) -> Self
    where
        F: FnOnce(&mut Entity),
    {
        let mut e = Entity::spawn(id(self.next_id), species, Position::new(x, y), RoomId(0));
        edit(&mut e);
        self.next_id += 1;
        self.entities.push(e);
        self
    }

    pub fn with_player(mut self, x: f64, y: f64) -> Self {
        let e = Entity::player(id(self.next_id), Position::new(x, y), RoomId(0));
        self.next_id += 1;
        self.entities.push(e);
        self
    }

    pub fn build(self) -> World {
        World::new(self.config, self.rooms, self.entities)
            .expect("Failed to create world in test builder")
    }
}
