//! Fixture dungeon for the binary and the integration tests.
//!
//! The real game hands the engine rooms from its own generator. This stands
//! in for it: a row of rooms joined east/west by paired teleporters, each
//! stocked with native species in the 60/30/10 plant/herbivore/carnivore
//! mix.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thicket_data::{Biome, Direction, Entity, EntityId, Position, Rect, Room, RoomId, Teleporter};
use uuid::Uuid;

pub const ROOM_WIDTH: f64 = 800.0;
pub const ROOM_HEIGHT: f64 = 600.0;
/// Horizontal gap between neighbouring rooms in world coordinates.
pub const ROOM_SPACING: f64 = 1000.0;
pub const DOOR_DEPTH: f64 = 20.0;
pub const DOOR_SPAN: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoLayout {
    pub rooms: u32,
    /// Organisms per room before the player.
    pub per_room: usize,
    pub with_player: bool,
}

impl Default for DemoLayout {
    fn default() -> Self {
        Self {
            rooms: 4,
            per_room: 40,
            with_player: true,
        }
    }
}

/// Rooms only, linked in a row.
pub fn rooms(count: u32) -> Vec<Room> {
    (0..count)
        .map(|i| {
            let left = f64::from(i) * ROOM_SPACING;
            let mut room = Room::new(
                RoomId(i),
                Rect::new(left, 0.0, ROOM_WIDTH, ROOM_HEIGHT),
                Biome::ALL[i as usize % Biome::ALL.len()],
            );
            let door_y = (ROOM_HEIGHT - DOOR_SPAN) / 2.0;
            if i > 0 {
                room.teleporters.push(Teleporter {
                    direction: Direction::West,
                    region: Rect::new(left, door_y, DOOR_DEPTH, DOOR_SPAN),
                    connected_room: RoomId(i - 1),
                });
            }
            if i + 1 < count {
                room.teleporters.push(Teleporter {
                    direction: Direction::East,
                    region: Rect::new(
                        left + ROOM_WIDTH - DOOR_DEPTH,
                        door_y,
                        DOOR_DEPTH,
                        DOOR_SPAN,
                    ),
                    connected_room: RoomId(i + 1),
                });
            }
            room
        })
        .collect()
}

/// Rooms plus their initial inhabitants. Same seed, same dungeon.
pub fn generate(seed: u64, layout: DemoLayout) -> (Vec<Room>, Vec<Entity>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rooms = rooms(layout.rooms);

    let mut entities = Vec::new();
    for room in &rooms {
        let inner = room.bounds;
        for k in 0..layout.per_room {
            // 6 plants, 3 herbivores, 1 carnivore per ten, all native.
            let pool = match k % 10 {
                0..=5 => room.biome.native_plants(),
                6..=8 => room.biome.native_herbivores(),
                _ => room.biome.native_carnivores(),
            };
            let Some(&species) = pool.choose(&mut rng) else {
                continue;
            };
            let position = Position::new(
                rng.gen_range(inner.min_x() + 40.0..inner.max_x() - 40.0),
                rng.gen_range(inner.min_y() + 40.0..inner.max_y() - 40.0),
            );
            let id = EntityId(Uuid::from_u128(rng.gen()));
            entities.push(Entity::spawn(id, species, position, room.id));
        }
    }

    if layout.with_player {
        if let Some(first) = rooms.first() {
            let id = EntityId(Uuid::from_u128(rng.gen()));
            entities.push(Entity::player(id, first.bounds.center(), first.id));
        }
    }
    (rooms, entities)
}
