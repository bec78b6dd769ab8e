use super::geometry::{Position, Rect};
use super::species::Biome;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// Trigger region at a room edge leading to another room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Teleporter {
    pub direction: Direction,
    pub region: Rect,
    pub connected_room: RoomId,
}

/// Spatial partition: bounds plus biome. Entities never span rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub bounds: Rect,
    pub biome: Biome,
    #[serde(default)]
    pub teleporters: Vec<Teleporter>,
}

impl Room {
    pub fn new(id: RoomId, bounds: Rect, biome: Biome) -> Self {
        Self {
            id,
            bounds,
            biome,
            teleporters: Vec::new(),
        }
    }

    /// The teleporter whose trigger region contains `pos`, if any.
    pub fn teleporter_at(&self, pos: &Position) -> Option<&Teleporter> {
        self.teleporters.iter().find(|t| t.region.contains(pos))
    }

    /// The teleporter leading to `room`, if this room links there.
    pub fn teleporter_to(&self, room: RoomId) -> Option<&Teleporter> {
        self.teleporters.iter().find(|t| t.connected_room == room)
    }
}
