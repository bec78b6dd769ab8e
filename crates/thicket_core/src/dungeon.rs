//! Room set and teleporter graph handed over by the dungeon generator.

use crate::biome::BiomeModifiers;
use crate::error::{Result, SimError};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::BTreeMap;
use thicket_data::{Direction, Position, Rect, Room, RoomId, Vec2};

/// Gap between a reverse teleporter's trigger region and the arrival point.
pub const ARRIVAL_GAP: f64 = 10.0;

/// Rooms keyed by id, plus a directed graph with one edge per teleporter.
#[derive(Debug, Clone)]
pub struct RoomMap {
    rooms: BTreeMap<RoomId, Room>,
    graph: DiGraph<RoomId, Direction>,
    nodes: BTreeMap<RoomId, NodeIndex>,
}

impl RoomMap {
    /// Builds the map, rejecting duplicate ids, degenerate bounds, and
    /// teleporters to unknown rooms or without a reverse teleporter in the
    /// target room.
    pub fn new(rooms: Vec<Room>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut nodes = BTreeMap::new();
        let mut by_id = BTreeMap::new();
        for room in rooms {
            if !room.bounds.is_valid() {
                return Err(SimError::InvalidBounds(room.id));
            }
            if by_id.contains_key(&room.id) {
                return Err(SimError::DuplicateRoom(room.id));
            }
            by_id.insert(room.id, room);
        }
        let rooms = by_id;
        for id in rooms.keys() {
            nodes.insert(*id, graph.add_node(*id));
        }
        for room in rooms.values() {
            for t in &room.teleporters {
                let Some(&to) = nodes.get(&t.connected_room) else {
                    return Err(SimError::UnknownRoom(t.connected_room));
                };
                graph.add_edge(nodes[&room.id], to, t.direction);
            }
        }
        for room in rooms.values() {
            for t in &room.teleporters {
                let from = nodes[&room.id];
                let to = nodes[&t.connected_room];
                if graph.find_edge(to, from).is_none() {
                    return Err(SimError::UnpairedTeleporter {
                        from: room.id,
                        to: t.connected_room,
                        direction: t.direction,
                    });
                }
            }
        }
        tracing::debug!(
            rooms = rooms.len(),
            links = graph.edge_count(),
            "room graph validated"
        );
        Ok(Self {
            rooms,
            graph,
            nodes,
        })
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    pub fn bounds(&self, id: RoomId) -> Option<Rect> {
        self.rooms.get(&id).map(|r| r.bounds)
    }

    /// Neutral when the room is unknown.
    pub fn modifiers(&self, id: RoomId) -> BiomeModifiers {
        self.rooms
            .get(&id)
            .map_or(BiomeModifiers::NEUTRAL, |r| BiomeModifiers::for_biome(r.biome))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms one teleporter hop away, in id order.
    pub fn neighbors(&self, id: RoomId) -> Vec<RoomId> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut out: Vec<RoomId> = self.graph.neighbors(node).map(|n| self.graph[n]).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Every room reachable from `start` by teleporters, `start` included.
    pub fn reachable_from(&self, start: RoomId) -> Vec<RoomId> {
        let Some(&node) = self.nodes.get(&start) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, node);
        let mut out = Vec::new();
        while let Some(n) = bfs.next(&self.graph) {
            out.push(self.graph[n]);
        }
        out.sort();
        out
    }

    pub fn is_connected(&self) -> bool {
        match self.rooms.keys().next() {
            Some(first) => self.reachable_from(*first).len() == self.rooms.len(),
            None => true,
        }
    }

    /// Where a player standing at `pos` in `room` ends up, if `pos` is inside
    /// a teleporter: just inside the paired teleporter of the connected room.
    pub fn teleport(&self, room: RoomId, pos: &Position) -> Option<(RoomId, Position)> {
        let here = self.rooms.get(&room)?;
        let door = here.teleporter_at(pos)?;
        let there = self.rooms.get(&door.connected_room)?;
        let back = there.teleporter_to(room)?;
        let inward = match back.direction {
            Direction::North => Vec2::new(0.0, 1.0),
            Direction::South => Vec2::new(0.0, -1.0),
            Direction::West => Vec2::new(1.0, 0.0),
            Direction::East => Vec2::new(-1.0, 0.0),
        };
        let reach = back.region.width.max(back.region.height) + ARRIVAL_GAP;
        let arrival = there
            .bounds
            .clamp(back.region.center().offset(inward * reach));
        Some((there.id, arrival))
    }
}
