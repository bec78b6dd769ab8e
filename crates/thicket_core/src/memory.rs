//! Bounded recency memory owned by one creature brain.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thicket_data::{EntityId, Position};

/// Sightings closer than this to an existing entry refresh it instead of
/// adding a new one.
pub const DEDUPE_RADIUS: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryKind {
    Food,
    Predator,
    Prey,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub position: Position,
    /// Simulation time of the sighting, seconds.
    pub time: f64,
    pub subject: Option<EntityId>,
}

impl MemoryEntry {
    pub fn age(&self, now: f64) -> f64 {
        (now - self.time).max(0.0)
    }
}

/// Three FIFO lists, oldest at the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureMemory {
    capacity: usize,
    food: VecDeque<MemoryEntry>,
    predators: VecDeque<MemoryEntry>,
    prey: VecDeque<MemoryEntry>,
}

impl CreatureMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            food: VecDeque::with_capacity(capacity),
            predators: VecDeque::with_capacity(capacity),
            prey: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn list(&self, kind: MemoryKind) -> &VecDeque<MemoryEntry> {
        match kind {
            MemoryKind::Food => &self.food,
            MemoryKind::Predator => &self.predators,
            MemoryKind::Prey => &self.prey,
        }
    }

    fn list_mut(&mut self, kind: MemoryKind) -> &mut VecDeque<MemoryEntry> {
        match kind {
            MemoryKind::Food => &mut self.food,
            MemoryKind::Predator => &mut self.predators,
            MemoryKind::Prey => &mut self.prey,
        }
    }

    /// Records a sighting. A matching entry (same subject, or within
    /// [`DEDUPE_RADIUS`]) is refreshed and moved to the back.
    pub fn remember(
        &mut self,
        kind: MemoryKind,
        position: Position,
        now: f64,
        subject: Option<EntityId>,
    ) {
        let capacity = self.capacity;
        let list = self.list_mut(kind);
        let existing = list.iter().position(|e| {
            (subject.is_some() && e.subject == subject)
                || e.position.distance_to(&position) < DEDUPE_RADIUS
        });
        if let Some(idx) = existing {
            list.remove(idx);
        }
        list.push_back(MemoryEntry {
            position,
            time: now,
            subject,
        });
        while list.len() > capacity {
            list.pop_front();
        }
    }

    /// Newest entry no older than `window` seconds.
    pub fn recent(&self, kind: MemoryKind, now: f64, window: f64) -> Option<&MemoryEntry> {
        self.list(kind).iter().rev().find(|e| e.age(now) <= window)
    }

    /// Closest entry to `from` no older than `window` seconds.
    pub fn nearest_recent(
        &self,
        kind: MemoryKind,
        from: Position,
        now: f64,
        window: f64,
    ) -> Option<&MemoryEntry> {
        self.list(kind)
            .iter()
            .filter(|e| e.age(now) <= window)
            .min_by(|a, b| {
                a.position
                    .distance_to(&from)
                    .total_cmp(&b.position.distance_to(&from))
            })
    }

    /// Drops entries within `radius` of `position`.
    pub fn forget_near(&mut self, kind: MemoryKind, position: Position, radius: f64) {
        self.list_mut(kind)
            .retain(|e| e.position.distance_to(&position) >= radius);
    }

    pub fn forget_subject(&mut self, kind: MemoryKind, subject: EntityId) {
        self.list_mut(kind).retain(|e| e.subject != Some(subject));
    }

    pub fn len(&self, kind: MemoryKind) -> usize {
        self.list(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.food.is_empty() && self.predators.is_empty() && self.prey.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut memory = CreatureMemory::new(3);
        for i in 0..5 {
            memory.remember(
                MemoryKind::Food,
                Position::new(i as f64 * 100.0, 0.0),
                i as f64,
                None,
            );
        }
        assert_eq!(memory.len(MemoryKind::Food), 3);
        let newest = memory.recent(MemoryKind::Food, 4.0, 10.0).unwrap();
        assert_eq!(newest.position.x, 400.0);
        let oldest_kept = memory
            .nearest_recent(MemoryKind::Food, Position::new(0.0, 0.0), 4.0, 10.0)
            .unwrap();
        assert_eq!(oldest_kept.position.x, 200.0);
    }

    #[test]
    fn test_nearby_sighting_refreshes() {
        let mut memory = CreatureMemory::new(4);
        memory.remember(MemoryKind::Predator, Position::new(0.0, 0.0), 1.0, None);
        memory.remember(MemoryKind::Predator, Position::new(5.0, 0.0), 8.0, None);
        assert_eq!(memory.len(MemoryKind::Predator), 1);
        assert_eq!(
            memory.recent(MemoryKind::Predator, 8.0, 0.5).unwrap().time,
            8.0
        );
    }

    #[test]
    fn test_recency_window() {
        let mut memory = CreatureMemory::new(4);
        memory.remember(MemoryKind::Food, Position::new(0.0, 0.0), 0.0, None);
        assert!(memory.recent(MemoryKind::Food, 30.0, 45.0).is_some());
        assert!(memory.recent(MemoryKind::Food, 60.0, 45.0).is_none());
    }

    #[test]
    fn test_forget() {
        let mut memory = CreatureMemory::new(4);
        let prey = EntityId::from_u128(7);
        memory.remember(MemoryKind::Prey, Position::new(0.0, 0.0), 0.0, Some(prey));
        memory.remember(MemoryKind::Food, Position::new(50.0, 0.0), 0.0, None);
        memory.forget_subject(MemoryKind::Prey, prey);
        memory.forget_near(MemoryKind::Food, Position::new(45.0, 0.0), 10.0);
        assert!(memory.is_empty());
    }
}
