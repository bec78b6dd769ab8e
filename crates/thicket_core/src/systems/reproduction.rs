use crate::ai::CreatureBrain;
use crate::config::SimConfig;
use crate::dungeon::RoomMap;
use crate::factory;
use crate::history::LiveEvent;
use rand::Rng;
use std::collections::HashMap;
use thicket_data::{Entity, EntityId, EntityKind, LifeState, Position, RoomId, Vec2};
use uuid::Uuid;

pub struct ReproductionResult {
    pub events: Vec<LiveEvent>,
    pub births: usize,
    pub suppressed: usize,
}

/// Fresh id drawn from the seeded RNG so runs stay reproducible.
pub fn next_id<R: Rng + ?Sized>(rng: &mut R) -> EntityId {
    EntityId(Uuid::from_u128(rng.gen()))
}

/// Live organisms per room, the player excluded.
pub fn room_populations(entities: &[Entity]) -> HashMap<RoomId, usize> {
    let mut counts = HashMap::new();
    for e in entities
        .iter()
        .filter(|e| !e.is_removable() && e.kind() != EntityKind::Player)
    {
        *counts.entry(e.room_id).or_insert(0) += 1;
    }
    counts
}

/// Spawns one offspring per `Reproducing` entity and returns the parent to
/// `Alive`. A full room suppresses the birth but still resets the parent.
pub fn spawn_offspring<R: Rng + ?Sized>(
    entities: &mut Vec<Entity>,
    brains: &mut HashMap<EntityId, CreatureBrain>,
    rooms: &RoomMap,
    config: &SimConfig,
    tick: u64,
    rng: &mut R,
) -> ReproductionResult {
    let mut result = ReproductionResult {
        events: Vec::new(),
        births: 0,
        suppressed: 0,
    };
    let mut population = room_populations(entities);
    let cap = config.world.max_room_population;
    let cfg = &config.reproduction;

    let parents: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.state == LifeState::Reproducing)
        .map(|(i, _)| i)
        .collect();

    for i in parents {
        entities[i].state = LifeState::Alive;
        let Some(species) = entities[i].species else {
            continue;
        };
        let room = entities[i].room_id;
        let count = population.entry(room).or_insert(0);
        if *count >= cap {
            result.suppressed += 1;
            tracing::debug!(%room, cap, "room full, birth suppressed");
            continue;
        }

        let offset = if entities[i].kind() == EntityKind::Plant {
            cfg.plant_offspring_offset
        } else {
            cfg.offspring_offset
        };
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let distance = rng.gen_range(0.5..=1.0) * offset;
        let raw = entities[i].position.offset(Vec2::from_angle(angle) * distance);
        let position: Position = rooms.bounds(room).map_or(raw, |b| b.clamp(raw));

        let id = next_id(rng);
        let mut child = Entity::spawn(id, species, position, room);
        child.health = child.max_health * cfg.offspring_health;
        child.energy = child.max_energy * cfg.offspring_energy;

        let parent = &mut entities[i];
        parent.change_energy(-parent.max_energy * cfg.energy_cost);

        let brain = factory::create_brain(species.kind(), species, config, rng);
        brains.insert(id, brain);
        result.events.push(LiveEvent::Birth {
            id,
            parent_id: Some(parent.id),
            species,
            room,
            tick,
        });
        entities.push(child);
        *count += 1;
        result.births += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use thicket_data::{Biome, Rect, Room, Species};

    fn map() -> RoomMap {
        RoomMap::new(vec![Room::new(
            RoomId(0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Biome::Meadow,
        )])
        .unwrap()
    }

    #[test]
    fn test_offspring_spawned_inside_room() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut parent = Entity::spawn(
            EntityId::from_u128(1),
            Species::Fern,
            Position::new(1.0, 1.0),
            RoomId(0),
        );
        parent.state = LifeState::Reproducing;
        let mut entities = vec![parent];
        let mut brains = HashMap::new();
        let r = spawn_offspring(&mut entities, &mut brains, &map(), &config, 5, &mut rng);
        assert_eq!(r.births, 1);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].state, LifeState::Alive);
        let child = &entities[1];
        assert_ne!(child.id, entities[0].id);
        assert_eq!(child.species, Some(Species::Fern));
        assert!(Rect::new(0.0, 0.0, 100.0, 100.0).contains(&child.position));
        assert!(brains.contains_key(&child.id));
        assert!(entities[0].energy < entities[0].max_energy);
    }

    #[test]
    fn test_full_room_suppresses_birth() {
        let mut config = SimConfig::default();
        config.world.max_room_population = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut parent = Entity::spawn(
            EntityId::from_u128(1),
            Species::Rabbit,
            Position::new(50.0, 50.0),
            RoomId(0),
        );
        parent.state = LifeState::Reproducing;
        let mut entities = vec![parent];
        let mut brains = HashMap::new();
        let r = spawn_offspring(&mut entities, &mut brains, &map(), &config, 5, &mut rng);
        assert_eq!(r.births, 0);
        assert_eq!(r.suppressed, 1);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].state, LifeState::Alive);
    }
}
