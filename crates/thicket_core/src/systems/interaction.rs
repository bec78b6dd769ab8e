//! Who eats whom. Runs once per tick after every brain has moved its
//! entity, in entity-list order.

use crate::ai;
use crate::config::SimConfig;
use crate::dungeon::RoomMap;
use crate::history::{DeathCause, LiveEvent};
use std::collections::HashMap;
use thicket_data::{BehaviorState, Body, Entity, EntityId, EntityKind, LifeState, RoomId};

/// Weight residue below this snaps to exactly zero.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Simulation time of each creature's last bite and last attack.
#[derive(Debug, Clone, Default)]
pub struct Cooldowns {
    eat: HashMap<EntityId, f64>,
    hunt: HashMap<EntityId, f64>,
}

impl Cooldowns {
    fn ready(map: &HashMap<EntityId, f64>, id: EntityId, now: f64, cooldown: f64) -> bool {
        map.get(&id)
            .map_or(true, |last| now - last + WEIGHT_EPSILON >= cooldown)
    }

    pub fn can_eat(&self, id: EntityId, now: f64, cooldown: f64) -> bool {
        Self::ready(&self.eat, id, now, cooldown)
    }

    pub fn can_attack(&self, id: EntityId, now: f64, cooldown: f64) -> bool {
        Self::ready(&self.hunt, id, now, cooldown)
    }

    pub fn forget(&mut self, id: &EntityId) {
        self.eat.remove(id);
        self.hunt.remove(id);
    }

    pub fn len(&self) -> usize {
        self.eat.len().max(self.hunt.len())
    }

    pub fn is_empty(&self) -> bool {
        self.eat.is_empty() && self.hunt.is_empty()
    }
}

pub struct InteractionContext<'a> {
    pub rooms: &'a RoomMap,
    pub config: &'a SimConfig,
    /// This tick's behavior per creature; fleeing grazers do not stop to eat.
    pub behaviors: &'a HashMap<EntityId, BehaviorState>,
    pub cooldowns: &'a mut Cooldowns,
    pub tick: u64,
    pub now: f64,
}

#[derive(Debug, Default)]
pub struct InteractionResult {
    pub events: Vec<LiveEvent>,
    pub bites: usize,
    pub attacks: usize,
    pub kills: usize,
}

/// Removes up to `amount` kg from `food`, snapping residue to zero.
/// Returns the kilograms actually removed.
pub fn take_bite(food: &mut Entity, amount: f64) -> f64 {
    let bite = amount.min(food.weight).max(0.0);
    food.weight -= bite;
    if food.weight < WEIGHT_EPSILON {
        food.weight = 0.0;
    }
    bite
}

fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = entities.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = entities.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

pub(crate) fn food_value(entity: &Entity) -> f64 {
    match &entity.body {
        Body::Plant(p) => p.food_value,
        _ => entity
            .species
            .map_or(0.0, |s| s.profile().food_value_per_kg),
    }
}

pub(crate) fn species_weight(entity: &Entity) -> f64 {
    entity.species.map_or(entity.weight, |s| s.profile().weight)
}

pub(crate) fn death_event(e: &Entity, cause: DeathCause, tick: u64) -> LiveEvent {
    LiveEvent::Death {
        id: e.id,
        species: e.species,
        kind: e.kind(),
        age: e.age,
        cause,
        tick,
    }
}

/// Runs herbivore feeding and carnivore hunting for every live creature.
pub fn resolve(entities: &mut [Entity], ctx: &mut InteractionContext<'_>) -> InteractionResult {
    let mut result = InteractionResult::default();
    let index: HashMap<EntityId, usize> =
        entities.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
    let mut by_room: HashMap<RoomId, Vec<usize>> = HashMap::new();
    for (i, e) in entities.iter().enumerate() {
        by_room.entry(e.room_id).or_default().push(i);
    }

    for i in 0..entities.len() {
        if entities[i].state == LifeState::Dead {
            continue;
        }
        let peers = by_room
            .get(&entities[i].room_id)
            .map_or(&[][..], |v| v.as_slice());
        match entities[i].kind() {
            EntityKind::Herbivore => graze(entities, i, &index, peers, ctx, &mut result),
            EntityKind::Carnivore => hunt(entities, i, &index, peers, ctx, &mut result),
            _ => {}
        }
    }
    result
}

fn is_food(e: &Entity, kind: EntityKind, room: RoomId) -> bool {
    e.kind() == kind && e.is_edible() && e.room_id == room
}

fn nearest_in_range(
    entities: &[Entity],
    me: usize,
    peers: &[usize],
    kind: EntityKind,
    range: f64,
) -> Option<usize> {
    let pos = entities[me].position;
    let room = entities[me].room_id;
    peers
        .iter()
        .copied()
        .filter(|&j| j != me && is_food(&entities[j], kind, room))
        .map(|j| (j, pos.distance_to(&entities[j].position)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(j, _)| j)
}

/// Resolves the committed target, clearing it when the food is gone.
fn committed_target(
    entities: &mut [Entity],
    i: usize,
    index: &HashMap<EntityId, usize>,
    kind: EntityKind,
) -> Option<usize> {
    let target = entities[i].current_target()?;
    let room = entities[i].room_id;
    let found = index
        .get(&target)
        .copied()
        .filter(|&j| j != i && is_food(&entities[j], kind, room));
    if found.is_none() {
        entities[i].set_current_target(None);
    }
    found
}

fn graze(
    entities: &mut [Entity],
    i: usize,
    index: &HashMap<EntityId, usize>,
    peers: &[usize],
    ctx: &mut InteractionContext<'_>,
    result: &mut InteractionResult,
) {
    let config = ctx.config;
    let cfg = &config.feeding;
    let id = entities[i].id;
    if ctx.behaviors.get(&id) == Some(&BehaviorState::Fleeing) {
        return;
    }
    if !ctx.cooldowns.can_eat(id, ctx.now, cfg.eat_cooldown) {
        return;
    }

    let j = match committed_target(entities, i, index, EntityKind::Plant) {
        Some(j) => {
            // Still walking over.
            if entities[i].position.distance_to(&entities[j].position) > cfg.eat_range {
                return;
            }
            j
        }
        None => {
            if !ai::should_eat(&entities[i], config, false) {
                return;
            }
            let Some(j) = nearest_in_range(entities, i, peers, EntityKind::Plant, cfg.eat_range)
            else {
                return;
            };
            entities[i].set_current_target(Some(entities[j].id));
            j
        }
    };

    let efficiency = ctx.rooms.modifiers(entities[i].room_id).food_efficiency;
    let (eater, plant) = pair_mut(entities, i, j);
    let bitten = take_bite(plant, cfg.bite_weight);
    let full_weight = species_weight(plant);
    if full_weight > 0.0 {
        // Health falls at half the weight-loss fraction.
        plant.health = (plant.health - plant.max_health * 0.5 * bitten / full_weight).max(0.0);
    }
    eater.change_hunger(-bitten * food_value(plant) * efficiency);
    eater.change_energy(cfg.energy_per_bite);
    ctx.cooldowns.eat.insert(eater.id, ctx.now);
    result.bites += 1;

    if plant.weight <= 0.0 {
        let was_alive = plant.state != LifeState::Dead;
        plant.state = LifeState::Dead;
        eater.set_current_target(None);
        tracing::debug!(plant = %plant.id, eater = %eater.id, "plant eaten away");
        result.events.push(LiveEvent::PlantDepleted {
            id: plant.id,
            eater: Some(eater.id),
            tick: ctx.tick,
        });
        if was_alive {
            result
                .events
                .push(death_event(plant, DeathCause::Consumed, ctx.tick));
        }
    }
}

fn hunt(
    entities: &mut [Entity],
    i: usize,
    index: &HashMap<EntityId, usize>,
    peers: &[usize],
    ctx: &mut InteractionContext<'_>,
    result: &mut InteractionResult,
) {
    let config = ctx.config;
    let cfg = &config.feeding;
    let id = entities[i].id;
    let mods = ctx.rooms.modifiers(entities[i].room_id);

    let j = match committed_target(entities, i, index, EntityKind::Herbivore) {
        Some(j) => j,
        None => {
            if !ai::should_hunt(&entities[i], &mods, config) {
                return;
            }
            let Some(j) =
                nearest_in_range(entities, i, peers, EntityKind::Herbivore, cfg.attack_range)
            else {
                return;
            };
            entities[i].set_current_target(Some(entities[j].id));
            j
        }
    };
    if entities[i].position.distance_to(&entities[j].position) > cfg.attack_range {
        return;
    }

    let (hunter, prey) = pair_mut(entities, i, j);

    if prey.state == LifeState::Dead {
        // Carcass: gradual consumption.
        if !ctx.cooldowns.can_eat(id, ctx.now, cfg.eat_cooldown) {
            return;
        }
        let bitten = take_bite(prey, cfg.carcass_bite_weight);
        hunter.change_hunger(-bitten * food_value(prey) * mods.food_efficiency);
        ctx.cooldowns.eat.insert(id, ctx.now);
        result.bites += 1;
        if prey.weight <= 0.0 {
            hunter.set_current_target(None);
        }
        return;
    }

    if !ctx.cooldowns.can_attack(id, ctx.now, cfg.hunt_cooldown) {
        return;
    }
    let attack_power = match &hunter.body {
        Body::Carnivore(c) => c.attack_power,
        _ => 0.0,
    };
    let damage = attack_power * mods.aggression;
    prey.health -= damage;
    ctx.cooldowns.hunt.insert(id, ctx.now);
    result.attacks += 1;

    let killed = prey.health <= 0.0;
    result.events.push(LiveEvent::Attack {
        attacker: id,
        target: prey.id,
        damage,
        killed,
        tick: ctx.tick,
    });

    if killed {
        prey.health = 0.0;
        prey.state = LifeState::Dead;
        prey.set_current_target(None);
        result.kills += 1;
        result
            .events
            .push(death_event(prey, DeathCause::Predation, ctx.tick));
        // The kill is eaten on the spot; what is left goes with the carcass.
        let bitten = take_bite(prey, cfg.kill_feast_weight);
        hunter.change_hunger(-bitten * food_value(prey) * mods.food_efficiency);
        hunter.set_current_target(None);
        tracing::debug!(hunter = %id, prey = %prey.id, "kill");
    } else {
        prey.state = LifeState::Fleeing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_data::{Biome, Position, Rect, Room, Species};

    fn rooms() -> RoomMap {
        RoomMap::new(vec![Room::new(
            RoomId(0),
            Rect::new(0.0, 0.0, 500.0, 500.0),
            Biome::Unknown,
        )])
        .unwrap()
    }

    fn spawn(id: u128, species: Species, x: f64) -> Entity {
        Entity::spawn(
            EntityId::from_u128(id),
            species,
            Position::new(x, 100.0),
            RoomId(0),
        )
    }

    fn run(
        entities: &mut [Entity],
        config: &SimConfig,
        cooldowns: &mut Cooldowns,
        now: f64,
    ) -> InteractionResult {
        let rooms = rooms();
        let behaviors = HashMap::new();
        let mut ctx = InteractionContext {
            rooms: &rooms,
            config,
            behaviors: &behaviors,
            cooldowns,
            tick: 1,
            now,
        };
        resolve(entities, &mut ctx)
    }

    #[test]
    fn test_bite_snaps_to_zero() {
        let mut moss = spawn(1, Species::Moss, 0.0);
        moss.weight = 0.05 + 1e-12;
        let bitten = take_bite(&mut moss, 0.05);
        assert!((bitten - 0.05).abs() < 1e-9);
        assert_eq!(moss.weight, 0.0);
    }

    #[test]
    fn test_sated_herbivore_does_not_start_eating() {
        let config = SimConfig::default();
        let mut cooldowns = Cooldowns::default();
        let mut entities = vec![spawn(1, Species::Rabbit, 100.0), spawn(2, Species::Moss, 105.0)];
        let r = run(&mut entities, &config, &mut cooldowns, 0.0);
        assert_eq!(r.bites, 0);
        assert_eq!(entities[1].weight, Species::Moss.profile().weight);
    }

    #[test]
    fn test_committed_eater_continues_below_threshold() {
        let config = SimConfig::default();
        let mut cooldowns = Cooldowns::default();
        let mut entities = vec![spawn(1, Species::Rabbit, 100.0), spawn(2, Species::Moss, 105.0)];
        let target_id = entities[1].id;
        entities[0].set_current_target(Some(target_id));
        let r = run(&mut entities, &config, &mut cooldowns, 0.0);
        assert_eq!(r.bites, 1);
        // Cooldown blocks the next bite until 200ms have passed.
        let r = run(&mut entities, &config, &mut cooldowns, 0.1);
        assert_eq!(r.bites, 0);
        let r = run(&mut entities, &config, &mut cooldowns, 0.2);
        assert_eq!(r.bites, 1);
    }

    #[test]
    fn test_kill_then_feast() {
        let mut config = SimConfig::default();
        config.feeding.hunt_cooldown = 0.0;
        let mut cooldowns = Cooldowns::default();
        let mut entities = vec![spawn(1, Species::Wolf, 100.0), spawn(2, Species::Rabbit, 110.0)];
        let max_hunger = entities[0].max_hunger();
        entities[0].change_hunger(max_hunger);
        let hunger_before = entities[0].hunger();

        let r = run(&mut entities, &config, &mut cooldowns, 0.0);
        assert_eq!(r.attacks, 1);
        assert_eq!(entities[1].state, LifeState::Fleeing);

        let mut now = 0.0;
        while entities[1].state != LifeState::Dead {
            now += 1.0;
            run(&mut entities, &config, &mut cooldowns, now);
        }
        assert!(entities[1].is_removable());
        assert!(entities[1].weight < Species::Rabbit.profile().weight);
        assert!(entities[0].hunger() < hunger_before);
        assert_eq!(entities[0].current_target(), None);
    }

    #[test]
    fn test_rooms_isolate_feeding() {
        let config = SimConfig::default();
        let mut cooldowns = Cooldowns::default();
        let mut entities = vec![spawn(1, Species::Rabbit, 100.0), spawn(2, Species::Moss, 101.0)];
        entities[0].change_hunger(1e9);
        entities[1].room_id = RoomId(7);
        let r = run(&mut entities, &config, &mut cooldowns, 0.0);
        assert_eq!(r.bites, 0);
    }
}
