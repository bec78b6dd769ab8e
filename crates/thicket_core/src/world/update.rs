use super::{TickReport, World};
use crate::ai::{CreatureBrain, Decision, NearbyEntity, Perception};
use crate::config::SimConfig;
use crate::dungeon::RoomMap;
use crate::history::LiveEvent;
use crate::lifecycle;
use crate::player::{self, ActionOutcome, CommandContext};
use crate::systems::interaction::{self, InteractionContext};
use crate::systems::reproduction;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use thicket_data::{BehaviorState, Entity, EntityId, EntityKind, LifeState, RoomId, Vec2};

/// Seed for one room's AI pass. Depends only on the world seed, the tick and
/// the room, so the pass gives the same answer however rooms are scheduled.
pub fn room_seed(seed: u64, tick: u64, room: RoomId) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    for v in [tick, u64::from(room.0)] {
        h = (h ^ v).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
    }
    h
}

/// One room's share of the AI pass. Brains are moved in and handed back.
struct RoomBucket {
    room: RoomId,
    members: Vec<(usize, CreatureBrain)>,
}

struct Planned {
    index: usize,
    decision: Decision,
    brain: CreatureBrain,
}

impl World {
    /// Advances the simulation by one fixed step.
    pub fn update(&mut self) -> TickReport {
        let dt = self.config.dt();
        self.update_with_dt(dt)
    }

    /// Advances the simulation by `dt` seconds:
    /// - queued player commands
    /// - aging and metabolism
    /// - per-room AI, clamped to room bounds
    /// - feeding and hunting
    /// - offspring, then removal of the dead and the eaten
    /// - scoring and a fresh snapshot
    pub fn update_with_dt(&mut self, dt: f64) -> TickReport {
        let started = Instant::now();
        self.tick += 1;
        self.time += dt;
        let tick = self.tick;
        let _span = tracing::debug_span!("tick", tick).entered();

        let mut rng =
            ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(tick).wrapping_add(0x5EED));
        let mut events = Vec::new();

        let outcomes = self.pass_player_commands(&mut rng, &mut events);
        self.pass_lifecycle(dt, &mut rng, &mut events);
        self.pass_ai(dt);
        self.pass_interactions(&mut events);

        let born = reproduction::spawn_offspring(
            &mut self.entities,
            &mut self.brains,
            &self.rooms,
            &self.config,
            tick,
            &mut rng,
        );
        events.extend(born.events);
        if born.suppressed > 0 {
            self.metrics
                .add_to_counter("births_suppressed", born.suppressed as u64);
        }

        self.pass_cleanup();
        self.publish();

        let deaths = events
            .iter()
            .filter(|e| matches!(e, LiveEvent::Death { .. }))
            .count();
        self.metrics.record_tick(
            started.elapsed(),
            self.snapshot.counts.total(),
            born.births,
            deaths,
        );

        TickReport {
            tick,
            events,
            outcomes,
            health_tier: self.health_tier,
        }
    }

    fn pass_player_commands(
        &mut self,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<LiveEvent>,
    ) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        while let Some(command) = self.pending.pop_front() {
            let mut ctx = CommandContext {
                rooms: &self.rooms,
                config: &self.config,
                brains: &mut self.brains,
                tick: self.tick,
                rng: &mut *rng,
            };
            let (outcome, produced) = player::execute(&command, &mut self.entities, &mut ctx);
            tracing::debug!(?command, success = outcome.success, "player command");
            self.metrics.increment_counter(if outcome.success {
                "player_actions"
            } else {
                "player_actions_failed"
            });
            events.extend(produced);
            outcomes.push(outcome);
        }
        outcomes
    }

    fn pass_lifecycle(&mut self, dt: f64, rng: &mut ChaCha8Rng, events: &mut Vec<LiveEvent>) {
        for e in self.entities.iter_mut() {
            let mods = self.rooms.modifiers(e.room_id);
            let wants = self
                .brains
                .get(&e.id)
                .is_some_and(|b| b.should_reproduce(e, &mods));
            if let Some(cause) = lifecycle::update(e, dt, &mods, wants, &self.config, rng) {
                tracing::debug!(id = %e.id, %cause, "died");
                events.push(interaction::death_event(e, cause, self.tick));
            }
        }
    }

    fn pass_ai(&mut self, dt: f64) {
        let views: Vec<NearbyEntity> = self.entities.iter().map(NearbyEntity::capture).collect();

        let mut by_room: BTreeMap<RoomId, RoomBucket> = BTreeMap::new();
        let mut room_members: HashMap<RoomId, Vec<usize>> = HashMap::new();
        for (i, e) in self.entities.iter().enumerate() {
            room_members.entry(e.room_id).or_default().push(i);
            if e.kind() == EntityKind::Player || e.state == LifeState::Dead {
                continue;
            }
            if let Some(brain) = self.brains.remove(&e.id) {
                by_room
                    .entry(e.room_id)
                    .or_insert_with(|| RoomBucket {
                        room: e.room_id,
                        members: Vec::new(),
                    })
                    .members
                    .push((i, brain));
            }
        }
        let buckets: Vec<RoomBucket> = by_room.into_values().collect();
        let live: usize = buckets.iter().map(|b| b.members.len()).sum();

        let pass = AiPass {
            entities: &self.entities,
            views: &views,
            room_members: &room_members,
            rooms: &self.rooms,
            config: &self.config,
            seed: self.seed,
            tick: self.tick,
            now: self.time,
            dt,
        };

        #[cfg(feature = "parallel")]
        let planned: Vec<Vec<Planned>> = if live > self.config.world.parallel_threshold {
            buckets.into_par_iter().map(|b| pass.run(b)).collect()
        } else {
            buckets.into_iter().map(|b| pass.run(b)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let planned: Vec<Vec<Planned>> = buckets.into_iter().map(|b| pass.run(b)).collect();

        let mut planned: Vec<Planned> = planned.into_iter().flatten().collect();
        planned.sort_by_key(|p| p.index);
        tracing::debug!(live, rooms = room_members.len(), "ai pass");

        for p in planned {
            let bounds = self.rooms.bounds(self.entities[p.index].room_id);
            let e = &mut self.entities[p.index];
            apply_decision(e, &p.decision, bounds, dt);
            self.brains.insert(e.id, p.brain);
        }
    }

    fn pass_interactions(&mut self, events: &mut Vec<LiveEvent>) {
        let behaviors: HashMap<EntityId, BehaviorState> = self
            .brains
            .iter()
            .map(|(id, b)| (*id, b.behavior()))
            .collect();
        let mut ctx = InteractionContext {
            rooms: &self.rooms,
            config: &self.config,
            behaviors: &behaviors,
            cooldowns: &mut self.cooldowns,
            tick: self.tick,
            now: self.time,
        };
        let result = interaction::resolve(&mut self.entities, &mut ctx);
        self.metrics.add_to_counter("bites", result.bites as u64);
        self.metrics.add_to_counter("attacks", result.attacks as u64);
        self.metrics.add_to_counter("kills", result.kills as u64);
        events.extend(result.events);
    }

    /// Drops every removable entity along with its brain and cooldowns.
    fn pass_cleanup(&mut self) {
        let before = self.entities.len();
        let brains = &mut self.brains;
        let cooldowns = &mut self.cooldowns;
        self.entities.retain(|e| {
            if e.is_removable() {
                brains.remove(&e.id);
                cooldowns.forget(&e.id);
                false
            } else {
                true
            }
        });
        let removed = before - self.entities.len();
        if removed > 0 {
            tracing::debug!(removed, "cleanup");
        }
    }
}

/// Shared, read-only inputs of the AI pass.
struct AiPass<'a> {
    entities: &'a [Entity],
    views: &'a [NearbyEntity],
    room_members: &'a HashMap<RoomId, Vec<usize>>,
    rooms: &'a RoomMap,
    config: &'a SimConfig,
    seed: u64,
    tick: u64,
    now: f64,
    dt: f64,
}

impl AiPass<'_> {
    fn run(&self, bucket: RoomBucket) -> Vec<Planned> {
        let room = bucket.room;
        let mut rng = ChaCha8Rng::seed_from_u64(room_seed(self.seed, self.tick, room));
        let members = self.room_members.get(&room).map_or(&[][..], |v| v.as_slice());
        let radius = self.config.perception.nearby_radius;
        let base = Perception {
            now: self.now,
            dt: self.dt,
            bounds: self.rooms.bounds(room),
            modifiers: self.rooms.modifiers(room),
            nearby: &[],
        };

        let mut nearby = Vec::new();
        bucket
            .members
            .into_iter()
            .map(|(index, mut brain)| {
                let me = &self.entities[index];
                nearby.clear();
                nearby.extend(
                    members
                        .iter()
                        .filter(|&&j| j != index)
                        .map(|&j| self.views[j])
                        .filter(|v| me.position.distance_to(&v.position) <= radius),
                );
                let perception = Perception {
                    nearby: &nearby,
                    ..base
                };
                let decision = brain.update(me, &perception, self.config, &mut rng);
                Planned {
                    index,
                    decision,
                    brain,
                }
            })
            .collect()
    }
}

/// Writes one decision back: position clamped to the room (velocity loses
/// the clamped component), behaviour energy drawn, target committed.
fn apply_decision(e: &mut Entity, d: &Decision, bounds: Option<thicket_data::Rect>, dt: f64) {
    let mut position = d.position;
    let mut velocity = d.velocity;
    if !position.is_finite() {
        position = e.position;
        velocity = Vec2::ZERO;
    }
    if let Some(b) = bounds {
        let clamped = b.clamp(position);
        if clamped.x != position.x {
            velocity.x = 0.0;
        }
        if clamped.y != position.y {
            velocity.y = 0.0;
        }
        position = clamped;
    }
    e.position = position;
    e.velocity = velocity;
    e.change_energy(-d.energy_cost * dt);
    if e.state == LifeState::Fleeing && d.behavior != BehaviorState::Fleeing {
        e.state = LifeState::Alive;
    }
    e.set_current_target(d.target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use thicket_data::{Biome, Position, Rect, Room, Species};

    #[test]
    fn test_room_seed_varies() {
        assert_ne!(room_seed(1, 1, RoomId(0)), room_seed(1, 1, RoomId(1)));
        assert_ne!(room_seed(1, 1, RoomId(0)), room_seed(1, 2, RoomId(0)));
        assert_eq!(room_seed(7, 3, RoomId(2)), room_seed(7, 3, RoomId(2)));
    }

    #[test]
    fn test_decision_clamped_to_room() {
        let mut e = Entity::spawn(
            EntityId::from_u128(1),
            Species::Rabbit,
            Position::new(5.0, 50.0),
            RoomId(0),
        );
        let d = Decision {
            position: Position::new(-3.0, 60.0),
            velocity: Vec2::new(-40.0, 10.0),
            behavior: BehaviorState::Wandering,
            target: None,
            energy_cost: 1.0,
        };
        apply_decision(&mut e, &d, Some(Rect::new(0.0, 0.0, 100.0, 100.0)), 0.5);
        assert_eq!(e.position, Position::new(0.0, 60.0));
        assert_eq!(e.velocity, Vec2::new(0.0, 10.0));
        assert!((e.energy - (e.max_energy - 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_tick_advances_and_publishes() {
        let rooms = vec![Room::new(
            RoomId(0),
            Rect::new(0.0, 0.0, 400.0, 400.0),
            Biome::Meadow,
        )];
        let entities = vec![
            Entity::spawn(
                EntityId::from_u128(1),
                Species::Fern,
                Position::new(100.0, 100.0),
                RoomId(0),
            ),
            Entity::spawn(
                EntityId::from_u128(2),
                Species::Rabbit,
                Position::new(200.0, 200.0),
                RoomId(0),
            ),
        ];
        let mut world = World::new(SimConfig::default(), rooms, entities).unwrap();
        let report = world.update();
        assert_eq!(report.tick, 1);
        assert_eq!(world.snapshot().tick, 1);
        assert!((world.time() - 1.0 / 30.0).abs() < 1e-12);
        assert_eq!(world.metrics().tick_count(), 1);
        let fern = world.entity(EntityId::from_u128(1)).unwrap();
        assert_eq!(fern.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_commands_applied_at_tick_start() {
        let rooms = vec![Room::new(
            RoomId(0),
            Rect::new(0.0, 0.0, 400.0, 400.0),
            Biome::Meadow,
        )];
        let player = Entity::player(EntityId::from_u128(1), Position::new(10.0, 10.0), RoomId(0));
        let mut world = World::new(SimConfig::default(), rooms, vec![player]).unwrap();
        world.queue_player(crate::player::PlayerCommand::Move(Position::new(50.0, 60.0)));
        assert_eq!(world.player().unwrap().position, Position::new(10.0, 10.0));
        let report = world.update();
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].success);
        assert_eq!(world.player().unwrap().position, Position::new(50.0, 60.0));
        assert_eq!(world.pending_commands(), 0);
    }
}
