use super::explore::Explorer;
use super::motion::{self, Steer};
use super::{Decision, NearbyEntity, Perception};
use crate::behavior::{BehaviorContext, StateMachine, Thresholds, HERBIVORE_STATES};
use crate::biome::BiomeModifiers;
use crate::config::SimConfig;
use crate::memory::{CreatureMemory, MemoryKind, DEDUPE_RADIUS};
use crate::personality::PersonalityTraits;
use crate::steering::{self, Neighbor};
use rand::Rng;
use thicket_data::{BehaviorState, Entity, EntityId, EntityKind, Position, Vec2};

/// Flee weights use `1 / max(d, MIN_FLEE_DISTANCE)`.
const MIN_FLEE_DISTANCE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct HerbivoreAi {
    machine: StateMachine,
    memory: CreatureMemory,
    personality: PersonalityTraits,
    explorer: Explorer,
    target: Option<EntityId>,
}

/// Neighbours sorted into the roles a grazer cares about.
struct Surroundings<'a> {
    predators: Vec<&'a NearbyEntity>,
    plants: Vec<&'a NearbyEntity>,
    allies: Vec<Neighbor>,
}

impl<'a> Surroundings<'a> {
    fn partition(pos: Position, detection: f64, nearby: &'a [NearbyEntity]) -> Self {
        let mut s = Surroundings {
            predators: Vec::new(),
            plants: Vec::new(),
            allies: Vec::new(),
        };
        for n in nearby {
            match n.kind {
                EntityKind::Carnivore
                    if n.is_alive() && pos.distance_to(&n.position) <= detection =>
                {
                    s.predators.push(n)
                }
                EntityKind::Plant if n.is_edible() => s.plants.push(n),
                EntityKind::Herbivore if n.is_alive() => s.allies.push(n.neighbor()),
                _ => {}
            }
        }
        s
    }

    fn plant(&self, id: EntityId) -> Option<&'a NearbyEntity> {
        self.plants.iter().copied().find(|p| p.id == id)
    }

    fn nearest_plant(&self, pos: Position) -> Option<&'a NearbyEntity> {
        self.plants.iter().copied().min_by(|a, b| {
            pos.distance_to(&a.position)
                .total_cmp(&pos.distance_to(&b.position))
        })
    }
}

impl HerbivoreAi {
    pub fn new<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        Self {
            machine: StateMachine::new(
                HERBIVORE_STATES,
                Thresholds {
                    critical_energy: config.metabolism.critical_energy,
                    low_energy: config.metabolism.low_energy,
                    hungry: config.feeding.hunger_threshold,
                },
            ),
            memory: CreatureMemory::new(config.perception.memory_capacity),
            personality: PersonalityTraits::new_random_with_rng(rng),
            explorer: Explorer::default(),
            target: None,
        }
    }

    pub fn behavior(&self) -> BehaviorState {
        self.machine.current()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn memory(&self) -> &CreatureMemory {
        &self.memory
    }

    pub fn personality(&self) -> &PersonalityTraits {
        &self.personality
    }

    /// Healthy, rested and not hungry.
    pub fn should_reproduce(&self, me: &Entity, modifiers: &BiomeModifiers) -> bool {
        me.is_alive() && me.hunger_ratio() < 0.5 && super::should_reproduce(me, modifiers)
    }

    pub fn should_eat(&self, me: &Entity, config: &SimConfig) -> bool {
        super::should_eat(me, config, self.target.is_some())
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        me: &Entity,
        perception: &Perception<'_>,
        config: &SimConfig,
        rng: &mut R,
    ) -> Decision {
        let pos = me.position;
        let vel = me.velocity;
        let now = perception.now;
        let mods = perception.modifiers;
        let speed = me.speed() * mods.speed;
        let detection = me
            .species
            .map_or(config.perception.nearby_radius, |s| s.profile().detection_range);

        // The entity's target is authoritative: the resolver may have
        // committed or cleared it since the last tick.
        self.target = me.current_target();

        let around = Surroundings::partition(pos, detection, perception.nearby);
        for p in &around.predators {
            self.memory
                .remember(MemoryKind::Predator, p.position, now, Some(p.id));
        }
        if let Some(food) = around.nearest_plant(pos) {
            self.memory
                .remember(MemoryKind::Food, food.position, now, Some(food.id));
        }

        if let Some(t) = self.target {
            if around.plant(t).is_none() {
                self.target = None;
            }
        }

        let eat_range = config.feeding.eat_range;
        let ctx = BehaviorContext {
            hunger: me.hunger_ratio(),
            energy: me.energy_ratio(),
            health: me.health_ratio(),
            predators: around.predators.len(),
            food: around.plants.len(),
            prey: 0,
            allies: around.allies.len(),
            near_food: around
                .plants
                .iter()
                .any(|p| pos.distance_to(&p.position) <= eat_range),
            near_prey: false,
            committed: self.target.is_some(),
        };
        let state = self.machine.update(&ctx, perception.dt);

        let mut max_speed = speed;
        let mut steer = match state {
            BehaviorState::Fleeing => {
                self.target = None;
                let panic = self.personality.panic_multiplier() * config.movement.panic_multiplier
                    / 2.0;
                max_speed = speed * panic.max(1.0);
                Steer::Force(flee_sum(pos, vel, &around.predators, max_speed))
            }
            BehaviorState::Grazing => {
                self.graze(pos, vel, &around, speed, me, perception, config, rng)
            }
            BehaviorState::Resting | BehaviorState::Sleeping => Steer::Brake,
            BehaviorState::Socializing => {
                let centroid = pos.offset(steering::cohesion(
                    pos,
                    &around.allies,
                    config.perception.nearby_radius,
                ));
                Steer::Force(steering::arrive(
                    pos,
                    centroid,
                    speed * 0.5,
                    config.movement.slowing_radius,
                    vel,
                ))
            }
            _ => self.roam(state, pos, vel, &around, speed, me, perception, config, rng),
        };

        if let Steer::Force(force) = &mut steer {
            if state != BehaviorState::Fleeing && !around.allies.is_empty() {
                let w = super::flock_weight(
                    around.allies.len(),
                    self.personality.flock_scale(),
                    config,
                );
                let flock = super::flock_force(pos, vel, &around.allies, speed, config);
                *force = *force * (1.0 - w) + flock * w;
            }
            *force += super::wall_force(pos, perception.bounds.as_ref(), speed, config);
        }

        let (position, velocity) =
            motion::integrate(pos, vel, steer, max_speed, perception.dt, &config.movement);

        tracing::trace!(id = %me.id, %state, target = ?self.target, "herbivore decision");

        Decision {
            position,
            velocity,
            behavior: state,
            target: self.target,
            energy_cost: self.machine.energy_cost(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn graze<R: Rng + ?Sized>(
        &mut self,
        pos: Position,
        vel: Vec2,
        around: &Surroundings<'_>,
        speed: f64,
        me: &Entity,
        perception: &Perception<'_>,
        config: &SimConfig,
        rng: &mut R,
    ) -> Steer {
        if self.target.is_none() {
            self.target = around.nearest_plant(pos).map(|p| p.id);
        }
        let Some(plant) = self.target.and_then(|t| around.plant(t)) else {
            return self.roam(
                BehaviorState::Exploring,
                pos,
                vel,
                around,
                speed,
                me,
                perception,
                config,
                rng,
            );
        };
        if pos.distance_to(&plant.position) <= config.feeding.eat_range {
            Steer::Brake
        } else {
            Steer::Force(steering::arrive(
                pos,
                plant.position,
                speed,
                config.movement.slowing_radius,
                vel,
            ))
        }
    }

    /// Exploring and wandering: remembered food first when hungry, then
    /// systematic exploration or a free wander.
    #[allow(clippy::too_many_arguments)]
    fn roam<R: Rng + ?Sized>(
        &mut self,
        state: BehaviorState,
        pos: Position,
        vel: Vec2,
        around: &Surroundings<'_>,
        speed: f64,
        me: &Entity,
        perception: &Perception<'_>,
        config: &SimConfig,
        rng: &mut R,
    ) -> Steer {
        let scale = self.personality.explore_scale();
        if around.plants.is_empty() && self.should_eat(me, config) {
            let window =
                config.perception.food_memory_window * perception.modifiers.memory_retention;
            if let Some(spot) = self
                .memory
                .nearest_recent(MemoryKind::Food, pos, perception.now, window)
                .map(|e| e.position)
            {
                if pos.distance_to(&spot) <= config.feeding.eat_range {
                    // Arrived and nothing is here any more.
                    self.memory
                        .forget_near(MemoryKind::Food, spot, DEDUPE_RADIUS * 2.0);
                } else {
                    self.explorer.reset();
                    return Steer::Force(
                        steering::arrive(pos, spot, speed, config.movement.slowing_radius, vel)
                            * scale,
                    );
                }
            }
        }
        let force = if state == BehaviorState::Exploring {
            self.explorer.steer(
                pos,
                vel,
                perception.bounds.as_ref(),
                speed,
                perception.dt,
                &config.movement,
                rng,
            )
        } else {
            self.explorer.wander(vel, speed * 0.6, &config.movement, rng)
        };
        Steer::Force(force * scale)
    }
}

/// Inverse-distance weighted flight from every predator at `flee_speed`.
fn flee_sum(pos: Position, vel: Vec2, predators: &[&NearbyEntity], flee_speed: f64) -> Vec2 {
    let mut away = Vec2::ZERO;
    for p in predators {
        let d = pos.distance_to(&p.position).max(MIN_FLEE_DISTANCE);
        away += p.position.to(&pos).normalize() / d;
    }
    if away.is_zero() {
        return Vec2::ZERO;
    }
    away.normalize() * flee_speed - vel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use thicket_data::{LifeState, Rect, RoomId, Species};

    fn rabbit_at(x: f64, y: f64) -> Entity {
        Entity::spawn(
            EntityId::from_u128(1),
            Species::Rabbit,
            Position::new(x, y),
            RoomId(0),
        )
    }

    fn seen(id: u128, species: Species, x: f64, y: f64) -> NearbyEntity {
        let e = Entity::spawn(EntityId::from_u128(id), species, Position::new(x, y), RoomId(0));
        NearbyEntity::capture(&e)
    }

    fn perception(nearby: &[NearbyEntity]) -> Perception<'_> {
        Perception {
            now: 0.0,
            dt: 1.0 / 30.0,
            bounds: Some(Rect::new(0.0, 0.0, 400.0, 400.0)),
            modifiers: BiomeModifiers::NEUTRAL,
            nearby,
        }
    }

    #[test]
    fn test_flees_from_fox_even_when_starving() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ai = HerbivoreAi::new(&config, &mut rng);
        let mut rabbit = rabbit_at(200.0, 200.0);
        rabbit.change_hunger(1e9);
        let nearby = [
            seen(2, Species::Fox, 260.0, 200.0),
            seen(3, Species::Moss, 210.0, 200.0),
        ];
        let d = ai.update(&rabbit, &perception(&nearby), &config, &mut rng);
        assert_eq!(d.behavior, BehaviorState::Fleeing);
        assert!(d.velocity.x < 0.0);
        assert_eq!(d.target, None);
    }

    #[test]
    fn test_grazing_target_is_sticky() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut ai = HerbivoreAi::new(&config, &mut rng);
        let mut rabbit = rabbit_at(100.0, 100.0);
        rabbit.change_hunger(rabbit.max_hunger() * 0.9);
        let far = seen(10, Species::Moss, 150.0, 100.0);
        let nearby = [far];
        let d = ai.update(&rabbit, &perception(&nearby), &config, &mut rng);
        assert_eq!(d.behavior, BehaviorState::Grazing);
        assert_eq!(d.target, Some(far.id));

        // A closer plant appears; the committed target stays.
        rabbit.set_current_target(d.target);
        let closer = seen(11, Species::Moss, 110.0, 100.0);
        let nearby = [far, closer];
        let d = ai.update(&rabbit, &perception(&nearby), &config, &mut rng);
        assert_eq!(d.target, Some(far.id));

        // Once it is gone the nearest remaining plant is picked.
        let nearby = [closer];
        let d = ai.update(&rabbit, &perception(&nearby), &config, &mut rng);
        assert_eq!(d.target, Some(closer.id));
    }

    #[test]
    fn test_stops_within_eat_range() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ai = HerbivoreAi::new(&config, &mut rng);
        let mut rabbit = rabbit_at(100.0, 100.0);
        rabbit.change_hunger(rabbit.max_hunger());
        let nearby = [seen(10, Species::Moss, 105.0, 100.0)];
        let d = ai.update(&rabbit, &perception(&nearby), &config, &mut rng);
        assert_eq!(d.velocity, Vec2::ZERO);
        assert_eq!(d.position, rabbit.position);
    }

    #[test]
    fn test_carcass_plants_still_count_as_food() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ai = HerbivoreAi::new(&config, &mut rng);
        let mut rabbit = rabbit_at(100.0, 100.0);
        rabbit.change_hunger(rabbit.max_hunger());
        let mut wilted = seen(10, Species::Fern, 140.0, 100.0);
        wilted.state = LifeState::Dead;
        let d = ai.update(&rabbit, &perception(&[wilted]), &config, &mut rng);
        assert_eq!(d.target, Some(wilted.id));
    }

    #[test]
    fn test_isolated_rabbit_keeps_its_health() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ai = HerbivoreAi::new(&config, &mut rng);
        let mut rabbit = rabbit_at(200.0, 200.0);
        let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
        for _ in 0..300 {
            let d = ai.update(&rabbit, &perception(&[]), &config, &mut rng);
            rabbit.position = bounds.clamp(d.position);
            rabbit.velocity = d.velocity;
            assert!(rabbit.position.is_finite());
        }
        assert_eq!(rabbit.health, rabbit.max_health);
        assert!(ai.memory().is_empty());
    }
}
