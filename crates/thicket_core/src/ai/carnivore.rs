use super::explore::Explorer;
use super::motion::{self, Steer};
use super::{Decision, NearbyEntity, Perception};
use crate::behavior::{BehaviorContext, StateMachine, Thresholds, CARNIVORE_STATES};
use crate::biome::BiomeModifiers;
use crate::config::SimConfig;
use crate::memory::{CreatureMemory, MemoryKind, DEDUPE_RADIUS};
use crate::personality::PersonalityTraits;
use crate::steering::{self, Neighbor};
use rand::Rng;
use thicket_data::{BehaviorState, Body, Entity, EntityId, EntityKind, HuntingStyle, Position, Vec2};

/// Stealth hunters creep at this fraction of their speed until close.
const STEALTH_CREEP: f64 = 0.5;
/// Stealth hunters sprint once within this many attack ranges.
const STEALTH_SPRINT_RANGES: f64 = 2.5;

#[derive(Debug, Clone)]
pub struct CarnivoreAi {
    machine: StateMachine,
    memory: CreatureMemory,
    personality: PersonalityTraits,
    explorer: Explorer,
    target: Option<EntityId>,
}

struct Hunter {
    style: HuntingStyle,
    stealth: f64,
    detection: f64,
}

impl Hunter {
    fn of(me: &Entity) -> Self {
        match &me.body {
            Body::Carnivore(c) => Hunter {
                style: c.hunting_style,
                stealth: c.stealth_level,
                detection: c.detection_range,
            },
            _ => Hunter {
                style: HuntingStyle::Chase,
                stealth: 0.0,
                detection: 0.0,
            },
        }
    }
}

struct Surroundings<'a> {
    /// Live herbivores within detection range.
    prey: Vec<&'a NearbyEntity>,
    /// Dead herbivores with weight left.
    carcasses: Vec<&'a NearbyEntity>,
    /// Any edible herbivore in perception, for sticky-target checks.
    trackable: Vec<&'a NearbyEntity>,
    allies: Vec<Neighbor>,
}

impl<'a> Surroundings<'a> {
    fn partition(pos: Position, detection: f64, nearby: &'a [NearbyEntity]) -> Self {
        let mut s = Surroundings {
            prey: Vec::new(),
            carcasses: Vec::new(),
            trackable: Vec::new(),
            allies: Vec::new(),
        };
        for n in nearby {
            match n.kind {
                EntityKind::Herbivore if n.is_edible() => {
                    s.trackable.push(n);
                    if !n.is_alive() {
                        s.carcasses.push(n);
                    } else if pos.distance_to(&n.position) <= detection {
                        s.prey.push(n);
                    }
                }
                EntityKind::Carnivore if n.is_alive() => s.allies.push(n.neighbor()),
                _ => {}
            }
        }
        s
    }

    fn tracked(&self, id: EntityId) -> Option<&'a NearbyEntity> {
        self.trackable.iter().copied().find(|p| p.id == id)
    }
}

fn nearest<'a>(pos: Position, list: &[&'a NearbyEntity]) -> Option<&'a NearbyEntity> {
    list.iter().copied().min_by(|a, b| {
        pos.distance_to(&a.position)
            .total_cmp(&pos.distance_to(&b.position))
    })
}

fn farthest<'a>(pos: Position, list: &[&'a NearbyEntity]) -> Option<&'a NearbyEntity> {
    list.iter().copied().max_by(|a, b| {
        pos.distance_to(&a.position)
            .total_cmp(&pos.distance_to(&b.position))
    })
}

impl CarnivoreAi {
    pub fn new<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        Self {
            machine: StateMachine::new(
                CARNIVORE_STATES,
                Thresholds {
                    critical_energy: config.metabolism.critical_energy,
                    low_energy: config.metabolism.low_energy,
                    hungry: config.feeding.hunt_threshold,
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

    pub fn should_reproduce(&self, me: &Entity, modifiers: &BiomeModifiers) -> bool {
        me.is_alive() && me.hunger_ratio() < 0.5 && super::should_reproduce(me, modifiers)
    }

    pub fn should_hunt(&self, me: &Entity, modifiers: &BiomeModifiers, config: &SimConfig) -> bool {
        self.target.is_some() || super::should_hunt(me, modifiers, config)
    }

    /// Picks prey by hunting style. Carcasses in view always come first.
    fn select_target(
        &self,
        pos: Position,
        style: HuntingStyle,
        around: &Surroundings<'_>,
    ) -> Option<EntityId> {
        if let Some(c) = nearest(pos, &around.carcasses) {
            return Some(c.id);
        }
        let pick = match style {
            // Farthest prey in range is the least likely to notice.
            HuntingStyle::Stealth => farthest(pos, &around.prey),
            HuntingStyle::Ambush | HuntingStyle::Chase => nearest(pos, &around.prey),
        };
        pick.map(|p| p.id)
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
        let hunter = Hunter::of(me);
        let tracking =
            hunter.detection * config.perception.tracking_range_mult * mods.territory_size;

        self.target = me.current_target();

        let around = Surroundings::partition(pos, hunter.detection, perception.nearby);
        for p in &around.prey {
            self.memory.remember(MemoryKind::Prey, p.position, now, Some(p.id));
        }

        // Sticky: kept until the prey is gone, eaten away, or out of tracking
        // range.
        if let Some(t) = self.target {
            let keep = around
                .tracked(t)
                .is_some_and(|p| pos.distance_to(&p.position) <= tracking);
            if !keep {
                self.memory.forget_subject(MemoryKind::Prey, t);
                self.target = None;
            }
        }

        let attack_range = config.feeding.attack_range;
        let allies = if mods.pack_behavior { around.allies.len() } else { 0 };
        let ctx = BehaviorContext {
            hunger: me.hunger_ratio(),
            energy: me.energy_ratio(),
            health: me.health_ratio(),
            predators: 0,
            food: around.carcasses.len(),
            prey: around.prey.len() + around.carcasses.len(),
            allies,
            near_food: around
                .carcasses
                .iter()
                .any(|c| pos.distance_to(&c.position) <= attack_range),
            near_prey: around
                .trackable
                .iter()
                .any(|p| pos.distance_to(&p.position) <= attack_range),
            committed: self.target.is_some(),
        };
        let state = self.machine.update(&ctx, perception.dt);

        let mut steer = match state {
            BehaviorState::Hunting => self.hunt(pos, vel, &hunter, &around, speed, config),
            BehaviorState::Resting | BehaviorState::Sleeping => Steer::Brake,
            BehaviorState::Socializing => Steer::Force(steering::arrive(
                pos,
                pos.offset(steering::cohesion(
                    pos,
                    &around.allies,
                    config.perception.nearby_radius,
                )),
                speed * 0.5,
                config.movement.slowing_radius,
                vel,
            )),
            BehaviorState::Exploring => {
                let window = config.perception.prey_memory_window * mods.memory_retention;
                let remembered = self
                    .memory
                    .recent(MemoryKind::Prey, now, window)
                    .map(|e| e.position);
                match remembered {
                    Some(spot) if pos.distance_to(&spot) > attack_range => {
                        self.explorer.reset();
                        Steer::Force(steering::arrive(
                            pos,
                            spot,
                            speed,
                            config.movement.slowing_radius,
                            vel,
                        ))
                    }
                    Some(spot) => {
                        self.memory.forget_near(MemoryKind::Prey, spot, DEDUPE_RADIUS * 2.0);
                        Steer::Force(self.explorer.steer(
                            pos,
                            vel,
                            perception.bounds.as_ref(),
                            speed,
                            perception.dt,
                            &config.movement,
                            rng,
                        ))
                    }
                    None => Steer::Force(
                        self.explorer.steer(
                            pos,
                            vel,
                            perception.bounds.as_ref(),
                            speed,
                            perception.dt,
                            &config.movement,
                            rng,
                        ) * self.personality.explore_scale(),
                    ),
                }
            }
            _ => Steer::Force(self.explorer.wander(vel, speed * 0.5, &config.movement, rng)),
        };

        if let Steer::Force(force) = &mut steer {
            if allies > 0 && state != BehaviorState::Hunting {
                let w = super::flock_weight(allies, self.personality.flock_scale(), config);
                let flock = super::flock_force(pos, vel, &around.allies, speed, config);
                *force = *force * (1.0 - w) + flock * w;
            }
            *force += super::wall_force(pos, perception.bounds.as_ref(), speed, config);
        }

        let (position, velocity) =
            motion::integrate(pos, vel, steer, speed, perception.dt, &config.movement);

        tracing::trace!(id = %me.id, %state, target = ?self.target, "carnivore decision");

        Decision {
            position,
            velocity,
            behavior: state,
            target: self.target,
            energy_cost: self.machine.energy_cost(),
        }
    }

    fn hunt(
        &mut self,
        pos: Position,
        vel: Vec2,
        hunter: &Hunter,
        around: &Surroundings<'_>,
        speed: f64,
        config: &SimConfig,
    ) -> Steer {
        if self.target.is_none() {
            self.target = self.select_target(pos, hunter.style, around);
        }
        let Some(prey) = self.target.and_then(|t| around.tracked(t)) else {
            return Steer::Brake;
        };
        let distance = pos.distance_to(&prey.position);
        let attack_range = config.feeding.attack_range;
        if distance <= attack_range {
            return Steer::Brake;
        }
        let pursuit = self.personality.pursuit_scale();
        let force = if !prey.is_alive() {
            steering::arrive(pos, prey.position, speed, config.movement.slowing_radius, vel)
        } else {
            match hunter.style {
                HuntingStyle::Chase => steering::seek(pos, prey.position, speed, vel) * pursuit,
                HuntingStyle::Ambush => {
                    steering::pursue(pos, prey.position, prey.velocity, speed, vel) * pursuit
                }
                HuntingStyle::Stealth => {
                    let creep = if distance > attack_range * STEALTH_SPRINT_RANGES {
                        speed * (1.0 - STEALTH_CREEP * hunter.stealth.clamp(0.0, 1.0))
                    } else {
                        speed
                    };
                    steering::arrive(pos, prey.position, creep, config.movement.slowing_radius, vel)
                }
            }
        };
        Steer::Force(force)
    }
}
