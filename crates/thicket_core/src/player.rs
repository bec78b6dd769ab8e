//! Player verbs.
//!
//! Commands are queued by the host and applied at the start of the next tick,
//! before any creature moves. Every command yields an [`ActionOutcome`];
//! failures are reported there instead of aborting the tick.

use crate::ai::CreatureBrain;
use crate::config::SimConfig;
use crate::dungeon::RoomMap;
use crate::error::{Result, SimError};
use crate::factory;
use crate::history::{DeathCause, LiveEvent};
use crate::systems::{ecological, interaction, reproduction};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thicket_data::{Entity, EntityId, EntityKind, LifeState, PopulationCounts, Position, Vec2};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Gather,
    Attack,
    Plant,
    Observe,
    Restore,
}

impl ActionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Gather => "gather",
            ActionKind::Attack => "attack",
            ActionKind::Plant => "plant",
            ActionKind::Observe => "observe",
            ActionKind::Restore => "restore",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Walk to a point, clamped to the current room.
    Move(Position),
    Act {
        kind: ActionKind,
        target: Option<EntityId>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub message: String,
    /// Change in ecosystem-health deviation caused by the command. Positive
    /// moved the population mix toward the ideal.
    pub ecosystem_impact: f64,
    pub success: bool,
}

impl ActionOutcome {
    fn failed(err: &SimError) -> Self {
        Self {
            message: err.to_string(),
            ecosystem_impact: 0.0,
            success: false,
        }
    }
}

/// Borrowed world state a command may touch.
pub struct CommandContext<'a, R: ?Sized> {
    pub rooms: &'a RoomMap,
    pub config: &'a SimConfig,
    pub brains: &'a mut HashMap<EntityId, CreatureBrain>,
    pub tick: u64,
    pub rng: &'a mut R,
}

/// Applies one command. Never fails: errors become an unsuccessful outcome.
pub fn execute<R: Rng + ?Sized>(
    command: &PlayerCommand,
    entities: &mut Vec<Entity>,
    ctx: &mut CommandContext<'_, R>,
) -> (ActionOutcome, Vec<LiveEvent>) {
    let before = PopulationCounts::from_entities(entities.iter());
    let mut events = Vec::new();
    let result = match command {
        PlayerCommand::Move(to) => walk(entities, *to, ctx, &mut events),
        PlayerCommand::Act { kind, target } => act(*kind, *target, entities, ctx, &mut events),
    };
    match result {
        Ok(message) => {
            let after = PopulationCounts::from_entities(entities.iter());
            let outcome = ActionOutcome {
                message,
                ecosystem_impact: ecological::impact(&before, &after),
                success: true,
            };
            (outcome, events)
        }
        Err(err) => {
            tracing::debug!(error = %err, "player command rejected");
            (ActionOutcome::failed(&err), events)
        }
    }
}

fn player_index(entities: &[Entity]) -> Result<usize> {
    entities
        .iter()
        .position(|e| e.kind() == EntityKind::Player)
        .ok_or(SimError::MissingPlayer)
}

fn walk<R: Rng + ?Sized>(
    entities: &mut [Entity],
    to: Position,
    ctx: &mut CommandContext<'_, R>,
    events: &mut Vec<LiveEvent>,
) -> Result<String> {
    let p = player_index(entities)?;
    let room = entities[p].room_id;
    let bounds = ctx.rooms.bounds(room).ok_or(SimError::UnknownRoom(room))?;
    let player = &mut entities[p];
    player.position = bounds.clamp(to);
    player.velocity = Vec2::ZERO;

    if let Some((next, arrival)) = ctx.rooms.teleport(room, &player.position) {
        player.room_id = next;
        player.position = arrival;
        events.push(LiveEvent::Teleport {
            id: player.id,
            from: room,
            to: next,
            position: arrival,
            tick: ctx.tick,
        });
        tracing::info!(%room, %next, "player teleported");
        return Ok(format!("You step through into {next}."));
    }
    Ok(format!(
        "You move to ({:.0}, {:.0}).",
        player.position.x, player.position.y
    ))
}

/// Index of a live target in the player's room.
fn target_index(
    entities: &[Entity],
    player: usize,
    action: ActionKind,
    target: Option<EntityId>,
) -> Result<usize> {
    let verb = action.verb();
    let id = target.ok_or(SimError::MissingTarget { action: verb })?;
    entities
        .iter()
        .position(|e| {
            e.id == id
                && !e.is_removable()
                && e.kind() != EntityKind::Player
                && e.room_id == entities[player].room_id
        })
        .ok_or(SimError::InvalidTarget {
            action: verb,
            target: id,
        })
}

fn within_reach(entities: &[Entity], player: usize, target: usize, reach: f64) -> Result<()> {
    let distance = entities[player]
        .position
        .distance_to(&entities[target].position);
    if distance > reach {
        return Err(SimError::OutOfReach {
            target: entities[target].id,
            distance,
            reach,
        });
    }
    Ok(())
}

fn act<R: Rng + ?Sized>(
    kind: ActionKind,
    target: Option<EntityId>,
    entities: &mut Vec<Entity>,
    ctx: &mut CommandContext<'_, R>,
    events: &mut Vec<LiveEvent>,
) -> Result<String> {
    let p = player_index(entities)?;
    let cfg = &ctx.config.player;
    match kind {
        ActionKind::Observe => match target {
            None => Ok(describe_room(entities, p)),
            Some(_) => {
                let t = target_index(entities, p, kind, target)?;
                let behavior = ctx.brains.get(&entities[t].id).map(|b| b.behavior());
                Ok(describe_entity(&entities[t], behavior))
            }
        },
        ActionKind::Gather => {
            let t = target_index(entities, p, kind, target)?;
            if entities[t].kind() != EntityKind::Plant {
                return Err(SimError::InvalidTarget {
                    action: kind.verb(),
                    target: entities[t].id,
                });
            }
            within_reach(entities, p, t, cfg.reach)?;
            let full_weight = interaction::species_weight(&entities[t]);
            let player_id = entities[p].id;
            let plant = &mut entities[t];
            let taken = interaction::take_bite(plant, cfg.gather_weight);
            if full_weight > 0.0 {
                plant.health =
                    (plant.health - plant.max_health * 0.5 * taken / full_weight).max(0.0);
            }
            let gained = taken * interaction::food_value(plant);
            if plant.weight <= 0.0 {
                plant.state = LifeState::Dead;
                events.push(LiveEvent::PlantDepleted {
                    id: plant.id,
                    eater: Some(player_id),
                    tick: ctx.tick,
                });
                events.push(interaction::death_event(plant, DeathCause::Player, ctx.tick));
            }
            entities[p].change_energy(gained);
            Ok(format!("You gather {taken:.2} kg."))
        }
        ActionKind::Attack => {
            let t = target_index(entities, p, kind, target)?;
            if entities[t].kind() == EntityKind::Plant {
                return Err(SimError::InvalidTarget {
                    action: kind.verb(),
                    target: entities[t].id,
                });
            }
            within_reach(entities, p, t, cfg.reach)?;
            let damage = cfg.attack_damage;
            let player_id = entities[p].id;
            let prey = &mut entities[t];
            prey.health -= damage;
            let killed = prey.health <= 0.0;
            events.push(LiveEvent::Attack {
                attacker: player_id,
                target: prey.id,
                damage,
                killed,
                tick: ctx.tick,
            });
            if killed {
                prey.health = 0.0;
                prey.state = LifeState::Dead;
                events.push(interaction::death_event(prey, DeathCause::Player, ctx.tick));
                Ok("Your strike is fatal.".to_string())
            } else {
                prey.state = LifeState::Fleeing;
                Ok(format!("You strike for {damage:.0}."))
            }
        }
        ActionKind::Restore => {
            let t = target_index(entities, p, kind, target)?;
            within_reach(entities, p, t, cfg.reach)?;
            let e = &mut entities[t];
            let before = e.health;
            e.change_health(cfg.restore_amount);
            Ok(format!("Restored {:.0} health.", e.health - before))
        }
        ActionKind::Plant => {
            let room = entities[p].room_id;
            let population = reproduction::room_populations(entities);
            if population.get(&room).copied().unwrap_or(0) >= ctx.config.world.max_room_population
            {
                return Err(SimError::RoomFull(room));
            }
            let bounds = ctx.rooms.bounds(room).ok_or(SimError::UnknownRoom(room))?;
            let species = cfg.plant_species;
            let position = bounds.clamp(entities[p].position);
            let id = reproduction::next_id(&mut *ctx.rng);
            let brain =
                factory::create_brain(EntityKind::Plant, species, ctx.config, &mut *ctx.rng);
            ctx.brains.insert(id, brain);
            entities.push(Entity::spawn(id, species, position, room));
            events.push(LiveEvent::Birth {
                id,
                parent_id: None,
                species,
                room,
                tick: ctx.tick,
            });
            Ok(format!("You plant a {species}."))
        }
    }
}

fn describe_room(entities: &[Entity], player: usize) -> String {
    let room = entities[player].room_id;
    let counts =
        PopulationCounts::from_entities(entities.iter().filter(|e| e.room_id == room));
    format!(
        "{room}: {} plants, {} herbivores, {} carnivores ({}).",
        counts.plants,
        counts.herbivores,
        counts.carnivores,
        ecological::score(&counts)
    )
}

fn describe_entity(e: &Entity, behavior: Option<thicket_data::BehaviorState>) -> String {
    let name = e
        .species
        .map_or_else(|| e.kind().to_string(), |s| s.to_string());
    let mut out = format!(
        "{name} {}: health {:.0}/{:.0}, energy {:.0}/{:.0}, weight {:.2} kg",
        e.id.short(),
        e.health,
        e.max_health,
        e.energy,
        e.max_energy,
        e.weight
    );
    if e.max_hunger() > 0.0 {
        out.push_str(&format!(", hunger {:.0}%", e.hunger_ratio() * 100.0));
    }
    if let Some(b) = behavior {
        out.push_str(&format!(", {b}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use thicket_data::{Biome, Rect, Room, RoomId, Species};

    fn setup() -> (RoomMap, Vec<Entity>) {
        let rooms = RoomMap::new(vec![Room::new(
            RoomId(0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Biome::Meadow,
        )])
        .unwrap();
        let player = Entity::player(EntityId::from_u128(1), Position::new(100.0, 100.0), RoomId(0));
        let moss = Entity::spawn(
            EntityId::from_u128(2),
            Species::Moss,
            Position::new(110.0, 100.0),
            RoomId(0),
        );
        let rabbit = Entity::spawn(
            EntityId::from_u128(3),
            Species::Rabbit,
            Position::new(190.0, 190.0),
            RoomId(0),
        );
        (rooms, vec![player, moss, rabbit])
    }

    fn run(
        rooms: &RoomMap,
        entities: &mut Vec<Entity>,
        command: PlayerCommand,
    ) -> (ActionOutcome, Vec<LiveEvent>) {
        let config = SimConfig::default();
        let mut brains = HashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = CommandContext {
            rooms,
            config: &config,
            brains: &mut brains,
            tick: 1,
            rng: &mut rng,
        };
        execute(&command, entities, &mut ctx)
    }

    #[test]
    fn test_move_is_clamped_to_room() {
        let (rooms, mut entities) = setup();
        let (outcome, _) = run(
            &rooms,
            &mut entities,
            PlayerCommand::Move(Position::new(-50.0, 500.0)),
        );
        assert!(outcome.success);
        assert_eq!(entities[0].position, Position::new(0.0, 200.0));
    }

    #[test]
    fn test_gather_until_depleted() {
        let (rooms, mut entities) = setup();
        let gather = PlayerCommand::Act {
            kind: ActionKind::Gather,
            target: Some(EntityId::from_u128(2)),
        };
        // 0.3 kg of moss, 0.1 kg per gather.
        for _ in 0..2 {
            let (outcome, events) = run(&rooms, &mut entities, gather.clone());
            assert!(outcome.success);
            assert!(events.is_empty());
        }
        let (outcome, events) = run(&rooms, &mut entities, gather.clone());
        assert!(outcome.success);
        assert_eq!(entities[1].weight, 0.0);
        assert_eq!(entities[1].state, LifeState::Dead);
        assert!(events
            .iter()
            .any(|e| matches!(e, LiveEvent::Death { cause: DeathCause::Player, .. })));

        let (outcome, _) = run(&rooms, &mut entities, gather);
        assert!(!outcome.success);
    }

    #[test]
    fn test_attack_out_of_reach_fails() {
        let (rooms, mut entities) = setup();
        let (outcome, events) = run(
            &rooms,
            &mut entities,
            PlayerCommand::Act {
                kind: ActionKind::Attack,
                target: Some(EntityId::from_u128(3)),
            },
        );
        assert!(!outcome.success);
        assert!(outcome.message.contains("units away"));
        assert!(events.is_empty());
        assert_eq!(entities[2].health, entities[2].max_health);
    }

    #[test]
    fn test_missing_target_reported() {
        let (rooms, mut entities) = setup();
        let (outcome, _) = run(
            &rooms,
            &mut entities,
            PlayerCommand::Act {
                kind: ActionKind::Restore,
                target: None,
            },
        );
        assert!(!outcome.success);
        assert_eq!(outcome.message, "restore needs a target");
    }

    #[test]
    fn test_plant_spawns_a_plant() {
        let (rooms, mut entities) = setup();
        let (outcome, events) = run(
            &rooms,
            &mut entities,
            PlayerCommand::Act {
                kind: ActionKind::Plant,
                target: None,
            },
        );
        assert!(outcome.success);
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[3].species, Some(Species::Fern));
        assert!(matches!(events[0], LiveEvent::Birth { parent_id: None, .. }));
    }

    #[test]
    fn test_observe_room() {
        let (rooms, mut entities) = setup();
        let (outcome, _) = run(
            &rooms,
            &mut entities,
            PlayerCommand::Act {
                kind: ActionKind::Observe,
                target: None,
            },
        );
        assert!(outcome.success);
        assert!(outcome.message.contains("1 plants, 1 herbivores, 0 carnivores"));
        assert_eq!(outcome.ecosystem_impact, 0.0);
    }
}
