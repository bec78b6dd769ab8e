//! Per-tick event stream.

use serde::{Deserialize, Serialize};
use std::fmt;
use thicket_data::{EntityId, EntityKind, Position, RoomId, Species};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Starvation,
    Predation,
    /// Eaten down to zero weight.
    Consumed,
    /// Health ran out without starving (plants).
    Withered,
    /// Removed by a player verb.
    Player,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeathCause::Starvation => "starvation",
            DeathCause::Predation => "predation",
            DeathCause::Consumed => "consumed",
            DeathCause::Withered => "withered",
            DeathCause::Player => "player",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    Birth {
        id: EntityId,
        parent_id: Option<EntityId>,
        species: Species,
        room: RoomId,
        tick: u64,
    },
    Death {
        id: EntityId,
        species: Option<Species>,
        kind: EntityKind,
        age: f64,
        cause: DeathCause,
        tick: u64,
    },
    Attack {
        attacker: EntityId,
        target: EntityId,
        damage: f64,
        killed: bool,
        tick: u64,
    },
    PlantDepleted {
        id: EntityId,
        eater: Option<EntityId>,
        tick: u64,
    },
    Teleport {
        id: EntityId,
        from: RoomId,
        to: RoomId,
        position: Position,
        tick: u64,
    },
}

impl LiveEvent {
    pub fn tick(&self) -> u64 {
        match self {
            LiveEvent::Birth { tick, .. }
            | LiveEvent::Death { tick, .. }
            | LiveEvent::Attack { tick, .. }
            | LiveEvent::PlantDepleted { tick, .. }
            | LiveEvent::Teleport { tick, .. } => *tick,
        }
    }

    /// One-line human summary for log output.
    pub fn describe(&self) -> String {
        match self {
            LiveEvent::Birth {
                id, species, room, ..
            } => format!("{species} {id} born in {room}"),
            LiveEvent::Death {
                id, kind, cause, ..
            } => format!("{kind} {id} died of {cause}"),
            LiveEvent::Attack {
                attacker,
                target,
                damage,
                killed,
                ..
            } => {
                if *killed {
                    format!("{attacker} killed {target}")
                } else {
                    format!("{attacker} hit {target} for {damage:.1}")
                }
            }
            LiveEvent::PlantDepleted { id, .. } => format!("plant {id} eaten away"),
            LiveEvent::Teleport { id, from, to, .. } => format!("{id} moved {from} -> {to}"),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_tagged() {
        let ev = LiveEvent::Death {
            id: EntityId::from_u128(1),
            species: Some(Species::Rabbit),
            kind: EntityKind::Herbivore,
            age: 12.5,
            cause: DeathCause::Predation,
            tick: 40,
        };
        let json = ev.to_json().unwrap();
        assert!(json.contains(r#""event":"Death""#));
        assert!(json.contains(r#""cause":"predation""#));
        let back: LiveEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick(), 40);
        assert!(back.describe().contains("predation"));
    }
}
