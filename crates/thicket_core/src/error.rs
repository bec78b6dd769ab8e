use thicket_data::{Direction, EntityId, RoomId};
use thiserror::Error;

/// Failures surfaced by the engine's public API.
///
/// Stale AI targets and degenerate geometry are never errors; they are
/// absorbed where they happen.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("{0} is listed more than once")]
    DuplicateRoom(RoomId),

    #[error("{0} has empty or non-finite bounds")]
    InvalidBounds(RoomId),

    #[error("{from} has a {direction:?} teleporter to {to} with no way back")]
    UnpairedTeleporter {
        from: RoomId,
        to: RoomId,
        direction: Direction,
    },

    #[error("entity {entity} claims {room}, which does not exist")]
    OrphanEntity { entity: EntityId, room: RoomId },

    #[error("no player in the world")]
    MissingPlayer,

    #[error("world already has a player")]
    DuplicatePlayer,

    #[error("cannot {action} target {target}")]
    InvalidTarget {
        action: &'static str,
        target: EntityId,
    },

    #[error("{action} needs a target")]
    MissingTarget { action: &'static str },

    #[error("target {target} is {distance:.0} units away (reach {reach:.0})")]
    OutOfReach {
        target: EntityId,
        distance: f64,
        reach: f64,
    },

    #[error("{0} is full")]
    RoomFull(RoomId),
}

pub type Result<T> = std::result::Result<T, SimError>;
