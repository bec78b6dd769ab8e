//! # Thicket Core
//!
//! The creature behavior and ecosystem engine behind Thicket, a predator/prey
//! simulation that runs inside the rooms of a dungeon crawler.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Steering math (seek, flee, arrive, wander, flocking, wall avoidance)
//! - Priority-driven behavior state machines with memory and personality
//! - Per-class brains bound to entities through a factory
//! - Feeding, hunting, reproduction and cleanup
//! - Ecosystem health scoring
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! - **Brain arena**: one [`ai::CreatureBrain`] per creature, keyed by id and
//!   owned by the [`World`]
//! - **Room partitioning**: the AI pass runs per room, on rayon once the
//!   population is large enough
//! - **Deterministic simulation**: every random draw comes from a seeded
//!   `ChaCha8Rng`
//!
//! ## Example
//!
//! ```
//! use thicket_core::{SimConfig, World};
//! use thicket_data::{Biome, Entity, EntityId, Position, Rect, Room, RoomId, Species};
//!
//! let rooms = vec![Room::new(RoomId(0), Rect::new(0.0, 0.0, 400.0, 300.0), Biome::Forest)];
//! let moss = Entity::spawn(
//!     EntityId::from_u128(1),
//!     Species::Moss,
//!     Position::new(50.0, 50.0),
//!     RoomId(0),
//! );
//! let mut world = World::new(SimConfig::default(), rooms, vec![moss]).unwrap();
//! let report = world.update();
//! assert_eq!(report.tick, 1);
//! assert_eq!(world.snapshot().counts.plants, 1);
//! ```

pub mod ai;
pub mod behavior;
pub mod biome;
pub mod clock;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod factory;
pub mod history;
pub mod lifecycle;
pub mod memory;
pub mod metrics;
pub mod personality;
pub mod player;
pub mod steering;
pub mod systems;
pub mod world;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use history::{DeathCause, LiveEvent};
pub use metrics::{init_logging, Metrics};
pub use player::{ActionKind, ActionOutcome, PlayerCommand};
pub use world::{TickReport, World};
