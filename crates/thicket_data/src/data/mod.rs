//! Core data structures for the Thicket simulation.

pub mod entity;
pub mod geometry;
pub mod room;
pub mod snapshot;
pub mod species;
