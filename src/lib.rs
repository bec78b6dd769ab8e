//! Thicket application layer: the demo dungeon and the headless runner.
//!
//! The engine lives in `thicket_core`; plain data in `thicket_data`.

pub mod app;
pub mod demo;

pub use thicket_core as engine;
pub use thicket_data as data;
