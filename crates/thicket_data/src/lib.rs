//! Core data structures for the Thicket simulation.
//!
//! Everything in here is plain data: no behavior beyond small helpers on the
//! types themselves. The engine lives in `thicket_core`.

pub mod data;

pub use data::entity::*;
pub use data::geometry::*;
pub use data::room::*;
pub use data::snapshot::*;
pub use data::species::*;
