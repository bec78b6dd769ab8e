//! Whole-population passes run by the tick driver after the AI step.

pub mod ecological;
pub mod interaction;
pub mod reproduction;
