//! Static state tables, highest priority first.

use super::{Bounds, DurationRange, StateConditions, StateConfig};
use thicket_data::BehaviorState;

const fn row(
    state: BehaviorState,
    priority: i32,
    duration: (f64, f64),
    energy_cost: f64,
    conditions: StateConditions,
) -> StateConfig {
    StateConfig {
        state,
        priority,
        duration: DurationRange::new(duration.0, duration.1),
        energy_cost,
        conditions,
    }
}

const N: StateConditions = StateConditions::NONE;

pub static HERBIVORE_STATES: &[StateConfig] = &[
    row(
        BehaviorState::Fleeing,
        100,
        (1.0, 4.0),
        3.0,
        StateConditions {
            predators: Bounds::at_least(1.0),
            ..N
        },
    ),
    row(
        BehaviorState::Sleeping,
        80,
        (8.0, 20.0),
        -4.0,
        StateConditions {
            energy: Bounds::at_most(0.2),
            ..N
        },
    ),
    // Finishing a plant already started, whatever the hunger.
    row(
        BehaviorState::Grazing,
        65,
        (2.0, 12.0),
        0.5,
        StateConditions {
            committed: Some(true),
            near_food: Some(true),
            ..N
        },
    ),
    row(
        BehaviorState::Grazing,
        60,
        (2.0, 12.0),
        0.5,
        StateConditions {
            hunger: Bounds::at_least(0.6),
            food: Bounds::at_least(1.0),
            ..N
        },
    ),
    row(
        BehaviorState::Resting,
        50,
        (3.0, 8.0),
        -2.5,
        StateConditions {
            energy: Bounds::at_most(0.4),
            ..N
        },
    ),
    row(
        BehaviorState::Exploring,
        40,
        (4.0, 10.0),
        1.0,
        StateConditions {
            hunger: Bounds::at_least(0.6),
            food: Bounds::at_most(0.0),
            ..N
        },
    ),
    row(
        BehaviorState::Socializing,
        30,
        (3.0, 6.0),
        0.5,
        StateConditions {
            hunger: Bounds::at_most(0.5),
            energy: Bounds::at_least(0.5),
            allies: Bounds::at_least(2.0),
            ..N
        },
    ),
    row(BehaviorState::Wandering, 10, (3.0, 8.0), 0.8, N),
];

pub static CARNIVORE_STATES: &[StateConfig] = &[
    row(
        BehaviorState::Sleeping,
        80,
        (8.0, 20.0),
        -4.0,
        StateConditions {
            energy: Bounds::at_most(0.2),
            ..N
        },
    ),
    row(
        BehaviorState::Hunting,
        75,
        (3.0, 15.0),
        2.0,
        StateConditions {
            committed: Some(true),
            ..N
        },
    ),
    row(
        BehaviorState::Hunting,
        70,
        (3.0, 15.0),
        2.0,
        StateConditions {
            hunger: Bounds::at_least(0.4),
            prey: Bounds::at_least(1.0),
            ..N
        },
    ),
    row(
        BehaviorState::Resting,
        50,
        (3.0, 10.0),
        -2.5,
        StateConditions {
            energy: Bounds::at_most(0.4),
            ..N
        },
    ),
    row(
        BehaviorState::Exploring,
        40,
        (5.0, 12.0),
        1.2,
        StateConditions {
            hunger: Bounds::at_least(0.4),
            prey: Bounds::at_most(0.0),
            ..N
        },
    ),
    row(
        BehaviorState::Socializing,
        30,
        (3.0, 6.0),
        0.5,
        StateConditions {
            hunger: Bounds::at_most(0.3),
            allies: Bounds::at_least(1.0),
            ..N
        },
    ),
    row(BehaviorState::Wandering, 10, (4.0, 10.0), 1.0, N),
];
