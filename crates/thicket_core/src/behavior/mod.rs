//! Priority-ordered behavior state machine.
//!
//! A table of [`StateConfig`] rows drives every creature class. Each tick the
//! machine applies, in order: the emergency overrides, the minimum-duration
//! gate, the normal priority scan ([`select_state`]) and the expiry fallback.

pub mod tables;

use thicket_data::BehaviorState;

pub use tables::{CARNIVORE_STATES, HERBIVORE_STATES};

/// Optional inclusive bounds. An unset side is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const ANY: Bounds = Bounds {
        min: None,
        max: None,
    };

    pub const fn at_least(v: f64) -> Self {
        Self {
            min: Some(v),
            max: None,
        }
    }

    pub const fn at_most(v: f64) -> Self {
        Self {
            min: None,
            max: Some(v),
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn holds(&self, v: f64) -> bool {
        self.min.map_or(true, |m| v >= m) && self.max.map_or(true, |m| v <= m)
    }
}

/// Entry conditions for a row. Every set bound must hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateConditions {
    pub hunger: Bounds,
    pub energy: Bounds,
    pub health: Bounds,
    pub predators: Bounds,
    pub food: Bounds,
    pub prey: Bounds,
    pub allies: Bounds,
    pub near_food: Option<bool>,
    pub near_prey: Option<bool>,
    /// Holding a valid sticky target.
    pub committed: Option<bool>,
}

impl StateConditions {
    pub const NONE: StateConditions = StateConditions {
        hunger: Bounds::ANY,
        energy: Bounds::ANY,
        health: Bounds::ANY,
        predators: Bounds::ANY,
        food: Bounds::ANY,
        prey: Bounds::ANY,
        allies: Bounds::ANY,
        near_food: None,
        near_prey: None,
        committed: None,
    };

    pub fn hold(&self, ctx: &BehaviorContext) -> bool {
        let flag = |want: Option<bool>, have: bool| want.map_or(true, |w| w == have);
        self.hunger.holds(ctx.hunger)
            && self.energy.holds(ctx.energy)
            && self.health.holds(ctx.health)
            && self.predators.holds(ctx.predators as f64)
            && self.food.holds(ctx.food as f64)
            && self.prey.holds(ctx.prey as f64)
            && self.allies.holds(ctx.allies as f64)
            && flag(self.near_food, ctx.near_food)
            && flag(self.near_prey, ctx.near_prey)
            && flag(self.committed, ctx.committed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    pub min: f64,
    pub max: f64,
}

impl DurationRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// One table row. A state may appear in several rows; any row admits it,
/// and the first row for a state supplies its duration and energy cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateConfig {
    pub state: BehaviorState,
    pub priority: i32,
    pub duration: DurationRange,
    /// Energy per second while in this state; negative restores.
    pub energy_cost: f64,
    pub conditions: StateConditions,
}

/// Everything the machine looks at. Ratios are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BehaviorContext {
    pub hunger: f64,
    pub energy: f64,
    pub health: f64,
    pub predators: usize,
    pub food: usize,
    pub prey: usize,
    pub allies: usize,
    pub near_food: bool,
    pub near_prey: bool,
    pub committed: bool,
}

/// Ratios the emergency and fallback rules compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub critical_energy: f64,
    pub low_energy: f64,
    pub hungry: f64,
}

/// Highest-priority row whose conditions hold. Ties keep table order.
pub fn select_state(table: &[StateConfig], ctx: &BehaviorContext) -> Option<BehaviorState> {
    let mut best: Option<&StateConfig> = None;
    for row in table.iter().filter(|row| row.conditions.hold(ctx)) {
        if best.map_or(true, |b| row.priority > b.priority) {
            best = Some(row);
        }
    }
    best.map(|row| row.state)
}

pub fn config_for(table: &[StateConfig], state: BehaviorState) -> Option<&StateConfig> {
    table.iter().find(|row| row.state == state)
}

fn has_state(table: &[StateConfig], state: BehaviorState) -> bool {
    config_for(table, state).is_some()
}

/// Why the machine changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Emergency,
    Scan,
    Expired,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    table: &'static [StateConfig],
    thresholds: Thresholds,
    current: BehaviorState,
    timer: f64,
    /// A fresh machine picks its opening state without the duration gate.
    settled: bool,
    last_cause: Option<TransitionCause>,
}

impl StateMachine {
    pub fn new(table: &'static [StateConfig], thresholds: Thresholds) -> Self {
        Self {
            table,
            thresholds,
            current: BehaviorState::Wandering,
            timer: 0.0,
            settled: false,
            last_cause: None,
        }
    }

    pub fn current(&self) -> BehaviorState {
        self.current
    }

    pub fn timer(&self) -> f64 {
        self.timer
    }

    pub fn last_cause(&self) -> Option<TransitionCause> {
        self.last_cause
    }

    pub fn current_config(&self) -> Option<&StateConfig> {
        config_for(self.table, self.current)
    }

    /// Energy per second drawn by the current state.
    pub fn energy_cost(&self) -> f64 {
        self.current_config().map_or(0.0, |c| c.energy_cost)
    }

    /// Forces a state, resetting the timer.
    pub fn force(&mut self, state: BehaviorState) {
        self.enter(state, TransitionCause::Emergency);
    }

    fn enter(&mut self, state: BehaviorState, cause: TransitionCause) {
        if state != self.current {
            tracing::trace!(from = %self.current, to = %state, ?cause, "state transition");
        }
        self.current = state;
        self.timer = 0.0;
        self.settled = true;
        self.last_cause = Some(cause);
    }

    /// Advances the timer by `dt` and applies one round of transition rules.
    pub fn update(&mut self, ctx: &BehaviorContext, dt: f64) -> BehaviorState {
        self.timer += dt;
        self.last_cause = None;

        // 1. Emergencies ignore the duration gate.
        if ctx.predators > 0 && has_state(self.table, BehaviorState::Fleeing) {
            if self.current != BehaviorState::Fleeing {
                self.enter(BehaviorState::Fleeing, TransitionCause::Emergency);
            }
            return self.current;
        }
        if ctx.energy <= self.thresholds.critical_energy {
            let rest = if has_state(self.table, BehaviorState::Sleeping) {
                BehaviorState::Sleeping
            } else {
                BehaviorState::Resting
            };
            if self.current != rest {
                self.enter(rest, TransitionCause::Emergency);
            }
            return self.current;
        }

        let (min, max) = self
            .current_config()
            .map_or((0.0, f64::INFINITY), |c| (c.duration.min, c.duration.max));

        // 2. Minimum-duration gate.
        if self.settled && self.timer < min && self.current_still_valid(ctx) {
            return self.current;
        }

        // 3. Normal scan. A winning current state is kept, timer running.
        let best = select_state(self.table, ctx);
        if let Some(next) = best {
            if next != self.current || !self.settled {
                self.enter(next, TransitionCause::Scan);
                return self.current;
            }
        }

        // 4. Expiry fallback.
        if self.timer > max {
            let next = self.fallback(ctx);
            self.enter(next, TransitionCause::Expired);
        }
        self.current
    }

    /// Fleeing with no predator left must not be pinned by its minimum
    /// duration.
    fn current_still_valid(&self, ctx: &BehaviorContext) -> bool {
        !(self.current == BehaviorState::Fleeing && ctx.predators == 0)
    }

    fn fallback(&self, ctx: &BehaviorContext) -> BehaviorState {
        let t = &self.thresholds;
        if ctx.energy < t.low_energy && has_state(self.table, BehaviorState::Resting) {
            return BehaviorState::Resting;
        }
        if ctx.hunger >= t.hungry {
            if ctx.food > 0 && has_state(self.table, BehaviorState::Grazing) {
                return BehaviorState::Grazing;
            }
            if ctx.prey > 0 && has_state(self.table, BehaviorState::Hunting) {
                return BehaviorState::Hunting;
            }
        }
        BehaviorState::Wandering
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: Thresholds = Thresholds {
        critical_energy: 0.1,
        low_energy: 0.3,
        hungry: 0.6,
    };

    fn calm() -> BehaviorContext {
        BehaviorContext {
            hunger: 0.2,
            energy: 0.9,
            health: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_bounds() {
        assert!(Bounds::ANY.holds(-1e9));
        assert!(Bounds::at_least(0.6).holds(0.6));
        assert!(!Bounds::at_least(0.6).holds(0.59));
        assert!(Bounds::between(1.0, 2.0).holds(2.0));
        assert!(!Bounds::at_most(0.0).holds(1.0));
    }

    #[test]
    fn test_select_state_is_pure_priority_pick() {
        let mut ctx = calm();
        assert_eq!(
            select_state(HERBIVORE_STATES, &ctx),
            Some(BehaviorState::Wandering)
        );
        ctx.hunger = 0.8;
        ctx.food = 2;
        assert_eq!(
            select_state(HERBIVORE_STATES, &ctx),
            Some(BehaviorState::Grazing)
        );
        ctx.food = 0;
        assert_eq!(
            select_state(HERBIVORE_STATES, &ctx),
            Some(BehaviorState::Exploring)
        );
    }

    #[test]
    fn test_flee_beats_max_hunger() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let ctx = BehaviorContext {
            hunger: 1.0,
            food: 3,
            near_food: true,
            predators: 1,
            ..calm()
        };
        assert_eq!(machine.update(&ctx, 0.1), BehaviorState::Fleeing);
        assert_eq!(machine.last_cause(), Some(TransitionCause::Emergency));
    }

    #[test]
    fn test_flee_ignores_min_duration() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let hungry = BehaviorContext {
            hunger: 0.9,
            food: 1,
            ..calm()
        };
        assert_eq!(machine.update(&hungry, 0.05), BehaviorState::Grazing);
        let threatened = BehaviorContext {
            predators: 2,
            ..hungry
        };
        assert_eq!(machine.update(&threatened, 0.05), BehaviorState::Fleeing);
    }

    #[test]
    fn test_critical_energy_forces_sleep() {
        let mut machine = StateMachine::new(CARNIVORE_STATES, THRESHOLDS);
        let ctx = BehaviorContext {
            energy: 0.05,
            hunger: 0.9,
            prey: 2,
            ..calm()
        };
        assert_eq!(machine.update(&ctx, 0.1), BehaviorState::Sleeping);
    }

    #[test]
    fn test_min_duration_gate_blocks_flicker() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let hungry = BehaviorContext {
            hunger: 0.61,
            food: 1,
            ..calm()
        };
        assert_eq!(machine.update(&hungry, 0.1), BehaviorState::Grazing);
        let sated = BehaviorContext {
            hunger: 0.59,
            ..hungry
        };
        assert_eq!(machine.update(&sated, 0.1), BehaviorState::Grazing);
        let min = machine.current_config().unwrap().duration.min;
        assert_eq!(machine.update(&sated, min), BehaviorState::Wandering);
    }

    #[test]
    fn test_best_current_state_is_kept() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let hungry = BehaviorContext {
            hunger: 0.9,
            food: 1,
            ..calm()
        };
        assert_eq!(machine.update(&hungry, 0.1), BehaviorState::Grazing);
        let duration = machine.current_config().unwrap().duration;
        let past_min = (duration.min + duration.max) / 2.0;
        assert_eq!(machine.update(&hungry, past_min), BehaviorState::Grazing);
        assert_eq!(machine.last_cause(), None);
        assert!(machine.timer() > duration.min);
    }

    #[test]
    fn test_expiry_reenters_fallback() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        assert_eq!(machine.update(&calm(), 0.1), BehaviorState::Wandering);
        let max = machine.current_config().unwrap().duration.max;
        assert_eq!(machine.update(&calm(), max + 1.0), BehaviorState::Wandering);
        assert_eq!(machine.last_cause(), Some(TransitionCause::Expired));
        assert_eq!(machine.timer(), 0.0);
    }

    #[test]
    fn test_tired_creature_rests() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let tired = BehaviorContext {
            energy: 0.25,
            ..calm()
        };
        assert_eq!(machine.update(&tired, 0.1), BehaviorState::Resting);
        assert!(machine.energy_cost() < 0.0);
    }

    #[test]
    fn test_fleeing_releases_when_threat_leaves() {
        let mut machine = StateMachine::new(HERBIVORE_STATES, THRESHOLDS);
        let threatened = BehaviorContext {
            predators: 1,
            ..calm()
        };
        machine.update(&threatened, 0.1);
        assert_eq!(machine.update(&calm(), 0.1), BehaviorState::Wandering);
    }
}
