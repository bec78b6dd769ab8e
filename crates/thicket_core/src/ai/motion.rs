use crate::config::MovementConfig;
use thicket_data::{Position, Vec2, EPSILON_LENGTH};

/// Fraction of velocity shed per second while braking.
pub const BRAKE_RATE: f64 = 6.0;
/// Speeds below this snap to rest when braking.
pub const REST_SPEED: f64 = 0.5;

/// What a brain wants from the integrator this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    Force(Vec2),
    /// Shed speed toward a standstill.
    Brake,
}

/// Clamps a non-zero force magnitude into `[min_force, max_force]`.
pub fn clamp_force(force: Vec2, cfg: &MovementConfig) -> Vec2 {
    let len = force.length();
    if len <= EPSILON_LENGTH || !len.is_finite() {
        return Vec2::ZERO;
    }
    force.with_length(len.clamp(cfg.min_force, cfg.max_force))
}

/// One explicit Euler step: `v += clamp(F) * tick_scale * dt`, `|v| <= max_speed`,
/// `p += v * dt`.
pub fn integrate(
    position: Position,
    velocity: Vec2,
    steer: Steer,
    max_speed: f64,
    dt: f64,
    cfg: &MovementConfig,
) -> (Position, Vec2) {
    let next = match steer {
        Steer::Force(force) => {
            (velocity + clamp_force(force, cfg) * (cfg.tick_scale * dt)).limit(max_speed.max(0.0))
        }
        Steer::Brake => {
            let slowed = velocity * (1.0 - BRAKE_RATE * dt).max(0.0);
            if slowed.length() < REST_SPEED {
                Vec2::ZERO
            } else {
                slowed
            }
        }
    };
    (position.offset(next * dt), next)
}
