//! Steering-behavior force functions.
//!
//! Every function is pure and returns an unclamped force; callers blend forces
//! linearly and clamp once before integrating. Degenerate geometry (zero
//! distance, empty neighbourhoods, zero margin) yields [`Vec2::ZERO`].

use rand::Rng;
use thicket_data::{Position, Rect, Vec2, EPSILON_LENGTH};

/// Longest look-ahead used by [`pursue`] and [`evade`], seconds.
pub const MAX_PREDICTION: f64 = 2.0;

/// A neighbour as seen by the flocking functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Position,
    pub velocity: Vec2,
}

impl Neighbor {
    pub const fn new(position: Position, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

/// Desired velocity toward `target` at `max_speed`, minus the current velocity.
pub fn seek(pos: Position, target: Position, max_speed: f64, velocity: Vec2) -> Vec2 {
    let offset = pos.to(&target);
    if offset.length() < EPSILON_LENGTH {
        return Vec2::ZERO;
    }
    offset.normalize() * max_speed - velocity
}

/// Reversed seek, scaled by `panic` (values below 1.0 are treated as 1.0).
pub fn flee(pos: Position, threat: Position, max_speed: f64, velocity: Vec2, panic: f64) -> Vec2 {
    let offset = threat.to(&pos);
    if offset.length() < EPSILON_LENGTH {
        return Vec2::ZERO;
    }
    offset.normalize() * (max_speed * panic.max(1.0)) - velocity
}

/// Seek whose desired speed ramps linearly to zero inside `slowing_radius`.
pub fn arrive(
    pos: Position,
    target: Position,
    max_speed: f64,
    slowing_radius: f64,
    velocity: Vec2,
) -> Vec2 {
    let offset = pos.to(&target);
    let distance = offset.length();
    if distance < EPSILON_LENGTH {
        return Vec2::ZERO;
    }
    let speed = if slowing_radius > 0.0 && distance < slowing_radius {
        max_speed * distance / slowing_radius
    } else {
        max_speed
    };
    offset.normalize() * speed - velocity
}

/// Meander force. The persistent `angle` drifts by at most `jitter` per call
/// and is measured relative to the current heading, so with
/// `distance > radius` the force always has a forward component.
pub fn wander<R: Rng + ?Sized>(
    velocity: Vec2,
    radius: f64,
    distance: f64,
    jitter: f64,
    angle: &mut f64,
    rng: &mut R,
) -> Vec2 {
    if jitter > 0.0 {
        *angle += rng.gen_range(-jitter..=jitter);
    }
    *angle = angle.rem_euclid(std::f64::consts::TAU);
    let heading = if velocity.is_zero() {
        0.0
    } else {
        velocity.angle()
    };
    let ahead = Vec2::from_angle(heading) * distance;
    ahead + Vec2::from_angle(heading + *angle) * radius
}

/// Push away from neighbours within `radius`, each weighted by 1/distance.
pub fn separation(pos: Position, neighbors: &[Neighbor], radius: f64) -> Vec2 {
    let mut force = Vec2::ZERO;
    for n in neighbors {
        let away = n.position.to(&pos);
        let d = away.length();
        if d > EPSILON_LENGTH && d < radius {
            force += away.normalize() / d;
        }
    }
    force
}

/// Mean velocity of neighbours within `radius`.
pub fn alignment(pos: Position, neighbors: &[Neighbor], radius: f64) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for n in neighbors.iter().filter(|n| pos.distance_to(&n.position) < radius) {
        sum += n.velocity;
        count += 1;
    }
    if count == 0 {
        Vec2::ZERO
    } else {
        sum / count as f64
    }
}

/// Vector from `pos` to the centroid of neighbours within `radius`.
pub fn cohesion(pos: Position, neighbors: &[Neighbor], radius: f64) -> Vec2 {
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut count = 0usize;
    for n in neighbors.iter().filter(|n| pos.distance_to(&n.position) < radius) {
        cx += n.position.x;
        cy += n.position.y;
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let centroid = Position::new(cx / count as f64, cy / count as f64);
    pos.to(&centroid)
}

/// Inward force for each edge whose margin band `pos` has entered. Magnitude
/// per edge is the penetration fraction `(margin - d) / margin`, exceeding 1.0
/// once outside the bounds.
pub fn avoid_walls(pos: Position, bounds: &Rect, margin: f64) -> Vec2 {
    if margin <= 0.0 {
        return Vec2::ZERO;
    }
    let push = |d: f64| if d < margin { (margin - d) / margin } else { 0.0 };
    Vec2::new(
        push(pos.x - bounds.min_x()) - push(bounds.max_x() - pos.x),
        push(pos.y - bounds.min_y()) - push(bounds.max_y() - pos.y),
    )
}

/// Where `target` will be after `lookahead` seconds at `target_velocity`.
pub fn predict(target: Position, target_velocity: Vec2, lookahead: f64) -> Position {
    target.offset(target_velocity * lookahead.clamp(0.0, MAX_PREDICTION))
}

fn lookahead(pos: Position, target: Position, max_speed: f64) -> f64 {
    if max_speed <= 0.0 {
        0.0
    } else {
        pos.distance_to(&target) / max_speed
    }
}

/// Seek toward the target's predicted position.
pub fn pursue(
    pos: Position,
    target: Position,
    target_velocity: Vec2,
    max_speed: f64,
    velocity: Vec2,
) -> Vec2 {
    let t = lookahead(pos, target, max_speed);
    seek(pos, predict(target, target_velocity, t), max_speed, velocity)
}

/// Flee from the threat's predicted position.
pub fn evade(
    pos: Position,
    threat: Position,
    threat_velocity: Vec2,
    max_speed: f64,
    velocity: Vec2,
    panic: f64,
) -> Vec2 {
    let t = lookahead(pos, threat, max_speed);
    flee(pos, predict(threat, threat_velocity, t), max_speed, velocity, panic)
}
