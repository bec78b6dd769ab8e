use crate::config::MovementConfig;
use crate::steering;
use rand::Rng;
use thicket_data::{Position, Rect, Vec2};

const GRID: usize = 4;
const WAYPOINT_REACHED: f64 = 15.0;
/// Seconds before an unreachable waypoint is abandoned.
const WAYPOINT_TIMEOUT: f64 = 15.0;
/// How far along the wall one wall-follow leg travels.
const WALL_STRIDE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreMode {
    WallFollow,
    GridSample,
    RandomWaypoint,
}

/// Systematic exploration of one room: legs toward waypoints chosen by a
/// randomly picked strategy.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    mode: Option<ExploreMode>,
    waypoint: Option<Position>,
    leg_time: f64,
    visited: u16,
    wander_angle: f64,
}

impl Explorer {
    pub fn mode(&self) -> Option<ExploreMode> {
        self.mode
    }

    pub fn waypoint(&self) -> Option<Position> {
        self.waypoint
    }

    /// Drops the current leg; the next call picks a new one.
    pub fn reset(&mut self) {
        self.waypoint = None;
        self.leg_time = 0.0;
    }

    /// Free meander around the current heading.
    pub fn wander<R: Rng + ?Sized>(
        &mut self,
        velocity: Vec2,
        speed: f64,
        cfg: &MovementConfig,
        rng: &mut R,
    ) -> Vec2 {
        let f = steering::wander(
            velocity,
            cfg.wander_radius,
            cfg.wander_distance,
            cfg.wander_jitter,
            &mut self.wander_angle,
            rng,
        );
        f.with_length(speed) - velocity
    }

    /// Steering toward the current exploration waypoint. Without bounds
    /// there is nothing to explore systematically, so it wanders.
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        pos: Position,
        velocity: Vec2,
        bounds: Option<&Rect>,
        speed: f64,
        dt: f64,
        cfg: &MovementConfig,
        rng: &mut R,
    ) -> Vec2 {
        let Some(bounds) = bounds else {
            return self.wander(velocity, speed, cfg, rng);
        };
        self.leg_time += dt;
        let stale = self.waypoint.map_or(true, |w| {
            w.distance_to(&pos) < WAYPOINT_REACHED || self.leg_time > WAYPOINT_TIMEOUT
        });
        if stale {
            let mode = match rng.gen_range(0..3) {
                0 => ExploreMode::WallFollow,
                1 => ExploreMode::GridSample,
                _ => ExploreMode::RandomWaypoint,
            };
            let inset = bounds.inset(cfg.wall_margin * 1.5);
            let next = match mode {
                ExploreMode::WallFollow => wall_follow(&inset, pos),
                ExploreMode::GridSample => self.grid_sample(&inset, rng),
                ExploreMode::RandomWaypoint => random_point(&inset, rng),
            };
            self.mode = Some(mode);
            self.waypoint = Some(next);
            self.leg_time = 0.0;
        }
        match self.waypoint {
            Some(w) => steering::arrive(pos, w, speed, cfg.slowing_radius, velocity),
            None => Vec2::ZERO,
        }
    }

    fn grid_sample<R: Rng + ?Sized>(&mut self, area: &Rect, rng: &mut R) -> Position {
        let cells = GRID * GRID;
        if self.visited.count_ones() as usize >= cells {
            self.visited = 0;
        }
        let open: Vec<usize> = (0..cells).filter(|i| self.visited & (1 << i) == 0).collect();
        let cell = open[rng.gen_range(0..open.len())];
        self.visited |= 1 << cell;
        let w = area.width / GRID as f64;
        let h = area.height / GRID as f64;
        let cx = area.x + (cell % GRID) as f64 * w;
        let cy = area.y + (cell / GRID) as f64 * h;
        random_point(&Rect::new(cx, cy, w, h), rng)
    }
}

fn random_point<R: Rng + ?Sized>(area: &Rect, rng: &mut R) -> Position {
    let x = if area.width > 0.0 {
        rng.gen_range(area.min_x()..area.max_x())
    } else {
        area.x
    };
    let y = if area.height > 0.0 {
        rng.gen_range(area.min_y()..area.max_y())
    } else {
        area.y
    };
    Position::new(x, y)
}

/// Next point clockwise along the perimeter of `area`, starting from the
/// perimeter point nearest `pos`.
fn wall_follow(area: &Rect, pos: Position) -> Position {
    let perimeter = 2.0 * (area.width + area.height);
    if perimeter <= 0.0 {
        return area.center();
    }
    let t = perimeter_param(area, area.clamp(pos));
    perimeter_point(area, (t + WALL_STRIDE).rem_euclid(perimeter))
}

fn perimeter_param(area: &Rect, p: Position) -> f64 {
    let (w, h) = (area.width, area.height);
    let dl = p.x - area.min_x();
    let dr = area.max_x() - p.x;
    let dt = p.y - area.min_y();
    let db = area.max_y() - p.y;
    let nearest = dl.min(dr).min(dt).min(db);
    if nearest == dt {
        p.x - area.min_x()
    } else if nearest == dr {
        w + (p.y - area.min_y())
    } else if nearest == db {
        w + h + (area.max_x() - p.x)
    } else {
        2.0 * w + h + (area.max_y() - p.y)
    }
}

fn perimeter_point(area: &Rect, t: f64) -> Position {
    let (w, h) = (area.width, area.height);
    if t < w {
        Position::new(area.min_x() + t, area.min_y())
    } else if t < w + h {
        Position::new(area.max_x(), area.min_y() + (t - w))
    } else if t < 2.0 * w + h {
        Position::new(area.max_x() - (t - w - h), area.max_y())
    } else {
        Position::new(area.min_x(), area.max_y() - (t - 2.0 * w - h))
    }
}
