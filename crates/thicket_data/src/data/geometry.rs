use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Below this length a vector is treated as zero when normalizing.
pub const EPSILON_LENGTH: f64 = 1e-9;

/// World-space position of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector pointing from `self` to `other`.
    #[inline]
    pub fn to(&self, other: &Position) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }

    #[inline]
    pub fn offset(&self, v: Vec2) -> Position {
        Position::new(self.x + v.x, self.y + v.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 2D vector used for steering forces and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.length() <= EPSILON_LENGTH
    }

    /// Unit vector in the same direction, or zero for a degenerate vector.
    #[inline]
    pub fn normalize(&self) -> Vec2 {
        let len = self.length();
        if len > EPSILON_LENGTH && len.is_finite() {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Clamps the magnitude to at most `max`.
    pub fn limit(&self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max && len > EPSILON_LENGTH {
            *self * (max / len)
        } else {
            *self
        }
    }

    pub fn with_length(&self, len: f64) -> Vec2 {
        self.normalize() * len
    }

    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        if rhs.abs() <= EPSILON_LENGTH {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / rhs, self.y / rhs)
        }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Finite origin and strictly positive finite extent.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    pub fn clamp(&self, p: Position) -> Position {
        Position::new(
            p.x.clamp(self.min_x(), self.max_x()),
            p.y.clamp(self.min_y(), self.max_y()),
        )
    }

    /// The rectangle shrunk by `inset` on every side. Collapses to the center
    /// line on an axis narrower than twice the inset.
    pub fn inset(&self, inset: f64) -> Rect {
        let ix = inset.min(self.width / 2.0).max(0.0);
        let iy = inset.min(self.height / 2.0).max(0.0);
        Rect::new(
            self.x + ix,
            self.y + iy,
            self.width - 2.0 * ix,
            self.height - 2.0 * iy,
        )
    }
}
