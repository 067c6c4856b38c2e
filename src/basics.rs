//! Foundation types and constants.
//!
//! Points, bounding boxes, fill rules, and the numeric tolerances every
//! other stage of the pipeline agrees on.

use core::ops::{Add, Mul, Sub};

// ============================================================================
// Tolerances and limits
// ============================================================================

/// Two coordinates closer than this are treated as the same coordinate.
pub const DRAW_EPSILON: f64 = 1.0e-10;

/// Upper bound on the per-control-point step count used when flattening
/// bezier curves.
pub const BEZIER_QUANTUM: usize = 200;

/// Largest number of control points accepted by the bezier flattener.
pub const MAX_BEZIER_CONTROLS: usize = 107;

/// Largest coordinate magnitude accepted after transformation; beyond
/// this an `f64` no longer resolves every pixel.
pub const MAX_COORDINATE: f64 = 9_007_199_254_740_992.0;

pub const PI: f64 = std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// `1/x`, substituting a huge value when `x` is too small to divide by.
#[inline]
pub fn perceptible_reciprocal(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    if sign * x >= DRAW_EPSILON {
        1.0 / x
    } else {
        sign / DRAW_EPSILON
    }
}

// ============================================================================
// Rounding
// ============================================================================

/// Ceiling of a double as a signed pixel coordinate.
#[inline]
pub fn iceil(v: f64) -> i64 {
    v.ceil() as i64
}

/// Floor of a double as a signed pixel coordinate.
#[inline]
pub fn ifloor(v: f64) -> i64 {
    v.floor() as i64
}

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Odd winding numbers are inside.
    #[default]
    EvenOdd,
    /// Any non-zero winding number is inside.
    NonZero,
}

impl FillRule {
    /// Decide membership from an accumulated winding number.
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::EvenOdd => winding.rem_euclid(2) == 1,
            FillRule::NonZero => winding != 0,
        }
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point with `f64` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates match within [`DRAW_EPSILON`].
    #[inline]
    pub fn coincides(&self, other: &PointD) -> bool {
        (self.x - other.x).abs() < DRAW_EPSILON && (self.y - other.y).abs() < DRAW_EPSILON
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn distance(&self, other: &PointD) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add for PointD {
    type Output = PointD;
    #[inline]
    fn add(self, rhs: PointD) -> PointD {
        PointD::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointD {
    type Output = PointD;
    #[inline]
    fn sub(self, rhs: PointD) -> PointD {
        PointD::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PointD {
    type Output = PointD;
    #[inline]
    fn mul(self, rhs: f64) -> PointD {
        PointD::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box in floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectD {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RectD {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// An inverted box that any `unite` call replaces.
    pub fn empty() -> Self {
        Self {
            x1: f64::INFINITY,
            y1: f64::INFINITY,
            x2: f64::NEG_INFINITY,
            y2: f64::NEG_INFINITY,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn unite(&mut self, r: &RectD) {
        self.x1 = self.x1.min(r.x1);
        self.y1 = self.y1.min(r.y1);
        self.x2 = self.x2.max(r.x2);
        self.y2 = self.y2.max(r.y2);
    }

    pub fn add_point(&mut self, p: &PointD) {
        self.x1 = self.x1.min(p.x);
        self.y1 = self.y1.min(p.y);
        self.x2 = self.x2.max(p.x);
        self.y2 = self.y2.max(p.y);
    }

    pub fn expand(&mut self, d: f64) {
        self.x1 -= d;
        self.y1 -= d;
        self.x2 += d;
        self.y2 += d;
    }
}

impl Default for RectD {
    fn default() -> Self {
        Self::empty()
    }
}

/// Integer pixel rectangle, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectI {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl RectI {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1 + 1
    }
}
