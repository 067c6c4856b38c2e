//! Geometric math utilities.
//!
//! Distances and the small numeric helpers shared by the flattener, the
//! stroke outliner and the coverage sweep.

use crate::basics::{perceptible_reciprocal, PointD};

// ============================================================================
// Distance calculations
// ============================================================================

/// Squared Euclidean distance between two points.
#[inline]
pub fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Squared distance from `(x, y)` to the segment `q0`→`q1`.
///
/// The projection parameter is clamped to the segment: points behind `q0`
/// measure to `q0`, points past `q1` measure to `q1`, the rest measure to
/// the supporting line.
#[inline]
pub fn segment_sq_distance(q0: &PointD, q1: &PointD, x: f64, y: f64) -> f64 {
    let dx = q1.x - q0.x;
    let dy = q1.y - q0.y;
    let beta = dx * (x - q0.x) + dy * (y - q0.y);
    if beta < 0.0 {
        return calc_sq_distance(q0.x, q0.y, x, y);
    }
    let alpha = dx * dx + dy * dy;
    if alpha == 0.0 {
        return calc_sq_distance(q0.x, q0.y, x, y);
    }
    if beta > alpha {
        return calc_sq_distance(q1.x, q1.y, x, y);
    }
    let cross = dx * (y - q0.y) - dy * (x - q0.x);
    perceptible_reciprocal(alpha) * cross * cross
}

/// Total length of a polyline.
pub fn polyline_length(points: &[PointD]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

// ============================================================================
// Polynomials
// ============================================================================

/// Binomial coefficient `n choose k` as a double.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut r = 1.0;
    for i in 0..k {
        r = r * (n - i) as f64 / (i + 1) as f64;
    }
    r
}
