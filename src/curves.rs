//! Bezier curve flattening.
//!
//! Evaluates the Bernstein form of an arbitrary-degree bezier at a step
//! count derived from the extent of its control polygon: wide curves get
//! more steps, and the per-control step count is capped by
//! [`BEZIER_QUANTUM`] so memory stays bounded.

use crate::basics::{PointD, BEZIER_QUANTUM, MAX_BEZIER_CONTROLS};
use crate::error::{try_reserve, DrawError, Result};
use crate::math::binomial;
use crate::path_points::PathPointList;

/// Number of evaluation steps used for `controls` (excluding the end point).
pub fn bezier_steps(controls: &[PointD]) -> usize {
    let n = controls.len();
    if n == 0 {
        return 0;
    }
    let mut quantum = n;
    for (i, a) in controls.iter().enumerate() {
        for b in &controls[i + 1..] {
            let dx = (b.x - a.x).abs();
            if dx > quantum as f64 {
                quantum = dx as usize;
            }
            let dy = (b.y - a.y).abs();
            if dy > quantum as f64 {
                quantum = dy as usize;
            }
        }
    }
    let quantum = (quantum as f64 / n as f64).min(BEZIER_QUANTUM as f64) as usize;
    quantum * n
}

/// Flatten the bezier defined by `controls` onto the end of `out`.
///
/// Three controls describe a quadratic, four a cubic; any count from two
/// to [`MAX_BEZIER_CONTROLS`] is accepted. The final control point is
/// always emitted exactly.
pub fn flatten_bezier(controls: &[PointD], out: &mut PathPointList) -> Result<()> {
    let n = controls.len();
    if n < 2 {
        return Err(DrawError::InvalidArgument("bezier needs at least two control points"));
    }
    if n > MAX_BEZIER_CONTROLS {
        return Err(DrawError::TooManyCoordinates {
            count: n,
            limit: MAX_BEZIER_CONTROLS,
        });
    }
    if !controls.iter().all(PointD::is_finite) {
        return Err(DrawError::NonFiniteCoordinate("bezier"));
    }

    let steps = bezier_steps(controls);
    let coefficients: Vec<f64> = (0..n).map(|i| binomial(n - 1, i)).collect();
    let mut pts = Vec::new();
    try_reserve(&mut pts, steps + 1, "bezier points")?;

    let mut weight: f64 = 0.0;
    for _ in 0..steps {
        let mut alpha = (1.0 - weight).powi(n as i32 - 1);
        let mut p = PointD::default();
        for (c, k) in controls.iter().zip(&coefficients) {
            p.x += alpha * k * c.x;
            p.y += alpha * k * c.y;
            alpha *= weight / (1.0 - weight);
        }
        pts.push(p);
        weight += 1.0 / steps as f64;
    }
    pts.push(controls[n - 1]);
    out.extend_from_slice(&pts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> PointD {
        PointD::new(x, y)
    }

    #[test]
    fn test_steps_grow_with_extent() {
        let small = [pt(0.0, 0.0), pt(2.0, 1.0), pt(4.0, 0.0)];
        let large = [pt(0.0, 0.0), pt(200.0, 100.0), pt(400.0, 0.0)];
        assert_eq!(bezier_steps(&small), 3);
        assert_eq!(bezier_steps(&large), 399);
        assert!(bezier_steps(&large) > bezier_steps(&small));
    }

    #[test]
    fn test_steps_capped() {
        let huge = [pt(0.0, 0.0), pt(1.0e6, 0.0), pt(2.0e6, 0.0), pt(3.0e6, 1.0)];
        assert_eq!(bezier_steps(&huge), BEZIER_QUANTUM * 4);
    }

    #[test]
    fn test_quadratic_endpoints_and_midpoint() {
        let controls = [pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0)];
        let mut out = PathPointList::new();
        flatten_bezier(&controls, &mut out).unwrap();
        let pts = out.points();
        assert_eq!(pts[0], pt(0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), pt(100.0, 0.0));
        // 33 per control, 99 steps: no sample lands exactly on t=0.5, but
        // the peak of the curve is y=50.
        let peak = pts.iter().map(|p| p.y).fold(0.0, f64::max);
        assert!(peak <= 50.0 + 1e-9);
        assert!(peak > 49.9);
    }

    #[test]
    fn test_cubic_stays_in_hull() {
        let controls = [pt(10.0, 10.0), pt(20.0, 60.0), pt(60.0, 60.0), pt(70.0, 10.0)];
        let mut out = PathPointList::new();
        flatten_bezier(&controls, &mut out).unwrap();
        assert_eq!(out.coordinate_count(), bezier_steps(&controls) + 1);
        for p in out.points() {
            assert!(p.x >= 10.0 - 1e-9 && p.x <= 70.0 + 1e-9);
            assert!(p.y >= 10.0 - 1e-9 && p.y <= 60.0 + 1e-9);
        }
    }

    #[test]
    fn test_too_many_controls() {
        let controls: Vec<PointD> = (0..108).map(|i| pt(i as f64, 0.0)).collect();
        let mut out = PathPointList::new();
        let err = flatten_bezier(&controls, &mut out).unwrap_err();
        assert_eq!(
            err,
            DrawError::TooManyCoordinates {
                count: 108,
                limit: 107
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_rejects_non_finite() {
        let controls = [pt(0.0, 0.0), pt(f64::INFINITY, 1.0), pt(2.0, 0.0)];
        let mut out = PathPointList::new();
        assert_eq!(
            flatten_bezier(&controls, &mut out),
            Err(DrawError::NonFiniteCoordinate("bezier"))
        );
    }
}
