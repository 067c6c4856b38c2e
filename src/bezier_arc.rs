//! SVG-style elliptical arcs.
//!
//! Reconstructs the ellipse center from endpoint parameterization (two
//! endpoints, radii, x-axis rotation, large-arc and sweep flags), splits
//! the sweep into spans of at most a quarter turn, and flattens each span
//! as a cubic bezier.

use crate::basics::{deg2rad, perceptible_reciprocal, PointD, DRAW_EPSILON, PI};
use crate::curves::flatten_bezier;
use crate::error::{DrawError, Result};
use crate::path_points::PathPointList;

/// Control points of the cubic approximating the unit-circle arc from
/// angle `a0` to `a1` about `center`.
fn unit_arc_to_bezier(center: PointD, a0: f64, a1: f64) -> [PointD; 3] {
    let beta = 0.5 * (a1 - a0);
    let half = (0.5 * beta).sin();
    let gamma = (8.0 / 3.0) * half * half / beta.sin();
    let (s0, c0) = a0.sin_cos();
    let (s1, c1) = a1.sin_cos();
    let end = PointD::new(center.x + c1, center.y + s1);
    [
        PointD::new(center.x + c0 - gamma * s0, center.y + s0 + gamma * c0),
        PointD::new(end.x + gamma * s1, end.y - gamma * c1),
        end,
    ]
}

/// An elliptical arc in SVG endpoint parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierArcSvg {
    start: PointD,
    end: PointD,
    radii: PointD,
    angle: f64,
    large_arc: bool,
    sweep: bool,
}

impl BezierArcSvg {
    /// `angle` is the x-axis rotation in degrees.
    pub fn new(
        start: PointD,
        end: PointD,
        radii: PointD,
        angle: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        Self {
            start,
            end,
            radii,
            angle,
            large_arc,
            sweep,
        }
    }

    /// False when either radius is too small to describe an ellipse; the
    /// arc then degrades to a straight line.
    pub fn radii_ok(&self) -> bool {
        self.radii.x.abs() >= DRAW_EPSILON && self.radii.y.abs() >= DRAW_EPSILON
    }

    /// Append the flattened arc, from `start` to `end` inclusive.
    ///
    /// Coincident endpoints produce the single end point.
    pub fn trace(&self, out: &mut PathPointList) -> Result<()> {
        let (start, end) = (self.start, self.end);
        if !(start.is_finite() && end.is_finite() && self.radii.is_finite() && self.angle.is_finite())
        {
            return Err(DrawError::NonFiniteCoordinate("arc"));
        }
        if start.coincides(&end) {
            return out.try_push(end);
        }
        if !self.radii_ok() {
            out.try_push(start)?;
            return out.try_push(end);
        }

        let mut rx = self.radii.x.abs();
        let mut ry = self.radii.y.abs();
        let (sine, cosine) = deg2rad(self.angle % 360.0).sin_cos();

        // Half chord in the ellipse frame decides whether the radii reach.
        let hx = cosine * (end.x - start.x) / 2.0 + sine * (end.y - start.y) / 2.0;
        let hy = cosine * (end.y - start.y) / 2.0 - sine * (end.x - start.x) / 2.0;
        let delta = (hx * hx) / (rx * rx) + (hy * hy) / (ry * ry);
        if delta < DRAW_EPSILON {
            out.try_push(start)?;
            return out.try_push(end);
        }
        if delta > 1.0 {
            rx *= delta.sqrt();
            ry *= delta.sqrt();
        }

        // Map both endpoints onto the unit circle frame.
        let p0 = PointD::new(
            (cosine * start.x + sine * start.y) / rx,
            (cosine * start.y - sine * start.x) / ry,
        );
        let p1 = PointD::new(
            (cosine * end.x + sine * end.y) / rx,
            (cosine * end.y - sine * end.x) / ry,
        );
        let alpha = p1.x - p0.x;
        let beta = p1.y - p0.y;
        let mut factor = perceptible_reciprocal(alpha * alpha + beta * beta) - 0.25;
        if factor <= 0.0 {
            factor = 0.0;
        } else {
            factor = factor.sqrt();
            if self.sweep == self.large_arc {
                factor = -factor;
            }
        }
        let center = PointD::new(
            (p0.x + p1.x) / 2.0 - factor * beta,
            (p0.y + p1.y) / 2.0 + factor * alpha,
        );

        let a0 = (p0.y - center.y).atan2(p0.x - center.x);
        let mut theta = (p1.y - center.y).atan2(p1.x - center.x) - a0;
        if theta < 0.0 && self.sweep {
            theta += 2.0 * PI;
        } else if theta > 0.0 && !self.sweep {
            theta -= 2.0 * PI;
        }
        let segments = (theta / (0.5 * PI + DRAW_EPSILON)).abs().ceil().max(1.0) as usize;

        // Back from the unit frame to user space.
        let to_user = |p: PointD| {
            PointD::new(
                cosine * rx * p.x - sine * ry * p.y,
                sine * rx * p.x + cosine * ry * p.y,
            )
        };

        let mut first = start;
        for i in 0..segments {
            let s0 = a0 + i as f64 * theta / segments as f64;
            let s1 = a0 + (i + 1) as f64 * theta / segments as f64;
            let [c1, c2, c3] = unit_arc_to_bezier(center, s0, s1);
            let last = if i + 1 == segments { end } else { to_user(c3) };
            let controls = [first, to_user(c1), to_user(c2), last];

            let mut span = PathPointList::new();
            flatten_bezier(&controls, &mut span)?;
            let pts = span.points();
            // Each span after the first starts on the previous span's end.
            let skip = usize::from(i > 0);
            out.extend_from_slice(&pts[skip..])?;
            first = last;
        }
        Ok(())
    }
}
