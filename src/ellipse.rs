//! Ellipse, circle and arc tracing.
//!
//! Generates the points of an elliptical arc as a short segmented
//! polyline. The angular step shrinks with the radius so the chord error
//! stays under a pixel.

use crate::basics::{deg2rad, PointD, BEZIER_QUANTUM, DRAW_EPSILON, PI};
use crate::error::{DrawError, Result};
use crate::path_points::PathPointList;

/// An elliptical arc between two angles given in degrees.
///
/// The end angle is wrapped forward by whole turns until it is not below
/// the start angle, so arcs always run in the positive angular direction.
/// An end angle already past the start keeps its full span, so `0..720`
/// traces two turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: PointD,
    radii: PointD,
    start_angle: f64,
    end_angle: f64,
}

impl Ellipse {
    pub fn new(center: PointD, radii: PointD, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radii,
            start_angle,
            end_angle,
        }
    }

    /// Full circle through `perimeter`.
    pub fn circle(center: PointD, perimeter: PointD) -> Self {
        let r = center.distance(&perimeter);
        Self::new(center, PointD::new(r, r), 0.0, 360.0)
    }

    /// Arc of the ellipse inscribed in the box spanned by `start` and `end`.
    pub fn arc(start: PointD, end: PointD, start_angle: f64, end_angle: f64) -> Self {
        let center = PointD::new(0.5 * (end.x + start.x), 0.5 * (end.y + start.y));
        let radii = PointD::new((center.x - start.x).abs(), (center.y - start.y).abs());
        Self::new(center, radii, start_angle, end_angle)
    }

    pub fn center(&self) -> PointD {
        self.center
    }

    pub fn radii(&self) -> PointD {
        self.radii
    }

    /// Angular step in radians.
    pub fn step(&self) -> f64 {
        let delta = 2.0 / self.radii.x.max(self.radii.y);
        if (0.0..PI / 8.0).contains(&delta) {
            PI / (4.0 * (PI / delta / 2.0 + 0.5))
        } else {
            PI / 8.0
        }
    }

    /// Start angle reduced to `[0, 360)` and the positive span to the end
    /// angle, both in degrees.
    pub fn sweep(&self) -> (f64, f64) {
        let start = self.start_angle.rem_euclid(360.0);
        let span = if self.end_angle >= self.start_angle {
            self.end_angle - self.start_angle
        } else {
            (self.end_angle - self.start_angle).rem_euclid(360.0)
        };
        (start, span)
    }

    /// Upper estimate of the number of points this arc can produce, used to
    /// refuse oversized curves before allocating for them. Spans of more
    /// than one turn scale the estimate.
    pub fn estimated_coordinates(&self) -> usize {
        let radius = self.radii.x.abs().max(self.radii.y.abs());
        let turns = (self.sweep().1 / 360.0).max(1.0);
        // Float to int casts saturate.
        ((PI * PI * radius * turns).ceil() as usize).saturating_add(6 * BEZIER_QUANTUM + 360)
    }

    /// Append the arc's points to `out`. Both radii near zero produce the
    /// center point alone.
    pub fn trace(&self, out: &mut PathPointList) -> Result<()> {
        if !(self.center.is_finite()
            && self.radii.is_finite()
            && self.start_angle.is_finite()
            && self.end_angle.is_finite())
        {
            return Err(DrawError::NonFiniteCoordinate("ellipse"));
        }
        if self.radii.x < 0.0 || self.radii.y < 0.0 {
            return Err(DrawError::InvalidRadius {
                primitive: "ellipse",
                radius: self.radii.x.min(self.radii.y),
            });
        }
        if self.radii.x < DRAW_EPSILON && self.radii.y < DRAW_EPSILON {
            return out.try_push(self.center);
        }

        let step = self.step();
        let (start, span) = self.sweep();
        let a0 = deg2rad(start);
        let a1 = deg2rad(start + span);
        let point_at = |a: f64| {
            let a = a % (2.0 * PI);
            PointD::new(
                a.cos() * self.radii.x + self.center.x,
                a.sin() * self.radii.y + self.center.y,
            )
        };

        let mut i = 0.0;
        while a0 + i * step < a1 - DRAW_EPSILON {
            out.try_push(point_at(a0 + i * step))?;
            i += 1.0;
        }
        out.try_push(point_at(a1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(e: Ellipse) -> PathPointList {
        let mut out = PathPointList::new();
        e.trace(&mut out).unwrap();
        out.update_closed();
        out
    }

    #[test]
    fn test_small_radius_uses_coarse_step() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(5.0, 5.0), 0.0, 360.0);
        assert!((e.step() - PI / 8.0).abs() < 1e-12);
        // 16 steps over the full turn plus the closing point.
        assert_eq!(trace(e).coordinate_count(), 17);
    }

    #[test]
    fn test_large_radius_refines_step() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(100.0, 50.0), 0.0, 360.0);
        let step = e.step();
        assert!(step < PI / 8.0);
        // Chord sagitta stays under half a pixel.
        let sagitta = 100.0 * (1.0 - (step / 2.0).cos());
        assert!(sagitta < 0.5);
    }

    #[test]
    fn test_circle_points_on_radius_and_closed() {
        let e = Ellipse::circle(PointD::new(10.0, 10.0), PointD::new(13.0, 14.0));
        let l = trace(e);
        assert!(l.is_closed());
        for p in l.points() {
            assert!((p.distance(&PointD::new(10.0, 10.0)) - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_end_angle_wraps() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(10.0, 10.0), 270.0, 90.0);
        let l = trace(e);
        let first = l.first().unwrap();
        let last = l.last().unwrap();
        assert!(first.x.abs() < 1e-9 && (first.y + 10.0).abs() < 1e-9);
        assert!(last.x.abs() < 1e-9 && (last.y - 10.0).abs() < 1e-9);
        // The arc passes through angle 0, on the positive x side.
        assert!(l.points().iter().all(|p| p.x > -1e-9));
    }

    #[test]
    fn test_huge_start_angle_reduced() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(10.0, 10.0), 1e20, 0.0);
        let (start, span) = e.sweep();
        assert!((0.0..360.0).contains(&start));
        assert!((0.0..360.0).contains(&span));
        // Under one turn at this radius.
        assert!(trace(e).coordinate_count() <= 70);
    }

    #[test]
    fn test_multi_turn_span_kept() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(5.0, 5.0), 0.0, 720.0);
        assert_eq!(e.sweep(), (0.0, 720.0));
        assert_eq!(trace(e).coordinate_count(), 33);
    }

    #[test]
    fn test_degenerate_radii_is_point() {
        let e = Ellipse::new(PointD::new(4.0, 2.0), PointD::new(0.0, 0.0), 0.0, 360.0);
        assert_eq!(trace(e).points(), &[PointD::new(4.0, 2.0)]);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(-3.0, 3.0), 0.0, 360.0);
        let mut out = PathPointList::new();
        assert!(matches!(e.trace(&mut out), Err(DrawError::InvalidRadius { .. })));
    }

    #[test]
    fn test_arc_from_bounding_box() {
        let e = Ellipse::arc(PointD::new(0.0, 0.0), PointD::new(20.0, 10.0), 0.0, 180.0);
        assert_eq!(e.center(), PointD::new(10.0, 5.0));
        assert_eq!(e.radii(), PointD::new(10.0, 5.0));
    }

    #[test]
    fn test_estimated_coordinates() {
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(100.0, 10.0), 0.0, 360.0);
        assert_eq!(e.estimated_coordinates(), 987 + 1560);
        let e = Ellipse::new(PointD::new(0.0, 0.0), PointD::new(100.0, 10.0), 0.0, 1e9);
        assert!(e.estimated_coordinates() > 1_000_000_000);
    }
}
