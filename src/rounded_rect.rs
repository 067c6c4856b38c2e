//! Rectangles and rounded rectangles.
//!
//! A rounded rectangle is four quarter-ellipse corners joined by the
//! straight runs between them; corner radii never exceed half of the
//! side they sit on.

use crate::basics::PointD;
use crate::ellipse::Ellipse;
use crate::error::{DrawError, Result};
use crate::path_points::PathPointList;

/// Axis-aligned rectangle with optional elliptical corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    start: PointD,
    end: PointD,
    radii: PointD,
}

impl RoundedRect {
    pub fn new(start: PointD, end: PointD, radii: PointD) -> Self {
        let mut r = Self { start, end, radii };
        r.normalize_radius();
        r
    }

    /// Square corners.
    pub fn rect(start: PointD, end: PointD) -> Self {
        Self::new(start, end, PointD::default())
    }

    /// Clamp the corner radii to half of the side lengths.
    pub fn normalize_radius(&mut self) {
        let w = (self.end.x - self.start.x).abs();
        let h = (self.end.y - self.start.y).abs();
        self.radii.x = self.radii.x.min(0.5 * w);
        self.radii.y = self.radii.y.min(0.5 * h);
    }

    pub fn radii(&self) -> PointD {
        self.radii
    }

    /// Append the closed outline to `out`.
    ///
    /// Square corners trace the corner points directly, starting at
    /// `start` and going through `(start.x, end.y)` first. Rounded corners
    /// start at the top of the top-right corner.
    pub fn trace(&self, out: &mut PathPointList) -> Result<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.radii.is_finite()) {
            return Err(DrawError::NonFiniteCoordinate("rectangle"));
        }
        if self.radii.x < 0.0 || self.radii.y < 0.0 {
            return Err(DrawError::InvalidRadius {
                primitive: "round rectangle",
                radius: self.radii.x.min(self.radii.y),
            });
        }
        let (s, e) = (self.start, self.end);
        if self.radii.x <= 0.0 && self.radii.y <= 0.0 {
            out.extend_from_slice(&[
                s,
                PointD::new(s.x, e.y),
                e,
                PointD::new(e.x, s.y),
                s,
            ])?;
            out.update_closed();
            return Ok(());
        }

        let w = (e.x - s.x).abs();
        let h = (e.y - s.y).abs();
        let (rx, ry) = (self.radii.x, self.radii.y);
        let corners = [
            (PointD::new(s.x + w - rx, s.y + ry), 270.0, 360.0),
            (PointD::new(s.x + w - rx, s.y + h - ry), 0.0, 90.0),
            (PointD::new(s.x + rx, s.y + h - ry), 90.0, 180.0),
            (PointD::new(s.x + rx, s.y + ry), 180.0, 270.0),
        ];
        let first = out.coordinate_count();
        for (center, a0, a1) in corners {
            Ellipse::new(center, self.radii, a0, a1).trace(out)?;
        }
        if let Some(p) = out.points().get(first).copied() {
            out.try_push(p)?;
        }
        out.update_closed();
        Ok(())
    }
}
