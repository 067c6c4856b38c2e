//! Traced point lists.
//!
//! A [`PathPointList`] is one subpath worth of vertices, the unit every
//! flattener produces and every later stage consumes.

use crate::basics::{PointD, RectD};
use crate::error::{try_reserve, DrawError, Result};
use crate::trans_affine::TransAffine;

/// How an isolated primitive is applied to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintMethod {
    /// A single pixel.
    Point,
    Replace,
    /// Ordinary geometric primitives: fill and stroke.
    #[default]
    Floodfill,
    FillToBorder,
    Reset,
}

impl PaintMethod {
    /// Whether area fill is rendered for this method. The others only
    /// stroke.
    pub fn fills(self) -> bool {
        matches!(self, PaintMethod::Floodfill | PaintMethod::FillToBorder)
    }
}

/// An ordered, growable run of points forming one subpath.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathPointList {
    points: Vec<PointD>,
    closed: bool,
    paint_method: PaintMethod,
}

impl PathPointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Result<Self> {
        let mut points = Vec::new();
        try_reserve(&mut points, n, "path points")?;
        Ok(Self {
            points,
            ..Self::default()
        })
    }

    pub fn from_points(points: Vec<PointD>) -> Self {
        let mut list = Self {
            points,
            ..Self::default()
        };
        list.update_closed();
        list
    }

    /// A list holding one point, painted as a single pixel.
    pub fn single_point(p: PointD) -> Self {
        Self {
            points: vec![p],
            closed: false,
            paint_method: PaintMethod::Point,
        }
    }

    pub fn push(&mut self, p: PointD) {
        self.points.push(p);
    }

    /// Append a point, reporting allocation failure instead of aborting.
    pub fn try_push(&mut self, p: PointD) -> Result<()> {
        if self.points.len() == self.points.capacity() {
            let grow = self.points.len().max(8);
            try_reserve(&mut self.points, grow, "path points")?;
        }
        self.points.push(p);
        Ok(())
    }

    pub fn extend_from_slice(&mut self, pts: &[PointD]) -> Result<()> {
        try_reserve(&mut self.points, pts.len(), "path points")?;
        self.points.extend_from_slice(pts);
        Ok(())
    }

    pub fn points(&self) -> &[PointD] {
        &self.points
    }

    pub fn into_points(self) -> Vec<PointD> {
        self.points
    }

    pub fn coordinate_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PointD> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PointD> {
        self.points.last()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Recompute `closed` from whether the end points coincide.
    pub fn update_closed(&mut self) {
        self.closed = match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => self.points.len() > 1 && a.coincides(b),
            _ => false,
        };
    }

    pub fn paint_method(&self) -> PaintMethod {
        self.paint_method
    }

    pub fn set_paint_method(&mut self, m: PaintMethod) {
        self.paint_method = m;
    }

    /// Apply `m` to every point.
    pub fn transform(&mut self, m: &TransAffine) {
        for p in &mut self.points {
            *p = m.transform(*p);
        }
    }

    pub fn bounds(&self) -> RectD {
        let mut r = RectD::empty();
        for p in &self.points {
            r.add_point(p);
        }
        r
    }

    /// Fail with [`DrawError::NonFiniteCoordinate`] if any point is NaN or
    /// infinite.
    pub fn check_finite(&self, what: &'static str) -> Result<()> {
        if self.points.iter().all(PointD::is_finite) {
            Ok(())
        } else {
            Err(DrawError::NonFiniteCoordinate(what))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_method_fills() {
        assert!(PaintMethod::Floodfill.fills());
        assert!(PaintMethod::FillToBorder.fills());
        assert!(!PaintMethod::Point.fills());
        assert!(!PaintMethod::Replace.fills());
        assert!(!PaintMethod::Reset.fills());
    }

    #[test]
    fn test_from_points_detects_closed() {
        let open = PathPointList::from_points(vec![
            PointD::new(0.0, 0.0),
            PointD::new(1.0, 0.0),
        ]);
        assert!(!open.is_closed());
        let closed = PathPointList::from_points(vec![
            PointD::new(0.0, 0.0),
            PointD::new(1.0, 0.0),
            PointD::new(0.0, 1.0),
            PointD::new(0.0, 0.0),
        ]);
        assert!(closed.is_closed());
        assert_eq!(closed.coordinate_count(), 4);
    }

    #[test]
    fn test_try_push_grows_past_capacity() {
        let mut l = PathPointList::new();
        for i in 0..100 {
            l.try_push(PointD::new(i as f64, 0.0)).unwrap();
        }
        assert_eq!(l.coordinate_count(), 100);
        assert_eq!(l.last(), Some(&PointD::new(99.0, 0.0)));
    }

    #[test]
    fn test_single_point_not_closed() {
        let p = PathPointList::single_point(PointD::new(3.0, 3.0));
        assert!(!p.is_closed());
        assert_eq!(p.paint_method(), PaintMethod::Point);
    }

    #[test]
    fn test_transform_and_bounds() {
        let mut l = PathPointList::from_points(vec![
            PointD::new(0.0, 0.0),
            PointD::new(2.0, 1.0),
        ]);
        l.transform(&TransAffine::new_translation(1.0, 1.0));
        let b = l.bounds();
        assert_eq!(b, RectD::new(1.0, 1.0, 3.0, 2.0));
    }

    #[test]
    fn test_check_finite() {
        let l = PathPointList::from_points(vec![PointD::new(f64::NAN, 0.0)]);
        assert_eq!(
            l.check_finite("line"),
            Err(DrawError::NonFiniteCoordinate("line"))
        );
    }
}
