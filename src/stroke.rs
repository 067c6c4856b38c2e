//! Stroke outlines: caps, joins and miter limiting.
//!
//! Turns a centerline into a closed polygon covering the stroke body. Two
//! offset chains run on either side of the centerline at distance `mid`
//! (half the stroke width); joins are resolved at every vertex, caps are
//! added at the ends of open subpaths, and the chains are stitched into
//! one ring that is filled with the non-zero rule.

use crate::basics::{PointD, DRAW_EPSILON, PI};
use crate::error::{try_reserve, Result};
use crate::path_points::PathPointList;

// ============================================================================
// Enums
// ============================================================================

/// Line cap style for the ends of open subpaths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

// ============================================================================
// StrokeStyle
// ============================================================================

/// Width, cap, join and miter limit of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
}

impl StrokeStyle {
    pub fn new() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }

    pub fn set_width(&mut self, w: f64) -> &mut Self {
        self.width = w;
        self
    }
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_line_cap(&mut self, lc: LineCap) -> &mut Self {
        self.line_cap = lc;
        self
    }
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn set_line_join(&mut self, lj: LineJoin) -> &mut Self {
        self.line_join = lj;
        self
    }
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Miter length limit as a multiple of the half width. Zero turns
    /// every miter into a bevel.
    pub fn set_miter_limit(&mut self, ml: f64) -> &mut Self {
        self.miter_limit = ml;
        self
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// StrokeOutliner
// ============================================================================

/// Result of outlining one centerline.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeOutline {
    /// Closed stroke body.
    Polygon(PathPointList),
    /// A zero-length round-capped subpath: a disc of radius `mid` around
    /// the point.
    Dot(PointD),
    /// Nothing to paint.
    Empty,
}

/// Slope and inverse slope of a direction, substituting `±1/eps` where
/// the direction is axis-aligned.
fn slopes(dx: f64, dy: f64) -> (f64, f64) {
    let huge = 1.0 / DRAW_EPSILON;
    if dx.abs() < DRAW_EPSILON {
        let slope = if (dx >= 0.0) == (dy < 0.0) { -huge } else { huge };
        (slope, 0.0)
    } else if dy.abs() < DRAW_EPSILON {
        let inverse = if (dy >= 0.0) == (dx < 0.0) { -huge } else { huge };
        (0.0, inverse)
    } else {
        let slope = dy / dx;
        (slope, -1.0 / slope)
    }
}

/// Perpendicular offset of length `mid` for a segment with the given
/// inverse slope.
fn offset(mid: f64, inverse_slope: f64) -> PointD {
    let x = (mid * mid / (inverse_slope * inverse_slope + 1.0)).sqrt();
    PointD::new(x, x * inverse_slope)
}

/// Push `mid`-radius arc points strictly between angles `from` and `to`.
fn push_arc(out: &mut Vec<PointD>, center: PointD, mid: f64, from: f64, to: f64) {
    let segments = ((to - from).abs() / (2.0 * (1.0 / mid).sqrt())).ceil() as usize;
    for j in 1..segments {
        let a = from + j as f64 * (to - from) / segments as f64;
        out.push(PointD::new(center.x + mid * a.cos(), center.y + mid * a.sin()));
    }
}

/// Extend both ends of an open centerline by `mid` along its end
/// directions.
fn extend_square_caps(points: &mut [PointD], mid: f64) {
    let n = points.len();
    let lead = (1..n)
        .find(|&i| !points[i].coincides(&points[0]))
        .unwrap_or(n - 1);
    let d = points[0] - points[lead];
    let len = d.x.hypot(d.y);
    if len > 0.0 {
        points[0] = points[lead] + d * ((len + mid) / len);
    }
    let tail = (0..n - 1)
        .rev()
        .find(|&j| !points[j].coincides(&points[n - 1]))
        .unwrap_or(0);
    let d = points[n - 1] - points[tail];
    let len = d.x.hypot(d.y);
    if len > 0.0 {
        points[n - 1] = points[tail] + d * ((len + mid) / len);
    }
}

/// Builds stroke-body polygons for one stroke style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOutliner {
    mid: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
}

impl StrokeOutliner {
    pub fn new(style: &StrokeStyle) -> Self {
        Self::with_half_width(style, style.width() / 2.0)
    }

    /// Outline with an explicit half width, e.g. one already scaled by a
    /// transform.
    pub fn with_half_width(style: &StrokeStyle, mid: f64) -> Self {
        Self {
            mid,
            line_cap: style.line_cap(),
            line_join: style.line_join(),
            miter_limit: style.miter_limit(),
        }
    }

    pub fn mid(&self) -> f64 {
        self.mid
    }

    /// Outline one subpath.
    pub fn outline(&self, path: &PathPointList) -> Result<StrokeOutline> {
        let mid = self.mid;
        let first = match path.first() {
            Some(p) if mid > DRAW_EPSILON => *p,
            _ => return Ok(StrokeOutline::Empty),
        };
        if path.points().iter().all(|p| p.coincides(&first)) {
            return self.outline_point(first);
        }

        let closed = path.coordinate_count() > 1
            && path.last().map_or(false, |l| l.coincides(&first));
        let mut polygon: Vec<PointD> = Vec::new();
        try_reserve(&mut polygon, path.coordinate_count() + 1, "stroke points")?;
        polygon.extend_from_slice(path.points());
        if closed && matches!(self.line_join, LineJoin::Round | LineJoin::Miter) {
            polygon.push(path.points()[1]);
        }
        let count = polygon.len();

        // First segment of non-zero length.
        let mut n = (1..count)
            .find(|&i| !polygon[i].coincides(&polygon[0]))
            .unwrap_or(count - 1);
        let mut dx_p = polygon[n].x - polygon[0].x;
        let mut dy_p = polygon[n].y - polygon[0].y;
        let (mut slope_p, inverse_p) = slopes(dx_p, dy_p);

        let miter_limit = self.miter_limit * self.miter_limit * mid * mid;
        if self.line_cap == LineCap::Square && !closed {
            extend_square_caps(&mut polygon, mid);
        }

        let mut box_p = [PointD::default(); 5];
        let mut box_q = [PointD::default(); 5];
        let o = offset(mid, inverse_p);
        let o = if dy_p * o.x - dx_p * o.y > 0.0 {
            PointD::new(-o.x, -o.y)
        } else {
            o
        };
        box_p[0] = polygon[0] + o;
        box_p[1] = polygon[n] + o;
        box_q[0] = polygon[0] - o;
        box_q[1] = polygon[n] - o;

        let mut path_p: Vec<PointD> = Vec::new();
        let mut path_q: Vec<PointD> = Vec::new();
        try_reserve(&mut path_p, 2 * count + 8, "stroke points")?;
        try_reserve(&mut path_q, 2 * count + 8, "stroke points")?;
        path_p.push(box_p[0]);
        path_q.push(box_q[0]);

        for i in n + 1..count {
            let dx_q = polygon[i].x - polygon[n].x;
            let dy_q = polygon[i].y - polygon[n].y;
            if dx_q * dx_q + dy_q * dy_q < 0.25 {
                continue;
            }
            let (slope_q, inverse_q) = slopes(dx_q, dy_q);
            let o = offset(mid, inverse_q);
            let o = if dy_q * o.x - dx_q * o.y > 0.0 {
                PointD::new(-o.x, -o.y)
            } else {
                o
            };
            box_p[2] = polygon[n] + o;
            box_p[3] = polygon[i] + o;
            box_q[2] = polygon[n] - o;
            box_q[3] = polygon[i] - o;

            if (slope_p - slope_q).abs() < DRAW_EPSILON {
                box_p[4] = box_p[1];
                box_q[4] = box_q[1];
            } else {
                let x = (slope_p * box_p[0].x - box_p[0].y - slope_q * box_p[3].x + box_p[3].y)
                    / (slope_p - slope_q);
                box_p[4] = PointD::new(x, slope_p * (x - box_p[0].x) + box_p[0].y);
                let x = (slope_p * box_q[0].x - box_q[0].y - slope_q * box_q[3].x + box_q[3].y)
                    / (slope_p - slope_q);
                box_q[4] = PointD::new(x, slope_p * (x - box_q[0].x) + box_q[0].y);
            }

            let d = box_q[4] - box_p[4];
            let within_limit = d.x * d.x + d.y * d.y <= miter_limit;
            let center = polygon[n];
            try_reserve(&mut path_p, 4, "stroke points")?;
            try_reserve(&mut path_q, 4, "stroke points")?;

            // The q chain is on the outside of a turn when this is <= 0.
            if dx_q * dy_p - dx_p * dy_q <= 0.0 {
                match self.line_join {
                    LineJoin::Bevel => {
                        path_q.extend_from_slice(&[box_q[1], box_q[2]]);
                        push_corner(&mut path_p, within_limit, &box_p);
                    }
                    LineJoin::Miter => {
                        push_corner(&mut path_q, within_limit, &box_q);
                        push_corner(&mut path_p, within_limit, &box_p);
                    }
                    LineJoin::Round => {
                        push_corner(&mut path_p, within_limit, &box_p);
                        let tp = (box_q[1].y - center.y).atan2(box_q[1].x - center.x);
                        let mut tq = (box_q[2].y - center.y).atan2(box_q[2].x - center.x);
                        if tq < tp {
                            tq += 2.0 * PI;
                        }
                        path_q.push(box_q[1]);
                        push_arc(&mut path_q, center, mid, tp, tq);
                        path_q.push(box_q[2]);
                    }
                }
            } else {
                match self.line_join {
                    LineJoin::Bevel => {
                        path_p.extend_from_slice(&[box_p[1], box_p[2]]);
                        push_corner(&mut path_q, within_limit, &box_q);
                    }
                    LineJoin::Miter => {
                        push_corner(&mut path_q, within_limit, &box_q);
                        push_corner(&mut path_p, within_limit, &box_p);
                    }
                    LineJoin::Round => {
                        push_corner(&mut path_q, within_limit, &box_q);
                        let mut tp = (box_p[1].y - center.y).atan2(box_p[1].x - center.x);
                        let tq = (box_p[2].y - center.y).atan2(box_p[2].x - center.x);
                        if tp < tq {
                            tp += 2.0 * PI;
                        }
                        path_p.push(box_p[1]);
                        push_arc(&mut path_p, center, mid, tp, tq);
                        path_p.push(box_p[2]);
                    }
                }
            }

            slope_p = slope_q;
            box_p[0] = box_p[2];
            box_p[1] = box_p[3];
            box_q[0] = box_q[2];
            box_q[1] = box_q[3];
            dx_p = dx_q;
            dy_p = dy_q;
            n = i;
        }
        path_p.push(box_p[1]);
        path_q.push(box_q[1]);

        let mut out = PathPointList::with_capacity(path_p.len() + path_q.len() + 64)?;
        out.extend_from_slice(&path_p)?;
        if closed {
            out.try_push(path_p[0])?;
        } else if self.line_cap == LineCap::Round {
            self.round_cap(&mut out, polygon[n], box_p[1], PointD::new(dx_p, dy_p))?;
        }
        for p in path_q.iter().rev() {
            out.try_push(*p)?;
        }
        if closed {
            out.try_push(path_q[path_q.len() - 1])?;
        } else if self.line_cap == LineCap::Round {
            let start = polygon[0];
            let lead = polygon[first_segment_end(&polygon)] - start;
            self.round_cap(&mut out, start, path_q[0], PointD::new(-lead.x, -lead.y))?;
        }
        out.try_push(path_p[0])?;
        out.set_closed(true);

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("stroke polygon ({} points)", out.coordinate_count());
            for p in out.points() {
                log::trace!("    {} {}", p.x, p.y);
            }
        }
        Ok(StrokeOutline::Polygon(out))
    }

    fn outline_point(&self, center: PointD) -> Result<StrokeOutline> {
        let mid = self.mid;
        Ok(match self.line_cap {
            LineCap::Round => StrokeOutline::Dot(center),
            LineCap::Square => {
                let mut l = PathPointList::with_capacity(5)?;
                l.extend_from_slice(&[
                    PointD::new(center.x - mid, center.y - mid),
                    PointD::new(center.x + mid, center.y - mid),
                    PointD::new(center.x + mid, center.y + mid),
                    PointD::new(center.x - mid, center.y + mid),
                    PointD::new(center.x - mid, center.y - mid),
                ])?;
                l.set_closed(true);
                StrokeOutline::Polygon(l)
            }
            LineCap::Butt => StrokeOutline::Empty,
        })
    }

    /// Half turn around `center` starting at `from`, bulging along
    /// `direction`. Neither end point is pushed.
    fn round_cap(
        &self,
        out: &mut PathPointList,
        center: PointD,
        from: PointD,
        direction: PointD,
    ) -> Result<()> {
        let a0 = (from.y - center.y).atan2(from.x - center.x);
        let heading = direction.y.atan2(direction.x);
        // Sweep half a turn whichever way passes through the heading.
        let sweep = if (a0 + 0.5 * PI - heading).cos() >= 0.0 {
            PI
        } else {
            -PI
        };
        let mut arc = Vec::new();
        try_reserve(&mut arc, 64, "stroke points")?;
        push_arc(&mut arc, center, self.mid, a0, a0 + sweep);
        out.extend_from_slice(&arc)
    }
}

fn first_segment_end(points: &[PointD]) -> usize {
    (1..points.len())
        .find(|&i| !points[i].coincides(&points[0]))
        .unwrap_or(points.len() - 1)
}

/// Push the offset-line intersection when the miter is within limits,
/// otherwise both corners of the bevel.
#[inline]
fn push_corner(chain: &mut Vec<PointD>, within_limit: bool, boxes: &[PointD; 5]) {
    if within_limit {
        chain.push(boxes[4]);
    } else {
        chain.extend_from_slice(&[boxes[1], boxes[2]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::segment_sq_distance;

    fn pt(x: f64, y: f64) -> PointD {
        PointD::new(x, y)
    }

    fn style(width: f64, cap: LineCap, join: LineJoin) -> StrokeStyle {
        let mut s = StrokeStyle::new();
        s.set_width(width).set_line_cap(cap).set_line_join(join);
        s
    }

    fn polygon(outline: StrokeOutline) -> PathPointList {
        match outline {
            StrokeOutline::Polygon(l) => l,
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    fn near(a: PointD, b: PointD) -> bool {
        a.distance(&b) < 1e-6
    }

    fn segment() -> PathPointList {
        PathPointList::from_points(vec![pt(0.0, 0.0), pt(10.0, 0.0)])
    }

    fn corner() -> PathPointList {
        PathPointList::from_points(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)])
    }

    #[test]
    fn test_butt_segment_is_rectangle() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Butt, LineJoin::Miter));
        let l = polygon(o.outline(&segment()).unwrap());
        let expect = [pt(0.0, 2.0), pt(10.0, 2.0), pt(10.0, -2.0), pt(0.0, -2.0), pt(0.0, 2.0)];
        assert_eq!(l.coordinate_count(), expect.len());
        for (a, b) in l.points().iter().zip(expect.iter()) {
            assert!(near(*a, *b), "{a:?} vs {b:?}");
        }
        assert!(l.is_closed());
    }

    #[test]
    fn test_square_cap_extends_ends() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Square, LineJoin::Miter));
        let l = polygon(o.outline(&segment()).unwrap());
        let b = l.bounds();
        assert!((b.x1 + 2.0).abs() < 1e-6 && (b.x2 - 12.0).abs() < 1e-6);
        assert!((b.y1 + 2.0).abs() < 1e-6 && (b.y2 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_cap_stays_within_half_width() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Round, LineJoin::Miter));
        let l = polygon(o.outline(&segment()).unwrap());
        for p in l.points() {
            let d = segment_sq_distance(&pt(0.0, 0.0), &pt(10.0, 0.0), p.x, p.y).sqrt();
            assert!((d - 2.0).abs() < 1e-6, "{p:?}");
        }
        let b = l.bounds();
        assert!(b.x1 < -1.0 && b.x2 > 11.0);
        assert!(l.is_closed());
    }

    #[test]
    fn test_miter_join_corner() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Butt, LineJoin::Miter));
        let l = polygon(o.outline(&corner()).unwrap());
        assert!(l.points().iter().any(|p| near(*p, pt(12.0, -2.0))));
        assert!(l.points().iter().any(|p| near(*p, pt(8.0, 2.0))));
        assert_eq!(l.coordinate_count(), 7);
    }

    #[test]
    fn test_bevel_join_cuts_corner() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Butt, LineJoin::Bevel));
        let l = polygon(o.outline(&corner()).unwrap());
        assert!(!l.points().iter().any(|p| near(*p, pt(12.0, -2.0))));
        assert!(l.points().iter().any(|p| near(*p, pt(10.0, -2.0))));
        assert!(l.points().iter().any(|p| near(*p, pt(12.0, 0.0))));
    }

    #[test]
    fn test_miter_limit_falls_back_to_bevel() {
        let mut s = style(4.0, LineCap::Butt, LineJoin::Miter);
        s.set_miter_limit(1.0);
        let l = polygon(StrokeOutliner::new(&s).outline(&corner()).unwrap());
        assert!(!l.points().iter().any(|p| near(*p, pt(12.0, -2.0))));
        assert!(l.points().iter().any(|p| near(*p, pt(10.0, -2.0))));
    }

    #[test]
    fn test_round_join_arc_on_radius() {
        let o = StrokeOutliner::new(&style(4.0, LineCap::Butt, LineJoin::Round));
        let l = polygon(o.outline(&corner()).unwrap());
        let c = pt(10.0, 0.0);
        let arc: Vec<_> = l
            .points()
            .iter()
            .filter(|p| p.x > 10.0 + 1e-6 && p.y < -1e-6)
            .collect();
        assert!(!arc.is_empty());
        for p in arc {
            assert!((p.distance(&c) - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_closed_path_output_closed() {
        let square = PathPointList::from_points(vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(0.0, 10.0),
            pt(0.0, 0.0),
        ]);
        for join in [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
            let o = StrokeOutliner::new(&style(2.0, LineCap::Round, join));
            let l = polygon(o.outline(&square).unwrap());
            assert!(l.is_closed());
            assert_eq!(l.first(), l.last());
        }
    }

    #[test]
    fn test_zero_length_subpath() {
        let p = PathPointList::from_points(vec![pt(5.0, 5.0), pt(5.0, 5.0)]);
        let round = StrokeOutliner::new(&style(4.0, LineCap::Round, LineJoin::Miter));
        assert_eq!(round.outline(&p).unwrap(), StrokeOutline::Dot(pt(5.0, 5.0)));
        let butt = StrokeOutliner::new(&style(4.0, LineCap::Butt, LineJoin::Miter));
        assert_eq!(butt.outline(&p).unwrap(), StrokeOutline::Empty);
        let square = StrokeOutliner::new(&style(4.0, LineCap::Square, LineJoin::Miter));
        let l = polygon(square.outline(&p).unwrap());
        let b = l.bounds();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (3.0, 3.0, 7.0, 7.0));
    }

    #[test]
    fn test_slopes_axis_aligned() {
        let (s, i) = slopes(10.0, 0.0);
        assert_eq!(s, 0.0);
        assert_eq!(i, 1.0 / DRAW_EPSILON);
        let (s, i) = slopes(0.0, 10.0);
        assert_eq!(s, 1.0 / DRAW_EPSILON);
        assert_eq!(i, 0.0);
    }
}
