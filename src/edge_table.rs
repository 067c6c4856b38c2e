//! Y-monotonic edge tables and per-pixel coverage.
//!
//! A path's point lists are cut into edges whose y never decreases along
//! the points, then sorted so the scanline sweep can stop at the first
//! edge that starts below the current row. Open subpaths get a ghost edge
//! back to their first point: it closes the area for filling but is never
//! stroked.
//!
//! Each edge carries a small scan cache remembering the first segment
//! that touched the previous row. The cache is mutated during the sweep,
//! so every worker owns its own clone of the table.

use core::cmp::Ordering;

use crate::basics::{FillRule, PointD, RectD, DRAW_EPSILON};
use crate::error::{try_reserve, Result};
use crate::math::segment_sq_distance;
use crate::path_points::PathPointList;

// ============================================================================
// Edge
// ============================================================================

/// Winding direction of an edge in its original point order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Originally ran toward decreasing y; its points were reversed.
    Up,
    /// Originally ran toward increasing y.
    Down,
}

impl Direction {
    #[inline]
    fn winding(self) -> i32 {
        match self {
            Direction::Down => 1,
            Direction::Up => -1,
        }
    }
}

/// Sweep state of one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanCache {
    /// Row the cache was last updated on.
    pub last_y: f64,
    /// First segment index touching `last_y`'s band.
    pub resume_index: usize,
}

impl Default for ScanCache {
    fn default() -> Self {
        Self {
            last_y: f64::NEG_INFINITY,
            resume_index: 0,
        }
    }
}

/// A y-monotonic run of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub bounds: RectD,
    pub points: Vec<PointD>,
    pub direction: Direction,
    /// Closing edge of an open subpath; filled but never stroked.
    pub ghost: bool,
    pub scan_cache: ScanCache,
}

impl Edge {
    fn new(mut points: Vec<PointD>, direction: Direction, ghost: bool) -> Self {
        if direction == Direction::Up {
            points.reverse();
        }
        let (x1, x2) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let y1 = points.first().map_or(0.0, |p| p.y);
        let y2 = points.last().map_or(0.0, |p| p.y);
        Self {
            bounds: RectD::new(x1, y1, x2, y2),
            points,
            direction,
            ghost,
            scan_cache: ScanCache::default(),
        }
    }

    /// Angle of the first segment, in `(-PI, PI]`.
    fn first_angle(&self) -> f64 {
        match self.points.as_slice() {
            [p0, p1, ..] => (p1.y - p0.y).atan2(p1.x - p0.x),
            _ => 0.0,
        }
    }

    /// Sweep order: top-most start first, then left-most, then the
    /// steeper-to-the-right first segment, then the second point.
    fn sweep_order(&self, other: &Edge) -> Ordering {
        let (p0, q0) = (self.points[0], other.points[0]);
        let (p1, q1) = (self.points[1], other.points[1]);
        p0.y
            .total_cmp(&q0.y)
            .then(p0.x.total_cmp(&q0.x))
            .then(other.first_angle().total_cmp(&self.first_angle()))
            .then(p1.y.total_cmp(&q1.y))
            .then(p1.x.total_cmp(&q1.x))
    }
}

// ============================================================================
// Stroke band
// ============================================================================

/// Stroke coverage of a point at squared distance `d2` from a centerline
/// whose half-width is `mid`, given the coverage accumulated so far.
///
/// Points within `mid - 0.25` are fully covered, points beyond
/// `mid + 0.75` are untouched, and the band in between fades out.
#[inline]
pub fn band_coverage(d2: f64, mid: f64, current: f64) -> f64 {
    if current >= 1.0 {
        return current;
    }
    let outer = mid + 0.5 + 0.25;
    if d2 > outer * outer {
        return current;
    }
    let inner = mid - 0.5 + 0.25;
    if d2 <= inner * inner {
        return 1.0;
    }
    let beta = if (d2 - 1.0).abs() < DRAW_EPSILON {
        1.0
    } else {
        d2.sqrt()
    };
    let alpha = beta - mid - 0.5 - 0.25;
    current.max(alpha * alpha)
}

// ============================================================================
// Edge table
// ============================================================================

/// Sorted, y-monotonic edges of one path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeTable {
    edges: Vec<Edge>,
}

impl EdgeTable {
    /// Cut every subpath into monotonic edges and sort them for the sweep.
    ///
    /// Consecutive duplicate points are dropped per subpath; a subpath
    /// that collapses to one point contributes no edges.
    pub fn build(subpaths: &[PathPointList]) -> Result<EdgeTable> {
        let mut edges = Vec::new();
        let mut points = Vec::new();
        for subpath in subpaths {
            points.clear();
            try_reserve(&mut points, subpath.coordinate_count(), "edge points")?;
            for p in subpath.points() {
                if points.last().map_or(true, |q: &PointD| !q.coincides(p)) {
                    points.push(*p);
                }
            }
            let (first, last) = match (points.first(), points.last()) {
                (Some(f), Some(l)) if points.len() > 1 => (*f, *l),
                _ => continue,
            };
            append_monotonic(&mut edges, &points, false)?;
            if !first.coincides(&last) {
                append_monotonic(&mut edges, &[last, first], true)?;
            }
        }
        edges.sort_by(|a, b| a.sweep_order(b));

        let table = EdgeTable { edges };
        if log::log_enabled!(log::Level::Trace) {
            table.log_edges();
        }
        Ok(table)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Union of all edge bounds; an empty table gives an invalid box.
    pub fn bounds(&self) -> RectD {
        let mut r = RectD::empty();
        for e in &self.edges {
            r.unite(&e.bounds);
        }
        r
    }

    fn log_edges(&self) {
        log::trace!("begin edge table ({} edges)", self.edges.len());
        for (i, e) in self.edges.iter().enumerate() {
            log::trace!(
                "  edge {}: direction {:?}, ghost {}, bounds ({}, {}) - ({}, {}), {} points",
                i,
                e.direction,
                e.ghost,
                e.bounds.x1,
                e.bounds.y1,
                e.bounds.x2,
                e.bounds.y2,
                e.points.len()
            );
            for p in &e.points {
                log::trace!("    {} {}", p.x, p.y);
            }
        }
        log::trace!("end edge table");
    }

    /// Fill and stroke coverage of the pixel sampled at `(x, y)`.
    ///
    /// `mid` is the stroke half-width used for the band around the
    /// centerline; `stroke_band` enables that band. The fill value is the
    /// antialiased coverage under `rule`, or 0 when `fill` is false.
    ///
    /// Rows must be visited in increasing order: edges whose band ends
    /// above `y` are dropped from this table for good.
    pub fn coverage(
        &mut self,
        x: f64,
        y: f64,
        mid: f64,
        fill: bool,
        rule: FillRule,
        stroke_band: bool,
    ) -> (f64, f64) {
        let reach = mid + 0.5;
        let mut stroke = 0.0;
        let mut subpath = 0.0f64;

        let mut k = 0;
        while k < self.edges.len() {
            let bounds = self.edges[k].bounds;
            if y <= bounds.y1 - reach {
                break;
            }
            if y > bounds.y2 + reach {
                self.edges.remove(k);
                continue;
            }
            k += 1;
            if x <= bounds.x1 - reach || x > bounds.x2 + reach {
                continue;
            }
            let e = &mut self.edges[k - 1];
            let n = e.points.len();
            for i in e.scan_cache.resume_index.max(1)..n {
                let (q0, q1) = (e.points[i - 1], e.points[i]);
                if y <= q0.y - reach {
                    break;
                }
                if y > q1.y + reach {
                    continue;
                }
                if e.scan_cache.last_y != y {
                    e.scan_cache.last_y = y;
                    e.scan_cache.resume_index = i;
                }
                let d = segment_sq_distance(&q0, &q1, x, y);
                if stroke_band && !e.ghost {
                    stroke = band_coverage(d, mid, stroke);
                }
                if !fill || d > 1.0 || subpath >= 1.0 {
                    continue;
                }
                if d <= 0.0 {
                    subpath = 1.0;
                    continue;
                }
                let beta = if (d - 1.0).abs() < DRAW_EPSILON {
                    1.0
                } else {
                    d.sqrt()
                };
                let alpha = beta - 1.0;
                subpath = subpath.max(alpha * alpha);
            }
        }

        if !fill {
            return (0.0, stroke);
        }
        if subpath >= 1.0 {
            return (1.0, stroke);
        }
        let winding = self.winding_number(x, y);
        if rule.is_inside(winding) {
            (1.0, stroke)
        } else {
            (subpath, stroke)
        }
    }

    /// Signed crossing count of a ray from `(x, y)` toward negative x.
    pub fn winding_number(&self, x: f64, y: f64) -> i32 {
        let mut winding = 0;
        for e in &self.edges {
            if y <= e.bounds.y1 {
                break;
            }
            if y > e.bounds.y2 || x <= e.bounds.x1 {
                continue;
            }
            if x > e.bounds.x2 {
                winding += e.direction.winding();
                continue;
            }
            let n = e.points.len();
            let mut i = e.scan_cache.resume_index.max(1);
            while i + 1 < n && y > e.points[i].y {
                i += 1;
            }
            let (q0, q1) = (e.points[i - 1], e.points[i]);
            if (q1.x - q0.x) * (y - q0.y) <= (q1.y - q0.y) * (x - q0.x) {
                winding += e.direction.winding();
            }
        }
        winding
    }
}

/// Split `points` into y-monotonic edges and append them to `edges`.
fn append_monotonic(edges: &mut Vec<Edge>, points: &[PointD], ghost: bool) -> Result<()> {
    let mut run: Vec<PointD> = Vec::new();
    try_reserve(&mut run, points.len(), "edge points")?;
    run.push(points[0]);
    let mut direction: Option<Direction> = None;
    for w in points.windows(2) {
        let (prev, p) = (w[0], w[1]);
        let next = if p.y > prev.y || ((p.y - prev.y).abs() < DRAW_EPSILON && p.x > prev.x) {
            Direction::Down
        } else {
            Direction::Up
        };
        if let Some(d) = direction {
            if d != next {
                let done = core::mem::take(&mut run);
                run.push(prev);
                push_edge(edges, done, d, ghost)?;
            }
        }
        direction = Some(next);
        run.push(p);
    }
    if let Some(d) = direction {
        push_edge(edges, run, d, ghost)?;
    }
    Ok(())
}

fn push_edge(edges: &mut Vec<Edge>, points: Vec<PointD>, direction: Direction, ghost: bool) -> Result<()> {
    if points.len() < 2 {
        return Ok(());
    }
    try_reserve(edges, 1, "edges")?;
    edges.push(Edge::new(points, direction, ghost));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> PointD {
        PointD::new(x, y)
    }

    fn rect_table() -> EdgeTable {
        let l = PathPointList::from_points(vec![
            pt(10.0, 10.0),
            pt(10.0, 20.0),
            pt(20.0, 20.0),
            pt(20.0, 10.0),
            pt(10.0, 10.0),
        ]);
        EdgeTable::build(&[l]).unwrap()
    }

    /// Pentagram: the inner pentagon winds twice.
    fn star() -> PathPointList {
        let c = pt(50.0, 50.0);
        let r = 40.0;
        let mut pts = Vec::new();
        for k in 0..=5 {
            let a = -std::f64::consts::FRAC_PI_2 + (k * 2 % 5) as f64 * 2.0 * std::f64::consts::PI / 5.0;
            pts.push(pt(c.x + r * a.cos(), c.y + r * a.sin()));
        }
        PathPointList::from_points(pts)
    }

    #[test]
    fn test_rectangle_edges() {
        let t = rect_table();
        assert_eq!(t.len(), 2);
        for e in t.edges() {
            assert!(!e.ghost);
            for w in e.points.windows(2) {
                assert!(w[1].y >= w[0].y);
            }
            assert_eq!(e.bounds.y1, e.points[0].y);
            assert_eq!(e.bounds.y2, e.points.last().unwrap().y);
        }
        // Steeper first segment sorts first.
        assert_eq!(t.edges()[0].direction, Direction::Down);
        assert_eq!(t.edges()[0].points[1], pt(10.0, 20.0));
        assert_eq!(t.edges()[1].direction, Direction::Up);
        let b = t.bounds();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_open_subpath_gets_ghost() {
        let l = PathPointList::from_points(vec![pt(0.0, 0.0), pt(10.0, 5.0), pt(0.0, 10.0)]);
        let t = EdgeTable::build(&[l]).unwrap();
        assert_eq!(t.edges().iter().filter(|e| e.ghost).count(), 1);
        let ghost = t.edges().iter().find(|e| e.ghost).unwrap();
        assert_eq!(ghost.points, vec![pt(0.0, 0.0), pt(0.0, 10.0)]);
    }

    #[test]
    fn test_duplicates_dropped_and_single_point_ignored() {
        let l = PathPointList::from_points(vec![pt(1.0, 1.0), pt(1.0, 1.0), pt(1.0, 1.0)]);
        assert!(EdgeTable::build(&[l]).unwrap().is_empty());
        let l = PathPointList::from_points(vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(0.0, 5.0)]);
        let t = EdgeTable::build(&[l]).unwrap();
        assert_eq!(t.edges()[0].points.len(), 2);
    }

    #[test]
    fn test_direction_changes_split_edges() {
        // Zigzag: down, up, down.
        let l = PathPointList::from_points(vec![
            pt(0.0, 0.0),
            pt(1.0, 4.0),
            pt(2.0, 1.0),
            pt(3.0, 5.0),
        ]);
        let t = EdgeTable::build(&[l]).unwrap();
        // Three real edges plus the ghost closing the open zigzag.
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_rectangle_coverage() {
        let mut t = rect_table();
        let (fill, stroke) = t.coverage(15.0, 15.0, 0.0, true, FillRule::NonZero, false);
        assert_eq!((fill, stroke), (1.0, 0.0));
        let (fill, _) = t.coverage(25.0, 15.0, 0.0, true, FillRule::NonZero, false);
        assert_eq!(fill, 0.0);
        let (fill, _) = t.coverage(5.0, 15.0, 0.0, true, FillRule::NonZero, false);
        assert_eq!(fill, 0.0);
        // On the boundary.
        let (fill, _) = t.coverage(20.0, 15.0, 0.0, true, FillRule::NonZero, false);
        assert_eq!(fill, 1.0);
    }

    #[test]
    fn test_fill_disabled() {
        let mut t = rect_table();
        let (fill, stroke) = t.coverage(15.0, 15.0, 0.0, false, FillRule::NonZero, false);
        assert_eq!((fill, stroke), (0.0, 0.0));
    }

    #[test]
    fn test_stroke_band() {
        let mut t = rect_table();
        // On the left side with a 2-pixel half width.
        let (_, s) = t.coverage(10.0, 15.0, 2.0, false, FillRule::NonZero, true);
        assert_eq!(s, 1.0);
        let (_, s) = t.coverage(16.0, 15.0, 2.0, false, FillRule::NonZero, true);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_ghost_not_stroked() {
        let l = PathPointList::from_points(vec![pt(0.0, 0.0), pt(10.0, 5.0), pt(0.0, 10.0)]);
        let mut t = EdgeTable::build(&[l]).unwrap();
        // On the ghost edge x = 0, far from the real edges.
        let (_, s) = t.coverage(0.0, 5.0, 1.0, false, FillRule::NonZero, true);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_band_coverage_shape() {
        assert_eq!(band_coverage(0.0, 2.0, 0.0), 1.0);
        assert_eq!(band_coverage(100.0, 2.0, 0.3), 0.3);
        let v = band_coverage(2.5 * 2.5, 2.0, 0.0);
        assert!(v > 0.0 && v <= 0.25);
    }

    #[test]
    fn test_winding_matches_ray_casting() {
        let star = star();
        let t = EdgeTable::build(std::slice::from_ref(&star)).unwrap();
        let pts = star.points();
        for yi in 0..20 {
            for xi in 0..20 {
                let (x, y) = (xi as f64 * 5.0 + 0.37, yi as f64 * 5.0 + 0.61);
                // Brute force: crossings of a ray toward negative x.
                let mut w = 0;
                for s in pts.windows(2) {
                    let (a, b) = (s[0], s[1]);
                    if (a.y < y) != (b.y < y) {
                        let cx = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                        if cx < x {
                            w += if b.y > a.y { 1 } else { -1 };
                        }
                    }
                }
                assert_eq!(t.winding_number(x, y), w, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_even_odd_vs_nonzero_center() {
        let star = star();
        let mut eo = EdgeTable::build(std::slice::from_ref(&star)).unwrap();
        let mut nz = eo.clone();
        let (f, _) = eo.coverage(50.0, 50.0, 0.0, true, FillRule::EvenOdd, false);
        assert_eq!(f, 0.0);
        let (f, _) = nz.coverage(50.0, 50.0, 0.0, true, FillRule::NonZero, false);
        assert_eq!(f, 1.0);
    }

    #[test]
    fn test_alpha_in_unit_range() {
        let mut t = EdgeTable::build(&[star()]).unwrap();
        for yi in 0..100 {
            for xi in 0..100 {
                let (f, s) = t.coverage(xi as f64, yi as f64, 1.5, true, FillRule::EvenOdd, true);
                assert!((0.0..=1.0).contains(&f));
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }
}
