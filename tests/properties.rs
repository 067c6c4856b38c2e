//! Properties that hold across many inputs.

use polydraw::dash::DashPattern;
use polydraw::edge_table::EdgeTable;
use polydraw::math::{polyline_length, segment_sq_distance};
use polydraw::path_points::PathPointList;
use polydraw::stroke::{StrokeOutline, StrokeOutliner, StrokeStyle};
use polydraw::{
    DrawStyle, FillRule, LineCap, LineJoin, Pixmap, PointD, Primitive, RenderConfig, Renderer,
    Rgba, Rgba8,
};

fn pt(x: f64, y: f64) -> PointD {
    PointD::new(x, y)
}

/// Small deterministic generator so the sampled shapes are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Integer coordinate in `[0, n)`.
    fn coord(&mut self, n: u32) -> f64 {
        (self.next_f64() * n as f64).floor()
    }
}

fn random_polygon(rng: &mut Lcg, n: usize) -> PathPointList {
    let mut pts: Vec<PointD> = (0..n).map(|_| pt(rng.coord(40), rng.coord(40))).collect();
    pts.push(pts[0]);
    PathPointList::from_points(pts)
}

/// Crossing-number reference: signed count of edges crossing a ray to +x.
fn reference_winding(points: &[PointD], x: f64, y: f64) -> i32 {
    let mut w = 0;
    for s in points.windows(2) {
        let (a, b) = (s[0], s[1]);
        if (a.y <= y) != (b.y <= y) {
            let t = (y - a.y) / (b.y - a.y);
            if x < a.x + t * (b.x - a.x) {
                w += if b.y > a.y { 1 } else { -1 };
            }
        }
    }
    w
}

#[test]
fn winding_matches_ray_casting() {
    let mut rng = Lcg(7);
    for _ in 0..20 {
        let poly = random_polygon(&mut rng, 7);
        let table = EdgeTable::build(std::slice::from_ref(&poly)).unwrap();
        for j in 0..40 {
            for i in 0..40 {
                // Off the integer lattice, so never on a vertex.
                let (x, y) = (i as f64 + 0.37, j as f64 + 0.61);
                let on_edge = poly
                    .points()
                    .windows(2)
                    .any(|s| segment_sq_distance(&s[0], &s[1], x, y) < 1e-12);
                if on_edge {
                    continue;
                }
                let expected = reference_winding(poly.points(), x, y);
                let got = table.winding_number(x, y);
                for rule in [FillRule::EvenOdd, FillRule::NonZero] {
                    assert_eq!(
                        rule.is_inside(got),
                        rule.is_inside(expected),
                        "{:?} at ({}, {}) in {:?}",
                        rule,
                        x,
                        y,
                        poly.points()
                    );
                }
            }
        }
    }
}

#[test]
fn coverage_stays_in_unit_range() {
    let mut rng = Lcg(11);
    for _ in 0..10 {
        let poly = random_polygon(&mut rng, 6);
        for mid in [0.0, 0.5, 1.0, 2.5, 6.0] {
            let mut table = EdgeTable::build(std::slice::from_ref(&poly)).unwrap();
            for j in -2..44 {
                for i in -2..44 {
                    let (fill, stroke) = table.coverage(
                        i as f64,
                        j as f64,
                        mid,
                        true,
                        FillRule::NonZero,
                        true,
                    );
                    assert!((0.0..=1.0).contains(&fill), "fill {}", fill);
                    assert!((0.0..=1.0).contains(&stroke), "stroke {}", stroke);
                }
            }
        }
    }
}

#[test]
fn point_primitive_changes_exactly_one_pixel() {
    let surface = Pixmap::new(16, 16).unwrap();
    let mut style = DrawStyle::new();
    style.set_fill_color(Rgba::new_rgb(1.0, 1.0, 0.0));
    Renderer::new(RenderConfig::default())
        .draw_primitive(&surface, &Primitive::Point(pt(7.0, 9.0)), &style)
        .unwrap();
    let changed: Vec<usize> = surface
        .to_vec()
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != Rgba8::default())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, vec![9 * 16 + 7]);
}

#[test]
fn empty_primitives_leave_surface_unchanged() {
    let surface = Pixmap::new(16, 16).unwrap();
    let mut style = DrawStyle::new();
    style
        .set_fill_color(Rgba::new_rgb(1.0, 1.0, 0.0))
        .set_stroke_color(Rgba::new_rgb(0.0, 1.0, 0.0));
    let renderer = Renderer::default();
    for p in [
        Primitive::Polyline(Vec::new()),
        Primitive::Polygon(Vec::new()),
        Primitive::Path(String::new()),
    ] {
        renderer.draw_primitive(&surface, &p, &style).unwrap();
    }
    assert!(surface.to_vec().iter().all(|c| *c == Rgba8::default()));
}

#[test]
fn outliner_output_is_closed() {
    let open = PathPointList::from_points(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)]);
    let closed = PathPointList::from_points(vec![
        pt(0.0, 0.0),
        pt(10.0, 0.0),
        pt(10.0, 10.0),
        pt(0.0, 0.0),
    ]);
    for cap in [LineCap::Butt, LineCap::Round, LineCap::Square] {
        for join in [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
            let mut style = StrokeStyle::new();
            style.set_width(3.0).set_line_cap(cap).set_line_join(join);
            let outliner = StrokeOutliner::new(&style);
            for path in [&open, &closed] {
                match outliner.outline(path).unwrap() {
                    StrokeOutline::Polygon(p) => {
                        assert!(p.is_closed());
                        assert!(p.first().unwrap().coincides(p.last().unwrap()));
                    }
                    other => panic!("expected a polygon, got {:?}", other),
                }
            }
        }
    }
}

#[test]
fn round_capped_single_point_is_disc() {
    let surface = Pixmap::new(32, 32).unwrap();
    let mut style = DrawStyle::new();
    style
        .set_stroke_color(Rgba::new_rgb(1.0, 0.0, 0.0))
        .set_stroke_width(12.0)
        .set_line_cap(LineCap::Round);
    let center = pt(16.0, 16.0);
    Renderer::default()
        .draw_primitive(&surface, &Primitive::Polyline(vec![center]), &style)
        .unwrap();
    for y in 0..32 {
        for x in 0..32 {
            let d = pt(x as f64, y as f64).distance(&center);
            let a = surface.pixel(x, y).unwrap().a;
            if d <= 6.0 - 0.5 {
                assert_eq!(a, 255, "({}, {}) at {}", x, y, d);
            } else if d >= 6.0 + 0.75 {
                assert_eq!(a, 0, "({}, {}) at {}", x, y, d);
            }
        }
    }
}

#[test]
fn dash_lengths_reproduce_path_length() {
    let path = PathPointList::from_points(vec![
        pt(0.0, 0.0),
        pt(17.0, 0.0),
        pt(17.0, 9.5),
        pt(3.0, 30.0),
    ]);
    let total = polyline_length(path.points());
    let mut rng = Lcg(3);
    for _ in 0..25 {
        let array: Vec<f64> = (0..2).map(|_| 0.5 + rng.next_f64() * 6.0).collect();
        let offset = rng.next_f64() * 20.0 - 10.0;
        let dash = DashPattern::new(&array, offset).unwrap();
        let dashes = dash.split(&path, 1.0).unwrap();

        let on: f64 = dashes.iter().map(|d| polyline_length(d.points())).sum();
        // Walk the gaps along the path: arc-length position of each dash end.
        let position = |p: &PointD| {
            let mut acc = 0.0;
            for s in path.points().windows(2) {
                let seg = s[0].distance(&s[1]);
                let along = s[0].distance(p);
                let back = p.distance(&s[1]);
                if (along + back - seg).abs() < 1e-7 {
                    return acc + along;
                }
                acc += seg;
            }
            acc
        };
        let mut off = 0.0;
        let mut cursor = 0.0;
        for d in &dashes {
            off += position(d.first().unwrap()) - cursor;
            cursor = position(d.last().unwrap());
        }
        off += total - cursor;
        assert!(
            (on + off - total).abs() < 1e-6,
            "{:?} offset {}: on {} off {} total {}",
            array,
            offset,
            on,
            off,
            total
        );
    }
}

#[test]
fn flattened_polyline_is_unchanged() {
    let config = RenderConfig::default();
    let curve = Primitive::Bezier(vec![pt(0.0, 0.0), pt(20.0, 40.0), pt(50.0, -10.0)])
        .trace(&config)
        .unwrap();
    let points = curve[0].points().to_vec();
    let again = Primitive::Polyline(points.clone()).trace(&config).unwrap();
    assert_eq!(again[0].points(), points.as_slice());
}
