//! Primitive descriptors and their flattening into point lists.

use crate::basics::PointD;
use crate::config::RenderConfig;
use crate::curves::flatten_bezier;
use crate::ellipse::Ellipse;
use crate::error::{DrawError, Result};
use crate::path_parser::parse_path;
use crate::path_points::{PaintMethod, PathPointList};
use crate::rounded_rect::RoundedRect;

/// One drawing request's geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A single pixel.
    Point(PointD),
    Line(PointD, PointD),
    /// Axis-aligned rectangle spanned by two corners.
    Rectangle(PointD, PointD),
    RoundRectangle {
        start: PointD,
        end: PointD,
        radii: PointD,
    },
    /// Circle through `perimeter`.
    Circle { center: PointD, perimeter: PointD },
    /// Elliptical arc; angles in degrees.
    Ellipse {
        center: PointD,
        radii: PointD,
        start_angle: f64,
        end_angle: f64,
    },
    /// Arc of the ellipse inscribed in the box `start`..`end`; angles in
    /// degrees.
    Arc {
        start: PointD,
        end: PointD,
        start_angle: f64,
        end_angle: f64,
    },
    /// Bezier of any degree: three controls form a quadratic, four a cubic.
    Bezier(Vec<PointD>),
    Polyline(Vec<PointD>),
    /// Polyline closed back onto its first point.
    Polygon(Vec<PointD>),
    /// SVG path data.
    Path(String),
}

impl Primitive {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Point(_) => "point",
            Primitive::Line(..) => "line",
            Primitive::Rectangle(..) => "rectangle",
            Primitive::RoundRectangle { .. } => "round rectangle",
            Primitive::Circle { .. } => "circle",
            Primitive::Ellipse { .. } => "ellipse",
            Primitive::Arc { .. } => "arc",
            Primitive::Bezier(_) => "bezier",
            Primitive::Polyline(_) => "polyline",
            Primitive::Polygon(_) => "polygon",
            Primitive::Path(_) => "path",
        }
    }

    /// Flatten into one point list per subpath.
    ///
    /// Curved primitives whose estimated point count exceeds the
    /// configured ceiling are refused before anything is allocated for
    /// them. An empty result means there is nothing to draw.
    pub fn trace(&self, config: &RenderConfig) -> Result<Vec<PathPointList>> {
        let name = self.kind_name();
        let subpaths = match self {
            Primitive::Point(p) => vec![PathPointList::single_point(*p)],
            Primitive::Line(a, b) => {
                if a.coincides(b) {
                    vec![PathPointList::single_point(*a)]
                } else {
                    vec![PathPointList::from_points(vec![*a, *b])]
                }
            }
            Primitive::Rectangle(a, b) => {
                if (a.x - b.x).abs() < crate::basics::DRAW_EPSILON
                    && (a.y - b.y).abs() < crate::basics::DRAW_EPSILON
                {
                    vec![PathPointList::single_point(*a)]
                } else {
                    let mut l = PathPointList::new();
                    RoundedRect::rect(*a, *b).trace(&mut l)?;
                    vec![l]
                }
            }
            Primitive::RoundRectangle { start, end, radii } => {
                let mut l = PathPointList::new();
                RoundedRect::new(*start, *end, *radii).trace(&mut l)?;
                vec![l]
            }
            Primitive::Circle { center, perimeter } => {
                trace_ellipse(Ellipse::circle(*center, *perimeter), config)?
            }
            Primitive::Ellipse {
                center,
                radii,
                start_angle,
                end_angle,
            } => trace_ellipse(
                Ellipse::new(*center, *radii, *start_angle, *end_angle),
                config,
            )?,
            Primitive::Arc {
                start,
                end,
                start_angle,
                end_angle,
            } => trace_ellipse(Ellipse::arc(*start, *end, *start_angle, *end_angle), config)?,
            Primitive::Bezier(controls) => {
                let mut l = PathPointList::new();
                flatten_bezier(controls, &mut l)?;
                l.update_closed();
                vec![l]
            }
            Primitive::Polyline(points) => vec![PathPointList::from_points(points.clone())],
            Primitive::Polygon(points) => {
                let mut pts = points.clone();
                if let (Some(first), Some(last)) = (pts.first().copied(), pts.last()) {
                    if pts.len() > 1 && !first.coincides(last) {
                        pts.push(first);
                    }
                }
                let mut l = PathPointList::from_points(pts);
                l.set_closed(l.coordinate_count() > 1);
                vec![l]
            }
            Primitive::Path(data) => parse_path(data)?,
        };

        let mut total = 0usize;
        for l in &subpaths {
            l.check_finite(name)?;
            total += l.coordinate_count();
        }
        if total > config.max_coordinates() {
            return Err(DrawError::TooManyCoordinates {
                count: total,
                limit: config.max_coordinates(),
            });
        }
        Ok(subpaths
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect())
    }
}

fn trace_ellipse(e: Ellipse, config: &RenderConfig) -> Result<Vec<PathPointList>> {
    let estimate = e.estimated_coordinates();
    if estimate > config.max_curve_coordinates() {
        return Err(DrawError::TooManyCoordinates {
            count: estimate,
            limit: config.max_curve_coordinates(),
        });
    }
    let mut l = PathPointList::new();
    e.trace(&mut l)?;
    if l.coordinate_count() == 1 {
        l.set_paint_method(PaintMethod::Point);
    }
    l.update_closed();
    Ok(vec![l])
}
