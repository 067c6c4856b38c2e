//! Drawing entry point.
//!
//! [`Renderer::draw_primitive`] runs one primitive through the whole
//! pipeline: trace it into point lists, apply the style's transform, build
//! the edge tables for the fill and for the stroke, and hand both to one
//! rasterizer pass.
//!
//! Strokes are produced in one of three ways:
//!
//! - dashed strokes are split into dashes and each dash is outlined;
//! - wide strokes are outlined into a stroke-body polygon;
//! - everything else is a band of half width `mid` around the edges.
//!
//! Round-joined strokes that are also round-capped or closed use the band
//! even when wide, since the band already has round ends and corners.
//! A path that collapses onto one point is a single pixel, unless it is
//! stroked with round or square caps: then the cap alone is drawn.

use std::sync::Arc;

use crate::basics::{PointD, DRAW_EPSILON, MAX_COORDINATE};
use crate::config::RenderConfig;
use crate::edge_table::EdgeTable;
use crate::error::{DrawError, Result};
use crate::paint::{DrawStyle, Paint};
use crate::path_points::{PaintMethod, PathPointList};
use crate::primitive::Primitive;
use crate::rasterizer::{paint_point, ProgressMonitor, RasterJob, ScanlineRasterizer};
use crate::stroke::{LineCap, LineJoin, StrokeOutline, StrokeOutliner};
use crate::surface::RasterSurface;

/// Draws primitives onto raster surfaces.
#[derive(Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
    progress: Option<Arc<ProgressMonitor>>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Install a progress monitor, called after every finished row with
    /// `(completed_rows, total_rows)`. Returning `false` cancels the draw.
    pub fn with_progress<F>(mut self, monitor: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        let monitor: Arc<ProgressMonitor> = Arc::new(monitor);
        self.progress = Some(monitor);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw `items` in order, stopping at the first error. Primitives drawn
    /// before the failure stay drawn.
    pub fn draw_batch(
        &self,
        surface: &dyn RasterSurface,
        items: &[(Primitive, DrawStyle)],
    ) -> Result<()> {
        for (primitive, style) in items {
            self.draw_primitive(surface, primitive, style)?;
        }
        Ok(())
    }

    /// Draw one primitive.
    ///
    /// Geometry errors are reported before any pixel changes.
    pub fn draw_primitive(
        &self,
        surface: &dyn RasterSurface,
        primitive: &Primitive,
        style: &DrawStyle,
    ) -> Result<()> {
        log::debug!("begin draw {}", primitive.kind_name());
        let width = style.stroke_width();
        if !width.is_finite() || width < 0.0 {
            return Err(DrawError::InvalidArgument(
                "stroke width must be finite and non-negative",
            ));
        }
        let mut subpaths = primitive.trace(&self.config)?;
        if subpaths.is_empty() {
            log::debug!("end draw {}: no coordinates", primitive.kind_name());
            return Ok(());
        }
        if !style.affine().is_identity() {
            for l in &mut subpaths {
                l.transform(style.affine());
            }
        }
        check_range(&subpaths)?;

        let is_point = subpaths.len() == 1 && subpaths[0].paint_method() == PaintMethod::Point;
        if is_point {
            if let Some(p) = subpaths[0].first().copied() {
                self.draw_point(surface, p, style)?;
            }
            log::debug!("end draw {}", primitive.kind_name());
            return Ok(());
        }

        let geometry = EdgeTable::build(&subpaths)?;
        // Every subpath collapsed onto a single coordinate. Capped strokes
        // still draw their cap; anything else is a single pixel.
        let degenerate = geometry.is_empty();
        if degenerate && !(style.stroke_visible() && style.line_cap() != LineCap::Butt) {
            if let Some(p) = subpaths[0].first().copied() {
                self.draw_point(surface, p, style)?;
            }
            log::debug!("end draw {}: degenerate", primitive.kind_name());
            return Ok(());
        }

        let fills = subpaths[0].paint_method().fills() && style.fill_visible();
        let strokes = style.stroke_visible();
        if !fills && !strokes {
            log::debug!("end draw {}: nothing visible", primitive.kind_name());
            return Ok(());
        }

        let mid = style.half_width();
        if !mid.is_finite() {
            return Err(DrawError::InvalidArgument("transformed stroke width is not finite"));
        }
        let mut job = RasterJob {
            geometry,
            fill_rule: style.fill_rule(),
            antialias: style.antialias(),
            fill: if fills { style.fill().map(|p| &**p as &dyn Paint) } else { None },
            stroke: if strokes { style.stroke().map(|p| &**p as &dyn Paint) } else { None },
            dot_mid: mid,
            ..RasterJob::default()
        };

        let closed = subpaths.iter().all(|l| l.is_closed());
        let round_ends = (style.line_cap() == LineCap::Round || closed)
            && style.line_join() == LineJoin::Round;
        match style.dash() {
            Some(dash) if strokes && style.stroke_width() > DRAW_EPSILON => {
                let mut dash_style = *style.stroke_style();
                dash_style.set_miter_limit(0.0);
                let outliner = StrokeOutliner::with_half_width(&dash_style, mid);
                let scale = style.affine().expansion();
                let mut dashes = Vec::new();
                for l in &subpaths {
                    dashes.extend(dash.split(l, scale)?);
                }
                log::debug!("dashed stroke: {} dashes", dashes.len());
                self.outline_into(&mut job, &outliner, &dashes)?;
            }
            _ if strokes && (degenerate || (mid > 1.0 && !round_ends)) => {
                let outliner = StrokeOutliner::with_half_width(style.stroke_style(), mid);
                self.outline_into(&mut job, &outliner, &subpaths)?;
            }
            _ => {
                job.stroke_band = strokes;
                job.band_mid = if strokes { mid } else { 0.0 };
            }
        }

        let rasterizer = ScanlineRasterizer::new(&self.config);
        let result = rasterizer.rasterize(surface, &job, self.progress.as_deref());
        log::debug!("end draw {}", primitive.kind_name());
        result
    }

    /// Outline every centerline into the job's stroke body and dots.
    fn outline_into(
        &self,
        job: &mut RasterJob<'_>,
        outliner: &StrokeOutliner,
        centerlines: &[PathPointList],
    ) -> Result<()> {
        let mut bodies = Vec::new();
        for l in centerlines {
            match outliner.outline(l)? {
                StrokeOutline::Polygon(p) => bodies.push(p),
                StrokeOutline::Dot(c) => job.dots.push(c),
                StrokeOutline::Empty => {}
            }
        }
        job.stroke_body = EdgeTable::build(&bodies)?;
        Ok(())
    }

    /// Paint the pixel containing `p` with the fill, or the stroke when
    /// there is no fill.
    fn draw_point(&self, surface: &dyn RasterSurface, p: PointD, style: &DrawStyle) -> Result<()> {
        let paint = if style.fill_visible() {
            style.fill()
        } else if style.stroke_visible() {
            style.stroke()
        } else {
            None
        };
        match paint {
            Some(paint) => paint_point(surface, p, paint.as_ref()),
            None => Ok(()),
        }
    }
}

/// Reject transformed coordinates too large to address a pixel.
fn check_range(subpaths: &[PathPointList]) -> Result<()> {
    for l in subpaths {
        for p in l.points() {
            if !p.is_finite() {
                return Err(DrawError::NonFiniteCoordinate("transformed path"));
            }
            let m = p.x.abs().max(p.y.abs());
            if m > MAX_COORDINATE {
                return Err(DrawError::CoordinateOutOfRange(m));
            }
        }
    }
    Ok(())
}
