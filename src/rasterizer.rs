//! Antialiased scanline rasterization.
//!
//! The rasterizer sweeps the pixel rows covered by a primitive and, for
//! each pixel, asks the edge tables for fill and stroke coverage, then
//! composites the fill paint and the stroke paint over the surface.
//!
//! Rows are split into contiguous ranges, one per worker, and the ranges
//! run on the rayon pool. Every worker sweeps its rows top to bottom over
//! private clones of the tables, so the scan caches are never shared.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::basics::{iceil, ifloor, FillRule, PointD, RectD, RectI};
use crate::color::{Rgba, Rgba8};
use crate::config::RenderConfig;
use crate::edge_table::{band_coverage, EdgeTable};
use crate::error::{DrawError, Result};
use crate::paint::Paint;
use crate::surface::{PixelWindow, RasterSurface};

/// Progress callback: `(completed_rows, total_rows)`. Returning `false`
/// cancels the pass.
pub type ProgressMonitor = dyn Fn(usize, usize) -> bool + Send + Sync;

/// Everything one rasterization pass needs.
#[derive(Debug, Clone, Default)]
pub struct RasterJob<'a> {
    /// Edges of the primitive's own geometry.
    pub geometry: EdgeTable,
    /// Stroke-body polygons, covered under the non-zero rule.
    pub stroke_body: EdgeTable,
    /// Centers of zero-length round-capped subpaths.
    pub dots: Vec<PointD>,
    /// Half width of the band stroked around the geometry's edges.
    pub band_mid: f64,
    /// Stroke the band around the geometry's (non-ghost) edges.
    pub stroke_band: bool,
    /// Radius of the dots.
    pub dot_mid: f64,
    pub fill_rule: FillRule,
    pub antialias: bool,
    pub fill: Option<&'a dyn Paint>,
    pub stroke: Option<&'a dyn Paint>,
}

impl RasterJob<'_> {
    /// Float bounds of everything the job can touch.
    fn bounds(&self) -> RectD {
        let mut b = RectD::empty();
        if !self.geometry.is_empty() {
            let mut g = self.geometry.bounds();
            if self.stroke_band {
                g.expand(self.band_mid);
            }
            b.unite(&g);
        }
        if !self.stroke_body.is_empty() {
            b.unite(&self.stroke_body.bounds());
        }
        for d in &self.dots {
            b.unite(&RectD::new(
                d.x - self.dot_mid,
                d.y - self.dot_mid,
                d.x + self.dot_mid,
                d.y + self.dot_mid,
            ));
        }
        b
    }

    /// Fill and stroke coverage at `(x, y)` from the worker's tables.
    fn coverage(&self, tables: &mut (EdgeTable, EdgeTable), x: f64, y: f64) -> (f64, f64) {
        let fill_enabled = self.fill.is_some();
        let (mut fill, mut stroke) = if tables.0.is_empty() {
            (0.0, 0.0)
        } else {
            tables.0.coverage(
                x,
                y,
                self.band_mid,
                fill_enabled,
                self.fill_rule,
                self.stroke_band,
            )
        };
        if self.stroke.is_some() {
            if !tables.1.is_empty() && stroke < 1.0 {
                let (body, _) = tables.1.coverage(x, y, 0.0, true, FillRule::NonZero, false);
                stroke = stroke.max(body);
            }
            for d in &self.dots {
                let (dx, dy) = (x - d.x, y - d.y);
                stroke = band_coverage(dx * dx + dy * dy, self.dot_mid, stroke);
            }
        } else {
            stroke = 0.0;
        }
        if !self.antialias {
            fill = if fill > 0.25 { 1.0 } else { 0.0 };
            stroke = if stroke > 0.25 { 1.0 } else { 0.0 };
        }
        (fill, stroke)
    }
}

/// Row-parallel coverage sweep over a surface.
#[derive(Debug, Clone)]
pub struct ScanlineRasterizer<'a> {
    config: &'a RenderConfig,
}

impl<'a> ScanlineRasterizer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Pixel rows and columns a job touches, clamped to the surface. `None`
    /// when nothing is visible.
    pub fn pixel_bounds(job: &RasterJob<'_>, width: usize, height: usize) -> Option<RectI> {
        let mut b = job.bounds();
        if !b.is_valid() || width == 0 || height == 0 {
            return None;
        }
        b.expand(1.0);
        let r = RectI::new(
            iceil(b.x1 - 0.5).max(0),
            iceil(b.y1 - 0.5).max(0),
            ifloor(b.x2 + 0.5).min(width as i64 - 1),
            ifloor(b.y2 + 0.5).min(height as i64 - 1),
        );
        r.is_valid().then_some(r)
    }

    /// Sweep `job` into `surface`.
    ///
    /// Rows written before a worker failure or cancellation stay written.
    pub fn rasterize(
        &self,
        surface: &dyn RasterSurface,
        job: &RasterJob<'_>,
        progress: Option<&ProgressMonitor>,
    ) -> Result<()> {
        let region = match Self::pixel_bounds(job, surface.width(), surface.height()) {
            Some(r) => r,
            None => {
                log::debug!("rasterize: nothing visible");
                return Ok(());
            }
        };
        let rows = region.height() as usize;
        let workers = self.config.worker_count(rows, surface.is_memory_backed());
        let chunk = (rows + workers - 1) / workers;
        log::debug!(
            "rasterize rows {}..={} cols {}..={} with {} workers",
            region.y1,
            region.y2,
            region.x1,
            region.x2,
            workers
        );

        let failed = AtomicBool::new(false);
        let cancelled = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);

        let sweep = |worker: usize| {
            let start = region.y1 + (worker * chunk) as i64;
            let end = (start + chunk as i64 - 1).min(region.y2);
            let mut tables = (job.geometry.clone(), job.stroke_body.clone());
            for y in start..=end {
                if failed.load(Ordering::Relaxed) || cancelled.load(Ordering::Relaxed) {
                    return;
                }
                if let Err(e) = self.sweep_row(surface, job, &mut tables, region, y) {
                    log::warn!("rasterize: row {} failed: {}", y, e);
                    failed.store(true, Ordering::Relaxed);
                    return;
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(monitor) = progress {
                    if !monitor(done, rows) {
                        cancelled.store(true, Ordering::Relaxed);
                    }
                }
            }
        };
        if workers > 1 {
            (0..workers).into_par_iter().for_each(sweep);
        } else {
            sweep(0);
        }

        let rows_completed = completed.load(Ordering::Relaxed);
        if failed.load(Ordering::Relaxed) {
            return Err(DrawError::WorkerFailed {
                rows_completed,
                rows_total: rows,
            });
        }
        if cancelled.load(Ordering::Relaxed) {
            return Err(DrawError::Cancelled);
        }
        Ok(())
    }

    fn sweep_row(
        &self,
        surface: &dyn RasterSurface,
        job: &RasterJob<'_>,
        tables: &mut (EdgeTable, EdgeTable),
        region: RectI,
        y: i64,
    ) -> Result<()> {
        let width = region.width() as usize;
        let mut window = surface.acquire_write_window(region.x1, y, width, 1)?;
        for col in 0..width {
            let x = region.x1 + col as i64;
            let (fill, stroke) = job.coverage(tables, x as f64, y as f64);
            if fill <= 0.0 && stroke <= 0.0 {
                continue;
            }
            composite(&mut window, col, x, y, job.fill, fill, job.stroke, stroke);
        }
        surface.release_and_sync(window)
    }
}

/// Composite the fill paint, then the stroke paint, over one pixel.
#[allow(clippy::too_many_arguments)]
#[inline]
fn composite(
    window: &mut PixelWindow,
    col: usize,
    x: i64,
    y: i64,
    fill: Option<&dyn Paint>,
    fill_alpha: f64,
    stroke: Option<&dyn Paint>,
    stroke_alpha: f64,
) {
    let mut dst: Rgba = window.pixel(col, 0).into();
    if let Some(p) = fill {
        if fill_alpha > 0.0 {
            dst = p.color_at(x, y).over(&dst, fill_alpha);
        }
    }
    if let Some(p) = stroke {
        if stroke_alpha > 0.0 {
            dst = p.color_at(x, y).over(&dst, stroke_alpha);
        }
    }
    window.set_pixel(col, 0, Rgba8::from(dst));
}

/// Paint the single pixel containing `p` at full coverage. Points outside
/// the surface are ignored.
pub fn paint_point(surface: &dyn RasterSurface, p: PointD, paint: &dyn Paint) -> Result<()> {
    let (x, y) = (iceil(p.x - 0.5), iceil(p.y - 0.5));
    if x < 0 || y < 0 || x >= surface.width() as i64 || y >= surface.height() as i64 {
        return Ok(());
    }
    let mut window = surface.acquire_write_window(x, y, 1, 1)?;
    let dst: Rgba = window.pixel(0, 0).into();
    window.set_pixel(0, 0, Rgba8::from(paint.color_at(x, y).over(&dst, 1.0)));
    surface.release_and_sync(window)
}
