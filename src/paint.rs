//! Paints and the per-primitive drawing style.

use std::fmt;
use std::sync::Arc;

use crate::basics::FillRule;
use crate::color::Rgba;
use crate::dash::DashPattern;
use crate::error::Result;
use crate::stroke::{LineCap, LineJoin, StrokeStyle};
use crate::trans_affine::TransAffine;

// ============================================================================
// Paint
// ============================================================================

/// Source of fill or stroke color, sampled per pixel.
///
/// Gradients and patterns plug in here; the rasterizer only ever asks for
/// the color at a pixel.
pub trait Paint: Send + Sync + fmt::Debug {
    fn color_at(&self, x: i64, y: i64) -> Rgba;

    /// False when the paint can never contribute to a pixel.
    fn is_visible(&self) -> bool {
        true
    }
}

/// A single color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidPaint {
    color: Rgba,
}

impl SolidPaint {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

impl Paint for SolidPaint {
    #[inline]
    fn color_at(&self, _x: i64, _y: i64) -> Rgba {
        self.color
    }

    fn is_visible(&self) -> bool {
        !self.color.is_transparent()
    }
}

// ============================================================================
// DrawStyle
// ============================================================================

/// Fill, stroke and transform settings for one drawing call.
#[derive(Debug, Clone)]
pub struct DrawStyle {
    fill_rule: FillRule,
    stroke: StrokeStyle,
    dash: Option<DashPattern>,
    antialias: bool,
    fill_paint: Option<Arc<dyn Paint>>,
    stroke_paint: Option<Arc<dyn Paint>>,
    affine: TransAffine,
}

impl DrawStyle {
    /// Even-odd fill, 1-pixel butt/miter stroke, antialiased, no paints.
    pub fn new() -> Self {
        Self {
            fill_rule: FillRule::EvenOdd,
            stroke: StrokeStyle::new(),
            dash: None,
            antialias: true,
            fill_paint: None,
            stroke_paint: None,
            affine: TransAffine::new(),
        }
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) -> &mut Self {
        self.fill_rule = rule;
        self
    }
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_stroke_width(&mut self, w: f64) -> &mut Self {
        self.stroke.set_width(w);
        self
    }
    pub fn stroke_width(&self) -> f64 {
        self.stroke.width()
    }

    pub fn set_line_cap(&mut self, lc: LineCap) -> &mut Self {
        self.stroke.set_line_cap(lc);
        self
    }
    pub fn line_cap(&self) -> LineCap {
        self.stroke.line_cap()
    }

    pub fn set_line_join(&mut self, lj: LineJoin) -> &mut Self {
        self.stroke.set_line_join(lj);
        self
    }
    pub fn line_join(&self) -> LineJoin {
        self.stroke.line_join()
    }

    pub fn set_miter_limit(&mut self, ml: f64) -> &mut Self {
        self.stroke.set_miter_limit(ml);
        self
    }
    pub fn miter_limit(&self) -> f64 {
        self.stroke.miter_limit()
    }

    pub fn stroke_style(&self) -> &StrokeStyle {
        &self.stroke
    }

    /// Set the dash array and offset; an invalid pattern is rejected and
    /// the previous one kept.
    pub fn set_dash(&mut self, array: &[f64], offset: f64) -> Result<&mut Self> {
        match DashPattern::new(array, offset) {
            Ok(d) => {
                self.dash = Some(d);
                Ok(self)
            }
            Err(e) => {
                log::warn!("rejected dash pattern {:?}: {}", array, e);
                Err(e)
            }
        }
    }
    pub fn clear_dash(&mut self) -> &mut Self {
        self.dash = None;
        self
    }
    pub fn dash(&self) -> Option<&DashPattern> {
        self.dash.as_ref()
    }

    pub fn set_antialias(&mut self, aa: bool) -> &mut Self {
        self.antialias = aa;
        self
    }
    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn set_fill(&mut self, paint: Arc<dyn Paint>) -> &mut Self {
        self.fill_paint = Some(paint);
        self
    }
    pub fn set_fill_color(&mut self, color: Rgba) -> &mut Self {
        self.set_fill(Arc::new(SolidPaint::new(color)))
    }
    pub fn clear_fill(&mut self) -> &mut Self {
        self.fill_paint = None;
        self
    }
    pub fn fill(&self) -> Option<&Arc<dyn Paint>> {
        self.fill_paint.as_ref()
    }

    pub fn set_stroke(&mut self, paint: Arc<dyn Paint>) -> &mut Self {
        self.stroke_paint = Some(paint);
        self
    }
    pub fn set_stroke_color(&mut self, color: Rgba) -> &mut Self {
        self.set_stroke(Arc::new(SolidPaint::new(color)))
    }
    pub fn clear_stroke(&mut self) -> &mut Self {
        self.stroke_paint = None;
        self
    }
    pub fn stroke(&self) -> Option<&Arc<dyn Paint>> {
        self.stroke_paint.as_ref()
    }

    pub fn set_affine(&mut self, m: TransAffine) -> &mut Self {
        self.affine = m;
        self
    }
    pub fn affine(&self) -> &TransAffine {
        &self.affine
    }

    /// A fill paint is set and can contribute.
    pub fn fill_visible(&self) -> bool {
        self.fill_paint.as_ref().map_or(false, |p| p.is_visible())
    }

    /// A stroke paint is set and can contribute.
    pub fn stroke_visible(&self) -> bool {
        self.stroke_paint.as_ref().map_or(false, |p| p.is_visible())
    }

    /// Stroke half width in device space.
    pub fn half_width(&self) -> f64 {
        self.affine.expansion() * self.stroke.width() / 2.0
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self::new()
    }
}
