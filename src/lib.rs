//! # polydraw
//!
//! Antialiased scanline rasterization of vector primitives into RGBA
//! surfaces.
//!
//! A primitive (point, line, rectangle, rounded rectangle, circle, ellipse,
//! arc, bezier, polyline, polygon or SVG path) is drawn with a
//! [`DrawStyle`] that carries the fill and stroke paints, the fill rule,
//! stroke width, caps, joins, dashes and an affine transform.
//!
//! ## Architecture
//!
//! Every draw runs through the same pipeline:
//!
//! 1. **Tracing**: primitives and path data become lists of points,
//!    with curves flattened to polylines
//! 2. **Edge table**: point lists are split into y-monotonic edges
//!    sorted for the sweep
//! 3. **Stroking**: wide or dashed strokes are outlined into a closed
//!    stroke-body polygon; thin strokes are a coverage band around edges
//! 4. **Scanline rasterizer**: rows are split across worker threads,
//!    each computing per-pixel fill and stroke coverage and compositing
//!    the paints into the surface
//!
//! ```no_run
//! use polydraw::{DrawStyle, Pixmap, PointD, Primitive, Renderer, Rgba};
//!
//! let surface = Pixmap::new(64, 64).unwrap();
//! let mut style = DrawStyle::new();
//! style.set_fill_color(Rgba::new_rgb(1.0, 0.0, 0.0));
//! let circle = Primitive::Circle {
//!     center: PointD::new(32.0, 32.0),
//!     perimeter: PointD::new(52.0, 32.0),
//! };
//! Renderer::default().draw_primitive(&surface, &circle, &style).unwrap();
//! ```

// Foundation types & math
pub mod basics;
pub mod color;
pub mod config;
pub mod error;
pub mod math;
pub mod trans_affine;

// Geometry & tracing
pub mod bezier_arc;
pub mod curves;
pub mod ellipse;
pub mod path_parser;
pub mod path_points;
pub mod primitive;
pub mod rounded_rect;

// Stroking & dashing
pub mod dash;
pub mod stroke;

// Rasterization
pub mod edge_table;
pub mod paint;
pub mod rasterizer;
pub mod renderer;
pub mod surface;

pub use basics::{FillRule, PointD, RectD, RectI};
pub use color::{Rgba, Rgba8};
pub use config::RenderConfig;
pub use error::{DrawError, Result};
pub use paint::{DrawStyle, Paint, SolidPaint};
pub use primitive::Primitive;
pub use renderer::Renderer;
pub use stroke::{LineCap, LineJoin};
pub use surface::{Pixmap, RasterSurface};
pub use trans_affine::TransAffine;
