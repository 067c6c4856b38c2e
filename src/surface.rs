//! Raster surfaces the rasterizer writes into.
//!
//! A surface hands out rectangular pixel windows: the rasterizer acquires
//! a window, composites into it and releases it, at which point the
//! surface writes the pixels back. [`Pixmap`] keeps every row behind its
//! own lock so workers writing disjoint rows never contend.

use std::sync::Mutex;

use crate::color::Rgba8;
use crate::error::{try_reserve, DrawError, Result};

/// A rectangular copy of surface pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelWindow {
    x: i64,
    y: i64,
    width: usize,
    height: usize,
    pixels: Vec<Rgba8>,
}

impl PixelWindow {
    pub fn new(x: i64, y: i64, width: usize, height: usize, pixels: Vec<Rgba8>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            pixels,
        }
    }

    pub fn x(&self) -> i64 {
        self.x
    }
    pub fn y(&self) -> i64 {
        self.y
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at window-relative `(col, row)`.
    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> Rgba8 {
        self.pixels[row * self.width + col]
    }

    #[inline]
    pub fn set_pixel(&mut self, col: usize, row: usize, c: Rgba8) {
        self.pixels[row * self.width + col] = c;
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }
}

/// Pixel storage that rows of a draw call are written into.
///
/// Implementations must tolerate concurrent acquisition of disjoint
/// windows from several workers.
pub trait RasterSurface: Send + Sync {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Whether pixels live in process memory. Other surfaces get fewer
    /// workers.
    fn is_memory_backed(&self) -> bool;

    /// Copy out the `w` x `h` window at `(x, y)` for writing.
    fn acquire_write_window(&self, x: i64, y: i64, w: usize, h: usize) -> Result<PixelWindow>;

    /// Write the window's pixels back.
    fn release_and_sync(&self, window: PixelWindow) -> Result<()>;
}

/// In-memory RGBA surface with one lock per row.
#[derive(Debug)]
pub struct Pixmap {
    width: usize,
    height: usize,
    rows: Vec<Mutex<Vec<Rgba8>>>,
}

impl Pixmap {
    /// A `width` x `height` surface cleared to transparent black.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, Rgba8::default())
    }

    pub fn filled(width: usize, height: usize, color: Rgba8) -> Result<Self> {
        let mut rows = Vec::new();
        try_reserve(&mut rows, height, "pixmap rows")?;
        for _ in 0..height {
            let mut row = Vec::new();
            try_reserve(&mut row, width, "pixmap row")?;
            row.resize(width, color);
            rows.push(Mutex::new(row));
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba8> {
        if x >= self.width {
            return None;
        }
        let row = self.rows.get(y)?.lock().ok()?;
        row.get(x).copied()
    }

    pub fn fill(&self, color: Rgba8) {
        for row in &self.rows {
            if let Ok(mut r) = row.lock() {
                r.iter_mut().for_each(|p| *p = color);
            }
        }
    }

    /// All pixels, row-major.
    pub fn to_vec(&self) -> Vec<Rgba8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for row in &self.rows {
            match row.lock() {
                Ok(r) => out.extend_from_slice(&r),
                Err(poisoned) => out.extend_from_slice(&poisoned.into_inner()),
            }
        }
        out
    }

    fn check_window(&self, x: i64, y: i64, w: usize, h: usize) -> Result<(usize, usize)> {
        let err = DrawError::PixelWindow {
            x,
            y,
            width: w,
            height: h,
        };
        if x < 0 || y < 0 {
            return Err(err);
        }
        let (x0, y0) = (x as usize, y as usize);
        match (x0.checked_add(w), y0.checked_add(h)) {
            (Some(x1), Some(y1)) if x1 <= self.width && y1 <= self.height => Ok((x0, y0)),
            _ => Err(err),
        }
    }
}

impl RasterSurface for Pixmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_memory_backed(&self) -> bool {
        true
    }

    fn acquire_write_window(&self, x: i64, y: i64, w: usize, h: usize) -> Result<PixelWindow> {
        let (x0, y0) = self.check_window(x, y, w, h)?;
        let mut pixels = Vec::new();
        try_reserve(&mut pixels, w * h, "pixel window")?;
        for row in &self.rows[y0..y0 + h] {
            let r = row.lock().map_err(|_| DrawError::PixelWindow {
                x,
                y,
                width: w,
                height: h,
            })?;
            pixels.extend_from_slice(&r[x0..x0 + w]);
        }
        Ok(PixelWindow::new(x, y, w, h, pixels))
    }

    fn release_and_sync(&self, window: PixelWindow) -> Result<()> {
        let (x, y, w, h) = (window.x, window.y, window.width, window.height);
        let (x0, y0) = self.check_window(x, y, w, h)?;
        for (i, row) in self.rows[y0..y0 + h].iter().enumerate() {
            let mut r = row.lock().map_err(|_| DrawError::PixelWindow {
                x,
                y,
                width: w,
                height: h,
            })?;
            r[x0..x0 + w].copy_from_slice(&window.pixels[i * w..(i + 1) * w]);
        }
        Ok(())
    }
}
