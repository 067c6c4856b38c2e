//! Color types and alpha-over compositing.
//!
//! - `Rgba`: f64 components in `[0, 1]`, straight (non-premultiplied) alpha
//! - `Rgba8`: u8 components, the storage format of [`Pixmap`](crate::surface::Pixmap)

// ============================================================================
// Rgba (f64 precision color)
// ============================================================================

/// RGBA color with f64 components in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn no_color() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Composite `self`, scaled by `coverage`, over `dst` with the
    /// Porter-Duff *over* operator on straight-alpha colors.
    pub fn over(&self, dst: &Rgba, coverage: f64) -> Rgba {
        let sa = (self.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return *dst;
        }
        let da = dst.a.clamp(0.0, 1.0);
        let ra = sa + da - sa * da;
        if ra <= 0.0 {
            return Rgba::no_color();
        }
        let k = da * (1.0 - sa);
        let inv = 1.0 / ra;
        Rgba {
            r: (sa * self.r + k * dst.r) * inv,
            g: (sa * self.g + k * dst.g) * inv,
            b: (sa * self.b + k * dst.b) * inv,
            a: ra,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::no_color()
    }
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_MASK: u32 = 255;

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Convert from `Rgba` (f64) to `Rgba8` (u8), clamping out-of-range
    /// components.
    pub fn from_rgba(c: &Rgba) -> Self {
        Self {
            r: Self::from_double(c.r),
            g: Self::from_double(c.g),
            b: Self::from_double(c.b),
            a: Self::from_double(c.a),
        }
    }

    pub fn to_rgba(&self) -> Rgba {
        Rgba {
            r: Self::to_double(self.r),
            g: Self::to_double(self.g),
            b: Self::to_double(self.b),
            a: Self::to_double(self.a),
        }
    }

    pub fn to_double(a: u8) -> f64 {
        a as f64 / Self::BASE_MASK as f64
    }

    pub fn from_double(a: f64) -> u8 {
        (a.clamp(0.0, 1.0) * Self::BASE_MASK as f64 + 0.5) as u8
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl From<Rgba> for Rgba8 {
    fn from(c: Rgba) -> Self {
        Rgba8::from_rgba(&c)
    }
}

impl From<Rgba8> for Rgba {
    fn from(c: Rgba8) -> Self {
        c.to_rgba()
    }
}
