//! Affine transformation matrix.
//!
//! Applied to traced geometry before edge building; its area expansion
//! factor scales the stroke width so transformed strokes keep their
//! visual weight.

use crate::basics::PointD;

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

/// 2D affine transformation matrix.
///
/// Stores six components: `[sx, shy, shx, sy, tx, ty]` representing the
/// matrix:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub fn new() -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Custom matrix from six components.
    pub fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Rotation matrix, angle in radians.
    pub fn new_rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Translation matrix.
    pub fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    // ====================================================================
    // Composition
    // ====================================================================

    /// Post-multiply: `self = self * m` (apply `self`, then `m`).
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    #[inline]
    pub fn transform(&self, p: PointD) -> PointD {
        PointD::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Signed area scale; negative when the transform mirrors.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Linear scale factor of the transform: the square root of the
    /// absolute area scale. Stroke widths are multiplied by this.
    #[inline]
    pub fn expansion(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    pub fn is_identity(&self) -> bool {
        (self.sx - 1.0).abs() <= AFFINE_EPSILON
            && self.shy.abs() <= AFFINE_EPSILON
            && self.shx.abs() <= AFFINE_EPSILON
            && (self.sy - 1.0).abs() <= AFFINE_EPSILON
            && self.tx.abs() <= AFFINE_EPSILON
            && self.ty.abs() <= AFFINE_EPSILON
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::PI;

    #[test]
    fn test_identity() {
        let m = TransAffine::new();
        assert!(m.is_identity());
        let p = m.transform(PointD::new(3.0, -4.0));
        assert_eq!(p, PointD::new(3.0, -4.0));
        assert!((m.expansion() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_then_translation() {
        let mut m = TransAffine::new_rotation(PI / 2.0);
        m.multiply(&TransAffine::new_translation(10.0, 0.0));
        let p = m.transform(PointD::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-10);
        assert!((p.y - 1.0).abs() < 1e-10);
        assert!(!m.is_identity());
    }

    #[test]
    fn test_expansion() {
        assert!((TransAffine::new_scaling(2.0, 8.0).expansion() - 4.0).abs() < 1e-12);
        assert!((TransAffine::new_rotation(0.7).expansion() - 1.0).abs() < 1e-12);
        // Mirroring keeps the magnitude.
        assert!((TransAffine::new_scaling(-3.0, 3.0).expansion() - 3.0).abs() < 1e-12);
    }
}
