//! Dash patterns.
//!
//! Splits a centerline into the "on" runs of a repeating dash pattern.
//! Each run is returned as its own open centerline, ready for the stroke
//! outliner.

use crate::basics::{PointD, DRAW_EPSILON};
use crate::error::{try_reserve, DrawError, Result};
use crate::path_points::PathPointList;

/// Alternating on/off lengths plus a starting offset.
///
/// Even-indexed entries are dashes, odd-indexed entries are gaps. An
/// odd-length array is repeated once so the pattern alternates cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    array: Vec<f64>,
    offset: f64,
}

impl DashPattern {
    /// Validate `array` (alternating on and off lengths) and `offset`.
    ///
    /// An odd-length array is repeated once, as SVG does, so `[3]` becomes
    /// `[3, 3]` and `[5, 2, 1]` becomes `[5, 2, 1, 5, 2, 1]`. Each length
    /// therefore alternates between dash and gap on successive periods.
    pub fn new(array: &[f64], offset: f64) -> Result<Self> {
        if array.is_empty() {
            return Err(DrawError::InvalidDash("empty dash array"));
        }
        if !offset.is_finite() || array.iter().any(|v| !v.is_finite()) {
            return Err(DrawError::InvalidDash("non-finite dash length"));
        }
        if array.iter().any(|v| *v < 0.0) {
            return Err(DrawError::InvalidDash("negative dash length"));
        }
        if array.iter().sum::<f64>() < DRAW_EPSILON {
            return Err(DrawError::InvalidDash("dash lengths sum to zero"));
        }
        let mut v = Vec::new();
        try_reserve(&mut v, array.len() * 2, "dash array")?;
        v.extend_from_slice(array);
        if array.len() % 2 == 1 {
            v.extend_from_slice(array);
        }
        Ok(Self { array: v, offset })
    }

    pub fn array(&self) -> &[f64] {
        &self.array
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Length of one full on/off cycle.
    pub fn period(&self) -> f64 {
        self.array.iter().sum()
    }

    /// Split `path` into its "on" runs. Lengths and offset are multiplied
    /// by `scale`, the expansion of the current transform.
    pub fn split(&self, path: &PathPointList, scale: f64) -> Result<Vec<PathPointList>> {
        let mut dashes = Vec::new();
        let points = path.points();
        if points.len() < 2 {
            return Ok(dashes);
        }
        let length_of = |k: usize| self.array[k] * scale;
        let period = self.period() * scale;
        if !(period > DRAW_EPSILON) {
            return Err(DrawError::InvalidDash("dash lengths sum to zero"));
        }

        // Consume the offset; a negative offset starts that far before the
        // pattern origin.
        let mut index = 0;
        let mut remaining = length_of(0);
        let mut skip = (self.offset * scale) % period;
        if skip < 0.0 {
            skip += period;
        }
        while skip > 0.0 {
            if skip >= remaining {
                skip -= remaining;
                index = (index + 1) % self.array.len();
                remaining = length_of(index);
            } else {
                remaining -= skip;
                skip = 0.0;
            }
        }

        let mut current: Vec<PointD> = Vec::new();
        if index % 2 == 0 {
            current.push(points[0]);
        }
        for w in points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let d = b - a;
            let segment = d.x.hypot(d.y);
            let mut pos = 0.0;
            while segment - pos > remaining {
                pos += remaining;
                let at = PointD::new(a.x + d.x * pos / segment, a.y + d.y * pos / segment);
                if index % 2 == 0 {
                    current.push(at);
                    try_reserve(&mut dashes, 1, "dashes")?;
                    dashes.push(PathPointList::from_points(core::mem::take(&mut current)));
                } else {
                    current.clear();
                    current.push(at);
                }
                index = (index + 1) % self.array.len();
                remaining = length_of(index);
            }
            remaining -= segment - pos;
            if index % 2 == 0 {
                current.push(b);
            }
        }

        if index % 2 == 0 && !current.is_empty() {
            if current.len() == 1 {
                let p = current[0];
                current.push(PointD::new(p.x + DRAW_EPSILON, p.y + DRAW_EPSILON));
            }
            try_reserve(&mut dashes, 1, "dashes")?;
            dashes.push(PathPointList::from_points(current));
        }
        log::trace!("dash split into {} runs", dashes.len());
        Ok(dashes)
    }
}
