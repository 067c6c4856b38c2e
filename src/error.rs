//! Error type shared by every stage of the drawing pipeline.

use thiserror::Error;

/// Errors raised while tracing, outlining or rasterizing a primitive.
///
/// Geometry and allocation errors are reported before any pixel is
/// touched. Surface and worker errors may leave rows that other workers
/// already finished.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DrawError {
    #[error("path syntax error at line {line}, column {column}: {message}")]
    PathSyntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("non-finite coordinate in {0}")]
    NonFiniteCoordinate(&'static str),

    #[error("coordinate {0} is out of range")]
    CoordinateOutOfRange(f64),

    #[error("invalid radius {radius} in {primitive}")]
    InvalidRadius { primitive: &'static str, radius: f64 },

    #[error("too many coordinates: {count} exceeds the limit of {limit}")]
    TooManyCoordinates { count: usize, limit: usize },

    #[error("invalid dash pattern: {0}")]
    InvalidDash(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("unable to allocate {0}")]
    ResourceLimit(&'static str),

    #[error("unable to acquire pixel window {width}x{height} at ({x}, {y})")]
    PixelWindow {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("rasterization worker failed; {rows_completed} of {rows_total} rows written")]
    WorkerFailed {
        rows_completed: usize,
        rows_total: usize,
    },

    #[error("rendering cancelled by the progress monitor")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, DrawError>;

/// Reserve room for `additional` elements, mapping allocation failure to
/// [`DrawError::ResourceLimit`].
pub(crate) fn try_reserve<T>(v: &mut Vec<T>, additional: usize, what: &'static str) -> Result<()> {
    v.try_reserve(additional)
        .map_err(|_| DrawError::ResourceLimit(what))
}
