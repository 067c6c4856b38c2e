//! Per-call rendering configuration.
//!
//! Thread budget and coordinate ceilings travel with the renderer instead
//! of living in process-wide state.

/// Rows handed to each worker before another worker is added.
pub const DEFAULT_ROWS_PER_WORKER: usize = 64;

/// Default ceiling on the total number of points traced for one primitive.
pub const DEFAULT_MAX_COORDINATES: usize = 8 * 1024 * 1024;

/// Default ceiling on the estimated point count of a circle, ellipse or arc.
pub const DEFAULT_MAX_CURVE_COORDINATES: usize = 21400;

/// Budget and limits for one [`Renderer`](crate::renderer::Renderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    max_threads: usize,
    rows_per_worker: usize,
    max_coordinates: usize,
    max_curve_coordinates: usize,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            max_threads: rayon::current_num_threads().max(1),
            rows_per_worker: DEFAULT_ROWS_PER_WORKER,
            max_coordinates: DEFAULT_MAX_COORDINATES,
            max_curve_coordinates: DEFAULT_MAX_CURVE_COORDINATES,
        }
    }

    /// Single-threaded configuration, mostly useful for deterministic tests.
    pub fn single_threaded() -> Self {
        let mut c = Self::new();
        c.max_threads = 1;
        c
    }

    pub fn with_max_threads(mut self, n: usize) -> Self {
        self.max_threads = n.max(1);
        self
    }
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    pub fn with_rows_per_worker(mut self, n: usize) -> Self {
        self.rows_per_worker = n.max(1);
        self
    }
    pub fn rows_per_worker(&self) -> usize {
        self.rows_per_worker
    }

    pub fn with_max_coordinates(mut self, n: usize) -> Self {
        self.max_coordinates = n;
        self
    }
    pub fn max_coordinates(&self) -> usize {
        self.max_coordinates
    }

    pub fn with_max_curve_coordinates(mut self, n: usize) -> Self {
        self.max_curve_coordinates = n;
        self
    }
    pub fn max_curve_coordinates(&self) -> usize {
        self.max_curve_coordinates
    }

    /// Number of row workers for a region of `rows` rows.
    ///
    /// Memory-backed surfaces get one worker per `rows_per_worker` rows,
    /// clamped to `[1, max_threads]`. Other surfaces are capped at two.
    pub fn worker_count(&self, rows: usize, memory_backed: bool) -> usize {
        if !memory_backed {
            return self.max_threads.min(2);
        }
        (rows / self.rows_per_worker).clamp(1, self.max_threads)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
