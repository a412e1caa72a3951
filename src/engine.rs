//! Parallel generation stepping over horizontal row bands.

use std::panic::AssertUnwindSafe;

use rayon::prelude::*;

use crate::foundation::error::{GolError, GolResult};
use crate::grid::{ALIVE, DEAD, Grid};

/// Advances a [`Grid`] one generation at a time.
///
/// The grid's rows are split into `bands` contiguous horizontal bands of
/// `ceil(height / bands)` rows. Each band is computed by one worker that reads
/// only the immutable input grid and writes only its own disjoint output rows,
/// so the merged result is identical for any band count. [`CycleEngine::step`]
/// blocks until every band has finished; no partially-computed grid is ever
/// observable.
pub struct CycleEngine {
    pool: rayon::ThreadPool,
    bands: usize,
}

impl CycleEngine {
    /// Create an engine that steps with `bands` parallel row bands.
    pub fn new(bands: usize) -> GolResult<Self> {
        if bands == 0 {
            return Err(GolError::validation("band count must be >= 1"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(bands)
            .build()
            .map_err(|e| GolError::cycle(format!("failed to build thread pool: {e}")))?;
        Ok(Self { pool, bands })
    }

    /// Number of row bands this engine steps with.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Compute the next generation of `input`.
    ///
    /// A worker that fails mid-band fails the whole cycle; the caller never
    /// sees output rows that were left at their zero-initialized state.
    pub fn step(&self, input: &Grid) -> GolResult<Grid> {
        let width = input.width();
        let height = input.height();
        let mut next = Grid::new(width, height);
        if width == 0 || height == 0 {
            return Ok(next);
        }

        // ceil division keeps every row inside exactly one band; the last
        // band absorbs the remainder.
        let band_rows = height.div_ceil(self.bands);
        let stepped = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                next.cells_mut()
                    .par_chunks_mut(band_rows * width)
                    .enumerate()
                    .for_each(|(band, out_rows)| {
                        let start_row = band * band_rows;
                        step_band(input, start_row, out_rows);
                    });
            });
        }));
        if stepped.is_err() {
            return Err(GolError::cycle("a row band failed to complete"));
        }

        Ok(next)
    }
}

/// Fill one band of output rows, starting at `start_row` of the input.
fn step_band(input: &Grid, start_row: usize, out_rows: &mut [u8]) {
    let width = input.width();
    for (i, row) in out_rows.chunks_mut(width).enumerate() {
        let y = (start_row + i) as isize;
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = next_state(input, x as isize, y);
        }
    }
}

/// Conway rules over the 8-cell Moore neighborhood; off-grid neighbors are dead.
fn next_state(grid: &Grid, x: isize, y: isize) -> u8 {
    let mut neighbors = 0u8;
    for dy in -1..=1isize {
        for dx in -1..=1isize {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid.get(x + dx, y + dy) != DEAD {
                neighbors += 1;
            }
        }
    }
    match neighbors {
        2 => grid.get(x, y),
        3 => ALIVE,
        _ => DEAD,
    }
}
