//! A single simulation run: generation history and rendering entry points.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encode::{GifSinkOpts, encode_animation};
use crate::engine::CycleEngine;
use crate::foundation::error::{GolError, GolResult};
use crate::grid::{ALIVE, Grid};
use crate::observe::FrameObserver;
use crate::raster::{self, IndexedBitmap};
use crate::source;

/// Pixel luminance (r+g+b) below which a pixel seeds a live cell: darker
/// than mid-gray.
const LIVE_LUMINANCE_LIMIT: u32 = 3 * 128;

/// Configuration for a [`Run`].
#[derive(Clone, Debug)]
pub struct RunOpts {
    /// Number of parallel row bands per cycle (>= 1).
    pub bands: usize,
    /// Per-frame animation delay in milliseconds.
    pub delay_ms: i64,
    /// Author embedded in animated output metadata.
    pub author: String,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            bands: 1,
            delay_ms: 5000,
            author: "golife".to_string(),
        }
    }
}

/// One recorded generation transition. Immutable once appended.
#[derive(Clone, Debug)]
pub struct Cycle {
    number: usize,
    before: Grid,
    after: Grid,
    started_at: Instant,
    ended_at: Instant,
}

impl Cycle {
    /// 1-based ordinal of this cycle within its run.
    pub fn number(&self) -> usize {
        self.number
    }

    /// The grid before the transition.
    pub fn before(&self) -> &Grid {
        &self.before
    }

    /// The grid after the transition.
    pub fn after(&self) -> &Grid {
        &self.after
    }

    /// Wall-clock time the transition took.
    pub fn duration(&self) -> Duration {
        self.ended_at.duration_since(self.started_at)
    }
}

/// One simulation instance: a named initial grid plus its append-only
/// generation history.
///
/// A run drives its cycles strictly sequentially; each cycle is internally
/// parallel across row bands. Grids are deep-copied across every generation
/// boundary, so history entries never alias live state.
pub struct Run {
    name: String,
    source: String,
    width: usize,
    height: usize,
    initial_grid: Grid,
    current_grid: Grid,
    final_grid: Option<Grid>,
    cycles: Vec<Cycle>,
    opts: RunOpts,
    engine: CycleEngine,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    observer: Option<Arc<dyn FrameObserver>>,
}

impl Run {
    /// Create a run from an already-built grid.
    pub fn from_grid(
        name: impl Into<String>,
        source: impl Into<String>,
        grid: Grid,
        opts: RunOpts,
    ) -> GolResult<Self> {
        let engine = CycleEngine::new(opts.bands)?;
        Ok(Self {
            name: name.into(),
            source: source.into(),
            width: grid.width(),
            height: grid.height(),
            current_grid: grid.clone(),
            initial_grid: grid,
            final_grid: None,
            cycles: Vec::new(),
            opts,
            engine,
            started_at: None,
            ended_at: None,
            observer: None,
        })
    }

    /// Create a run seeded from a decoded image.
    ///
    /// Grid dimensions equal image dimensions; a cell is alive iff its pixel
    /// is darker than mid-gray (`r+g+b < 384`).
    pub fn from_image(
        name: impl Into<String>,
        source: impl Into<String>,
        img: &DynamicImage,
        opts: RunOpts,
    ) -> GolResult<Self> {
        let grid = grid_from_image(img);
        debug!(
            width = grid.width(),
            height = grid.height(),
            live = grid.live_count(),
            "seeded grid from image"
        );
        Self::from_grid(name, source, grid, opts)
    }

    /// Load a PNG source and create a run from it.
    ///
    /// Any other detected format is rejected; a run that fails construction
    /// publishes nothing.
    pub fn open(
        name: impl Into<String>,
        reference: &str,
        opts: RunOpts,
    ) -> GolResult<Self> {
        let path = source::strip_file_scheme(reference);
        let (img, format) = source::load_image(path)?;
        if format != ImageFormat::Png {
            return Err(GolError::unsupported_format(format!(
                "expected png, got {format:?}"
            )));
        }
        Self::from_image(name, reference, &img, opts)
    }

    /// Run name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source image reference the run was seeded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The seed grid.
    pub fn initial_grid(&self) -> &Grid {
        &self.initial_grid
    }

    /// The most recently computed grid.
    pub fn current_grid(&self) -> &Grid {
        &self.current_grid
    }

    /// The grid after the last completed [`Run::run`], if any.
    pub fn final_grid(&self) -> Option<&Grid> {
        self.final_grid.as_ref()
    }

    /// Recorded cycles, in generation order.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Number of renderable frames: the initial grid plus one per cycle.
    pub fn frame_count(&self) -> usize {
        self.cycles.len() + 1
    }

    /// Install a best-effort observer notified after each single-frame render.
    pub fn set_observer(&mut self, observer: Arc<dyn FrameObserver>) {
        self.observer = Some(observer);
    }

    /// Advance the simulation by `max_cycles` generations.
    ///
    /// Each cycle stores a deep-copied before/after pair; afterwards the
    /// final grid is a clone of the last current grid.
    pub fn run(&mut self, max_cycles: usize) -> GolResult<()> {
        let started = Instant::now();
        self.started_at = Some(started);
        for _ in 0..max_cycles {
            self.next_cycle()?;
        }
        let ended = Instant::now();
        self.ended_at = Some(ended);
        self.final_grid = Some(self.current_grid.clone());
        info!(
            name = %self.name,
            cycles = max_cycles,
            bands = self.engine.bands(),
            elapsed_ms = ended.duration_since(started).as_millis() as u64,
            "run complete"
        );
        Ok(())
    }

    fn next_cycle(&mut self) -> GolResult<()> {
        let before = self.current_grid.clone();
        let started_at = Instant::now();
        let after = self.engine.step(&before)?;
        let ended_at = Instant::now();

        self.current_grid = after.clone();
        let number = self.cycles.len() + 1;
        debug!(
            name = %self.name,
            cycle = number,
            live = after.live_count(),
            elapsed_us = ended_at.duration_since(started_at).as_micros() as u64,
            "cycle complete"
        );
        self.cycles.push(Cycle {
            number,
            before,
            after,
            started_at,
            ended_at,
        });
        Ok(())
    }

    /// Resolve frame `index`: 0 is the initial grid, `i > 0` is the
    /// after-grid of cycle `i`.
    pub fn grid_at(&self, index: usize) -> GolResult<&Grid> {
        if index == 0 {
            return Ok(&self.initial_grid);
        }
        self.cycles
            .get(index - 1)
            .map(Cycle::after)
            .ok_or(GolError::BadIndex {
                index,
                frames: self.frame_count(),
            })
    }

    /// Render frame `index` at magnification `mag` as PNG bytes.
    pub fn render_frame(&self, index: usize, mag: u32) -> GolResult<Vec<u8>> {
        let grid = self.grid_at(index)?;
        let bitmap = raster::rasterize(grid, mag)?;
        let png = raster::encode_png(&bitmap)?;
        if let Some(observer) = &self.observer {
            observer.frame_rendered(&self.name, index, &bitmap);
        }
        Ok(png)
    }

    /// Encode up to `frame_count` frames of history as one animated GIF.
    ///
    /// Frame 0 is always the initial grid, followed by each cycle's
    /// after-grid in order; never more frames than history holds.
    pub fn make_animation(&self, frame_count: usize, mag: u32) -> GolResult<Vec<u8>> {
        if frame_count == 0 {
            return Err(GolError::validation("at least one frame is required"));
        }
        let frames = self
            .animation_grids(frame_count)
            .into_iter()
            .map(|grid| raster::rasterize(grid, mag))
            .collect::<GolResult<Vec<IndexedBitmap>>>()?;
        encode_animation(
            &frames,
            GifSinkOpts {
                delay_ms: self.opts.delay_ms,
                looped: true,
                author: self.opts.author.clone(),
            },
        )
    }

    /// History subsequence selected for animation, capped at `frame_count`.
    fn animation_grids(&self, frame_count: usize) -> Vec<&Grid> {
        let capped = frame_count.min(self.frame_count());
        let mut grids = Vec::with_capacity(capped);
        grids.push(&self.initial_grid);
        for cycle in &self.cycles {
            if grids.len() >= capped {
                break;
            }
            grids.push(cycle.after());
        }
        grids
    }

    /// Serializable snapshot of this run.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            name: self.name.clone(),
            source: self.source.clone(),
            width: self.width,
            height: self.height,
            bands: self.engine.bands(),
            cycle_count: self.cycles.len(),
            total_ms: match (self.started_at, self.ended_at) {
                (Some(s), Some(e)) => e.duration_since(s).as_millis() as u64,
                _ => 0,
            },
            cycles: self.cycles.iter().map(CycleSummary::from).collect(),
        }
    }
}

/// Serializable per-cycle report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// 1-based cycle number.
    pub number: usize,
    /// Transition duration in milliseconds.
    pub duration_ms: u64,
    /// Live cells before the transition.
    pub live_before: usize,
    /// Live cells after the transition.
    pub live_after: usize,
}

impl From<&Cycle> for CycleSummary {
    fn from(cycle: &Cycle) -> Self {
        Self {
            number: cycle.number,
            duration_ms: cycle.duration().as_millis() as u64,
            live_before: cycle.before.live_count(),
            live_after: cycle.after.live_count(),
        }
    }
}

/// Serializable run report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run name.
    pub name: String,
    /// Source image reference.
    pub source: String,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Row bands used per cycle.
    pub bands: usize,
    /// Number of recorded cycles.
    pub cycle_count: usize,
    /// Total run duration in milliseconds.
    pub total_ms: u64,
    /// Per-cycle reports, in generation order.
    pub cycles: Vec<CycleSummary>,
}

fn grid_from_image(img: &DynamicImage) -> Grid {
    let rgba = img.to_rgba8();
    let mut grid = Grid::new(rgba.width() as usize, rgba.height() as usize);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let luminance = u32::from(r) + u32::from(g) + u32::from(b);
        if luminance < LIVE_LUMINANCE_LIMIT {
            grid.set(x as isize, y as isize, ALIVE);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn blinker_run(bands: usize) -> Run {
        let mut grid = Grid::new(3, 3);
        for y in 0..3 {
            grid.set(1, y, ALIVE);
        }
        Run::from_grid(
            "blinker",
            "test:blinker",
            grid,
            RunOpts {
                bands,
                ..RunOpts::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn seeding_thresholds_at_mid_gray() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        // 127+127+129 = 383 < 384: alive
        img.put_pixel(1, 0, Rgba([127, 127, 129, 255]));
        // 128+128+128 = 384: dead
        img.put_pixel(2, 0, Rgba([128, 128, 128, 255]));

        let run = Run::from_image(
            "seed",
            "test:seed",
            &DynamicImage::ImageRgba8(img),
            RunOpts::default(),
        )
        .unwrap();
        let grid = run.initial_grid();
        assert_eq!(grid.get(0, 0), ALIVE);
        assert_eq!(grid.get(1, 0), ALIVE);
        assert_eq!(grid.get(2, 0), 0);
    }

    #[test]
    fn cycles_are_one_based_and_contiguous() {
        let mut run = blinker_run(1);
        run.run(4).unwrap();
        let numbers: Vec<usize> = run.cycles().iter().map(Cycle::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(run.frame_count(), 5);
        assert_eq!(run.final_grid().unwrap(), run.current_grid());
    }

    #[test]
    fn before_grid_is_a_snapshot() {
        let mut run = blinker_run(1);
        run.run(2).unwrap();
        assert_eq!(run.cycles()[0].before(), run.initial_grid());
        assert_eq!(run.cycles()[1].before(), run.cycles()[0].after());
    }

    #[test]
    fn grid_at_rejects_out_of_range() {
        let mut run = blinker_run(1);
        run.run(2).unwrap();
        assert!(run.grid_at(0).is_ok());
        assert!(run.grid_at(2).is_ok());
        assert!(matches!(
            run.grid_at(3),
            Err(GolError::BadIndex { index: 3, frames: 3 })
        ));
    }

    #[test]
    fn render_frame_rejects_bad_magnification() {
        let run = blinker_run(1);
        assert!(run.render_frame(0, 0).is_err());
        assert!(run.render_frame(0, 1).is_ok());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let mut run = blinker_run(2);
        run.run(3).unwrap();
        let summary = run.summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
        assert_eq!(back.cycle_count, 3);
        assert_eq!(back.cycles[0].number, 1);
        assert_eq!(back.cycles[0].live_before, 3);
        assert_eq!(back.cycles[0].live_after, 3);
    }
}
