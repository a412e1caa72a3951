//! Conway's Game of Life over bitmap seeds.
//!
//! A [`Run`] is seeded from a PNG image (dark pixels become live cells),
//! stepped through generations by a parallel [`CycleEngine`], and its
//! recorded history rendered back out as single PNG frames or one animated
//! GIF:
//!
//! - Load a board and build a [`Run`] ([`Run::open`] / [`Run::from_image`])
//! - Step it with [`Run::run`]
//! - Render with [`Run::render_frame`] and [`Run::make_animation`]
//!
//! Stepping is deterministic: the next generation is identical for any row
//! band count.
#![forbid(unsafe_code)]

mod foundation;

pub mod encode;
pub mod engine;
pub mod grid;
pub mod observe;
pub mod raster;
pub mod run;
pub mod source;

pub use crate::foundation::error::{GolError, GolResult};

pub use crate::encode::{GifSink, GifSinkOpts, encode_animation};
pub use crate::engine::CycleEngine;
pub use crate::grid::{ALIVE, DEAD, Grid};
pub use crate::observe::{FrameObserver, LogObserver};
pub use crate::raster::{IndexedBitmap, MAX_MAGNIFICATION, encode_png, rasterize};
pub use crate::run::{Cycle, CycleSummary, Run, RunOpts, RunSummary};
