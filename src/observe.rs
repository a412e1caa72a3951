//! Best-effort frame observation (preview windows, telemetry).

use tracing::debug;

use crate::raster::IndexedBitmap;

/// Receives rendered bitmaps after the fact.
///
/// Notifications are best-effort: implementations must not block and have no
/// way to influence the run that produced the frame.
pub trait FrameObserver: Send + Sync {
    /// Called after frame `index` of run `run` was rendered.
    fn frame_rendered(&self, run: &str, index: usize, bitmap: &IndexedBitmap);
}

/// Built-in observer that logs frame renders.
#[derive(Debug, Default)]
pub struct LogObserver;

impl FrameObserver for LogObserver {
    fn frame_rendered(&self, run: &str, index: usize, bitmap: &IndexedBitmap) {
        debug!(
            run,
            index,
            width = bitmap.width,
            height = bitmap.height,
            "frame rendered"
        );
    }
}
