//! Animated-image encoding.
//!
//! Frames are consumed in order through a sink with an explicit
//! begin/push/end lifecycle; [`encode_animation`] drives the full lifecycle
//! and is the entry point most callers want.

pub mod gif;

use crate::foundation::error::{GolError, GolResult};
use crate::raster::IndexedBitmap;

pub use gif::{GifSink, GifSinkOpts};

/// Encode an ordered, non-empty sequence of same-sized bitmaps into one
/// animated GIF byte stream.
///
/// The sink is closed on every path, so the returned buffer is always a
/// finalized, decodable stream.
pub fn encode_animation(frames: &[IndexedBitmap], opts: GifSinkOpts) -> GolResult<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| GolError::validation("at least one frame is required"))?;

    let mut sink = GifSink::new(Vec::new(), opts);
    sink.begin(first.width, first.height)?;
    for frame in frames {
        sink.push_frame(frame)?;
    }
    sink.end()
}
