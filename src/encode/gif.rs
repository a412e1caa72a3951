//! GIF sink with per-frame timing, looping, and authorship metadata.

use std::borrow::Cow;
use std::io::Write;

use gif::{DisposalMethod, Encoder, Extension, Frame, Repeat};
use tracing::debug;

use crate::foundation::error::{GolError, GolResult};
use crate::raster::{IndexedBitmap, PALETTE_BW};

/// Delay substituted when a caller passes a negative delay.
pub const DEFAULT_DELAY_MS: i64 = 5000;

/// Options for [`GifSink`] output.
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Per-frame delay in milliseconds. Negative values fall back to
    /// [`DEFAULT_DELAY_MS`]; the stream stores hundredths of a second.
    pub delay_ms: i64,
    /// Repeat the sequence indefinitely instead of playing once.
    pub looped: bool,
    /// Author embedded as a stream-level comment.
    pub author: String,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            looped: true,
            author: "golife".to_string(),
        }
    }
}

impl GifSinkOpts {
    /// Per-frame delay in the GIF's native unit (hundredths of a second).
    pub fn delay_hundredths(&self) -> u16 {
        let ms = if self.delay_ms < 0 {
            DEFAULT_DELAY_MS
        } else {
            self.delay_ms
        };
        (ms / 10).min(u16::MAX as i64) as u16
    }
}

/// Streams same-sized indexed bitmaps into one animated GIF.
///
/// Lifecycle: [`GifSink::begin`] once, [`GifSink::push_frame`] per frame in
/// order, [`GifSink::end`] once. `end` finalizes the stream and returns the
/// writer; a sink dropped before `end` leaves a truncated stream behind, so
/// owners must close on every exit path (see
/// [`encode_animation`](crate::encode::encode_animation)).
pub struct GifSink<W: Write> {
    opts: GifSinkOpts,
    writer: Option<W>,
    encoder: Option<Encoder<W>>,
    width: u16,
    height: u16,
    frames_written: usize,
}

impl<W: Write> GifSink<W> {
    /// Create a sink writing into `writer`.
    pub fn new(writer: W, opts: GifSinkOpts) -> Self {
        Self {
            opts,
            writer: Some(writer),
            encoder: None,
            width: 0,
            height: 0,
            frames_written: 0,
        }
    }

    /// Number of frames pushed so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Start the stream: screen descriptor, global two-color palette, loop
    /// extension (when looping) and the author comment.
    pub fn begin(&mut self, width: u32, height: u32) -> GolResult<()> {
        if self.encoder.is_some() {
            return Err(GolError::encode("stream already started"));
        }
        let writer = self
            .writer
            .take()
            .ok_or_else(|| GolError::encode("stream already closed"))?;
        let (width, height) = stream_dimensions(width, height)?;

        let mut encoder = Encoder::new(writer, width, height, &PALETTE_BW)
            .map_err(|e| GolError::encode(format!("gif stream start failed: {e}")))?;
        if self.opts.looped {
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| GolError::encode(format!("gif loop metadata failed: {e}")))?;
        }
        let comment = format!("Author: {}", self.opts.author);
        encoder
            .write_raw_extension(Extension::Comment.into(), &[comment.as_bytes()])
            .map_err(|e| GolError::encode(format!("gif comment metadata failed: {e}")))?;

        self.width = width;
        self.height = height;
        self.encoder = Some(encoder);
        Ok(())
    }

    /// Append one frame. Frames after `end`, before `begin`, or with
    /// mismatched dimensions are rejected.
    pub fn push_frame(&mut self, bitmap: &IndexedBitmap) -> GolResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| GolError::encode("stream is not open for frames"))?;
        let (width, height) = stream_dimensions(bitmap.width, bitmap.height)?;
        if width != self.width || height != self.height {
            return Err(GolError::validation(format!(
                "frame size {width}x{height} does not match stream {}x{}",
                self.width, self.height
            )));
        }

        // Transparency off, disposal "none": each frame is drawn over the
        // previous one without clearing the canvas.
        let frame = Frame {
            width,
            height,
            buffer: Cow::Borrowed(&bitmap.pixels),
            delay: self.opts.delay_hundredths(),
            dispose: DisposalMethod::Any,
            transparent: None,
            ..Frame::default()
        };
        encoder
            .write_frame(&frame)
            .map_err(|e| GolError::encode(format!("gif frame write failed: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    /// Finalize the stream (trailer byte + flush) and return the writer.
    pub fn end(mut self) -> GolResult<W> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| GolError::encode("stream was never started"))?;
        let writer = encoder
            .into_inner()
            .map_err(|e| GolError::encode(format!("gif stream finalize failed: {e}")))?;
        debug!(frames = self.frames_written, "animated gif stream closed");
        Ok(writer)
    }
}

fn stream_dimensions(width: u32, height: u32) -> GolResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(GolError::validation("frame dimensions must be non-zero"));
    }
    let w = u16::try_from(width)
        .map_err(|_| GolError::validation(format!("frame width {width} exceeds gif limit")))?;
    let h = u16::try_from(height)
        .map_err(|_| GolError::validation(format!("frame height {height} exceeds gif limit")))?;
    Ok((w, h))
}
