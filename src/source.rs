//! Source bitmap loading.
//!
//! The loader hands back the decoded image together with the detected format
//! tag; callers decide which formats they accept. [`Run`](crate::run::Run)
//! requires PNG, the lossless format game boards are authored in.

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::foundation::error::{GolError, GolResult};

/// Strip a `file:` scheme prefix from a source reference, if present.
pub fn strip_file_scheme(reference: &str) -> &str {
    reference.strip_prefix("file:").unwrap_or(reference)
}

/// Load and decode an image, returning it with its detected format.
pub fn load_image(path: impl AsRef<Path>) -> GolResult<(DynamicImage, ImageFormat)> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .map_err(|e| GolError::source(format!("open '{}' failed: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| GolError::source(format!("probe '{}' failed: {e}", path.display())))?;
    let format = reader
        .format()
        .ok_or_else(|| GolError::unsupported_format("unrecognized image data"))?;
    let img = reader
        .decode()
        .map_err(|e| GolError::source(format!("decode '{}' failed: {e}", path.display())))?;
    debug!(path = %path.display(), ?format, width = img.width(), height = img.height(), "loaded source image");
    Ok((img, format))
}
