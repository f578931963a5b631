//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the
//! decoded 3-channel color image the pipeline operates on.
//!
//! Decoding is the only fallible boundary before measurement: an
//! unreadable image is surfaced as a distinct error, never conflated
//! with "no object found".

use crate::types::{PipelineError, RgbImage};

/// Decode raw image bytes into an RGB image.
///
/// Supports whatever formats the `image` crate can decode with the
/// enabled features (PNG, JPEG, BMP, WebP).
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}
