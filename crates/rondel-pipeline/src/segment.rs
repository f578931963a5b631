//! Binary segmentation of the smoothed grayscale image.
//!
//! A single global threshold separates the (bright) object from the
//! (dark) background: a pixel is foreground iff its smoothed intensity
//! is strictly greater than the threshold.

use imageproc::contrast::{ThresholdType, threshold};

use crate::types::GrayImage;

/// Foreground value in the binary mask.
pub const FOREGROUND: u8 = 255;

/// Background value in the binary mask.
pub const BACKGROUND: u8 = 0;

/// Threshold a grayscale image into a binary mask.
///
/// Pixels with intensity strictly greater than `cutoff` become
/// [`FOREGROUND`], everything else [`BACKGROUND`]. Deterministic; the
/// output has the same dimensions as the input.
#[must_use = "returns the binary mask"]
pub fn binarize(image: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(image, cutoff, ThresholdType::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_greater_than_cutoff_is_foreground() {
        let img = GrayImage::from_fn(3, 1, |x, _| match x {
            0 => image::Luma([89]),
            1 => image::Luma([90]),
            _ => image::Luma([91]),
        });
        let mask = binarize(&img, 90);
        assert_eq!(mask.get_pixel(0, 0).0[0], BACKGROUND);
        assert_eq!(mask.get_pixel(1, 0).0[0], BACKGROUND);
        assert_eq!(mask.get_pixel(2, 0).0[0], FOREGROUND);
    }

    #[test]
    fn all_dark_image_yields_empty_mask() {
        let img = GrayImage::from_fn(8, 8, |_, _| image::Luma([10]));
        let mask = binarize(&img, 90);
        assert!(mask.pixels().all(|p| p.0[0] == BACKGROUND));
    }

    #[test]
    fn output_dimensions_match_input() {
        let img = GrayImage::new(17, 31);
        let mask = binarize(&img, 90);
        assert_eq!(mask.dimensions(), (17, 31));
    }
}
