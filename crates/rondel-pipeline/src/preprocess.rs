//! Grayscale conversion and edge-preserving smoothing.
//!
//! The measurement pipeline works on a single luminance channel.
//! Smoothing uses a bilateral filter rather than a Gaussian: weights
//! fall off with both spatial distance and intensity difference, so
//! high-frequency noise is suppressed while the object boundary the
//! downstream threshold depends on stays sharp.

use imageproc::filter::bilateral::GaussianEuclideanColorDistance;

use crate::types::{GrayImage, RgbImage};

/// Convert a color image to grayscale using the standard luminance
/// weighting (`0.299*R + 0.587*G + 0.114*B`, as implemented by the
/// `image` crate).
#[must_use = "returns the grayscale image"]
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Apply edge-preserving bilateral smoothing to a grayscale image.
///
/// `diameter` is the pixel diameter of the filter neighborhood (odd);
/// `imageproc` takes a window radius, so `diameter / 2` is passed.
/// A diameter of 1 is a 1x1 neighborhood, i.e. the identity, and
/// returns the image unchanged. `space_sigma` controls fall-off with
/// spatial distance (imageproc's spatial sigma); `color_sigma`
/// controls fall-off with intensity difference (its Gaussian color
/// distance).
#[must_use = "returns the smoothed image"]
#[allow(clippy::cast_precision_loss)]
pub fn bilateral_smooth(
    image: &GrayImage,
    diameter: u32,
    color_sigma: u32,
    space_sigma: u32,
) -> GrayImage {
    let window_radius = u8::try_from(diameter / 2).unwrap_or(u8::MAX);
    if window_radius == 0 {
        return image.clone();
    }
    imageproc::filter::bilateral_filter(
        image,
        window_radius,
        space_sigma as f32,
        GaussianEuclideanColorDistance::new(color_sigma as f32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A test image with a sharp dark-to-bright boundary at x=5.
    fn sharp_edge_image() -> GrayImage {
        GrayImage::from_fn(10, 10, |x, _y| {
            if x < 5 {
                image::Luma([20])
            } else {
                image::Luma([220])
            }
        })
    }

    #[test]
    fn grayscale_weights_luminance() {
        let red = RgbImage::from_pixel(1, 1, image::Rgb([255, 0, 0]));
        let green = RgbImage::from_pixel(1, 1, image::Rgb([0, 255, 0]));
        let blue = RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 255]));

        let r = to_grayscale(&red).get_pixel(0, 0).0[0];
        let g = to_grayscale(&green).get_pixel(0, 0).0[0];
        let b = to_grayscale(&blue).get_pixel(0, 0).0[0];

        assert!(
            g > r && r > b,
            "expected green > red > blue luminance, got R={r} G={g} B={b}",
        );
    }

    #[test]
    fn grayscale_preserves_dimensions() {
        let img = RgbImage::new(17, 31);
        let gray = to_grayscale(&img);
        assert_eq!(gray.width(), 17);
        assert_eq!(gray.height(), 31);
    }

    #[test]
    fn smooth_preserves_dimensions() {
        let img = GrayImage::new(17, 31);
        let smoothed = bilateral_smooth(&img, 5, 61, 11);
        assert_eq!(smoothed.width(), 17);
        assert_eq!(smoothed.height(), 31);
    }

    #[test]
    fn smooth_keeps_uniform_image_uniform() {
        let img = GrayImage::from_fn(10, 10, |_, _| image::Luma([128]));
        let smoothed = bilateral_smooth(&img, 5, 61, 11);
        for pixel in smoothed.pixels() {
            let diff = i16::from(pixel.0[0]) - 128;
            assert!(
                diff.abs() <= 1,
                "expected uniform image to stay near 128, got {}",
                pixel.0[0],
            );
        }
    }

    #[test]
    fn unit_diameter_returns_identical_image() {
        // diameter 1 is a 1x1 neighborhood: nothing to average with.
        let img = sharp_edge_image();
        assert_eq!(bilateral_smooth(&img, 1, 61, 11), img);
    }

    #[test]
    fn smooth_averages_away_small_speckle() {
        // A deviation well inside the intensity sigma gets pulled
        // toward its neighborhood; contrast with the strong-edge test
        // below, where large differences survive.
        let mut img = GrayImage::from_fn(9, 9, |_, _| image::Luma([128]));
        img.put_pixel(4, 4, image::Luma([140]));
        let smoothed = bilateral_smooth(&img, 5, 61, 11);
        let center = smoothed.get_pixel(4, 4).0[0];
        assert!(
            center < 135,
            "expected the speckle to be averaged toward 128, got {center}",
        );
    }

    #[test]
    fn smooth_preserves_strong_edge() {
        // The bilateral filter's intensity weighting should keep the two
        // sides of a strong edge well separated, unlike a plain blur.
        let img = sharp_edge_image();
        let smoothed = bilateral_smooth(&img, 5, 30, 5);

        let left = smoothed.get_pixel(3, 5).0[0];
        let right = smoothed.get_pixel(6, 5).0[0];
        assert!(
            left < 70 && right > 170,
            "expected edge to survive smoothing, got left={left} right={right}",
        );
    }

    #[test]
    fn color_sigma_gates_intensity_mixing() {
        // Raising only the intensity sigma must let the two sides of a
        // strong edge bleed into each other; the spatial sigma alone
        // cannot. This pins the sigmas to their respective roles.
        let img = sharp_edge_image();
        let tight = bilateral_smooth(&img, 7, 5, 11);
        let loose = bilateral_smooth(&img, 7, 100, 11);

        let tight_left = tight.get_pixel(4, 5).0[0];
        let loose_left = loose.get_pixel(4, 5).0[0];
        assert!(
            tight_left < 30,
            "tiny intensity sigma must not mix across the edge, got {tight_left}",
        );
        assert!(
            loose_left >= tight_left + 5,
            "large intensity sigma should brighten the dark side of the edge, \
             got tight={tight_left} loose={loose_left}",
        );
    }
}
