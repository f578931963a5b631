//! Raster annotation for visual verification.
//!
//! Draws the selected contours and the fitted circle onto a copy of
//! the decoded image so a human can confirm that the measured boundary
//! is the object and not an artifact.

use image::Rgb;
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use crate::types::{Contour, FittedCircle, Point, RgbImage};

/// Color used for the selected contour overlay.
pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Color used for the fitted circle overlay.
pub const CIRCLE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Stroke thickness of the contour overlay, in pixels.
pub const CONTOUR_THICKNESS: i32 = 3;

/// Draw each contour as a closed green polyline with a
/// [`CONTOUR_THICKNESS`]-pixel stroke.
pub fn draw_contours(image: &mut RgbImage, contours: &[Contour]) {
    for contour in contours {
        let points = contour.points();
        if points.len() < 2 {
            continue;
        }
        for window in points.windows(2) {
            draw_thick_segment(image, window[0], window[1]);
        }
        // Close the loop.
        if let (Some(last), Some(first)) = (points.last(), points.first()) {
            draw_thick_segment(image, *last, *first);
        }
    }
}

/// Draw one stroked segment by repeating the 1-px line at horizontal
/// and vertical offsets up to half the stroke width.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_thick_segment(image: &mut RgbImage, from: Point, to: Point) {
    let half = CONTOUR_THICKNESS / 2;
    for offset in -half..=half {
        let o = offset as f32;
        draw_line_segment_mut(
            image,
            (from.x as f32 + o, from.y as f32),
            (to.x as f32 + o, to.y as f32),
            CONTOUR_COLOR,
        );
        draw_line_segment_mut(
            image,
            (from.x as f32, from.y as f32 + o),
            (to.x as f32, to.y as f32 + o),
            CONTOUR_COLOR,
        );
    }
}

/// Draw the fitted circle in red at integer-truncated center and radius.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_fitted_circle(image: &mut RgbImage, circle: &FittedCircle) {
    draw_hollow_circle_mut(
        image,
        (circle.center.x as i32, circle.center.y as i32),
        circle.radius as i32,
        CIRCLE_COLOR,
    );
}
