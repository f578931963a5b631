//! rondel-pipeline: Pure circular-object measurement pipeline (sans-IO).
//!
//! Measures the diameter of a roughly-centered circular object in a
//! photograph through:
//! grayscale -> bilateral smoothing -> binary threshold ->
//! contour tracing -> contour selection -> algebraic circle fit ->
//! pixel-to-millimeter conversion.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. File reading and process
//! concerns live in `rondel-cli`.

pub mod annotate;
pub mod compare;
pub mod contour;
pub mod decode;
pub mod fit;
pub mod preprocess;
pub mod segment;
pub mod select;
pub mod types;

pub use compare::{ComparisonReport, ImageSummary, MeasurementResult};
pub use contour::{ContourTracer, ContourTracerKind};
pub use select::{SelectionPolicy, SelectionPolicyKind};
pub use types::{
    Calibration, Contour, Dimensions, FittedCircle, Measurement, MeasurementOutcome,
    PipelineConfig, PipelineError, Point, PointLocation,
};

/// Run the full measurement pipeline on raw image bytes.
///
/// Takes encoded image bytes (PNG, JPEG, BMP, WebP) and a
/// configuration, then produces a [`Measurement`] containing the
/// annotated image, the selected contours, their summed pixel area,
/// and the measured diameter when a circle could be fitted.
///
/// # Pipeline steps
///
/// 1. Decode image
/// 2. Grayscale conversion
/// 3. Bilateral smoothing (edge-preserving noise reduction)
/// 4. Binary thresholding
/// 5. Contour tracing (pluggable strategy)
/// 6. Contour selection (pluggable policy)
/// 7. Algebraic circle fit over the pooled selected boundary points
/// 8. Pixel-to-millimeter conversion and annotation
///
/// "No object found" and "degenerate boundary" are defined outcomes of
/// the returned [`Measurement`], not errors.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the configuration is out
/// of range, [`PipelineError::EmptyInput`] if `image_bytes` is empty,
/// and [`PipelineError::ImageDecode`] if the image cannot be decoded.
pub fn measure(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<Measurement, PipelineError> {
    config.validate()?;
    let image = decode::decode_image(image_bytes)?;
    Ok(measure_image(&image, config))
}

/// Run the measurement pipeline on an already-decoded color image.
///
/// Infallible: decode and configuration validation happen before this
/// point (see [`measure`]), and every downstream condition is a defined
/// [`MeasurementOutcome`]. The caller keeps ownership of `image`; the
/// annotated copy is made internally.
#[must_use]
pub fn measure_image(image: &types::RgbImage, config: &PipelineConfig) -> Measurement {
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    // 2+3. Grayscale and edge-preserving smoothing.
    let gray = preprocess::to_grayscale(image);
    let smoothed = preprocess::bilateral_smooth(
        &gray,
        config.bilateral_diameter,
        config.color_sigma,
        config.space_sigma,
    );

    // 4. Binary thresholding.
    let mask = segment::binarize(&smoothed, config.threshold);

    // 5+6. Contour tracing and selection.
    let traced = config.contour_tracer.trace(&mask);
    let selected = select::select_contours(&traced, dimensions, &config.selection);

    // 8a. Contour overlay on a copy of the original.
    let mut annotated = image.clone();
    annotate::draw_contours(&mut annotated, &selected);

    let total_pixels: f64 = selected.iter().map(Contour::area).sum();

    // 7+8b. Circle fit over the pooled boundary points, then the
    // physical diameter and circle overlay.
    let outcome = if selected.is_empty() {
        MeasurementOutcome::NoObjectFound
    } else {
        let points: Vec<Point> = selected
            .iter()
            .flat_map(|c| c.points().iter().copied())
            .collect();
        match fit::fit_circle(&points) {
            Some(circle) => {
                annotate::draw_fitted_circle(&mut annotated, &circle);
                let diameter_mm = config.calibration.diameter_mm(circle.radius);
                MeasurementOutcome::Measured {
                    circle,
                    diameter_mm,
                }
            }
            None => MeasurementOutcome::DegenerateBoundary,
        }
    };

    Measurement {
        annotated,
        contours: selected,
        total_pixels,
        dimensions,
        outcome,
    }
}
