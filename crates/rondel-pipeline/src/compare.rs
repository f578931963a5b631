//! Comparison of two independent measurements.
//!
//! The comparator is a pure function of two measurement results: it
//! keeps no state, recomputes on every request, and never aborts when
//! one side failed — a partial report is still produced.

use serde::{Deserialize, Serialize};

use crate::types::{Measurement, PipelineError};

/// Result of one measurement run as consumed by the comparator.
pub type MeasurementResult = Result<Measurement, PipelineError>;

/// Per-image summary carried in a [`ComparisonReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Summed selected-contour area in pixel-area units
    /// (0 when the measurement failed or found no object).
    pub total_pixels: f64,
    /// Measured diameter in millimeters, when a circle was fitted.
    pub diameter_mm: Option<f64>,
    /// Error message when the measurement itself failed (e.g. the
    /// image could not be decoded).
    pub error: Option<String>,
}

impl ImageSummary {
    fn from_result(result: &MeasurementResult) -> Self {
        match result {
            Ok(measurement) => Self {
                total_pixels: measurement.total_pixels,
                diameter_mm: measurement.diameter_mm(),
                error: None,
            },
            Err(e) => Self {
                total_pixels: 0.0,
                diameter_mm: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Differences between two independently measured images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Summary of the first image.
    pub first: ImageSummary,
    /// Summary of the second image.
    pub second: ImageSummary,
    /// Absolute difference of the selected-contour areas.
    pub pixel_diff: f64,
    /// `pixel_diff` as a percentage of the mean area (0 when both
    /// areas are 0).
    pub pixel_percent_diff: f64,
    /// Absolute difference of the measured diameters in millimeters.
    pub diameter_diff: f64,
    /// `diameter_diff` as a percentage of the mean diameter (0 when
    /// both diameters are 0).
    pub diameter_percent_diff: f64,
}

impl ComparisonReport {
    /// Compare two measurement results.
    ///
    /// A side without a measured diameter (failed decode, no object,
    /// degenerate boundary) contributes 0 to the diameter arithmetic;
    /// its summary records why.
    #[must_use]
    pub fn from_results(first: &MeasurementResult, second: &MeasurementResult) -> Self {
        let first = ImageSummary::from_result(first);
        let second = ImageSummary::from_result(second);

        let d1 = first.diameter_mm.unwrap_or(0.0);
        let d2 = second.diameter_mm.unwrap_or(0.0);

        Self {
            pixel_diff: (first.total_pixels - second.total_pixels).abs(),
            pixel_percent_diff: percent_diff(first.total_pixels, second.total_pixels),
            diameter_diff: (d1 - d2).abs(),
            diameter_percent_diff: percent_diff(d1, d2),
            first,
            second,
        }
    }
}

/// Absolute difference of `a` and `b` as a percentage of their mean.
///
/// Defined as 0 when both values are 0, so comparing two empty
/// measurements never divides by zero.
fn percent_diff(a: f64, b: f64) -> f64 {
    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        0.0
    } else {
        (a - b).abs() / mean * 100.0
    }
}
