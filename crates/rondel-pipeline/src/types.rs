//! Shared types for the rondel measurement pipeline.

use geo::{Area, Contains, Intersects};
use serde::{Deserialize, Serialize};

use crate::contour::ContourTracerKind;
use crate::select::SelectionPolicyKind;

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate raster data without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can reference the
/// decoded source image without depending on `image` directly.
pub use image::RgbImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// The geometric center of the image, `(width / 2, height / 2)`.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Classification of a point against a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointLocation {
    /// Strictly inside the contour.
    Inside,
    /// On the contour boundary.
    OnBoundary,
    /// Strictly outside the contour.
    Outside,
}

/// A closed boundary polyline traced from a binary mask.
///
/// Points are integer pixel coordinates promoted to `f64`. The polyline
/// is implicitly closed (last point connects back to the first). A
/// contour remembers the index of its immediately enclosing parent in
/// the traced contour set, when there is one; selection consumes this
/// nesting information but never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    points: Vec<Point>,
    parent: Option<usize>,
}

impl Contour {
    /// Create a contour from its boundary points and optional parent index.
    #[must_use]
    pub const fn new(points: Vec<Point>, parent: Option<usize>) -> Self {
        Self { points, parent }
    }

    /// The ordered boundary points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of boundary points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the immediately enclosing contour, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Unsigned polygon area (shoelace magnitude) in pixel-area units.
    ///
    /// Degenerate contours (fewer than 3 points) have zero area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.to_polygon().unsigned_area()
    }

    /// Classify `point` against the closed contour.
    ///
    /// Strict interior excludes the boundary, matching the usual
    /// point-in-polygon convention. Degenerate contours classify every
    /// point as [`PointLocation::Outside`].
    #[must_use]
    pub fn locate(&self, point: Point) -> PointLocation {
        let polygon = self.to_polygon();
        let p = geo::Point::new(point.x, point.y);
        if polygon.contains(&p) {
            PointLocation::Inside
        } else if polygon.intersects(&p) {
            PointLocation::OnBoundary
        } else {
            PointLocation::Outside
        }
    }

    /// The contour as a closed `geo` polygon (exterior ring only).
    fn to_polygon(&self) -> geo::Polygon<f64> {
        let ring: Vec<geo::Coord<f64>> = self
            .points
            .iter()
            .map(|p| geo::Coord { x: p.x, y: p.y })
            .collect();
        geo::Polygon::new(geo::LineString::new(ring), Vec::new())
    }
}

/// A circle fitted to boundary points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedCircle {
    /// Center in pixel coordinates.
    pub center: Point,
    /// Radius in pixels. Always finite and non-negative.
    pub radius: f64,
    /// Root-mean-square radial residual of the fit, in pixels.
    ///
    /// Carried through for diagnostics; nothing downstream consumes it.
    pub rms_residual: f64,
}

/// Pixel-to-millimeter calibration for a specific camera/lens setup.
///
/// The scale is supplied at configuration time, never derived from the
/// image: `pixels` pixels of fitted radius correspond to `millimeters`
/// physical millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Radius in pixels corresponding to [`Self::millimeters`].
    pub pixels: f64,
    /// Physical length corresponding to [`Self::pixels`].
    pub millimeters: f64,
}

impl Calibration {
    /// Default scale: 317 px per 8 mm.
    pub const DEFAULT_PIXELS: f64 = 317.0;
    /// See [`Self::DEFAULT_PIXELS`].
    pub const DEFAULT_MILLIMETERS: f64 = 8.0;

    /// Convert a fitted radius in pixels to a physical diameter in mm.
    #[must_use]
    pub fn diameter_mm(self, radius_px: f64) -> f64 {
        radius_px / self.pixels * self.millimeters
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixels: Self::DEFAULT_PIXELS,
            millimeters: Self::DEFAULT_MILLIMETERS,
        }
    }
}

/// How a single measurement run concluded.
///
/// The non-[`Measured`](Self::Measured) variants are defined outcomes,
/// not errors: they are recovered at the measurement boundary and never
/// propagate into comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasurementOutcome {
    /// An object boundary was selected and a circle fitted to it.
    Measured {
        /// The fitted circle in pixel coordinates.
        circle: FittedCircle,
        /// Physical diameter derived from the fitted radius.
        diameter_mm: f64,
    },
    /// Contour selection produced an empty set.
    NoObjectFound,
    /// The selected boundary had too few points, or all points were
    /// collinear, so no stable circle fit exists.
    DegenerateBoundary,
}

impl MeasurementOutcome {
    /// The measured diameter in millimeters, if a circle was fitted.
    #[must_use]
    pub const fn diameter_mm(&self) -> Option<f64> {
        match *self {
            Self::Measured { diameter_mm, .. } => Some(diameter_mm),
            Self::NoObjectFound | Self::DegenerateBoundary => None,
        }
    }

    /// Returns `true` if a circle was fitted.
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        matches!(self, Self::Measured { .. })
    }
}

/// Result of running the measurement pipeline on a single image.
///
/// Note: does not derive `PartialEq` or serde traits because `RgbImage`
/// implements neither; callers compare the structured fields directly.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Copy of the decoded image with the selected contours and fitted
    /// circle drawn on it for visual verification.
    pub annotated: RgbImage,
    /// The contours that survived selection.
    pub contours: Vec<Contour>,
    /// Summed area of the selected contours, in pixel-area units.
    /// Zero when no contour survived selection.
    pub total_pixels: f64,
    /// Dimensions of the source image.
    pub dimensions: Dimensions,
    /// How the run concluded.
    pub outcome: MeasurementOutcome,
}

impl Measurement {
    /// The measured diameter in millimeters, if a circle was fitted.
    #[must_use]
    pub const fn diameter_mm(&self) -> Option<f64> {
        self.outcome.diameter_mm()
    }
}

/// Configuration for the measurement pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Binary threshold: a smoothed pixel is foreground iff its
    /// intensity is strictly greater than this value. Range `[1, 255]`.
    pub threshold: u8,

    /// Bilateral filter neighborhood diameter in pixels.
    /// Odd, range `[1, 100]`.
    pub bilateral_diameter: u32,

    /// Bilateral filter intensity-difference sigma. Range `[1, 100]`.
    pub color_sigma: u32,

    /// Bilateral filter spatial-distance sigma. Range `[1, 100]`.
    pub space_sigma: u32,

    /// Which contour tracing algorithm to use.
    pub contour_tracer: ContourTracerKind,

    /// Which contour selection policy to use.
    pub selection: SelectionPolicyKind,

    /// Pixel-to-millimeter scale for the fitted radius.
    pub calibration: Calibration,
}

impl PipelineConfig {
    /// Default binary threshold.
    pub const DEFAULT_THRESHOLD: u8 = 90;
    /// Default bilateral neighborhood diameter.
    pub const DEFAULT_BILATERAL_DIAMETER: u32 = 23;
    /// Default bilateral intensity sigma.
    pub const DEFAULT_COLOR_SIGMA: u32 = 61;
    /// Default bilateral spatial sigma.
    pub const DEFAULT_SPACE_SIGMA: u32 = 11;

    /// Check the configuration against its documented ranges.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the offending
    /// field when any value is out of range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.threshold < 1 {
            return Err(PipelineError::InvalidConfig(
                "threshold must be in [1, 255]".to_owned(),
            ));
        }
        if !(1..=100).contains(&self.bilateral_diameter) {
            return Err(PipelineError::InvalidConfig(
                "bilateral_diameter must be in [1, 100]".to_owned(),
            ));
        }
        if self.bilateral_diameter % 2 == 0 {
            return Err(PipelineError::InvalidConfig(
                "bilateral_diameter must be odd".to_owned(),
            ));
        }
        if !(1..=100).contains(&self.color_sigma) {
            return Err(PipelineError::InvalidConfig(
                "color_sigma must be in [1, 100]".to_owned(),
            ));
        }
        if !(1..=100).contains(&self.space_sigma) {
            return Err(PipelineError::InvalidConfig(
                "space_sigma must be in [1, 100]".to_owned(),
            ));
        }
        if !(self.calibration.pixels.is_finite() && self.calibration.pixels > 0.0) {
            return Err(PipelineError::InvalidConfig(
                "calibration.pixels must be positive and finite".to_owned(),
            ));
        }
        if !(self.calibration.millimeters.is_finite() && self.calibration.millimeters > 0.0) {
            return Err(PipelineError::InvalidConfig(
                "calibration.millimeters must be positive and finite".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            bilateral_diameter: Self::DEFAULT_BILATERAL_DIAMETER,
            color_sigma: Self::DEFAULT_COLOR_SIGMA,
            space_sigma: Self::DEFAULT_SPACE_SIGMA,
            contour_tracer: ContourTracerKind::default(),
            selection: SelectionPolicyKind::default(),
            calibration: Calibration::default(),
        }
    }
}

/// Errors that can occur before the pipeline produces a measurement.
///
/// Recoverable conditions ("no object found", "degenerate boundary")
/// are [`MeasurementOutcome`] variants, not errors; only conditions
/// that prevent a measurement from existing at all live here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square() -> Contour {
        Contour::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            None,
        )
    }

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dimensions_center() {
        let dims = Dimensions {
            width: 400,
            height: 300,
        };
        assert_eq!(dims.center(), Point::new(200.0, 150.0));
    }

    // --- Contour tests ---

    #[test]
    fn contour_area_of_square() {
        assert!((unit_square().area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn contour_area_degenerate() {
        let c = Contour::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)], None);
        assert!(c.area().abs() < f64::EPSILON);
    }

    #[test]
    fn contour_locate_inside_outside_boundary() {
        let c = unit_square();
        assert_eq!(c.locate(Point::new(5.0, 5.0)), PointLocation::Inside);
        assert_eq!(c.locate(Point::new(15.0, 5.0)), PointLocation::Outside);
        assert_eq!(c.locate(Point::new(10.0, 5.0)), PointLocation::OnBoundary);
        assert_eq!(c.locate(Point::new(0.0, 0.0)), PointLocation::OnBoundary);
    }

    #[test]
    fn contour_parent_preserved() {
        let c = Contour::new(vec![Point::new(1.0, 1.0)], Some(3));
        assert_eq!(c.parent(), Some(3));
        assert_eq!(unit_square().parent(), None);
    }

    // --- Calibration tests ---

    #[test]
    fn calibration_default_scale() {
        let cal = Calibration::default();
        // 317 px of radius correspond to 8 mm.
        assert!((cal.diameter_mm(317.0) - 8.0).abs() < 1e-12);
        assert!((cal.diameter_mm(100.0) - 100.0 / 317.0 * 8.0).abs() < 1e-12);
    }

    // --- MeasurementOutcome tests ---

    #[test]
    fn outcome_diameter_accessor() {
        let measured = MeasurementOutcome::Measured {
            circle: FittedCircle {
                center: Point::new(1.0, 2.0),
                radius: 10.0,
                rms_residual: 0.1,
            },
            diameter_mm: 2.5,
        };
        assert_eq!(measured.diameter_mm(), Some(2.5));
        assert!(measured.is_measured());
        assert_eq!(MeasurementOutcome::NoObjectFound.diameter_mm(), None);
        assert_eq!(MeasurementOutcome::DegenerateBoundary.diameter_mm(), None);
    }

    // --- PipelineConfig tests ---

    #[test]
    fn config_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.threshold, 90);
        assert_eq!(config.bilateral_diameter, 23);
        assert_eq!(config.color_sigma, 61);
        assert_eq!(config.space_sigma, 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_threshold() {
        let config = PipelineConfig {
            threshold: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn config_rejects_even_bilateral_diameter() {
        let config = PipelineConfig {
            bilateral_diameter: 22,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn config_rejects_out_of_range_sigma() {
        for bad in [
            PipelineConfig {
                color_sigma: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                space_sigma: 101,
                ..PipelineConfig::default()
            },
        ] {
            assert!(matches!(
                bad.validate(),
                Err(PipelineError::InvalidConfig(_)),
            ));
        }
    }

    #[test]
    fn config_rejects_nonpositive_calibration() {
        let config = PipelineConfig {
            calibration: Calibration {
                pixels: 0.0,
                millimeters: 8.0,
            },
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_)),
        ));
    }

    // --- Error display tests ---

    #[test]
    fn error_empty_input_display() {
        assert_eq!(
            PipelineError::EmptyInput.to_string(),
            "input image data is empty",
        );
    }

    #[test]
    fn error_invalid_config_display() {
        let err = PipelineError::InvalidConfig("threshold must be in [1, 255]".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid pipeline configuration: threshold must be in [1, 255]",
        );
    }

    // --- Serde round-trip tests ---

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            threshold: 120,
            bilateral_diameter: 11,
            color_sigma: 30,
            space_sigma: 7,
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn contour_serde_round_trip() {
        let c = Contour::new(
            vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)],
            Some(1),
        );
        let json = serde_json::to_string(&c).unwrap();
        let deserialized: Contour = serde_json::from_str(&json).unwrap();
        assert_eq!(c, deserialized);
    }
}
