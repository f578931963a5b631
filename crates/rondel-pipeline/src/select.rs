//! Contour selection: pick out the contour(s) bounding the object of
//! interest.
//!
//! The selection heuristic is an explicit, named policy rather than
//! inline magic numbers, so alternate strategies can be substituted
//! without touching the fitting or measurement stages.

use serde::{Deserialize, Serialize};

use crate::types::{Contour, Dimensions, Point, PointLocation};

/// Contours with area at or below this many pixel-area units are never
/// eligible for selection.
pub const MIN_CONTOUR_AREA: f64 = 1000.0;

/// Default near-origin probe used to reject contours that wrap the
/// whole frame (e.g. the image border itself).
pub const DEFAULT_FRAME_PROBE: Point = Point::new(20.0, 20.0);

/// Trait for contour selection policies.
///
/// A policy is a pure predicate over a single contour; [`select_contours`]
/// applies it across the traced set.
pub trait SelectionPolicy {
    /// Returns `true` if `contour` is eligible as (part of) the object
    /// boundary.
    fn eligible(&self, contour: &Contour, dimensions: Dimensions) -> bool;
}

/// Selects which contour selection policy to use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SelectionPolicyKind {
    /// Keep contours that are large enough, do not wrap the frame, and
    /// enclose the image center.
    ///
    /// The object is assumed roughly centered in the frame: a contour
    /// is eligible iff its area exceeds `min_area`, it does *not*
    /// strictly contain `frame_probe` (which would mean it wraps the
    /// whole frame), and it *does* strictly contain the image center.
    CenteredObject {
        /// Minimum contour area in pixel-area units (exclusive).
        min_area: f64,
        /// Near-origin point that must not be enclosed.
        frame_probe: Point,
    },
}

impl Default for SelectionPolicyKind {
    fn default() -> Self {
        Self::CenteredObject {
            min_area: MIN_CONTOUR_AREA,
            frame_probe: DEFAULT_FRAME_PROBE,
        }
    }
}

impl SelectionPolicy for SelectionPolicyKind {
    fn eligible(&self, contour: &Contour, dimensions: Dimensions) -> bool {
        match *self {
            Self::CenteredObject {
                min_area,
                frame_probe,
            } => {
                if contour.area() <= min_area {
                    return false;
                }
                if contour.locate(frame_probe) == PointLocation::Inside {
                    return false;
                }
                contour.locate(dimensions.center()) == PointLocation::Inside
            }
        }
    }
}

/// Apply `policy` to every traced contour, returning the survivors.
///
/// Zero, one, or several survivors are all legal outcomes: the filter
/// is data-dependent, not a uniqueness guarantee. When several survive,
/// downstream fitting pools their boundary points as one population.
#[must_use]
pub fn select_contours(
    contours: &[Contour],
    dimensions: Dimensions,
    policy: &dyn SelectionPolicy,
) -> Vec<Contour> {
    contours
        .iter()
        .filter(|c| policy.eligible(c, dimensions))
        .cloned()
        .collect()
}
