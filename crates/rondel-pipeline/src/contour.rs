//! Contour extraction: trace closed boundaries from a binary mask.
//!
//! This module defines the [`ContourTracer`] trait for pluggable
//! boundary-tracing algorithms and the [`ContourTracerKind`] enum for
//! selecting which algorithm to use at runtime.
//!
//! # Strategy pattern
//!
//! Boundary tracing is a well-understood external algorithm; the
//! trait/enum design lets any compliant implementation be swapped in
//! without perturbing the rest of the pipeline. Hierarchy information
//! (which contour immediately encloses which) is preserved so selection
//! can reason about nesting.

use serde::{Deserialize, Serialize};

use crate::types::{Contour, GrayImage, Point};

/// Selects which contour tracing algorithm to use.
///
/// Ships with [`BorderFollowing`](Self::BorderFollowing) only.
/// Additional variants can be added without changing the
/// `PipelineConfig` struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContourTracerKind {
    /// Suzuki-Abe border following via `imageproc::contours::find_contours`.
    ///
    /// Every maximal foreground region yields at least one closed outer
    /// border; holes yield nested borders with parent links.
    #[default]
    BorderFollowing,
}

/// Trait for contour tracing strategies.
///
/// Input: a binary mask (non-zero pixels = foreground).
/// Output: closed contours with parent links, in a stable order for a
/// given input. A mask with no foreground pixels yields an empty set,
/// not an error.
pub trait ContourTracer {
    /// Trace contours in the given binary mask.
    fn trace(&self, mask: &GrayImage) -> Vec<Contour>;
}

impl ContourTracer for ContourTracerKind {
    fn trace(&self, mask: &GrayImage) -> Vec<Contour> {
        match *self {
            Self::BorderFollowing => trace_border_following(mask),
        }
    }
}

/// Suzuki-Abe border following via `imageproc::contours::find_contours`.
///
/// Converts `imageproc` contour points (integer grid coordinates) into
/// floating-point [`Point`]s. All traced contours are kept, including
/// degenerate ones, so that parent indices remain valid into the
/// returned vector; selection discards small contours by area.
fn trace_border_following(mask: &GrayImage) -> Vec<Contour> {
    let contours: Vec<imageproc::contours::Contour<u32>> =
        imageproc::contours::find_contours(mask);

    contours
        .into_iter()
        .map(|c| {
            let points = c
                .points
                .into_iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect();
            Contour::new(points, c.parent)
        })
        .collect()
}
