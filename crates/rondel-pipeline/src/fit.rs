//! Algebraic least-squares circle fit.
//!
//! Each boundary point `(x, y)` on a circle with center `(cx, cy)` and
//! radius `r` satisfies `x² + y² = 2·cx·x + 2·cy·y + (r² − cx² − cy²)`,
//! which is linear in the unknowns `(cx, cy, c)` with
//! `c = r² − cx² − cy²`. Stacking one row per point gives an
//! overdetermined linear system solved here via SVD, which stays
//! numerically stable on the locally near-collinear point runs that
//! quantized pixel boundaries produce; naive normal equations do not.
//!
//! The fit minimizes the algebraic residual, not the geometric
//! (perpendicular-distance) one. It has no random initialization:
//! identical point sets yield identical circles.

use nalgebra::{DMatrix, DVector};

use crate::types::{FittedCircle, Point};

/// Minimum number of boundary points for a stable fit.
pub const MIN_FIT_POINTS: usize = 3;

/// Relative singular-value cutoff below which the system is treated as
/// rank-deficient (collinear input).
const RANK_EPS: f64 = 1e-12;

/// Fit a circle to a set of boundary points.
///
/// Returns `None` when no stable fit exists: fewer than
/// [`MIN_FIT_POINTS`] points, all points collinear (rank-deficient
/// system), or a non-positive / non-finite squared radius. Callers
/// report this distinctly from "no object found".
#[must_use]
pub fn fit_circle(points: &[Point]) -> Option<FittedCircle> {
    if points.len() < MIN_FIT_POINTS {
        return None;
    }

    let n = points.len();
    let a = DMatrix::<f64>::from_fn(n, 3, |i, j| match j {
        0 => 2.0 * points[i].x,
        1 => 2.0 * points[i].y,
        _ => 1.0,
    });
    let b = DVector::<f64>::from_fn(n, |i, _| points[i].x.mul_add(points[i].x, points[i].y * points[i].y));

    let svd = a.svd(true, true);
    let eps = svd.singular_values.max() * RANK_EPS;
    if eps <= 0.0 || svd.rank(eps) < 3 {
        return None;
    }
    let solution = svd.solve(&b, eps).ok()?;

    let center = Point::new(solution[0], solution[1]);
    let radius_sq = solution[2] + center.distance_squared(Point::new(0.0, 0.0));
    if !radius_sq.is_finite() || radius_sq <= 0.0 {
        return None;
    }
    let radius = radius_sq.sqrt();

    Some(FittedCircle {
        center,
        radius,
        rms_residual: rms_residual(points, center, radius),
    })
}

/// Root-mean-square radial residual of `points` against the fitted circle.
#[allow(clippy::cast_precision_loss)]
fn rms_residual(points: &[Point], center: Point, radius: f64) -> f64 {
    let sum_sq: f64 = points
        .iter()
        .map(|p| {
            let e = p.distance(center) - radius;
            e * e
        })
        .sum();
    (sum_sq / points.len() as f64).sqrt()
}
