//! Constraint boundary extraction by marching squares
//!
//! [`trace`] scans a constraint `g(x, y) <= 0` on the sampling grid and
//! extracts its zero-level curve as independent line segments.  Each cell
//! edge whose endpoint values change sign contributes one crossing point,
//! interpolated linearly along the edge; a cell's crossings are then joined
//! pairwise in discovery order.  Saddle cells (4 crossings) are not
//! disambiguated: crossings are joined `(0,1), (1,2), (2,3)` regardless of
//! topology.
//!
//! Crossing points are lifted to 3D by evaluating the *objective* (not the
//! constraint) and normalizing with the same [`HeightRange`] as the sampled
//! surface, so boundary curves sit flush on it.

use crate::{Field, Grid, HeightRange};
use arrayvec::ArrayVec;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// One line segment of a constraint's zero-level boundary curve
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourSegment {
    /// First endpoint, lifted to normalized surface height
    pub start: Point3<f64>,
    /// Second endpoint, lifted to normalized surface height
    pub end: Point3<f64>,
}

/// Traces the zero-level boundary of `constraint` over `grid`
///
/// `range` must be the [`HeightRange`] of the currently sampled surface so
/// that boundary heights and surface heights agree.  When `objective` is
/// `None`, every segment lies in the `z = 0` plane.
///
/// Constraint values are evaluated once per grid point and reused across the
/// four cells sharing each corner.
pub fn trace(
    constraint: &dyn Field,
    objective: Option<&dyn Field>,
    grid: &Grid,
    range: &HeightRange,
) -> Vec<ContourSegment> {
    let n = grid.resolution();

    let mut values = vec![0.0; n * n];
    for i in 0..n {
        let x = grid.x_sample(i);
        for j in 0..n {
            values[i * n + j] = constraint.eval(x, grid.y_sample(j));
        }
    }

    let mut out = Vec::new();
    for i in 0..n - 1 {
        let (x0, x1) = (grid.x_sample(i), grid.x_sample(i + 1));
        for j in 0..n - 1 {
            let (y0, y1) = (grid.y_sample(j), grid.y_sample(j + 1));
            let g00 = values[i * n + j];
            let g10 = values[(i + 1) * n + j];
            let g01 = values[i * n + j + 1];
            let g11 = values[(i + 1) * n + j + 1];

            let p00 = Point2::new(x0, y0);
            let p10 = Point2::new(x1, y0);
            let p01 = Point2::new(x0, y1);
            let p11 = Point2::new(x1, y1);

            // Visit the edges in bottom, right, top, left order
            let mut crossings: ArrayVec<Point2<f64>, 4> = ArrayVec::new();
            for (pa, ga, pb, gb) in [
                (p00, g00, p10, g10),
                (p10, g10, p11, g11),
                (p01, g01, p11, g11),
                (p00, g00, p01, g01),
            ] {
                if let Some(p) = crossing(pa, ga, pb, gb) {
                    crossings.push(p);
                }
            }

            let lifted: ArrayVec<Option<Point3<f64>>, 4> = crossings
                .iter()
                .map(|&p| lift(p, objective, grid, range))
                .collect();
            for w in lifted.windows(2) {
                if let (Some(start), Some(end)) = (w[0], w[1]) {
                    out.push(ContourSegment { start, end });
                }
            }
        }
    }
    out
}

/// Interpolates the zero crossing along one cell edge, if any
///
/// An edge crosses iff both values are finite and their product is `<= 0`.
/// The crossing sits at `t = |g0| / (|g0| + |g1|)` from the first endpoint;
/// when both values are exactly zero the midpoint is used.
fn crossing(
    p0: Point2<f64>,
    g0: f64,
    p1: Point2<f64>,
    g1: f64,
) -> Option<Point2<f64>> {
    if !(g0.is_finite() && g1.is_finite() && g0 * g1 <= 0.0) {
        return None;
    }
    let sum = g0.abs() + g1.abs();
    let t = if sum > 0.0 { g0.abs() / sum } else { 0.5 };
    Some(p0 + (p1 - p0) * t)
}

/// Lifts a plane point to normalized surface height
///
/// Returns `None` when the lifted height is non-finite (the surface is
/// invalid there anyway, so the caller drops the geometry).
pub(crate) fn lift(
    p: Point2<f64>,
    objective: Option<&dyn Field>,
    grid: &Grid,
    range: &HeightRange,
) -> Option<Point3<f64>> {
    let z = match objective {
        Some(f) => range.normalize(f.eval(p.x, p.y), grid.half_extent().z),
        None => 0.0,
    };
    z.is_finite().then(|| Point3::new(p.x, p.y, z))
}
