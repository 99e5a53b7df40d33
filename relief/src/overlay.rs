//! Grid and axis overlay primitives
//!
//! Line segments computed from the [`Grid`] extents, for the renderer to draw
//! around the surface: a reference grid in the floor plane and the three
//! coordinate axes.  Colors, line widths, and labels are the renderer's
//! concern.

use crate::{Error, Grid};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A single overlay line segment
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlaySegment {
    /// First endpoint
    pub start: Point3<f64>,
    /// Second endpoint
    pub end: Point3<f64>,
}

impl OverlaySegment {
    fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// Builds the reference grid in the floor plane `z = -half_extent.z`
///
/// Lines run parallel to both planar axes, spaced `step` apart starting from
/// the negative edge of the domain.
pub fn grid_lines(
    grid: &Grid,
    step: f64,
) -> Result<Vec<OverlaySegment>, Error> {
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::BadGridStep(step));
    }
    let h = grid.half_extent();
    let floor = -h.z;

    let mut out = Vec::new();
    for k in 0..=(2.0 * h.x / step).floor() as usize {
        let x = -h.x + k as f64 * step;
        out.push(OverlaySegment::new(
            Point3::new(x, -h.y, floor),
            Point3::new(x, h.y, floor),
        ));
    }
    for k in 0..=(2.0 * h.y / step).floor() as usize {
        let y = -h.y + k as f64 * step;
        out.push(OverlaySegment::new(
            Point3::new(-h.x, y, floor),
            Point3::new(h.x, y, floor),
        ));
    }
    Ok(out)
}

/// Builds the X, Y, and Z axis segments, each spanning its ± half-extent
pub fn axis_lines(grid: &Grid) -> [OverlaySegment; 3] {
    let h = grid.half_extent();
    [
        OverlaySegment::new(
            Point3::new(-h.x, 0.0, 0.0),
            Point3::new(h.x, 0.0, 0.0),
        ),
        OverlaySegment::new(
            Point3::new(0.0, -h.y, 0.0),
            Point3::new(0.0, h.y, 0.0),
        ),
        OverlaySegment::new(
            Point3::new(0.0, 0.0, -h.z),
            Point3::new(0.0, 0.0, h.z),
        ),
    ]
}
