//! Height-field sampling of an objective function under constraints
//!
//! [`sample`] evaluates an objective on a regular [`Grid`], masks every point
//! that violates a constraint, and emits triangle-strip-ready vertex bands
//! with per-vertex shaded color.  Excluded points are represented by a NaN
//! height sentinel, so a renderer can split each band into sub-strips at the
//! sentinels (primitive restart) and no triangle ever interpolates across an
//! invalid sample.
//!
//! Heights are normalized: the valid-sample range `[min, max]` maps linearly
//! onto `[-half_extent.z, +half_extent.z]`.  The same [`HeightRange`] is
//! reused by the contour tracer and path lifting, so boundary curves sit
//! flush on the surface.

use crate::{Field, Grid};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Blend factor between flat color and the depth shadow
const SHADOW_STRENGTH: f64 = 0.6;

/// Base value for the blue channel before shadow attenuation
const BLUE_BASE: f64 = 0.7;

/// Color carried by vertices at excluded samples
///
/// These vertices are never drawn (their height is the NaN sentinel), so the
/// value is arbitrary but stable.
pub const COLOR_INVALID: [f32; 3] = [0.0; 3];

/// Min/max of the valid sampled heights, used for normalization
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightRange {
    /// Smallest valid sampled height
    pub min: f64,
    /// Largest valid sampled height
    pub max: f64,
}

impl Default for HeightRange {
    /// The `(0, 1)` fallback used when no sample is valid
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl HeightRange {
    /// Returns the position of `z` within the range, in `[0, 1]`
    ///
    /// A degenerate range (`max == min`) maps every height to `0.5` rather
    /// than dividing by zero.
    pub fn fraction(&self, z: f64) -> f64 {
        if self.max > self.min {
            (z - self.min) / (self.max - self.min)
        } else {
            0.5
        }
    }

    /// Maps `z` from `[min, max]` onto `[-half_extent_z, +half_extent_z]`
    ///
    /// `z == min` maps to exactly `-half_extent_z` and `z == max` to exactly
    /// `+half_extent_z`; a degenerate range maps everything to the midpoint.
    pub fn normalize(&self, z: f64, half_extent_z: f64) -> f64 {
        self.fraction(z) * 2.0 * half_extent_z - half_extent_z
    }
}

/// A single surface vertex
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position, with height already normalized into `±half_extent.z`
    ///
    /// `position.z` is NaN at excluded samples, which signals "restart the
    /// strip here" to the renderer.
    pub position: Point3<f64>,
    /// RGB color in `[0, 1]`; [`COLOR_INVALID`] at excluded samples
    pub color: [f32; 3],
}

impl Vertex {
    /// Returns true unless this vertex carries the NaN restart sentinel
    pub fn is_valid(&self) -> bool {
        !self.position.z.is_nan()
    }
}

/// One strip of mesh vertices between two adjacent grid rows
///
/// Vertices alternate between the two rows in column-major zig-zag order,
/// `(x_i, y_j), (x_{i+1}, y_j)` for each `j`, so the band is directly
/// consumable as a triangle strip with restart-on-NaN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBand {
    /// Exactly `2 × resolution` vertices
    pub vertices: Vec<Vertex>,
}

impl SurfaceBand {
    /// Splits the band at NaN sentinels, yielding maximal drawable runs
    pub fn valid_runs(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices
            .split(|v| !v.is_valid())
            .filter(|run| !run.is_empty())
    }
}

/// A sampled surface: one band per adjacent grid row pair, plus the height
/// range that was used to normalize it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// `resolution - 1` bands
    pub bands: Vec<SurfaceBand>,
    /// Valid-sample height range; `(0, 1)` if nothing was valid
    pub range: HeightRange,
}

/// Samples `objective` over `grid`, masking constraint-excluded points
///
/// A grid point is valid iff every constraint evaluates finite and `<= 0`
/// there (vacuously valid when `constraints` is empty) and the objective
/// itself evaluates finite.  The objective is never called at points already
/// excluded by a constraint, so it may be partial outside its feasible
/// region.
pub fn sample(
    objective: &dyn Field,
    constraints: &[Arc<dyn Field>],
    grid: &Grid,
) -> Surface {
    let n = grid.resolution();

    // Raw heights per sample; NaN marks excluded or non-finite points
    let mut heights = vec![f64::NAN; n * n];
    for i in 0..n {
        let x = grid.x_sample(i);
        for j in 0..n {
            let y = grid.y_sample(j);
            if !feasible(constraints, x, y) {
                continue;
            }
            let z = objective.eval(x, y);
            if z.is_finite() {
                heights[i * n + j] = z;
            }
        }
    }

    let mut range = None;
    for &z in &heights {
        if z.is_nan() {
            continue;
        }
        range = Some(match range {
            None => HeightRange { min: z, max: z },
            Some(HeightRange { min, max }) => HeightRange {
                min: min.min(z),
                max: max.max(z),
            },
        });
    }
    let range = range.unwrap_or_default();

    let mut bands = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let mut vertices = Vec::with_capacity(2 * n);
        for j in 0..n {
            vertices.push(vertex(grid, &range, i, j, heights[i * n + j]));
            vertices.push(vertex(
                grid,
                &range,
                i + 1,
                j,
                heights[(i + 1) * n + j],
            ));
        }
        bands.push(SurfaceBand { vertices });
    }

    Surface { bands, range }
}

/// Checks whether every constraint holds at `(x, y)`
///
/// Non-finite constraint values count as violations.
fn feasible(constraints: &[Arc<dyn Field>], x: f64, y: f64) -> bool {
    constraints.iter().all(|c| {
        let g = c.eval(x, y);
        g.is_finite() && g <= 0.0
    })
}

fn vertex(
    grid: &Grid,
    range: &HeightRange,
    i: usize,
    j: usize,
    z: f64,
) -> Vertex {
    let x = grid.x_sample(i);
    let y = grid.y_sample(j);
    if z.is_nan() {
        return Vertex {
            position: Point3::new(x, y, f64::NAN),
            color: COLOR_INVALID,
        };
    }
    let h = grid.half_extent();
    let intensity = 1.0 - SHADOW_STRENGTH * (1.0 - range.fraction(z).sqrt());
    Vertex {
        position: Point3::new(x, y, range.normalize(z, h.z)),
        color: [
            ((x + h.x) / (2.0 * h.x) * intensity) as f32,
            ((y + h.y) / (2.0 * h.y) * intensity) as f32,
            (BLUE_BASE * intensity) as f32,
        ],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn paraboloid(x: f64, y: f64) -> f64 {
        x * x + y * y
    }

    #[test]
    fn band_count_and_shape() {
        let grid = Grid::isotropic(5.0, 8).unwrap();
        let s = sample(&paraboloid, &[], &grid);
        assert_eq!(s.bands.len(), 7);
        for band in &s.bands {
            assert_eq!(band.vertices.len(), 16);
        }
    }

    #[test]
    fn paraboloid_scenario() {
        // 5x5 samples of x^2 + y^2 over ±5: min 0 at the origin, max 50 at
        // the corners
        let grid = Grid::isotropic(5.0, 5).unwrap();
        let s = sample(&paraboloid, &[], &grid);
        assert_eq!(s.range, HeightRange { min: 0.0, max: 50.0 });

        let corner = &s.bands[0].vertices[0];
        assert_eq!(corner.position, Point3::new(-5.0, -5.0, 5.0));

        // x == 0 is sample index 2, the leading row of band 2
        let origin = &s.bands[2].vertices[2 * 2];
        assert_eq!(origin.position, Point3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn normalization_endpoints_are_exact() {
        let r = HeightRange { min: 1.3, max: 7.9 };
        assert_eq!(r.normalize(1.3, 5.0), -5.0);
        assert_eq!(r.normalize(7.9, 5.0), 5.0);
        assert!(r.min <= r.max);
    }

    #[test]
    fn degenerate_range_maps_to_midpoint() {
        let grid = Grid::isotropic(5.0, 6).unwrap();
        let s = sample(&|_: f64, _: f64| 2.0, &[], &grid);
        assert_eq!(s.range, HeightRange { min: 2.0, max: 2.0 });
        for v in s.bands.iter().flat_map(|b| &b.vertices) {
            assert_eq!(v.position.z, 0.0);
            assert!(v.color.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn constraint_masks_samples() {
        // g(x, y) = x keeps the x <= 0 half-plane
        let cs: Vec<Arc<dyn Field>> = vec![Arc::new(|x: f64, _: f64| x)];
        let grid = Grid::isotropic(5.0, 5).unwrap();
        let s = sample(&paraboloid, &cs, &grid);
        for v in s.bands.iter().flat_map(|b| &b.vertices) {
            if v.position.x > 0.0 {
                assert!(v.position.z.is_nan());
                assert_eq!(v.color, COLOR_INVALID);
            } else {
                assert!(v.position.z.is_finite());
            }
        }
        // max is now at the (-5, ±5) corners
        assert_eq!(s.range, HeightRange { min: 0.0, max: 50.0 });
    }

    #[test]
    fn objective_not_called_outside_feasible_region() {
        let cs: Vec<Arc<dyn Field>> = vec![Arc::new(|x: f64, _: f64| x)];
        let grid = Grid::isotropic(5.0, 5).unwrap();
        let guarded = |x: f64, y: f64| {
            assert!(x <= 0.0, "objective evaluated at excluded point");
            paraboloid(x, y)
        };
        sample(&guarded, &cs, &grid);
    }

    #[test]
    fn infeasible_domain_falls_back() {
        let cs: Vec<Arc<dyn Field>> = vec![Arc::new(|_: f64, _: f64| 1.0)];
        let grid = Grid::isotropic(5.0, 4).unwrap();
        let s = sample(&paraboloid, &cs, &grid);
        assert_eq!(s.range, HeightRange::default());
        assert!(
            s.bands
                .iter()
                .flat_map(|b| &b.vertices)
                .all(|v| !v.is_valid())
        );
    }

    #[test]
    fn non_finite_values_invalidate_points() {
        let grid = Grid::isotropic(5.0, 5).unwrap();

        // NaN constraint excludes everything
        let cs: Vec<Arc<dyn Field>> =
            vec![Arc::new(|_: f64, _: f64| f64::NAN)];
        let s = sample(&paraboloid, &cs, &grid);
        assert!(
            s.bands
                .iter()
                .flat_map(|b| &b.vertices)
                .all(|v| !v.is_valid())
        );

        // Non-finite objective values mask just their own samples
        let spiked = |x: f64, y: f64| {
            if x == 0.0 { f64::INFINITY } else { paraboloid(x, y) }
        };
        let s = sample(&spiked, &[], &grid);
        for v in s.bands.iter().flat_map(|b| &b.vertices) {
            assert_eq!(v.is_valid(), v.position.x != 0.0);
        }
    }

    #[test]
    fn shading_matches_position_and_depth() {
        // Plane z = x over ±1: fraction is 0 at x = -1 and 1 at x = +1
        let grid = Grid::isotropic(1.0, 2).unwrap();
        let s = sample(&|x: f64, _: f64| x, &[], &grid);

        let dark = &s.bands[0].vertices[0]; // (-1, -1)
        assert_relative_eq!(dark.color[0], 0.0);
        assert_relative_eq!(dark.color[1], 0.0);
        assert_relative_eq!(dark.color[2], 0.28, epsilon = 1e-6);

        let bright = &s.bands[0].vertices[3]; // (1, 1)
        assert_relative_eq!(bright.color[0], 1.0);
        assert_relative_eq!(bright.color[1], 1.0);
        assert_relative_eq!(bright.color[2], 0.7);
    }

    #[test]
    fn valid_runs_split_on_sentinels() {
        // Exclude the middle column: keep |x| >= 2
        let cs: Vec<Arc<dyn Field>> =
            vec![Arc::new(|x: f64, _: f64| 2.0 - x.abs())];
        let grid = Grid::isotropic(5.0, 5).unwrap();
        let s = sample(&paraboloid, &cs, &grid);

        // Band 0 spans x in {-5, -2.5}: both rows valid, one full run
        let runs: Vec<_> = s.bands[0].valid_runs().collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 10);

        // Band 1 spans x in {-2.5, 0}: every other vertex is a sentinel
        let runs: Vec<_> = s.bands[1].valid_runs().collect();
        assert_eq!(runs.len(), 5);
        assert!(runs.iter().all(|r| r.len() == 1));

        let total: usize =
            s.bands[1].valid_runs().map(<[Vertex]>::len).sum();
        let valid = s.bands[1].vertices.iter().filter(|v| v.is_valid()).count();
        assert_eq!(total, valid);
    }
}
