//! Sampling domain configuration

use crate::Error;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// An axis-aligned, origin-centered sampling domain
///
/// The domain spans `±half_extent` on each axis.  The X and Y extents bound
/// the sampled plane; the Z extent bounds the normalized height of the
/// rendered surface.  Samples are taken at `resolution` evenly-spaced points
/// per planar axis, with both endpoints included exactly.
///
/// Invariants are checked at construction, so a `Grid` in hand is always
/// valid: `resolution >= 2` and every half-extent is positive and finite.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    half_extent: Vector3<f64>,
    resolution: usize,
}

impl Default for Grid {
    /// The `±5` domain sampled at 200 points per axis
    fn default() -> Self {
        Self {
            half_extent: Vector3::new(5.0, 5.0, 5.0),
            resolution: 200,
        }
    }
}

impl Grid {
    /// Builds a grid with independent per-axis half-extents
    pub fn new(
        half_extent: Vector3<f64>,
        resolution: usize,
    ) -> Result<Self, Error> {
        if resolution < 2 {
            return Err(Error::BadResolution(resolution));
        }
        for &h in half_extent.iter() {
            if !(h.is_finite() && h > 0.0) {
                return Err(Error::BadHalfExtent(h));
            }
        }
        Ok(Self {
            half_extent,
            resolution,
        })
    }

    /// Builds a grid with the same half-extent on all three axes
    pub fn isotropic(half_extent: f64, resolution: usize) -> Result<Self, Error> {
        Self::new(
            Vector3::new(half_extent, half_extent, half_extent),
            resolution,
        )
    }

    /// Returns the per-axis half-extents
    pub fn half_extent(&self) -> Vector3<f64> {
        self.half_extent
    }

    /// Returns the number of samples per planar axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Returns the sampled X range as `(min, max)`
    pub fn x_range(&self) -> (f64, f64) {
        (-self.half_extent.x, self.half_extent.x)
    }

    /// Returns the sampled Y range as `(min, max)`
    pub fn y_range(&self) -> (f64, f64) {
        (-self.half_extent.y, self.half_extent.y)
    }

    /// Returns the normalized height range as `(min, max)`
    pub fn z_range(&self) -> (f64, f64) {
        (-self.half_extent.z, self.half_extent.z)
    }

    /// Returns the `i`th X sample position, in `0..resolution`
    ///
    /// The first and last samples are exactly `-half_extent.x` and
    /// `+half_extent.x`.
    pub fn x_sample(&self, i: usize) -> f64 {
        debug_assert!(i < self.resolution);
        let t = i as f64 / (self.resolution - 1) as f64;
        -self.half_extent.x + 2.0 * self.half_extent.x * t
    }

    /// Returns the `j`th Y sample position, in `0..resolution`
    pub fn y_sample(&self, j: usize) -> f64 {
        debug_assert!(j < self.resolution);
        let t = j as f64 / (self.resolution - 1) as f64;
        -self.half_extent.y + 2.0 * self.half_extent.y * t
    }
}
