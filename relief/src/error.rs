//! Module containing the relief universal error type
use thiserror::Error;

/// Universal error type for relief
#[derive(Error, Debug)]
pub enum Error {
    /// Sampling requires at least one grid cell per axis
    #[error("resolution ({0}) must be at least 2")]
    BadResolution(usize),

    /// Domain half-extents must be positive and finite
    #[error("half-extent ({0}) must be positive and finite")]
    BadHalfExtent(f64),

    /// Overlay grid spacing must be positive and finite
    #[error("grid step ({0}) must be positive and finite")]
    BadGridStep(f64),
}
