//! Relief turns a scalar function of two variables into render-ready 3D
//! geometry: a shaded height-field mesh, plus the boundary curves of any
//! inequality constraints restricting its domain.
//!
//! The crate is the pure data/geometry core of a function visualizer.  It
//! draws nothing itself; a host consumes the vertex and segment streams it
//! produces.  Outputs are plain data and rebuilds are deterministic, so the
//! host is free to re-read them every frame.
//!
//! # Fields
//!
//! Objectives and constraints are both [`Field`]s, scalar functions over the
//! XY plane.  A blanket implementation covers plain closures:
//!
//! ```
//! use relief::Field;
//!
//! let f = |x: f64, y: f64| x * x + y * y;
//! assert_eq!(f.eval(3.0, 4.0), 25.0);
//! ```
//!
//! A constraint `g` restricts the visualized domain to the region where
//! `g(x, y) <= 0`; points outside it are excluded from the mesh.
//!
//! # Scenes
//!
//! A [`Scene`] holds the configuration (objective, constraints, sampling
//! [`Grid`], optimization path) and rebuilds all geometry synchronously
//! whenever a setter runs:
//!
//! ```
//! use relief::{Grid, Scene};
//! use std::sync::Arc;
//!
//! let mut scene = Scene::new(Grid::isotropic(5.0, 100)?);
//! scene.set_objective(|x: f64, y: f64| x * x + y * y);
//! scene.add_constraint(Arc::new(|x: f64, y: f64| x * x + y * y - 9.0));
//!
//! // One band per adjacent grid-row pair, ready to draw as triangle strips
//! assert_eq!(scene.surface().bands.len(), 99);
//!
//! // The constraint's zero-level curve, lifted onto the surface
//! assert!(!scene.boundaries().is_empty());
//! # Ok::<(), relief::Error>(())
//! ```
//!
//! Samples that violate a constraint carry a NaN height sentinel and are
//! never interpolated across: renderers split each band at the sentinels
//! (see [`SurfaceBand::valid_runs`]), the triangle-strip equivalent of
//! primitive restart.
//!
//! Heights are normalized so that the valid range of the objective spans
//! `±half_extent.z` exactly, and the same [`HeightRange`] is shared by the
//! surface, the constraint boundaries, and the lifted optimization path, so
//! everything sits flush.
//!
//! # Standalone passes
//!
//! The sampling and contouring passes are plain functions, usable without a
//! [`Scene`]:
//!
//! ```
//! use relief::{contour, Grid, HeightRange};
//!
//! let grid = Grid::isotropic(2.0, 50)?;
//! let segs = contour::trace(
//!     &|x: f64, y: f64| x * x + y * y - 1.0,
//!     None,
//!     &grid,
//!     &HeightRange::default(),
//! );
//! assert!(!segs.is_empty());
//! # Ok::<(), relief::Error>(())
//! ```
#![warn(missing_docs)]

mod error;
pub use error::Error;

pub mod contour;
pub mod field;
pub mod grid;
pub mod overlay;
pub mod scene;
pub mod surface;

pub use contour::ContourSegment;
pub use field::Field;
pub use grid::Grid;
pub use overlay::OverlaySegment;
pub use scene::Scene;
pub use surface::{HeightRange, Surface, SurfaceBand, Vertex};
