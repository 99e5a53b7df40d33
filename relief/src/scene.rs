//! Scene configuration and synchronous rebuild
//!
//! A [`Scene`] owns the full visualization configuration (objective,
//! constraint list, sampling grid, optimization path) together with the
//! geometry computed from it.  Every mutating setter performs a full rebuild
//! before returning: surface first, then constraint boundaries (sharing the
//! surface's [`HeightRange`]), then the lifted path.  There is no partial or
//! incremental recompute; grids are small enough that correctness wins over
//! throughput.
//!
//! Hosts that cache a render-ready representation (display lists, GPU
//! buffers) should compare [`Scene::generation`] between frames and rebuild
//! their cache when it changes.

use crate::{
    ContourSegment, Error, Field, Grid, HeightRange, Surface, contour,
    surface,
};
use nalgebra::{Point2, Point3, Vector3};
use std::sync::Arc;

/// Configuration and cached geometry for one visualized function
///
/// ```
/// use relief::{Grid, Scene};
///
/// let mut scene = Scene::new(Grid::isotropic(5.0, 100)?);
/// scene.set_objective(|x: f64, y: f64| x * x + y * y);
/// assert_eq!(scene.surface().bands.len(), 99);
/// # Ok::<(), relief::Error>(())
/// ```
pub struct Scene {
    grid: Grid,
    objective: Option<Arc<dyn Field>>,
    constraints: Vec<Arc<dyn Field>>,
    path: Vec<Point2<f64>>,
    connect_path: bool,

    surface: Surface,
    boundaries: Vec<ContourSegment>,
    path_vertices: Vec<Point3<f64>>,
    generation: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

impl Scene {
    /// Builds an empty scene over the given grid
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            objective: None,
            constraints: vec![],
            path: vec![],
            connect_path: true,
            surface: Surface::default(),
            boundaries: vec![],
            path_vertices: vec![],
            generation: 0,
        }
    }

    /// Sets the objective function and rebuilds
    pub fn set_objective<F: Field + 'static>(&mut self, objective: F) {
        self.objective = Some(Arc::new(objective));
        self.rebuild();
    }

    /// Removes the objective function and rebuilds
    ///
    /// The surface becomes empty; constraint boundaries are still traced,
    /// flat in the `z = 0` plane.
    pub fn clear_objective(&mut self) {
        self.objective = None;
        self.rebuild();
    }

    /// Appends a constraint `g(x, y) <= 0` and rebuilds
    ///
    /// Constraints are evaluated in insertion order.  Adding the same
    /// constraint object twice (by identity) is rejected; returns whether
    /// the constraint was actually added.
    pub fn add_constraint(&mut self, constraint: Arc<dyn Field>) -> bool {
        if self
            .constraints
            .iter()
            .any(|c| Arc::ptr_eq(c, &constraint))
        {
            return false;
        }
        self.constraints.push(constraint);
        self.rebuild();
        true
    }

    /// Removes all constraints and rebuilds
    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
        self.rebuild();
    }

    /// Replaces the sampling grid and rebuilds
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.rebuild();
    }

    /// Changes the sample count per axis and rebuilds
    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), Error> {
        self.grid = Grid::new(self.grid.half_extent(), resolution)?;
        self.rebuild();
        Ok(())
    }

    /// Changes the per-axis half-extents and rebuilds
    pub fn set_half_extent(
        &mut self,
        half_extent: Vector3<f64>,
    ) -> Result<(), Error> {
        self.grid = Grid::new(half_extent, self.grid.resolution())?;
        self.rebuild();
        Ok(())
    }

    /// Replaces the optimization path and rebuilds
    ///
    /// Path points are plane positions (optimizer iterates); their heights
    /// are recomputed from the objective on every rebuild.
    pub fn set_path(&mut self, points: Vec<Point2<f64>>) {
        self.path = points;
        self.rebuild();
    }

    /// Sets whether the renderer should join path points with lines
    pub fn set_connect_path(&mut self, connect: bool) {
        self.connect_path = connect;
        self.generation += 1;
    }

    /// Returns the sampling grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the constraints, in evaluation order
    pub fn constraints(&self) -> &[Arc<dyn Field>] {
        &self.constraints
    }

    /// Returns the sampled surface (empty when no objective is set)
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the valid-sample height range of the current surface
    pub fn height_range(&self) -> HeightRange {
        self.surface.range
    }

    /// Returns all constraint boundary segments, in constraint order
    pub fn boundaries(&self) -> &[ContourSegment] {
        &self.boundaries
    }

    /// Returns the optimization path lifted onto the surface
    ///
    /// Points where the objective is non-finite are skipped; with no
    /// objective the path lies in the `z = 0` plane.
    pub fn path_vertices(&self) -> &[Point3<f64>] {
        &self.path_vertices
    }

    /// Returns whether the renderer should join path points with lines
    pub fn connect_path(&self) -> bool {
        self.connect_path
    }

    /// Monotone counter, bumped once per rebuild or render-affecting change
    ///
    /// Rejected mutations (duplicate constraint, invalid grid parameters)
    /// leave it unchanged.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn rebuild(&mut self) {
        self.surface = match self.objective.as_deref() {
            Some(f) => surface::sample(f, &self.constraints, &self.grid),
            None => Surface::default(),
        };

        let objective = self.objective.as_deref();
        let mut boundaries = Vec::new();
        for c in &self.constraints {
            boundaries.extend(contour::trace(
                c.as_ref(),
                objective,
                &self.grid,
                &self.surface.range,
            ));
        }
        self.boundaries = boundaries;

        let range = self.surface.range;
        self.path_vertices = self
            .path
            .iter()
            .filter_map(|p| contour::lift(*p, objective, &self.grid, &range))
            .collect();

        self.generation += 1;
    }
}
