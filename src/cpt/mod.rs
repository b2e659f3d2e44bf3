//! The closest point transform driver.
//!
//! For every face, edge and vertex of a [`SurfaceMesh`] the driver builds the feature's
//! characteristic region, scan converts it onto the lattice and computes the exact distance
//! for each candidate lattice point that falls in one of the output grids.

pub mod params;
pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use params::{CptParams, CptStats};
pub use traits::CptOps;

pub use serial::SerialCptOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelCptOps;

use crate::errors::ValidationError;
use crate::grid::Grid;
use crate::lattice::Lattice;
use crate::mesh::SurfaceMesh;

impl SurfaceMesh {
    /// Closest point transform of this mesh into `grids`, run by the parallel back-end
    /// when the `parallel` feature is enabled.
    ///
    /// ```
    /// use cptrs::{CptParams, Grid, Lattice, SurfaceMesh, bbox::BBox};
    /// use nalgebra::Point3;
    ///
    /// let cube = SurfaceMesh::cube(1.0).unwrap();
    /// let domain = BBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// let lattice = Lattice::from_spacing(domain, 0.25).unwrap();
    /// let mut grids = vec![Grid::covering(&lattice)];
    /// let stats = cube
    ///     .closest_point_transform(&lattice, &mut grids, &CptParams::new(0.5).signed(true))
    ///     .unwrap();
    /// assert!(stats.distances_computed > 0);
    /// assert_eq!(grids[0].distance_at([4, 4, 4]), Some(-0.5));
    /// ```
    pub fn closest_point_transform(
        &self,
        lattice: &Lattice,
        grids: &mut [Grid],
        params: &CptParams,
    ) -> Result<CptStats, ValidationError> {
        #[cfg(not(feature = "parallel"))]
        let ops = SerialCptOps::new();
        #[cfg(feature = "parallel")]
        let ops = ParallelCptOps::new();

        ops.closest_point_transform(self, lattice, grids, params)
    }
}

/// Checks shared by every back-end before any grid is touched.
pub(crate) fn validate_run(
    mesh: &SurfaceMesh,
    lattice: &Lattice,
    grids: &[Grid],
    params: &CptParams,
) -> Result<(), ValidationError> {
    params.validate()?;
    if grids.is_empty() {
        return Err(ValidationError::EmptyGridSet);
    }
    let domain = lattice.domain_index_box();
    if let Some(g) = grids
        .iter()
        .position(|grid| !grid.is_empty() && !domain.contains_box(&grid.index_box()))
    {
        return Err(ValidationError::GridOutsideLattice(g));
    }
    if params.signed {
        let boundary_edges = mesh.boundary_edge_count();
        if boundary_edges > 0 {
            log::warn!(
                "signed transform of an open mesh: {} boundary edges are skipped",
                boundary_edges
            );
        }
        if !mesh.is_consistently_oriented() {
            log::warn!("signed transform of a mesh that is not consistently oriented");
        }
    }
    Ok(())
}
