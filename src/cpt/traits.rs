//! Trait for closest point transform back-ends.

use super::params::{CptParams, CptStats};
use crate::errors::ValidationError;
use crate::grid::Grid;
use crate::lattice::Lattice;
use crate::mesh::SurfaceMesh;

pub trait CptOps {
    /// Write distance, closest point and closest feature into every cell of `grids` that
    /// lies within `params.max_distance` of `mesh`. Cells only ever move closer to the
    /// surface, so running again with the same or a smaller distance changes nothing.
    fn closest_point_transform(
        &self,
        mesh: &SurfaceMesh,
        lattice: &Lattice,
        grids: &mut [Grid],
        params: &CptParams,
    ) -> Result<CptStats, ValidationError>;
}
