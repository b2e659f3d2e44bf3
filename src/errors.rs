//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter while building a mesh,
/// a lattice or while preparing a closest point transform run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (IndexOutOfRange) A triangle references a vertex that does not exist
    #[error("(IndexOutOfRange) Triangle {triangle} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    /// (DegenerateTriangle) A triangle has zero area or repeats a vertex
    #[error("(DegenerateTriangle) Triangle {0} has zero area")]
    DegenerateTriangle(usize),
    /// (NonManifoldEdge) An edge is shared by more than two triangles
    #[error("(NonManifoldEdge) Edge ({a}, {b}) is shared by {count} triangles")]
    NonManifoldEdge { a: usize, b: usize, count: usize },
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// (IdentifierCount) The number of triangle identifiers does not match the triangle count
    #[error("(IdentifierCount) Expected {expected} triangle identifiers, found {found}")]
    IdentifierCount { expected: usize, found: usize },
    /// (EmptyGridSet) A closest point transform was requested without any grid
    #[error("(EmptyGridSet) At least one grid is required")]
    EmptyGridSet,
    /// (GridOutsideLattice) A grid's index range is not contained in the lattice
    #[error("(GridOutsideLattice) Grid {0} is not contained in the lattice")]
    GridOutsideLattice(usize),
    /// (InvalidMaxDistance) The maximum distance must be positive and finite
    #[error("(InvalidMaxDistance) The maximum distance {0} must be positive and finite")]
    InvalidMaxDistance(Real),
    /// (InvalidLattice) The lattice configuration is unusable
    #[error("(InvalidLattice) {0}")]
    InvalidLattice(String),
}
