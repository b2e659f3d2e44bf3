//! Characteristic regions of mesh features.
//!
//! Every face, edge and vertex of a `SurfaceMesh` owns the part of space for which it is
//! the nearest piece of the surface. A region knows how to bound that part of space by a
//! convex polyhedron clipped at a maximum distance, and how to compute the exact
//! distance and closest point for a query point inside its domain.
//!
//! The three variants are separate types sharing the [`CharacteristicRegion`] trait, and
//! the driver visits each kind in its own loop.

use crate::bbox::BBox;
use crate::float_types::{Real, tolerance};
use nalgebra::Point3;

pub mod edge;
pub mod face;
pub mod polyhedron;
pub mod vertex;

pub use edge::EdgeRegion;
pub use face::FaceRegion;
pub use polyhedron::{ConvexPolyhedron, HalfSpace};
pub use vertex::{VertexRegion, VertexSide};

pub trait CharacteristicRegion {
    /// Identifier written into grid cells this region wins.
    fn feature_id(&self) -> usize;

    /// Bounding box of the bare feature grown by `max_distance` and a little slack.
    fn feature_bounding_box(&self, max_distance: Real) -> BBox<Real>;

    /// Polyhedron holding every point of the region up to `max_distance`, slightly
    /// loosened so lattice points on its faces are not lost. `None` if the region is empty.
    fn characteristic_polyhedron(&self, max_distance: Real) -> Option<ConvexPolyhedron>;

    /// Distance (signed when the region was built for a signed pass) and closest point
    /// for `p`, or `None` when `p` lies outside the region's domain.
    fn distance_and_closest_point(&self, p: &Point3<Real>) -> Option<(Real, Point3<Real>)>;
}

/// Slack used by domain tests for a feature of size `scale`.
#[inline]
pub(crate) fn domain_slack(scale: Real) -> Real {
    tolerance() * scale
}

/// Slack used when building polyhedra and bounding boxes. Always larger than
/// [`domain_slack`] so every point accepted by a domain test is rasterized.
#[inline]
pub(crate) fn raster_slack(scale: Real, max_distance: Real) -> Real {
    4.0 * tolerance() * (scale + max_distance)
}

/// Loosen every half-space and intersect them.
pub(crate) fn loosened_polyhedron(
    planes: impl IntoIterator<Item = HalfSpace>,
    slack: Real,
) -> Option<ConvexPolyhedron> {
    ConvexPolyhedron::from_halfspaces(planes.into_iter().map(|h| h.loosened(slack)).collect())
}
