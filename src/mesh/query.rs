//! Brute force closest point queries, used as a reference for the transform.

use super::SurfaceMesh;
use crate::float_types::{
    Real,
    parry3d::{query::PointQuery, shape::Triangle},
};
use nalgebra::Point3;

impl SurfaceMesh {
    /// Unsigned distance from `p` to the surface, the closest surface point and the
    /// identifier of the triangle holding it. Checks every triangle.
    ///
    /// Returns `None` for a mesh without triangles.
    pub fn closest_point(&self, p: &Point3<Real>) -> Option<(Real, Point3<Real>, usize)> {
        (0..self.triangles.len())
            .map(|t| {
                let [a, b, c] = self.triangle_points(t);
                let projection = Triangle::new(a, b, c).project_local_point(p, true);
                ((p - projection.point).norm(), projection.point, self.identifiers[t])
            })
            .min_by(|x, y| x.0.total_cmp(&y.0))
    }

    /// Unsigned distance from `p` to the surface, `None` for a mesh without triangles.
    pub fn distance_to(&self, p: &Point3<Real>) -> Option<Real> {
        self.closest_point(p).map(|(d, _, _)| d)
    }
}
