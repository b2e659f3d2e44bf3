//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use cptrs::{BBox, CptParams, Grid, Lattice, SurfaceMesh, float_types::Real};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Cube shaped domain `[-half, half]^3`.
pub fn centered_domain(half: Real) -> BBox<Real> {
    BBox::new(
        Point3::new(-half, -half, -half),
        Point3::new(half, half, half),
    )
}

/// Lattice over `[-half, half]^3` with the given spacing.
pub fn centered_lattice(half: Real, spacing: Real) -> Lattice {
    Lattice::from_spacing(centered_domain(half), spacing).expect("valid lattice")
}

/// A `3 x 3` triangle in the `z = 0` plane whose centroid is `(1, 1, 0)`.
pub fn right_triangle() -> SurfaceMesh {
    SurfaceMesh::single_triangle(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(0.0, 3.0, 0.0),
    )
    .expect("valid triangle")
}

/// Two triangles forming a square in the `z = 0` plane, sharing the diagonal.
pub fn unit_square() -> SurfaceMesh {
    SurfaceMesh::build(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .expect("valid square")
}

/// Run the transform into a single grid covering the whole lattice.
pub fn transform(mesh: &SurfaceMesh, lattice: &Lattice, params: &CptParams) -> Grid {
    let mut grids = vec![Grid::covering(lattice)];
    mesh.closest_point_transform(lattice, &mut grids, params)
        .expect("valid transform run");
    grids.pop().expect("one grid")
}

/// Every lattice multi-index together with its world position.
pub fn lattice_points(lattice: &Lattice) -> Vec<([i64; 3], Point3<Real>)> {
    let mut points = Vec::with_capacity(lattice.point_count());
    lattice
        .domain_index_box()
        .for_each_index(|index| points.push((index, lattice.index_to_world(index))));
    points
}
