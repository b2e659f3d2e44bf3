use super::{CharacteristicRegion, HalfSpace, domain_slack, loosened_polyhedron, raster_slack};
use crate::bbox::BBox;
use crate::float_types::Real;
use crate::mesh::SurfaceMesh;
use crate::region::ConvexPolyhedron;
use nalgebra::{Point3, Vector3};

/// Region of a triangle: the prism swept by the triangle along its normal.
#[derive(Clone, Debug)]
pub struct FaceRegion {
    id: usize,
    points: [Point3<Real>; 3],
    normal: Vector3<Real>,
    /// Outward in-plane unit normals of the three sides, side `k` running from
    /// `points[k]` to `points[(k + 1) % 3]`.
    side_normals: [Vector3<Real>; 3],
    scale: Real,
    signed: bool,
}

impl FaceRegion {
    pub fn new(mesh: &SurfaceMesh, t: usize, signed: bool) -> Self {
        let points = mesh.triangle_points(t);
        let normal = mesh.face_normal(t);
        let side_normals = std::array::from_fn(|k| {
            let edge = points[(k + 1) % 3] - points[k];
            edge.cross(&normal).normalize()
        });
        let scale = (0..3)
            .map(|k| (points[(k + 1) % 3] - points[k]).norm())
            .fold(0.0, Real::max);
        FaceRegion {
            id: mesh.identifier(t),
            points,
            normal,
            side_normals,
            scale,
            signed,
        }
    }
}

impl CharacteristicRegion for FaceRegion {
    #[inline]
    fn feature_id(&self) -> usize {
        self.id
    }

    fn feature_bounding_box(&self, max_distance: Real) -> BBox<Real> {
        let mut bbox = BBox::new(self.points[0], self.points[0]);
        bbox.add_point(&self.points[1]);
        bbox.add_point(&self.points[2]);
        bbox.expanded(max_distance + raster_slack(self.scale, max_distance))
    }

    fn characteristic_polyhedron(&self, max_distance: Real) -> Option<ConvexPolyhedron> {
        let a = self.points[0];
        let sides = (0..3).map(|k| HalfSpace::through(&self.points[k], self.side_normals[k]));
        let caps = [
            HalfSpace::through(&(a + self.normal * max_distance), self.normal),
            HalfSpace::through(&(a - self.normal * max_distance), -self.normal),
        ];
        loosened_polyhedron(
            sides.chain(caps),
            raster_slack(self.scale, max_distance),
        )
    }

    fn distance_and_closest_point(&self, p: &Point3<Real>) -> Option<(Real, Point3<Real>)> {
        let eps = domain_slack(self.scale);
        // The projection lies inside the triangle iff p is behind all three side planes.
        let inside = (0..3).all(|k| self.side_normals[k].dot(&(p - self.points[k])) <= eps);
        if !inside {
            return None;
        }
        let d = self.normal.dot(&(p - self.points[0]));
        let closest = p - self.normal * d;
        Some((if self.signed { d } else { d.abs() }, closest))
    }
}
