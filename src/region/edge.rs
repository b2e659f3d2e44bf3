use super::polyhedron::box_halfspaces;
use super::{CharacteristicRegion, HalfSpace, domain_slack, loosened_polyhedron, raster_slack};
use crate::bbox::BBox;
use crate::float_types::{Real, tolerance};
use crate::mesh::SurfaceMesh;
use crate::region::ConvexPolyhedron;
use nalgebra::{Point3, Vector3};

/// Region of an edge: the wedge between the two flanking face normals, or the half slab
/// beyond a boundary edge.
#[derive(Clone, Debug)]
pub struct EdgeRegion {
    id: usize,
    source: Point3<Real>,
    target: Point3<Real>,
    /// Unit direction from `source` to `target`.
    tangent: Vector3<Real>,
    length: Real,
    /// Outward in-plane normal of the owning triangle across this edge.
    outward: Vector3<Real>,
    /// Outward in-plane normal of the neighboring triangle, `None` on the boundary.
    neighbor_outward: Option<Vector3<Real>>,
    /// `1` for a convex edge, `-1` for a concave one.
    sign: Real,
    signed: bool,
}

impl EdgeRegion {
    /// Region of edge `edge` of triangle `t`.
    ///
    /// Returns `None` when the edge contributes nothing: zero length, flat (coplanar
    /// neighbors), or on the boundary during a signed pass.
    pub fn new(mesh: &SurfaceMesh, t: usize, edge: usize, signed: bool) -> Option<Self> {
        let (a, b) = mesh.edge_vertices(t, edge);
        let (source, target) = (mesh.vertex(a), mesh.vertex(b));
        let length = (target - source).norm();
        let tangent = (target - source).try_normalize(tolerance() * length.max(1.0))?;
        let normal = mesh.face_normal(t);
        let outward = tangent.cross(&normal);

        let (neighbor_outward, sign) = match mesh.adjacent_triangle(t, edge) {
            Some(neighbor) => {
                let dihedral = mesh.edge_dihedral(t, edge)?;
                if dihedral.abs() <= tolerance() {
                    return None;
                }
                // The neighbor runs the edge backwards, so its outward normal is n' × e.
                let neighbor_outward = mesh.face_normal(neighbor).cross(&tangent);
                (Some(neighbor_outward), dihedral.signum())
            },
            None if signed => return None,
            None => (None, 1.0),
        };

        Some(EdgeRegion {
            id: mesh.identifier(t),
            source,
            target,
            tangent,
            length,
            outward,
            neighbor_outward,
            sign,
            signed,
        })
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.neighbor_outward.is_none()
    }

    #[inline]
    pub fn is_convex(&self) -> bool {
        self.sign > 0.0
    }

    #[inline]
    pub fn endpoints(&self) -> (Point3<Real>, Point3<Real>) {
        (self.source, self.target)
    }
}

impl CharacteristicRegion for EdgeRegion {
    #[inline]
    fn feature_id(&self) -> usize {
        self.id
    }

    fn feature_bounding_box(&self, max_distance: Real) -> BBox<Real> {
        let mut bbox = BBox::new(self.source, self.source);
        bbox.add_point(&self.target);
        bbox.expanded(max_distance + raster_slack(self.length, max_distance))
    }

    fn characteristic_polyhedron(&self, max_distance: Real) -> Option<ConvexPolyhedron> {
        let mut planes = vec![
            HalfSpace::through(&self.source, -self.tangent),
            HalfSpace::through(&self.target, self.tangent),
            HalfSpace::through(&self.source, -self.outward),
        ];
        if let Some(neighbor_outward) = self.neighbor_outward {
            planes.push(HalfSpace::through(&self.source, -neighbor_outward));
        }
        let mut bbox = BBox::new(self.source, self.source);
        bbox.add_point(&self.target);
        planes.extend(box_halfspaces(&bbox.expanded(max_distance)));
        loosened_polyhedron(planes, raster_slack(self.length, max_distance))
    }

    fn distance_and_closest_point(&self, p: &Point3<Real>) -> Option<(Real, Point3<Real>)> {
        let eps = domain_slack(self.length);
        let s = (p - self.source).dot(&self.tangent);
        if s < -eps || s > self.length + eps {
            return None;
        }
        let closest = self.source + self.tangent * s.clamp(0.0, self.length);
        let r = p - closest;
        if r.dot(&self.outward) < -eps {
            return None;
        }
        if let Some(neighbor_outward) = self.neighbor_outward {
            if r.dot(&neighbor_outward) < -eps {
                return None;
            }
        }
        let d = r.norm();
        Some((if self.signed { self.sign * d } else { d }, closest))
    }
}
