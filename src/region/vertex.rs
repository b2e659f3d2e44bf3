use super::polyhedron::box_halfspaces;
use super::{CharacteristicRegion, HalfSpace, domain_slack, loosened_polyhedron, raster_slack};
use crate::bbox::BBox;
use crate::float_types::{Real, tolerance};
use crate::mesh::SurfaceMesh;
use crate::region::ConvexPolyhedron;
use nalgebra::{Point3, Vector3};

/// Which part of a vertex's neighborhood a [`VertexRegion`] accounts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexSide {
    /// Outside the surface, distances are positive.
    Positive,
    /// Inside the surface, distances are negative.
    Negative,
    /// Unsigned pass, both sides at once.
    Unsigned,
}

/// Region of a vertex: the cone of directions for which the vertex is closer than any
/// other point of its incident triangles.
#[derive(Clone, Debug)]
pub struct VertexRegion {
    id: usize,
    position: Point3<Real>,
    /// Unit directions toward the neighboring vertices. Empty for a boundary vertex in
    /// the unsigned pass, whose region is just the ball around it.
    directions: Vec<Vector3<Real>>,
    /// Angle weighted normal, decides the sign of a point nearest to this vertex.
    pseudo_normal: Vector3<Real>,
    side: VertexSide,
    scale: Real,
}

impl VertexRegion {
    /// The regions of vertex `v`: none, one, or a positive and a negative one.
    ///
    /// An isolated vertex gets none. In a signed pass boundary vertices get none, a
    /// vertex with a convex incident edge gets a positive region and a vertex with a
    /// concave incident edge a negative region; a saddle gets both and a vertex whose
    /// incident edges are all flat gets none.
    pub fn regions(mesh: &SurfaceMesh, v: usize, signed: bool) -> Vec<VertexRegion> {
        let incident = mesh.incident_triangles(v);
        let Some(&first) = incident.first() else {
            return Vec::new();
        };
        let boundary = mesh.is_vertex_on_boundary(v);
        if signed && boundary {
            return Vec::new();
        }

        let position = mesh.vertex(v);
        let neighbors = mesh.vertex_neighbors(v);
        let scale = neighbors
            .iter()
            .map(|&w| (mesh.vertex(w) - position).norm())
            .fold(0.0, Real::max);
        let directions = if boundary {
            Vec::new()
        } else {
            neighbors
                .iter()
                .filter_map(|&w| (mesh.vertex(w) - position).try_normalize(tolerance() * scale))
                .collect()
        };
        let Some(pseudo_normal) = angle_weighted_normal(mesh, v) else {
            return Vec::new();
        };

        let region = |side| VertexRegion {
            id: mesh.identifier(first),
            position,
            directions: directions.clone(),
            pseudo_normal,
            side,
            scale,
        };

        if !signed {
            return vec![region(VertexSide::Unsigned)];
        }

        let (convex, concave) = incident_edge_convexity(mesh, v);
        let mut regions = Vec::with_capacity(2);
        if convex {
            regions.push(region(VertexSide::Positive));
        }
        if concave {
            regions.push(region(VertexSide::Negative));
        }
        regions
    }

    #[inline]
    pub fn side(&self) -> VertexSide {
        self.side
    }

    #[inline]
    pub fn position(&self) -> Point3<Real> {
        self.position
    }

    #[inline]
    pub fn pseudo_normal(&self) -> Vector3<Real> {
        self.pseudo_normal
    }
}

/// Whether `v` has at least one convex and at least one concave incident edge.
fn incident_edge_convexity(mesh: &SurfaceMesh, v: usize) -> (bool, bool) {
    let mut convex = false;
    let mut concave = false;
    for &t in mesh.incident_triangles(v) {
        let tri = mesh.triangle(t);
        let Some(corner) = tri.iter().position(|&w| w == v) else {
            continue;
        };
        // the two edges of `t` that touch `v` are the ones opposite its other corners
        for edge in [(corner + 1) % 3, (corner + 2) % 3] {
            match mesh.edge_dihedral(t, edge) {
                Some(d) if d > tolerance() => convex = true,
                Some(d) if d < -tolerance() => concave = true,
                _ => {},
            }
        }
    }
    (convex, concave)
}

/// Sum of incident face normals weighted by the face angle at `v`, normalized.
fn angle_weighted_normal(mesh: &SurfaceMesh, v: usize) -> Option<Vector3<Real>> {
    let position = mesh.vertex(v);
    let sum: Vector3<Real> = mesh
        .incident_triangles(v)
        .iter()
        .map(|&t| {
            let others: Vec<Point3<Real>> = mesh
                .triangle(t)
                .iter()
                .filter(|&&w| w != v)
                .map(|&w| mesh.vertex(w))
                .collect();
            let angle = (others[0] - position).angle(&(others[1] - position));
            mesh.face_normal(t) * angle
        })
        .sum();
    sum.try_normalize(tolerance())
}

impl CharacteristicRegion for VertexRegion {
    #[inline]
    fn feature_id(&self) -> usize {
        self.id
    }

    fn feature_bounding_box(&self, max_distance: Real) -> BBox<Real> {
        BBox::new(self.position, self.position)
            .expanded(max_distance + raster_slack(self.scale, max_distance))
    }

    fn characteristic_polyhedron(&self, max_distance: Real) -> Option<ConvexPolyhedron> {
        let mut planes: Vec<HalfSpace> = self
            .directions
            .iter()
            .map(|&direction| HalfSpace::through(&self.position, direction))
            .collect();
        match self.side {
            VertexSide::Positive => {
                planes.push(HalfSpace::through(&self.position, -self.pseudo_normal))
            },
            VertexSide::Negative => {
                planes.push(HalfSpace::through(&self.position, self.pseudo_normal))
            },
            VertexSide::Unsigned => {},
        }
        let bbox = BBox::new(self.position, self.position).expanded(max_distance);
        planes.extend(box_halfspaces(&bbox));
        loosened_polyhedron(planes, raster_slack(self.scale, max_distance))
    }

    fn distance_and_closest_point(&self, p: &Point3<Real>) -> Option<(Real, Point3<Real>)> {
        let eps = domain_slack(self.scale);
        let r = p - self.position;
        if self.directions.iter().any(|direction| r.dot(direction) > eps) {
            return None;
        }
        let d = r.norm();
        let along_normal = r.dot(&self.pseudo_normal);
        match self.side {
            VertexSide::Positive if along_normal >= -eps => Some((d, self.position)),
            VertexSide::Negative if along_normal <= eps => Some((-d, self.position)),
            VertexSide::Unsigned => Some((d, self.position)),
            _ => None,
        }
    }
}
