//! `SurfaceMesh`: an indexed triangle surface with eagerly computed normals,
//! triangle adjacency and vertex incidence.
//!
//! All relations are plain index tables. Triangle `t` stores three vertex indices
//! `[v0, v1, v2]` in counter-clockwise order seen from the side its normal points to.
//! Edge `i` of a triangle is the edge *opposite* vertex `i`, running from
//! `v[(i + 1) % 3]` to `v[(i + 2) % 3]`, and `adjacent_triangle(t, i)` is the triangle
//! across that edge.

use crate::bbox::BBox;
use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

pub mod query;
pub mod shapes;
pub mod topology;

pub use shapes::TessellationCache;

#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    pub(crate) vertices: Vec<Point3<Real>>,
    pub(crate) triangles: Vec<[usize; 3]>,
    pub(crate) face_normals: Vec<Vector3<Real>>,
    pub(crate) vertex_normals: Vec<Vector3<Real>>,
    pub(crate) adjacent: Vec<[Option<usize>; 3]>,
    pub(crate) incident: Vec<Vec<usize>>,
    pub(crate) boundary_vertex: Vec<bool>,
    pub(crate) identifiers: Vec<usize>,
}

impl SurfaceMesh {
    /// Build a mesh from vertex coordinates and 0-based vertex index triples.
    ///
    /// Fails on non-finite coordinates, out of range indices, zero-area triangles and
    /// edges shared by more than two triangles. Triangle identifiers default to the
    /// triangle's position in `triangles`.
    pub fn build(
        vertices: Vec<Point3<Real>>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self, ValidationError> {
        if let Some(p) = vertices
            .iter()
            .find(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(ValidationError::InvalidCoordinate(*p));
        }

        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&index| index >= vertices.len()) {
                return Err(ValidationError::IndexOutOfRange {
                    triangle: t,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let face_normals = triangles
            .iter()
            .enumerate()
            .map(|(t, tri)| {
                triangle_normal(&vertices, tri).ok_or(ValidationError::DegenerateTriangle(t))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let adjacent = topology::build_adjacency(&triangles)?;
        let incident = topology::build_incidence(&triangles, vertices.len());

        let mut boundary_vertex = vec![false; vertices.len()];
        for (tri, neighbors) in triangles.iter().zip(&adjacent) {
            for i in 0..3 {
                if neighbors[i].is_none() {
                    boundary_vertex[tri[(i + 1) % 3]] = true;
                    boundary_vertex[tri[(i + 2) % 3]] = true;
                }
            }
        }

        let identifiers = (0..triangles.len()).collect();

        let mut mesh = SurfaceMesh {
            vertex_normals: vec![Vector3::zeros(); vertices.len()],
            vertices,
            triangles,
            face_normals,
            adjacent,
            incident,
            boundary_vertex,
            identifiers,
        };
        for v in 0..mesh.vertices.len() {
            mesh.update_vertex_normal(v);
        }

        log::debug!(
            "built surface mesh: {} vertices, {} triangles, {} boundary edges",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.boundary_edge_count()
        );

        Ok(mesh)
    }

    /// Replace the stable per-triangle identifiers.
    pub fn with_triangle_identifiers(mut self, ids: Vec<usize>) -> Result<Self, ValidationError> {
        if ids.len() != self.triangles.len() {
            return Err(ValidationError::IdentifierCount {
                expected: self.triangles.len(),
                found: ids.len(),
            });
        }
        self.identifiers = ids;
        Ok(self)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn vertex(&self, v: usize) -> Point3<Real> {
        self.vertices[v]
    }

    #[inline]
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        self.triangles[t]
    }

    /// The three corner positions of triangle `t`.
    #[inline]
    pub fn triangle_points(&self, t: usize) -> [Point3<Real>; 3] {
        let [a, b, c] = self.triangles[t];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Outward unit normal of triangle `t`.
    #[inline]
    pub fn face_normal(&self, t: usize) -> Vector3<Real> {
        self.face_normals[t]
    }

    /// Normalized sum of the incident face normals, zero for isolated vertices.
    #[inline]
    pub fn vertex_normal(&self, v: usize) -> Vector3<Real> {
        self.vertex_normals[v]
    }

    /// Stable identifier of triangle `t`.
    #[inline]
    pub fn identifier(&self, t: usize) -> usize {
        self.identifiers[t]
    }

    /// Triangles using vertex `v`, in no particular order.
    #[inline]
    pub fn incident_triangles(&self, v: usize) -> &[usize] {
        &self.incident[v]
    }

    /// Triangle across edge `edge` of triangle `t`, `None` on the boundary.
    #[inline]
    pub fn adjacent_triangle(&self, t: usize, edge: usize) -> Option<usize> {
        self.adjacent[t][edge]
    }

    #[inline]
    pub fn is_edge_on_boundary(&self, t: usize, edge: usize) -> bool {
        self.adjacent[t][edge].is_none()
    }

    /// True when at least one edge incident to `v` has a single triangle.
    #[inline]
    pub fn is_vertex_on_boundary(&self, v: usize) -> bool {
        self.boundary_vertex[v]
    }

    /// Directed endpoints `(source, target)` of edge `edge` of triangle `t`.
    #[inline]
    pub fn edge_vertices(&self, t: usize, edge: usize) -> (usize, usize) {
        let tri = self.triangles[t];
        (tri[(edge + 1) % 3], tri[(edge + 2) % 3])
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.adjacent
            .iter()
            .flat_map(|neighbors| neighbors.iter())
            .filter(|n| n.is_none())
            .count()
    }

    /// Axis aligned bounding box of the vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<BBox<Real>> {
        BBox::from_points(&self.vertices)
    }

    /// Reverse the winding of triangle `t`.
    ///
    /// Swaps the second and third vertex, which also swaps the adjacency entries of
    /// edges 1 and 2 and negates the cached face normal.
    pub fn reverse_orientation(&mut self, t: usize) {
        self.triangles[t].swap(1, 2);
        self.adjacent[t].swap(1, 2);
        self.face_normals[t] = -self.face_normals[t];
        for v in self.triangles[t] {
            self.update_vertex_normal(v);
        }
    }

    fn update_vertex_normal(&mut self, v: usize) {
        let sum: Vector3<Real> = self.incident[v]
            .iter()
            .map(|&t| self.face_normals[t])
            .sum();
        self.vertex_normals[v] = sum.try_normalize(tolerance()).unwrap_or_else(Vector3::zeros);
    }
}

/// Unit normal `(b - a) × (c - a)` of a triangle, `None` when the triangle is degenerate.
pub(crate) fn triangle_normal(vertices: &[Point3<Real>], tri: &[usize; 3]) -> Option<Vector3<Real>> {
    let [a, b, c] = *tri;
    if a == b || b == c || c == a {
        return None;
    }
    let (pa, pb, pc) = (vertices[a], vertices[b], vertices[c]);
    let longest = (pb - pa)
        .norm_squared()
        .max((pc - pb).norm_squared())
        .max((pa - pc).norm_squared());
    let cross = (pb - pa).cross(&(pc - pa));
    let area2 = cross.norm();
    if longest <= 0.0 || area2 <= tolerance() * longest {
        return None;
    }
    Some(cross / area2)
}
