//! Adjacency construction and orientation analysis for `SurfaceMesh`.

use super::SurfaceMesh;
use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Match undirected vertex pairs across triangles.
///
/// Returns, per triangle, the neighbor across each edge (edge `i` is opposite vertex `i`).
/// An edge used by more than two triangles is reported as a `NonManifoldEdge`.
pub(crate) fn build_adjacency(
    triangles: &[[usize; 3]],
) -> Result<Vec<[Option<usize>; 3]>, ValidationError> {
    let mut edge_map: HashMap<(usize, usize), Vec<(usize, usize)>> =
        HashMap::with_capacity(triangles.len() * 3 / 2);

    for (t, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            let a = tri[(i + 1) % 3];
            let b = tri[(i + 2) % 3];
            // Canonical edge representation (smaller index first)
            let key = if a < b { (a, b) } else { (b, a) };
            edge_map.entry(key).or_default().push((t, i));
        }
    }

    let mut adjacent = vec![[None; 3]; triangles.len()];
    for (&(a, b), uses) in &edge_map {
        match uses.as_slice() {
            [_] => {},
            [(t0, i0), (t1, i1)] => {
                adjacent[*t0][*i0] = Some(*t1);
                adjacent[*t1][*i1] = Some(*t0);
            },
            _ => {
                return Err(ValidationError::NonManifoldEdge {
                    a,
                    b,
                    count: uses.len(),
                });
            },
        }
    }

    Ok(adjacent)
}

/// Vertex to incident triangle lists.
pub(crate) fn build_incidence(triangles: &[[usize; 3]], vertex_count: usize) -> Vec<Vec<usize>> {
    let mut incident = vec![Vec::new(); vertex_count];
    for (t, tri) in triangles.iter().enumerate() {
        for &v in tri {
            incident[v].push(t);
        }
    }
    incident
}

impl SurfaceMesh {
    /// Distinct vertices sharing a triangle with `v`, sorted by index.
    pub fn vertex_neighbors(&self, v: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self.incident[v]
            .iter()
            .flat_map(|&t| self.triangles[t])
            .filter(|&w| w != v)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Signed dihedral measure `e · (n × n')` of the interior edge `edge` of triangle `t`,
    /// where `e` is the unit edge direction in `t` and `n'` the neighbor's normal.
    ///
    /// Positive for a convex edge, negative for a concave one, near zero for a flat one.
    /// `None` on the boundary or for a zero-length edge.
    pub fn edge_dihedral(&self, t: usize, edge: usize) -> Option<Real> {
        let neighbor = self.adjacent[t][edge]?;
        let (a, b) = self.edge_vertices(t, edge);
        let direction = (self.vertices[b] - self.vertices[a]).try_normalize(tolerance())?;
        Some(
            direction.dot(
                &self.face_normals[t].cross(&self.face_normals[neighbor]),
            ),
        )
    }

    /// Whether triangle `neighbor` traverses the shared edge `edge` of `t` in the
    /// opposite direction, as a consistently wound surface requires.
    fn edge_winding_agrees(&self, t: usize, edge: usize, neighbor: usize) -> bool {
        let (a, b) = self.edge_vertices(t, edge);
        let tri = self.triangles[neighbor];
        (0..3).any(|j| tri[j] == b && tri[(j + 1) % 3] == a)
    }

    /// True when every interior edge is traversed in opposite directions by its two triangles.
    pub fn is_consistently_oriented(&self) -> bool {
        (0..self.triangles.len()).all(|t| {
            (0..3).all(|i| match self.adjacent[t][i] {
                Some(neighbor) => self.edge_winding_agrees(t, i, neighbor),
                None => true,
            })
        })
    }

    /// Signed volume enclosed by the triangles in `component` (all triangles if `None`).
    fn signed_volume_of(&self, component: Option<&[usize]>) -> Real {
        let volume_of = |t: usize| {
            let [a, b, c] = self.triangle_points(t);
            a.coords.dot(&b.coords.cross(&c.coords))
        };
        let sum: Real = match component {
            Some(triangles) => triangles.iter().map(|&t| volume_of(t)).sum(),
            None => (0..self.triangles.len()).map(volume_of).sum(),
        };
        sum / 6.0
    }

    /// Signed enclosed volume, positive for a closed surface with outward normals.
    pub fn signed_volume(&self) -> Real {
        self.signed_volume_of(None)
    }

    /// Make the winding consistent across each connected component by breadth-first
    /// propagation from its first triangle, then turn closed components outward.
    ///
    /// Returns the number of orientation reversals performed.
    pub fn orient_consistently(&mut self) -> usize {
        let mut visited = vec![false; self.triangles.len()];
        let mut flipped = 0;
        let mut queue = VecDeque::new();

        for seed in 0..self.triangles.len() {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            queue.push_back(seed);
            let mut component = vec![seed];
            let mut closed = true;

            while let Some(t) = queue.pop_front() {
                for i in 0..3 {
                    let Some(neighbor) = self.adjacent[t][i] else {
                        closed = false;
                        continue;
                    };
                    if visited[neighbor] {
                        continue;
                    }
                    if !self.edge_winding_agrees(t, i, neighbor) {
                        self.reverse_orientation(neighbor);
                        flipped += 1;
                    }
                    visited[neighbor] = true;
                    component.push(neighbor);
                    queue.push_back(neighbor);
                }
            }

            if closed && self.signed_volume_of(Some(&component)) < 0.0 {
                for &t in &component {
                    self.reverse_orientation(t);
                }
                flipped += component.len();
            }
        }

        if flipped > 0 {
            log::debug!("reoriented {} triangles", flipped);
        }
        flipped
    }
}
