//! Simple closed and open test surfaces, and a caller owned tessellation cache.

use super::SurfaceMesh;
use crate::errors::ValidationError;
use crate::float_types::{Real, TAU};
use hashbrown::HashMap;
use nalgebra::Point3;

impl SurfaceMesh {
    /// A single triangle `a, b, c` (open surface with three boundary edges).
    pub fn single_triangle(
        a: Point3<Real>,
        b: Point3<Real>,
        c: Point3<Real>,
    ) -> Result<SurfaceMesh, ValidationError> {
        Self::build(vec![a, b, c], vec![[0, 1, 2]])
    }

    /// Axis aligned cube of edge length `side` centered at the origin, 8 vertices and
    /// 12 outward facing triangles.
    pub fn cube(side: Real) -> Result<SurfaceMesh, ValidationError> {
        let h = side * 0.5;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let triangles = vec![
            [0, 3, 2], // -z
            [0, 2, 1],
            [4, 5, 6], // +z
            [4, 6, 7],
            [0, 1, 5], // -y
            [0, 5, 4],
            [3, 7, 6], // +y
            [3, 6, 2],
            [0, 4, 7], // -x
            [0, 7, 3],
            [1, 2, 6], // +x
            [1, 6, 5],
        ];
        Self::build(vertices, triangles)
    }

    /// Flat disk of `segments` triangles in the `z = 0` plane, normals pointing to `+z`.
    /// Every rim edge and rim vertex lies on the boundary.
    pub fn disk(radius: Real, segments: usize) -> Result<SurfaceMesh, ValidationError> {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(segments + 1);
        vertices.push(Point3::origin());
        for i in 0..segments {
            let theta = TAU * i as Real / segments as Real;
            vertices.push(Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0));
        }
        let triangles = (0..segments)
            .map(|i| [0, 1 + i, 1 + (i + 1) % segments])
            .collect();
        Self::build(vertices, triangles)
    }

    /// Sphere of `radius` around the origin built by `subdivisions` rounds of midpoint
    /// subdivision of an icosahedron, vertices projected onto the sphere.
    pub fn icosphere(radius: Real, subdivisions: u32) -> Result<SurfaceMesh, ValidationError> {
        let (points, triangles) = unit_icosphere(subdivisions);
        let vertices = points.into_iter().map(|p| p * radius).collect();
        Self::build(vertices, triangles)
    }

    /// Copy of this mesh with every vertex scaled about the origin by `factor`.
    pub fn scaled(&self, factor: Real) -> Result<SurfaceMesh, ValidationError> {
        let vertices = self.vertices.iter().map(|p| p * factor).collect();
        Self::build(vertices, self.triangles.clone())?
            .with_triangle_identifiers(self.identifiers.clone())
    }
}

fn unit_icosphere(subdivisions: u32) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    // golden ratio
    let phi: Real = (1.0 + (5.0 as Real).sqrt()) * 0.5;
    // normalise so the circum-radius is 1
    let inv_len = (1.0 + phi * phi).sqrt().recip();
    let a = inv_len;
    let b = phi * inv_len;

    let mut points: Vec<Point3<Real>> = [
        [-a, b, 0.0],
        [a, b, 0.0],
        [-a, -b, 0.0],
        [a, -b, 0.0],
        [0.0, -a, b],
        [0.0, a, b],
        [0.0, -a, -b],
        [0.0, a, -b],
        [b, 0.0, -a],
        [b, 0.0, a],
        [-b, 0.0, -a],
        [-b, 0.0, a],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z))
    .collect();

    // 20 faces (counter-clockwise when viewed from outside)
    let mut triangles: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |i: usize, j: usize, points: &mut Vec<Point3<Real>>| -> usize {
            let key = if i < j { (i, j) } else { (j, i) };
            *midpoints.entry(key).or_insert_with(|| {
                let m = nalgebra::center(&points[i], &points[j]);
                points.push(Point3::from(m.coords.normalize()));
                points.len() - 1
            })
        };

        let mut refined = Vec::with_capacity(triangles.len() * 4);
        for &[i, j, k] in &triangles {
            let ij = midpoint(i, j, &mut points);
            let jk = midpoint(j, k, &mut points);
            let ki = midpoint(k, i, &mut points);
            refined.push([i, ij, ki]);
            refined.push([j, jk, ij]);
            refined.push([k, ki, jk]);
            refined.push([ij, jk, ki]);
        }
        triangles = refined;
    }

    (points, triangles)
}

/// Caller owned cache of unit icospheres keyed by subdivision level.
///
/// Nothing is shared between caches; entries live until [`TessellationCache::invalidate`]
/// or [`TessellationCache::clear`] is called.
#[derive(Debug, Default, Clone)]
pub struct TessellationCache {
    spheres: HashMap<u32, SurfaceMesh>,
}

impl TessellationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sphere of `radius` at the given subdivision level, tessellated at most once per level.
    pub fn sphere(
        &mut self,
        radius: Real,
        subdivisions: u32,
    ) -> Result<SurfaceMesh, ValidationError> {
        if !self.spheres.contains_key(&subdivisions) {
            let mesh = SurfaceMesh::icosphere(1.0, subdivisions)?;
            log::debug!(
                "tessellated unit sphere at level {}: {} triangles",
                subdivisions,
                mesh.triangle_count()
            );
            self.spheres.insert(subdivisions, mesh);
        }
        self.spheres[&subdivisions].scaled(radius)
    }

    #[inline]
    pub fn contains(&self, subdivisions: u32) -> bool {
        self.spheres.contains_key(&subdivisions)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Drop the tessellation of one level. Returns whether it was cached.
    pub fn invalidate(&mut self, subdivisions: u32) -> bool {
        self.spheres.remove(&subdivisions).is_some()
    }

    pub fn clear(&mut self) {
        self.spheres.clear();
    }
}
