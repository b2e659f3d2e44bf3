//! Convex polyhedra described as intersections of half-spaces.

use crate::bbox::BBox;
use crate::float_types::{Real, tolerance};
use nalgebra::{Matrix3, Point3, Vector3};

/// The closed half-space `normal · p <= offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSpace {
    pub normal: Vector3<Real>,
    pub offset: Real,
}

impl HalfSpace {
    /// Half-space bounded by the plane through `point`, `normal` pointing out of it.
    #[inline]
    pub fn through(point: &Point3<Real>, normal: Vector3<Real>) -> Self {
        HalfSpace {
            offset: normal.dot(&point.coords),
            normal,
        }
    }

    /// Positive outside, negative inside, in units of `|normal|`.
    #[inline]
    pub fn signed_distance(&self, p: &Point3<Real>) -> Real {
        self.normal.dot(&p.coords) - self.offset
    }

    /// Move the bounding plane outward by `amount` (scaled by `|normal|`).
    #[inline]
    pub fn loosened(&self, amount: Real) -> Self {
        HalfSpace {
            normal: self.normal,
            offset: self.offset + amount * self.normal.norm(),
        }
    }
}

/// The six half-spaces of an axis aligned box.
pub fn box_halfspaces(bbox: &BBox<Real>) -> [HalfSpace; 6] {
    [
        HalfSpace::through(&bbox.lower, -Vector3::x()),
        HalfSpace::through(&bbox.lower, -Vector3::y()),
        HalfSpace::through(&bbox.lower, -Vector3::z()),
        HalfSpace::through(&bbox.upper, Vector3::x()),
        HalfSpace::through(&bbox.upper, Vector3::y()),
        HalfSpace::through(&bbox.upper, Vector3::z()),
    ]
}

/// Bounded convex polyhedron: the half-spaces and the corner points where they meet.
#[derive(Clone, Debug)]
pub struct ConvexPolyhedron {
    planes: Vec<HalfSpace>,
    vertices: Vec<Point3<Real>>,
    bounding_box: BBox<Real>,
}

impl ConvexPolyhedron {
    /// Intersect the half-spaces.
    ///
    /// Corners are found by solving every triple of planes and keeping the solutions
    /// that satisfy all half-spaces. Returns `None` when the intersection has no corner,
    /// i.e. it is empty or unbounded.
    pub fn from_halfspaces(planes: Vec<HalfSpace>) -> Option<Self> {
        let scale = planes
            .iter()
            .map(|h| h.offset.abs())
            .fold(1.0, Real::max);
        let eps = tolerance() * scale;
        let singular = tolerance() * tolerance();

        let mut vertices: Vec<Point3<Real>> = Vec::new();
        let n = planes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let (a, b, c) = (&planes[i], &planes[j], &planes[k]);
                    let m = Matrix3::from_rows(&[
                        a.normal.transpose(),
                        b.normal.transpose(),
                        c.normal.transpose(),
                    ]);
                    if m.determinant().abs() < singular {
                        continue;
                    }
                    let Some(inverse) = m.try_inverse() else {
                        continue;
                    };
                    let p = Point3::from(inverse * Vector3::new(a.offset, b.offset, c.offset));
                    if planes.iter().all(|h| h.signed_distance(&p) <= eps)
                        && !vertices.iter().any(|q| (q - p).norm() <= eps)
                    {
                        vertices.push(p);
                    }
                }
            }
        }

        let bounding_box = BBox::from_points(&vertices)?;
        Some(ConvexPolyhedron {
            planes,
            vertices,
            bounding_box,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    #[inline]
    pub fn bounding_box(&self) -> BBox<Real> {
        self.bounding_box
    }

    /// Closed containment test with slack `eps`.
    pub fn contains(&self, p: &Point3<Real>, eps: Real) -> bool {
        self.planes.iter().all(|h| h.signed_distance(p) <= eps)
    }

    /// The `x` range of the line `(·, y, z)` inside the polyhedron, `None` if the line
    /// misses it.
    pub fn x_interval(&self, y: Real, z: Real) -> Option<(Real, Real)> {
        let mut lo = Real::NEG_INFINITY;
        let mut hi = Real::INFINITY;
        for h in &self.planes {
            let rhs = h.offset - h.normal.y * y - h.normal.z * z;
            let a = h.normal.x;
            if a.abs() <= Real::EPSILON {
                if rhs < 0.0 {
                    return None;
                }
            } else if a > 0.0 {
                hi = hi.min(rhs / a);
            } else {
                lo = lo.max(rhs / a);
            }
        }
        (lo <= hi).then_some((lo, hi))
    }
}
