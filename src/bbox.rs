//! Axis aligned bounding boxes over world coordinates (`BBox<Real>`) and
//! lattice indices (`IndexBox`).

use crate::float_types::Real;
use crate::region::ConvexPolyhedron;
use nalgebra::{Point3, Scalar, Vector3};

/// Inclusive box of lattice multi-indices.
pub type IndexBox = BBox<i64>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T: Scalar> {
    pub lower: Point3<T>,
    pub upper: Point3<T>,
}

#[inline]
fn min_of<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

#[inline]
fn max_of<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

impl<T: Scalar + PartialOrd + Copy> BBox<T> {
    #[inline]
    pub const fn new(lower: Point3<T>, upper: Point3<T>) -> Self {
        Self { lower, upper }
    }

    /// Smallest box holding every point, `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<T>>,
        T: 'a,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            bbox.add_point(p);
        }
        Some(bbox)
    }

    /// Grow the box so that it holds `p`.
    pub fn add_point(&mut self, p: &Point3<T>) {
        for i in 0..3 {
            self.lower[i] = min_of(self.lower[i], p[i]);
            self.upper[i] = max_of(self.upper[i], p[i]);
        }
    }

    /// A box is empty when its lower corner exceeds its upper corner on some axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.lower[i] > self.upper[i])
    }

    /// Closed containment test.
    #[inline]
    pub fn contains(&self, p: &Point3<T>) -> bool {
        (0..3).all(|i| self.lower[i] <= p[i] && p[i] <= self.upper[i])
    }

    /// Whether `other` lies entirely inside `self`.
    #[inline]
    pub fn contains_box(&self, other: &Self) -> bool {
        self.contains(&other.lower) && self.contains(&other.upper)
    }

    /// Closed overlap test.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| self.lower[i] <= other.upper[i] && other.lower[i] <= self.upper[i])
    }

    /// Union of both boxes.
    pub fn merged(&self, other: &Self) -> Self {
        let mut bbox = *self;
        bbox.add_point(&other.lower);
        bbox.add_point(&other.upper);
        bbox
    }

    /// Intersection of both boxes. The result may be empty, see [`BBox::is_empty`].
    pub fn intersection(&self, other: &Self) -> Self {
        let mut bbox = *self;
        for i in 0..3 {
            bbox.lower[i] = max_of(self.lower[i], other.lower[i]);
            bbox.upper[i] = min_of(self.upper[i], other.upper[i]);
        }
        bbox
    }
}

impl BBox<Real> {
    /// Box grown by `amount` on every side.
    pub fn expanded(&self, amount: Real) -> Self {
        let offset = Vector3::repeat(amount);
        Self::new(self.lower - offset, self.upper + offset)
    }

    #[inline]
    pub fn extents(&self) -> Vector3<Real> {
        self.upper - self.lower
    }

    /// Characteristic region containment: every vertex of `region` lies in the box.
    pub fn contains_region(&self, region: &ConvexPolyhedron) -> bool {
        region.vertices().iter().all(|p| self.contains(p))
    }

    /// Whether the bounding box of `region` overlaps this box.
    pub fn overlaps_region(&self, region: &ConvexPolyhedron) -> bool {
        self.overlaps(&region.bounding_box())
    }
}

impl IndexBox {
    /// Number of indices in the inclusive range, zero when empty.
    pub fn index_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (0..3)
            .map(|i| (self.upper[i] - self.lower[i] + 1) as usize)
            .product()
    }

    /// Visit every multi-index, x fastest.
    pub fn for_each_index<F: FnMut([i64; 3])>(&self, mut f: F) {
        if self.is_empty() {
            return;
        }
        for k in self.lower.z..=self.upper.z {
            for j in self.lower.y..=self.upper.y {
                for i in self.lower.x..=self.upper.x {
                    f([i, j, k]);
                }
            }
        }
    }
}
