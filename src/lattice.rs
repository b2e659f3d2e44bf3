//! Uniform structured lattice: the mapping between world coordinates and integer
//! multi-indices.

use crate::bbox::{BBox, IndexBox};
use crate::errors::ValidationError;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Lattice point `[i, j, k]` sits at `domain.lower + (i, j, k) ⊙ spacing`; the first and
/// last point along each axis sit on the domain faces.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    extents: [usize; 3],
    domain: BBox<Real>,
    spacing: Vector3<Real>,
}

impl Lattice {
    /// Lattice with `extents[a]` points along axis `a` spanning `domain`.
    pub fn new(extents: [usize; 3], domain: BBox<Real>) -> Result<Self, ValidationError> {
        if extents.contains(&0) {
            return Err(ValidationError::InvalidLattice(format!(
                "extents {:?} must be positive",
                extents
            )));
        }
        if domain.is_empty()
            || !domain
                .lower
                .coords
                .iter()
                .chain(domain.upper.coords.iter())
                .all(|c| c.is_finite())
        {
            return Err(ValidationError::InvalidLattice(format!(
                "domain {:?} .. {:?} is not a finite box",
                domain.lower, domain.upper
            )));
        }

        let mut spacing = Vector3::zeros();
        for a in 0..3 {
            let length = domain.upper[a] - domain.lower[a];
            spacing[a] = if extents[a] > 1 {
                length / (extents[a] - 1) as Real
            } else if length > 0.0 {
                length
            } else {
                1.0
            };
            if spacing[a] <= 0.0 {
                return Err(ValidationError::InvalidLattice(format!(
                    "axis {} has {} points but zero length",
                    a, extents[a]
                )));
            }
        }

        Ok(Lattice {
            extents,
            domain,
            spacing,
        })
    }

    /// Lattice covering `domain` with the given point spacing on every axis. The upper
    /// corner is moved up, if needed, to land on a lattice point.
    pub fn from_spacing(domain: BBox<Real>, spacing: Real) -> Result<Self, ValidationError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(ValidationError::InvalidLattice(format!(
                "spacing {} must be positive and finite",
                spacing
            )));
        }
        let mut extents = [1; 3];
        let mut upper = domain.lower;
        for a in 0..3 {
            let steps = (domain.upper[a] - domain.lower[a]) / spacing;
            let nearest = steps.round();
            let steps = if (steps - nearest).abs() <= 1e-9 * nearest.max(1.0) {
                nearest
            } else {
                steps.ceil()
            };
            let steps = steps.max(0.0);
            extents[a] = steps as usize + 1;
            upper[a] = domain.lower[a] + steps * spacing;
        }
        let mut lattice = Self::new(extents, BBox::new(domain.lower, upper))?;
        lattice.spacing = Vector3::repeat(spacing);
        Ok(lattice)
    }

    #[inline]
    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    #[inline]
    pub fn domain(&self) -> &BBox<Real> {
        &self.domain
    }

    #[inline]
    pub fn spacing(&self) -> Vector3<Real> {
        self.spacing
    }

    /// Total number of lattice points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.extents.iter().product()
    }

    /// World position of a multi-index. Indices outside the lattice extrapolate.
    #[inline]
    pub fn index_to_world(&self, index: [i64; 3]) -> Point3<Real> {
        Point3::new(
            self.domain.lower.x + index[0] as Real * self.spacing.x,
            self.domain.lower.y + index[1] as Real * self.spacing.y,
            self.domain.lower.z + index[2] as Real * self.spacing.z,
        )
    }

    /// Continuous index coordinates of a world point.
    #[inline]
    pub fn world_to_index(&self, p: &Point3<Real>) -> Point3<Real> {
        Point3::from((p - self.domain.lower).component_div(&self.spacing))
    }

    /// Multi-index of the lattice point nearest to `p`, not clipped to the lattice.
    pub fn nearest_index(&self, p: &Point3<Real>) -> [i64; 3] {
        let c = self.world_to_index(p);
        [c.x.round() as i64, c.y.round() as i64, c.z.round() as i64]
    }

    /// Inclusive range of the multi-indices whose points lie in `bbox`, not clipped.
    pub fn index_box(&self, bbox: &BBox<Real>) -> IndexBox {
        let lo = self.world_to_index(&bbox.lower);
        let hi = self.world_to_index(&bbox.upper);
        IndexBox::new(
            Point3::new(lo.x.ceil() as i64, lo.y.ceil() as i64, lo.z.ceil() as i64),
            Point3::new(hi.x.floor() as i64, hi.y.floor() as i64, hi.z.floor() as i64),
        )
    }

    /// Every multi-index of the lattice.
    pub fn domain_index_box(&self) -> IndexBox {
        IndexBox::new(
            Point3::new(0, 0, 0),
            Point3::new(
                self.extents[0] as i64 - 1,
                self.extents[1] as i64 - 1,
                self.extents[2] as i64 - 1,
            ),
        )
    }

    /// Restrict an index range to the lattice. The result may be empty.
    #[inline]
    pub fn clip_index_box_to_domain(&self, index_box: &IndexBox) -> IndexBox {
        index_box.intersection(&self.domain_index_box())
    }

    /// World box spanned by the points of an index range.
    pub fn world_box(&self, index_box: &IndexBox) -> BBox<Real> {
        BBox::new(
            self.index_to_world([index_box.lower.x, index_box.lower.y, index_box.lower.z]),
            self.index_to_world([index_box.upper.x, index_box.upper.y, index_box.upper.z]),
        )
    }

    #[inline]
    pub fn contains_index(&self, index: [i64; 3]) -> bool {
        self.domain_index_box().contains(&Point3::from(index))
    }
}
