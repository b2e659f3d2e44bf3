//! Run parameters and diagnostics of a closest point transform.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::scan::ScanConversion;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Parameters of one closest point transform run.
///
/// ```
/// use cptrs::{CptParams, ScanConversion};
///
/// let params = CptParams::new(0.5)
///     .signed(true)
///     .strategy(ScanConversion::BoundingBox);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CptParams {
    /// Cells farther than this from the surface are left untouched.
    pub max_distance: Real,
    /// Compute signed distances (negative inside a consistently oriented closed surface).
    pub signed: bool,
    pub strategy: ScanConversion,
}

impl CptParams {
    /// Unsigned run with polyhedron scan conversion.
    pub fn new(max_distance: Real) -> Self {
        CptParams {
            max_distance,
            signed: false,
            strategy: ScanConversion::default(),
        }
    }

    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn strategy(mut self, strategy: ScanConversion) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_distance.is_finite() && self.max_distance > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidMaxDistance(self.max_distance))
        }
    }
}

/// Work counters of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CptStats {
    /// Lattice points produced by scan conversion, over all regions.
    pub scan_converted: usize,
    /// Exact distance evaluations.
    pub distances_computed: usize,
}

impl Add for CptStats {
    type Output = CptStats;

    fn add(self, other: CptStats) -> CptStats {
        CptStats {
            scan_converted: self.scan_converted + other.scan_converted,
            distances_computed: self.distances_computed + other.distances_computed,
        }
    }
}

impl AddAssign for CptStats {
    fn add_assign(&mut self, other: CptStats) {
        *self = *self + other;
    }
}

impl Sum for CptStats {
    fn sum<I: Iterator<Item = CptStats>>(iter: I) -> CptStats {
        iter.fold(CptStats::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite_max_distance() {
        for bad in [0.0, -1.0, Real::NAN, Real::INFINITY] {
            assert!(CptParams::new(bad).validate().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn stats_sum() {
        let total: CptStats = [
            CptStats { scan_converted: 3, distances_computed: 2 },
            CptStats { scan_converted: 4, distances_computed: 1 },
        ]
        .into_iter()
        .sum();
        assert_eq!(total, CptStats { scan_converted: 7, distances_computed: 3 });
    }
}
