//! A `Grid` is one contiguous block of lattice points holding the transform's output.

use crate::bbox::IndexBox;
use crate::float_types::{Real, UNKNOWN_DISTANCE};
use crate::lattice::Lattice;
use nalgebra::Point3;
use std::collections::VecDeque;

/// Distance, closest point and closest feature arrays over an index range of a
/// [`Lattice`]. Cells start unknown: distance [`UNKNOWN_DISTANCE`], closest point at
/// `Real::MAX` on every axis and no feature.
///
/// Cells are stored x fastest: local `[x, y, z]` lives at `(z * ny + y) * nx + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    lower: [i64; 3],
    extents: [usize; 3],
    distance: Vec<Real>,
    closest_point: Vec<Point3<Real>>,
    closest_feature: Vec<Option<usize>>,
}

impl Grid {
    /// Grid over the lattice indices `lower .. lower + extents`.
    pub fn new(lower: [usize; 3], extents: [usize; 3]) -> Self {
        let len = extents.iter().product();
        Grid {
            lower: lower.map(|i| i as i64),
            extents,
            distance: vec![UNKNOWN_DISTANCE; len],
            closest_point: vec![Point3::new(Real::MAX, Real::MAX, Real::MAX); len],
            closest_feature: vec![None; len],
        }
    }

    /// Grid over every point of `lattice`.
    pub fn covering(lattice: &Lattice) -> Self {
        Self::new([0; 3], lattice.extents())
    }

    /// Split `lattice` into up to `parts[a]` slabs along each axis, tiling it without
    /// overlap.
    pub fn tiles(lattice: &Lattice, parts: [usize; 3]) -> Vec<Grid> {
        let extents = lattice.extents();
        let ranges: [Vec<(usize, usize)>; 3] = std::array::from_fn(|a| {
            let n = extents[a];
            let p = parts[a].clamp(1, n);
            (0..p)
                .map(|i| (i * n / p, (i + 1) * n / p - i * n / p))
                .collect()
        });
        let mut grids = Vec::new();
        for &(z, nz) in &ranges[2] {
            for &(y, ny) in &ranges[1] {
                for &(x, nx) in &ranges[0] {
                    grids.push(Grid::new([x, y, z], [nx, ny, nz]));
                }
            }
        }
        grids
    }

    #[inline]
    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Inclusive range of lattice indices covered by this grid.
    pub fn index_box(&self) -> IndexBox {
        IndexBox::new(
            Point3::from(self.lower),
            Point3::new(
                self.lower[0] + self.extents[0] as i64 - 1,
                self.lower[1] + self.extents[1] as i64 - 1,
                self.lower[2] + self.extents[2] as i64 - 1,
            ),
        )
    }

    #[inline]
    pub fn linearize(&self, [x, y, z]: [usize; 3]) -> usize {
        (z * self.extents[1] + y) * self.extents[0] + x
    }

    #[inline]
    pub fn delinearize(&self, i: usize) -> [usize; 3] {
        let x = i % self.extents[0];
        let yz = i / self.extents[0];
        let y = yz % self.extents[1];
        let z = yz / self.extents[1];
        [x, y, z]
    }

    /// Cell index of a lattice multi-index, `None` outside this grid.
    pub fn local_index(&self, index: [i64; 3]) -> Option<usize> {
        let mut local = [0; 3];
        for a in 0..3 {
            let offset = index[a] - self.lower[a];
            if offset < 0 || offset >= self.extents[a] as i64 {
                return None;
            }
            local[a] = offset as usize;
        }
        Some(self.linearize(local))
    }

    /// Lattice multi-index of a cell.
    pub fn lattice_index(&self, i: usize) -> [i64; 3] {
        let local = self.delinearize(i);
        std::array::from_fn(|a| self.lower[a] + local[a] as i64)
    }

    #[inline]
    pub fn distances(&self) -> &[Real] {
        &self.distance
    }

    #[inline]
    pub fn closest_points(&self) -> &[Point3<Real>] {
        &self.closest_point
    }

    #[inline]
    pub fn closest_features(&self) -> &[Option<usize>] {
        &self.closest_feature
    }

    /// Distance stored for a lattice multi-index, `None` outside the grid or while unknown.
    pub fn distance_at(&self, index: [i64; 3]) -> Option<Real> {
        let i = self.local_index(index)?;
        self.is_known(i).then(|| self.distance[i])
    }

    /// Closest point stored for a lattice multi-index, `None` outside the grid or while
    /// no feature has claimed the cell.
    pub fn closest_point_at(&self, index: [i64; 3]) -> Option<Point3<Real>> {
        let i = self.local_index(index)?;
        self.closest_feature[i].map(|_| self.closest_point[i])
    }

    /// Closest feature identifier stored for a lattice multi-index.
    pub fn closest_feature_at(&self, index: [i64; 3]) -> Option<usize> {
        let i = self.local_index(index)?;
        self.closest_feature[i]
    }

    #[inline]
    pub fn is_known(&self, i: usize) -> bool {
        self.distance[i] != UNKNOWN_DISTANCE
    }

    pub fn known_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_known(i)).count()
    }

    /// Store the candidate if it is strictly closer than what cell `i` holds.
    /// Returns whether the cell changed.
    #[inline]
    pub fn try_update(
        &mut self,
        i: usize,
        distance: Real,
        closest_point: Point3<Real>,
        feature: usize,
    ) -> bool {
        if distance.abs() < self.distance[i].abs() {
            self.distance[i] = distance;
            self.closest_point[i] = closest_point;
            self.closest_feature[i] = Some(feature);
            true
        } else {
            false
        }
    }

    /// Return every cell to the unknown state.
    pub fn reset(&mut self) {
        self.distance.fill(UNKNOWN_DISTANCE);
        self.closest_point
            .fill(Point3::new(Real::MAX, Real::MAX, Real::MAX));
        self.closest_feature.fill(None);
    }

    /// Give every unknown cell the distance `±far_away`, the sign taken from the known
    /// cells it is connected to through face neighbors (breadth first from all known
    /// cells at once). With no known cell the whole grid becomes `+far_away`.
    ///
    /// The sign is only meaningful when the known band separates inside from outside,
    /// i.e. the transform ran with a maximum distance of at least one lattice spacing.
    pub fn flood_fill(&mut self, far_away: Real) {
        let far_away = far_away.abs();
        let mut queue: VecDeque<usize> = (0..self.len()).filter(|&i| self.is_known(i)).collect();
        if queue.is_empty() {
            self.distance.fill(far_away);
            return;
        }

        while let Some(i) = queue.pop_front() {
            let value = if self.distance[i] < 0.0 { -far_away } else { far_away };
            let [x, y, z] = self.delinearize(i);
            let neighbors = [
                (x > 0).then(|| [x - 1, y, z]),
                (x + 1 < self.extents[0]).then(|| [x + 1, y, z]),
                (y > 0).then(|| [x, y - 1, z]),
                (y + 1 < self.extents[1]).then(|| [x, y + 1, z]),
                (z > 0).then(|| [x, y, z - 1]),
                (z + 1 < self.extents[2]).then(|| [x, y, z + 1]),
            ];
            for local in neighbors.into_iter().flatten() {
                let j = self.linearize(local);
                if !self.is_known(j) {
                    self.distance[j] = value;
                    queue.push_back(j);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linearize_round_trips_through_lattice_indices() {
        let grid = Grid::new([2, 3, 4], [3, 2, 5]);
        let i = grid.local_index([4, 4, 6]).expect("inside the grid");
        assert_eq!(grid.delinearize(i), [2, 1, 2]);
        assert_eq!(grid.lattice_index(i), [4, 4, 6]);
        assert_eq!(grid.local_index([1, 3, 4]), None);
        assert_eq!(grid.local_index([5, 3, 4]), None);
    }

    #[test]
    fn try_update_requires_strict_improvement() {
        let mut grid = Grid::new([0; 3], [1, 1, 1]);
        assert!(grid.try_update(0, -0.5, Point3::origin(), 7));
        assert!(!grid.try_update(0, 0.5, Point3::new(1.0, 0.0, 0.0), 8));
        assert_eq!(grid.closest_features()[0], Some(7));
        assert!(grid.try_update(0, 0.25, Point3::new(1.0, 0.0, 0.0), 9));
        assert_eq!(grid.distances()[0], 0.25);
    }
}
