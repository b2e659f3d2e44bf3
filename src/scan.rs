//! Scan conversion: the lattice points a characteristic region may claim.
//!
//! Every strategy returns a superset of the lattice points where the region's domain test
//! succeeds within the maximum distance, so they differ only in how much work the exact
//! evaluation does afterwards.

use crate::bbox::IndexBox;
use crate::float_types::Real;
use crate::lattice::Lattice;
use crate::region::CharacteristicRegion;

/// How a characteristic region is turned into candidate lattice points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanConversion {
    /// Rows of the region's clipped polyhedron.
    #[default]
    Polyhedron,
    /// Every point in the bounding box of the polyhedron's corners.
    BoundingBox,
    /// Every point in the bare feature's bounding box grown by the maximum distance. No
    /// polyhedron is built.
    BruteForce,
}

impl ScanConversion {
    pub const ALL: [ScanConversion; 3] = [
        ScanConversion::Polyhedron,
        ScanConversion::BoundingBox,
        ScanConversion::BruteForce,
    ];
}

/// Append to `out` the multi-indices inside `clip` that `region` may claim within
/// `max_distance`, returning how many were appended.
pub fn scan_convert<R: CharacteristicRegion + ?Sized>(
    strategy: ScanConversion,
    region: &R,
    max_distance: Real,
    lattice: &Lattice,
    clip: &IndexBox,
    out: &mut Vec<[i64; 3]>,
) -> usize {
    match strategy {
        ScanConversion::Polyhedron => {
            scan_convert_polyhedron(region, max_distance, lattice, clip, out)
        },
        ScanConversion::BoundingBox => match region.characteristic_polyhedron(max_distance) {
            Some(polyhedron) => {
                let bbox = lattice.index_box(&polyhedron.bounding_box());
                scan_convert_index_box(&bbox.intersection(clip), out)
            },
            None => 0,
        },
        ScanConversion::BruteForce => {
            let bbox = lattice.index_box(&region.feature_bounding_box(max_distance));
            scan_convert_index_box(&bbox.intersection(clip), out)
        },
    }
}

/// Every multi-index of `index_box`.
pub fn scan_convert_index_box(index_box: &IndexBox, out: &mut Vec<[i64; 3]>) -> usize {
    let before = out.len();
    out.reserve(index_box.index_count());
    index_box.for_each_index(|index| out.push(index));
    out.len() - before
}

/// Lattice points inside the region's polyhedron, one `x` run per `(y, z)` row.
pub fn scan_convert_polyhedron<R: CharacteristicRegion + ?Sized>(
    region: &R,
    max_distance: Real,
    lattice: &Lattice,
    clip: &IndexBox,
    out: &mut Vec<[i64; 3]>,
) -> usize {
    let Some(polyhedron) = region.characteristic_polyhedron(max_distance) else {
        return 0;
    };
    let rows = lattice
        .index_box(&polyhedron.bounding_box())
        .intersection(clip);
    if rows.is_empty() {
        return 0;
    }

    let origin = lattice.domain().lower;
    let spacing = lattice.spacing();
    let before = out.len();
    for k in rows.lower.z..=rows.upper.z {
        for j in rows.lower.y..=rows.upper.y {
            let p = lattice.index_to_world([0, j, k]);
            let Some((lo, hi)) = polyhedron.x_interval(p.y, p.z) else {
                continue;
            };
            let first = ((lo - origin.x) / spacing.x).ceil() as i64;
            let last = ((hi - origin.x) / spacing.x).floor() as i64;
            for i in first.max(rows.lower.x)..=last.min(rows.upper.x) {
                out.push([i, j, k]);
            }
        }
    }
    out.len() - before
}

