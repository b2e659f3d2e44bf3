//! Single threaded closest point transform.

use super::params::{CptParams, CptStats};
use super::traits::CptOps;
use super::validate_run;
use crate::bbox::{BBox, IndexBox};
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::grid::Grid;
use crate::lattice::Lattice;
use crate::mesh::SurfaceMesh;
use crate::region::{CharacteristicRegion, EdgeRegion, FaceRegion, VertexRegion};
use crate::scan::scan_convert;
use nalgebra::Point3;

/// Serial implementation of `CptOps`.
pub struct SerialCptOps;

impl SerialCptOps {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SerialCptOps {
    fn default() -> Self {
        Self::new()
    }
}

impl CptOps for SerialCptOps {
    fn closest_point_transform(
        &self,
        mesh: &SurfaceMesh,
        lattice: &Lattice,
        grids: &mut [Grid],
        params: &CptParams,
    ) -> Result<CptStats, ValidationError> {
        validate_run(mesh, lattice, grids, params)?;
        let stats = transform_grids(mesh, lattice, grids, params);
        log::info!(
            "closest point transform: {} grids, {} scan converted, {} distances computed",
            grids.len(),
            stats.scan_converted,
            stats.distances_computed
        );
        Ok(stats)
    }
}

/// Grids with their lattice index ranges and world boxes, fixed for one run.
struct GridSet<'a> {
    grids: &'a mut [Grid],
    index_boxes: Vec<IndexBox>,
    world_boxes: Vec<BBox<Real>>,
}

/// Reusable buffers for one region.
#[derive(Default)]
struct Scratch {
    overlapping: Vec<usize>,
    candidates: Vec<[i64; 3]>,
}

/// Run every face, edge and vertex of `mesh` against `grids`. Inputs are assumed valid.
pub(crate) fn transform_grids(
    mesh: &SurfaceMesh,
    lattice: &Lattice,
    grids: &mut [Grid],
    params: &CptParams,
) -> CptStats {
    let index_boxes: Vec<IndexBox> = grids.iter().map(Grid::index_box).collect();
    let world_boxes = index_boxes.iter().map(|b| lattice.world_box(b)).collect();
    let mut set = GridSet {
        grids,
        index_boxes,
        world_boxes,
    };
    let mut scratch = Scratch::default();
    let mut stats = CptStats::default();
    let signed = params.signed;

    for t in 0..mesh.triangle_count() {
        let region = FaceRegion::new(mesh, t, signed);
        stats += process_region(&region, lattice, &mut set, params, &mut scratch);
    }

    let mut edges = 0;
    for t in 0..mesh.triangle_count() {
        for edge in 0..3 {
            // interior edges are visited from the lower numbered triangle only
            if mesh.adjacent_triangle(t, edge).is_some_and(|n| n < t) {
                continue;
            }
            if let Some(region) = EdgeRegion::new(mesh, t, edge, signed) {
                edges += 1;
                stats += process_region(&region, lattice, &mut set, params, &mut scratch);
            }
        }
    }

    let mut vertex_regions = 0;
    for v in 0..mesh.vertex_count() {
        for region in VertexRegion::regions(mesh, v, signed) {
            vertex_regions += 1;
            stats += process_region(&region, lattice, &mut set, params, &mut scratch);
        }
    }

    log::debug!(
        "processed {} faces, {} edges, {} vertex regions",
        mesh.triangle_count(),
        edges,
        vertex_regions
    );
    stats
}

fn process_region<R: CharacteristicRegion>(
    region: &R,
    lattice: &Lattice,
    set: &mut GridSet<'_>,
    params: &CptParams,
    scratch: &mut Scratch,
) -> CptStats {
    let mut stats = CptStats::default();
    let feature_box = region.feature_bounding_box(params.max_distance);

    scratch.overlapping.clear();
    scratch.overlapping.extend(
        set.world_boxes
            .iter()
            .enumerate()
            .filter(|&(g, world)| !set.grids[g].is_empty() && world.overlaps(&feature_box))
            .map(|(g, _)| g),
    );
    let Some(clip) = scratch
        .overlapping
        .iter()
        .map(|&g| set.index_boxes[g])
        .reduce(|a, b| a.merged(&b))
    else {
        return stats;
    };
    let clip = lattice.clip_index_box_to_domain(&clip);

    scratch.candidates.clear();
    stats.scan_converted = scan_convert(
        params.strategy,
        region,
        params.max_distance,
        lattice,
        &clip,
        &mut scratch.candidates,
    );
    let mut candidates = scratch.candidates.iter().map(|&i| Point3::from(i));
    let Some(first) = candidates.next() else {
        return stats;
    };
    let mut candidate_box = IndexBox::new(first, first);
    candidates.for_each(|p| candidate_box.add_point(&p));
    scratch
        .overlapping
        .retain(|&g| set.index_boxes[g].overlaps(&candidate_box));

    let id = region.feature_id();
    for &index in &scratch.candidates {
        let point = Point3::from(index);
        if !scratch
            .overlapping
            .iter()
            .any(|&g| set.index_boxes[g].contains(&point))
        {
            continue;
        }
        stats.distances_computed += 1;
        let Some((distance, closest)) =
            region.distance_and_closest_point(&lattice.index_to_world(index))
        else {
            continue;
        };
        if distance.abs() > params.max_distance {
            continue;
        }
        for &g in &scratch.overlapping {
            let grid = &mut set.grids[g];
            if let Some(i) = grid.local_index(index) {
                grid.try_update(i, distance, closest, id);
            }
        }
    }
    stats
}
