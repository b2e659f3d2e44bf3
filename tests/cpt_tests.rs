mod support;

use approx::assert_relative_eq;
use cptrs::{
    BBox, CptOps, CptParams, Grid, Lattice, ScanConversion, SerialCptOps, SurfaceMesh,
    ValidationError,
    float_types::{Real, TAU},
};
use nalgebra::Point3;
use support::{centered_lattice, lattice_points, right_triangle, transform};

/// Every lattice point within `max_distance` of `mesh` is known and matches the brute force
/// distance, and no point beyond it is written.
fn assert_matches_brute_force(
    mesh: &SurfaceMesh,
    lattice: &Lattice,
    grid: &Grid,
    max_distance: Real,
) {
    for (index, p) in lattice_points(lattice) {
        let expected = mesh.distance_to(&p).unwrap();
        match grid.distance_at(index) {
            Some(d) => {
                assert!(
                    (d.abs() - expected).abs() < 1e-9,
                    "{index:?}: transform {d}, brute force {expected}"
                );
                assert!(d.abs() <= max_distance);
                let closest = grid.closest_point_at(index).unwrap();
                assert!(((p - closest).norm() - expected).abs() < 1e-9);
            },
            None => assert!(
                expected > max_distance - 1e-9,
                "{index:?} at {expected} was not reached"
            ),
        }
    }
}

#[test]
fn single_triangle_height_above_centroid() {
    let mesh = right_triangle();
    let domain = BBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(4.0, 4.0, 2.0));
    let lattice = Lattice::from_spacing(domain, 0.5).unwrap();
    let grid = transform(&mesh, &lattice, &CptParams::new(1.5));

    assert_eq!(lattice.index_to_world([4, 4, 4]), Point3::new(1.0, 1.0, 1.0));
    assert_relative_eq!(grid.distance_at([4, 4, 4]).unwrap(), 1.0);
    assert_eq!(grid.closest_point_at([4, 4, 4]), Some(Point3::new(1.0, 1.0, 0.0)));
    assert_eq!(grid.closest_feature_at([4, 4, 4]), Some(0));

    // below the triangle, the unsigned distance is still positive
    assert_relative_eq!(grid.distance_at([4, 4, 0]).unwrap(), 1.0);
    assert_matches_brute_force(&mesh, &lattice, &grid, 1.5);
}

#[test]
fn unsigned_distances_are_non_negative() {
    let sphere = SurfaceMesh::icosphere(1.0, 1).unwrap();
    let lattice = centered_lattice(1.5, 0.25);
    let grid = transform(&sphere, &lattice, &CptParams::new(0.6));
    assert!(grid.known_count() > 0);
    for (i, &d) in grid.distances().iter().enumerate() {
        if grid.is_known(i) {
            assert!(d >= 0.0, "cell {i} has distance {d}");
        }
    }
    assert_matches_brute_force(&sphere, &lattice, &grid, 0.6);
}

#[test]
fn signed_distance_of_a_sphere() {
    let sphere = SurfaceMesh::icosphere(1.0, 2).unwrap();
    let lattice = centered_lattice(1.5, 0.25);
    let grid = transform(&sphere, &lattice, &CptParams::new(1.1).signed(true));

    let center = grid.distance_at([6, 6, 6]).expect("center within reach");
    assert!(center < -0.98 && center >= -1.0, "center distance {center}");
    let outside = grid.distance_at([11, 6, 6]).expect("(1.25, 0, 0) within reach");
    assert!(outside > 0.2 && outside < 0.3, "outside distance {outside}");

    for (index, p) in lattice_points(&lattice) {
        if let Some(d) = grid.distance_at(index) {
            let inside = p.coords.norm() < 0.95;
            let outside = p.coords.norm() > 1.0;
            assert!(!(inside && d > 0.0), "{p:?} is inside but has distance {d}");
            assert!(!(outside && d < 0.0), "{p:?} is outside but has distance {d}");
        }
    }
}

#[test]
fn cube_center_is_half_a_side_inside() {
    let cube = SurfaceMesh::cube(1.0).unwrap();
    let lattice = centered_lattice(1.0, 0.1);
    let grid = transform(&cube, &lattice, &CptParams::new(0.5).signed(true));

    let center = lattice.nearest_index(&Point3::origin());
    assert_eq!(center, [10, 10, 10]);
    assert_relative_eq!(grid.distance_at(center).unwrap(), -0.5, epsilon = 1e-12);
    let closest = grid.closest_point_at(center).unwrap();
    assert_relative_eq!(closest.coords.norm(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(closest.coords.amax(), 0.5, epsilon = 1e-12);
}

#[test]
fn signed_cube_matches_brute_force() {
    let cube = SurfaceMesh::cube(1.0).unwrap();
    let lattice = centered_lattice(1.0, 0.1);
    let grid = transform(&cube, &lattice, &CptParams::new(0.3).signed(true));
    assert_matches_brute_force(&cube, &lattice, &grid, 0.3);

    for (index, p) in lattice_points(&lattice) {
        if let Some(d) = grid.distance_at(index) {
            let depth = p.coords.amax() - 0.5;
            if depth.abs() > 1e-9 {
                assert_eq!(d < 0.0, depth < 0.0, "{p:?} has distance {d}");
            }
        }
    }
}

#[test]
fn strategies_agree() {
    let cases = [
        (SurfaceMesh::cube(1.0).unwrap(), true),
        (SurfaceMesh::icosphere(0.8, 1).unwrap(), false),
        (SurfaceMesh::icosphere(0.8, 1).unwrap(), true),
        (SurfaceMesh::disk(0.9, 7).unwrap(), true),
        (SurfaceMesh::disk(0.9, 7).unwrap(), false),
    ];
    let lattice = centered_lattice(1.2, 0.15);
    for (mesh, signed) in &cases {
        let mut results = Vec::new();
        for strategy in ScanConversion::ALL {
            let mut grids = vec![Grid::covering(&lattice)];
            let params = CptParams::new(0.45).signed(*signed).strategy(strategy);
            let stats = SerialCptOps::new()
                .closest_point_transform(mesh, &lattice, &mut grids, &params)
                .unwrap();
            assert!(stats.distances_computed <= stats.scan_converted);
            results.push((stats, grids.pop().unwrap()));
        }
        let (polyhedron_stats, reference) = &results[0];
        assert!(reference.known_count() > 0);
        for (_, grid) in &results[1..] {
            assert_eq!(grid.distances(), reference.distances(), "signed = {signed}");
            assert_eq!(grid.closest_points(), reference.closest_points());
        }
        // rows of the polyhedron never leave its bounding box
        assert!(polyhedron_stats.scan_converted <= results[1].0.scan_converted);
    }
}

/// Icosphere with the north pole pushed inward and the south pole pulled out, so that it
/// has concave edges around the dent and a spike below.
fn dented_spiked_sphere() -> SurfaceMesh {
    let sphere = SurfaceMesh::icosphere(1.0, 2).unwrap();
    let mut vertices = sphere.vertices().to_vec();
    let by_height = |a: &usize, b: &usize| vertices[*a].z.total_cmp(&vertices[*b].z);
    let top = (0..vertices.len()).max_by(by_height).unwrap();
    let bottom = (0..vertices.len()).min_by(by_height).unwrap();
    vertices[top].z = 0.55;
    vertices[bottom].z = -1.6;
    SurfaceMesh::build(vertices, sphere.triangles().to_vec()).unwrap()
}

/// Generalized winding number of a closed mesh around `p`, one inside and zero outside.
fn winding_number(mesh: &SurfaceMesh, p: &Point3<Real>) -> Real {
    let solid_angle: Real = (0..mesh.triangle_count())
        .map(|t| {
            let [a, b, c] = mesh.triangle_points(t).map(|q| q - p);
            let (la, lb, lc) = (a.norm(), b.norm(), c.norm());
            let numerator = a.dot(&b.cross(&c));
            let denominator = la * lb * lc + a.dot(&b) * lc + b.dot(&c) * la + c.dot(&a) * lb;
            2.0 * numerator.atan2(denominator)
        })
        .sum();
    solid_angle / (2.0 * TAU)
}

#[test]
fn signed_transform_of_a_non_convex_mesh() {
    let mesh = dented_spiked_sphere();
    let concave_edges = (0..mesh.triangle_count())
        .flat_map(|t| (0..3).map(move |e| (t, e)))
        .filter(|&(t, e)| mesh.edge_dihedral(t, e).is_some_and(|d| d < -1e-9))
        .count();
    assert!(concave_edges > 0, "the dent has concave edges");

    let domain = BBox::new(Point3::new(-1.2, -1.2, -2.0), Point3::new(1.2, 1.2, 1.4));
    let lattice = Lattice::from_spacing(domain, 0.1).unwrap();
    let max_distance = 0.4;

    let grids: Vec<Grid> = ScanConversion::ALL
        .iter()
        .map(|&strategy| {
            let params = CptParams::new(max_distance).signed(true).strategy(strategy);
            transform(&mesh, &lattice, &params)
        })
        .collect();
    let reference = &grids[0];
    assert_matches_brute_force(&mesh, &lattice, reference, max_distance);
    for grid in &grids[1..] {
        assert_eq!(grid.distances(), reference.distances());
        assert_eq!(grid.closest_points(), reference.closest_points());
    }

    let mut inside = 0;
    for (index, p) in lattice_points(&lattice) {
        let Some(d) = reference.distance_at(index) else {
            continue;
        };
        if d.abs() < 1e-6 {
            continue;
        }
        let winding = winding_number(&mesh, &p);
        assert!(
            (winding - 1.0).abs() < 1e-6 || winding.abs() < 1e-6,
            "{p:?} has winding number {winding}"
        );
        assert_eq!(d < 0.0, winding > 0.5, "{p:?} has distance {d}");
        inside += usize::from(d < 0.0);
    }
    assert!(inside > 0);
}

#[test]
fn open_boundary_only_contributes_unsigned() {
    let disk = SurfaceMesh::disk(1.0, 8).unwrap();
    let lattice = centered_lattice(1.5, 0.25);
    let signed = transform(&disk, &lattice, &CptParams::new(0.5).signed(true));
    let unsigned = transform(&disk, &lattice, &CptParams::new(0.5));

    // (1.25, 0, 0) is nearest to the rim vertex (1, 0, 0)
    assert_eq!(signed.distance_at([11, 6, 6]), None);
    assert_relative_eq!(unsigned.distance_at([11, 6, 6]).unwrap(), 0.25, epsilon = 1e-12);

    assert_relative_eq!(signed.distance_at([6, 6, 7]).unwrap(), 0.25);
    assert_relative_eq!(signed.distance_at([6, 6, 5]).unwrap(), -0.25);

    // only the faces write in the signed pass
    for (index, p) in lattice_points(&lattice) {
        if let Some(d) = signed.distance_at(index) {
            assert!((d.abs() - p.z.abs()).abs() < 1e-12, "{p:?} has distance {d}");
        }
    }
    assert!(unsigned.known_count() > signed.known_count());
    assert_matches_brute_force(&disk, &lattice, &unsigned, 0.5);
}

#[test]
fn rerunning_never_moves_cells_away() {
    let sphere = SurfaceMesh::icosphere(1.0, 1).unwrap();
    let lattice = centered_lattice(1.5, 0.25);
    let params = CptParams::new(0.5).signed(true);

    let mut grids = vec![Grid::covering(&lattice)];
    sphere.closest_point_transform(&lattice, &mut grids, &params).unwrap();
    let first = grids[0].clone();
    sphere.closest_point_transform(&lattice, &mut grids, &params).unwrap();
    assert_eq!(grids[0], first, "same parameters leave the grid unchanged");

    let mut grids = vec![Grid::covering(&lattice)];
    sphere
        .closest_point_transform(&lattice, &mut grids, &CptParams::new(0.2).signed(true))
        .unwrap();
    let near = grids[0].clone();
    sphere.closest_point_transform(&lattice, &mut grids, &params).unwrap();
    for i in 0..near.len() {
        if near.is_known(i) {
            assert!(grids[0].distances()[i].abs() <= near.distances()[i].abs());
        }
    }
    assert!(grids[0].known_count() >= near.known_count());
}

#[test]
fn tiled_grids_match_a_single_grid() {
    let cube = SurfaceMesh::cube(1.2).unwrap();
    let lattice = centered_lattice(1.0, 0.1);
    let params = CptParams::new(0.35).signed(true);
    let whole = transform(&cube, &lattice, &params);

    let mut tiles = Grid::tiles(&lattice, [3, 2, 2]);
    cube.closest_point_transform(&lattice, &mut tiles, &params).unwrap();
    for (index, _) in lattice_points(&lattice) {
        let tiled = tiles.iter().find_map(|g| g.local_index(index).map(|_| g)).unwrap();
        assert_eq!(tiled.distance_at(index), whole.distance_at(index), "{index:?}");
        assert_eq!(tiled.closest_point_at(index), whole.closest_point_at(index));
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_serial() {
    use cptrs::ParallelCptOps;

    let sphere = SurfaceMesh::icosphere(1.0, 2).unwrap();
    let lattice = centered_lattice(1.5, 0.1);
    let params = CptParams::new(0.3).signed(true);

    let mut serial = Grid::tiles(&lattice, [2, 2, 2]);
    let serial_stats = SerialCptOps::new()
        .closest_point_transform(&sphere, &lattice, &mut serial, &params)
        .unwrap();
    let mut parallel = Grid::tiles(&lattice, [2, 2, 2]);
    ParallelCptOps::new()
        .closest_point_transform(&sphere, &lattice, &mut parallel, &params)
        .unwrap();
    assert_eq!(serial, parallel);
    assert!(serial_stats.distances_computed > 0);
}

#[test]
fn partial_grid_is_written_only_inside() {
    let cube = SurfaceMesh::cube(1.0).unwrap();
    let lattice = centered_lattice(1.0, 0.1);
    let mut grids = vec![Grid::new([12, 0, 0], [9, 21, 21])];
    cube.closest_point_transform(&lattice, &mut grids, &CptParams::new(0.3).signed(true))
        .unwrap();
    let grid = &grids[0];
    assert_eq!(grid.distance_at([5, 10, 10]), None, "not part of the grid");
    assert_relative_eq!(grid.distance_at([15, 10, 10]).unwrap(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(grid.distance_at([13, 10, 10]).unwrap(), -0.2, epsilon = 1e-12);
}

#[test]
fn feature_identifiers_are_written() {
    let cube = SurfaceMesh::cube(1.0)
        .unwrap()
        .with_triangle_identifiers((100..112).collect())
        .unwrap();
    let lattice = centered_lattice(1.0, 0.2);
    let grid = transform(&cube, &lattice, &CptParams::new(0.4).signed(true));
    let features: Vec<usize> = grid.closest_features().iter().flatten().copied().collect();
    assert_eq!(features.len(), grid.known_count());
    assert!(features.iter().all(|id| (100..112).contains(id)));
}

#[test]
fn invalid_runs_are_rejected() {
    let cube = SurfaceMesh::cube(1.0).unwrap();
    let lattice = centered_lattice(1.0, 0.5);
    let params = CptParams::new(0.5);

    let mut none: Vec<Grid> = Vec::new();
    assert_eq!(
        cube.closest_point_transform(&lattice, &mut none, &params),
        Err(ValidationError::EmptyGridSet)
    );

    let mut grids = vec![Grid::covering(&lattice)];
    assert_eq!(
        cube.closest_point_transform(&lattice, &mut grids, &CptParams::new(-1.0)),
        Err(ValidationError::InvalidMaxDistance(-1.0))
    );

    let mut grids = vec![Grid::covering(&lattice), Grid::new([3, 0, 0], [3, 1, 1])];
    assert_eq!(
        cube.closest_point_transform(&lattice, &mut grids, &params),
        Err(ValidationError::GridOutsideLattice(1))
    );
    assert_eq!(grids[0].known_count(), 0, "nothing is written before validation passes");
}
