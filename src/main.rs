// main.rs
//
// Runs the closest point transform of a unit cube with each scan conversion strategy and
// prints the work counters and a few sampled distances.

use cptrs::{BBox, CptParams, Grid, Lattice, ScanConversion, SurfaceMesh};
use nalgebra::Point3;

fn main() -> Result<(), cptrs::ValidationError> {
    let cube = SurfaceMesh::cube(1.0)?;
    let domain = BBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    let lattice = Lattice::from_spacing(domain, 0.1)?;
    let center = lattice.nearest_index(&Point3::origin());
    let corner = lattice.nearest_index(&Point3::new(0.8, 0.8, 0.8));

    println!(
        "cube: {} vertices, {} triangles; lattice {:?}",
        cube.vertex_count(),
        cube.triangle_count(),
        lattice.extents()
    );

    for strategy in ScanConversion::ALL {
        let mut grids = Grid::tiles(&lattice, [2, 2, 1]);
        let params = CptParams::new(0.5).signed(true).strategy(strategy);
        let stats = cube.closest_point_transform(&lattice, &mut grids, &params)?;
        let known: usize = grids.iter().map(Grid::known_count).sum();

        println!(
            "{:?}: {} scan converted, {} distances computed, {} of {} cells known",
            strategy,
            stats.scan_converted,
            stats.distances_computed,
            known,
            lattice.point_count()
        );
        for (name, index) in [("center", center), ("corner", corner)] {
            let distance = grids.iter().find_map(|g| g.distance_at(index));
            let closest = grids.iter().find_map(|g| g.closest_point_at(index));
            println!("  {name}: distance {:?}, closest point {:?}", distance, closest);
        }
    }

    Ok(())
}
