//! Isosurface extraction from a carved occupancy grid.
//!
//! The grid is read as a scalar field (occupied `1.0`, empty `0.0`) and
//! contoured at [`ISOVALUE`] with marching cubes. The resulting mesh is then
//! rescaled from grid indices into the canonical cube with
//! `v' = v / resolution * 2 - 1`.

mod marching_cubes;
mod tables;

use tracing::{debug, info};

use hull_mesh::Mesh;
use hull_mesh::tracing_ext::{OperationTimer, log_mesh_stats};

use crate::grid::OccupancyGrid;

pub use marching_cubes::{ISOVALUE, marching_cubes};

/// Extract the occupancy surface of `grid` in canonical coordinates.
///
/// A uniform grid (fully occupied or fully empty) produces an empty mesh.
pub fn extract_isosurface(grid: &OccupancyGrid) -> Mesh {
    let _timer = OperationTimer::with_grid("extract", grid.resolution());

    let (min, max) = grid.value_range();
    info!(
        resolution = grid.resolution(),
        field_min = min,
        field_max = max,
        "Extracting isosurface"
    );

    if min == max {
        info!("Scalar field is uniform, no surface to extract");
        return Mesh::new();
    }

    let mut mesh = marching_cubes(grid, ISOVALUE);
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Marching cubes complete"
    );

    rescale_to_cube(&mut mesh, grid.resolution());
    log_mesh_stats(&mesh, "extracted");

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Isosurface mesh created"
    );

    mesh
}

/// Map grid-index positions into `[-1, 1]^3` as `v / resolution * 2 - 1`.
///
/// The divisor is `resolution`, not `resolution - 1`, so the surface sits
/// slightly inside the sample span of the grid.
pub fn rescale_to_cube(mesh: &mut Mesh, resolution: usize) {
    mesh.scale_and_offset(2.0 / resolution as f64, -1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hull_mesh::Vertex;

    #[test]
    fn test_full_grid_gives_empty_mesh() {
        let grid = OccupancyGrid::full(10, 1_000).unwrap();
        let mesh = extract_isosurface(&grid);
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_rescale_divides_by_resolution() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 25.0, 49.0));
        rescale_to_cube(&mut mesh, 50);

        let p = mesh.vertices[0].position;
        assert_relative_eq!(p.x, -1.0);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 0.96, epsilon = 1e-12);
    }

    #[test]
    fn test_extracted_surface_inside_cube() {
        let mut grid = OccupancyGrid::full(6, 1_000).unwrap();
        grid.set(0, 0, 0, false);
        let mesh = extract_isosurface(&grid);

        assert!(!mesh.is_empty());
        let (min, max) = mesh.bounds().unwrap();
        for axis in 0..3 {
            assert!(min[axis] >= -1.0);
            assert!(max[axis] <= 1.0);
        }
    }
}
