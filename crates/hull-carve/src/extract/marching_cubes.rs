//! Table-driven marching cubes over an occupancy grid.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

use hull_mesh::{Mesh, Vertex};

use super::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use crate::grid::OccupancyGrid;

/// Isovalue separating empty (`0.0`) from occupied (`1.0`) cells.
pub const ISOVALUE: f64 = 0.5;

/// Extract the isosurface of `grid` in grid-index coordinates.
///
/// Vertices lie on grid edges and are shared between neighbouring cells, so
/// the surface of a region that does not touch the grid boundary is closed.
/// Triangles wind counter-clockwise seen from the empty side and every
/// vertex carries a unit normal pointing out of the occupied region.
///
/// A uniform grid yields an empty mesh.
pub fn marching_cubes(grid: &OccupancyGrid, isovalue: f64) -> Mesh {
    let res = grid.resolution();
    let mut mesh = Mesh::new();
    let mut edge_vertices: HashMap<(usize, usize), u32> = HashMap::new();

    for i in 0..res - 1 {
        for j in 0..res - 1 {
            for k in 0..res - 1 {
                let corners = CORNER_OFFSETS.map(|[di, dj, dk]| [i + di, j + dj, k + dk]);
                let values = corners.map(|[a, b, c]| grid.value(a, b, c));

                let mut case = 0usize;
                for (n, &value) in values.iter().enumerate() {
                    if value < isovalue {
                        case |= 1 << n;
                    }
                }
                if EDGE_TABLE[case] == 0 {
                    continue;
                }

                for tri in TRI_TABLE[case].chunks_exact(3) {
                    if tri[0] < 0 {
                        break;
                    }
                    let mut face = [0u32; 3];
                    for (slot, &edge) in face.iter_mut().zip(tri) {
                        let [a, b] = EDGE_CORNERS[edge as usize];
                        let (pa, pb) = (corners[a], corners[b]);
                        let key = {
                            let ia = grid.linearize(pa[0], pa[1], pa[2]);
                            let ib = grid.linearize(pb[0], pb[1], pb[2]);
                            (ia.min(ib), ia.max(ib))
                        };
                        *slot = *edge_vertices.entry(key).or_insert_with(|| {
                            let vertex =
                                edge_vertex(grid, pa, pb, values[a], values[b], isovalue);
                            mesh.vertices.push(vertex);
                            (mesh.vertices.len() - 1) as u32
                        });
                    }
                    mesh.faces.push(face);
                }
            }
        }
    }

    mesh
}

/// Vertex where the surface crosses the edge `pa -> pb`.
fn edge_vertex(
    grid: &OccupancyGrid,
    pa: [usize; 3],
    pb: [usize; 3],
    va: f64,
    vb: f64,
    isovalue: f64,
) -> Vertex {
    let t = if (vb - va).abs() < f64::EPSILON {
        0.5
    } else {
        ((isovalue - va) / (vb - va)).clamp(0.0, 1.0)
    };

    let a = Point3::new(pa[0] as f64, pa[1] as f64, pa[2] as f64);
    let b = Point3::new(pb[0] as f64, pb[1] as f64, pb[2] as f64);
    let position = a + (b - a) * t;

    // The field rises into the solid, so the outward normal is -gradient.
    let grad = gradient(grid, pa) * (1.0 - t) + gradient(grid, pb) * t;
    let normal = match (-grad).try_normalize(1e-12) {
        Some(n) => n,
        // Gradients cancelled: fall back to the edge direction, solid to empty.
        None => {
            let dir = if va > vb { b - a } else { a - b };
            dir.normalize()
        }
    };

    Vertex::with_normal(position, normal)
}

/// Central-difference gradient, one-sided on the grid boundary.
fn gradient(grid: &OccupancyGrid, p: [usize; 3]) -> Vector3<f64> {
    let last = grid.resolution() - 1;
    let mut g = Vector3::zeros();
    for axis in 0..3 {
        let mut lo = p;
        let mut hi = p;
        lo[axis] = p[axis].saturating_sub(1);
        hi[axis] = (p[axis] + 1).min(last);
        let span = (hi[axis] - lo[axis]) as f64;
        g[axis] = (grid.value(hi[0], hi[1], hi[2]) - grid.value(lo[0], lo[1], lo[2])) / span;
    }
    g
}
