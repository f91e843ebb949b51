//! Mesh validation and reporting.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::Mesh;
use crate::adjacency::MeshAdjacency;
use crate::components::find_connected_components;
use crate::error::{MeshError, MeshResult};

/// Validation report for a mesh.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Whether the mesh has no boundary edges.
    pub is_watertight: bool,

    /// Whether all edges have at most 2 adjacent faces.
    pub is_manifold: bool,

    /// Number of boundary edges (edges with 1 adjacent face).
    pub boundary_edge_count: usize,

    /// Number of non-manifold edges (edges with >2 adjacent faces).
    pub non_manifold_edge_count: usize,

    pub vertex_count: usize,
    pub face_count: usize,

    /// Number of distinct undirected edges.
    pub edge_count: usize,

    /// `V - E + F`. A closed genus-0 surface has 2.
    pub euler_characteristic: i64,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,

    /// Signed volume (positive = outward normals). Only meaningful when
    /// the mesh is watertight.
    pub signed_volume: f64,

    pub surface_area: f64,

    /// Number of edge-connected components.
    pub component_count: usize,
}

impl MeshReport {
    /// Check if mesh passes basic validity checks.
    pub fn is_valid(&self) -> bool {
        self.vertex_count > 0 && self.face_count > 0
    }

    /// Whether the mesh has negative signed volume.
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume < 0.0
    }

    /// A single watertight, manifold, sphere-like surface.
    pub fn is_closed_manifold(&self) -> bool {
        self.is_valid()
            && self.is_watertight
            && self.is_manifold
            && self.component_count == 1
            && self.euler_characteristic == 2
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Components: {}", self.component_count)?;
        writeln!(f, "  Euler characteristic: {}", self.euler_characteristic)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        writeln!(f, "  Surface Area: {:.4}", self.surface_area)?;
        writeln!(f, "  Signed Volume: {:.4}", self.signed_volume)?;

        writeln!(
            f,
            "  Watertight: {} (boundary edges: {})",
            if self.is_watertight { "yes" } else { "NO" },
            self.boundary_edge_count
        )?;

        write!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            if self.is_manifold { "yes" } else { "NO" },
            self.non_manifold_edge_count
        )
    }
}

/// Validate a mesh and return a report.
pub fn validate_mesh(mesh: &Mesh) -> MeshReport {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let boundary_edge_count = adjacency.boundary_edge_count();
    let non_manifold_edge_count = adjacency.non_manifold_edge_count();
    let edge_count = adjacency.edge_count();

    let euler_characteristic =
        mesh.vertex_count() as i64 - edge_count as i64 + mesh.face_count() as i64;

    let report = MeshReport {
        is_watertight: boundary_edge_count == 0,
        is_manifold: non_manifold_edge_count == 0,
        boundary_edge_count,
        non_manifold_edge_count,
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        edge_count,
        euler_characteristic,
        bounds: mesh.bounds(),
        signed_volume: mesh.signed_volume(),
        surface_area: mesh.surface_area(),
        component_count: find_connected_components(mesh).component_count,
    };

    if report.is_valid() {
        if !report.is_watertight {
            warn!(boundary_edge_count, "Mesh is not watertight");
        }
        if !report.is_manifold {
            warn!(non_manifold_edge_count, "Mesh is not manifold");
        }
        if report.is_inside_out() && report.is_watertight {
            warn!("Mesh appears to be inside-out (negative signed volume)");
        }
    }

    debug!("{}", report);

    report
}

/// Fail unless the mesh is a single closed 2-manifold.
pub fn require_closed_manifold(mesh: &Mesh) -> MeshResult<MeshReport> {
    let report = validate_mesh(mesh);
    if !report.is_valid() {
        return Err(MeshError::empty_mesh(format!(
            "{} vertices, {} faces",
            report.vertex_count, report.face_count
        )));
    }
    if !report.is_closed_manifold() {
        return Err(MeshError::invalid_topology(format!(
            "{} boundary edges, {} non-manifold edges, {} components, Euler characteristic {}",
            report.boundary_edge_count,
            report.non_manifold_edge_count,
            report.component_count,
            report.euler_characteristic
        )));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;
    use approx::assert_relative_eq;

    fn unit_cube() -> Mesh {
        let mut mesh = Mesh::new();
        for &(x, y, z) in &[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (0.0, 1.0, 1.0),
        ] {
            mesh.vertices.push(Vertex::from_coords(x, y, z));
        }
        mesh.faces.extend_from_slice(&[
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ]);
        mesh
    }

    #[test]
    fn test_cube_is_closed_manifold() {
        let report = validate_mesh(&unit_cube());
        assert!(report.is_watertight);
        assert!(report.is_manifold);
        assert_eq!(report.edge_count, 18);
        assert_eq!(report.euler_characteristic, 2);
        assert_eq!(report.component_count, 1);
        assert!(report.is_closed_manifold());
        assert_relative_eq!(report.signed_volume, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.surface_area, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_open_mesh_fails_requirement() {
        let mut mesh = unit_cube();
        mesh.faces.pop();
        let report = validate_mesh(&mesh);
        assert_eq!(report.boundary_edge_count, 3);
        assert!(!report.is_closed_manifold());

        let err = require_closed_manifold(&mesh).unwrap_err();
        assert!(matches!(err, MeshError::InvalidTopology { .. }));
    }

    #[test]
    fn test_empty_mesh_fails_requirement() {
        let err = require_closed_manifold(&Mesh::new()).unwrap_err();
        assert!(matches!(err, MeshError::EmptyMesh { .. }));
    }

    #[test]
    fn test_inside_out_detection() {
        let mut mesh = unit_cube();
        for face in &mut mesh.faces {
            face.swap(1, 2);
        }
        let report = validate_mesh(&mesh);
        assert!(report.is_inside_out());
    }
}
