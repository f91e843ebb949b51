//! Triangle mesh types, cleanup and export for visual hull reconstruction.
//!
//! This crate holds everything that happens to a surface after it has been
//! extracted from an occupancy volume:
//!
//! - **Types**: [`Mesh`], [`Vertex`], [`Triangle`]
//! - **Cleanup**: degenerate and duplicate triangle removal, vertex merging,
//!   non-manifold edge removal and index compaction ([`clean`])
//! - **Validation**: watertightness, manifoldness, Euler characteristic and
//!   connected components ([`validate`])
//! - **Export**: OBJ, STL and PLY meshes, plus PLY point clouds ([`io`])
//!
//! # Coordinate System
//!
//! Reconstructed surfaces live in the canonical cube `[-1, 1]^3`. Face
//! winding is **counter-clockwise when viewed from outside**, so face
//! normals point outward by the right-hand rule and a closed surface has
//! positive signed volume.
//!
//! # Quick Start
//!
//! ```
//! use hull_mesh::{Mesh, Vertex};
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0));
//! mesh.faces.extend_from_slice(&[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]);
//!
//! let report = mesh.clean().unwrap();
//! assert!(report.is_noop());
//!
//! let validation = mesh.validate();
//! assert_eq!(validation.euler_characteristic, 2);
//! assert!(validation.is_closed_manifold());
//! ```

mod error;
mod types;

pub mod adjacency;
pub mod clean;
pub mod components;
pub mod io;
pub mod progress;
pub mod tracing_ext;
pub mod validate;

pub use adjacency::MeshAdjacency;
pub use clean::{CleanParams, CleanReport, clean_mesh, clean_mesh_with_config};
pub use components::{ComponentAnalysis, find_connected_components};
pub use error::{ErrorCode, MeshError, MeshLocation, MeshResult, RecoverySuggestion};
pub use io::{MeshFormat, save_mesh, save_point_cloud_ply};
pub use progress::{Progress, ProgressCallback};
pub use types::{Mesh, Triangle, Vertex};
pub use validate::{MeshReport, require_closed_manifold, validate_mesh};

impl Mesh {
    /// Save the mesh to a file, choosing the format from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Validate the mesh and return a report.
    pub fn validate(&self) -> MeshReport {
        validate::validate_mesh(self)
    }

    /// Run the cleanup pipeline with default parameters.
    pub fn clean(&mut self) -> MeshResult<CleanReport> {
        clean::clean_mesh(self)
    }

    /// Run the cleanup pipeline with custom parameters.
    pub fn clean_with_config(&mut self, params: &CleanParams) -> MeshResult<CleanReport> {
        clean::clean_mesh_with_config(self, params)
    }

    /// Analyze edge-connected components.
    pub fn find_components(&self) -> ComponentAnalysis {
        components::find_connected_components(self)
    }
}
