//! Error types for mesh operations with rich diagnostics.
//!
//! Every error carries a machine-readable code, a recovery suggestion and,
//! where it makes sense, the location in the mesh or on disk that caused it.
//!
//! # Error Codes
//!
//! Codes follow the format `MESH-XXXX`:
//! - `MESH-1xxx`: I/O errors (file writing)
//! - `MESH-2xxx`: Validation errors (topology, indices)
//! - `MESH-4xxx`: Format errors (unsupported output format)
//!
//! # Example
//!
//! ```
//! use hull_mesh::{ErrorCode, MeshError};
//!
//! let err = MeshError::invalid_vertex_index(5, 100, 50);
//! assert_eq!(err.code(), ErrorCode::InvalidVertexIndex);
//! assert_eq!(err.code().as_str(), "MESH-2001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes for mesh operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// MESH-1002: Failed to write file
    IoWrite = 1002,

    // Validation errors (2xxx)
    /// MESH-2001: Face references invalid vertex index
    InvalidVertexIndex = 2001,
    /// MESH-2003: Mesh has no vertices or faces
    EmptyMesh = 2003,
    /// MESH-2004: Invalid mesh topology
    InvalidTopology = 2004,

    // Format errors (4xxx)
    /// MESH-4001: Unsupported file format
    UnsupportedFormat = 4001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoWrite => "MESH-1002",
            ErrorCode::InvalidVertexIndex => "MESH-2001",
            ErrorCode::EmptyMesh => "MESH-2003",
            ErrorCode::InvalidTopology => "MESH-2004",
            ErrorCode::UnsupportedFormat => "MESH-4001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Run cleanup operations to fix the issue.
    RunCleanup { operations: Vec<String> },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
    /// Check the inputs that produced the mesh.
    CheckInput { checks: Vec<String> },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::RunCleanup { operations } => {
                write!(f, "Run cleanup operations: {}", operations.join(", "))
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
            RecoverySuggestion::CheckInput { checks } => {
                write!(f, "Check the input for: {}", checks.join(", "))
            }
            RecoverySuggestion::None => write!(f, "No automatic recovery available"),
        }
    }
}

/// Location information for mesh errors.
#[derive(Debug, Clone)]
pub enum MeshLocation {
    /// Error at a specific face.
    Face {
        index: usize,
        vertices: Option<[u32; 3]>,
    },
    /// Error in a file.
    File { path: PathBuf },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Face { index, vertices } => {
                if let Some([a, b, c]) = vertices {
                    write!(f, "face {} with vertices [{}, {}, {}]", index, a, b, c)
                } else {
                    write!(f, "face {}", index)
                }
            }
            MeshLocation::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Errors that can occur during mesh operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(mesh::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(
        code(mesh::format::unsupported),
        help("Supported output formats: OBJ, STL, PLY")
    )]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices or faces).
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(mesh::validation::empty),
        help(
            "The carved volume produced no surface. A fully occupied or fully empty grid has no isosurface."
        )
    )]
    EmptyMesh { details: String },

    /// Invalid mesh topology.
    #[error("invalid mesh topology: {details}")]
    #[diagnostic(
        code(mesh::validation::topology),
        help("Run the mesh cleaner, or inspect the validation report for details.")
    )]
    InvalidTopology { details: String },

    /// Invalid vertex index in face data.
    #[error(
        "invalid vertex index: face {face_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh::validation::vertex_index),
        help("Faces must only reference existing vertices. Rebuild the mesh from the grid.")
    )]
    InvalidVertexIndex {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::InvalidTopology { .. } => ErrorCode::InvalidTopology,
            MeshError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::IoWrite { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["directory exists".into(), "write permissions".into()],
            },
            MeshError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["OBJ".into(), "STL".into(), "PLY".into()],
            },
            MeshError::EmptyMesh { .. } => RecoverySuggestion::CheckInput {
                checks: vec![
                    "masks contain both foreground and background".into(),
                    "threshold settings".into(),
                ],
            },
            MeshError::InvalidTopology { .. } => RecoverySuggestion::RunCleanup {
                operations: vec!["remove_non_manifold_faces".into()],
            },
            MeshError::InvalidVertexIndex { .. } => RecoverySuggestion::RunCleanup {
                operations: vec!["remove_degenerate_faces".into(), "compact".into()],
            },
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::InvalidVertexIndex { face_index, .. } => Some(MeshLocation::Face {
                index: *face_index,
                vertices: None,
            }),
            MeshError::IoWrite { path, .. } => Some(MeshLocation::File { path: path.clone() }),
            _ => None,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidVertexIndex error.
    pub fn invalid_vertex_index(face_index: usize, vertex_index: u32, vertex_count: usize) -> Self {
        MeshError::InvalidVertexIndex {
            face_index,
            vertex_index,
            vertex_count,
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an InvalidTopology error.
    pub fn invalid_topology(details: impl Into<String>) -> Self {
        MeshError::InvalidTopology {
            details: details.into(),
        }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: Option<String>) -> Self {
        MeshError::UnsupportedFormat { extension }
    }
}
