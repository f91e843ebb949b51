// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler.
#![allow(unused_assignments)]

//! Error types for carving and extraction with rich diagnostics.
//!
//! Every error names the offending view or dimension, carries a `CARVE-XXXX`
//! code and a recovery suggestion. All of them are fatal to a run.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for carving operations.
pub type CarveResult<T> = Result<T, CarveError>;

/// Machine-readable error codes for carving operations.
///
/// Codes follow the pattern `CARVE-XXXX` where:
/// - 1xxx = Input validation errors
/// - 2xxx = Resource errors
/// - 3xxx = Pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarveErrorCode {
    /// CARVE-1001: Grid resolution below the minimum
    InvalidResolution = 1001,
    /// CARVE-1002: Mask dimensions are zero or disagree with its data
    InconsistentMask = 1002,
    /// CARVE-1003: Fewer views than the configured minimum
    MissingRequiredViews = 1003,
    /// CARVE-1004: View name not recognised
    UnknownView = 1004,

    /// CARVE-2001: Grid would exceed the voxel budget
    GridTooLarge = 2001,

    /// CARVE-3001: Cancelled through the progress callback
    Cancelled = 3001,
    /// CARVE-3002: Mesh stage failed
    MeshFailed = 3002,
}

impl CarveErrorCode {
    /// Returns the error code as a string in the format `CARVE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarveErrorCode::InvalidResolution => "CARVE-1001",
            CarveErrorCode::InconsistentMask => "CARVE-1002",
            CarveErrorCode::MissingRequiredViews => "CARVE-1003",
            CarveErrorCode::UnknownView => "CARVE-1004",
            CarveErrorCode::GridTooLarge => "CARVE-2001",
            CarveErrorCode::Cancelled => "CARVE-3001",
            CarveErrorCode::MeshFailed => "CARVE-3002",
        }
    }
}

impl std::fmt::Display for CarveErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for carving errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarveRecoverySuggestion {
    /// Use a different grid resolution.
    ChangeResolution { current: usize, suggested: usize },
    /// Fix or regenerate the mask for one view.
    CheckMask { view: String },
    /// Supply the listed views.
    ProvideViews { missing: Vec<String> },
    /// Use one of the known view names.
    UseKnownView,
    /// No specific suggestion.
    None,
}

impl std::fmt::Display for CarveRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarveRecoverySuggestion::ChangeResolution { current, suggested } => {
                write!(f, "Change resolution from {} to {}", current, suggested)
            }
            CarveRecoverySuggestion::CheckMask { view } => {
                write!(f, "Check the {} silhouette image and its dimensions", view)
            }
            CarveRecoverySuggestion::ProvideViews { missing } => {
                write!(f, "Provide images for: {}", missing.join(", "))
            }
            CarveRecoverySuggestion::UseKnownView => write!(
                f,
                "Use one of: front, back, left, right, top, bottom"
            ),
            CarveRecoverySuggestion::None => write!(f, "No specific suggestion available"),
        }
    }
}

/// Errors that can occur while carving a visual hull.
#[derive(Debug, Error, Diagnostic)]
pub enum CarveError {
    /// Resolution below the minimum.
    #[error("invalid grid resolution {resolution}: must be at least {min}")]
    #[diagnostic(
        code(carve::params::resolution),
        help("A grid needs at least two samples per axis. Try --resolution 100.")
    )]
    InvalidResolution { resolution: usize, min: usize },

    /// Mask has zero dimensions or its data length disagrees with them.
    #[error("inconsistent {view} mask ({height}x{width}): {details}")]
    #[diagnostic(
        code(carve::input::mask),
        help("Each mask must be non-empty and hold exactly height x width pixels.")
    )]
    InconsistentMask {
        view: String,
        height: usize,
        width: usize,
        details: String,
    },

    /// Fewer views than the configured minimum.
    #[error("only {present} view(s) supplied, {required} required (missing: {})", missing.join(", "))]
    #[diagnostic(
        code(carve::input::missing_views),
        help("Supply more silhouettes or lower the minimum view count.")
    )]
    MissingRequiredViews {
        present: usize,
        required: usize,
        missing: Vec<String>,
    },

    /// Grid would be too large.
    #[error("grid too large: resolution {resolution} = {total} voxels exceeds limit of {max}")]
    #[diagnostic(
        code(carve::grid::too_large),
        help("Reduce the resolution, or raise the voxel limit if memory allows.")
    )]
    GridTooLarge {
        resolution: usize,
        total: usize,
        max: usize,
    },

    /// Unknown view name.
    #[error("unknown view '{name}'")]
    #[diagnostic(
        code(carve::input::unknown_view),
        help("Valid views are front, back, left, right, top and bottom.")
    )]
    UnknownView { name: String },

    /// Cancelled by the progress callback.
    #[error("cancelled during {stage}")]
    #[diagnostic(code(carve::cancelled))]
    Cancelled { stage: String },

    /// Underlying mesh error.
    #[error("mesh operation failed: {0}")]
    #[diagnostic(code(carve::mesh::error))]
    Mesh(#[from] hull_mesh::MeshError),
}

impl CarveError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> CarveErrorCode {
        match self {
            CarveError::InvalidResolution { .. } => CarveErrorCode::InvalidResolution,
            CarveError::InconsistentMask { .. } => CarveErrorCode::InconsistentMask,
            CarveError::MissingRequiredViews { .. } => CarveErrorCode::MissingRequiredViews,
            CarveError::GridTooLarge { .. } => CarveErrorCode::GridTooLarge,
            CarveError::UnknownView { .. } => CarveErrorCode::UnknownView,
            CarveError::Cancelled { .. } => CarveErrorCode::Cancelled,
            CarveError::Mesh(_) => CarveErrorCode::MeshFailed,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> CarveRecoverySuggestion {
        match self {
            CarveError::InvalidResolution { resolution, min } => {
                CarveRecoverySuggestion::ChangeResolution {
                    current: *resolution,
                    suggested: (*min).max(100),
                }
            }
            CarveError::GridTooLarge {
                resolution, max, ..
            } => CarveRecoverySuggestion::ChangeResolution {
                current: *resolution,
                suggested: (((*max as f64).cbrt() + 1e-9).floor() as usize).max(2),
            },
            CarveError::InconsistentMask { view, .. } => {
                CarveRecoverySuggestion::CheckMask { view: view.clone() }
            }
            CarveError::MissingRequiredViews { missing, .. } => {
                CarveRecoverySuggestion::ProvideViews {
                    missing: missing.clone(),
                }
            }
            CarveError::UnknownView { .. } => CarveRecoverySuggestion::UseKnownView,
            CarveError::Cancelled { .. } | CarveError::Mesh(_) => CarveRecoverySuggestion::None,
        }
    }

    // Constructor helpers

    pub fn invalid_resolution(resolution: usize, min: usize) -> Self {
        CarveError::InvalidResolution { resolution, min }
    }

    pub fn inconsistent_mask(
        view: impl Into<String>,
        height: usize,
        width: usize,
        details: impl Into<String>,
    ) -> Self {
        CarveError::InconsistentMask {
            view: view.into(),
            height,
            width,
            details: details.into(),
        }
    }

    pub fn grid_too_large(resolution: usize, max: usize) -> Self {
        CarveError::GridTooLarge {
            resolution,
            total: resolution.saturating_pow(3),
            max,
        }
    }

    pub fn unknown_view(name: impl Into<String>) -> Self {
        CarveError::UnknownView { name: name.into() }
    }

    pub fn cancelled(stage: impl Into<String>) -> Self {
        CarveError::Cancelled {
            stage: stage.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CarveError::invalid_resolution(1, 2);
        assert_eq!(err.code(), CarveErrorCode::InvalidResolution);
        assert_eq!(err.code().as_str(), "CARVE-1001");
    }

    #[test]
    fn test_grid_too_large_suggestion() {
        let err = CarveError::grid_too_large(1000, 1_000_000);
        match err.recovery_suggestion() {
            CarveRecoverySuggestion::ChangeResolution { current, suggested } => {
                assert_eq!(current, 1000);
                assert_eq!(suggested, 100);
            }
            other => panic!("Expected ChangeResolution, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display_names_view() {
        let err = CarveError::inconsistent_mask("left", 0, 64, "zero height");
        let display = err.to_string();
        assert!(display.contains("left"));
        assert!(display.contains("0x64"));
    }

    #[test]
    fn test_missing_views_display() {
        let err = CarveError::MissingRequiredViews {
            present: 1,
            required: 3,
            missing: vec!["back".into(), "top".into()],
        };
        assert_eq!(
            err.to_string(),
            "only 1 view(s) supplied, 3 required (missing: back, top)"
        );
    }

    #[test]
    fn test_from_mesh_error() {
        let mesh_err = hull_mesh::MeshError::empty_mesh("test");
        let err: CarveError = mesh_err.into();
        assert!(matches!(err, CarveError::Mesh(_)));
        assert_eq!(err.code(), CarveErrorCode::MeshFailed);
    }
}
