//! Tracing helpers for pipeline stages.
//!
//! Stage summaries are logged at INFO, per-view and per-step detail at
//! DEBUG. Timing goes to the `hull_mesh::timing` target so it can be
//! filtered on its own:
//!
//! ```text
//! RUST_LOG=hull_carve=info,hull_mesh::timing=info hull reconstruct ...
//! ```

use std::time::Instant;
use tracing::{Span, debug, info};

use crate::{CleanReport, Mesh, MeshReport};

/// A performance timer that logs duration on drop.
///
/// ```
/// use hull_mesh::tracing_ext::OperationTimer;
///
/// {
///     let _timer = OperationTimer::new("carve");
///     // ... work ...
/// } // logs elapsed_ms here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("hull_operation", operation = name);
        debug!(target: "hull_mesh::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer that records the size of the input grid.
    pub fn with_grid(name: &'static str, resolution: usize) -> Self {
        let span = tracing::info_span!("hull_operation", operation = name, resolution);
        debug!(
            target: "hull_mesh::timing",
            operation = name,
            resolution,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "hull_mesh::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            "Operation completed"
        );
    }
}

/// Log mesh statistics at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let (min, max) = mesh.bounds().unwrap_or_default();
    let dims = max - min;

    debug!(
        target: "hull_mesh::mesh_state",
        context,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        dimensions = format!("{:.3} x {:.3} x {:.3}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}

/// Log what the cleaner removed.
pub fn log_clean_report(report: &CleanReport) {
    info!(
        target: "hull_mesh::clean",
        degenerate = report.degenerate_faces_removed,
        duplicate_faces = report.duplicate_faces_removed,
        merged_vertices = report.vertices_merged,
        collapsed = report.collapsed_faces_removed,
        non_manifold = report.non_manifold_faces_removed,
        unreferenced = report.unreferenced_vertices_removed,
        "Mesh cleanup summary"
    );
}

/// Log a validation result.
pub fn log_validation_result(report: &MeshReport) {
    info!(
        target: "hull_mesh::validation",
        closed_manifold = report.is_closed_manifold(),
        euler_characteristic = report.euler_characteristic,
        components = report.component_count,
        boundary_edges = report.boundary_edge_count,
        non_manifold_edges = report.non_manifold_edge_count,
        "Mesh validation"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_time() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed_ms() >= 1.0);
    }

    #[test]
    fn test_logging_empty_mesh_does_not_panic() {
        let mesh = Mesh::new();
        log_mesh_stats(&mesh, "empty");
        log_validation_result(&crate::validate_mesh(&mesh));
        log_clean_report(&CleanReport::default());
    }
}
