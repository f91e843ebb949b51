//! Fluent builder for the full reconstruction pipeline.
//!
//! Masks are carved into an occupancy grid, the grid is contoured with
//! marching cubes and the surface is cleaned:
//!
//! ```text
//! ViewSet -> carve -> OccupancyGrid -> extract -> Mesh -> clean -> Mesh
//! ```
//!
//! # Example
//!
//! ```
//! use hull_carve::{HullBuilder, SilhouetteMask, View, ViewSet};
//!
//! let disk = |view| {
//!     SilhouetteMask::from_fn(view, 32, 32, |r, c| {
//!         let (dr, dc) = (r as f64 - 15.5, c as f64 - 15.5);
//!         dr * dr + dc * dc <= 12.0 * 12.0
//!     })
//!     .unwrap()
//! };
//! let views: ViewSet = View::ALL.into_iter().map(disk).collect();
//!
//! let result = HullBuilder::new(&views).resolution(24).build().unwrap();
//! assert!(result.stats.carve.occupied > 0);
//! assert!(!result.mesh.is_empty());
//! ```

use std::time::Instant;

use tracing::info;

use hull_mesh::progress::{CallbackProgressReporter, NoOpProgressReporter, ProgressCallback};
use hull_mesh::tracing_ext::{OperationTimer, log_clean_report, log_validation_result};
use hull_mesh::{CleanParams, CleanReport, Mesh, MeshReport, clean_mesh_with_config, validate_mesh};

use crate::carve::{CarveOutput, CarveParams, CarveStats, carve_views_with_progress};
use crate::error::CarveResult;
use crate::extract::extract_isosurface;
use crate::grid::OccupancyGrid;
use crate::mask::ViewSet;

/// Statistics for a whole reconstruction.
#[derive(Debug, Clone)]
pub struct HullStats {
    pub carve: CarveStats,
    /// Mesh size straight out of marching cubes.
    pub raw_vertices: usize,
    pub raw_faces: usize,
    /// Mesh size after cleanup.
    pub vertices: usize,
    pub faces: usize,
    pub carve_time_ms: u64,
    pub extract_time_ms: u64,
    pub clean_time_ms: u64,
}

impl std::fmt::Display for HullStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Grid: {}^3, {} of {} voxels filled",
            self.carve.resolution, self.carve.occupied, self.carve.total_voxels
        )?;
        for view in &self.carve.views {
            writeln!(f, "  {:<6} cleared {}", view.view, view.cleared)?;
        }
        writeln!(
            f,
            "Mesh: {} vertices, {} faces (raw {} / {})",
            self.vertices, self.faces, self.raw_vertices, self.raw_faces
        )?;
        write!(
            f,
            "Time: carve {}ms, extract {}ms, clean {}ms",
            self.carve_time_ms, self.extract_time_ms, self.clean_time_ms
        )
    }
}

/// Output of [`HullBuilder::build`].
#[derive(Debug)]
pub struct HullResult {
    /// Carved occupancy grid.
    pub grid: OccupancyGrid,
    /// Cleaned surface in `[-1, 1]^3`.
    pub mesh: Mesh,
    pub stats: HullStats,
    pub clean_report: CleanReport,
    /// Present when validation is enabled.
    pub validation: Option<MeshReport>,
}

/// Fluent builder for visual hull reconstruction.
pub struct HullBuilder<'a> {
    views: &'a ViewSet,
    carve: CarveParams,
    clean: CleanParams,
    validate: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> HullBuilder<'a> {
    pub fn new(views: &'a ViewSet) -> Self {
        Self {
            views,
            carve: CarveParams::default(),
            clean: CleanParams::default(),
            validate: true,
            progress_callback: None,
        }
    }

    // =========================================================================
    // Carving
    // =========================================================================

    /// Samples per grid axis (default 100).
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.carve.resolution = resolution;
        self
    }

    /// Fail unless at least this many views are present (default 0).
    pub fn min_views(mut self, min_views: usize) -> Self {
        self.carve.min_views = min_views;
        self
    }

    pub fn max_voxels(mut self, max: usize) -> Self {
        self.carve.max_voxels = max;
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.carve.parallel = enable;
        self
    }

    pub fn carve_params(mut self, params: CarveParams) -> Self {
        self.carve = params;
        self
    }

    // =========================================================================
    // Cleanup and validation
    // =========================================================================

    pub fn clean_params(mut self, params: CleanParams) -> Self {
        self.clean = params;
        self
    }

    /// Keep the raw marching cubes output.
    pub fn skip_cleanup(mut self) -> Self {
        self.clean = CleanParams::disabled();
        self
    }

    pub fn validate(mut self, enable: bool) -> Self {
        self.validate = enable;
        self
    }

    // =========================================================================
    // Presets
    // =========================================================================

    pub fn preview(mut self) -> Self {
        self.carve.resolution = CarveParams::preview().resolution;
        self.validate = false;
        self
    }

    pub fn high_quality(mut self) -> Self {
        self.carve.resolution = CarveParams::high_quality().resolution;
        self.clean = CleanParams::strict();
        self.validate = true;
        self
    }

    /// Set a progress callback, invoked after each view is carved.
    ///
    /// Return `false` from the callback to cancel; the build then fails with
    /// [`CarveError::Cancelled`](crate::CarveError::Cancelled).
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Carve only, skipping surface extraction.
    pub fn carve_only(self) -> CarveResult<CarveOutput> {
        self.run_carve()
    }

    /// Run carving, extraction, cleanup and (optionally) validation.
    pub fn build(self) -> CarveResult<HullResult> {
        let _timer = OperationTimer::with_grid("reconstruct", self.carve.resolution);

        let carve_start = Instant::now();
        let CarveOutput { grid, stats: carve } = self.run_carve()?;
        let carve_time_ms = carve_start.elapsed().as_millis() as u64;

        let extract_start = Instant::now();
        let mut mesh = extract_isosurface(&grid);
        let extract_time_ms = extract_start.elapsed().as_millis() as u64;
        let (raw_vertices, raw_faces) = (mesh.vertex_count(), mesh.face_count());

        let clean_start = Instant::now();
        let clean_report = clean_mesh_with_config(&mut mesh, &self.clean)?;
        let clean_time_ms = clean_start.elapsed().as_millis() as u64;
        log_clean_report(&clean_report);

        let validation = self.validate.then(|| {
            let report = validate_mesh(&mesh);
            log_validation_result(&report);
            report
        });

        let stats = HullStats {
            carve,
            raw_vertices,
            raw_faces,
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            carve_time_ms,
            extract_time_ms,
            clean_time_ms,
        };

        info!(
            filled = stats.carve.occupied,
            vertices = stats.vertices,
            faces = stats.faces,
            "Reconstruction complete"
        );

        Ok(HullResult {
            grid,
            mesh,
            stats,
            clean_report,
            validation,
        })
    }

    fn run_carve(&self) -> CarveResult<CarveOutput> {
        match &self.progress_callback {
            Some(callback) => {
                let reporter = CallbackProgressReporter::new(callback);
                carve_views_with_progress(self.views, &self.carve, &reporter)
            }
            None => carve_views_with_progress(self.views, &self.carve, &NoOpProgressReporter),
        }
    }
}
