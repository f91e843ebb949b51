//! Silhouette carving.
//!
//! The grid starts fully occupied. Each present view clears every cell whose
//! projection lands inside its mask on a background pixel; cells projecting
//! outside the mask are left alone. Clearing only ever removes occupancy, so
//! the result is the AND over views and does not depend on view order.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use hull_mesh::progress::{NoOpProgressReporter, ProgressReporter};
use hull_mesh::tracing_ext::OperationTimer;

use crate::error::{CarveError, CarveResult};
use crate::grid::OccupancyGrid;
use crate::mask::{SilhouetteMask, ViewSet};
use crate::view::{Axis, View};

/// Parameters for carving.
#[derive(Debug, Clone)]
pub struct CarveParams {
    /// Samples per axis. Must be at least 2.
    pub resolution: usize,
    /// Minimum number of views that must be present (0 accepts any subset).
    pub min_views: usize,
    /// Maximum number of cells before error (memory safety).
    pub max_voxels: usize,
    /// Carve `i`-slabs in parallel with rayon.
    pub parallel: bool,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            resolution: 100,
            min_views: 0,
            max_voxels: 64_000_000,
            parallel: true,
        }
    }
}

impl CarveParams {
    /// Coarse grid for quick previews.
    pub fn preview() -> Self {
        Self {
            resolution: 50,
            ..Self::default()
        }
    }

    /// Fine grid for final output.
    pub fn high_quality() -> Self {
        Self {
            resolution: 200,
            ..Self::default()
        }
    }

    /// Require every one of the six views.
    pub fn all_views_required(mut self) -> Self {
        self.min_views = View::ALL.len();
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Cells cleared by one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCarveStats {
    pub view: View,
    /// Cells this view turned from occupied to empty. A cell already
    /// cleared by an earlier view is not counted again.
    pub cleared: usize,
}

/// Statistics from a carving run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarveStats {
    pub resolution: usize,
    pub total_voxels: usize,
    /// Per-view results in canonical view order.
    pub views: Vec<ViewCarveStats>,
    pub occupied: usize,
}

impl CarveStats {
    pub fn total_cleared(&self) -> usize {
        self.views.iter().map(|v| v.cleared).sum()
    }

    /// Fraction of the grid still occupied.
    pub fn fill_ratio(&self) -> f64 {
        if self.total_voxels == 0 {
            0.0
        } else {
            self.occupied as f64 / self.total_voxels as f64
        }
    }
}

/// Result of carving.
#[derive(Debug, Clone)]
pub struct CarveOutput {
    pub grid: OccupancyGrid,
    pub stats: CarveStats,
}

/// Carve a fully occupied grid against every view in `views`.
///
/// # Example
/// ```
/// use hull_carve::{CarveParams, SilhouetteMask, View, ViewSet, carve_views};
///
/// let views = ViewSet::new().with(SilhouetteMask::full(View::Front, 8, 8).unwrap());
/// let params = CarveParams::default().with_resolution(10);
/// let output = carve_views(&views, &params).unwrap();
/// assert_eq!(output.stats.occupied, 1000);
/// ```
pub fn carve_views(views: &ViewSet, params: &CarveParams) -> CarveResult<CarveOutput> {
    carve_views_with_progress(views, params, &NoOpProgressReporter)
}

/// Carve with progress reported after each view.
///
/// Returns [`CarveError::Cancelled`] if the reporter asks to stop.
pub fn carve_views_with_progress(
    views: &ViewSet,
    params: &CarveParams,
    reporter: &dyn ProgressReporter,
) -> CarveResult<CarveOutput> {
    views.require_at_least(params.min_views)?;

    let mut grid = OccupancyGrid::full(params.resolution, params.max_voxels)?;
    let _timer = OperationTimer::with_grid("carve", grid.resolution());

    info!(
        resolution = grid.resolution(),
        views = ?views.views(),
        bounds = %views.bounds(),
        "Carving visual hull"
    );

    let coords = grid.coordinates();
    let total = views.len() as u64;
    let mut view_stats = Vec::with_capacity(views.len());

    for (n, mask) in views.iter().enumerate() {
        let cleared = carve_view(&mut grid, mask, &coords, params.parallel);

        if cleared == 0 {
            warn!(view = %mask.view(), "View carved no cells");
        } else {
            debug!(view = %mask.view(), cleared, "View carved");
        }
        view_stats.push(ViewCarveStats {
            view: mask.view(),
            cleared,
        });

        if !reporter.report_progress(n as u64 + 1, total, mask.view().name()) {
            info!(view = %mask.view(), "Carving cancelled");
            return Err(CarveError::cancelled("carving"));
        }
    }

    let occupied = grid.count_occupied();
    let stats = CarveStats {
        resolution: grid.resolution(),
        total_voxels: grid.total_voxels(),
        views: view_stats,
        occupied,
    };

    info!(
        occupied,
        total = stats.total_voxels,
        fill = format!("{:.1}%", stats.fill_ratio() * 100.0),
        "Carving complete"
    );

    Ok(CarveOutput { grid, stats })
}

/// Clear cells of `grid` that project onto background in `mask`.
///
/// Returns the number of cells cleared by this call.
pub fn carve_view(grid: &mut OccupancyGrid, mask: &SilhouetteMask, coords: &[f64], parallel: bool) -> usize {
    let res = grid.resolution();
    let view = mask.view();
    let row_rule = view.row_rule();
    let col_rule = view.col_rule();

    // Each view depends on only two grid indices, so the clear decision is a
    // res x res plane indexed by (row index, col index).
    let rows: Vec<Option<usize>> = coords
        .iter()
        .map(|&c| in_range(row_rule.pixel(c, mask.height()), mask.height()))
        .collect();
    let cols: Vec<Option<usize>> = coords
        .iter()
        .map(|&c| in_range(col_rule.pixel(c, mask.width()), mask.width()))
        .collect();

    let mut plane = vec![false; res * res];
    for (a, row) in rows.iter().enumerate() {
        for (b, col) in cols.iter().enumerate() {
            if let (Some(row), Some(col)) = (row, col) {
                plane[a * res + b] = !mask.is_foreground(*row, *col);
            }
        }
    }

    let lookup = PlaneLookup {
        plane: &plane,
        res,
        row_axis: row_rule.axis,
        col_axis: col_rule.axis,
    };

    let slab_len = res * res;
    let cells = grid.cells_mut();
    if parallel {
        cells
            .par_chunks_mut(slab_len)
            .enumerate()
            .map(|(i, slab)| lookup.carve_slab(i, slab))
            .sum()
    } else {
        cells
            .chunks_mut(slab_len)
            .enumerate()
            .map(|(i, slab)| lookup.carve_slab(i, slab))
            .sum()
    }
}

#[inline]
fn in_range(pixel: i64, extent: usize) -> Option<usize> {
    (pixel >= 0 && (pixel as usize) < extent).then_some(pixel as usize)
}

struct PlaneLookup<'a> {
    plane: &'a [bool],
    res: usize,
    row_axis: Axis,
    col_axis: Axis,
}

impl PlaneLookup<'_> {
    /// Carve the `j, k` slab at fixed `i`.
    fn carve_slab(&self, i: usize, slab: &mut [bool]) -> usize {
        let res = self.res;
        let mut cleared = 0;
        for j in 0..res {
            for k in 0..res {
                let ijk = [i, j, k];
                let a = ijk[self.row_axis.index()];
                let b = ijk[self.col_axis.index()];
                let cell = &mut slab[j * res + k];
                if *cell && self.plane[a * res + b] {
                    *cell = false;
                    cleared += 1;
                }
            }
        }
        cleared
    }
}
