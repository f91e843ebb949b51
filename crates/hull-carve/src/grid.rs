//! Dense boolean occupancy grid over the canonical cube `[-1, 1]^3`.

use nalgebra::Point3;
use tracing::info;

use crate::error::{CarveError, CarveResult};

/// Smallest usable resolution: one cell per cube corner.
pub const MIN_RESOLUTION: usize = 2;

/// Dense `resolution^3` occupancy grid.
///
/// Cell `(i, j, k)` samples the point
/// `(2i/(res-1) - 1, 2j/(res-1) - 1, 2k/(res-1) - 1)` and lives at flat index
/// `(i * res + j) * res + k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    resolution: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// A fully occupied grid.
    ///
    /// Fails if `resolution < 2` or the grid would exceed `max_voxels` cells.
    pub fn full(resolution: usize, max_voxels: usize) -> CarveResult<Self> {
        if resolution < MIN_RESOLUTION {
            return Err(CarveError::invalid_resolution(resolution, MIN_RESOLUTION));
        }
        let total = resolution
            .checked_pow(3)
            .filter(|&total| total <= max_voxels)
            .ok_or_else(|| CarveError::grid_too_large(resolution, max_voxels))?;

        info!(
            resolution,
            total,
            "Creating occupancy grid"
        );

        Ok(Self {
            resolution,
            cells: vec![true; total],
        })
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of cells.
    #[inline]
    pub fn total_voxels(&self) -> usize {
        self.cells.len()
    }

    /// Flat index of `(i, j, k)`.
    #[inline]
    pub fn linearize(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.resolution + j) * self.resolution + k
    }

    /// Grid index of a flat index.
    #[inline]
    pub fn delinearize(&self, idx: usize) -> [usize; 3] {
        let res = self.resolution;
        [idx / (res * res), (idx / res) % res, idx % res]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> bool {
        self.cells[self.linearize(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, occupied: bool) {
        let idx = self.linearize(i, j, k);
        self.cells[idx] = occupied;
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Canonical coordinate of index `n` along any axis.
    #[inline]
    pub fn coordinate(&self, n: usize) -> f64 {
        coordinate(n, self.resolution)
    }

    /// Coordinates of every index along one axis; shared by all three axes.
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.resolution)
            .map(|n| coordinate(n, self.resolution))
            .collect()
    }

    /// Canonical position of cell `(i, j, k)`.
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(self.coordinate(i), self.coordinate(j), self.coordinate(k))
    }

    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_fully_occupied(&self) -> bool {
        self.cells.iter().all(|&c| c)
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Scalar field value of a cell: `1.0` occupied, `0.0` empty.
    #[inline]
    pub fn value(&self, i: usize, j: usize, k: usize) -> f64 {
        if self.get(i, j, k) { 1.0 } else { 0.0 }
    }

    /// Minimum and maximum of the scalar field.
    pub fn value_range(&self) -> (f64, f64) {
        let any_occupied = self.cells.iter().any(|&c| c);
        let any_empty = self.cells.iter().any(|&c| !c);
        let min = if any_empty { 0.0 } else { 1.0 };
        let max = if any_occupied { 1.0 } else { 0.0 };
        (min, max)
    }

    /// Occupied cells as points `idx / resolution * 2 - 1`.
    ///
    /// Uses the same divisor as the mesh rescale so the point cloud lines up
    /// with the extracted surface.
    pub fn occupied_points(&self) -> Vec<Point3<f64>> {
        let scale = 2.0 / self.resolution as f64;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(idx, _)| {
                let [i, j, k] = self.delinearize(idx);
                Point3::new(
                    i as f64 * scale - 1.0,
                    j as f64 * scale - 1.0,
                    k as f64 * scale - 1.0,
                )
            })
            .collect()
    }
}

#[inline]
fn coordinate(n: usize, resolution: usize) -> f64 {
    2.0 * n as f64 / (resolution - 1) as f64 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_grid() {
        let grid = OccupancyGrid::full(20, 1_000_000).unwrap();
        assert_eq!(grid.total_voxels(), 8000);
        assert_eq!(grid.count_occupied(), 8000);
        assert!(grid.is_fully_occupied());
        assert_eq!(grid.value_range(), (1.0, 1.0));
    }

    #[test]
    fn test_resolution_too_small() {
        for res in [0, 1] {
            let err = OccupancyGrid::full(res, 1_000).unwrap_err();
            assert!(matches!(
                err,
                CarveError::InvalidResolution { resolution, min: 2 } if resolution == res
            ));
        }
    }

    #[test]
    fn test_grid_too_large() {
        let err = OccupancyGrid::full(101, 1_000_000).unwrap_err();
        match err {
            CarveError::GridTooLarge {
                resolution,
                total,
                max,
            } => {
                assert_eq!(resolution, 101);
                assert_eq!(total, 1_030_301);
                assert_eq!(max, 1_000_000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(OccupancyGrid::full(100, 1_000_000).is_ok());
    }

    #[test]
    fn test_linearize_round_trip() {
        let grid = OccupancyGrid::full(7, 1_000).unwrap();
        assert_eq!(grid.linearize(1, 2, 3), (7 + 2) * 7 + 3);
        for idx in [0, 1, 48, 100, 342] {
            let [i, j, k] = grid.delinearize(idx);
            assert_eq!(grid.linearize(i, j, k), idx);
        }
    }

    #[test]
    fn test_coordinates_span_cube() {
        let grid = OccupancyGrid::full(5, 1_000).unwrap();
        let coords = grid.coordinates();
        assert_eq!(coords.len(), 5);
        assert_relative_eq!(coords[0], -1.0);
        assert_relative_eq!(coords[2], 0.0);
        assert_relative_eq!(coords[4], 1.0);
    }

    #[test]
    fn test_cell_center_follows_axis_order() {
        let grid = OccupancyGrid::full(5, 1_000).unwrap();
        let c = grid.cell_center(0, 2, 4);
        assert_relative_eq!(c.x, -1.0);
        assert_relative_eq!(c.y, 0.0);
        assert_relative_eq!(c.z, 1.0);
    }

    #[test]
    fn test_value_range_mixed() {
        let mut grid = OccupancyGrid::full(3, 1_000).unwrap();
        grid.set(1, 1, 1, false);
        assert_eq!(grid.value(1, 1, 1), 0.0);
        assert_eq!(grid.value(0, 1, 1), 1.0);
        assert_eq!(grid.value_range(), (0.0, 1.0));
        assert_eq!(grid.count_occupied(), 26);
    }

    #[test]
    fn test_occupied_points_use_resolution_divisor() {
        let mut grid = OccupancyGrid::full(4, 1_000).unwrap();
        grid.cells_mut().fill(false);
        grid.set(3, 0, 2, true);

        let points = grid.occupied_points();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].x, 0.5);
        assert_relative_eq!(points[0].y, -1.0);
        assert_relative_eq!(points[0].z, 0.0);
        assert!(!grid.is_empty());
    }
}
