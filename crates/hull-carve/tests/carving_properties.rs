//! Property-based tests for silhouette carving.
//!
//! Run with: cargo test -p hull-carve --test carving_properties

use hull_carve::{CarveParams, OccupancyGrid, SilhouetteMask, View, ViewSet, carve_view, carve_views};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_view() -> impl Strategy<Value = View> {
    prop::sample::select(View::ALL.to_vec())
}

/// A random mask of up to 12 x 12 pixels, biased towards foreground.
fn arb_mask() -> impl Strategy<Value = SilhouetteMask> {
    (arb_view(), 1usize..=12, 1usize..=12).prop_flat_map(|(view, h, w)| {
        prop::collection::vec(prop::bool::weighted(0.7), h * w)
            .prop_map(move |data| SilhouetteMask::from_bools(view, h, w, data).unwrap())
    })
}

fn arb_masks() -> impl Strategy<Value = Vec<SilhouetteMask>> {
    prop::collection::vec(arb_mask(), 0..=6)
}

fn params(resolution: usize, parallel: bool) -> CarveParams {
    CarveParams {
        resolution,
        parallel,
        ..CarveParams::default()
    }
}

/// Carve masks one at a time in the given order, without a `ViewSet`.
fn carve_in_order(masks: &[SilhouetteMask], resolution: usize) -> OccupancyGrid {
    let mut grid = OccupancyGrid::full(resolution, usize::MAX).unwrap();
    let coords = grid.coordinates();
    for mask in masks {
        carve_view(&mut grid, mask, &coords, false);
    }
    grid
}

fn is_subset(inner: &OccupancyGrid, outer: &OccupancyGrid) -> bool {
    inner
        .cells()
        .iter()
        .zip(outer.cells())
        .all(|(&a, &b)| !a || b)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Each view only ever clears cells.
    #[test]
    fn proptest_carving_is_monotonic(masks in arb_masks(), res in 2usize..10) {
        let mut grid = OccupancyGrid::full(res, usize::MAX).unwrap();
        let coords = grid.coordinates();
        for mask in &masks {
            let before = grid.clone();
            let cleared = carve_view(&mut grid, mask, &coords, true);
            prop_assert!(is_subset(&grid, &before));
            prop_assert_eq!(before.count_occupied() - grid.count_occupied(), cleared);
        }
    }

    /// The carved grid does not depend on the order views are applied in.
    #[test]
    fn proptest_carving_is_order_independent(masks in arb_masks(), res in 2usize..10) {
        let forward = carve_in_order(&masks, res);
        let mut reversed_masks = masks.clone();
        reversed_masks.reverse();
        let reversed = carve_in_order(&reversed_masks, res);
        prop_assert_eq!(forward, reversed);
    }

    /// Removing a view never removes occupancy.
    #[test]
    fn proptest_subset_is_superset(masks in arb_masks(), res in 2usize..10, drop in arb_view()) {
        let views: ViewSet = masks.into_iter().collect();
        let mut fewer = views.clone();
        fewer.remove(drop);

        let all = carve_views(&views, &params(res, true)).unwrap();
        let subset = carve_views(&fewer, &params(res, true)).unwrap();
        prop_assert!(is_subset(&all.grid, &subset.grid));
    }

    /// An all-foreground view changes nothing.
    #[test]
    fn proptest_full_view_is_identity(
        masks in arb_masks(),
        res in 2usize..10,
        view in arb_view(),
        (h, w) in (1usize..=12, 1usize..=12),
    ) {
        let mut views: ViewSet = masks.into_iter().collect();
        views.remove(view);
        let without = carve_views(&views, &params(res, false)).unwrap();

        views.insert(SilhouetteMask::full(view, h, w).unwrap());
        let with = carve_views(&views, &params(res, false)).unwrap();

        prop_assert_eq!(without.grid, with.grid);
    }

    /// Sequential and parallel carving agree.
    #[test]
    fn proptest_parallel_matches_sequential(masks in arb_masks(), res in 2usize..10) {
        let views: ViewSet = masks.into_iter().collect();
        let parallel = carve_views(&views, &params(res, true)).unwrap();
        let sequential = carve_views(&views, &params(res, false)).unwrap();
        prop_assert_eq!(parallel.grid, sequential.grid);
        prop_assert_eq!(parallel.stats, sequential.stats);
    }
}

#[test]
fn test_cell_on_background_pixel_is_cleared() {
    // A single background pixel in the centre of a 3x3 front mask clears
    // exactly the row of cells through y = 0, z = 0.
    let mask = SilhouetteMask::from_fn(View::Front, 3, 3, |r, c| (r, c) != (1, 1)).unwrap();
    let grid = carve_in_order(&[mask], 5);

    for i in 0..5 {
        for j in 0..5 {
            for k in 0..5 {
                let expected = !(j == 2 && k == 2);
                assert_eq!(grid.get(i, j, k), expected, "cell ({i}, {j}, {k})");
            }
        }
    }
}
