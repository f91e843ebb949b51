//! Visual hull reconstruction from six axis-aligned silhouettes.
//!
//! Given binary masks for any subset of the views front, back, left, right,
//! top and bottom, this crate carves a dense occupancy grid over the cube
//! `[-1, 1]^3` and contours it into a closed triangle mesh.
//!
//! # Features
//!
//! - **Projection**: fixed per-view axis, sign and scale rules ([`View`])
//! - **Carving**: monotonic, order-independent clearing of a flat voxel
//!   arena, parallel over grid slabs ([`carve_views`])
//! - **Extraction**: table-driven marching cubes with shared edge vertices
//!   and gradient normals ([`extract_isosurface`])
//! - **Builder API**: carve, extract, clean and validate in one call
//!   ([`HullBuilder`])
//!
//! # Quick Start
//!
//! ```
//! use hull_carve::{HullBuilder, SilhouetteMask, View, ViewSet};
//!
//! let square = |view| {
//!     SilhouetteMask::from_fn(view, 20, 20, |r, c| {
//!         (4..16).contains(&r) && (4..16).contains(&c)
//!     })
//!     .unwrap()
//! };
//! let views: ViewSet = View::ALL.into_iter().map(square).collect();
//!
//! let result = HullBuilder::new(&views).resolution(16).build().unwrap();
//! assert!(result.validation.unwrap().is_closed_manifold());
//! ```
//!
//! # Low-Level API
//!
//! ```
//! use hull_carve::{CarveParams, SilhouetteMask, View, ViewSet, carve_views, extract_isosurface};
//!
//! let views = ViewSet::new().with(SilhouetteMask::full(View::Top, 16, 16).unwrap());
//! let output = carve_views(&views, &CarveParams::default().with_resolution(20)).unwrap();
//!
//! // Nothing was carved, so there is no surface.
//! let mesh = extract_isosurface(&output.grid);
//! assert!(mesh.is_empty());
//! ```

mod builder;
mod carve;
mod error;
mod extract;
mod grid;
mod mask;
mod view;

pub use error::{CarveError, CarveErrorCode, CarveRecoverySuggestion, CarveResult};

// Builder API (recommended)
pub use builder::{HullBuilder, HullResult, HullStats};

// Views and masks
pub use mask::{SilhouetteMask, ViewSet, VolumeBounds};
pub use view::{Axis, AxisRule, View};

// Carving
pub use carve::{
    CarveOutput, CarveParams, CarveStats, ViewCarveStats, carve_view, carve_views,
    carve_views_with_progress,
};
pub use grid::{MIN_RESOLUTION, OccupancyGrid};

// Extraction
pub use extract::{ISOVALUE, extract_isosurface, marching_cubes, rescale_to_cube};
