//! Subcommand implementations.

pub mod carve;
pub mod masks;
pub mod reconstruct;

use serde::Serialize;

use hull_carve::VolumeBounds;

/// Volume bounds as reported in command output.
#[derive(Serialize)]
pub struct BoundsInfo {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl From<VolumeBounds> for BoundsInfo {
    fn from(bounds: VolumeBounds) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            depth: bounds.depth,
        }
    }
}
