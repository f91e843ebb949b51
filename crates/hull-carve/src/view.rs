//! The six canonical orthographic views and their projection rules.
//!
//! Each view looks at the canonical cube `[-1, 1]^3` along one axis. A mask
//! row is driven by one grid axis and a mask column by another, each either
//! ascending (`(c + 1) / 2`) or descending (`(1 - c) / 2`), scaled to the
//! mask extent minus one and rounded half-to-even:
//!
//! | view | row | column |
//! |---|---|---|
//! | front, back | `y` ascending | `z` descending |
//! | top, bottom | `z` descending | `x` ascending |
//! | left, right | `y` ascending | `x` ascending |
//!
//! Opposite views share a rule, so a back mask is carved exactly as if it
//! were a front mask.

use std::fmt;
use std::str::FromStr;

use crate::error::CarveError;

/// A grid axis. `X` runs along the first grid index `i`, `Y` along `j`,
/// `Z` along `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Position of this axis in an `(i, j, k)` / `(x, y, z)` triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// How one grid axis maps onto one mask dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRule {
    pub axis: Axis,
    /// `true` maps `c = 1` to pixel 0.
    pub descending: bool,
}

impl AxisRule {
    const fn ascending(axis: Axis) -> Self {
        Self {
            axis,
            descending: false,
        }
    }

    const fn descending(axis: Axis) -> Self {
        Self {
            axis,
            descending: true,
        }
    }

    /// Pixel index along a mask dimension of size `extent`, before bounds
    /// checking. May be negative or `>= extent` for coordinates outside
    /// `[-1, 1]`.
    #[inline]
    pub fn pixel(self, coord: f64, extent: usize) -> i64 {
        let t = if self.descending {
            (1.0 - coord) / 2.0
        } else {
            (coord + 1.0) / 2.0
        };
        (t * extent.saturating_sub(1) as f64).round_ties_even() as i64
    }
}

/// One of the six axis-aligned silhouette views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum View {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl View {
    /// All views in canonical order.
    pub const ALL: [View; 6] = [
        View::Front,
        View::Back,
        View::Left,
        View::Right,
        View::Top,
        View::Bottom,
    ];

    /// Lowercase name, as used in file names and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::Left => "left",
            View::Right => "right",
            View::Top => "top",
            View::Bottom => "bottom",
        }
    }

    /// Rule for the mask row.
    pub fn row_rule(self) -> AxisRule {
        match self {
            View::Front | View::Back | View::Left | View::Right => AxisRule::ascending(Axis::Y),
            View::Top | View::Bottom => AxisRule::descending(Axis::Z),
        }
    }

    /// Rule for the mask column.
    pub fn col_rule(self) -> AxisRule {
        match self {
            View::Front | View::Back => AxisRule::descending(Axis::Z),
            View::Top | View::Bottom | View::Left | View::Right => AxisRule::ascending(Axis::X),
        }
    }

    /// Unchecked pixel coordinate `(row, col)` of a point.
    #[inline]
    pub fn pixel(self, point: [f64; 3], height: usize, width: usize) -> (i64, i64) {
        let row_rule = self.row_rule();
        let col_rule = self.col_rule();
        (
            row_rule.pixel(point[row_rule.axis.index()], height),
            col_rule.pixel(point[col_rule.axis.index()], width),
        )
    }

    /// Project a point in `[-1, 1]^3` onto a `height x width` mask.
    ///
    /// Returns `None` when the pixel falls outside the mask.
    ///
    /// ```
    /// use hull_carve::View;
    ///
    /// // Front: row follows y, column follows z reversed
    /// assert_eq!(View::Front.project([0.0, -1.0, 1.0], 64, 64), Some((0, 0)));
    /// assert_eq!(View::Front.project([0.0, 1.0, -1.0], 64, 64), Some((63, 63)));
    /// assert_eq!(View::Top.project([0.0, 0.0, 1.5], 64, 64), None);
    /// ```
    #[inline]
    pub fn project(self, point: [f64; 3], height: usize, width: usize) -> Option<(usize, usize)> {
        let (row, col) = self.pixel(point, height, width);
        let in_bounds = row >= 0 && (row as usize) < height && col >= 0 && (col as usize) < width;
        in_bounds.then_some((row as usize, col as usize))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = CarveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        View::ALL
            .into_iter()
            .find(|view| view.name() == lower)
            .ok_or_else(|| CarveError::unknown_view(s))
    }
}
