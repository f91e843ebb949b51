//! Silhouette masks and the set of views handed to the carver.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{CarveError, CarveResult};
use crate::view::View;

/// Binary occupancy mask for one view. `true` is foreground.
///
/// Pixels are stored row-major. A mask is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilhouetteMask {
    view: View,
    height: usize,
    width: usize,
    data: Vec<bool>,
}

impl SilhouetteMask {
    /// Build a mask from row-major booleans.
    ///
    /// Fails with [`CarveError::InconsistentMask`] if either dimension is
    /// zero or `data.len() != height * width`.
    pub fn from_bools(view: View, height: usize, width: usize, data: Vec<bool>) -> CarveResult<Self> {
        if height == 0 || width == 0 {
            return Err(CarveError::inconsistent_mask(
                view.name(),
                height,
                width,
                "mask has zero dimensions",
            ));
        }
        if data.len() != height * width {
            return Err(CarveError::inconsistent_mask(
                view.name(),
                height,
                width,
                format!("expected {} pixels, got {}", height * width, data.len()),
            ));
        }
        Ok(Self {
            view,
            height,
            width,
            data,
        })
    }

    /// Build a mask from row-major bytes; any nonzero byte is foreground.
    pub fn from_bytes(view: View, height: usize, width: usize, bytes: &[u8]) -> CarveResult<Self> {
        Self::from_bools(view, height, width, bytes.iter().map(|&b| b != 0).collect())
    }

    /// Build a mask by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(
        view: View,
        height: usize,
        width: usize,
        mut f: impl FnMut(usize, usize) -> bool,
    ) -> CarveResult<Self> {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self::from_bools(view, height, width, data)
    }

    /// A mask that is foreground everywhere.
    pub fn full(view: View, height: usize, width: usize) -> CarveResult<Self> {
        Self::from_bools(view, height, width, vec![true; height * width])
    }

    /// A mask that is background everywhere.
    pub fn empty(view: View, height: usize, width: usize) -> CarveResult<Self> {
        Self::from_bools(view, height, width, vec![false; height * width])
    }

    #[inline]
    pub fn view(&self) -> View {
        self.view
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Foreground test. Panics if `(row, col)` is outside the mask.
    #[inline]
    pub fn is_foreground(&self, row: usize, col: usize) -> bool {
        self.data[row * self.width + col]
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&p| p).count()
    }

    /// Row-major pixel data.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }
}

/// The masks available for one reconstruction, at most one per view.
///
/// Any subset of views is legal; absent views do not carve. Iteration is
/// always in canonical view order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet {
    masks: BTreeMap<View, SilhouetteMask>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mask under its own view, returning any mask it replaces.
    pub fn insert(&mut self, mask: SilhouetteMask) -> Option<SilhouetteMask> {
        debug!(
            view = %mask.view(),
            height = mask.height(),
            width = mask.width(),
            foreground = mask.foreground_count(),
            "Adding silhouette"
        );
        self.masks.insert(mask.view(), mask)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, mask: SilhouetteMask) -> Self {
        self.insert(mask);
        self
    }

    pub fn remove(&mut self, view: View) -> Option<SilhouetteMask> {
        self.masks.remove(&view)
    }

    pub fn get(&self, view: View) -> Option<&SilhouetteMask> {
        self.masks.get(&view)
    }

    pub fn contains(&self, view: View) -> bool {
        self.masks.contains_key(&view)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Masks in canonical view order.
    pub fn iter(&self) -> impl Iterator<Item = &SilhouetteMask> {
        self.masks.values()
    }

    /// Views present, in canonical order.
    pub fn views(&self) -> Vec<View> {
        self.masks.keys().copied().collect()
    }

    /// Views absent, in canonical order.
    pub fn missing(&self) -> Vec<View> {
        View::ALL
            .into_iter()
            .filter(|view| !self.contains(*view))
            .collect()
    }

    /// Fail with [`CarveError::MissingRequiredViews`] if fewer than
    /// `required` views are present.
    pub fn require_at_least(&self, required: usize) -> CarveResult<()> {
        if self.len() >= required {
            return Ok(());
        }
        Err(CarveError::MissingRequiredViews {
            present: self.len(),
            required,
            missing: self
                .missing()
                .into_iter()
                .map(|v| v.name().to_string())
                .collect(),
        })
    }

    /// Nominal object extents derived from the mask sizes.
    pub fn bounds(&self) -> VolumeBounds {
        VolumeBounds::from_views(self)
    }
}

impl FromIterator<SilhouetteMask> for ViewSet {
    fn from_iter<I: IntoIterator<Item = SilhouetteMask>>(iter: I) -> Self {
        let mut set = ViewSet::new();
        for mask in iter {
            set.insert(mask);
        }
        set
    }
}

/// Pixel extents of the object along each world axis, taken as the largest
/// mask dimension that spans that axis.
///
/// Purely diagnostic: the carving grid always spans `[-1, 1]^3`. Axes that
/// no present view spans report `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeBounds {
    /// From front/back/top/bottom widths.
    pub width: usize,
    /// From front/back/left/right heights.
    pub height: usize,
    /// From left/right widths and top/bottom heights.
    pub depth: usize,
}

impl VolumeBounds {
    pub fn from_views(views: &ViewSet) -> Self {
        let max_of = |picks: &[(View, fn(&SilhouetteMask) -> usize)]| {
            picks
                .iter()
                .filter_map(|(view, dim)| views.get(*view).map(dim))
                .max()
                .unwrap_or(0)
        };

        let width_of: fn(&SilhouetteMask) -> usize = SilhouetteMask::width;
        let height_of: fn(&SilhouetteMask) -> usize = SilhouetteMask::height;

        Self {
            width: max_of(&[
                (View::Front, width_of),
                (View::Back, width_of),
                (View::Top, width_of),
                (View::Bottom, width_of),
            ]),
            height: max_of(&[
                (View::Front, height_of),
                (View::Back, height_of),
                (View::Left, height_of),
                (View::Right, height_of),
            ]),
            depth: max_of(&[
                (View::Left, width_of),
                (View::Right, width_of),
                (View::Top, height_of),
                (View::Bottom, height_of),
            ]),
        }
    }
}

impl fmt::Display for VolumeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {} (width x height x depth)",
            self.width, self.height, self.depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_nonzero_is_foreground() {
        let mask = SilhouetteMask::from_bytes(View::Front, 2, 3, &[0, 255, 1, 0, 0, 7]).unwrap();
        assert!(!mask.is_foreground(0, 0));
        assert!(mask.is_foreground(0, 1));
        assert!(mask.is_foreground(0, 2));
        assert!(mask.is_foreground(1, 2));
        assert_eq!(mask.foreground_count(), 3);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = SilhouetteMask::from_bools(View::Left, 0, 10, vec![]).unwrap_err();
        match err {
            CarveError::InconsistentMask {
                view,
                height,
                width,
                ..
            } => {
                assert_eq!(view, "left");
                assert_eq!((height, width), (0, 10));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = SilhouetteMask::from_bytes(View::Top, 4, 4, &[0; 15]).unwrap_err();
        assert!(err.to_string().contains("expected 16 pixels, got 15"));
    }

    #[test]
    fn test_viewset_replaces_and_orders() {
        let mut set = ViewSet::new();
        set.insert(SilhouetteMask::full(View::Top, 2, 2).unwrap());
        set.insert(SilhouetteMask::full(View::Front, 2, 2).unwrap());
        let replaced = set.insert(SilhouetteMask::empty(View::Top, 3, 3).unwrap());

        assert!(replaced.is_some());
        assert_eq!(set.len(), 2);
        assert_eq!(set.views(), vec![View::Front, View::Top]);
        assert_eq!(set.get(View::Top).unwrap().height(), 3);
    }

    #[test]
    fn test_require_at_least() {
        let set: ViewSet = [SilhouetteMask::full(View::Front, 2, 2).unwrap()]
            .into_iter()
            .collect();
        assert!(set.require_at_least(0).is_ok());
        assert!(set.require_at_least(1).is_ok());

        let err = set.require_at_least(2).unwrap_err();
        match err {
            CarveError::MissingRequiredViews {
                present,
                required,
                missing,
            } => {
                assert_eq!((present, required), (1, 2));
                assert_eq!(missing, vec!["back", "left", "right", "top", "bottom"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_volume_bounds_from_axis_groups() {
        let set = ViewSet::new()
            .with(SilhouetteMask::full(View::Front, 40, 30).unwrap())
            .with(SilhouetteMask::full(View::Left, 45, 20).unwrap())
            .with(SilhouetteMask::full(View::Top, 25, 35).unwrap());

        let bounds = set.bounds();
        assert_eq!(bounds.width, 35);
        assert_eq!(bounds.height, 45);
        assert_eq!(bounds.depth, 25);
    }

    #[test]
    fn test_volume_bounds_without_views() {
        assert_eq!(ViewSet::new().bounds(), VolumeBounds::default());
    }
}
