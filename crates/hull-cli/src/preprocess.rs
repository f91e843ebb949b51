//! Turning view images into silhouette masks.
//!
//! Each image is converted to 8-bit gray and inverse-thresholded, so a dark
//! object on a light background becomes foreground (255). Small speckle and
//! pinholes are then removed by a morphological closing followed by an
//! opening with a square structuring element.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tracing::{debug, info, warn};

use hull_carve::{SilhouetteMask, View, ViewSet};

use crate::{PreprocessArgs, ViewInputs};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Extensions probed, in order, when looking for `<view>.<ext>` in a directory.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Image path for every view that has one, in canonical view order.
pub fn resolve_inputs(inputs: &ViewInputs) -> Vec<(View, PathBuf)> {
    View::ALL
        .into_iter()
        .filter_map(|view| {
            let explicit = match view {
                View::Front => &inputs.front,
                View::Back => &inputs.back,
                View::Left => &inputs.left,
                View::Right => &inputs.right,
                View::Top => &inputs.top,
                View::Bottom => &inputs.bottom,
            };
            explicit
                .clone()
                .or_else(|| inputs.dir.as_deref().and_then(|dir| find_in_dir(dir, view)))
                .map(|path| (view, path))
        })
        .collect()
}

fn find_in_dir(dir: &Path, view: View) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", view.name(), ext)))
        .find(|path| path.is_file())
}

/// A view image after thresholding and morphology.
pub struct ProcessedView {
    pub view: View,
    pub source: PathBuf,
    pub binary: GrayImage,
}

impl ProcessedView {
    pub fn to_mask(&self) -> Result<SilhouetteMask> {
        let mask = SilhouetteMask::from_bytes(
            self.view,
            self.binary.height() as usize,
            self.binary.width() as usize,
            self.binary.as_raw(),
        )?;
        Ok(mask)
    }

    /// Write the binary image as `binary_<view>.png` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("binary_{}.png", self.view.name()));
        self.binary
            .save(&path)
            .with_context(|| format!("Failed to save silhouette to {:?}", path))?;
        debug!(view = %self.view, path = %path.display(), "Saved silhouette");
        Ok(path)
    }
}

/// Load and binarize one view image.
pub fn process_image(view: View, path: &Path, params: &PreprocessArgs) -> Result<ProcessedView> {
    let gray = image::open(path)
        .with_context(|| format!("Could not load {} image at {:?}", view, path))?
        .to_luma8();

    let mut binary = threshold_inverse(&gray, params.threshold);
    if params.kernel > 1 {
        binary = close(&binary, params.kernel);
        binary = open(&binary, params.kernel);
    }

    let foreground = binary.pixels().filter(|p| p[0] == FOREGROUND).count();
    if foreground == 0 {
        warn!(view = %view, "Silhouette is empty; this view will carve everything");
    }
    debug!(
        view = %view,
        width = binary.width(),
        height = binary.height(),
        foreground,
        "Processed view image"
    );

    Ok(ProcessedView {
        view,
        source: path.to_path_buf(),
        binary,
    })
}

/// Load every resolved view and assemble the masks.
pub fn load_views(
    inputs: &ViewInputs,
    params: &PreprocessArgs,
) -> Result<(ViewSet, Vec<ProcessedView>)> {
    let resolved = resolve_inputs(inputs);
    info!(
        views = ?resolved.iter().map(|(v, _)| v.name()).collect::<Vec<_>>(),
        threshold = params.threshold,
        kernel = params.kernel,
        "Loading view images"
    );

    let mut views = ViewSet::new();
    let mut processed = Vec::with_capacity(resolved.len());
    for (view, path) in resolved {
        let image = process_image(view, &path, params)?;
        views.insert(image.to_mask()?);
        processed.push(image);
    }

    info!(bounds = %views.bounds(), "Volume bounds");
    Ok((views, processed))
}

/// Pixels `> threshold` become background, the rest foreground.
pub fn threshold_inverse(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}

/// Dilation then erosion with a `kernel x kernel` square.
pub fn close(img: &GrayImage, kernel: usize) -> GrayImage {
    morphology::close(img, Norm::LInf, radius(kernel))
}

/// Erosion then dilation with a `kernel x kernel` square.
pub fn open(img: &GrayImage, kernel: usize) -> GrayImage {
    morphology::open(img, Norm::LInf, radius(kernel))
}

/// Chebyshev radius of a square of side `kernel`. Pixels outside the image
/// count as neither foreground nor background.
fn radius(kernel: usize) -> u8 {
    u8::try_from(kernel / 2).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params() -> PreprocessArgs {
        PreprocessArgs {
            threshold: 127,
            kernel: 5,
        }
    }

    /// White canvas with a dark square from `lo` to `hi` (exclusive).
    fn dark_square(size: u32, lo: u32, hi: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Luma([20])
            } else {
                Luma([230])
            }
        })
    }

    #[test]
    fn test_threshold_is_inverse() {
        let gray = GrayImage::from_raw(4, 1, vec![0, 127, 128, 255]).unwrap();
        let binary = threshold_inverse(&gray, 127);
        assert_eq!(binary.as_raw(), &vec![255, 255, 0, 0]);
    }

    #[test]
    fn test_open_removes_speckle() {
        let mut img = GrayImage::new(20, 20);
        img.put_pixel(10, 10, Luma([FOREGROUND]));
        img.put_pixel(11, 10, Luma([FOREGROUND]));
        let opened = open(&img, 5);
        assert!(opened.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_close_fills_pinhole() {
        let mut img = GrayImage::from_pixel(20, 20, Luma([FOREGROUND]));
        img.put_pixel(9, 9, Luma([BACKGROUND]));
        let closed = close(&img, 5);
        assert!(closed.pixels().all(|p| p[0] == FOREGROUND));
    }

    #[test]
    fn test_morphology_keeps_large_square() {
        let binary = threshold_inverse(&dark_square(30, 8, 22), 127);
        let cleaned = open(&close(&binary, 5), 5);
        assert_eq!(cleaned, binary);
    }

    #[test]
    fn test_border_foreground_survives_opening() {
        let img = GrayImage::from_pixel(8, 8, Luma([FOREGROUND]));
        assert_eq!(open(&img, 5), img);
    }

    #[test]
    fn test_kernel_side_maps_to_radius() {
        assert_eq!(radius(5), 2);
        assert_eq!(radius(4), 2);
        assert_eq!(radius(3), 1);
        assert_eq!(radius(1_000), u8::MAX);
    }

    #[test]
    fn test_opening_removes_blob_narrower_than_kernel() {
        // 4x4 blob: survives a 3x3 opening, not a 5x5 one
        let mut img = GrayImage::new(16, 16);
        for y in 6..10 {
            for x in 6..10 {
                img.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        assert_eq!(open(&img, 3), img);
        assert!(open(&img, 5).pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_resolve_prefers_explicit_paths() {
        let dir = TempDir::new().unwrap();
        for view in ["front", "top"] {
            dark_square(8, 2, 6).save(dir.path().join(format!("{view}.png"))).unwrap();
        }
        let explicit = dir.path().join("custom_top.png");

        let inputs = ViewInputs {
            dir: Some(dir.path().to_path_buf()),
            top: Some(explicit.clone()),
            ..ViewInputs::default()
        };
        let resolved = resolve_inputs(&inputs);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0], (View::Front, dir.path().join("front.png")));
        assert_eq!(resolved[1], (View::Top, explicit));
    }

    #[test]
    fn test_load_views_builds_masks() {
        let dir = TempDir::new().unwrap();
        dark_square(32, 8, 24).save(dir.path().join("front.png")).unwrap();
        dark_square(16, 4, 12).save(dir.path().join("left.png")).unwrap();

        let inputs = ViewInputs {
            dir: Some(dir.path().to_path_buf()),
            ..ViewInputs::default()
        };
        let (views, processed) = load_views(&inputs, &params()).unwrap();

        assert_eq!(views.views(), vec![View::Front, View::Left]);
        let front = views.get(View::Front).unwrap();
        assert_eq!((front.height(), front.width()), (32, 32));
        assert_eq!(front.foreground_count(), 16 * 16);
        assert!(front.is_foreground(8, 8));
        assert!(!front.is_foreground(7, 8));

        let saved = processed[1].save(dir.path()).unwrap();
        assert!(saved.ends_with("binary_left.png"));
        assert!(saved.is_file());
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let err = process_image(View::Back, Path::new("/nonexistent/back.png"), &params())
            .err()
            .unwrap();
        assert!(err.to_string().contains("back"));
    }
}
