//! hull carve command - images to voxel point cloud.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use hull_carve::{CarveParams, carve_views};
use hull_mesh::save_point_cloud_ply;

use super::BoundsInfo;
use crate::{Cli, OutputFormat, PreprocessArgs, ViewInputs, output, preprocess};

#[derive(Serialize)]
struct ViewCarveInfo {
    view: String,
    cleared: usize,
}

#[derive(Serialize)]
struct CarveResult {
    output: String,
    bounds: BoundsInfo,
    resolution: usize,
    filled_voxels: usize,
    total_voxels: usize,
    views: Vec<ViewCarveInfo>,
}

pub fn run(
    inputs: &ViewInputs,
    preprocess_args: &PreprocessArgs,
    output_path: &Path,
    resolution: usize,
    min_views: usize,
    cli: &Cli,
) -> Result<()> {
    let (views, _) = preprocess::load_views(inputs, preprocess_args)?;

    let params = CarveParams {
        resolution,
        min_views,
        ..CarveParams::default()
    };
    let carved = carve_views(&views, &params)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    save_point_cloud_ply(&carved.grid.occupied_points(), output_path)?;

    let result = CarveResult {
        output: output_path.display().to_string(),
        bounds: views.bounds().into(),
        resolution,
        filled_voxels: carved.stats.occupied,
        total_voxels: carved.stats.total_voxels,
        views: carved
            .stats
            .views
            .iter()
            .map(|v| ViewCarveInfo {
                view: v.view.name().to_string(),
                cleared: v.cleared,
            })
            .collect(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Point cloud saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!(
                    "  {}: {}^3, {} of {} filled ({:.1}%)",
                    "Grid".cyan(),
                    resolution,
                    result.filled_voxels,
                    result.total_voxels,
                    carved.stats.fill_ratio() * 100.0
                );
                for v in &result.views {
                    println!("  {:>8}: cleared {}", v.view.cyan(), v.cleared);
                }
            }
        }
    }

    Ok(())
}
