//! hull reconstruct command - images to mesh.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use hull_carve::HullBuilder;
use hull_mesh::{CleanParams, save_point_cloud_ply};

use super::BoundsInfo;
use crate::{Cli, OutputFormat, PreprocessArgs, ViewInputs, output, preprocess};

#[derive(Serialize)]
struct ReconstructResult {
    output_dir: String,
    mesh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    point_cloud: Option<String>,
    views: Vec<String>,
    bounds: BoundsInfo,
    resolution: usize,
    filled_voxels: usize,
    total_voxels: usize,
    raw_vertices: usize,
    raw_faces: usize,
    vertices: usize,
    faces: usize,
    closed_manifold: bool,
    euler_characteristic: i64,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    inputs: &ViewInputs,
    preprocess_args: &PreprocessArgs,
    output_dir: &Path,
    mesh_name: &str,
    resolution: usize,
    min_views: usize,
    point_cloud: bool,
    save_masks: bool,
    clean: bool,
    cli: &Cli,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    output::info("Loading and processing images...", cli.format, cli.quiet);
    let (views, processed) = preprocess::load_views(inputs, preprocess_args)?;
    if views.is_empty() {
        output::warning(
            "No view images found; the grid will stay fully occupied",
            cli.format,
            cli.quiet,
        );
    }
    if save_masks {
        for image in &processed {
            image.save(output_dir)?;
        }
    }

    output::info(
        &format!("Carving {}^3 voxel grid from {} view(s)...", resolution, views.len()),
        cli.format,
        cli.quiet,
    );
    let mut builder = HullBuilder::new(&views)
        .resolution(resolution)
        .min_views(min_views);
    if !clean {
        builder = builder.clean_params(CleanParams::disabled());
    }
    let result = builder.build()?;

    let point_cloud_path = if point_cloud {
        let path = output_dir.join("voxels.ply");
        save_point_cloud_ply(&result.grid.occupied_points(), &path)?;
        Some(path)
    } else {
        None
    };

    let mesh_path = output_dir.join(mesh_name);
    result
        .mesh
        .save(&mesh_path)
        .with_context(|| format!("Failed to save mesh to {:?}", mesh_path))?;

    if result.mesh.is_empty() {
        output::warning(
            "Extracted mesh is empty (the carved grid is uniform)",
            cli.format,
            cli.quiet,
        );
    }

    let validation = result.validation.as_ref();
    let report = ReconstructResult {
        output_dir: output_dir.display().to_string(),
        mesh: mesh_path.display().to_string(),
        point_cloud: point_cloud_path.as_ref().map(|p| p.display().to_string()),
        views: views.views().iter().map(|v| v.name().to_string()).collect(),
        bounds: views.bounds().into(),
        resolution,
        filled_voxels: result.stats.carve.occupied,
        total_voxels: result.stats.carve.total_voxels,
        raw_vertices: result.stats.raw_vertices,
        raw_faces: result.stats.raw_faces,
        vertices: result.stats.vertices,
        faces: result.stats.faces,
        closed_manifold: validation.is_some_and(|v| v.is_closed_manifold()),
        euler_characteristic: validation.map_or(0, |v| v.euler_characteristic),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Mesh saved to {}", mesh_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!(
                    "  {}: {} x {} x {}",
                    "Bounds".cyan(),
                    report.bounds.width,
                    report.bounds.height,
                    report.bounds.depth
                );
                println!(
                    "  {}: {} of {} filled",
                    "Voxels".cyan(),
                    report.filled_voxels,
                    report.total_voxels
                );
                println!(
                    "  {}: {} vertices, {} triangles",
                    "Mesh".cyan(),
                    report.vertices,
                    report.faces
                );
                println!("  {}: {}", "Cleanup".cyan(), result.clean_report);
                if let Some(v) = validation {
                    let status = if v.is_closed_manifold() {
                        "closed manifold".green()
                    } else {
                        "open or non-manifold".yellow()
                    };
                    println!(
                        "  {}: {} (Euler characteristic {})",
                        "Topology".cyan(),
                        status,
                        v.euler_characteristic
                    );
                }
                if let Some(ref path) = report.point_cloud {
                    println!("  {}: {}", "Point cloud".cyan(), path);
                }
            }
        }
    }

    Ok(())
}
