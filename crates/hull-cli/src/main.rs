//! hull: reconstruct a 3D surface from six silhouette images.
//!
//! Each view image is thresholded into a binary silhouette, the silhouettes
//! are carved into a voxel grid over `[-1, 1]^3`, and the grid is contoured
//! into a triangle mesh with marching cubes.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=hull_carve=info` - Stage summaries
//! - `RUST_LOG=hull_carve=debug` - Per-view carving detail
//! - `RUST_LOG=hull_mesh::timing=info` - Performance timing
//!
//! # Example
//!
//! ```bash
//! hull reconstruct --dir photos/bonsai -o reconstruction_output --resolution 100
//! hull masks --front front.png --top top.png -o masks/
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
mod preprocess;

use commands::{carve, masks, reconstruct};

/// hull - Shape-from-silhouette reconstruction.
///
/// Reconstruct a closed mesh from front, back, left, right, top and bottom
/// silhouette images of an object.
#[derive(Parser)]
#[command(name = "hull")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Where to find the view images.
///
/// Explicit per-view paths win over files found in `--dir`.
#[derive(Args, Clone, Default)]
pub struct ViewInputs {
    /// Directory holding <view>.png (or .jpg, .jpeg, .bmp) images
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Front view image
    #[arg(long)]
    front: Option<PathBuf>,

    /// Back view image
    #[arg(long)]
    back: Option<PathBuf>,

    /// Left view image
    #[arg(long)]
    left: Option<PathBuf>,

    /// Right view image
    #[arg(long)]
    right: Option<PathBuf>,

    /// Top view image
    #[arg(long)]
    top: Option<PathBuf>,

    /// Bottom view image
    #[arg(long)]
    bottom: Option<PathBuf>,
}

/// Silhouette extraction settings.
#[derive(Args, Clone)]
pub struct PreprocessArgs {
    /// Gray level above which a pixel is background
    #[arg(long, default_value = "127")]
    threshold: u8,

    /// Side of the square structuring element for closing and opening
    /// (even sizes round up, 0 or 1 disables)
    #[arg(long, default_value = "5")]
    kernel: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a mesh from silhouette images
    Reconstruct {
        #[command(flatten)]
        inputs: ViewInputs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        /// Output directory
        #[arg(short, long, default_value = "reconstruction_output")]
        output: PathBuf,

        /// Mesh file name inside the output directory (format from extension)
        #[arg(long, default_value = "mesh.obj")]
        mesh_name: String,

        /// Voxel grid samples per axis
        #[arg(long, short, default_value = "100")]
        resolution: usize,

        /// Fail unless at least this many views are supplied
        #[arg(long, default_value = "0")]
        min_views: usize,

        /// Skip the voxel point cloud (voxels.ply)
        #[arg(long)]
        no_point_cloud: bool,

        /// Write the binary silhouettes as binary_<view>.png
        #[arg(long)]
        save_masks: bool,

        /// Keep the raw marching cubes output
        #[arg(long)]
        no_clean: bool,
    },

    /// Carve the voxel grid only and export it as a point cloud
    Carve {
        #[command(flatten)]
        inputs: ViewInputs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        /// Output PLY point cloud
        #[arg(short, long, default_value = "voxels.ply")]
        output: PathBuf,

        /// Voxel grid samples per axis
        #[arg(long, short, default_value = "100")]
        resolution: usize,

        /// Fail unless at least this many views are supplied
        #[arg(long, default_value = "0")]
        min_views: usize,
    },

    /// Threshold view images and write the binary silhouettes
    Masks {
        #[command(flatten)]
        inputs: ViewInputs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        /// Output directory for binary_<view>.png
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "hull_mesh=info,hull_carve=info,hull=info",
            2 => "hull_mesh=debug,hull_carve=debug,hull=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Reconstruct {
            inputs,
            preprocess,
            output,
            mesh_name,
            resolution,
            min_views,
            no_point_cloud,
            save_masks,
            no_clean,
        } => reconstruct::run(
            inputs,
            preprocess,
            output,
            mesh_name,
            *resolution,
            *min_views,
            !*no_point_cloud,
            *save_masks,
            !*no_clean,
            &cli,
        ),
        Commands::Carve {
            inputs,
            preprocess,
            output,
            resolution,
            min_views,
        } => carve::run(inputs, preprocess, output, *resolution, *min_views, &cli),
        Commands::Masks {
            inputs,
            preprocess,
            output,
        } => masks::run(inputs, preprocess, output, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(carve_err) = e.downcast_ref::<hull_carve::CarveError>() {
                eprintln!("{}: {}", "Error".red().bold(), carve_err);
                eprintln!("  {}: {}", "Code".cyan(), carve_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    carve_err.recovery_suggestion()
                );
            } else if let Some(mesh_err) = e.downcast_ref::<hull_mesh::MeshError>() {
                eprintln!("{}: {}", "Error".red().bold(), mesh_err);
                eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    mesh_err.recovery_suggestion()
                );
                if let Some(location) = mesh_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
