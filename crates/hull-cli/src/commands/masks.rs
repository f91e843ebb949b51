//! hull masks command - write binary silhouettes.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use super::BoundsInfo;
use crate::{Cli, OutputFormat, PreprocessArgs, ViewInputs, output, preprocess};

#[derive(Serialize)]
struct MaskInfo {
    view: String,
    source: String,
    output: String,
    width: u32,
    height: u32,
    foreground: usize,
}

#[derive(Serialize)]
struct MasksResult {
    masks: Vec<MaskInfo>,
    bounds: BoundsInfo,
}

pub fn run(
    inputs: &ViewInputs,
    preprocess_args: &PreprocessArgs,
    output_dir: &Path,
    cli: &Cli,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let (views, processed) = preprocess::load_views(inputs, preprocess_args)?;
    if processed.is_empty() {
        output::warning("No view images found", cli.format, cli.quiet);
    }

    let mut masks = Vec::with_capacity(processed.len());
    for image in &processed {
        let path = image.save(output_dir)?;
        let foreground = views
            .get(image.view)
            .map_or(0, |mask| mask.foreground_count());
        masks.push(MaskInfo {
            view: image.view.name().to_string(),
            source: image.source.display().to_string(),
            output: path.display().to_string(),
            width: image.binary.width(),
            height: image.binary.height(),
            foreground,
        });
    }

    let result = MasksResult {
        masks,
        bounds: views.bounds().into(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                for m in &result.masks {
                    let total = (m.width * m.height) as f64;
                    println!(
                        "  {:>8}: {}x{}, {:.1}% foreground -> {}",
                        m.view.cyan(),
                        m.width,
                        m.height,
                        m.foreground as f64 / total * 100.0,
                        m.output
                    );
                }
                output::success(
                    &format!(
                        "Wrote {} silhouette(s), bounds {} x {} x {}",
                        result.masks.len(),
                        result.bounds.width,
                        result.bounds.height,
                        result.bounds.depth
                    ),
                    cli.format,
                    cli.quiet,
                );
            }
        }
    }

    Ok(())
}
