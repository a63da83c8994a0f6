//! Example: coarse-to-fine warping of an image pyramid.
//!
//! Loads an image, builds its pyramid, synthesizes a flow pyramid from a
//! residual that is non-zero only at the coarsest level, warps every level
//! by its flow and stacks the warped levels with the originals, as the
//! fusion stage of an interpolator would.
//!
//! A JSON summary of the per-level shapes and warp residuals is written next
//! to the input image.
//!
//! Run from the workspace root:
//!   cargo run -p film-kit --example pyramid_warp -- --help
//!   cargo run -p film-kit --example pyramid_warp -- --input frame.png

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use film_kit::{
    LoadConfig, Pyramid, PyramidConfig, build_image_pyramid, concatenate_pyramids,
    flow_pyramid_synthesis, load_image_with, nhwc_to_nchw, pyramid_warp,
};
use ndarray::{Array4, s};
use serde::Serialize;
use tracing::info;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Warp an image pyramid by a synthesized flow pyramid")]
struct Args {
    /// Input image
    #[arg(long)]
    input: PathBuf,

    /// Number of pyramid levels
    #[arg(long, default_value_t = PyramidConfig::default().levels)]
    levels: usize,

    /// Stride alignment applied when loading
    #[arg(long, default_value_t = LoadConfig::default().align)]
    align: usize,

    /// Horizontal flow at the coarsest level, in coarsest-level pixels
    #[arg(long, default_value_t = 0.5)]
    dx: f32,

    /// Vertical flow at the coarsest level, in coarsest-level pixels
    #[arg(long, default_value_t = 0.0)]
    dy: f32,

    /// Output JSON path (default: <input stem>_pyramid_warp.json next to input)
    #[arg(long)]
    out: Option<PathBuf>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LevelDto {
    level: usize,
    height: usize,
    width: usize,
    flow_dx: f32,
    flow_dy: f32,
    fused_channels: usize,
    mean_abs_change: f32,
}

#[derive(Serialize)]
struct SummaryDto {
    input: String,
    crop: [usize; 4],
    levels: Vec<LevelDto>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.levels == 0 {
        bail!("--levels must be at least 1");
    }

    let config = LoadConfig { align: args.align };
    let (batch, crop) = load_image_with(&args.input, &config)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let image = nhwc_to_nchw(batch.view());
    info!(shape = ?image.dim(), ?crop, "loaded");

    let pyramid = build_image_pyramid(image.view(), args.levels).context("building image pyramid")?;

    let residuals: Pyramid = pyramid
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let (b, _, h, w) = level.dim();
            let mut r = Array4::<f32>::zeros((b, 2, h, w));
            if i + 1 == args.levels {
                r.slice_mut(s![.., 0, .., ..]).fill(args.dx);
                r.slice_mut(s![.., 1, .., ..]).fill(args.dy);
            }
            r
        })
        .collect();
    let flows = flow_pyramid_synthesis(&residuals).context("synthesizing flow pyramid")?;

    let warped = pyramid_warp(&pyramid, &flows).context("warping pyramid")?;
    let fused = concatenate_pyramids(&pyramid, &warped).context("stacking pyramids")?;

    let mut levels = Vec::with_capacity(fused.num_levels());
    for (i, ((orig, moved), stacked)) in pyramid.iter().zip(&warped).zip(&fused).enumerate() {
        let (_, _, height, width) = orig.dim();
        let flow = flows.level(i).context("flow level")?;
        let change = (orig - moved).mapv(f32::abs).mean().unwrap_or(0.0);
        info!(level = i, height, width, mean_abs_change = change, "warped");
        levels.push(LevelDto {
            level: i,
            height,
            width,
            flow_dx: flow[[0, 0, 0, 0]],
            flow_dy: flow[[0, 1, 0, 0]],
            fused_channels: stacked.dim().1,
            mean_abs_change: change,
        });
    }

    let out_path = args.out.clone().unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        args.input.with_file_name(format!("{stem}_pyramid_warp.json"))
    });

    let summary = SummaryDto {
        input: args.input.display().to_string(),
        crop: crop.to_array(),
        levels,
    };
    let bytes = serde_json::to_vec_pretty(&summary).context("serializing summary")?;
    std::fs::write(&out_path, bytes).with_context(|| format!("writing {}", out_path.display()))?;
    println!("Summary written to {}", out_path.display());

    Ok(())
}
