use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fk_core::{CropRegion, crop_batch, nchw_to_nhwc, nhwc_to_nchw};
use fk_io::{DEFAULT_ALIGN, load_image};
use fk_pyr::{Pyramid, PyramidConfig, build_image_pyramid, flow_pyramid_synthesis};
use fk_warp::warp;
use image::RgbImage;
use ndarray::{Array4, ArrayView4, Axis};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fk_gallery")]
#[command(about = "Run film-kit primitives on external images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "pyramid")]
    Pyramid(PyramidArgs),
    #[command(name = "warp")]
    Warp(WarpArgs),
    #[command(name = "synthesis")]
    Synthesis(SynthesisArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
    #[arg(long, default_value_t = DEFAULT_ALIGN)]
    align: usize,
}

#[derive(Args, Debug, Clone)]
struct PyramidArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = PyramidConfig::default().levels)]
    levels: usize,
}

#[derive(Args, Debug, Clone)]
struct WarpArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 1.0)]
    dx: f32,
    #[arg(long, default_value_t = 0.0)]
    dy: f32,
}

#[derive(Args, Debug, Clone)]
struct SynthesisArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = PyramidConfig::default().levels)]
    levels: usize,
    /// Horizontal residual at the coarsest level
    #[arg(long, default_value_t = 1.0)]
    dx: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaPyramid {
    requested_levels: usize,
    built_levels: usize,
    level_sizes: Vec<[usize; 2]>,
    crop: [usize; 4],
    policy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct MetaWarp {
    dx: f32,
    dy: f32,
    border: &'static str,
    crop: [usize; 4],
    mean_abs_change: f32,
}

#[derive(Debug, Clone, Serialize)]
struct FlowLevelDto {
    height: usize,
    width: usize,
    dx_min: f32,
    dx_max: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSynthesis {
    coarsest_dx: f32,
    levels: Vec<FlowLevelDto>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Pyramid(args) => run_pyramid(args),
        Command::Warp(args) => run_warp(args),
        Command::Synthesis(args) => run_synthesis(args),
    }
}

fn run_pyramid(args: PyramidArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "pyramid")?;
    let (image, crop) = load_input(&args.common)?;

    let pyr = build_image_pyramid(image.view(), args.levels)
        .with_context(|| format!("building {}-level pyramid", args.levels))?;

    let mut sizes = Vec::new();
    for (i, level) in pyr.iter().enumerate() {
        let (_, _, h, w) = level.dim();
        sizes.push([w, h]);
        save_rgb(case_dir.join(format!("level_{i}.png")), level.view())?;
    }
    info!(levels = pyr.num_levels(), "pyramid written");

    write_json(
        case_dir.join("meta.json"),
        &MetaPyramid {
            requested_levels: args.levels,
            built_levels: pyr.num_levels(),
            level_sizes: sizes,
            crop: crop.to_array(),
            policy: "2x2 mean, drop odd row/col",
        },
    )
}

fn run_warp(args: WarpArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "warp")?;
    let (image, crop) = load_input(&args.common)?;

    let flow = constant_flow(&image, args.dx, args.dy);
    let warped = warp(image.view(), flow.view()).context("warping image")?;

    let cropped = crop_nchw(warped.view(), crop)?;
    save_rgb(case_dir.join("warped.png"), cropped.view())?;

    let change = (&warped - &image).mapv(f32::abs).mean().unwrap_or(0.0);
    info!(dx = args.dx, dy = args.dy, mean_abs_change = change, "warp written");

    write_json(
        case_dir.join("meta.json"),
        &MetaWarp {
            dx: args.dx,
            dy: args.dy,
            border: "clamp",
            crop: crop.to_array(),
            mean_abs_change: change,
        },
    )
}

fn run_synthesis(args: SynthesisArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "synthesis")?;
    let (image, _) = load_input(&args.common)?;

    let pyr = build_image_pyramid(image.view(), args.levels)
        .with_context(|| format!("building {}-level pyramid", args.levels))?;
    if pyr.is_empty() {
        bail!("--levels must be at least 1");
    }

    let residuals: Pyramid = pyr
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let dx = if i + 1 == pyr.num_levels() { args.dx } else { 0.0 };
            constant_flow(level, dx, 0.0)
        })
        .collect();
    let flows = flow_pyramid_synthesis(&residuals).context("synthesizing flow pyramid")?;

    let levels = flows
        .iter()
        .map(|f| {
            let (_, _, height, width) = f.dim();
            let dx = f.index_axis(Axis(1), 0);
            FlowLevelDto {
                height,
                width,
                dx_min: dx.fold(f32::INFINITY, |a, &v| a.min(v)),
                dx_max: dx.fold(f32::NEG_INFINITY, |a, &v| a.max(v)),
            }
        })
        .collect();

    write_json(
        case_dir.join("meta.json"),
        &MetaSynthesis {
            coarsest_dx: args.dx,
            levels,
        },
    )
}

fn prepare_case(common: &CommonArgs, case: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    let ext = common
        .input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    let copy = case_dir.join(format!("input.{ext}"));
    fs::copy(&common.input, &copy).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            copy.display()
        )
    })?;

    Ok(case_dir)
}

/// Loads the input as a channels-first batch plus the padding it received.
fn load_input(common: &CommonArgs) -> Result<(Array4<f32>, CropRegion)> {
    let (batch, crop) = load_image(&common.input, common.align)
        .with_context(|| format!("loading input image {}", common.input.display()))?;
    Ok((nhwc_to_nchw(batch.view()), crop))
}

fn constant_flow(like: &Array4<f32>, dx: f32, dy: f32) -> Array4<f32> {
    let (b, _, h, w) = like.dim();
    let mut flow = Array4::zeros((b, 2, h, w));
    flow.index_axis_mut(Axis(1), 0).fill(dx);
    flow.index_axis_mut(Axis(1), 1).fill(dy);
    flow
}

fn crop_nchw(batch: ArrayView4<'_, f32>, crop: CropRegion) -> Result<Array4<f32>> {
    let nhwc = nchw_to_nhwc(batch);
    let cropped = crop_batch(nhwc.view(), crop).context("cropping padded batch")?;
    Ok(nhwc_to_nchw(cropped.view()))
}

/// Writes item 0 of a channels-first RGB batch, clamping to `[0, 1]`.
fn save_rgb(path: PathBuf, batch: ArrayView4<'_, f32>) -> Result<()> {
    let (_, channels, height, width) = batch.dim();
    if channels != 3 {
        bail!("expected 3 channels to save {}, got {}", path.display(), channels);
    }

    let rgb = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let px = |c: usize| {
            (batch[[0, c, y as usize, x as usize]] * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        image::Rgb([px(0), px(1), px(2)])
    });
    rgb.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
