//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chocomold::{
    BaseStyle, Bounds, BuildOutcome, Complexity, Config, CropRectangle, CsgKernel, Frame,
    MoldBuilder, MoldSession, PatternPipeline,
};
use chocomold::solid::Bounds3;
use serde::Serialize;
use tracing::{info, warn};

use crate::{BaseArg, OutputFormat};

pub struct BuildArgs {
    pub input: PathBuf,
    pub crop: Option<CropRectangle>,
    pub depth: Option<f64>,
    pub scale: Option<f64>,
    pub invert: bool,
    pub base: Option<BaseArg>,
    pub top_inset: f64,
    pub config: Option<PathBuf>,
    pub force: bool,
    pub remember: bool,
}

#[derive(Serialize)]
struct InspectSummary {
    input: PathBuf,
    frame: Frame,
    content_bounds: Option<Bounds>,
    engrave: usize,
    mask: usize,
    clipped: bool,
    complexity: Complexity,
}

#[derive(Serialize)]
struct BuildSummary {
    input: PathBuf,
    engrave: usize,
    mask: usize,
    complexity: Complexity,
    outcome: BuildOutcome,
    depth: f64,
    invert: bool,
    base: BaseStyle,
    mask_applied: bool,
    triangles: usize,
    volume: f64,
    bounds: Option<Bounds3>,
    warnings: Vec<String>,
}

/// Explicit file, else the default location if present, else defaults
fn load_config(path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = path {
        let config = Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        return Ok((config, Some(path.to_path_buf())));
    }

    match Config::default_path() {
        Ok(default) if default.exists() => {
            let config = Config::load_from_file(&default)
                .with_context(|| format!("loading config {}", default.display()))?;
            Ok((config, Some(default)))
        }
        Ok(default) => Ok((Config::default(), Some(default))),
        Err(e) => {
            warn!("No configuration directory: {}", e);
            Ok((Config::default(), None))
        }
    }
}

fn print<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(value),
    }
    Ok(())
}

pub fn inspect(
    input: &Path,
    crop: Option<CropRectangle>,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let (config, _) = load_config(config)?;
    let pipeline = PatternPipeline::new(config.pattern);
    let load = pipeline.load_file(input, crop)?;

    let summary = InspectSummary {
        input: input.to_path_buf(),
        frame: load.frame,
        content_bounds: load.shapes.bounds(),
        engrave: load.shapes.engrave.len(),
        mask: load.shapes.mask.len(),
        clipped: load.clipped,
        complexity: load.complexity,
    };

    print(format, &summary, |s| {
        println!("Pattern:    {}", s.input.display());
        println!(
            "Frame:      origin ({}, {}), {} x {}",
            s.frame.min_x, s.frame.min_y, s.frame.width, s.frame.height
        );
        if let Some(b) = &s.content_bounds {
            println!(
                "Content:    ({:.3}, {:.3}) to ({:.3}, {:.3})",
                b.min_x, b.min_y, b.max_x, b.max_y
            );
        }
        println!("Engrave:    {} polygons", s.engrave);
        println!("Mask:       {} polygons", s.mask);
        println!("Clipped:    {}", s.clipped);
        println!("Complexity: {:?}", s.complexity);
    })
}

pub fn build(args: BuildArgs, format: OutputFormat) -> Result<()> {
    let (mut config, config_path) = load_config(args.config.as_deref())?;

    let mut params = config.mold.clone();
    if let Some(depth) = args.depth {
        params.engrave_depth = depth;
    }
    if let Some(scale) = args.scale {
        params.user_scale = scale;
    }
    if args.invert {
        params.invert = true;
    }
    match args.base {
        Some(BaseArg::Block) => params.base_style = BaseStyle::Block,
        Some(BaseArg::Frustum) => {
            params.base_style = BaseStyle::Frustum {
                top_inset: args.top_inset,
            }
        }
        None => {}
    }
    let mut session =
        MoldSession::new(MoldBuilder::new(CsgKernel)).with_pattern_settings(&config.pattern);
    session
        .set_parameters(params.clone())
        .context("invalid mold parameters")?;

    let pipeline = PatternPipeline::new(config.pattern.clone());
    let load = pipeline.load_file(&args.input, args.crop)?;

    if load.complexity.needs_confirmation() && !args.force {
        bail!(
            "pattern has {} shapes; rerun with --force to build anyway",
            load.complexity.count()
        );
    }

    session.set_pattern(load.shapes.clone());
    let (mesh, report) = session.mesh();
    info!("Build finished: {}", report.outcome);

    if args.remember {
        match &config_path {
            Some(path) => {
                config.add_recent_file(args.input.clone());
                config
                    .save_to_file(path)
                    .with_context(|| format!("saving config {}", path.display()))?;
            }
            None => warn!("No configuration location; not recording recent file"),
        }
    }

    let summary = BuildSummary {
        input: args.input,
        engrave: load.shapes.engrave.len(),
        mask: load.shapes.mask.len(),
        complexity: load.complexity,
        outcome: report.outcome,
        depth: report.depth,
        invert: params.invert,
        base: params.base_style,
        mask_applied: report.mask_applied,
        triangles: mesh.triangle_count(),
        volume: mesh.volume(),
        bounds: mesh.bounds(),
        warnings: report.warnings,
    };

    print(format, &summary, |s| {
        println!("Pattern:   {}", s.input.display());
        println!("Shapes:    {} engrave, {} mask", s.engrave, s.mask);
        println!(
            "Mold:      {} base, depth {:.3}{}",
            s.base,
            s.depth,
            if s.invert { ", inverted" } else { "" }
        );
        println!("Outcome:   {}", s.outcome);
        println!("Triangles: {}", s.triangles);
        println!("Volume:    {:.4}", s.volume);
        if let Some(b) = &s.bounds {
            println!(
                "Bounds:    [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]
            );
        }
        for w in &s.warnings {
            println!("Warning:   {}", w);
        }
    })?;

    if matches!(report.outcome, BuildOutcome::BaseOnFailure) {
        warn!("The pattern could not be carved; the output is the bare base");
    }
    Ok(())
}
