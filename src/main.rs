//! chocomold: build a chocolate mold solid from an SVG pattern.
//!
//! # Logging
//!
//! `-v` raises the log level (info, debug, trace). `RUST_LOG` overrides it:
//!
//! ```bash
//! RUST_LOG=chocomold_solid=debug chocomold build pattern.svg --invert
//! ```

use std::path::PathBuf;

use anyhow::Result;
use chocomold::init_logging;
use chocomold::CropRectangle;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

/// chocomold - carve vector patterns into chocolate mold solids.
#[derive(Parser)]
#[command(name = "chocomold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
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

#[derive(Clone, Copy, ValueEnum)]
pub enum BaseArg {
    Block,
    Frustum,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a pattern and build the mold solid
    Build {
        /// Input SVG pattern
        input: PathBuf,

        /// Crop window in document units: minx,miny,maxx,maxy
        #[arg(long, value_parser = parse_crop)]
        crop: Option<CropRectangle>,

        /// Engrave depth
        #[arg(long)]
        depth: Option<f64>,

        /// Pattern scale relative to the fitted size
        #[arg(long)]
        scale: Option<f64>,

        /// Raise the pattern instead of recessing it
        #[arg(long)]
        invert: bool,

        /// Base shape
        #[arg(long)]
        base: Option<BaseArg>,

        /// Top-face inset for the frustum base
        #[arg(long, default_value = "0.5")]
        top_inset: f64,

        /// Configuration file (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Build even when the pattern needs confirmation
        #[arg(long)]
        force: bool,

        /// Add the input to the configuration's recent files
        #[arg(long)]
        remember: bool,
    },

    /// Show the frame and shape counts of a pattern without building
    Inspect {
        /// Input SVG pattern
        input: PathBuf,

        /// Crop window in document units: minx,miny,maxx,maxy
        #[arg(long, value_parser = parse_crop)]
        crop: Option<CropRectangle>,

        /// Configuration file (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_crop(value: &str) -> std::result::Result<CropRectangle, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid crop value: {}", e))?;
    match parts.as_slice() {
        [min_x, min_y, max_x, max_y] if parts.iter().all(|v| v.is_finite()) => {
            Ok(CropRectangle::new(*min_x, *min_y, *max_x, *max_y))
        }
        _ => Err("expected four numbers: minx,miny,maxx,maxy".to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Build {
            input,
            crop,
            depth,
            scale,
            invert,
            base,
            top_inset,
            config,
            force,
            remember,
        } => commands::build(
            commands::BuildArgs {
                input,
                crop,
                depth,
                scale,
                invert,
                base,
                top_inset,
                config,
                force,
                remember,
            },
            cli.format,
        ),
        Commands::Inspect {
            input,
            crop,
            config,
        } => commands::inspect(&input, crop, config.as_deref(), cli.format),
    }
}
