//! # ChocoMold
//!
//! Turns a 2-D vector pattern into a 3-D chocolate mold: a base block with
//! the pattern recessed into (or, inverted, raised from) its top face.
//!
//! ## Architecture
//!
//! ChocoMold is organized as a workspace with multiple crates:
//!
//! 1. **chocomold-core** - Geometry data model, constants, errors
//! 2. **chocomold-settings** - Mold parameters and configuration files
//! 3. **chocomold-pattern** - Document import, classification, clipping, normalization
//! 4. **chocomold-solid** - Base solids, boolean kernel, mold builder, sessions
//! 5. **chocomold** - This crate: re-exports, logging setup, and the CLI
//!
//! ## Pipeline
//!
//! ```text
//! SVG text ─► PatternPipeline::load ─► ShapeSet (document space)
//!                                        │ normalize
//!                                        ▼
//!                    MoldBuilder::build ◄─ ShapeSet (mold space)
//!                                        │
//!                                        ▼
//!                                   SolidMesh + BuildReport
//! ```

pub use chocomold_core as core;
pub use chocomold_pattern as pattern;
pub use chocomold_settings as settings;
pub use chocomold_solid as solid;

pub use chocomold_core::{
    Bounds, CropRectangle, Error, Point, Polygon, Result, Ring, ShapeSet, Transform,
};

pub use chocomold_settings::{BaseStyle, Config, MoldParameters, PatternSettings};

pub use chocomold_pattern::{
    assess_complexity, classify_color, clip, covers_frame, normalize, simplify, ColorClass,
    Complexity, CropSelection, Frame, ImageSize, PatternLoad, PatternPipeline, SvgDocument,
};

pub use chocomold_solid::{
    BooleanKernel, BooleanOutcome, BuildOutcome, BuildReport, CsgKernel, MoldBuilder,
    MoldSession, SolidMesh,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` picks the level:
/// 0 for warnings, 1 for info, 2 for debug, and anything higher for trace.
/// Output goes to stderr so command output on stdout stays clean.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = match verbosity {
                0 => tracing::Level::WARN,
                1 => tracing::Level::INFO,
                2 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            };
            EnvFilter::default().add_directive(level.into())
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
