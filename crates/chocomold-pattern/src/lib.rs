//! # ChocoMold Pattern
//!
//! Turns a vector pattern document into the engrave and mask polygon sets
//! consumed by the solid builder.
//!
//! ## Stages
//!
//! ```text
//! SvgDocument::parse      (frame + fully styled paths)
//!   └── classify_paths    (engrave / mask / invisible, stroke expansion)
//!         └── simplify    (vertex decimation)
//!               └── clip  (optional crop window)
//!                     └── normalize (center + fit to the mold footprint)
//! ```
//!
//! [`PatternPipeline`] runs everything up to clipping; normalization is
//! left to the caller because it depends on the mold parameters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chocomold_pattern::{normalize, PatternPipeline};
//!
//! let load = PatternPipeline::default().load(&svg_text, None)?;
//! let (transform, shapes) = normalize(&load.shapes, 8.0, 1.0);
//! ```

pub mod classify;
pub mod clip;
pub mod color;
pub mod complexity;
pub mod crop;
pub mod import;
pub mod normalize;
pub mod path_data;
pub mod pipeline;
pub mod simplify;
pub mod sketch;
pub mod stroke;
pub mod style;
pub mod transform;

pub use classify::{classify_paths, PathShapes};
pub use clip::{clip, clip_polygon, clip_shape_set, ClipOutcome};
pub use color::{classify as classify_color, ColorClass, ColorValue, Paint, Rgba};
pub use complexity::{assess_complexity, Complexity};
pub use crop::{covers_frame, CropSelection, ImageSize};
pub use import::{Frame, StyledPath, Subpath, SvgDocument};
pub use normalize::{compute_transform, normalize};
pub use pipeline::{PatternLoad, PatternPipeline};
pub use simplify::{simplify, simplify_shape_set};
pub use stroke::expand as expand_stroke;
pub use style::PaintStyle;
