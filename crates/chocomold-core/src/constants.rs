//! Tunable constants for the pattern and mold pipelines.
//!
//! The color thresholds are heuristics, not a protocol: they are kept here so
//! they can be adjusted in one place.

/// A color channel at or above this value (0-255 scale) counts as white.
pub const MASK_CHANNEL_THRESHOLD: f64 = 250.0;

/// Alpha at or below this value makes a paint invisible.
pub const INVISIBLE_ALPHA: f64 = 0.05;

/// Default stroke width when the style omits or garbles it.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Minimum full stroke width used for expansion.
pub const MIN_STROKE_WIDTH: f64 = 0.4;

/// Stroke segments shorter than this (squared length) are skipped.
pub const STROKE_SEGMENT_EPSILON_SQ: f64 = 1e-4;

/// Squared spacing a vertex must exceed from the last kept vertex to survive simplification.
pub const SIMPLIFY_MIN_DISTANCE_SQ: f64 = 0.25;

/// Relative tolerance for crop containment tests, scaled by the crop extent.
pub const CLIP_RELATIVE_EPSILON: f64 = 1e-4;

/// Relative tolerance for deciding a crop selection covers the whole frame.
pub const CROP_SKIP_RELATIVE_EPSILON: f64 = 1e-3;

/// Curve flattening tolerance in document units.
pub const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.1;

/// Shape count above which the caller should confirm before building.
pub const SOFT_SHAPE_LIMIT: usize = 350;

/// Shape count above which the builder refuses to carve and returns the base.
pub const HARD_SHAPE_LIMIT: usize = 2000;

/// Extra tool extent above the engrave face so tool faces never sit on it.
pub const OVERCUT: f64 = 0.05;

/// Smallest engrave depth the builder will carve.
pub const MIN_DEPTH: f64 = 0.05;

/// Material that must remain under the deepest engraving.
pub const DEPTH_HEADROOM: f64 = 0.1;

/// Invert-mode plate size as a multiple of the base footprint.
pub const INVERT_PLATE_FACTOR: f64 = 2.5;

/// Default mold block dimensions.
pub const DEFAULT_BASE_SIZE: f64 = 10.0;
pub const DEFAULT_BASE_HEIGHT: f64 = 1.2;
pub const DEFAULT_PATTERN_MARGIN: f64 = 1.0;
pub const DEFAULT_ENGRAVE_DEPTH: f64 = 0.3;
pub const DEFAULT_USER_SCALE: f64 = 1.0;

/// Ranges accepted from parameter controls.
pub const DEPTH_RANGE: (f64, f64) = (0.05, 0.9);
pub const SCALE_RANGE: (f64, f64) = (0.1, 1.5);
