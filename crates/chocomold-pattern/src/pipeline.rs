//! Pattern loading facade
//!
//! Runs the 2-D stages in order: parse, classify, simplify, clip. Each stage
//! produces a fresh [`ShapeSet`]; nothing is mutated in place.

use crate::classify::classify_paths;
use crate::clip::clip_shape_set;
use crate::complexity::{assess_complexity, Complexity};
use crate::crop::covers_frame;
use crate::import::{Frame, SvgDocument};
use crate::simplify::simplify_shape_set;
use chocomold_core::{CropRectangle, Result, ShapeSet};
use chocomold_settings::PatternSettings;
use std::path::Path;
use tracing::{debug, info};

/// Result of loading one pattern document
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLoad {
    pub shapes: ShapeSet,
    pub frame: Frame,
    pub complexity: Complexity,
    /// Whether a crop window was actually applied
    pub clipped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PatternPipeline {
    settings: PatternSettings,
}

impl PatternPipeline {
    pub fn new(settings: PatternSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PatternSettings {
        &self.settings
    }

    /// Load a document from text. Only a parse failure is an error.
    pub fn load(&self, svg: &str, crop: Option<CropRectangle>) -> Result<PatternLoad> {
        let document = SvgDocument::parse_with_tolerance(svg, self.settings.flatten_tolerance)?;
        Ok(self.load_document(&document, crop))
    }

    /// Read and load a document from disk
    pub fn load_file(&self, path: &Path, crop: Option<CropRectangle>) -> Result<PatternLoad> {
        info!("Loading pattern from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.load(&text, crop)
    }

    /// Run the geometry stages on an already parsed document
    pub fn load_document(&self, document: &SvgDocument, crop: Option<CropRectangle>) -> PatternLoad {
        let classified = classify_paths(&document.paths);
        let simplified = simplify_shape_set(&classified, self.settings.simplify_distance_sq);

        let window = crop.filter(|rect| {
            let skip = covers_frame(rect, &document.frame);
            if skip {
                debug!("Crop window matches the document frame; skipping clip");
            }
            !skip
        });

        let shapes = match window {
            Some(rect) => clip_shape_set(&simplified, &rect, self.settings.simplify_distance_sq),
            None => simplified,
        };

        let complexity = assess_complexity(&shapes, &self.settings);
        info!(
            "Pattern loaded: {} engrave, {} mask polygons ({:?})",
            shapes.engrave.len(),
            shapes.mask.len(),
            complexity
        );

        PatternLoad {
            shapes,
            frame: document.frame,
            complexity,
            clipped: window.is_some(),
        }
    }
}
