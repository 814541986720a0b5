//! Mold solid builder
//!
//! Carves (or, inverted, embosses) a normalized pattern into the base. The
//! build always returns a solid: each risky step has a defined fallback and
//! the [`BuildReport`] records which one was taken.
//!
//! ```text
//! Empty pattern ───────────────────────────────► base (EmptyPattern)
//! Shape count > hard limit ────────────────────► base (GuardTriggered)
//! Tool built ── base − tool ok ────────────────► carved (Carved)
//!            └─ tool or difference failed ─────► base (BaseOnFailure)
//! ```

use crate::base::build_base;
use crate::kernel::{BooleanKernel, BooleanOutcome, CsgKernel};
use crate::mesh::SolidMesh;
use chocomold_core::constants::{HARD_SHAPE_LIMIT, INVERT_PLATE_FACTOR, OVERCUT};
use chocomold_core::{Polygon, ShapeSet};
use chocomold_settings::MoldParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Terminal state of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    /// Nothing to engrave; the base is returned unmodified
    EmptyPattern,
    /// Too many shapes; the base is returned unmodified
    GuardTriggered,
    /// The pattern was carved into the base
    Carved,
    /// A boolean step failed; the base is returned unmodified
    BaseOnFailure,
}

impl BuildOutcome {
    pub fn is_carved(&self) -> bool {
        matches!(self, Self::Carved)
    }
}

impl std::fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::EmptyPattern => "empty pattern",
            Self::GuardTriggered => "shape limit exceeded",
            Self::Carved => "carved",
            Self::BaseOnFailure => "boolean failure",
        };
        write!(f, "{}", text)
    }
}

/// What a build did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    /// Mask regions were subtracted from (or added to, inverted) the tool
    pub mask_applied: bool,
    /// Engrave + mask polygon count seen by the guard
    pub shape_count: usize,
    /// Depth after clamping
    pub depth: f64,
    pub warnings: Vec<String>,
}

impl BuildReport {
    fn new(shapes: &ShapeSet, depth: f64) -> Self {
        Self {
            outcome: BuildOutcome::EmptyPattern,
            mask_applied: false,
            shape_count: shapes.total_count(),
            depth,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Builds mold solids through a [`BooleanKernel`]
#[derive(Debug, Clone)]
pub struct MoldBuilder<K = CsgKernel> {
    kernel: K,
    hard_shape_limit: usize,
}

impl Default for MoldBuilder<CsgKernel> {
    fn default() -> Self {
        Self::new(CsgKernel)
    }
}

impl<K: BooleanKernel> MoldBuilder<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            hard_shape_limit: HARD_SHAPE_LIMIT,
        }
    }

    pub fn with_shape_limit(mut self, limit: usize) -> Self {
        self.hard_shape_limit = limit;
        self
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The unmodified base for `params`
    pub fn build_base(&self, params: &MoldParameters) -> SolidMesh {
        build_base(params)
    }

    /// Build the mold for shapes already normalized into mold space
    pub fn build(&self, shapes: &ShapeSet, params: &MoldParameters) -> (SolidMesh, BuildReport) {
        let base = build_base(params);
        let depth = params.clamped_depth();
        let mut report = BuildReport::new(shapes, depth);

        if shapes.engrave.is_empty() {
            debug!("No engrave shapes; returning the base");
            return (base, report);
        }

        if report.shape_count > self.hard_shape_limit {
            report.outcome = BuildOutcome::GuardTriggered;
            report.warn(format!(
                "Pattern has {} shapes (limit {}); returning the base",
                report.shape_count, self.hard_shape_limit
            ));
            return (base, report);
        }

        let tool = if params.invert {
            self.invert_tool(shapes, params, depth, &mut report)
        } else {
            self.engrave_tool(shapes, depth, &mut report)
        };

        // Tool construction records its own outcome when it gives up.
        let Some(tool) = tool else {
            return (base, report);
        };

        // The tool runs from `depth` below the top face to OVERCUT above it.
        let tool = tool.translated(0.0, 0.0, params.base_height - depth);

        match self.kernel.difference(&base, &tool) {
            BooleanOutcome::Ok(carved) if !carved.is_empty() => {
                report.outcome = BuildOutcome::Carved;
                info!(
                    "Carved {} shapes at depth {:.3}{}: {} triangles",
                    report.shape_count,
                    depth,
                    if params.invert { " (inverted)" } else { "" },
                    carved.triangle_count()
                );
                (carved, report)
            }
            BooleanOutcome::Ok(_) => {
                report.outcome = BuildOutcome::BaseOnFailure;
                report.warn("Carving produced an empty solid; returning the base".to_string());
                (base, report)
            }
            BooleanOutcome::Failed { reason } => {
                report.outcome = BuildOutcome::BaseOnFailure;
                report.warn(format!("Carving failed ({}); returning the base", reason));
                (base, report)
            }
        }
    }

    /// Engrave regions minus mask regions, extruded in tool-local z
    fn engrave_tool(
        &self,
        shapes: &ShapeSet,
        depth: f64,
        report: &mut BuildReport,
    ) -> Option<SolidMesh> {
        let height = depth + OVERCUT;

        let regions = match self.kernel.union_regions(&shapes.engrave) {
            BooleanOutcome::Ok(regions) if !regions.is_empty() => regions,
            BooleanOutcome::Ok(_) => shapes.engrave.clone(),
            BooleanOutcome::Failed { reason } => {
                report.warn(format!(
                    "Engrave union failed ({}); extruding shapes separately",
                    reason
                ));
                shapes.engrave.clone()
            }
        };

        if shapes.mask.is_empty() {
            return self.extrude_tool(&regions, height, report);
        }

        match self.kernel.subtract_regions(&regions, &shapes.mask) {
            BooleanOutcome::Ok(trimmed) if trimmed.iter().all(Polygon::is_degenerate) => {
                report.outcome = BuildOutcome::EmptyPattern;
                report.mask_applied = true;
                report.warn("Mask covers every engrave region; returning the base".to_string());
                None
            }
            BooleanOutcome::Ok(trimmed) => {
                report.mask_applied = true;
                self.extrude_tool(&trimmed, height, report)
            }
            BooleanOutcome::Failed { reason } => {
                report.warn(format!(
                    "Planar mask subtraction failed ({}); trimming the extruded tool",
                    reason
                ));
                let tool = self.extrude_tool(&regions, height, report)?;
                self.trim_solid_tool(tool, &shapes.mask, height, report)
            }
        }
    }

    fn extrude_tool(
        &self,
        regions: &[Polygon],
        height: f64,
        report: &mut BuildReport,
    ) -> Option<SolidMesh> {
        match self.kernel.extrude(regions, height) {
            BooleanOutcome::Ok(tool) => Some(tool),
            BooleanOutcome::Failed { reason } => {
                report.outcome = BuildOutcome::BaseOnFailure;
                report.warn(format!("Engrave extrusion failed ({}); returning the base", reason));
                None
            }
        }
    }

    /// Subtract the extruded mask from an extruded tool; keeps the tool on failure
    fn trim_solid_tool(
        &self,
        tool: SolidMesh,
        mask: &[Polygon],
        height: f64,
        report: &mut BuildReport,
    ) -> Option<SolidMesh> {
        // Taller on both ends so the mask caps never meet the engrave caps.
        let mask = match self.kernel.extrude(mask, height + 2.0 * OVERCUT) {
            BooleanOutcome::Ok(mask) => mask.translated(0.0, 0.0, -OVERCUT),
            BooleanOutcome::Failed { reason } => {
                report.warn(format!("Mask extrusion failed ({}); ignoring the mask", reason));
                return Some(tool);
            }
        };

        match self.kernel.difference(&tool, &mask) {
            BooleanOutcome::Ok(trimmed) if trimmed.is_empty() => {
                report.outcome = BuildOutcome::EmptyPattern;
                report.mask_applied = true;
                report.warn("Mask covers every engrave region; returning the base".to_string());
                None
            }
            BooleanOutcome::Ok(trimmed) => {
                report.mask_applied = true;
                Some(trimmed)
            }
            BooleanOutcome::Failed { reason } => {
                report.warn(format!("Mask subtraction failed ({}); ignoring the mask", reason));
                Some(tool)
            }
        }
    }

    /// Oversized plate with the engrave outlines cut out, plus mask regions
    /// and the holes of engrave regions, extruded in tool-local z
    fn invert_tool(
        &self,
        shapes: &ShapeSet,
        params: &MoldParameters,
        depth: f64,
        report: &mut BuildReport,
    ) -> Option<SolidMesh> {
        let side = params.base_width.max(params.base_length)
            * INVERT_PLATE_FACTOR
            * params.user_scale.max(1.0);
        let half = side / 2.0;
        let plate = Polygon::rectangle(-half, -half, half, half);

        let outlines: Vec<Polygon> = shapes
            .engrave
            .iter()
            .map(|p| Polygon::new(p.outer.clone()))
            .collect();
        let promoted: Vec<Polygon> = shapes
            .engrave
            .iter()
            .flat_map(|p| p.holes.iter().cloned().map(Polygon::new))
            .collect();

        let mut regions = match self.kernel.subtract_regions(&[plate], &outlines) {
            BooleanOutcome::Ok(regions) => regions,
            BooleanOutcome::Failed { reason } => {
                report.outcome = BuildOutcome::BaseOnFailure;
                report.warn(format!("Invert plate failed ({}); returning the base", reason));
                return None;
            }
        };

        if !shapes.mask.is_empty() || !promoted.is_empty() {
            report.mask_applied = !shapes.mask.is_empty();
            regions.extend(shapes.mask.iter().cloned());
            regions.extend(promoted);
            regions = match self.kernel.union_regions(&regions) {
                BooleanOutcome::Ok(merged) => merged,
                BooleanOutcome::Failed { reason } => {
                    report.outcome = BuildOutcome::BaseOnFailure;
                    report.warn(format!(
                        "Invert region union failed ({}); returning the base",
                        reason
                    ));
                    return None;
                }
            };
        }

        match self.kernel.extrude(&regions, depth + OVERCUT) {
            BooleanOutcome::Ok(tool) => Some(tool),
            BooleanOutcome::Failed { reason } => {
                report.outcome = BuildOutcome::BaseOnFailure;
                report.warn(format!("Invert extrusion failed ({}); returning the base", reason));
                None
            }
        }
    }
}
