//! Boolean kernel seam
//!
//! The builder only talks to solids through [`BooleanKernel`]. Every
//! operation reports success or failure as a value; [`CsgKernel`] turns
//! panics inside csgrs into [`BooleanOutcome::Failed`].

use crate::mesh::SolidMesh;
use chocomold_core::Polygon;
use chocomold_pattern::sketch::{guarded, polygon_to_sketch, sketch_to_polygons, union_to_sketch};
use csgrs::traits::CSG;

/// Result of one geometric operation
#[derive(Debug, Clone)]
pub enum BooleanOutcome<T> {
    Ok(T),
    Failed { reason: String },
}

impl<T> BooleanOutcome<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BooleanOutcome<U> {
        match self {
            Self::Ok(value) => BooleanOutcome::Ok(f(value)),
            Self::Failed { reason } => BooleanOutcome::Failed { reason },
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Failed { reason } => Err(reason),
        }
    }
}

impl<T> From<Result<T, String>> for BooleanOutcome<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(reason) => Self::Failed { reason },
        }
    }
}

/// Planar and solid operations the mold builder relies on
pub trait BooleanKernel {
    /// Union of planar regions
    fn union_regions(&self, regions: &[Polygon]) -> BooleanOutcome<Vec<Polygon>>;

    /// Planar regions of `a` not covered by `b`
    fn subtract_regions(&self, a: &[Polygon], b: &[Polygon]) -> BooleanOutcome<Vec<Polygon>>;

    /// Extrude each region from z = 0 to z = `height`
    fn extrude(&self, regions: &[Polygon], height: f64) -> BooleanOutcome<SolidMesh>;

    /// Solid `a` minus solid `b`
    fn difference(&self, a: &SolidMesh, b: &SolidMesh) -> BooleanOutcome<SolidMesh>;
}

fn finite_regions(regions: Vec<Polygon>) -> BooleanOutcome<Vec<Polygon>> {
    if regions
        .iter()
        .flat_map(|p| p.rings())
        .flatten()
        .all(|p| p.is_finite())
    {
        BooleanOutcome::Ok(regions)
    } else {
        BooleanOutcome::failed("region operation produced non-finite coordinates")
    }
}

fn finite_solid(solid: SolidMesh) -> BooleanOutcome<SolidMesh> {
    let finite = solid
        .as_mesh()
        .polygons
        .iter()
        .flat_map(|p| p.vertices.iter())
        .all(|v| v.pos.coords.iter().all(|c| c.is_finite()));
    if finite {
        BooleanOutcome::Ok(solid)
    } else {
        BooleanOutcome::failed("solid operation produced non-finite coordinates")
    }
}

/// Kernel backed by csgrs sketches and BSP meshes
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgKernel;

impl BooleanKernel for CsgKernel {
    fn union_regions(&self, regions: &[Polygon]) -> BooleanOutcome<Vec<Polygon>> {
        match guarded(|| sketch_to_polygons(&union_to_sketch(regions))) {
            Ok(out) => finite_regions(out),
            Err(reason) => BooleanOutcome::Failed { reason },
        }
    }

    fn subtract_regions(&self, a: &[Polygon], b: &[Polygon]) -> BooleanOutcome<Vec<Polygon>> {
        let result = guarded(|| {
            let diff = union_to_sketch(a).difference(&union_to_sketch(b));
            sketch_to_polygons(&diff)
        });
        match result {
            Ok(out) => finite_regions(out),
            Err(reason) => BooleanOutcome::Failed { reason },
        }
    }

    fn extrude(&self, regions: &[Polygon], height: f64) -> BooleanOutcome<SolidMesh> {
        if !(height > 0.0 && height.is_finite()) {
            return BooleanOutcome::failed(format!("invalid extrusion height {}", height));
        }
        let result = guarded(|| {
            SolidMesh::from_polygons(
                regions
                    .iter()
                    .filter(|r| !r.is_degenerate())
                    .flat_map(|r| polygon_to_sketch(r).extrude(height).polygons)
                    .collect(),
            )
        });
        match result {
            Ok(solid) => finite_solid(solid),
            Err(reason) => BooleanOutcome::Failed { reason },
        }
    }

    fn difference(&self, a: &SolidMesh, b: &SolidMesh) -> BooleanOutcome<SolidMesh> {
        match guarded(|| SolidMesh::new(a.as_mesh().difference(b.as_mesh()))) {
            Ok(solid) => finite_solid(solid),
            Err(reason) => BooleanOutcome::Failed { reason },
        }
    }
}
