//! Integration tests for mold building and its fallbacks

use chocomold_core::{Polygon, ShapeSet};
use chocomold_pattern::{normalize, PatternPipeline};
use chocomold_settings::{BaseStyle, MoldParameters};
use chocomold_solid::{
    BooleanKernel, BooleanOutcome, BuildOutcome, CsgKernel, MoldBuilder, SolidMesh,
};

const CENTERED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
    <rect x="25" y="25" width="50" height="50" fill="#000"/>
</svg>"##;

fn mold_space_square(params: &MoldParameters) -> ShapeSet {
    let load = PatternPipeline::default().load(CENTERED_SQUARE, None).unwrap();
    let (_, shapes) = normalize(&load.shapes, params.target_footprint(), params.user_scale);
    shapes
}

fn params(depth: f64, invert: bool) -> MoldParameters {
    MoldParameters {
        engrave_depth: depth,
        invert,
        ..Default::default()
    }
}

/// Kernel that fails selected operations and delegates the rest to csgrs
#[derive(Default)]
struct FlakyKernel {
    fail_union: bool,
    fail_region_subtract: bool,
    fail_mask_difference: bool,
    fail_carve: bool,
}

impl BooleanKernel for FlakyKernel {
    fn union_regions(&self, regions: &[Polygon]) -> BooleanOutcome<Vec<Polygon>> {
        if self.fail_union {
            return BooleanOutcome::failed("union disabled");
        }
        CsgKernel.union_regions(regions)
    }

    fn subtract_regions(&self, a: &[Polygon], b: &[Polygon]) -> BooleanOutcome<Vec<Polygon>> {
        if self.fail_region_subtract {
            return BooleanOutcome::failed("planar subtraction disabled");
        }
        CsgKernel.subtract_regions(a, b)
    }

    fn extrude(&self, regions: &[Polygon], height: f64) -> BooleanOutcome<SolidMesh> {
        CsgKernel.extrude(regions, height)
    }

    fn difference(&self, a: &SolidMesh, b: &SolidMesh) -> BooleanOutcome<SolidMesh> {
        // The carve is the only difference whose left side is the base (z from 0).
        let is_carve = a.bounds().is_some_and(|bounds| bounds.min[2] == 0.0 && bounds.max[2] > 1.0);
        if (is_carve && self.fail_carve) || (!is_carve && self.fail_mask_difference) {
            return BooleanOutcome::failed("difference disabled");
        }
        CsgKernel.difference(a, b)
    }
}

#[test]
fn test_empty_pattern_returns_unmodified_base() {
    let builder = MoldBuilder::default();
    let p = params(0.5, false);
    let (mesh, report) = builder.build(&ShapeSet::default(), &p);
    assert_eq!(report.outcome, BuildOutcome::EmptyPattern);
    assert!(mesh.same_geometry(&builder.build_base(&p)));
}

#[test]
fn test_guard_returns_base_for_2001_shapes() {
    let engrave: Vec<Polygon> = (0..2001)
        .map(|i| {
            let x = (i % 50) as f64 * 0.1 - 2.5;
            let y = (i / 50) as f64 * 0.1 - 2.5;
            Polygon::rectangle(x, y, x + 0.05, y + 0.05)
        })
        .collect();
    let shapes = ShapeSet::new(engrave, vec![]);
    let builder = MoldBuilder::default();
    let p = params(0.3, false);

    let (mesh, report) = builder.build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::GuardTriggered);
    assert_eq!(report.shape_count, 2001);
    assert!(mesh.same_geometry(&builder.build_base(&p)));
}

#[test]
fn test_centered_square_recess() {
    let p = params(0.5, false);
    let shapes = mold_space_square(&p);
    let (mesh, report) = MoldBuilder::default().build(&shapes, &p);

    assert_eq!(report.outcome, BuildOutcome::Carved);
    // 10 x 10 x 1.2 block minus an 8 x 8 x 0.5 recess
    assert!((mesh.volume() - 88.0).abs() < 1e-3, "volume {}", mesh.volume());
    let b = mesh.bounds().unwrap();
    assert!((b.max[2] - 1.2).abs() < 1e-9);
}

#[test]
fn test_invert_complements_the_recess() {
    let base_volume = 120.0;
    let depth = 0.5;

    let plain = params(depth, false);
    let shapes = mold_space_square(&plain);
    let (recessed, _) = MoldBuilder::default().build(&shapes, &plain);

    let inverted = params(depth, true);
    let (raised, report) = MoldBuilder::default().build(&shapes, &inverted);
    assert_eq!(report.outcome, BuildOutcome::Carved);

    // Everything except the square is lowered, leaving it raised.
    assert!((raised.volume() - 102.0).abs() < 1e-3, "volume {}", raised.volume());

    // Together the two cuts remove exactly one full layer of the top face.
    let removed = (base_volume - recessed.volume()) + (base_volume - raised.volume());
    assert!((removed - 100.0 * depth).abs() < 1e-3);

    // The raised square still reaches the original top face.
    assert!((raised.bounds().unwrap().max[2] - 1.2).abs() < 1e-9);
}

#[test]
fn test_invert_promotes_holes_to_raised_regions() {
    let ring = Polygon::with_holes(
        Polygon::rectangle(-3.0, -3.0, 3.0, 3.0).outer,
        vec![Polygon::rectangle(-1.0, -1.0, 1.0, 1.0).outer],
    );
    let shapes = ShapeSet::new(vec![ring], vec![]);
    let p = params(0.5, true);
    let (mesh, report) = MoldBuilder::default().build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    // Outside the ring (100 - 36) and its hole (4) are lowered.
    assert!((mesh.volume() - (120.0 - 68.0 * 0.5)).abs() < 1e-3);
}

#[test]
fn test_union_failure_extrudes_shapes_separately() {
    let kernel = FlakyKernel {
        fail_union: true,
        ..Default::default()
    };
    let shapes = ShapeSet::new(
        vec![
            Polygon::rectangle(-3.0, -1.0, -1.0, 1.0),
            Polygon::rectangle(1.0, -1.0, 3.0, 1.0),
        ],
        vec![],
    );
    let p = params(0.5, false);
    let (mesh, report) = MoldBuilder::new(kernel).build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert_eq!(report.warnings.len(), 1);
    assert!((mesh.volume() - (120.0 - 8.0 * 0.5)).abs() < 1e-3);
}

#[test]
fn test_mask_inside_engrave_leaves_island() {
    let shapes = ShapeSet::new(
        vec![Polygon::rectangle(-2.0, -2.0, 2.0, 2.0)],
        vec![Polygon::rectangle(-1.0, -1.0, 1.0, 1.0)],
    );
    let p = params(0.5, false);
    let (mesh, report) = MoldBuilder::default().build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!(report.mask_applied);
    assert!(report.warnings.is_empty());
    assert!((mesh.volume() - (120.0 - 12.0 * 0.5)).abs() < 1e-3);
}

#[test]
fn test_white_background_covering_artwork_returns_base() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <rect x="0" y="0" width="100" height="100" fill="#ffffff"/>
        <rect x="25" y="25" width="50" height="50" fill="#000"/>
    </svg>"##;
    let p = params(0.5, false);
    let load = PatternPipeline::default().load(svg, None).unwrap();
    assert_eq!(load.shapes.engrave.len(), 1);
    assert_eq!(load.shapes.mask.len(), 1);
    let (_, shapes) = normalize(&load.shapes, p.target_footprint(), p.user_scale);

    let builder = MoldBuilder::default();
    let (mesh, report) = builder.build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::EmptyPattern);
    assert!(report.mask_applied);
    assert!(mesh.same_geometry(&builder.build_base(&p)));
}

#[test]
fn test_planar_mask_failure_trims_extruded_tool() {
    let kernel = FlakyKernel {
        fail_region_subtract: true,
        ..Default::default()
    };
    let shapes = ShapeSet::new(
        vec![Polygon::rectangle(-2.0, -2.0, 2.0, 2.0)],
        vec![Polygon::rectangle(0.0, -3.0, 3.0, 3.0)],
    );
    let p = params(0.5, false);
    let (mesh, report) = MoldBuilder::new(kernel).build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!(report.mask_applied);
    assert_eq!(report.warnings.len(), 1);
    // Only the left half of the 4 x 4 square is recessed.
    assert!((mesh.volume() - (120.0 - 8.0 * 0.5)).abs() < 1e-3);
}

#[test]
fn test_mask_failure_keeps_untrimmed_tool() {
    let kernel = FlakyKernel {
        fail_region_subtract: true,
        fail_mask_difference: true,
        ..Default::default()
    };
    let shapes = ShapeSet::new(
        vec![Polygon::rectangle(-2.0, -2.0, 2.0, 2.0)],
        vec![Polygon::rectangle(-1.0, -1.0, 1.0, 1.0)],
    );
    let p = params(0.5, false);
    let (mesh, report) = MoldBuilder::new(kernel).build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!(!report.mask_applied);
    assert_eq!(report.warnings.len(), 2);
    assert!((mesh.volume() - (120.0 - 16.0 * 0.5)).abs() < 1e-3);
}

#[test]
fn test_carve_failure_returns_base() {
    let kernel = FlakyKernel {
        fail_carve: true,
        ..Default::default()
    };
    let p = params(0.5, false);
    let shapes = mold_space_square(&p);
    let builder = MoldBuilder::new(kernel);
    let (mesh, report) = builder.build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::BaseOnFailure);
    assert!(!report.warnings.is_empty());
    assert!(mesh.same_geometry(&builder.build_base(&p)));
}

#[test]
fn test_frustum_pattern_stays_on_top_face() {
    let p = MoldParameters {
        engrave_depth: 0.5,
        base_style: BaseStyle::Frustum { top_inset: 2.0 },
        ..Default::default()
    };
    let shapes = mold_space_square(&p);
    // 6 x 6 top face less the margin leaves a 4 x 4 pattern.
    let bounds = shapes.bounds().unwrap();
    assert!(bounds.min_x >= -2.0 - 1e-9 && bounds.max_x <= 2.0 + 1e-9);
    assert!(bounds.min_y >= -2.0 - 1e-9 && bounds.max_y <= 2.0 + 1e-9);

    let builder = MoldBuilder::default();
    let base_volume = builder.build_base(&p).volume();
    let (mesh, report) = builder.build(&shapes, &p);
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!((base_volume - mesh.volume() - 8.0).abs() < 1e-3);
}

#[test]
fn test_report_serializes() {
    let p = params(0.5, false);
    let (_, report) = MoldBuilder::default().build(&ShapeSet::default(), &p);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"outcome\":\"empty_pattern\""));
}
