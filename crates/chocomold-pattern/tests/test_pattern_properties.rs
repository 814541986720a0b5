//! Property-based tests for the 2-D geometry stages.
//!
//! Run with: cargo test -p chocomold-pattern -- proptest

use chocomold_core::{CropRectangle, Point, Polygon, ShapeSet};
use chocomold_pattern::{clip, compute_transform, normalize, simplify};
use proptest::prelude::*;

/// Axis-aligned rectangle with positive extent
fn arb_rectangle() -> impl Strategy<Value = Polygon> {
    (-100.0..100.0f64, -100.0..100.0f64, 0.5..60.0f64, 0.5..60.0f64)
        .prop_map(|(x, y, w, h)| Polygon::rectangle(x, y, x + w, y + h))
}

/// Convex regular polygon
fn arb_regular() -> impl Strategy<Value = Polygon> {
    (-80.0..80.0f64, -80.0..80.0f64, 1.0..40.0f64, 3usize..24, 0.0..1.0f64).prop_map(
        |(cx, cy, r, n, phase)| {
            Polygon::new(
                (0..n)
                    .map(|i| {
                        let a = (i as f64 + phase) * std::f64::consts::TAU / n as f64;
                        Point::new(cx + r * a.cos(), cy + r * a.sin())
                    })
                    .collect(),
            )
        },
    )
}

fn arb_polygon() -> impl Strategy<Value = Polygon> {
    prop_oneof![arb_rectangle(), arb_regular()]
}

/// Arbitrary (possibly self-intersecting) ring, for the simplifier only
fn arb_ring_polygon() -> impl Strategy<Value = Polygon> {
    (
        prop::collection::vec((-20.0..20.0f64, -20.0..20.0f64), 3..40),
        prop::collection::vec(prop::collection::vec((-5.0..5.0f64, -5.0..5.0f64), 0..10), 0..3),
    )
        .prop_map(|(outer, holes)| {
            let ring = |pts: Vec<(f64, f64)>| -> Vec<Point> {
                pts.into_iter().map(|(x, y)| Point::new(x, y)).collect()
            };
            Polygon::with_holes(ring(outer), holes.into_iter().map(ring).collect())
        })
}

fn arb_crop() -> impl Strategy<Value = CropRectangle> {
    (-100.0..100.0f64, -100.0..100.0f64, 1.0..120.0f64, 1.0..120.0f64)
        .prop_map(|(x, y, w, h)| CropRectangle::new(x, y, x + w, y + h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_simplify_is_idempotent(polygon in arb_ring_polygon()) {
        let once = simplify(&polygon);
        let twice = simplify(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn proptest_clip_output_within_window(
        shapes in prop::collection::vec(arb_polygon(), 1..6),
        rect in arb_crop(),
    ) {
        let eps = rect.epsilon() + 1e-6;
        for polygon in clip(&shapes, &rect) {
            let b = polygon.bounds().unwrap();
            prop_assert!(b.min_x >= rect.min_x - eps, "{:?} outside {:?}", b, rect);
            prop_assert!(b.min_y >= rect.min_y - eps, "{:?} outside {:?}", b, rect);
            prop_assert!(b.max_x <= rect.max_x + eps, "{:?} outside {:?}", b, rect);
            prop_assert!(b.max_y <= rect.max_y + eps, "{:?} outside {:?}", b, rect);
        }
    }

    #[test]
    fn proptest_clip_identity_when_window_contains_all(
        shapes in prop::collection::vec(arb_polygon(), 1..6),
    ) {
        let rect = CropRectangle::new(-500.0, -500.0, 500.0, 500.0);
        prop_assert_eq!(clip(&shapes, &rect), shapes);
    }

    #[test]
    fn proptest_normalize_fits_footprint(
        engrave in prop::collection::vec(arb_polygon(), 1..5),
        mask in prop::collection::vec(arb_polygon(), 0..3),
        footprint in 1.0..50.0f64,
    ) {
        let shapes = ShapeSet::new(engrave, mask);
        let max_dim = shapes.bounds().unwrap().max_dimension();
        let transform = compute_transform(&shapes, footprint, 1.0);
        prop_assert!((transform.scale * max_dim - footprint).abs() < 1e-9 * footprint.max(1.0));

        let (_, normalized) = normalize(&shapes, footprint, 1.0);
        let b = normalized.bounds().unwrap();
        prop_assert!((b.max_dimension() - footprint).abs() < 1e-6);
        prop_assert!(b.center().x.abs() < 1e-6 && b.center().y.abs() < 1e-6);
    }
}
