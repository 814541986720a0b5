//! Crop-window clipping
//!
//! Each polygon is tested against the window's bounds first. Only polygons
//! that straddle the window edge go through a general polygon intersection.

use crate::simplify::simplify_with;
use crate::sketch::{guarded, polygon_to_sketch, sketch_to_polygons};
use chocomold_core::constants::SIMPLIFY_MIN_DISTANCE_SQ;
use chocomold_core::{CropRectangle, Polygon, ShapeSet};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use tracing::{debug, warn};

/// What happened to one polygon
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOutcome {
    /// Bounds lie inside the window; kept unchanged
    Inside,
    /// Intersection computed; zero or more simplified components
    Clipped(Vec<Polygon>),
    /// No overlap with the window; dropped
    Outside,
    /// The intersection failed; the original is kept unclipped
    Failed { reason: String },
}

fn window_sketch(rect: &CropRectangle) -> Sketch<()> {
    let corners: Vec<[f64; 2]> = rect.to_polygon().outer.iter().map(|p| [p.x, p.y]).collect();
    Sketch::polygon(&corners, None)
}

fn csg_intersection(polygon: &Polygon, rect: &CropRectangle) -> Vec<Polygon> {
    let clipped = polygon_to_sketch(polygon).intersection(&window_sketch(rect));
    sketch_to_polygons(&clipped)
}

/// Clip a single polygon
pub fn clip_polygon(polygon: &Polygon, rect: &CropRectangle, min_distance_sq: f64) -> ClipOutcome {
    clip_polygon_by(polygon, rect, min_distance_sq, csg_intersection)
}

fn clip_polygon_by(
    polygon: &Polygon,
    rect: &CropRectangle,
    min_distance_sq: f64,
    intersect: impl Fn(&Polygon, &CropRectangle) -> Vec<Polygon>,
) -> ClipOutcome {
    let Some(bounds) = polygon.bounds() else {
        return ClipOutcome::Outside;
    };
    let window = rect.bounds();

    if window.contains_bounds(&bounds, rect.epsilon()) {
        return ClipOutcome::Inside;
    }
    if !window.intersects(&bounds) {
        return ClipOutcome::Outside;
    }

    match guarded(|| intersect(polygon, rect)) {
        Ok(parts) if parts.iter().flat_map(|p| p.rings()).flatten().all(|p| p.is_finite()) => {
            ClipOutcome::Clipped(
                parts
                    .iter()
                    .map(|p| simplify_with(p, min_distance_sq))
                    .filter(|p| !p.is_degenerate())
                    .collect(),
            )
        }
        Ok(_) => ClipOutcome::Failed {
            reason: "intersection produced non-finite coordinates".to_string(),
        },
        Err(reason) => ClipOutcome::Failed { reason },
    }
}

/// Clip polygons to the window at a given re-simplification spacing
pub fn clip_with(shapes: &[Polygon], rect: &CropRectangle, min_distance_sq: f64) -> Vec<Polygon> {
    clip_by(shapes, rect, min_distance_sq, csg_intersection)
}

fn clip_by(
    shapes: &[Polygon],
    rect: &CropRectangle,
    min_distance_sq: f64,
    intersect: impl Fn(&Polygon, &CropRectangle) -> Vec<Polygon>,
) -> Vec<Polygon> {
    let mut out = Vec::with_capacity(shapes.len());
    for polygon in shapes {
        match clip_polygon_by(polygon, rect, min_distance_sq, &intersect) {
            ClipOutcome::Inside => out.push(polygon.clone()),
            ClipOutcome::Clipped(parts) => out.extend(parts),
            ClipOutcome::Outside => {}
            ClipOutcome::Failed { reason } => {
                warn!("Polygon clip failed ({}); keeping it unclipped", reason);
                out.push(polygon.clone());
            }
        }
    }
    out
}

/// Clip polygons to the window
pub fn clip(shapes: &[Polygon], rect: &CropRectangle) -> Vec<Polygon> {
    clip_with(shapes, rect, SIMPLIFY_MIN_DISTANCE_SQ)
}

/// Clip both classes of a shape set
pub fn clip_shape_set(shapes: &ShapeSet, rect: &CropRectangle, min_distance_sq: f64) -> ShapeSet {
    let clipped = ShapeSet::new(
        clip_with(&shapes.engrave, rect, min_distance_sq),
        clip_with(&shapes.mask, rect, min_distance_sq),
    );
    debug!(
        "Clipped {} engrave / {} mask polygons to {} / {}",
        shapes.engrave.len(),
        shapes.mask.len(),
        clipped.engrave.len(),
        clipped.mask.len()
    );
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_kept_unchanged() {
        let rect = CropRectangle::new(0.0, 0.0, 100.0, 100.0);
        let poly = Polygon::rectangle(10.0, 10.0, 20.0, 20.0);
        assert_eq!(clip_polygon(&poly, &rect, 0.25), ClipOutcome::Inside);
        assert_eq!(clip(&[poly.clone()], &rect), vec![poly]);
    }

    #[test]
    fn test_outside_dropped() {
        let rect = CropRectangle::new(0.0, 0.0, 10.0, 10.0);
        let poly = Polygon::rectangle(50.0, 50.0, 60.0, 60.0);
        assert_eq!(clip_polygon(&poly, &rect, 0.25), ClipOutcome::Outside);
        assert!(clip(&[poly], &rect).is_empty());
    }

    #[test]
    fn test_straddling_polygon_is_cut() {
        let rect = CropRectangle::new(0.0, 0.0, 10.0, 10.0);
        let poly = Polygon::rectangle(5.0, 5.0, 15.0, 15.0);
        let out = clip(&[poly], &rect);
        assert_eq!(out.len(), 1);
        assert!((out[0].area() - 25.0).abs() < 1e-6);
        let b = out[0].bounds().unwrap();
        assert!(rect.bounds().contains_bounds(&b, rect.epsilon()));
    }

    #[test]
    fn test_clip_splits_into_components() {
        // A U shape whose arms leave the window separately
        let u = Polygon::new(vec![
            chocomold_core::Point::new(0.0, 0.0),
            chocomold_core::Point::new(10.0, 0.0),
            chocomold_core::Point::new(10.0, 10.0),
            chocomold_core::Point::new(7.0, 10.0),
            chocomold_core::Point::new(7.0, 3.0),
            chocomold_core::Point::new(3.0, 3.0),
            chocomold_core::Point::new(3.0, 10.0),
            chocomold_core::Point::new(0.0, 10.0),
        ]);
        let rect = CropRectangle::new(-1.0, 5.0, 11.0, 12.0);
        let out = clip(&[u], &rect);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_failed_intersection_keeps_original() {
        let rect = CropRectangle::new(0.0, 0.0, 10.0, 10.0);
        let straddling = Polygon::rectangle(5.0, 5.0, 15.0, 15.0);
        let inside = Polygon::rectangle(1.0, 1.0, 2.0, 2.0);
        let panicking = |_: &Polygon, _: &CropRectangle| -> Vec<Polygon> {
            panic!("degenerate intersection")
        };

        assert_eq!(
            clip_polygon_by(&straddling, &rect, 0.25, panicking),
            ClipOutcome::Failed {
                reason: "degenerate intersection".to_string()
            }
        );
        let out = clip_by(&[straddling.clone(), inside.clone()], &rect, 0.25, panicking);
        assert_eq!(out, vec![straddling, inside]);
    }

    #[test]
    fn test_non_finite_intersection_keeps_original() {
        let rect = CropRectangle::new(0.0, 0.0, 10.0, 10.0);
        let straddling = Polygon::rectangle(5.0, 5.0, 15.0, 15.0);
        let garbled = |_: &Polygon, _: &CropRectangle| {
            vec![Polygon::rectangle(5.0, 5.0, f64::NAN, 10.0)]
        };
        assert!(matches!(
            clip_polygon_by(&straddling, &rect, 0.25, garbled),
            ClipOutcome::Failed { .. }
        ));
        assert_eq!(clip_by(&[straddling.clone()], &rect, 0.25, garbled), vec![straddling]);
    }

    #[test]
    fn test_epsilon_tolerates_edge_noise() {
        let rect = CropRectangle::new(0.0, 0.0, 100.0, 100.0);
        let poly = Polygon::rectangle(-0.005, 0.0, 50.0, 50.0);
        assert_eq!(clip_polygon(&poly, &rect, 0.25), ClipOutcome::Inside);
    }
}
