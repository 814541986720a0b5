//! Greedy vertex decimation
//!
//! Bounds vertex density ahead of the polygon booleans. Lossy: a vertex
//! survives only if it sits farther than the spacing from the last kept
//! vertex.

use chocomold_core::constants::SIMPLIFY_MIN_DISTANCE_SQ;
use chocomold_core::{Point, Polygon, Ring, ShapeSet};

/// Decimate one ring, always keeping its first point
pub fn simplify_ring(ring: &[Point], min_distance_sq: f64) -> Ring {
    let mut kept: Ring = Vec::with_capacity(ring.len());
    for p in ring {
        match kept.last() {
            Some(last) if last.distance_squared(p) <= min_distance_sq => {}
            _ => kept.push(*p),
        }
    }
    kept
}

/// Decimate the outer ring and every hole at the given squared spacing.
/// Holes left with fewer than three points are dropped.
pub fn simplify_with(polygon: &Polygon, min_distance_sq: f64) -> Polygon {
    Polygon {
        outer: simplify_ring(&polygon.outer, min_distance_sq),
        holes: polygon
            .holes
            .iter()
            .map(|h| simplify_ring(h, min_distance_sq))
            .filter(|h| h.len() >= 3)
            .collect(),
    }
}

/// Decimate at the standard 0.5-unit spacing
pub fn simplify(polygon: &Polygon) -> Polygon {
    simplify_with(polygon, SIMPLIFY_MIN_DISTANCE_SQ)
}

/// Simplify every polygon of a set, discarding the ones that collapse
pub fn simplify_shape_set(shapes: &ShapeSet, min_distance_sq: f64) -> ShapeSet {
    let run = |polys: &[Polygon]| -> Vec<Polygon> {
        polys
            .iter()
            .map(|p| simplify_with(p, min_distance_sq))
            .filter(|p| !p.is_degenerate())
            .collect()
    };
    ShapeSet::new(run(&shapes.engrave), run(&shapes.mask))
}
