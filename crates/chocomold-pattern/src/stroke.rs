//! Stroke expansion
//!
//! A stroked centerline becomes one quadrilateral per segment. Quads are not
//! welded at the joints; the overlap only ever ends up inside a subtracted
//! tool.

use chocomold_core::constants::{DEFAULT_STROKE_WIDTH, MIN_STROKE_WIDTH, STROKE_SEGMENT_EPSILON_SQ};
use chocomold_core::{Point, Polygon};

/// Effective full stroke width: garbled values use the default, then the floor applies
pub fn effective_width(stroke_width: f64) -> f64 {
    let width = if stroke_width.is_finite() && stroke_width > 0.0 {
        stroke_width
    } else {
        DEFAULT_STROKE_WIDTH
    };
    width.max(MIN_STROKE_WIDTH)
}

/// Sweep a polyline into per-segment quads
pub fn expand(points: &[Point], stroke_width: f64) -> Vec<Polygon> {
    let half = effective_width(stroke_width) / 2.0;

    points
        .windows(2)
        .filter_map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let len_sq = start.distance_squared(&end);
            if len_sq < STROKE_SEGMENT_EPSILON_SQ || !len_sq.is_finite() {
                return None;
            }
            let len = len_sq.sqrt();
            let nx = -(end.y - start.y) / len * half;
            let ny = (end.x - start.x) / len * half;

            Some(Polygon::new(vec![
                Point::new(start.x + nx, start.y + ny),
                Point::new(end.x + nx, end.y + ny),
                Point::new(end.x - nx, end.y - ny),
                Point::new(start.x - nx, start.y - ny),
            ]))
        })
        .collect()
}
