//! Fit a pattern onto the mold footprint

use chocomold_core::{ShapeSet, Transform};
use tracing::debug;

/// Transform that centers the combined bounds of both classes and scales
/// their larger side to `target_footprint * user_scale`
pub fn compute_transform(shapes: &ShapeSet, target_footprint: f64, user_scale: f64) -> Transform {
    let Some(bounds) = shapes.bounds() else {
        return Transform::identity();
    };
    let max_dim = bounds.max_dimension();
    let scale = if max_dim > 0.0 && max_dim.is_finite() {
        target_footprint * user_scale / max_dim
    } else {
        1.0
    };
    Transform::new(bounds.center(), scale)
}

/// Center, scale, and flip every ring of every polygon into mold space
pub fn normalize(shapes: &ShapeSet, target_footprint: f64, user_scale: f64) -> (Transform, ShapeSet) {
    let transform = compute_transform(shapes, target_footprint, user_scale);
    let normalized = shapes.map_polygons(|p| transform.apply_polygon(p));
    debug!(
        "Normalized {} polygons: center ({:.3}, {:.3}), scale {:.5}",
        shapes.total_count(),
        transform.center.x,
        transform.center.y,
        transform.scale
    );
    (transform, normalized)
}
