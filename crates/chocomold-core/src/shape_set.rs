//! Shape sets and the mold-space transform
//!
//! A [`ShapeSet`] is derived fresh for every uploaded pattern and is never
//! mutated in place: each pipeline stage builds a new one.

use crate::geometry::{Bounds, Point, Polygon};
use serde::{Deserialize, Serialize};

/// Engrave and mask polygons, kept in source traversal order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeSet {
    /// Regions carved into (or, inverted, raised from) the mold
    pub engrave: Vec<Polygon>,
    /// Regions excluded from the engrave tool
    pub mask: Vec<Polygon>,
}

impl ShapeSet {
    pub fn new(engrave: Vec<Polygon>, mask: Vec<Polygon>) -> Self {
        Self { engrave, mask }
    }

    pub fn is_empty(&self) -> bool {
        self.engrave.is_empty() && self.mask.is_empty()
    }

    /// Total polygon count across both classes
    pub fn total_count(&self) -> usize {
        self.engrave.len() + self.mask.len()
    }

    /// One bounding box over engrave and mask polygons together
    pub fn bounds(&self) -> Option<Bounds> {
        self.engrave
            .iter()
            .chain(self.mask.iter())
            .filter_map(Polygon::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Build a new set by applying `f` to every polygon of both classes
    pub fn map_polygons(&self, f: impl Fn(&Polygon) -> Polygon) -> ShapeSet {
        ShapeSet {
            engrave: self.engrave.iter().map(&f).collect(),
            mask: self.mask.iter().map(&f).collect(),
        }
    }
}

/// Maps document coordinates onto the mold footprint
///
/// Mold space is centered on the origin with Y pointing up, so applying the
/// transform mirrors the document's downward Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub center: Point,
    pub scale: f64,
}

impl Transform {
    pub fn new(center: Point, scale: f64) -> Self {
        Self { center, scale }
    }

    pub fn identity() -> Self {
        Self::new(Point::default(), 1.0)
    }

    /// Translate by `-center`, scale uniformly, and flip Y into mold space
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.center.x) * self.scale,
            (self.center.y - p.y) * self.scale,
        )
    }

    pub fn apply_polygon(&self, polygon: &Polygon) -> Polygon {
        polygon.map_points(|p| self.apply(p))
    }
}
