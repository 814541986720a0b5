//! Conversions between pattern polygons and csgrs sketches
//!
//! csgrs runs its 2-D booleans on geo polygons and can panic on degenerate
//! input; [`guarded`] turns such a panic into an error value.

use chocomold_core::{Point, Polygon, Ring};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;

fn ring_coords(ring: &[Point]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x, p.y]).collect()
}

/// One polygon as a sketch; holes are subtracted from the outer ring
pub fn polygon_to_sketch(polygon: &Polygon) -> Sketch<()> {
    let oriented = polygon.oriented();
    let mut sketch = Sketch::polygon(&ring_coords(&oriented.outer), None);
    for hole in oriented.holes.iter().filter(|h| h.len() >= 3) {
        let hole = Sketch::polygon(&ring_coords(hole), None);
        sketch = sketch.difference(&hole);
    }
    sketch
}

/// Union of several polygons
pub fn union_to_sketch(polygons: &[Polygon]) -> Sketch<()> {
    let mut iter = polygons.iter().filter(|p| p.outer.len() >= 3);
    let Some(first) = iter.next() else {
        return Sketch::new();
    };
    iter.fold(polygon_to_sketch(first), |acc, p| acc.union(&polygon_to_sketch(p)))
}

/// Open ring from a closed geo ring, dropping the repeated closing point
fn open_ring(coords: impl Iterator<Item = (f64, f64)>) -> Ring {
    let mut ring: Ring = Vec::new();
    for (x, y) in coords {
        let p = Point::new(x, y);
        if ring.last().is_none_or(|last| last.distance_squared(&p) > 1e-18) {
            ring.push(p);
        }
    }
    if ring.len() > 1 && ring[0].distance_squared(&ring[ring.len() - 1]) <= 1e-18 {
        ring.pop();
    }
    ring
}

/// Read every polygon (with holes) back out of a sketch
pub fn sketch_to_polygons(sketch: &Sketch<()>) -> Vec<Polygon> {
    let mp = sketch.to_multipolygon();
    mp.0.iter()
        .map(|poly| {
            let outer = open_ring(poly.exterior().0.iter().map(|c| (c.x, c.y)));
            let holes = poly
                .interiors()
                .iter()
                .map(|ring| open_ring(ring.0.iter().map(|c| (c.x, c.y))))
                .filter(|h| h.len() >= 3)
                .collect();
            Polygon::with_holes(outer, holes)
        })
        .filter(|p| p.outer.len() >= 3)
        .collect()
}

/// Run a geometry kernel call, converting a panic into an error message
pub fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "geometry kernel panicked".to_string())
    })
}
