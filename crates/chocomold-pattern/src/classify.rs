//! Engrave/mask classification of styled paths

use crate::color::{ColorClass, Paint};
use crate::import::StyledPath;
use crate::stroke::expand;
use chocomold_core::{Polygon, ShapeSet};
use tracing::{debug, info};

/// Polygons one path contributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathShapes {
    pub engrave: Vec<Polygon>,
    pub mask: Vec<Polygon>,
    /// Every fill polygon of the path, whatever its class
    pub fill: Vec<Polygon>,
}

fn route(class: ColorClass, polygons: Vec<Polygon>, out: &mut PathShapes) {
    match class {
        ColorClass::Engrave => out.engrave.extend(polygons),
        ColorClass::Mask => out.mask.extend(polygons),
        ColorClass::Invisible => {}
    }
}

/// Classify the fill and stroke geometry of one path
pub fn classify(path: &StyledPath) -> PathShapes {
    let mut out = PathShapes {
        fill: path.fill_polygons(),
        ..Default::default()
    };

    // An unset fill paints, so it engraves.
    let fill_class = path.style.fill.class().unwrap_or(ColorClass::Engrave);
    route(fill_class, out.fill.clone(), &mut out);

    // A stroke needs an explicit color.
    if let Some(stroke_class) = stroke_class(&path.style.stroke) {
        let quads: Vec<Polygon> = path
            .stroke_polylines()
            .iter()
            .flat_map(|line| expand(line, path.style.stroke_width))
            .collect();
        route(stroke_class, quads, &mut out);
    }

    out
}

fn stroke_class(stroke: &Paint) -> Option<ColorClass> {
    if stroke.is_none() {
        return None;
    }
    stroke.class().filter(|c| *c != ColorClass::Invisible)
}

/// Classify every path in order. When nothing at all classifies but fill
/// geometry existed, the fills are admitted as engrave.
pub fn classify_paths(paths: &[StyledPath]) -> ShapeSet {
    let mut set = ShapeSet::default();
    let mut fills = Vec::new();

    for path in paths {
        let shapes = classify(path);
        set.engrave.extend(shapes.engrave);
        set.mask.extend(shapes.mask);
        fills.extend(shapes.fill);
    }

    if set.is_empty() && !fills.is_empty() {
        info!(
            "No visible engrave or mask regions; using {} fill polygons as engrave",
            fills.len()
        );
        set.engrave = fills;
    }

    debug!(
        "Classified {} paths into {} engrave / {} mask polygons",
        paths.len(),
        set.engrave.len(),
        set.mask.len()
    );
    set
}
