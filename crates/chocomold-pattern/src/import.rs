//! SVG pattern import
//!
//! Reads the coordinate frame and every drawable element of an SVG document
//! into [`StyledPath`]s with fully resolved paint. Tags and attributes are
//! scanned with regular expressions; the element tree is tracked with a
//! stack so group styles and transforms reach their descendants.

use crate::path_data::parse_path_data;
use crate::style::{
    parse_leading_number, ComputedStyle, ElementIdentity, PaintStyle, StyleProperties,
    Stylesheet, STYLE_PROPERTIES,
};
use crate::transform::parse_transform_list;
use chocomold_core::constants::DEFAULT_FLATTEN_TOLERANCE;
use chocomold_core::geometry::{ring_contains_point, ring_signed_area};
use chocomold_core::{Bounds, Error, Point, Polygon, Result, Ring};
use lyon::math::Transform;
use lyon::path::iterator::PathIterator;
use lyon::path::Event;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"));
static STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style\s*>").expect("invalid style regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][\w:.-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("invalid tag regex")
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("invalid attribute regex")
});

/// Elements whose content is never rendered directly
const NON_RENDERED: &[&str] = &[
    "defs",
    "clippath",
    "mask",
    "symbol",
    "pattern",
    "marker",
    "lineargradient",
    "radialgradient",
    "filter",
    "title",
    "desc",
    "metadata",
    "text",
];

const DRAWABLE: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon",
];

/// The document's user coordinate system (its view box)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.min_x,
            self.min_y,
            self.min_x + self.width,
            self.min_y + self.height,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One flattened subpath in document coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A drawable element reduced to polylines plus resolved paint
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPath {
    /// Source element name, for diagnostics
    pub element: String,
    pub subpaths: Vec<Subpath>,
    pub style: PaintStyle,
}

impl StyledPath {
    /// Fill regions: every subpath with at least three points is a ring,
    /// and rings nested at odd depth become holes of their container
    pub fn fill_polygons(&self) -> Vec<Polygon> {
        let rings: Vec<Ring> = self
            .subpaths
            .iter()
            .filter(|s| s.points.len() >= 3)
            .map(|s| s.points.clone())
            .collect();
        nest_rings(rings)
    }

    /// Stroke centerlines; closed subpaths repeat their first point
    pub fn stroke_polylines(&self) -> Vec<Vec<Point>> {
        self.subpaths
            .iter()
            .filter(|s| s.points.len() >= 2)
            .map(|s| {
                let mut line = s.points.clone();
                if s.closed {
                    line.push(s.points[0]);
                }
                line
            })
            .collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.subpaths.iter().flat_map(|s| s.points.iter()))
    }
}

/// Group rings into polygons with holes by containment depth
pub fn nest_rings(rings: Vec<Ring>) -> Vec<Polygon> {
    let areas: Vec<f64> = rings.iter().map(|r| ring_signed_area(r).abs()).collect();
    let mut order: Vec<usize> = (0..rings.len()).filter(|i| areas[*i] > 0.0).collect();
    order.sort_by(|a, b| areas[*b].total_cmp(&areas[*a]));

    let mut polygon_of: Vec<Option<usize>> = vec![None; rings.len()];
    let mut polygons: Vec<Polygon> = Vec::new();

    for (rank, &i) in order.iter().enumerate() {
        let probe = rings[i][0];
        // Larger rings come first, so the last container found is the innermost.
        let mut parent = None;
        let mut containers = 0;
        for &j in &order[..rank] {
            if ring_contains_point(&rings[j], probe) {
                containers += 1;
                parent = Some(j);
            }
        }

        let hole_of = parent
            .filter(|_| containers % 2 == 1)
            .and_then(|p| polygon_of[p]);
        match hole_of {
            Some(poly) => polygons[poly].holes.push(rings[i].clone()),
            None => {
                polygon_of[i] = Some(polygons.len());
                polygons.push(Polygon::new(rings[i].clone()));
            }
        }
    }

    polygons
}

/// A parsed SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub frame: Frame,
    pub paths: Vec<StyledPath>,
}

struct ElementContext {
    tag: String,
    style: ComputedStyle,
    transform: Transform,
    skip: bool,
}

impl SvgDocument {
    /// Parse with the default curve flattening tolerance
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_tolerance(text, DEFAULT_FLATTEN_TOLERANCE)
    }

    pub fn parse_with_tolerance(text: &str, tolerance: f64) -> Result<Self> {
        let text = COMMENT_RE.replace_all(text, "");

        let mut sheet = Stylesheet::default();
        for caps in STYLE_RE.captures_iter(&text) {
            let css = caps[1].replace("<![CDATA[", "").replace("]]>", "");
            sheet.append(&css);
        }
        let body = STYLE_RE.replace_all(&text, "");

        let mut stack = vec![ElementContext {
            tag: String::new(),
            style: ComputedStyle::default(),
            transform: Transform::identity(),
            skip: false,
        }];
        let mut frame: Option<Frame> = None;
        let mut saw_svg = false;
        let mut drawable_count = 0usize;
        let mut paths = Vec::new();

        for caps in TAG_RE.captures_iter(&body) {
            let closing = !caps[1].is_empty();
            let tag = local_name(&caps[2]);
            let raw_attrs = &caps[3];

            if closing {
                if let Some(pos) = stack.iter().rposition(|c| c.tag == tag) {
                    if pos > 0 {
                        stack.truncate(pos);
                    }
                }
                continue;
            }

            let self_closing = raw_attrs.trim_end().ends_with('/');
            let attrs = parse_attributes(raw_attrs);
            let Some(parent) = stack.last() else {
                break;
            };

            let declared = declared_style(&sheet, &tag, &attrs);
            let style = parent.style.child(&declared);
            let transform = match attrs.get("transform") {
                Some(t) => parse_transform_list(t).then(&parent.transform),
                None => parent.transform,
            };
            let skip = parent.skip || NON_RENDERED.contains(&tag.as_str());

            if tag == "svg" && !saw_svg {
                saw_svg = true;
                frame = frame_from_attributes(&attrs);
            }

            if DRAWABLE.contains(&tag.as_str()) && !skip && !style.hidden {
                drawable_count += 1;
                match element_path_data(&tag, &attrs) {
                    Some(d) => {
                        let subpaths = flatten(&d, &transform, tolerance);
                        if subpaths.is_empty() {
                            debug!("<{}> produced no geometry", tag);
                        } else {
                            paths.push(StyledPath {
                                element: tag.clone(),
                                subpaths,
                                style: style.paint_style(),
                            });
                        }
                    }
                    None => debug!("<{}> has no usable geometry attributes", tag),
                }
            }

            if !self_closing {
                stack.push(ElementContext {
                    tag,
                    style,
                    transform,
                    skip,
                });
            }
        }

        if !saw_svg {
            return Err(Error::parse("no <svg> element found"));
        }
        if drawable_count > 0 && paths.is_empty() {
            return Err(Error::parse(format!(
                "none of the {} drawable elements yielded geometry",
                drawable_count
            )));
        }

        let frame = frame
            .or_else(|| {
                Bounds::from_points(
                    paths
                        .iter()
                        .flat_map(|p| p.subpaths.iter())
                        .flat_map(|s| s.points.iter()),
                )
                .map(|b| Frame::new(b.min_x, b.min_y, b.width(), b.height()))
            })
            .unwrap_or_default();

        debug!(
            "Parsed SVG: frame {:?}, {} styled paths from {} drawable elements",
            frame,
            paths.len(),
            drawable_count
        );

        Ok(Self { frame, paths })
    }

    /// Bounds of all path geometry
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.paths
            .iter()
            .filter_map(StyledPath::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

fn local_name(tag: &str) -> String {
    tag.rsplit(':').next().unwrap_or(tag).to_ascii_lowercase()
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

/// Stylesheet rules, then presentation attributes, then inline style
fn declared_style(sheet: &Stylesheet, tag: &str, attrs: &HashMap<String, String>) -> StyleProperties {
    let identity = ElementIdentity {
        tag,
        id: attrs.get("id").map(String::as_str),
        class: attrs.get("class").map(String::as_str),
    };
    let mut declared = sheet.matching(&identity);

    let mut presentation = StyleProperties::default();
    for name in STYLE_PROPERTIES {
        if let Some(value) = attrs.get(*name) {
            presentation.set(name, value);
        }
    }
    declared.overlay(&presentation);

    if let Some(inline) = attrs.get("style") {
        declared.overlay(&StyleProperties::from_declarations(inline));
    }
    declared
}

fn frame_from_attributes(attrs: &HashMap<String, String>) -> Option<Frame> {
    if let Some(view_box) = attrs.get("viewBox") {
        let values: Vec<f64> = view_box
            .split([',', ' ', '\t', '\n', '\r'])
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let [min_x, min_y, width, height] = values[..] {
            if width > 0.0 && height > 0.0 {
                return Some(Frame::new(min_x, min_y, width, height));
            }
        }
    }

    let dimension = |name: &str| {
        attrs
            .get(name)
            .filter(|v| !v.trim_end().ends_with('%'))
            .and_then(|v| parse_leading_number(v))
            .filter(|v| *v > 0.0)
    };
    match (dimension("width"), dimension("height")) {
        (Some(w), Some(h)) => Some(Frame::new(0.0, 0.0, w, h)),
        _ => None,
    }
}

fn number_attr(attrs: &HashMap<String, String>, name: &str) -> Option<f64> {
    attrs.get(name).and_then(|v| parse_leading_number(v))
}

fn point_list(text: &str) -> Vec<(f64, f64)> {
    let numbers: Vec<f64> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map_while(|s| s.parse::<f64>().ok())
        .collect();
    numbers.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// Express any drawable element as path data
fn element_path_data(tag: &str, attrs: &HashMap<String, String>) -> Option<String> {
    let num = |name: &str| number_attr(attrs, name);

    match tag {
        "path" => attrs.get("d").filter(|d| !d.trim().is_empty()).cloned(),
        "rect" => {
            let x = num("x").unwrap_or(0.0);
            let y = num("y").unwrap_or(0.0);
            let w = num("width").filter(|v| *v > 0.0)?;
            let h = num("height").filter(|v| *v > 0.0)?;
            let (rx, ry) = match (num("rx"), num("ry")) {
                (Some(rx), Some(ry)) => (rx, ry),
                (Some(r), None) | (None, Some(r)) => (r, r),
                (None, None) => (0.0, 0.0),
            };
            let rx = rx.clamp(0.0, w / 2.0);
            let ry = ry.clamp(0.0, h / 2.0);
            if rx > 0.0 && ry > 0.0 {
                Some(format!(
                    "M{} {} H{} A{rx} {ry} 0 0 1 {} {} V{} A{rx} {ry} 0 0 1 {} {} H{} \
                     A{rx} {ry} 0 0 1 {} {} V{} A{rx} {ry} 0 0 1 {} {} Z",
                    x + rx,
                    y,
                    x + w - rx,
                    x + w,
                    y + ry,
                    y + h - ry,
                    x + w - rx,
                    y + h,
                    x + rx,
                    x,
                    y + h - ry,
                    y + ry,
                    x + rx,
                    y,
                ))
            } else {
                Some(format!("M{} {} H{} V{} H{} Z", x, y, x + w, y + h, x))
            }
        }
        "circle" | "ellipse" => {
            let cx = num("cx").unwrap_or(0.0);
            let cy = num("cy").unwrap_or(0.0);
            let (rx, ry) = if tag == "circle" {
                let r = num("r")?;
                (r, r)
            } else {
                (num("rx")?, num("ry")?)
            };
            if rx <= 0.0 || ry <= 0.0 {
                return None;
            }
            Some(format!(
                "M{} {} A{rx} {ry} 0 1 0 {} {} A{rx} {ry} 0 1 0 {} {} Z",
                cx - rx,
                cy,
                cx + rx,
                cy,
                cx - rx,
                cy,
            ))
        }
        "line" => Some(format!(
            "M{} {} L{} {}",
            num("x1").unwrap_or(0.0),
            num("y1").unwrap_or(0.0),
            num("x2").unwrap_or(0.0),
            num("y2").unwrap_or(0.0),
        )),
        "polyline" | "polygon" => {
            let points = point_list(attrs.get("points")?);
            let (first, rest) = points.split_first()?;
            let mut d = format!("M{} {}", first.0, first.1);
            for (x, y) in rest {
                d.push_str(&format!(" L{} {}", x, y));
            }
            if tag == "polygon" {
                d.push_str(" Z");
            }
            Some(d)
        }
        _ => None,
    }
}

/// Parse, transform and flatten path data into subpaths
fn flatten(d: &str, transform: &Transform, tolerance: f64) -> Vec<Subpath> {
    let path = parse_path_data(d).transformed(transform);
    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    let push_point = |points: &mut Vec<Point>, x: f32, y: f32| {
        let p = Point::new(x as f64, y as f64);
        if points.last().is_none_or(|last| last.distance_squared(&p) > 1e-12) {
            points.push(p);
        }
    };

    for event in path.iter().flattened(tolerance as f32) {
        match event {
            Event::Begin { at } => {
                current.clear();
                push_point(&mut current, at.x, at.y);
            }
            Event::Line { to, .. } => push_point(&mut current, to.x, to.y),
            Event::End { close, .. } => {
                let mut points = std::mem::take(&mut current);
                if points.len() > 1 && points[0].distance_squared(&points[points.len() - 1]) <= 1e-12 {
                    points.pop();
                }
                if points.len() >= 2 && points.iter().all(Point::is_finite) {
                    subpaths.push(Subpath {
                        points,
                        closed: close,
                    });
                }
            }
            _ => {}
        }
    }

    subpaths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorClass;

    #[test]
    fn test_missing_svg_is_parse_error() {
        let err = SvgDocument::parse("<html><body>nope</body></html>").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_view_box_frame() {
        let doc = SvgDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-5 10 200 100" width="20mm"></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.frame, Frame::new(-5.0, 10.0, 200.0, 100.0));
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_width_height_frame_fallback() {
        let doc = SvgDocument::parse(r#"<svg width="64px" height="32"><rect width="4" height="4"/></svg>"#)
            .unwrap();
        assert_eq!(doc.frame, Frame::new(0.0, 0.0, 64.0, 32.0));
    }

    #[test]
    fn test_rect_becomes_closed_ring() {
        let doc = SvgDocument::parse(
            r##"<svg viewBox="0 0 100 100"><rect x="25" y="25" width="50" height="50" fill="#000"/></svg>"##,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        let polys = doc.paths[0].fill_polygons();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].outer.len(), 4);
        assert!((polys[0].area() - 2500.0).abs() < 1e-3);
        assert_eq!(doc.paths[0].style.fill.class(), Some(ColorClass::Engrave));
    }

    #[test]
    fn test_hole_nesting() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 10 10"><path d="M0 0H10V10H0Z M2 2H8V8H2Z M4 4H6V6H4Z"/></svg>"#,
        )
        .unwrap();
        let polys = doc.paths[0].fill_polygons();
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[0].holes.len(), 1);
        assert!(polys[1].holes.is_empty());
    }

    #[test]
    fn test_group_style_and_transform_inherit() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 100 100">
                 <g fill="white" transform="translate(10 0)">
                   <rect width="5" height="5"/>
                   <g transform="scale(2)"><rect width="5" height="5" style="fill:#123"/></g>
                 </g>
               </svg>"#,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.paths[0].style.fill.class(), Some(ColorClass::Mask));
        assert_eq!(doc.paths[1].style.fill.class(), Some(ColorClass::Engrave));
        let b = doc.paths[1].bounds().unwrap();
        assert!((b.min_x - 10.0).abs() < 1e-4);
        assert!((b.max_x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_css_class_precedence() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 10 10">
                 <style><![CDATA[ .w { fill: #fff } .k { fill: #000 } ]]></style>
                 <rect class="w" width="1" height="1"/>
                 <rect class="w" fill="black" width="1" height="1"/>
                 <rect class="k" style="fill: white" width="1" height="1"/>
               </svg>"#,
        )
        .unwrap();
        let classes: Vec<_> = doc.paths.iter().map(|p| p.style.fill.class()).collect();
        assert_eq!(
            classes,
            vec![
                Some(ColorClass::Mask),
                Some(ColorClass::Engrave),
                Some(ColorClass::Mask)
            ]
        );
    }

    #[test]
    fn test_defs_and_hidden_are_skipped() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 10 10">
                 <defs><rect id="r" width="3" height="3"/></defs>
                 <rect width="2" height="2" display="none"/>
                 <circle cx="5" cy="5" r="2"/>
               </svg>"#,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].element, "circle");
    }

    #[test]
    fn test_drawables_without_geometry_fail() {
        let err = SvgDocument::parse(r#"<svg viewBox="0 0 10 10"><path d=""/><rect width="0" height="2"/></svg>"#)
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_polyline_stroke_and_line() {
        let doc = SvgDocument::parse(
            r##"<svg viewBox="0 0 10 10">
                 <polyline points="0,0 5,0 5,5" fill="none" stroke="#000"/>
                 <line x1="0" y1="0" x2="3" y2="4" stroke="black"/>
               </svg>"##,
        )
        .unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.paths[0].stroke_polylines()[0].len(), 3);
        assert!(doc.paths[1].fill_polygons().is_empty());
    }

    #[test]
    fn test_closed_polygon_stroke_returns_to_start() {
        let doc = SvgDocument::parse(
            r#"<svg viewBox="0 0 10 10"><polygon points="0 0 4 0 4 4" stroke="red"/></svg>"#,
        )
        .unwrap();
        let lines = doc.paths[0].stroke_polylines();
        assert_eq!(lines[0].len(), 4);
        assert_eq!(lines[0][0], lines[0][3]);
    }

    #[test]
    fn test_nest_rings_skips_zero_area() {
        let flat = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(nest_rings(vec![flat]).is_empty());
    }
}
