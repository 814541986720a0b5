//! Style resolution
//!
//! Paint properties reach an element from four places: stylesheet rules,
//! presentation attributes, the inline `style` attribute, and inheritance
//! from enclosing groups. Resolution runs as a separate pass over the element
//! tree and produces a finished [`PaintStyle`] per drawable element, so the
//! classifier never consults the document.

use crate::color::Paint;
use chocomold_core::constants::DEFAULT_STROKE_WIDTH;

/// Property names the resolver understands; everything else is ignored
pub const STYLE_PROPERTIES: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "fill-opacity",
    "stroke-opacity",
    "opacity",
    "display",
    "visibility",
];

/// Paint-related properties declared on one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProperties {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub fill_opacity: Option<String>,
    pub stroke_opacity: Option<String>,
    pub opacity: Option<String>,
    pub display: Option<String>,
    pub visibility: Option<String>,
}

impl StyleProperties {
    /// Set one property by its CSS name. Returns false for names outside
    /// [`STYLE_PROPERTIES`].
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim().trim_end_matches("!important").trim();
        if value.is_empty() {
            return false;
        }
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "fill" => &mut self.fill,
            "stroke" => &mut self.stroke,
            "stroke-width" => &mut self.stroke_width,
            "fill-opacity" => &mut self.fill_opacity,
            "stroke-opacity" => &mut self.stroke_opacity,
            "opacity" => &mut self.opacity,
            "display" => &mut self.display,
            "visibility" => &mut self.visibility,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }

    /// Parse a declaration block such as `fill: #000; stroke-width: 2`
    pub fn from_declarations(text: &str) -> Self {
        let mut props = Self::default();
        for declaration in text.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                props.set(name, value);
            }
        }
        props
    }

    /// Copy every property `other` sets over this one
    pub fn overlay(&mut self, other: &StyleProperties) {
        fn take(dst: &mut Option<String>, src: &Option<String>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        take(&mut self.fill, &other.fill);
        take(&mut self.stroke, &other.stroke);
        take(&mut self.stroke_width, &other.stroke_width);
        take(&mut self.fill_opacity, &other.fill_opacity);
        take(&mut self.stroke_opacity, &other.stroke_opacity);
        take(&mut self.opacity, &other.opacity);
        take(&mut self.display, &other.display);
        take(&mut self.visibility, &other.visibility);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Universal,
    Tag(String),
    Class(String),
    Id(String),
    TagClass(String, String),
}

impl Selector {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        // Descendant and child combinators are not supported; match on the last compound.
        let compound = text.rsplit([' ', '>']).next()?.trim();
        if compound.is_empty() {
            return None;
        }
        if compound == "*" {
            return Some(Self::Universal);
        }
        if let Some(id) = compound.strip_prefix('#') {
            return Some(Self::Id(id.to_string()));
        }
        if let Some(class) = compound.strip_prefix('.') {
            return Some(Self::Class(class.to_string()));
        }
        match compound.split_once('.') {
            Some((tag, class)) => Some(Self::TagClass(
                tag.to_ascii_lowercase(),
                class.to_string(),
            )),
            None => Some(Self::Tag(compound.to_ascii_lowercase())),
        }
    }

    fn matches(&self, element: &ElementIdentity<'_>) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => tag == element.tag,
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.id == Some(id.as_str()),
            Self::TagClass(tag, class) => tag == element.tag && element.has_class(class),
        }
    }
}

/// What stylesheet selectors can match on
#[derive(Debug, Clone, Copy)]
pub struct ElementIdentity<'a> {
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub class: Option<&'a str>,
}

impl ElementIdentity<'_> {
    fn has_class(&self, name: &str) -> bool {
        self.class
            .is_some_and(|c| c.split_whitespace().any(|c| c == name))
    }
}

/// Rules from the document's `<style>` elements, in source order
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: Vec<(Selector, StyleProperties)>,
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        let mut sheet = Self::default();
        sheet.append(css);
        sheet
    }

    /// Add the rules of another style block
    pub fn append(&mut self, css: &str) {
        let css = strip_css_comments(css);
        for block in css.split('}') {
            let Some((selectors, body)) = block.split_once('{') else {
                continue;
            };
            if selectors.trim_start().starts_with('@') {
                continue;
            }
            let props = StyleProperties::from_declarations(body);
            for selector in selectors.split(',').filter_map(Selector::parse) {
                self.rules.push((selector, props.clone()));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Merge every matching rule in source order
    pub fn matching(&self, element: &ElementIdentity<'_>) -> StyleProperties {
        let mut props = StyleProperties::default();
        for (selector, rule) in &self.rules {
            if selector.matches(element) {
                props.overlay(rule);
            }
        }
        props
    }
}

fn strip_css_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Inherited style state at one point of the element tree
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    /// Product of `opacity` over this element and its ancestors
    pub group_opacity: f64,
    pub hidden: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: None,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            group_opacity: 1.0,
            hidden: false,
        }
    }
}

impl ComputedStyle {
    /// Style of a child declaring `declared`, inheriting the rest from `self`
    pub fn child(&self, declared: &StyleProperties) -> Self {
        let pick = |own: &Option<String>, parent: &Option<String>| match own.as_deref() {
            Some("inherit") | None => parent.clone(),
            Some(_) => own.clone(),
        };

        let hidden = match (declared.display.as_deref(), declared.visibility.as_deref()) {
            (Some("none"), _) => true,
            (_, Some("hidden" | "collapse")) => true,
            (_, Some("visible")) => false,
            _ => self.hidden,
        };

        Self {
            fill: pick(&declared.fill, &self.fill),
            stroke: pick(&declared.stroke, &self.stroke),
            stroke_width: pick(&declared.stroke_width, &self.stroke_width),
            fill_opacity: declared
                .fill_opacity
                .as_deref()
                .and_then(parse_opacity)
                .unwrap_or(self.fill_opacity),
            stroke_opacity: declared
                .stroke_opacity
                .as_deref()
                .and_then(parse_opacity)
                .unwrap_or(self.stroke_opacity),
            group_opacity: self.group_opacity
                * declared
                    .opacity
                    .as_deref()
                    .and_then(parse_opacity)
                    .unwrap_or(1.0),
            hidden,
        }
    }

    /// Final paint for a drawable element
    pub fn paint_style(&self) -> PaintStyle {
        let paint = |value: &Option<String>, opacity: f64| match value {
            None => Paint::Unset,
            Some(v) => match Paint::parse(v) {
                Paint::Color { value, .. } => Paint::Color {
                    value,
                    opacity: opacity * self.group_opacity,
                },
                Paint::Unset => Paint::Unset,
            },
        };

        PaintStyle {
            fill: paint(&self.fill, self.fill_opacity),
            stroke: paint(&self.stroke, self.stroke_opacity),
            stroke_width: self
                .stroke_width
                .as_deref()
                .map(parse_stroke_width)
                .unwrap_or(DEFAULT_STROKE_WIDTH),
        }
    }
}

/// Fully resolved paint of one drawable element
#[derive(Debug, Clone, PartialEq)]
pub struct PaintStyle {
    pub fill: Paint,
    pub stroke: Paint,
    /// Declared stroke width; garbled or non-positive values fall back to the default
    pub stroke_width: f64,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            fill: Paint::Unset,
            stroke: Paint::Unset,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Leading numeric prefix of a CSS value (`2.5px` -> 2.5)
pub fn parse_leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit()
                || *c == '.'
                || ((*c == '-' || *c == '+') && *i == 0)
                || *c == 'e'
                || *c == 'E')
        })
        .map_or(value.len(), |(i, _)| i);
    // Trim a trailing exponent marker left over from suffixes like `2em`.
    let number = value[..end].trim_end_matches(['e', 'E']);
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_stroke_width(value: &str) -> f64 {
    parse_leading_number(value)
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_STROKE_WIDTH)
}

fn parse_opacity(value: &str) -> Option<f64> {
    let value = value.trim();
    let parsed = match value.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
        None => value.parse::<f64>().ok(),
    };
    parsed.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0))
}
