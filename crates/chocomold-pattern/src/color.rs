//! Paint color parsing and engrave/mask classification
//!
//! Every accepted color notation is parsed into a [`ColorValue`] and resolved
//! through [`ColorValue::canonical`] to one [`Rgba`]. Classification only ever
//! looks at the canonical form.

use chocomold_core::constants::{INVISIBLE_ALPHA, MASK_CHANNEL_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Canonical color: channels on a 0-255 scale, alpha in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 255.0),
            g: g.clamp(0.0, 255.0),
            b: b.clamp(0.0, 255.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha_factor(self, factor: f64) -> Self {
        Self::new(self.r, self.g, self.b, self.a * factor)
    }
}

/// A color as written in the document
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
    Hex(Rgba),
    /// `rgb(...)` or `rgba(...)`
    Functional(Rgba),
    /// A recognized color keyword
    Named(&'static str, Rgba),
    Transparent,
    None,
    /// Anything else; classified as engrave
    Unparsable(String),
}

const NAMED_COLORS: &[(&str, (f64, f64, f64))] = &[
    ("white", (255.0, 255.0, 255.0)),
    ("black", (0.0, 0.0, 0.0)),
    ("red", (255.0, 0.0, 0.0)),
    ("green", (0.0, 128.0, 0.0)),
    ("blue", (0.0, 0.0, 255.0)),
    ("gray", (128.0, 128.0, 128.0)),
    ("grey", (128.0, 128.0, 128.0)),
    ("snow", (255.0, 250.0, 250.0)),
    ("ivory", (255.0, 255.0, 240.0)),
    ("ghostwhite", (248.0, 248.0, 255.0)),
    ("whitesmoke", (245.0, 245.0, 245.0)),
];

impl ColorValue {
    /// Parse a color string; never fails
    pub fn parse(input: &str) -> Self {
        let value = input.trim().to_ascii_lowercase();

        match value.as_str() {
            "none" => return Self::None,
            "transparent" => return Self::Transparent,
            _ => {}
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).map_or_else(|| Self::Unparsable(value.clone()), Self::Hex);
        }

        if value.starts_with("rgb") {
            return parse_functional(&value)
                .map_or_else(|| Self::Unparsable(value.clone()), Self::Functional);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(name, (r, g, b))| Self::Named(*name, Rgba::opaque(*r, *g, *b)))
            .unwrap_or(Self::Unparsable(value))
    }

    /// Canonical RGBA, or `None` for the `none` keyword and unparsable input
    pub fn canonical(&self) -> Option<Rgba> {
        match self {
            Self::Hex(c) | Self::Functional(c) | Self::Named(_, c) => Some(*c),
            Self::Transparent => Some(Rgba::new(0.0, 0.0, 0.0, 0.0)),
            Self::None | Self::Unparsable(_) => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)?, digit(1)?, digit(2)?, 255),
        4 => (digit(0)?, digit(1)?, digit(2)?, digit(3)?),
        6 => (pair(0)?, pair(2)?, pair(4)?, 255),
        8 => (pair(0)?, pair(2)?, pair(4)?, pair(6)?),
        _ => return None,
    };
    Some(Rgba::new(
        r as f64,
        g as f64,
        b as f64,
        a as f64 / 255.0,
    ))
}

fn parse_functional(value: &str) -> Option<Rgba> {
    let open = value.find('(')?;
    let close = value.rfind(')')?;
    if close <= open {
        return None;
    }

    // Accept both `rgb(1, 2, 3)` and `rgb(1 2 3 / 0.5)`.
    let parts: Vec<&str> = value[open + 1..close]
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() < 3 {
        return None;
    }

    let channel = |s: &str| -> Option<f64> {
        match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok().map(|v| v * 2.55),
            None => s.parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    };
    let alpha = |s: &str| -> Option<f64> {
        match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0),
            None => s.parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(s) => alpha(s)?,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}

/// Role a paint plays in the mold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Engrave,
    Mask,
    Invisible,
}

/// Classify a canonical color
pub fn classify_rgba(color: Rgba) -> ColorClass {
    if color.a <= INVISIBLE_ALPHA {
        return ColorClass::Invisible;
    }
    let white = [color.r, color.g, color.b]
        .iter()
        .all(|c| *c >= MASK_CHANNEL_THRESHOLD);
    if white {
        ColorClass::Mask
    } else {
        ColorClass::Engrave
    }
}

/// A resolved paint: absent, or a color with an opacity multiplier
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Unset,
    Color { value: ColorValue, opacity: f64 },
}

impl Paint {
    pub fn parse(input: &str) -> Self {
        Self::Color {
            value: ColorValue::parse(input),
            opacity: 1.0,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// True for the `none` keyword
    pub fn is_none(&self) -> bool {
        matches!(
            self,
            Self::Color {
                value: ColorValue::None,
                ..
            }
        )
    }

    /// Classification of a set paint; `None` when unset
    pub fn class(&self) -> Option<ColorClass> {
        match self {
            Self::Unset => None,
            Self::Color { value, opacity } => Some(match value.canonical() {
                Some(rgba) => classify_rgba(rgba.with_alpha_factor(*opacity)),
                None if matches!(value, ColorValue::None) => ColorClass::Invisible,
                None => {
                    tracing::warn!("Unrecognized color {:?}, treating as engrave", value);
                    ColorClass::Engrave
                }
            }),
        }
    }
}

/// Classify a color string
pub fn classify(color: &str) -> ColorClass {
    Paint::parse(color).class().unwrap_or(ColorClass::Engrave)
}
