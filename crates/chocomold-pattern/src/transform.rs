//! `transform` attribute parsing
//!
//! A transform list such as `translate(10 5) rotate(45)` applies right to
//! left: the last entry is applied to the geometry first.

use lyon::math::{Angle, Transform};

/// Parse a transform list; unknown or malformed entries are skipped
pub fn parse_transform_list(text: &str) -> Transform {
    let mut result = Transform::identity();
    let mut rest = text.trim();

    while let Some(open) = rest.find('(') {
        let name = rest[..open]
            .trim()
            .trim_start_matches(',')
            .trim()
            .to_ascii_lowercase();
        let Some(close_rel) = rest[open..].find(')') else {
            break;
        };
        let close = open + close_rel;
        let args: Vec<f32> = rest[open + 1..close]
            .split([',', ' ', '\t', '\n', '\r'])
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f32>().ok())
            .collect();

        match entry_transform(&name, &args) {
            // Later entries apply first, so each one runs before the accumulated list.
            Some(t) => result = t.then(&result),
            None => tracing::debug!("Ignoring transform entry '{}' {:?}", name, args),
        }

        rest = &rest[close + 1..];
    }

    result
}

fn entry_transform(name: &str, args: &[f32]) -> Option<Transform> {
    match (name, args) {
        ("matrix", [a, b, c, d, e, f]) => Some(Transform::new(*a, *b, *c, *d, *e, *f)),
        ("translate", [tx]) => Some(Transform::translation(*tx, 0.0)),
        ("translate", [tx, ty]) => Some(Transform::translation(*tx, *ty)),
        ("scale", [s]) => Some(Transform::scale(*s, *s)),
        ("scale", [sx, sy]) => Some(Transform::scale(*sx, *sy)),
        ("rotate", [deg]) => Some(Transform::rotation(Angle::degrees(*deg))),
        ("rotate", [deg, cx, cy]) => Some(
            Transform::translation(-*cx, -*cy)
                .then_rotate(Angle::degrees(*deg))
                .then_translate(lyon::math::vector(*cx, *cy)),
        ),
        ("skewx", [deg]) => Some(Transform::new(1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0)),
        ("skewy", [deg]) => Some(Transform::new(1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)),
        _ => None,
    }
}
