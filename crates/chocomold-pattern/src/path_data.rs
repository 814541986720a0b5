//! SVG path data (`d` attribute) to lyon paths
//!
//! Supports the full command set `M L H V C S Q T A Z` in absolute and
//! relative form, implicit command repetition, compact numbers such as
//! `1.5.5` or `10-5`, and packed arc flags (`a1 1 0 011 1`). Parsing stops at
//! the first malformed token and keeps the geometry read so far.

use lyon::math::point;
use lyon::path::Path;

type Xy = (f64, f64);

/// Character-level reader over path data
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || *b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    /// Next command letter, if the next token is one
    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        let b = *self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() && b != b'e' && b != b'E' {
            self.pos += 1;
            Some(b)
        } else {
            None
        }
    }

    /// True when a number (not a command) follows
    fn number_follows(&mut self) -> bool {
        self.skip_separators();
        matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.'))
    }

    fn number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let mut seen_dot = false;
        let mut seen_digit = false;

        if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while let Some(b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9' => seen_digit = true,
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.pos += 1;
        }
        if seen_digit && matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == exp_start {
                self.pos = mark;
            }
        }

        if !seen_digit {
            self.pos = start;
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Arc flags may be packed without separators
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.bytes.get(self.pos)? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    fn pair(&mut self) -> Option<Xy> {
        Some((self.number()?, self.number()?))
    }
}

/// Path construction state
struct PathState {
    builder: lyon::path::path::Builder,
    current: Xy,
    start: Xy,
    open: bool,
    last_cubic_ctrl: Option<Xy>,
    last_quad_ctrl: Option<Xy>,
}

impl PathState {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            current: (0.0, 0.0),
            start: (0.0, 0.0),
            open: false,
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    fn resolve(&self, relative: bool, p: Xy) -> Xy {
        if relative {
            (self.current.0 + p.0, self.current.1 + p.1)
        } else {
            p
        }
    }

    fn ensure_open(&mut self) {
        if !self.open {
            self.builder
                .begin(point(self.current.0 as f32, self.current.1 as f32));
            self.open = true;
            self.start = self.current;
        }
    }

    fn move_to(&mut self, to: Xy) {
        if self.open {
            self.builder.end(false);
        }
        self.builder.begin(point(to.0 as f32, to.1 as f32));
        self.open = true;
        self.current = to;
        self.start = to;
    }

    fn line_to(&mut self, to: Xy) {
        self.ensure_open();
        self.builder.line_to(point(to.0 as f32, to.1 as f32));
        self.current = to;
    }

    fn cubic_to(&mut self, c1: Xy, c2: Xy, to: Xy) {
        self.ensure_open();
        self.builder.cubic_bezier_to(
            point(c1.0 as f32, c1.1 as f32),
            point(c2.0 as f32, c2.1 as f32),
            point(to.0 as f32, to.1 as f32),
        );
        self.current = to;
    }

    fn quad_to(&mut self, c: Xy, to: Xy) {
        self.ensure_open();
        self.builder.quadratic_bezier_to(
            point(c.0 as f32, c.1 as f32),
            point(to.0 as f32, to.1 as f32),
        );
        self.current = to;
    }

    fn close(&mut self) {
        if self.open {
            self.builder.close();
            self.open = false;
        }
        self.current = self.start;
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(false);
        }
        self.builder.build()
    }
}

fn reflect(p: Xy, around: Xy) -> Xy {
    (2.0 * around.0 - p.0, 2.0 * around.1 - p.1)
}

/// Parse path data into a lyon path
pub fn parse_path_data(data: &str) -> Path {
    let mut scan = Scanner::new(data);
    let mut state = PathState::new();

    while !scan.at_end() {
        let Some(cmd) = scan.command() else {
            tracing::debug!("Path data: expected a command at byte {}", scan.pos);
            break;
        };
        if apply_command(cmd, &mut scan, &mut state).is_none() {
            tracing::debug!(
                "Path data: malformed arguments for '{}' near byte {}",
                cmd as char,
                scan.pos
            );
            break;
        }
    }

    state.finish()
}

/// Consume one command and its (possibly repeated) arguments
fn apply_command(cmd: u8, scan: &mut Scanner<'_>, state: &mut PathState) -> Option<()> {
    let relative = cmd.is_ascii_lowercase();

    match cmd.to_ascii_uppercase() {
        b'M' => {
            let to = state.resolve(relative, scan.pair()?);
            state.move_to(to);
            while scan.number_follows() {
                let to = state.resolve(relative, scan.pair()?);
                state.line_to(to);
            }
            state.last_cubic_ctrl = None;
            state.last_quad_ctrl = None;
        }
        b'L' => {
            loop {
                let to = state.resolve(relative, scan.pair()?);
                state.line_to(to);
                if !scan.number_follows() {
                    break;
                }
            }
            state.last_cubic_ctrl = None;
            state.last_quad_ctrl = None;
        }
        b'H' | b'V' => {
            let horizontal = cmd.eq_ignore_ascii_case(&b'h');
            loop {
                let v = scan.number()?;
                let (x, y) = state.current;
                let to = match (horizontal, relative) {
                    (true, true) => (x + v, y),
                    (true, false) => (v, y),
                    (false, true) => (x, y + v),
                    (false, false) => (x, v),
                };
                state.line_to(to);
                if !scan.number_follows() {
                    break;
                }
            }
            state.last_cubic_ctrl = None;
            state.last_quad_ctrl = None;
        }
        b'C' => loop {
            let c1 = state.resolve(relative, scan.pair()?);
            let c2 = state.resolve(relative, scan.pair()?);
            let to = state.resolve(relative, scan.pair()?);
            state.cubic_to(c1, c2, to);
            state.last_cubic_ctrl = Some(c2);
            state.last_quad_ctrl = None;
            if !scan.number_follows() {
                break;
            }
        },
        b'S' => loop {
            let c2 = state.resolve(relative, scan.pair()?);
            let to = state.resolve(relative, scan.pair()?);
            let c1 = state
                .last_cubic_ctrl
                .map_or(state.current, |prev| reflect(prev, state.current));
            state.cubic_to(c1, c2, to);
            state.last_cubic_ctrl = Some(c2);
            state.last_quad_ctrl = None;
            if !scan.number_follows() {
                break;
            }
        },
        b'Q' => loop {
            let c = state.resolve(relative, scan.pair()?);
            let to = state.resolve(relative, scan.pair()?);
            state.quad_to(c, to);
            state.last_quad_ctrl = Some(c);
            state.last_cubic_ctrl = None;
            if !scan.number_follows() {
                break;
            }
        },
        b'T' => loop {
            let to = state.resolve(relative, scan.pair()?);
            let c = state
                .last_quad_ctrl
                .map_or(state.current, |prev| reflect(prev, state.current));
            state.quad_to(c, to);
            state.last_quad_ctrl = Some(c);
            state.last_cubic_ctrl = None;
            if !scan.number_follows() {
                break;
            }
        },
        b'A' => {
            loop {
                let rx = scan.number()?;
                let ry = scan.number()?;
                let rotation = scan.number()?;
                let large_arc = scan.flag()?;
                let sweep = scan.flag()?;
                let to = state.resolve(relative, scan.pair()?);

                let arc = ArcSegment {
                    from: state.current,
                    to,
                    rx,
                    ry,
                    rotation_deg: rotation,
                    large_arc,
                    sweep,
                };
                match arc.to_cubics() {
                    Some(cubics) => {
                        for (c1, c2, end) in cubics {
                            state.cubic_to(c1, c2, end);
                        }
                    }
                    None => state.line_to(to),
                }
                if !scan.number_follows() {
                    break;
                }
            }
            state.last_cubic_ctrl = None;
            state.last_quad_ctrl = None;
        }
        b'Z' => {
            state.close();
            state.last_cubic_ctrl = None;
            state.last_quad_ctrl = None;
        }
        _ => return None,
    }
    Some(())
}

/// An elliptical arc in endpoint parameterization
struct ArcSegment {
    from: Xy,
    to: Xy,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
}

impl ArcSegment {
    /// Convert to cubic Béziers of at most 90 degrees each. `None` when the arc
    /// degenerates to a straight line.
    fn to_cubics(&self) -> Option<Vec<(Xy, Xy, Xy)>> {
        let (x1, y1) = self.from;
        let (x2, y2) = self.to;
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx < f64::EPSILON || ry < f64::EPSILON || (x1 == x2 && y1 == y2) {
            return None;
        }

        let phi = self.rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Midpoint in the rotated frame
        let dx2 = (x1 - x2) / 2.0;
        let dy2 = (y1 - y2) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Scale radii up when they cannot span the endpoints
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let denom = rx2 * y1p * y1p + ry2 * x1p * x1p;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let numer = (rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p).max(0.0);
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * (numer / denom).sqrt();
        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);

        let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

        let angle = |u: Xy, v: Xy| (u.0 * v.1 - u.1 * v.0).atan2(u.0 * v.0 + u.1 * v.1);
        let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta = angle((1.0, 0.0), u);
        let mut delta = angle(u, v);
        if !self.sweep && delta > 0.0 {
            delta -= std::f64::consts::TAU;
        } else if self.sweep && delta < 0.0 {
            delta += std::f64::consts::TAU;
        }

        let segments = ((delta.abs() / std::f64::consts::FRAC_PI_2).ceil() as usize).max(1);
        let step = delta / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let on_ellipse = |u: f64, v: f64| -> Xy {
            (
                cx + cos_phi * rx * u - sin_phi * ry * v,
                cy + sin_phi * rx * u + cos_phi * ry * v,
            )
        };

        let mut cubics = Vec::with_capacity(segments);
        let mut t0 = theta;
        for i in 0..segments {
            let t1 = t0 + step;
            let (s0, c0) = t0.sin_cos();
            let (s1, c1) = t1.sin_cos();
            let cp1 = on_ellipse(c0 - k * s0, s0 + k * c0);
            let cp2 = on_ellipse(c1 + k * s1, s1 - k * c1);
            // Land exactly on the requested endpoint.
            let end = if i + 1 == segments {
                self.to
            } else {
                on_ellipse(c1, s1)
            };
            cubics.push((cp1, cp2, end));
            t0 = t1;
        }
        Some(cubics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::path::Event;

    fn endpoints(path: &Path) -> Vec<(f32, f32)> {
        path.iter()
            .filter_map(|e| match e {
                Event::Begin { at } => Some((at.x, at.y)),
                Event::Line { to, .. } => Some((to.x, to.y)),
                Event::Quadratic { to, .. } => Some((to.x, to.y)),
                Event::Cubic { to, .. } => Some((to.x, to.y)),
                Event::End { .. } => None,
            })
            .collect()
    }

    fn closes(path: &Path) -> Vec<bool> {
        path.iter()
            .filter_map(|e| match e {
                Event::End { close, .. } => Some(close),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_relative_and_implicit_lineto() {
        let path = parse_path_data("m10 10 20 0 0 20 h-20z");
        assert_eq!(
            endpoints(&path),
            vec![(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)]
        );
        assert_eq!(closes(&path), vec![true]);
    }

    #[test]
    fn test_compact_numbers() {
        let path = parse_path_data("M0,0L10-5L.5.5L1e1,2E0");
        assert_eq!(
            endpoints(&path),
            vec![(0.0, 0.0), (10.0, -5.0), (0.5, 0.5), (10.0, 2.0)]
        );
    }

    #[test]
    fn test_multiple_subpaths() {
        let path = parse_path_data("M0 0H4V4H0Z M1 1H3V3H1Z");
        assert_eq!(closes(&path), vec![true, true]);
        assert_eq!(endpoints(&path).len(), 8);
    }

    #[test]
    fn test_relative_after_close_starts_at_subpath_origin() {
        let path = parse_path_data("M5 5 h2 v2 z m1 1 h1");
        let pts = endpoints(&path);
        assert_eq!(pts[3], (6.0, 6.0));
        assert_eq!(pts[4], (7.0, 6.0));
    }

    #[test]
    fn test_arc_with_packed_flags_reaches_endpoint() {
        let path = parse_path_data("M0 0 a5 5 0 1010 0");
        let pts = endpoints(&path);
        let last = pts.last().copied().unwrap();
        assert!((last.0 - 10.0).abs() < 1e-4);
        assert!(last.1.abs() < 1e-4);
        assert!(pts.len() >= 3);
    }

    #[test]
    fn test_smooth_curves() {
        let path = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0 Q25 5 30 0 T40 0");
        assert_eq!(endpoints(&path).last().copied(), Some((40.0, 0.0)));
    }

    #[test]
    fn test_malformed_tail_keeps_prefix() {
        let path = parse_path_data("M0 0 L10 0 L10 10 Lfoo");
        assert_eq!(endpoints(&path).len(), 3);
    }

    #[test]
    fn test_degenerate_arc_is_line() {
        let arc = ArcSegment {
            from: (0.0, 0.0),
            to: (5.0, 0.0),
            rx: 0.0,
            ry: 3.0,
            rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(arc.to_cubics().is_none());
    }
}
