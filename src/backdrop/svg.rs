//! SVG rendering target for capturing a single frame of the field.

use super::surface::{Rgba, Surface, Vec2};
use maud::{Markup, PreEscaped};
use std::fmt::Write as _;

/// Accumulates drawing primitives as SVG elements.
///
/// Output is deterministic: the same primitive sequence always produces the
/// same bytes, so seeded builds are reproducible.
pub struct SvgSurface {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    /// Blur radii already declared as filters, in declaration order
    blurs: Vec<String>,
    glows: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
            blurs: Vec::new(),
            glows: 0,
        }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="backdrop" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid slice" aria-hidden="true" focusable="false">"#,
            num(self.width),
            num(self.height)
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    pub fn into_markup(self) -> Markup {
        PreEscaped(self.to_svg())
    }

    fn blur_filter(&mut self, blur: f64) -> String {
        let key = num(blur);
        let index = match self.blurs.iter().position(|b| *b == key) {
            Some(i) => i,
            None => {
                let i = self.blurs.len();
                let _ = write!(
                    self.defs,
                    r#"<filter id="blur-{i}" x="-200%" y="-200%" width="500%" height="500%"><feGaussianBlur stdDeviation="{}"/><feMerge><feMergeNode/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
                    num(blur / 2.0)
                );
                self.blurs.push(key);
                i
            }
        };
        format!("blur-{index}")
    }
}

/// Most grid lines drawn along one axis.
const MAX_GRID_LINES: usize = 2048;

/// Interior offsets `spacing, 2*spacing, ...` strictly below `extent`.
fn grid_offsets(spacing: f64, extent: f64) -> impl Iterator<Item = f64> {
    (1..=MAX_GRID_LINES)
        .map(move |i| i as f64 * spacing)
        .take_while(move |&offset| offset < extent)
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.blurs.clear();
        self.glows = 0;
    }

    fn grid(&mut self, spacing: f64, color: Rgba) {
        if !(spacing >= 1.0 && spacing.is_finite()) {
            return;
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return;
        }
        let mut d = String::new();
        for x in grid_offsets(spacing, self.width) {
            let _ = write!(d, "M{} 0V{}", num(x), num(self.height));
        }
        for y in grid_offsets(spacing, self.height) {
            let _ = write!(d, "M0 {}H{}", num(y), num(self.width));
        }
        if d.is_empty() {
            return;
        }
        let _ = write!(
            self.body,
            r#"<path d="{d}" stroke="{}" stroke-opacity="{}" stroke-width="1" fill="none"/>"#,
            color.hex(),
            alpha(color.a)
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}" stroke-width="{}"/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            color.hex(),
            alpha(color.a),
            num(width)
        );
    }

    fn radial_glow(&mut self, center: Vec2, radius: f64, color: Rgba) {
        let id = format!("glow-{}", self.glows);
        self.glows += 1;
        let _ = write!(
            self.defs,
            r#"<radialGradient id="{id}"><stop offset="0" stop-color="{hex}" stop-opacity="{}"/><stop offset="1" stop-color="{hex}" stop-opacity="0"/></radialGradient>"#,
            alpha(color.a),
            hex = color.hex()
        );
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="url(#{id})"/>"#,
            num(center.x),
            num(center.y),
            num(radius)
        );
    }

    fn circle(&mut self, center: Vec2, radius: f64, color: Rgba, blur: f64) {
        let filter = if blur > 0.0 {
            format!(r#" filter="url(#{})""#, self.blur_filter(blur))
        } else {
            String::new()
        };
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="{}"{filter}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            color.hex(),
            alpha(color.a)
        );
    }
}

/// One decimal is plenty for a viewBox-scaled backdrop.
fn num(v: f64) -> String {
    let s = format!("{v:.1}");
    match s.strip_suffix(".0") {
        Some(whole) if whole != "-0" => whole.to_string(),
        Some(_) => "0".to_string(),
        None => s,
    }
}

fn alpha(a: f64) -> String {
    format!("{:.3}", a.clamp(0.0, 1.0))
}
