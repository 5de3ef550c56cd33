//! Arc label layout: fitting a wedge's label along its outer rim.
//!
//! Widths are converted from pixels to radians with the small-angle
//! approximation `width / radius`. A label that does not fit in the wedge
//! (minus [`LABEL_MARGIN`](crate::defaults::LABEL_MARGIN)) is wrapped greedily,
//! one character at a time, and every line is centered on the wedge's bisector.

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

use crate::defaults;

/// Angular extent of one wedge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub arc: f64,
}

impl Wedge {
    pub fn new(start: f64, arc: f64) -> Self {
        Self { start, arc }
    }

    /// Wedge `index` of a wheel with equal wedges of width `arc`, clockwise from angle 0.
    pub fn nth(index: usize, arc: f64) -> Self {
        Self::new(arc * index as f64, arc)
    }

    pub fn end(&self) -> f64 {
        self.start + self.arc
    }

    pub fn bisector(&self) -> f64 {
        self.start + self.arc / 2.0
    }

    /// Widest a label line may be, in radians.
    pub fn label_room(&self) -> f64 {
        self.arc - defaults::LABEL_MARGIN
    }
}

/// One character positioned on the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Polar angle of the glyph center.
    pub angle: f64,
    /// Anchor point on the surface, already shifted for its line.
    pub position: DVec2,
    /// Rotation that keeps the glyph tangent to the rim, `angle + π/2`.
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub text: String,
    /// Sum of the character widths in radians, gaps excluded.
    pub width: f64,
    pub glyphs: Vec<PlacedGlyph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub lines: Vec<LabelLine>,
    /// Baseline distance from the hub as a fraction of the radius.
    pub radius_factor: f64,
}

impl LabelLayout {
    pub fn glyphs(&self) -> impl Iterator<Item = &PlacedGlyph> {
        self.lines.iter().flat_map(|line| line.glyphs.iter())
    }
}

/// Angular width of `text` measured character by character.
pub fn angular_width(text: &str, radius: f64, measure: &impl Fn(&str) -> f64) -> f64 {
    let mut buf = [0u8; 4];
    text.chars()
        .map(|ch| measure(ch.encode_utf8(&mut buf)) / radius)
        .sum()
}

/// Split `label` into lines no wider than `max_width` radians.
///
/// Greedy, character-granular: characters are appended while the whole line
/// still fits; the first one that does not starts the next line. A character
/// wider than `max_width` on its own still gets a line of its own.
pub fn wrap_label(
    label: &str,
    max_width: f64,
    radius: f64,
    measure: &impl Fn(&str) -> f64,
) -> Vec<String> {
    if angular_width(label, radius, measure) <= max_width {
        return vec![label.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for ch in label.chars() {
        line.push(ch);
        if measure(&line) / radius > max_width {
            line.pop();
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lay out `label` inside `wedge` on a wheel centered at `center`.
///
/// Single-line labels sit at 0.85 of the radius. Wrapped labels put their last
/// line at 0.70 and stack earlier lines outward by `font_size * 1.25` each.
pub fn layout_label(
    label: &str,
    wedge: Wedge,
    center: DVec2,
    radius: f64,
    font_size: f64,
    measure: &impl Fn(&str) -> f64,
) -> LabelLayout {
    let texts = wrap_label(label, wedge.label_room(), radius, measure);
    let radius_factor = if texts.len() > 1 {
        defaults::MULTI_LINE_RADIUS
    } else {
        defaults::SINGLE_LINE_RADIUS
    };
    let ring = radius * radius_factor;
    let line_count = texts.len();

    let lines = texts
        .into_iter()
        .enumerate()
        .map(|(n, text)| {
            let width = angular_width(&text, radius, measure);
            // Offset along the glyph's local y axis, which points at the hub
            // once rotated; negative values push the line outward.
            let lift = -((line_count - 1 - n) as f64) * font_size * defaults::LINE_SPACING;

            let mut glyphs = Vec::with_capacity(text.len());
            let mut offset = wedge.bisector() - width / 2.0;
            let mut buf = [0u8; 4];
            for ch in text.chars() {
                let char_width = measure(ch.encode_utf8(&mut buf)) / radius;
                offset += char_width / 2.0;

                let rotation = offset + FRAC_PI_2;
                let anchor = center + DVec2::from_angle(offset) * ring;
                let position = anchor + DVec2::from_angle(rotation).rotate(DVec2::new(0.0, lift));
                glyphs.push(PlacedGlyph {
                    ch,
                    angle: offset,
                    position,
                    rotation,
                });

                offset += char_width / 2.0 + defaults::GLYPH_GAP;
            }

            LabelLine {
                text,
                width,
                glyphs,
            }
        })
        .collect();

    LabelLayout {
        lines,
        radius_factor,
    }
}
