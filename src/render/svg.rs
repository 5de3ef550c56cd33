//! SVG generation

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use glam::{DVec2, dvec2};

use super::{DashStyle, Font, RenderSurface};
use crate::types::Color;

pub const FONT_FAMILY: &str = "sans-serif";

/// Proportional advance widths for printable ASCII, in hundredths of a unit
/// where 100 is a typical capital letter.
#[rustfmt::skip]
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Em fraction of one `AW_CHAR` unit (0.08in advance for a 0.14in font per 100 units).
const EM_PER_UNIT: f64 = 0.08 / 0.14 / 100.0;
const BOLD_FACTOR: f64 = 1.1;

/// East Asian wide and fullwidth ranges; these advance a full em.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x2_0000..=0x3_FFFD)
}

/// Estimated advance of `text` in pixels.
pub fn text_width(text: &str, font: &Font) -> f64 {
    let ems: f64 = text
        .chars()
        .map(|c| {
            if is_wide(c) {
                1.0
            } else if (' '..='~').contains(&c) {
                AW_CHAR[(c as usize) - 0x20] as f64 * EM_PER_UNIT
            } else {
                100.0 * EM_PER_UNIT
            }
        })
        .sum();
    let weight = if font.bold { BOLD_FACTOR } else { 1.0 };
    ems * font.size * weight
}

/// Escape text content and attribute values for XML.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A surface that accumulates an SVG document.
///
/// Wheel elements go into a group rotated about the wheel center; the readout
/// is drawn unrotated over the hub.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: DVec2,
    wheel: String,
    rotation: f64,
    readout: Option<(String, Color)>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: dvec2(width, height),
            wheel: String::new(),
            rotation: 0.0,
            readout: None,
        }
    }

    /// A square surface just big enough for a wheel of `pixel_radius`.
    pub fn square(pixel_radius: f64) -> Self {
        Self::new(pixel_radius * 2.0, pixel_radius * 2.0)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    fn center(&self) -> DVec2 {
        self.size / 2.0
    }

    /// Serialize the document.
    pub fn finish(&self) -> String {
        let (w, h) = (fmt_num(self.size.x), fmt_num(self.size.y));
        let center = self.center();
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#
        );
        let _ = writeln!(
            out,
            r#"<g class="wheel" transform="rotate({} {} {})">"#,
            fmt_num(self.rotation.to_degrees()),
            fmt_num(center.x),
            fmt_num(center.y)
        );
        out.push_str(&self.wheel);
        out.push_str("</g>\n");

        if let Some((label, color)) = &self.readout {
            let font = Font::bold(self.size.x.min(self.size.y) / 25.0);
            let hub = (text_width(label, &font) / 2.0 + font.size).max(font.size * 2.0);
            let _ = writeln!(
                out,
                r#"<g class="readout"><circle cx="{}" cy="{}" r="{}" fill="{}" stroke="rgb(255,255,255)"/>{}</g>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(hub),
                color.to_css(),
                text_element(label, center, 0.0, &font, Color::WHITE)
            );
        }

        out.push_str("</svg>\n");
        out
    }
}

fn text_element(text: &str, at: DVec2, rotation: f64, font: &Font, fill: Color) -> String {
    let weight = if font.bold { r#" font-weight="bold""# } else { "" };
    let transform = if rotation == 0.0 {
        format!("translate({} {})", fmt_num(at.x), fmt_num(at.y))
    } else {
        format!(
            "translate({} {}) rotate({})",
            fmt_num(at.x),
            fmt_num(at.y),
            fmt_num(rotation.to_degrees())
        )
    };
    format!(
        r#"<text transform="{transform}" fill="{}" font-family="{FONT_FAMILY}" font-size="{}"{weight} text-anchor="middle" dominant-baseline="central">{}</text>"#,
        fill.to_css(),
        fmt_num(font.size),
        escape_xml(text)
    )
}

impl RenderSurface for SvgSurface {
    fn fill_sector(&mut self, center: DVec2, radius: f64, start: f64, end: f64, fill: Color) {
        let sweep = end - start;
        if sweep.abs() >= TAU - 1e-9 {
            // An arc whose endpoints coincide draws nothing; use a full disc.
            let _ = writeln!(
                self.wheel,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(radius),
                fill.to_css()
            );
            return;
        }

        let from = center + DVec2::from_angle(start) * radius;
        let to = center + DVec2::from_angle(end) * radius;
        let large_arc = u8::from(sweep.abs() > PI);
        let clockwise = u8::from(sweep >= 0.0);
        let _ = writeln!(
            self.wheel,
            r#"<path d="M{},{}L{},{}A{} {} 0 {} {} {},{}Z" fill="{}"/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(radius),
            fmt_num(radius),
            large_arc,
            clockwise,
            fmt_num(to.x),
            fmt_num(to.y),
            fill.to_css()
        );
    }

    fn dashed_line(&mut self, from: DVec2, to: DVec2, style: &DashStyle) {
        let _ = writeln!(
            self.wheel,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-dasharray="{},{}"/>"#,
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y),
            style.color.to_css(),
            fmt_num(style.width),
            fmt_num(style.dash),
            fmt_num(style.gap)
        );
    }

    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text_width(text, font)
    }

    fn fill_text(&mut self, text: &str, at: DVec2, rotation: f64, font: &Font, fill: Color) {
        self.wheel.push_str(&text_element(text, at, rotation, font, fill));
        self.wheel.push('\n');
    }

    fn set_rotation(&mut self, angle: f64) {
        self.rotation = angle;
    }

    fn show_readout(&mut self, label: &str, color: Color) {
        self.readout = Some((label.to_string(), color));
    }
}

/// Format a number with 6 significant figures, trailing zeros trimmed (like C's `%g`).
pub(crate) fn fmt_num(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(5 - magnitude);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }

    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    s.to_string()
}
