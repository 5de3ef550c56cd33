//! A surface that records every call instead of drawing.
//!
//! Meant for tests and headless hosts. By default every frame appends a
//! rotation and a readout, so a long-lived recorder should use
//! [`RecordingSurface::latest_frame_only`].

use glam::DVec2;

use super::{DashStyle, Font, RenderSurface};
use crate::types::Color;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Sector {
        center: DVec2,
        radius: f64,
        start: f64,
        end: f64,
        fill: Color,
    },
    DashedLine {
        from: DVec2,
        to: DVec2,
        style: DashStyle,
    },
    Text {
        text: String,
        at: DVec2,
        rotation: f64,
        font: Font,
        fill: Color,
    },
    Rotation(f64),
    Readout {
        label: String,
        color: Color,
    },
}

/// Records draw calls. Measures every character as `advance` ems.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    advance: f64,
    latest_only: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// One em per character, like full-width CJK text.
    pub fn new() -> Self {
        Self::with_advance(1.0)
    }

    pub fn with_advance(advance: f64) -> Self {
        Self {
            ops: Vec::new(),
            advance,
            latest_only: false,
        }
    }

    /// Keep one rotation and one readout, overwritten each frame, so the
    /// recording stays the size of the static wheel.
    pub fn latest_frame_only(mut self) -> Self {
        self.latest_only = true;
        self
    }

    fn record_frame_op(&mut self, op: DrawOp) {
        if self.latest_only {
            let same_kind = |old: &DrawOp| std::mem::discriminant(old) == std::mem::discriminant(&op);
            if let Some(slot) = self.ops.iter_mut().rev().find(|old| same_kind(old)) {
                *slot = op;
                return;
            }
        }
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Text of every `fill_text` call, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rotations(&self) -> impl Iterator<Item = f64> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Rotation(angle) => Some(*angle),
            _ => None,
        })
    }

    pub fn last_rotation(&self) -> Option<f64> {
        self.rotations().last()
    }

    pub fn last_readout(&self) -> Option<(&str, Color)> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Readout { label, color } => Some((label.as_str(), *color)),
            _ => None,
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn fill_sector(&mut self, center: DVec2, radius: f64, start: f64, end: f64, fill: Color) {
        self.ops.push(DrawOp::Sector {
            center,
            radius,
            start,
            end,
            fill,
        });
    }

    fn dashed_line(&mut self, from: DVec2, to: DVec2, style: &DashStyle) {
        self.ops.push(DrawOp::DashedLine {
            from,
            to,
            style: *style,
        });
    }

    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * self.advance * font.size
    }

    fn fill_text(&mut self, text: &str, at: DVec2, rotation: f64, font: &Font, fill: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            rotation,
            font: *font,
            fill,
        });
    }

    fn set_rotation(&mut self, angle: f64) {
        self.record_frame_op(DrawOp::Rotation(angle));
    }

    fn show_readout(&mut self, label: &str, color: Color) {
        self.record_frame_op(DrawOp::Readout {
            label: label.to_string(),
            color,
        });
    }
}
