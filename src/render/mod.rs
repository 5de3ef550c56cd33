//! Drawing the wheel.
//!
//! This module is organized into submodules:
//! - `svg`: a surface that produces a standalone SVG document
//! - `record`: a surface that records draw calls, for tests and headless hosts
//!
//! The wheel is drawn once at setup with [`draw_wheel`]. After that only the
//! whole-surface rotation and the readout change, which is what
//! [`WheelRenderer`] does for every frame the engine advances.

pub mod record;
pub mod svg;

pub use record::{DrawOp, RecordingSurface};
pub use svg::SvgSurface;

use std::f64::consts::FRAC_PI_2;

use glam::{DVec2, dvec2};

use crate::config::WheelConfig;
use crate::defaults;
use crate::engine::{Frame, FrameSink, Outcome};
use crate::errors::SurfaceError;
use crate::layout::{LabelLayout, Wedge, layout_label};
use crate::log;
use crate::types::Color;

/// Font used for wedge labels and the readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Size in surface pixels.
    pub size: f64,
    pub bold: bool,
}

impl Font {
    pub fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    pub fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }
}

/// Stroke for dashed wedge boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashStyle {
    pub color: Color,
    pub width: f64,
    pub dash: f64,
    pub gap: f64,
}

impl DashStyle {
    /// White, one device pixel wide, 5/3 dashes scaled by the pixel ratio.
    pub fn boundary(pixel_ratio: f64) -> Self {
        Self {
            color: Color::WHITE,
            width: pixel_ratio,
            dash: defaults::DASH_LENGTH * pixel_ratio,
            gap: defaults::DASH_GAP * pixel_ratio,
        }
    }
}

/// What the wheel needs from a drawing backend.
///
/// Angles are radians, clockwise from three o'clock, in a y-down coordinate
/// space.
pub trait RenderSurface {
    /// Fill the circular sector from `start` to `end` around `center`.
    fn fill_sector(&mut self, center: DVec2, radius: f64, start: f64, end: f64, fill: Color);

    fn dashed_line(&mut self, from: DVec2, to: DVec2, style: &DashStyle);

    /// Rendered width of `text` in surface pixels.
    fn measure_text(&self, text: &str, font: &Font) -> f64;

    /// Draw `text` centered on `at`, rotated by `rotation` about that point.
    fn fill_text(&mut self, text: &str, at: DVec2, rotation: f64, font: &Font, fill: Color);

    /// Rotate the whole drawn wheel about its center.
    fn set_rotation(&mut self, angle: f64);

    /// Update the host's "current segment" display.
    fn show_readout(&mut self, _label: &str, _color: Color) {}
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn fill_sector(&mut self, center: DVec2, radius: f64, start: f64, end: f64, fill: Color) {
        (**self).fill_sector(center, radius, start, end, fill)
    }

    fn dashed_line(&mut self, from: DVec2, to: DVec2, style: &DashStyle) {
        (**self).dashed_line(from, to, style)
    }

    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        (**self).measure_text(text, font)
    }

    fn fill_text(&mut self, text: &str, at: DVec2, rotation: f64, font: &Font, fill: Color) {
        (**self).fill_text(text, at, rotation, font, fill)
    }

    fn set_rotation(&mut self, angle: f64) {
        (**self).set_rotation(angle)
    }

    fn show_readout(&mut self, label: &str, color: Color) {
        (**self).show_readout(label, color)
    }
}

/// Center of the wheel on its surface; the wheel touches the top and left edges.
pub fn wheel_center(config: &WheelConfig) -> DVec2 {
    let rad = config.pixel_radius();
    dvec2(rad, rad)
}

/// Draw wedge `index`: filled sector, dashed edges, then its label.
///
/// Returns the label layout that was drawn. Out-of-range indices draw nothing.
pub fn draw_wedge<S: RenderSurface + ?Sized>(
    surface: &mut S,
    config: &WheelConfig,
    index: usize,
) -> Option<LabelLayout> {
    let segment = config.segment(index)?;
    let rad = config.pixel_radius();
    let center = wheel_center(config);
    let wedge = Wedge::nth(index, config.arc_width());

    surface.fill_sector(center, rad, wedge.start, wedge.end(), segment.color);

    let dash = DashStyle::boundary(config.pixel_ratio());
    for angle in [wedge.start, wedge.end()] {
        surface.dashed_line(center, center + DVec2::from_angle(angle) * rad, &dash);
    }

    let font = Font::bold(config.font_size());
    let layout = {
        let measure = |text: &str| surface.measure_text(text, &font);
        layout_label(&segment.label, wedge, center, rad, font.size, &measure)
    };

    let mut buf = [0u8; 4];
    for glyph in layout.glyphs() {
        let text = glyph.ch.encode_utf8(&mut buf);
        surface.fill_text(text, glyph.position, glyph.rotation, &font, Color::WHITE);
    }

    log::debug!(
        index,
        label = %segment.label,
        lines = layout.lines.len(),
        "wedge drawn"
    );
    Some(layout)
}

/// Draw every wedge once. Called at setup, before the first frame.
pub fn draw_wheel<S: RenderSurface + ?Sized>(surface: &mut S, config: &WheelConfig) {
    for index in 0..config.segment_count() {
        draw_wedge(surface, config, index);
    }
}

/// Rotation applied to the drawn wheel for wheel angle `angle`.
///
/// The pointer sits at the top, a quarter turn back from angle 0.
pub fn surface_rotation(angle: f64) -> f64 {
    angle - FRAC_PI_2
}

/// A [`FrameSink`] that rotates a drawn wheel and keeps its readout current.
///
/// The surface can be detached (for example while the host tears down its
/// canvas); frames arriving in the meantime report
/// [`SurfaceError::Unavailable`].
#[derive(Debug)]
pub struct WheelRenderer<S> {
    surface: Option<S>,
    shown: Option<usize>,
    last_outcome: Option<Outcome>,
}

impl<S: RenderSurface> WheelRenderer<S> {
    /// Draw the static wheel on `surface` and wrap it.
    pub fn setup(mut surface: S, config: &WheelConfig) -> Self {
        draw_wheel(&mut surface, config);
        Self::new(surface)
    }

    /// Wrap a surface that already has the wheel drawn on it.
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
            shown: None,
            last_outcome: None,
        }
    }

    pub fn detached() -> Self {
        Self {
            surface: None,
            shown: None,
            last_outcome: None,
        }
    }

    pub fn attach(&mut self, surface: S) -> Option<S> {
        self.surface.replace(surface)
    }

    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn into_surface(self) -> Option<S> {
        self.surface
    }

    /// Segment index shown by the last drawn frame.
    pub fn shown_index(&self) -> Option<usize> {
        self.shown
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }
}

impl<S: RenderSurface> FrameSink for WheelRenderer<S> {
    fn frame(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError> {
        let surface = self.surface.as_mut().ok_or(SurfaceError::Unavailable)?;
        surface.set_rotation(surface_rotation(frame.angle));
        surface.show_readout(&frame.segment.label, frame.segment.color);
        self.shown = Some(frame.index);
        Ok(())
    }

    fn settled(&mut self, outcome: &Outcome) {
        self.last_outcome = Some(outcome.clone());
    }
}
