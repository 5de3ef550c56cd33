//! Default tuning and layout constants.
//!
//! Angles are radians, lengths are CSS pixels before the pixel ratio is applied.

/// Per-frame velocity multiplier. 0.995 = soft, 0.99 = mid, 0.98 = hard.
pub const FRICTION: f64 = 0.995;
pub const MIN_INITIAL_VELOCITY: f64 = 0.25;
pub const MAX_INITIAL_VELOCITY: f64 = 0.45;
pub const STOP_VELOCITY: f64 = 0.03;
pub const STOP_ANGLE: f64 = 0.03;

pub const RADIUS: f64 = 150.0;
pub const PIXEL_RATIO: f64 = 1.0;

/// Angular room left unused inside each wedge when fitting a label.
pub const LABEL_MARGIN: f64 = 0.3;
/// Angular gap added after each glyph.
pub const GLYPH_GAP: f64 = 0.02;
pub const FONT_SIZE: f64 = 12.0;
/// Line advance as a multiple of the font size.
pub const LINE_SPACING: f64 = 1.25;
/// Baseline distance from the hub for single-line labels, as a fraction of the radius.
pub const SINGLE_LINE_RADIUS: f64 = 0.85;
/// Same, for labels wrapped onto several lines.
pub const MULTI_LINE_RADIUS: f64 = 0.70;

pub const DASH_LENGTH: f64 = 5.0;
pub const DASH_GAP: f64 = 3.0;

/// Frame rate used by `PacedScheduler::default()`.
pub const FRAMES_PER_SECOND: u32 = 60;
