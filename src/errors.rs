//! Error types with rich diagnostics using miette
//!
//! Description errors carry source spans so a bad wheel file points at the
//! exact setting that is wrong.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// A wheel configuration that cannot be built.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("a wheel needs at least one segment")]
    #[diagnostic(code(wheelspin::config::empty_segments))]
    EmptySegments,

    #[error("invalid radius {value}: {reason}")]
    #[diagnostic(
        code(wheelspin::config::invalid_radius),
        help("the radius is in CSS pixels and must be greater than zero")
    )]
    InvalidRadius { value: f64, reason: NumericError },

    #[error("invalid pixel ratio {value}: {reason}")]
    #[diagnostic(code(wheelspin::config::invalid_pixel_ratio))]
    InvalidPixelRatio { value: f64, reason: NumericError },

    #[error("invalid friction coefficient {value}")]
    #[diagnostic(
        code(wheelspin::config::invalid_friction),
        help("friction multiplies the velocity every frame and must lie strictly between 0 and 1")
    )]
    InvalidFriction { value: f64 },

    #[error("invalid initial velocity range {min}..={max}")]
    #[diagnostic(
        code(wheelspin::config::invalid_velocity_range),
        help("both bounds must be positive and finite, with min <= max")
    )]
    InvalidVelocityRange { min: f64, max: f64 },

    #[error("invalid stop velocity {value}: {reason}")]
    #[diagnostic(code(wheelspin::config::invalid_stop_velocity))]
    InvalidStopVelocity { value: f64, reason: NumericError },

    #[error("invalid stop angle {value}: {reason}")]
    #[diagnostic(code(wheelspin::config::invalid_stop_angle))]
    InvalidStopAngle { value: f64, reason: NumericError },

    #[error("stop angle {value} is wider than half a wedge ({half_wedge})")]
    #[diagnostic(
        code(wheelspin::config::stop_angle_too_wide),
        help("the wheel could settle on a neighbouring segment; use fewer segments or a tighter stop angle")
    )]
    StopAngleTooWide { value: f64, half_wedge: f64 },
}

// ============================================================================
// Description Errors
// ============================================================================

/// Errors found while reading a textual wheel description.
#[derive(Error, Diagnostic, Debug)]
pub enum DescriptionError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(wheelspin::describe::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown setting: {name}")]
    #[diagnostic(
        code(wheelspin::describe::unknown_setting),
        help("known settings: radius, pixel_ratio, friction, min_velocity, max_velocity, stop_velocity, stop_angle, seed")
    )]
    UnknownSetting {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a setting")]
        span: SourceSpan,
    },

    #[error("setting `{name}` given twice")]
    #[diagnostic(code(wheelspin::describe::duplicate_setting))]
    DuplicateSetting {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("second assignment")]
        span: SourceSpan,
        #[label("first assigned here")]
        first: SourceSpan,
    },

    #[error("invalid number: {message}")]
    #[diagnostic(code(wheelspin::describe::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("invalid color: {text}")]
    #[diagnostic(
        code(wheelspin::describe::invalid_color),
        help("use #rgb, #rrggbb, rgb(r,g,b) or a CSS color name")
    )]
    InvalidColor {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a color")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// Surface Errors
// ============================================================================

/// Errors a frame sink reports back to the spin loop.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("no drawing surface is attached")]
    #[diagnostic(
        code(wheelspin::surface::unavailable),
        help("the frame is skipped; attach a surface to resume drawing")
    )]
    Unavailable,
}
