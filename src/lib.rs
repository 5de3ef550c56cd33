//! A prize-wheel spin engine.
//!
//! The outcome of a spin is chosen uniformly before the wheel moves; friction
//! only shapes how the wheel gets there. Wedge labels are laid out along the
//! rim and wrapped when they do not fit.
//!
//! ```
//! let source = "seed = 3\nsegment \"Tea\" #0bf\nsegment \"Coffee\" #fb0";
//! let (outcome, svg) = wheelspin::spin_to_svg(source).unwrap();
//! assert!(outcome.index < 2);
//! assert!(svg.starts_with("<svg"));
//! ```

use pest_derive::Parser;

pub mod config;
pub mod defaults;
pub mod describe;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod layout;
pub mod log;
pub mod outcome;
pub mod render;
pub mod types;

pub use config::{Segment, SpinTuning, WheelConfig, WheelConfigBuilder};
pub use describe::{WheelDescription, parse_wheel};
pub use driver::{AnimationDriver, FrameHandle, FrameScheduler, ManualScheduler, PacedScheduler};
pub use engine::{Frame, FrameSink, Outcome, Phase, SpinEngine, SpinState, Tick};
pub use errors::{ConfigError, DescriptionError, SurfaceError};
pub use render::{RecordingSurface, RenderSurface, SvgSurface, WheelRenderer};
pub use types::Color;

#[derive(Parser)]
#[grammar = "wheel.pest"]
pub struct WheelParser;

/// Frames a convenience spin may take before giving up.
const MAX_SPIN_FRAMES: u64 = 1_000_000;

/// Render the wheel described by `source` at rest, as SVG.
pub fn render_wheel_svg(source: &str) -> Result<String, miette::Report> {
    let wheel = parse_wheel("<input>", source)?;
    let engine = wheel.engine();
    let mut renderer = WheelRenderer::setup(SvgSurface::square(wheel.config.pixel_radius()), &wheel.config);
    renderer.frame(&engine.snapshot())?;

    let svg = renderer
        .into_surface()
        .map(|surface| surface.finish())
        .ok_or(SurfaceError::Unavailable)?;
    Ok(svg)
}

/// Spin the wheel described by `source` once and render where it stopped.
pub fn spin_to_svg(source: &str) -> Result<(Outcome, String), miette::Report> {
    let wheel = parse_wheel("<input>", source)?;
    let mut engine = wheel.engine();
    let mut renderer = WheelRenderer::setup(SvgSurface::square(wheel.config.pixel_radius()), &wheel.config);

    engine.start_spin();
    engine.run_to_rest(&mut renderer, MAX_SPIN_FRAMES);
    let outcome = engine
        .outcome()
        .cloned()
        .ok_or_else(|| miette::miette!("wheel still spinning after {MAX_SPIN_FRAMES} frames"))?;

    let svg = renderer
        .into_surface()
        .map(|surface| surface.finish())
        .ok_or(SurfaceError::Unavailable)?;
    Ok((outcome, svg))
}
