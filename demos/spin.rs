//! Spin a wheel in real time at 60 frames per second and print the final SVG.
//!
//! ```text
//! RUST_LOG=debug cargo run --example spin --features tracing -- tests/wheels/prizes.wheel > wheel.svg
//! ```

use wheelspin::{AnimationDriver, PacedScheduler, SvgSurface, Tick, WheelRenderer, parse_wheel};

const DEFAULT_WHEEL: &str = r#"segment "一等奖" #0bf
segment "二等奖" #fb0
segment "三等奖" #0fb
segment "四等奖" #b0f
segment "五等奖" #f0b
segment "六等奖" #f82"#;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (name, input) = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("cannot read {path}: {e}"))?;
            (path, source)
        }
        None => ("<builtin>".to_string(), DEFAULT_WHEEL.to_string()),
    };

    let wheel = parse_wheel(&name, &input)?;
    let config = wheel.config();
    let renderer = WheelRenderer::setup(SvgSurface::square(config.pixel_radius()), config);
    let mut driver = AnimationDriver::new(wheel.engine(), renderer, PacedScheduler::default());

    driver.start();
    driver.request_spin();
    tracing::info!(
        target_index = driver.engine().target_index(),
        velocity = driver.engine().state().angular_velocity,
        "spinning"
    );

    let mut shown = None;
    loop {
        if let Some(wait) = driver.scheduler().until_due() {
            std::thread::sleep(wait);
        }
        let Some(tick) = driver.pump() else {
            continue;
        };

        let index = driver.sink().shown_index();
        if index != shown {
            shown = index;
            tracing::debug!(label = %driver.engine().current_segment().label, "pointer");
        }
        if tick == Tick::Settled {
            break;
        }
    }
    driver.stop();

    let outcome = driver
        .engine()
        .outcome()
        .ok_or_else(|| miette::miette!("wheel did not settle"))?;
    tracing::info!(
        index = outcome.index,
        label = %outcome.label(),
        frames = outcome.frames,
        "settled"
    );

    if let Some(surface) = driver.sink().surface() {
        println!("{}", surface.finish());
    }
    Ok(())
}
