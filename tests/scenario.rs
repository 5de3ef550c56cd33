//! End-to-end runs of the six-prize wheel.

use regex_lite::Regex;
use std::f64::consts::TAU;
use wheelspin::outcome::segment_at_angle;
use wheelspin::render::DrawOp;
use wheelspin::{
    AnimationDriver, Color, ManualScheduler, RecordingSurface, SpinEngine, Tick, WheelConfig,
    WheelRenderer,
};

const PRIZES: [(&str, &str); 6] = [
    ("#0bf", "一等奖"),
    ("#fb0", "二等奖"),
    ("#0fb", "三等奖"),
    ("#b0f", "四等奖"),
    ("#f0b", "五等奖"),
    ("#f82", "六等奖"),
];

fn prizes() -> WheelConfig {
    PRIZES
        .iter()
        .fold(WheelConfig::builder(), |builder, (color, label)| {
            builder.segment(color.parse::<Color>().unwrap(), *label)
        })
        .build()
        .unwrap()
}

#[test]
fn outcome_matches_segment_under_pointer() {
    for seed in 0..50 {
        let mut engine = SpinEngine::with_seed(prizes(), seed);
        assert!(engine.start_spin());
        let frames = engine.run_to_rest(&mut (), 100_000);
        assert!(engine.is_idle(), "seed {seed} did not settle");
        assert!(frames < 2000, "seed {seed} took {frames} frames");

        let state = *engine.state();
        let outcome = engine.outcome().unwrap();
        let under_pointer = segment_at_angle(state.current_angle, 6);
        assert_eq!(outcome.label(), PRIZES[under_pointer].1);
        assert_eq!(Some(under_pointer), engine.target_index());
        assert!((state.current_angle - state.target_angle).abs() < 0.03);
        assert!((0.0..TAU).contains(&state.current_angle));
    }
}

#[test]
fn back_to_back_spins_from_wherever_the_last_one_stopped() {
    let mut engine = SpinEngine::with_seed(prizes(), 2024);
    let mut seen = [false; 6];
    for _ in 0..120 {
        assert!(engine.start_spin());
        engine.run_to_rest(&mut (), 100_000);
        let outcome = engine.outcome().unwrap();
        assert_eq!(Some(outcome.index), engine.target_index());
        seen[outcome.index] = true;
    }
    assert!(seen.iter().all(|&hit| hit), "some prize never came up: {seen:?}");
}

#[test]
fn driven_spin_keeps_readout_in_step() {
    let config = prizes();
    let renderer = WheelRenderer::setup(RecordingSurface::new(), &config);
    let mut driver = AnimationDriver::new(
        SpinEngine::with_seed(config.clone(), 8),
        renderer,
        ManualScheduler::new(),
    );
    driver.start();
    driver.request_spin();

    let mut last = None;
    for _ in 0..100_000 {
        let tick = driver.pump();
        let surface = driver.sink().surface().unwrap();
        let (label, _) = surface.last_readout().unwrap();
        let rotation = surface.last_rotation().unwrap();
        let index = segment_at_angle(driver.engine().state().current_angle, 6);
        assert_eq!(label, PRIZES[index].1);
        assert!((rotation - (driver.engine().state().current_angle - TAU / 4.0)).abs() < 1e-12);
        last = tick;
        if tick == Some(Tick::Settled) {
            break;
        }
    }
    assert_eq!(last, Some(Tick::Settled));

    let outcome = driver.engine().outcome().unwrap().clone();
    let (label, color) = driver.sink().surface().unwrap().last_readout().unwrap();
    assert_eq!(label, outcome.label());
    assert_eq!(color, outcome.segment.color);

    // The wheel was drawn exactly once, before any frame.
    let ops = driver.sink().surface().unwrap().ops();
    let first_rotation = ops
        .iter()
        .position(|op| matches!(op, DrawOp::Rotation(_)))
        .unwrap();
    let sectors = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Sector { .. }))
        .count();
    assert_eq!(sectors, 6);
    assert!(ops[first_rotation..]
        .iter()
        .all(|op| matches!(op, DrawOp::Rotation(_) | DrawOp::Readout { .. })));
}

#[test]
fn svg_rotation_follows_the_outcome() {
    let source = "seed = 5\n\
        segment \"一等奖\" #0bf\nsegment \"二等奖\" #fb0\nsegment \"三等奖\" #0fb\n\
        segment \"四等奖\" #b0f\nsegment \"五等奖\" #f0b\nsegment \"六等奖\" #f82\n";
    let (outcome, svg) = wheelspin::spin_to_svg(source).unwrap();

    let rotate = Regex::new(r#"class="wheel" transform="rotate\((-?[0-9.e-]+) 150 150\)""#).unwrap();
    let degrees: f64 = rotate.captures(&svg).unwrap()[1].parse().unwrap();
    let expected = outcome.angle.to_degrees() - 90.0;
    assert!((degrees - expected).abs() < 1e-3, "{degrees} vs {expected}");

    let hub = Regex::new(r#"<g class="readout">.*>([^<]+)</text></g>"#).unwrap();
    assert_eq!(&hub.captures(&svg).unwrap()[1], outcome.label());
}

#[test]
fn static_render_draws_every_label() {
    let source = "segment \"一等奖\" #0bf\nsegment \"二等奖\" #fb0\nsegment \"三等奖\" #0fb";
    let svg = wheelspin::render_wheel_svg(source).unwrap();

    let glyph = Regex::new(r#"rotate\((-?[0-9.e-]+)\)"[^>]*>([^<])</text>"#).unwrap();
    let glyphs: String = glyph
        .captures_iter(&svg)
        .map(|caps| caps[2].to_string())
        .collect();
    assert_eq!(glyphs, "一等奖二等奖三等奖");
}

#[test]
fn long_driven_spin_recording_stays_small() {
    let config = prizes();
    let renderer = WheelRenderer::setup(RecordingSurface::new().latest_frame_only(), &config);
    let static_ops = renderer.surface().unwrap().ops().len();
    let mut driver = AnimationDriver::new(
        SpinEngine::with_seed(config.clone(), 8),
        renderer,
        ManualScheduler::new(),
    );
    driver.start();
    driver.request_spin();

    let mut frames = 0;
    while driver.pump() != Some(Tick::Settled) {
        frames += 1;
        assert!(frames < 100_000);
    }
    assert!(frames > 100);

    let surface = driver.sink().surface().unwrap();
    assert_eq!(surface.ops().len(), static_ops + 2);
    let outcome = driver.engine().outcome().unwrap();
    assert_eq!(surface.last_readout().unwrap().0, outcome.label());
}
