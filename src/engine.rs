//! Spin engine: target selection, friction decay and settle detection.
//!
//! The outcome is drawn before the wheel moves. Physics only decides how the
//! wheel gets there: velocity decays by a constant factor each frame and the
//! wheel snaps to rest once it is both slow enough and close enough to the
//! pre-selected target angle.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Segment, WheelConfig};
use crate::errors::SurfaceError;
use crate::log;
use crate::outcome::{angle_for_segment, segment_at_angle};

/// Mutable physics state. Only [`SpinEngine`] writes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpinState {
    /// Wheel angle in `[0, 2π)`.
    pub current_angle: f64,
    /// Radians per frame, never negative. Zero means idle.
    pub angular_velocity: f64,
    pub target_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
}

/// What one call to [`SpinEngine::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to do; the wheel is at rest.
    Idle,
    /// The wheel moved and the frame was drawn.
    Spinning,
    /// The wheel came to rest on this frame.
    Settled,
    /// The wheel moved but the sink could not draw.
    Skipped,
}

/// Per-frame view handed to a [`FrameSink`].
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub angle: f64,
    pub velocity: f64,
    /// Segment currently under the pointer.
    pub index: usize,
    pub segment: &'a Segment,
    /// True on the frame where the wheel came to rest.
    pub settled: bool,
}

/// Final result of a spin.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub index: usize,
    pub segment: Segment,
    pub angle: f64,
    /// Frames advanced between the spin starting and settling.
    pub frames: u64,
}

impl Outcome {
    pub fn label(&self) -> &str {
        &self.segment.label
    }
}

/// Receives every advanced frame: redraw the wheel, update the readout.
pub trait FrameSink {
    fn frame(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError>;

    /// Called once when a spin comes to rest, after the final `frame`.
    fn settled(&mut self, _outcome: &Outcome) {}
}

/// Discards frames.
impl FrameSink for () {
    fn frame(&mut self, _frame: &Frame<'_>) -> Result<(), SurfaceError> {
        Ok(())
    }
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn frame(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError> {
        (**self).frame(frame)
    }

    fn settled(&mut self, outcome: &Outcome) {
        (**self).settled(outcome)
    }
}

/// Owns the wheel configuration and all spin state.
#[derive(Debug)]
pub struct SpinEngine {
    config: WheelConfig,
    state: SpinState,
    target_index: Option<usize>,
    frames: u64,
    outcome: Option<Outcome>,
    rng: StdRng,
}

impl SpinEngine {
    /// Engine seeded from the thread RNG.
    pub fn new(config: WheelConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Engine whose targets and initial velocities are reproducible.
    pub fn with_seed(config: WheelConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WheelConfig, rng: StdRng) -> Self {
        Self {
            config,
            state: SpinState::default(),
            target_index: None,
            frames: 0,
            outcome: None,
            rng,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.angular_velocity > 0.0 {
            Phase::Spinning
        } else {
            Phase::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == Phase::Idle
    }

    /// Segment chosen by the most recent spin.
    pub fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    /// Segment under the pointer right now.
    pub fn current_index(&self) -> usize {
        segment_at_angle(self.state.current_angle, self.config.segment_count())
    }

    pub fn current_segment(&self) -> &Segment {
        &self.config.segments()[self.current_index()]
    }

    /// Result of the last completed spin. Cleared when a new spin starts.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Frames advanced in the current (or last) spin.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start a spin towards a uniformly chosen segment.
    ///
    /// Ignored while a spin is in progress; returns whether a spin started.
    pub fn start_spin(&mut self) -> bool {
        if !self.is_idle() {
            log::debug!("spin requested while spinning, ignored");
            return false;
        }
        let tuning = *self.config.tuning();
        let index = self.rng.random_range(0..self.config.segment_count());
        let velocity = self
            .rng
            .random_range(tuning.min_velocity..=tuning.max_velocity);
        self.begin(index, velocity)
    }

    /// Start a spin towards a specific segment with a specific initial velocity.
    ///
    /// Same idle guard as [`start_spin`](Self::start_spin). A velocity that is
    /// not a positive finite number is ignored.
    pub fn start_spin_to(&mut self, index: usize, velocity: f64) -> bool {
        if !self.is_idle() || !(velocity.is_finite() && velocity > 0.0) {
            return false;
        }
        self.begin(index % self.config.segment_count(), velocity)
    }

    fn begin(&mut self, index: usize, velocity: f64) -> bool {
        self.target_index = Some(index);
        self.state.target_angle = angle_for_segment(index, self.config.segment_count());
        self.state.angular_velocity = velocity;
        self.frames = 0;
        self.outcome = None;
        log::debug!(
            target_index = index,
            target_angle = self.state.target_angle,
            velocity,
            "spin started"
        );
        true
    }

    /// Integrate one frame. Returns `None` when idle, otherwise whether the
    /// wheel came to rest on this frame.
    fn integrate(&mut self) -> Option<bool> {
        if self.is_idle() {
            return None;
        }
        let tuning = *self.config.tuning();
        let state = &mut self.state;

        // Decay, but never below the creep floor. A spin that starts under the
        // floor holds its speed instead; velocity never rises.
        let floor = tuning.creep_velocity().min(state.angular_velocity);
        state.angular_velocity = (state.angular_velocity * tuning.friction).max(floor);

        // Plain absolute difference, not the shortest way around the circle.
        let diff = (state.current_angle - state.target_angle).abs();
        let settled = state.angular_velocity < tuning.stop_velocity && diff < tuning.stop_angle;
        if settled {
            state.angular_velocity = 0.0;
        }

        state.current_angle = (state.current_angle + state.angular_velocity).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        if state.current_angle >= TAU {
            state.current_angle = 0.0;
        }
        self.frames += 1;

        log::trace!(
            angle = state.current_angle,
            velocity = state.angular_velocity,
            diff,
            "frame"
        );

        if settled {
            let index = self.current_index();
            log::debug!(
                index,
                target_index = self.target_index,
                angle = self.state.current_angle,
                frames = self.frames,
                "spin settled"
            );
            self.outcome = Some(Outcome {
                index,
                segment: self.config.segments()[index].clone(),
                angle: self.state.current_angle,
                frames: self.frames,
            });
        }
        Some(settled)
    }

    /// Advance the physics by one frame without drawing.
    pub fn step(&mut self) -> Option<Frame<'_>> {
        let settled = self.integrate()?;
        Some(self.frame(settled))
    }

    /// Advance one frame and hand it to `sink`.
    ///
    /// A sink that cannot draw does not stop the spin: the state still
    /// advances and the tick reports [`Tick::Skipped`].
    pub fn advance<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Tick {
        let Some(settled) = self.integrate() else {
            return Tick::Idle;
        };

        let drawn = sink.frame(&self.frame(settled));
        if let Err(err) = &drawn {
            log::warn!(error = %err, "frame not drawn");
        }

        if settled {
            if let Some(outcome) = &self.outcome {
                sink.settled(outcome);
            }
            return Tick::Settled;
        }
        match drawn {
            Ok(()) => Tick::Spinning,
            Err(_) => Tick::Skipped,
        }
    }

    /// The current state as a frame, for drawing without advancing.
    pub fn snapshot(&self) -> Frame<'_> {
        self.frame(false)
    }

    fn frame(&self, settled: bool) -> Frame<'_> {
        let index = self.current_index();
        Frame {
            angle: self.state.current_angle,
            velocity: self.state.angular_velocity,
            index,
            segment: &self.config.segments()[index],
            settled,
        }
    }

    /// Advance until idle or `max_frames` have run. Returns the frames advanced.
    pub fn run_to_rest<S: FrameSink + ?Sized>(&mut self, sink: &mut S, max_frames: u64) -> u64 {
        let mut advanced = 0;
        while advanced < max_frames && self.advance(sink) != Tick::Idle {
            advanced += 1;
        }
        advanced
    }
}
