//! Animation driver: a frame loop with explicit start and stop.
//!
//! Every tick calls [`SpinEngine::advance`] and re-arms the next frame, whether
//! or not a spin is in progress. The loop only ends when [`AnimationDriver::stop`]
//! is called or the driver is dropped.

use std::time::{Duration, Instant};

use crate::defaults;
use crate::engine::{FrameSink, SpinEngine, Tick};
use crate::log;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host frame clock. At most one frame is outstanding at a time.
pub trait FrameScheduler {
    /// Ask for a frame callback. Replaces any frame already requested.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Take the requested frame if it is due.
    fn next_due(&mut self) -> Option<FrameHandle>;
}

/// A scheduler whose requested frame is due immediately.
///
/// Each [`AnimationDriver::pump`] then runs exactly one tick.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    issued: u64,
    pending: Option<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.issued += 1;
        let handle = FrameHandle(self.issued);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn next_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

/// A scheduler that paces frames on the monotonic clock.
#[derive(Debug)]
pub struct PacedScheduler {
    interval: Duration,
    issued: u64,
    pending: Option<(FrameHandle, Instant)>,
}

impl Default for PacedScheduler {
    fn default() -> Self {
        Self::per_second(defaults::FRAMES_PER_SECOND)
    }
}

impl PacedScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            issued: 0,
            pending: None,
        }
    }

    pub fn per_second(frames: u32) -> Self {
        Self::new(Duration::from_secs(1) / frames.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the requested frame is due, if one is requested.
    pub fn until_due(&self) -> Option<Duration> {
        self.pending
            .map(|(_, due)| due.saturating_duration_since(Instant::now()))
    }
}

impl FrameScheduler for PacedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.issued += 1;
        let handle = FrameHandle(self.issued);
        self.pending = Some((handle, Instant::now() + self.interval));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn next_due(&mut self) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, due)) if due <= Instant::now() => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

/// Runs a [`SpinEngine`] on a [`FrameScheduler`], drawing into a [`FrameSink`].
///
/// Dropping the driver cancels the outstanding frame.
pub struct AnimationDriver<K: FrameSink, S: FrameScheduler> {
    engine: SpinEngine,
    sink: K,
    scheduler: S,
    armed: Option<FrameHandle>,
}

impl<K: FrameSink, S: FrameScheduler> AnimationDriver<K, S> {
    pub fn new(engine: SpinEngine, sink: K, scheduler: S) -> Self {
        Self {
            engine,
            sink,
            scheduler,
            armed: None,
        }
    }

    /// Draw the current state once and arm the first frame.
    ///
    /// Does nothing if the loop is already running.
    pub fn start(&mut self) {
        if self.armed.is_some() {
            return;
        }
        if let Err(err) = self.sink.frame(&self.engine.snapshot()) {
            log::warn!(error = %err, "initial frame not drawn");
        }
        let handle = self.scheduler.request_frame();
        self.armed = Some(handle);
        log::debug!(frame = handle.id(), "animation started");
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    /// Run the tick for `handle` and arm the next one.
    ///
    /// Returns `None` without touching the engine if `handle` is not the armed
    /// frame, which covers callbacks that fire after [`stop`](Self::stop).
    pub fn fire(&mut self, handle: FrameHandle) -> Option<Tick> {
        if self.armed != Some(handle) {
            log::trace!(frame = handle.id(), "stale frame ignored");
            return None;
        }
        let tick = self.engine.advance(&mut self.sink);
        self.armed = Some(self.scheduler.request_frame());
        Some(tick)
    }

    /// Fire the scheduler's due frame, if any.
    pub fn pump(&mut self) -> Option<Tick> {
        let handle = self.scheduler.next_due()?;
        self.fire(handle)
    }

    /// Cancel the armed frame. The engine keeps its state.
    pub fn stop(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.scheduler.cancel_frame(handle);
            log::debug!(frame = handle.id(), "animation stopped");
        }
    }

    /// Trigger a spin. Ignored while one is in progress.
    pub fn request_spin(&mut self) -> bool {
        self.engine.start_spin()
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SpinEngine {
        &mut self.engine
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<K: FrameSink, S: FrameScheduler> Drop for AnimationDriver<K, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WheelConfig;
    use crate::engine::Frame;
    use crate::errors::SurfaceError;
    use crate::render::{RecordingSurface, WheelRenderer};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wheel() -> WheelConfig {
        WheelConfig::builder()
            .segment("red".parse().unwrap(), "A")
            .segment("green".parse().unwrap(), "B")
            .segment("blue".parse().unwrap(), "C")
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Frames(usize);

    impl FrameSink for Frames {
        fn frame(&mut self, _frame: &Frame<'_>) -> Result<(), SurfaceError> {
            self.0 += 1;
            Ok(())
        }
    }

    /// Manual scheduler that logs cancellations somewhere the test can still
    /// see after the driver is gone.
    struct Logged {
        inner: ManualScheduler,
        cancelled: Rc<RefCell<Vec<FrameHandle>>>,
    }

    impl FrameScheduler for Logged {
        fn request_frame(&mut self) -> FrameHandle {
            self.inner.request_frame()
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.borrow_mut().push(handle);
            self.inner.cancel_frame(handle);
        }

        fn next_due(&mut self) -> Option<FrameHandle> {
            self.inner.next_due()
        }
    }

    #[test]
    fn start_draws_once_and_arms() {
        let engine = SpinEngine::with_seed(wheel(), 1);
        let mut driver = AnimationDriver::new(engine, Frames::default(), ManualScheduler::new());
        assert!(!driver.is_running());

        driver.start();
        assert!(driver.is_running());
        assert_eq!(driver.sink().0, 1);
        assert!(driver.scheduler().pending().is_some());

        driver.start();
        assert_eq!(driver.sink().0, 1);
    }

    #[test]
    fn idle_ticks_keep_the_loop_alive() {
        let engine = SpinEngine::with_seed(wheel(), 1);
        let mut driver = AnimationDriver::new(engine, Frames::default(), ManualScheduler::new());
        driver.start();
        for _ in 0..5 {
            assert_eq!(driver.pump(), Some(Tick::Idle));
        }
        assert!(driver.is_running());
        assert_eq!(driver.sink().0, 1);
    }

    #[test]
    fn pump_runs_a_spin_to_rest() {
        let config = wheel();
        let engine = SpinEngine::with_seed(config.clone(), 9);
        let renderer = WheelRenderer::setup(RecordingSurface::new(), &config);
        let mut driver = AnimationDriver::new(engine, renderer, ManualScheduler::new());
        driver.start();
        assert!(driver.request_spin());
        assert!(!driver.request_spin());

        let mut ticks = 0;
        loop {
            match driver.pump() {
                Some(Tick::Settled) => break,
                Some(Tick::Spinning) => ticks += 1,
                other => panic!("unexpected tick {other:?}"),
            }
            assert!(ticks < 10_000, "spin did not settle");
        }

        let target = driver.engine().target_index();
        let outcome = driver.engine().outcome().unwrap();
        assert_eq!(Some(outcome.index), target);
        assert_eq!(driver.sink().last_outcome(), Some(outcome));
        assert_eq!(driver.pump(), Some(Tick::Idle));
    }

    #[test]
    fn stale_handles_are_ignored() {
        let engine = SpinEngine::with_seed(wheel(), 1);
        let mut driver = AnimationDriver::new(engine, Frames::default(), ManualScheduler::new());
        driver.start();
        let first = driver.scheduler().pending().unwrap();
        driver.request_spin();

        assert_eq!(driver.fire(first), Some(Tick::Spinning));
        assert_eq!(driver.fire(first), None);
        assert_eq!(driver.engine().frames(), 1);

        let armed = driver.scheduler().pending().unwrap();
        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.fire(armed), None);
        assert_eq!(driver.pump(), None);
        assert_eq!(driver.engine().frames(), 1);
    }

    #[test]
    fn stop_then_start_resumes() {
        let engine = SpinEngine::with_seed(wheel(), 2);
        let mut driver = AnimationDriver::new(engine, Frames::default(), ManualScheduler::new());
        driver.start();
        driver.request_spin();
        driver.pump();
        driver.stop();
        let angle = driver.engine().state().current_angle;

        driver.start();
        assert_eq!(driver.engine().state().current_angle, angle);
        assert_eq!(driver.pump(), Some(Tick::Spinning));
    }

    #[test]
    fn drop_cancels_the_armed_frame() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let scheduler = Logged {
            inner: ManualScheduler::new(),
            cancelled: Rc::clone(&cancelled),
        };
        let mut driver = AnimationDriver::new(SpinEngine::with_seed(wheel(), 1), (), scheduler);
        driver.start();
        driver.pump();
        drop(driver);

        assert_eq!(*cancelled.borrow(), vec![FrameHandle(2)]);
    }

    #[test]
    fn drop_without_start_cancels_nothing() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let scheduler = Logged {
            inner: ManualScheduler::new(),
            cancelled: Rc::clone(&cancelled),
        };
        drop(AnimationDriver::new(SpinEngine::with_seed(wheel(), 1), (), scheduler));
        assert!(cancelled.borrow().is_empty());
    }

    #[test]
    fn unavailable_surface_skips_without_stopping() {
        let config = wheel();
        let engine = SpinEngine::with_seed(config, 5);
        let renderer = WheelRenderer::<RecordingSurface>::detached();
        let mut driver = AnimationDriver::new(engine, renderer, ManualScheduler::new());
        driver.start();
        driver.request_spin();
        assert_eq!(driver.pump(), Some(Tick::Skipped));
        assert!(driver.is_running());
        assert!(driver.engine().state().current_angle > 0.0);
    }

    #[test]
    fn paced_scheduler_waits_for_interval() {
        let mut scheduler = PacedScheduler::new(Duration::from_secs(3600));
        assert_eq!(scheduler.next_due(), None);
        let handle = scheduler.request_frame();
        assert_eq!(scheduler.next_due(), None);
        assert!(scheduler.until_due().unwrap() > Duration::from_secs(3000));
        scheduler.cancel_frame(handle);
        assert_eq!(scheduler.until_due(), None);

        let mut scheduler = PacedScheduler::new(Duration::ZERO);
        let handle = scheduler.request_frame();
        assert_eq!(scheduler.next_due(), Some(handle));
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn default_pace_is_sixty_hertz() {
        let scheduler = PacedScheduler::default();
        assert_eq!(scheduler.interval(), Duration::from_secs(1) / 60);
    }
}
